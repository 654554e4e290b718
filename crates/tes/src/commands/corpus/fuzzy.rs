use clap::Args;
use miette::Result;
use owo_colors::OwoColorize;
use tes_corpus::SearchEngine;

use super::StoreArgs;

#[derive(Args)]
pub struct FuzzyArgs {
    /// Text to compare against
    #[arg(value_name = "QUERY")]
    query: String,

    /// Minimum similarity, from 0 to 100
    #[arg(short, long, default_value_t = 70, allow_negative_numbers = true)]
    threshold: i64,
}

impl FuzzyArgs {
    pub fn handle(&self, args: &StoreArgs) -> Result<()> {
        let store = args.open()?;
        let matches = SearchEngine::new(&store).fuzzy_search(&self.query, self.threshold)?;

        for (original, translated) in &matches {
            if translated.is_empty() {
                println!("{} => {}", original, "<missing>".red());
            } else {
                println!("{} => {}", original, translated.green());
            }
        }
        println!("{} matches", matches.len());

        Ok(())
    }
}
