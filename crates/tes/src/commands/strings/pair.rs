use clap::Args;
use miette::{Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tes_strings::{align, StringsReader};

#[derive(Args)]
pub struct PairArgs {
    /// The source-language table
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// The target-language table
    #[arg(value_name = "TARGET")]
    target: PathBuf,

    /// Only print entries without a translation
    #[arg(long, default_value_t = false)]
    missing: bool,
}

impl PairArgs {
    pub fn handle(&self) -> Result<()> {
        let source = StringsReader::open(&self.source)
            .context(format!("path: {}", &self.source.display()))?;
        let target = StringsReader::open(&self.target)
            .context(format!("path: {}", &self.target.display()))?;

        let aligned = align(source.get_entries(), target.get_entries());

        for (id, entry) in aligned.iter() {
            match &entry.target {
                Some(text) if !self.missing => {
                    println!("{}: {} => {}", id, entry.source, text.green())
                }
                None => println!("{}: {} => {}", id, entry.source, "<missing>".red()),
                _ => {}
            }
        }

        println!(
            "{} of {} entries translated",
            aligned.translated(),
            aligned.len()
        );

        Ok(())
    }
}
