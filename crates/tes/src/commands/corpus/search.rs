use clap::Args;
use miette::{miette, IntoDiagnostic, Result};
use tes_corpus::{LoadGate, SearchEngine, SearchRequest};
use tracing::debug;

use super::StoreArgs;

#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for
    #[arg(value_name = "QUERY")]
    query: String,

    /// Don't match against original texts
    #[arg(long, default_value_t = false)]
    no_original: bool,

    /// Don't match against translated texts
    #[arg(long, default_value_t = false)]
    no_translated: bool,

    /// Match case exactly
    #[arg(long, default_value_t = false)]
    case_sensitive: bool,

    /// Number of matches to skip
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset: i64,

    /// Maximum number of matches to print
    #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
    limit: i64,

    /// Pretty-print the JSON response
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

impl SearchArgs {
    pub fn handle(&self, args: &StoreArgs) -> Result<()> {
        let store = args.open()?;

        if let Some(directory) = args.strings_dir() {
            let gate = LoadGate::new();
            if let Some(counts) = gate.ensure_loaded(&store, directory, &args.ingest_options())? {
                debug!(groups = counts.len(), "populated corpus before searching");
            }
        }

        let request = SearchRequest {
            query: self.query.clone(),
            search_in_original: !self.no_original,
            search_in_translated: !self.no_translated,
            case_insensitive: !self.case_sensitive,
            offset: self.offset,
            limit: self.limit,
        };
        let response = SearchEngine::new(&store).respond(&request);

        let text = if self.pretty {
            serde_json::to_string_pretty(&response)
        } else {
            serde_json::to_string(&response)
        }
        .into_diagnostic()?;
        println!("{}", text);

        match response.error {
            Some(error) => Err(miette!("search failed: {}", error)),
            None => Ok(()),
        }
    }
}
