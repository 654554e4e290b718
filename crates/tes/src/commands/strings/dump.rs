use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::path::PathBuf;
use tes_strings::{ReadOptions, StringsReader};
use tracing::warn;

#[derive(Args)]
pub struct DumpArgs {
    /// An input string table (.strings, .dlstrings or .ilstrings)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the entries as a JSON object keyed by id
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Fail instead of dropping entries that cannot be decoded
    #[arg(long, default_value_t = false)]
    strict: bool,
}

impl DumpArgs {
    pub fn handle(&self) -> Result<()> {
        let options = ReadOptions::builder().strict_encoding(self.strict).build();
        let strings = StringsReader::open_with_options(&self.file, options)
            .context(format!("path: {}", &self.file.display()))?;

        if strings.dropped() > 0 {
            warn!(dropped = strings.dropped(), "some entries could not be decoded");
        }

        if self.json {
            let text = serde_json::to_string_pretty(strings.get_entries()).into_diagnostic()?;
            println!("{}", text);
            return Ok(());
        }

        println!("{} entries ({})", strings.len(), strings.kind());
        for (id, text) in strings.get_entries() {
            println!("{}: {}", id, text);
        }

        Ok(())
    }
}
