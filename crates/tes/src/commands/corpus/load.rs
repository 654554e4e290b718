use clap::Args;
use miette::{miette, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tes_corpus::load_directory;
use tracing::info;

use super::StoreArgs;

#[derive(Args)]
pub struct LoadArgs {
    /// A directory of paired string tables
    #[arg(value_name = "DIR")]
    directory: PathBuf,

    /// Delete every record before loading
    #[arg(long, default_value_t = false)]
    reset: bool,
}

impl LoadArgs {
    pub fn handle(&self, args: &StoreArgs) -> Result<()> {
        if !self.directory.is_dir() {
            return Err(miette!("{} is not a directory", self.directory.display()));
        }

        let store = args.open()?;
        if self.reset {
            let deleted = store.clear_all()?;
            info!(deleted, "reset translation store");
        }

        let counts = load_directory(&store, &self.directory, &args.ingest_options())?;
        for (group, count) in &counts {
            println!("{}: {} strings", group.bold(), count);
        }
        println!("{} records in corpus", store.count()?);

        Ok(())
    }
}
