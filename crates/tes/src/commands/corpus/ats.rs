use clap::Args;
use miette::{miette, Context, Result};
use std::path::PathBuf;
use tes_corpus::ats::{load_ats_directory, write_ats};
use tracing::info;

use super::StoreArgs;

#[derive(Args)]
pub struct ImportArgs {
    /// A directory of .ats files, one per group
    #[arg(value_name = "DIR")]
    directory: PathBuf,
}

impl ImportArgs {
    pub fn handle(&self, args: &StoreArgs) -> Result<()> {
        let store = args.open()?;
        let counts = load_ats_directory(&store, &self.directory)
            .context(format!("importing {}", &self.directory.display()))?;

        for (group, inserted) in &counts {
            println!("{}: {} records", group, inserted);
        }

        Ok(())
    }
}

#[derive(Args)]
pub struct ExportArgs {
    /// The group to export
    #[arg(value_name = "GROUP")]
    group: String,

    /// A target .ats file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExportArgs {
    pub fn handle(&self, args: &StoreArgs) -> Result<()> {
        if !self.overwrite && self.file.exists() {
            return Err(miette!("{} already exists", self.file.display()));
        }

        let store = args.open()?;
        let records = store.lookup_by_group(&self.group)?;
        if records.is_empty() {
            return Err(miette!("no records for group {}", self.group));
        }

        info!("writing {}", self.file.display());
        write_ats(&self.file, &records).context(format!("writing {}", &self.file.display()))?;

        Ok(())
    }
}
