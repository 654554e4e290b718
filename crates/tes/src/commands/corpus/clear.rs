use clap::Args;
use miette::{miette, Result};

use super::StoreArgs;

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm deleting every record
    #[arg(long, default_value_t = false)]
    yes: bool,
}

impl ClearArgs {
    pub fn handle(&self, args: &StoreArgs) -> Result<()> {
        if !self.yes {
            return Err(miette!("refusing to clear the corpus without --yes"));
        }

        let deleted = args.open()?.clear_all()?;
        println!("deleted {} records", deleted);

        Ok(())
    }
}
