use clap::Args;
use itertools::Itertools;
use miette::{miette, Result};
use owo_colors::OwoColorize;

use super::StoreArgs;

#[derive(Args)]
pub struct GroupArgs {
    /// A group (plugin) name, e.g. `dawnguard`; lists all groups when omitted
    #[arg(value_name = "NAME")]
    name: Option<String>,
}

impl GroupArgs {
    pub fn handle(&self, args: &StoreArgs) -> Result<()> {
        let store = args.open()?;

        let Some(name) = &self.name else {
            for (group, count) in store.groups()? {
                println!("{}: {} records", group.bold(), count);
            }
            return Ok(());
        };

        let records = store.lookup_by_group(name)?;
        if records.is_empty() {
            return Err(miette!("no records for group {}", name));
        }

        for (kind, records) in &records.iter().chunk_by(|record| record.kind) {
            println!("{}", kind.to_string().bold());
            for record in records {
                let id = record
                    .string_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".into());
                match &record.translated_text {
                    Some(text) => println!("  {}: {} => {}", id, record.original_text, text.green()),
                    None => println!("  {}: {} => {}", id, record.original_text, "<missing>".red()),
                }
            }
        }

        Ok(())
    }
}
