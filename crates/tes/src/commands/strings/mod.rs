pub mod dump;
pub mod pair;

#[derive(clap::Subcommand)]
pub enum StringsCommands {
    /// Print the entries of a string table
    Dump(dump::DumpArgs),
    /// Align a source table with its translation
    Pair(pair::PairArgs),
}

impl StringsCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            StringsCommands::Dump(dump) => dump.handle(),
            StringsCommands::Pair(pair) => pair.handle(),
        }
    }
}
