pub mod corpus;
pub mod strings;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Inspect string table files
    Strings {
        #[command(subcommand)]
        command: strings::StringsCommands,
    },
    /// Build and search a translation corpus
    Corpus {
        #[command(flatten)]
        store: corpus::StoreArgs,

        #[command(subcommand)]
        command: corpus::CorpusCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Strings { command } => command.handle(),
            Commands::Corpus { store, command } => command.handle(store),
        }
    }
}
