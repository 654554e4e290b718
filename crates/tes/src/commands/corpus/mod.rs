pub mod ats;
pub mod clear;
pub mod fuzzy;
pub mod group;
pub mod load;
pub mod search;

use clap::Args;
use miette::{Context, Result};
use std::{path::PathBuf, time::Duration};
use tes_corpus::{IngestOptions, StoreOptions, TranslationStore};
use tes_strings::{LanguagePair, ReadOptions};

/// Where the corpus lives and how string tables are paired
#[derive(Args)]
pub struct StoreArgs {
    /// The translation database
    #[arg(long, env = "TES_DB", value_name = "FILE", default_value = "database/translations.db")]
    db: PathBuf,

    /// How long to wait for a locked database, in milliseconds
    #[arg(long, env = "TES_BUSY_TIMEOUT_MS", value_name = "MS", default_value_t = 5000)]
    busy_timeout_ms: u64,

    /// Directory of string tables used to fill an empty corpus on demand
    #[arg(long, env = "TES_STRINGS_DIR", value_name = "DIR")]
    strings_dir: Option<PathBuf>,

    /// Language tag of source tables, as in `<group>_<language>.strings`
    #[arg(long, env = "TES_SOURCE_LANGUAGE", default_value = "english")]
    source_language: String,

    /// Language tag of target tables
    #[arg(long, env = "TES_TARGET_LANGUAGE", default_value = "russian")]
    target_language: String,

    /// Skip a whole pair when one of its entries cannot be decoded
    #[arg(long, default_value_t = false)]
    strict_encoding: bool,
}

impl StoreArgs {
    pub fn open(&self) -> Result<TranslationStore> {
        let options = StoreOptions::builder()
            .busy_timeout(Duration::from_millis(self.busy_timeout_ms))
            .build();

        TranslationStore::open(&self.db, options)
            .context(format!("opening {}", &self.db.display()))
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions::builder()
            .languages(
                LanguagePair::builder()
                    .source(&self.source_language)
                    .target(&self.target_language)
                    .build(),
            )
            .read(
                ReadOptions::builder()
                    .strict_encoding(self.strict_encoding)
                    .build(),
            )
            .build()
    }

    pub fn strings_dir(&self) -> Option<&PathBuf> {
        self.strings_dir.as_ref()
    }
}

#[derive(clap::Subcommand)]
pub enum CorpusCommands {
    /// Load every paired string table of a directory
    Load(load::LoadArgs),
    /// Ranked substring search
    Search(search::SearchArgs),
    /// Similarity search over whole texts
    Fuzzy(fuzzy::FuzzyArgs),
    /// Print the records of one group
    Group(group::GroupArgs),
    /// Delete every record
    Clear(clear::ClearArgs),
    /// Import a directory of .ats translation files
    ImportAts(ats::ImportArgs),
    /// Export one group as an .ats translation file
    ExportAts(ats::ExportArgs),
}

impl CorpusCommands {
    pub fn handle(&self, store: &StoreArgs) -> Result<()> {
        match self {
            CorpusCommands::Load(load) => load.handle(store),
            CorpusCommands::Search(search) => search.handle(store),
            CorpusCommands::Fuzzy(fuzzy) => fuzzy.handle(store),
            CorpusCommands::Group(group) => group.handle(store),
            CorpusCommands::Clear(clear) => clear.handle(store),
            CorpusCommands::ImportAts(import) => import.handle(store),
            CorpusCommands::ExportAts(export) => export.handle(store),
        }
    }
}
