//! A searchable translation corpus built from paired *The Elder Scrolls* string tables.
//!
//! Source and target tables of each group are aligned by string id and persisted in SQLite, one
//! record per source string. The corpus can then be searched by substring, ranked so that the most
//! relevant and most complete translations come first, or fuzzily by whole-text similarity.
//!
//! ```no_run
//! # fn doit() -> tes_corpus::error::Result<()> {
//! use tes_corpus::{
//!     ingest::{load_directory, IngestOptions},
//!     search::{SearchEngine, SearchQuery},
//!     store::{StoreOptions, TranslationStore},
//! };
//!
//! let store = TranslationStore::open("database/translations.db", StoreOptions::default())?;
//! load_directory(&store, "strings", &IngestOptions::default())?;
//!
//! let page = SearchEngine::new(&store).search(&SearchQuery::builder().text("dragon").build())?;
//! for result in page.results {
//!     println!("{} => {}", result.record.original_text, result.record.translated_text.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Ranking
//!
//! | Key                 | Order                                                    |
//! |---------------------|----------------------------------------------------------|
//! | Match priority      | original-text match (0) before translated-text match (1) |
//! | Original length     | shorter first                                            |
//! | Translation present | translated records first                                 |
//! | Insertion order     | older first                                              |
//!

pub mod ats;
pub mod error;
pub mod fold;
pub mod fuzzy;
pub mod ingest;
pub mod record;
pub mod schema;
pub mod search;
pub mod store;

pub use ingest::{load_directory, IngestOptions, LoadGate};
pub use record::{TranslationRecord, TranslationStatus};
pub use search::{SearchEngine, SearchQuery, SearchRequest, SearchResponse};
pub use store::{StoreOptions, TranslationStore};
