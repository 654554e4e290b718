//! Bulk loading of paired string tables into the store.
//!
//! Pairs are parsed and aligned in parallel; inserts are issued one group at a time. A pair that
//! fails to parse is logged and skipped so that one broken plugin does not block the rest. A store
//! failure ends the load with an error.

use bon::Builder;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::{path::Path, sync::Mutex};
use tes_strings::{align::find_pairs, AlignedTable, FilePair, LanguagePair, ReadOptions};
use tracing::{debug, error, info, instrument, warn};

use crate::{error::Result, record::TranslationRecord, store::TranslationStore};

/// Options for loading a directory of string tables
#[derive(Debug, Clone, Builder)]
pub struct IngestOptions {
    /// Language tags used to pair files
    #[builder(default)]
    pub languages: LanguagePair,

    /// How each table is read
    #[builder(default)]
    pub read: ReadOptions,

    /// Parse pairs on the rayon thread pool
    #[builder(default = true)]
    pub parallel: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions::builder().build()
    }
}

/// Load every pair found directly inside `directory`.
///
/// Returns the number of parsed records per group, in file name order. Records already in the store
/// are counted here but not inserted twice. Groups stored before a failing insert stay stored.
#[instrument(skip(store, directory, options), fields(directory = %directory.as_ref().display()), err)]
pub fn load_directory(
    store: &TranslationStore,
    directory: impl AsRef<Path>,
    options: &IngestOptions,
) -> Result<IndexMap<String, usize>> {
    let pairs = find_pairs(directory.as_ref(), &options.languages)?;
    if pairs.is_empty() {
        warn!("no paired string tables found");
        return Ok(IndexMap::new());
    }

    let read = |pair: &FilePair| pair.read(options.read);
    let tables: Vec<tes_strings::error::Result<AlignedTable>> = if options.parallel {
        pairs.par_iter().map(read).collect()
    } else {
        pairs.iter().map(read).collect()
    };

    let mut counts = IndexMap::new();
    let mut inserted = 0;
    let mut skipped = 0;
    for (pair, table) in pairs.iter().zip(tables) {
        let table = match table {
            Ok(table) => table,
            Err(e) => {
                error!(source = %pair.source.display(), error = %e, "skipping unreadable pair");
                skipped += 1;
                continue;
            }
        };

        let records = TranslationRecord::from_aligned(&pair.group, pair.kind, table);
        inserted += store.insert_batch(&pair.group, &records)?;

        debug!(group = %pair.group, kind = %pair.kind, records = records.len(), "loaded pair");
        *counts.entry(pair.group.clone()).or_insert(0) += records.len();
    }

    info!(
        pairs = pairs.len(),
        skipped,
        groups = counts.len(),
        parsed = counts.values().sum::<usize>(),
        inserted,
        "finished loading string tables"
    );
    Ok(counts)
}

/// Makes sure the corpus is loaded from disk at most once per process.
#[derive(Debug, Default)]
pub struct LoadGate {
    attempted: Mutex<bool>,
}

impl LoadGate {
    /// A gate that has not been passed yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `directory` if this gate was never passed and the store is empty.
    ///
    /// Concurrent callers block until the first one finishes. Returns the per-group counts when this
    /// call performed the load. A failed load leaves the gate open for the next caller.
    pub fn ensure_loaded(
        &self,
        store: &TranslationStore,
        directory: impl AsRef<Path>,
        options: &IngestOptions,
    ) -> Result<Option<IndexMap<String, usize>>> {
        let mut attempted = self
            .attempted
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if *attempted {
            return Ok(None);
        }

        if store.exists_any()? {
            info!("translation store already populated, skipping load");
            *attempted = true;
            return Ok(None);
        }

        info!(directory = %directory.as_ref().display(), "translation store empty, loading");

        let counts = load_directory(store, directory, options)?;
        *attempted = true;
        Ok(Some(counts))
    }
}
