//! Pairing of source-language and target-language string tables.
//!
//! Two tables belong together when their file names only differ by the language tag:
//! `dawnguard_english.dlstrings` pairs with `dawnguard_russian.dlstrings` for the `dawnguard` group.
//! The source table is authoritative: every source id produces one aligned entry, target-only ids are
//! dropped.

use bon::Builder;
use derive_more::derive::{Deref, IntoIterator};
use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

use crate::{
    encoding::normalize,
    error::Result,
    read::{ReadOptions, StringsReader},
    types::{StringKind, StringTable},
};

/// One source string and its translation, if the target table has one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedEntry {
    /// Text from the source-language table
    pub source: String,

    /// Text from the target-language table, `None` when the id is missing there
    pub target: Option<String>,
}

impl AlignedEntry {
    /// The target text, or an empty string when the id is missing from the target table
    pub fn target_text(&self) -> &str {
        self.target.as_deref().unwrap_or_default()
    }
}

/// Result of aligning two tables, keyed by string id
#[derive(Clone, Debug, Default, PartialEq, Eq, Deref, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct AlignedTable(BTreeMap<u32, AlignedEntry>);

impl AlignedTable {
    /// Iterate `(id, source, target)` with missing targets reported as empty strings
    pub fn pairs(&self) -> impl Iterator<Item = (u32, &str, &str)> {
        self.0
            .iter()
            .map(|(id, entry)| (*id, entry.source.as_str(), entry.target_text()))
    }

    /// Number of source strings that found a translation
    pub fn translated(&self) -> usize {
        self.0.values().filter(|e| e.target.is_some()).count()
    }
}

/// Merge a source table with a target table.
///
/// Both texts are normalized again so that tables built by hand behave like parsed ones.
pub fn align(source: &StringTable, target: &StringTable) -> AlignedTable {
    AlignedTable(
        source
            .iter()
            .map(|(id, text)| {
                let entry = AlignedEntry {
                    source: normalize(text),
                    target: target.get(id).map(|t| normalize(t)),
                };
                (*id, entry)
            })
            .collect(),
    )
}

/// The language tags used in file names to tell source tables from target tables
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct LanguagePair {
    /// Tag of the source language, e.g. `english`
    #[builder(into, default = String::from("english"))]
    pub source: String,

    /// Tag of the target language, e.g. `russian`
    #[builder(into, default = String::from("russian"))]
    pub target: String,
}

impl Default for LanguagePair {
    fn default() -> Self {
        LanguagePair::builder().build()
    }
}

impl LanguagePair {
    /// Split a source file name into its group and extension.
    ///
    /// `dawnguard_english.strings` gives `("dawnguard", "strings")`.
    pub fn split_source<'a>(&self, file_name: &'a str) -> Option<(&'a str, &'a str)> {
        let marker = format!("_{}.", self.source);
        let (group, extension) = file_name.split_once(&marker)?;
        if group.is_empty() || extension.contains(&marker) {
            return None;
        }
        Some((group, extension))
    }

    /// File name of the target table that pairs with `group` and `extension`
    pub fn target_name(&self, group: &str, extension: &str) -> String {
        format!("{}_{}.{}", group, self.target, extension)
    }
}

/// A source and target table that belong to the same group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    /// Group shared by both files
    pub group: String,

    /// Kind of both files
    pub kind: StringKind,

    /// Path of the source-language table
    pub source: PathBuf,

    /// Path of the target-language table
    pub target: PathBuf,
}

impl FilePair {
    /// Read both tables and align them.
    #[instrument(skip(self), fields(group = %self.group, kind = %self.kind), err)]
    pub fn read(&self, options: ReadOptions) -> Result<AlignedTable> {
        let source = StringsReader::open_with_options(&self.source, options)?;
        let target = StringsReader::open_with_options(&self.target, options)?;
        Ok(align(source.get_entries(), target.get_entries()))
    }
}

/// Find every source/target pair directly inside `directory`.
///
/// Pairs are returned ordered by source file name. Files with an unknown extension or without a
/// partner are skipped.
#[instrument(skip(directory), fields(directory = %directory.as_ref().display()), err)]
pub fn find_pairs(directory: impl AsRef<Path>, languages: &LanguagePair) -> Result<Vec<FilePair>> {
    let directory = directory.as_ref();

    let names = std::fs::read_dir(directory)?
        // Filter out all those directory entries which couldn't be read
        .filter_map(|res| res.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect::<BTreeSet<_>>();

    let mut pairs = Vec::new();
    for name in &names {
        let Some((group, extension)) = languages.split_source(name) else {
            continue;
        };

        let Ok(kind) = StringKind::from_extension(extension) else {
            debug!(file = %name, "skipping file with unsupported extension");
            continue;
        };

        let target = languages.target_name(group, extension);
        if !names.contains(&target) {
            debug!(file = %name, missing = %target, "skipping file without a partner");
            continue;
        }

        pairs.push(FilePair {
            group: group.to_owned(),
            kind,
            source: directory.join(name),
            target: directory.join(target),
        });
    }

    Ok(pairs)
}
