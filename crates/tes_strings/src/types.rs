//! Base types for structure of string table files.

use binrw::{BinRead, BinWrite};
use derive_more::derive::{Constructor, Deref, Display, IntoIterator};
use std::{collections::BTreeMap, path::Path};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Size of the fixed header in bytes
pub const HEADER_SIZE: u64 = 8;

/// Size of a single directory entry in bytes
pub const DIRECTORY_ENTRY_SIZE: u64 = 8;

/// Identifies how strings are stored inside the data region
#[derive(Debug, Display, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StringKind {
    /// Null-terminated strings
    #[default]
    #[display("strings")]
    Strings,

    /// Length-prefixed strings
    #[display("dlstrings")]
    DLStrings,

    /// Length-prefixed strings
    #[display("ilstrings")]
    ILStrings,
}

impl StringKind {
    /// All kinds, in the order the game loads them
    pub const ALL: [StringKind; 3] = [
        StringKind::Strings,
        StringKind::DLStrings,
        StringKind::ILStrings,
    ];

    /// The lowercase name, which is also the file extension
    pub const fn as_str(&self) -> &'static str {
        match self {
            StringKind::Strings => "strings",
            StringKind::DLStrings => "dlstrings",
            StringKind::ILStrings => "ilstrings",
        }
    }

    /// Whether entries carry a `u32` length prefix instead of a terminator
    pub const fn is_length_prefixed(&self) -> bool {
        !matches!(self, StringKind::Strings)
    }

    /// Look a kind up by its name, ignoring case
    pub fn from_name(name: &str) -> Option<StringKind> {
        StringKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }

    /// Select the kind from a file extension, with or without the leading dot
    pub fn from_extension(extension: &str) -> Result<StringKind> {
        let name = extension.strip_prefix('.').unwrap_or(extension);
        StringKind::from_name(name).ok_or_else(|| Error::UnsupportedExtension(extension.to_owned()))
    }

    /// Select the kind from the extension of a path
    pub fn from_path(path: impl AsRef<Path>) -> Result<StringKind> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedExtension(path.display().to_string()))?;
        StringKind::from_extension(extension)
    }
}

/// String table header
///
/// All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct StringsHeader {
    /// The number of directory entries
    pub count: u32,

    /// The size of the string data region. Not needed for decoding.
    pub data_size: u32,
}

impl StringsHeader {
    /// Offset from the start of the file where the string data region begins
    pub fn data_start(&self) -> u64 {
        HEADER_SIZE + self.count as u64 * DIRECTORY_ENTRY_SIZE
    }
}

/// String table directory entry
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct DirectoryEntry {
    /// Identifier of the string
    pub id: u32,

    /// Offset of the string, relative to the start of the data region
    pub offset: u32,
}

/// Decoded contents of a string table, keyed by string id
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq, Deref, IntoIterator)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[into_iterator(owned, ref)]
pub struct StringTable(BTreeMap<u32, String>);

impl StringTable {
    pub(crate) fn insert(&mut self, id: u32, text: String) -> Option<String> {
        self.0.insert(id, text)
    }
}

impl FromIterator<(u32, String)> for StringTable {
    fn from_iter<T: IntoIterator<Item = (u32, String)>>(iter: T) -> Self {
        StringTable(iter.into_iter().collect())
    }
}

impl From<StringTable> for BTreeMap<u32, String> {
    fn from(value: StringTable) -> Self {
        value.0
    }
}
