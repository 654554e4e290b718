//! This library handles reading from and creating the localized string tables used by *The Elder Scrolls*
//! games, and pairing a source-language table with a target-language one.
//!
//! # String Table Format Documentation
//!
//! String tables come in three flavours that share one layout and differ only in how a single string
//! is stored. They are identified by their extension: `.strings`, `.dlstrings` and `.ilstrings`.
//!
//! ## File Structure
//!
//! A string table consists of a header, followed by a directory, followed by the string data region.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Entry Count            | 4 bytes: Number of entries in the directory                |
//! | 0x0004         | Data Size              | 4 bytes: Size of the string data region (advisory)         |
//! | 0x0008         | Directory              | (Entry Count * 8) bytes: Directory entries                 |
//! | 0x0008 + n * 8 | String Data            | Data Size bytes: The strings referenced by the directory   |
//!
//! ### Directory
//!
//! Each directory entry has the following structure:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | ID                     | 4 bytes: Identifier of the string                       |
//! | 0x0004         | Offset                 | 4 bytes: Offset from the start of the string data       |
//!
//! ### String Data
//!
//! - **STRINGS**: the string is stored as raw bytes terminated by a single `0x00`.
//! - **DLSTRINGS** / **ILSTRINGS**: a 4-byte length prefix followed by that many bytes. The length
//!   usually counts a trailing `0x00`.
//!
//! Strings are UTF-8 in recent releases and Windows-1252 in older ones. Decoding tries UTF-8 first and
//! falls back to Windows-1252. Embedded NUL characters and surrounding whitespace are removed.
//!
//! ## Additional Information
//!
//! - **File Extensions**: `.strings`, `.dlstrings`, `.ilstrings`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Pairing**: `<group>_<language>.<ext>`, e.g. `dawnguard_english.strings` and
//!   `dawnguard_russian.strings` both belong to the `dawnguard` group
//!

pub mod align;
pub mod encoding;
pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use align::{align, AlignedTable, FilePair, LanguagePair};
pub use read::{parse, ReadOptions, StringsReader};
pub use types::{StringKind, StringTable};
pub use write::StringsWriter;
