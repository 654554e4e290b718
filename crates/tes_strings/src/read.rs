//! Types for reading string table files
//!

use binrw::BinRead;
use bon::Builder;
use byteorder::{LittleEndian, ReadBytesExt};
use std::{
    fs::File,
    io::{self, BufReader, Cursor, Read, Seek, SeekFrom},
    path::Path,
};
use tracing::{instrument, warn};

use crate::{
    encoding,
    error::{Error, Result},
    types::{
        DirectoryEntry, StringKind, StringTable, StringsHeader, DIRECTORY_ENTRY_SIZE, HEADER_SIZE,
    },
};

/// Options for how a string table should be read
#[derive(Debug, Default, Clone, Copy, Builder)]
pub struct ReadOptions {
    /// Fail the whole file when a payload is neither UTF-8 nor Windows-1252, instead of dropping
    /// that entry
    #[builder(default)]
    pub strict_encoding: bool,
}

/// String table reader
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_entries(reader: impl Read + Seek) -> tes_strings::error::Result<()> {
///     let table = tes_strings::StringsReader::new(reader, tes_strings::StringKind::Strings)?;
///
///     for (id, text) in table.get_entries() {
///         println!("{}: {}", id, text);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct StringsReader {
    kind: StringKind,
    header: StringsHeader,
    entries: StringTable,
    dropped: usize,
}

impl StringsReader {
    /// Read a string table of the given kind and decode its entries.
    pub fn new<R: Read + Seek>(reader: R, kind: StringKind) -> Result<StringsReader> {
        Self::with_options(reader, kind, ReadOptions::default())
    }

    /// Read a string table of the given kind with explicit options.
    #[instrument(skip(reader), err)]
    pub fn with_options<R: Read + Seek>(
        mut reader: R,
        kind: StringKind,
        options: ReadOptions,
    ) -> Result<StringsReader> {
        let length = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        if length < HEADER_SIZE {
            return Err(Error::TruncatedHeader);
        }

        let header = StringsHeader::read(&mut reader)?;
        let available = length - HEADER_SIZE;
        if header.count as u64 * DIRECTORY_ENTRY_SIZE > available {
            return Err(Error::TruncatedDirectory {
                count: header.count,
                available,
            });
        }

        let directory = (0..header.count)
            .map(|_| DirectoryEntry::read(&mut reader).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;

        let data_start = header.data_start();
        let mut entries = StringTable::default();
        let mut dropped = 0;

        for entry in directory {
            let position = data_start + entry.offset as u64;
            if position >= length {
                return Err(Error::OffsetOutOfBounds {
                    id: entry.id,
                    offset: entry.offset,
                    length,
                });
            }

            reader.seek(SeekFrom::Start(position))?;
            let payload = if kind.is_length_prefixed() {
                Self::read_prefixed(&mut reader, length - position)?
            } else {
                Self::read_terminated(&mut reader)?
            };

            match encoding::decode(&payload) {
                Some(text) => {
                    entries.insert(entry.id, encoding::normalize(&text));
                }
                None if options.strict_encoding => return Err(Error::Encoding { id: entry.id }),
                None => {
                    warn!(id = entry.id, %kind, "dropping string that is neither UTF-8 nor Windows-1252");
                    dropped += 1;
                }
            }
        }

        Ok(StringsReader {
            kind,
            header,
            entries,
            dropped,
        })
    }

    /// Open a string table from disk, selecting the kind from its extension.
    pub fn open(path: impl AsRef<Path>) -> Result<StringsReader> {
        Self::open_with_options(path, ReadOptions::default())
    }

    /// Open a string table from disk with explicit options.
    #[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub fn open_with_options(path: impl AsRef<Path>, options: ReadOptions) -> Result<StringsReader> {
        let kind = StringKind::from_path(&path)?;
        let file = File::open(path.as_ref())?;
        Self::with_options(BufReader::new(file), kind, options)
    }

    /// Number of entries decoded from this table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this table contains no decoded entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How strings were stored in this table
    pub fn kind(&self) -> StringKind {
        self.kind
    }

    /// The header as stored in the file
    pub fn header(&self) -> &StringsHeader {
        &self.header
    }

    /// Number of entries dropped because their payload could not be decoded
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Get a reference to the entries in this file
    pub fn get_entries(&self) -> &StringTable {
        &self.entries
    }

    /// Try to get a string from this file by its id
    pub fn by_id(&self, id: u32) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    /// Unwrap and return the decoded entries
    pub fn into_table(self) -> StringTable {
        self.entries
    }

    fn read_terminated<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        loop {
            let byte = reader.read_u8()?;
            if byte == b'\0' {
                break;
            }
            payload.push(byte);
        }
        Ok(payload)
    }

    fn read_prefixed<R: Read>(reader: &mut R, remaining: u64) -> Result<Vec<u8>> {
        let size = reader.read_u32::<LittleEndian>()? as u64;
        if size > remaining.saturating_sub(4) {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("string length {size} exceeds the {remaining} bytes left in the file"),
            )
            .into());
        }

        let mut payload = vec![0u8; size as usize];
        reader.read_exact(&mut payload)?;
        Ok(payload)
    }
}

/// Decode a string table held in memory.
pub fn parse(bytes: &[u8], kind: StringKind) -> Result<StringTable> {
    StringsReader::new(Cursor::new(bytes), kind).map(StringsReader::into_table)
}
