//! Types for writing string table files
//!

use binrw::BinWrite;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Cursor, Seek, Write};
use tracing::instrument;

use crate::error::Result;
use crate::types::{DirectoryEntry, StringKind, StringTable, StringsHeader};

/// String table generator
///
/// Entries are buffered until [`StringsWriter::finish`] writes the header, directory and data region.
///
/// ```
/// # fn doit() -> tes_strings::error::Result<()>
/// # {
/// use tes_strings::{StringKind, StringsWriter};
///
/// let mut strings = StringsWriter::new(std::io::Cursor::new(Vec::new()), StringKind::Strings);
/// strings.add(1, "Hello")?;
/// strings.add(2, "World")?;
///
/// let bytes = strings.finish()?.into_inner();
/// assert_eq!(bytes.len(), 36);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct StringsWriter<W: Write + Seek> {
    inner: W,
    kind: StringKind,
    directory: Vec<DirectoryEntry>,
    data: Vec<u8>,
}

impl<W: Write + Seek> StringsWriter<W> {
    /// Initializes an empty table of the given kind.
    pub fn new(inner: W, kind: StringKind) -> StringsWriter<W> {
        StringsWriter {
            inner,
            kind,
            directory: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Number of entries added so far
    pub fn len(&self) -> usize {
        self.directory.len()
    }

    /// Whether no entries have been added yet
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Add a string, stored as UTF-8.
    pub fn add(&mut self, id: u32, text: &str) -> Result<()> {
        self.add_raw(id, text.as_bytes())
    }

    /// Add a string from already encoded bytes.
    #[instrument(skip(self, payload), fields(kind = %self.kind, size = payload.len()), err)]
    pub fn add_raw(&mut self, id: u32, payload: &[u8]) -> Result<()> {
        if !self.kind.is_length_prefixed() && payload.contains(&0) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("string {id} contains a NUL byte and cannot be null-terminated"),
            )
            .into());
        }

        let offset = u32::try_from(self.data.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "string data exceeds 4 GiB")
        })?;

        if self.kind.is_length_prefixed() {
            let size = u32::try_from(payload.len() + 1).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidData, "string exceeds 4 GiB")
            })?;
            self.data.write_u32::<LittleEndian>(size)?;
        }
        self.data.extend_from_slice(payload);
        self.data.push(0);

        self.directory.push(DirectoryEntry { id, offset });

        Ok(())
    }

    /// Write the header, directory and string data.
    ///
    /// This will return the writer, but one should normally not append any data to the end of the file.
    #[instrument(skip(self), fields(kind = %self.kind, entries = self.directory.len()), err)]
    pub fn finish(mut self) -> Result<W> {
        let header = StringsHeader {
            count: u32::try_from(self.directory.len()).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidData, "too many strings for one table")
            })?,
            data_size: u32::try_from(self.data.len()).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidData, "string data exceeds 4 GiB")
            })?,
        };

        header.write(&mut self.inner)?;
        for entry in &self.directory {
            entry.write(&mut self.inner)?;
        }
        self.inner.write_all(&self.data)?;

        Ok(self.inner)
    }
}

/// Encode a whole table into a new buffer.
pub fn encode(table: &StringTable, kind: StringKind) -> Result<Vec<u8>> {
    let mut writer = StringsWriter::new(Cursor::new(Vec::new()), kind);
    for (id, text) in table {
        writer.add(*id, text)?;
    }
    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    use crate::{
        error::Result,
        read::parse,
        types::{StringKind, StringTable},
        write::{encode, StringsWriter},
    };

    #[test]
    fn write_null_terminated() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x02, 0x00, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00,
            0x48, 0x65, 0x6C, 0x6C, 0x6F, 0x00,
            0x57, 0x6F, 0x72, 0x6C, 0x64, 0x00,
        ];

        let mut writer = StringsWriter::new(Cursor::new(Vec::new()), StringKind::Strings);
        writer.add(1, "Hello")?;
        writer.add(2, "World")?;

        assert_eq!(writer.finish()?.into_inner(), expected);

        Ok(())
    }

    #[test]
    fn write_length_prefixed() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x01, 0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00,
            0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00, 0x4F, 0x4B, 0x00,
        ];

        let mut writer = StringsWriter::new(Cursor::new(Vec::new()), StringKind::DLStrings);
        writer.add(7, "OK")?;

        assert_eq!(writer.finish()?.into_inner(), expected);

        Ok(())
    }

    #[test]
    fn write_rejects_embedded_nul() {
        let mut writer = StringsWriter::new(Cursor::new(Vec::new()), StringKind::Strings);
        assert!(writer.add_raw(1, b"A\0B").is_err());
        assert!(writer.is_empty());
    }

    #[test]
    fn encode_then_parse_preserves_table() -> Result<()> {
        let table: StringTable = [
            (10, "Whiterun".to_owned()),
            (11, "Вайтран".to_owned()),
            (4_000_000_000, String::new()),
        ]
        .into_iter()
        .collect();

        for kind in StringKind::ALL {
            let bytes = encode(&table, kind)?;
            assert_eq!(parse(&bytes, kind)?, table);
        }

        Ok(())
    }
}
