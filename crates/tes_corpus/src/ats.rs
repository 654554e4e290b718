//! Import and export of `.ats` translation files.
//!
//! An `.ats` file is a JSON array of string entries for one group, named after the group. Entries
//! that carry an `original` field are translated: `original` holds the source text and `string` the
//! translation. Entries without it hold only the source text in `string`.
//!
//! The `index` of an entry numbers the strings of one form, so it is not unique inside a group.
//! Imported records therefore carry no string id and are kept apart by their texts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};
use tes_strings::StringKind;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::Result,
    record::{TranslationRecord, TranslationStatus},
    store::TranslationStore,
};

/// File extension of translation files
pub const EXTENSION: &str = "ats";

/// One entry of an `.ats` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsEntry {
    /// Editor id of the owning form
    #[serde(default)]
    pub editor_id: Option<String>,

    /// Form id of the owning form
    #[serde(default)]
    pub form_id: Option<String>,

    /// Position among the strings of the owning form. Exported records write their string id here.
    #[serde(default)]
    pub index: Option<u32>,

    /// Table flavour or record type
    #[serde(default, rename = "type")]
    pub kind: String,

    /// Source text, present only for translated entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,

    /// Translation when `original` is present, source text otherwise
    #[serde(default)]
    pub string: Option<String>,

    /// Status name
    #[serde(default)]
    pub status: Option<String>,
}

impl AtsEntry {
    /// Convert into a record of `group_name`
    pub fn into_record(self, group_name: &str) -> TranslationRecord {
        let (original_text, translated_text, default_status) = match self.original {
            Some(original) => (original, self.string, TranslationStatus::Complete),
            None => (self.string.unwrap_or_default(), None, TranslationStatus::Required),
        };

        // older exports put bracketed form ids into the editor id column
        let (editor_id, form_id) = match (self.editor_id, self.form_id) {
            (Some(editor_id), None) if editor_id.starts_with('[') && editor_id.ends_with(']') => {
                (None, Some(editor_id))
            }
            ids => ids,
        };

        TranslationRecord {
            group_name: group_name.to_owned(),
            string_id: None,
            kind: StringKind::from_name(&self.kind).unwrap_or_default(),
            original_text,
            translated_text,
            status: self
                .status
                .as_deref()
                .map_or(default_status, TranslationStatus::from_name),
            editor_id,
            form_id,
        }
    }
}

impl From<&TranslationRecord> for AtsEntry {
    fn from(record: &TranslationRecord) -> Self {
        let (original, string) = match &record.translated_text {
            Some(translated) => (Some(record.original_text.clone()), translated.clone()),
            None => (None, record.original_text.clone()),
        };

        AtsEntry {
            editor_id: record.editor_id.clone(),
            form_id: record.form_id.clone(),
            index: record.string_id,
            kind: record.kind.to_string(),
            original,
            string: Some(string),
            status: Some(record.status.to_string()),
        }
    }
}

/// Read an `.ats` file. The group is the file stem.
#[instrument(skip(path), fields(path = %path.as_ref().display()), err)]
pub fn read_ats(path: impl AsRef<Path>) -> Result<Vec<TranslationRecord>> {
    let path = path.as_ref();
    let group_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let entries: Vec<AtsEntry> = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    debug!(entries = entries.len(), group = %group_name, "read translation file");

    Ok(entries
        .into_iter()
        .map(|entry| entry.into_record(&group_name))
        .collect())
}

/// Write records as a pretty-printed `.ats` file.
#[instrument(skip(path, records), fields(path = %path.as_ref().display(), records = records.len()), err)]
pub fn write_ats(path: impl AsRef<Path>, records: &[TranslationRecord]) -> Result<()> {
    let entries = records.iter().map(AtsEntry::from).collect::<Vec<_>>();

    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, &entries)?;
    writer.flush()?;

    Ok(())
}

/// Import every `.ats` file directly inside `directory`.
///
/// Groups that already have records in the store are left alone, and unreadable files are skipped
/// with a warning. Returns the number of inserted records per imported group.
#[instrument(skip(store, directory), fields(directory = %directory.as_ref().display()), err)]
pub fn load_ats_directory(
    store: &TranslationStore,
    directory: impl AsRef<Path>,
) -> Result<IndexMap<String, usize>> {
    let mut paths = std::fs::read_dir(directory.as_ref())?
        .filter_map(|res| res.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
        .collect::<Vec<_>>();
    paths.sort();

    let mut counts = IndexMap::new();
    for path in paths {
        let Some(group_name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };

        if store.exists_group(&group_name)? {
            debug!(group = %group_name, "group already imported");
            continue;
        }

        let records = match read_ats(&path) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable translation file");
                continue;
            }
        };

        let inserted = store.insert_batch(&group_name, &records)?;
        info!(group = %group_name, inserted, "imported translation file");
        counts.insert(group_name, inserted);
    }

    Ok(counts)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::fs;
    use tes_strings::StringKind;

    use crate::{
        ats::{load_ats_directory, read_ats, write_ats, AtsEntry},
        error::Result,
        record::{TranslationRecord, TranslationStatus},
        store::{StoreOptions, TranslationStore},
    };

    const DAWNGUARD: &str = r#"[
        {
            "editor_id": "DLC1VampireLord",
            "form_id": "[NPC_:02003F0F]",
            "index": 12,
            "type": "strings",
            "original": "Vampire Lord",
            "string": "Лорд-вампир",
            "status": "TranslationIncomplete"
        },
        {
            "editor_id": "[WEAP:0200F19F]",
            "form_id": null,
            "index": null,
            "type": "WEAP FULL",
            "string": "Crossbow"
        }
    ]"#;

    #[test]
    fn entries_become_records() -> Result<()> {
        let entries: Vec<AtsEntry> = serde_json::from_str(DAWNGUARD)?;
        let records = entries
            .into_iter()
            .map(|entry| entry.into_record("dawnguard"))
            .collect::<Vec<_>>();

        assert_eq!(records[0].original_text, "Vampire Lord");
        assert_eq!(records[0].translated_text.as_deref(), Some("Лорд-вампир"));
        assert_eq!(records[0].status, TranslationStatus::Incomplete);
        assert_eq!(records[0].string_id, None);
        assert_eq!(records[0].editor_id.as_deref(), Some("DLC1VampireLord"));

        assert_eq!(records[1].original_text, "Crossbow");
        assert_eq!(records[1].translated_text, None);
        assert_eq!(records[1].status, TranslationStatus::Required);
        assert_eq!(records[1].kind, StringKind::Strings);
        assert_eq!(records[1].editor_id, None);
        assert_eq!(records[1].form_id.as_deref(), Some("[WEAP:0200F19F]"));

        Ok(())
    }

    #[test]
    fn written_files_read_back() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("skyrim.ats");
        let records = vec![
            TranslationRecord::new(
                "skyrim",
                Some(1),
                StringKind::DLStrings,
                "Whiterun",
                Some("Вайтран".into()),
            ),
            TranslationRecord::new("skyrim", None, StringKind::Strings, "Riften", None),
        ];

        write_ats(&path, &records)?;
        let text = fs::read_to_string(&path)?;
        assert!(text.contains("Вайтран"));
        assert!(text.contains("\"type\": \"dlstrings\""));

        let expected = records
            .into_iter()
            .map(|record| TranslationRecord {
                string_id: None,
                ..record
            })
            .collect::<Vec<_>>();
        assert_eq!(read_ats(&path)?, expected);

        Ok(())
    }

    #[test]
    fn directory_import_skips_known_groups_and_bad_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("dawnguard.ats"), DAWNGUARD)?;
        fs::write(dir.path().join("broken.ats"), "{ not json")?;
        fs::write(dir.path().join("notes.txt"), "ignored")?;

        let store = TranslationStore::open_in_memory(StoreOptions::default())?;

        let counts = load_ats_directory(&store, dir.path())?;
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("dawnguard"), Some(&2));

        let counts = load_ats_directory(&store, dir.path())?;
        assert!(counts.is_empty());
        assert_eq!(store.count()?, 2);

        Ok(())
    }

    #[test]
    fn entries_sharing_an_index_are_all_imported() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("dialogue.ats"),
            r#"[
                {"form_id": "[INFO:00013F44]", "index": 0, "type": "INFO NAM1", "string": "Hello there."},
                {"form_id": "[INFO:00013F45]", "index": 0, "type": "INFO NAM1", "string": "Go away."},
                {"form_id": "[WEAP:00012EB7]", "index": 0, "type": "WEAP FULL", "string": "Iron Sword"}
            ]"#,
        )?;

        let store = TranslationStore::open_in_memory(StoreOptions::default())?;
        let counts = load_ats_directory(&store, dir.path())?;

        assert_eq!(counts.get("dialogue"), Some(&3));
        assert_eq!(store.count()?, 3);

        let originals = store
            .lookup_by_group("dialogue")?
            .into_iter()
            .map(|record| record.original_text)
            .collect::<Vec<_>>();
        assert_eq!(originals, vec!["Hello there.", "Go away.", "Iron Sword"]);

        Ok(())
    }
}
