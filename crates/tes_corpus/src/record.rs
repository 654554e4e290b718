//! Translation records as persisted in the corpus.

use derive_more::derive::Display;
use serde::{Deserialize, Serialize};
use tes_strings::{AlignedTable, StringKind};

/// Provenance flag of a translation
#[derive(Debug, Display, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TranslationStatus {
    /// The string does not need translating
    #[display("NoTranslationRequired")]
    NoTranslationRequired,

    /// The translation is done
    #[serde(rename = "TranslationComplete")]
    #[display("TranslationComplete")]
    Complete,

    /// The translation was started
    #[serde(rename = "TranslationIncomplete")]
    #[display("TranslationIncomplete")]
    Incomplete,

    /// The string still needs translating
    #[default]
    #[serde(rename = "TranslationRequired")]
    #[display("TranslationRequired")]
    Required,
}

impl TranslationStatus {
    /// Look a status up by its persisted name, defaulting to [`TranslationStatus::Required`]
    pub fn from_name(name: &str) -> TranslationStatus {
        match name {
            "NoTranslationRequired" => TranslationStatus::NoTranslationRequired,
            "TranslationComplete" => TranslationStatus::Complete,
            "TranslationIncomplete" => TranslationStatus::Incomplete,
            _ => TranslationStatus::Required,
        }
    }
}

/// One aligned source/target string of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// The group (plugin) the string belongs to
    pub group_name: String,

    /// Original numeric key, absent for records imported without one
    pub string_id: Option<u32>,

    /// Which string table flavour the string came from
    pub kind: StringKind,

    /// Source-language text
    pub original_text: String,

    /// Target-language text, absent when the target table has no entry
    pub translated_text: Option<String>,

    /// Provenance flag
    pub status: TranslationStatus,

    /// Editor id of the owning form, when known
    pub editor_id: Option<String>,

    /// Form id of the owning form, when known
    pub form_id: Option<String>,
}

impl TranslationRecord {
    /// A record for a freshly parsed string
    pub fn new(
        group_name: impl Into<String>,
        string_id: Option<u32>,
        kind: StringKind,
        original_text: impl Into<String>,
        translated_text: Option<String>,
    ) -> Self {
        let status = if translated_text.is_some() {
            TranslationStatus::Complete
        } else {
            TranslationStatus::Required
        };

        TranslationRecord {
            group_name: group_name.into(),
            string_id,
            kind,
            original_text: original_text.into(),
            translated_text,
            status,
            editor_id: None,
            form_id: None,
        }
    }

    /// Convert every aligned entry of one table into a record of `group_name`
    pub fn from_aligned(
        group_name: &str,
        kind: StringKind,
        table: AlignedTable,
    ) -> Vec<TranslationRecord> {
        table
            .into_iter()
            .map(|(id, entry)| {
                TranslationRecord::new(group_name, Some(id), kind, entry.source, entry.target)
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    use tes_strings::{align, StringKind, StringTable};

    use crate::record::{TranslationRecord, TranslationStatus};

    #[test]
    fn status_names_round_trip() {
        for status in [
            TranslationStatus::NoTranslationRequired,
            TranslationStatus::Complete,
            TranslationStatus::Incomplete,
            TranslationStatus::Required,
        ] {
            assert_eq!(TranslationStatus::from_name(&status.to_string()), status);
        }
        assert_eq!(
            TranslationStatus::from_name("verified"),
            TranslationStatus::Required
        );
    }

    #[test]
    fn records_from_aligned_table() {
        let source = StringTable::new(BTreeMap::from([
            (1, "Whiterun".to_owned()),
            (2, "Dragonsreach".to_owned()),
        ]));
        let target = StringTable::new(BTreeMap::from([(1, "Вайтран".to_owned())]));

        let records =
            TranslationRecord::from_aligned("skyrim", StringKind::Strings, align(&source, &target));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].translated_text.as_deref(), Some("Вайтран"));
        assert_eq!(records[0].status, TranslationStatus::Complete);
        assert_eq!(records[1].string_id, Some(2));
        assert_eq!(records[1].translated_text, None);
        assert_eq!(records[1].status, TranslationStatus::Required);
    }
}
