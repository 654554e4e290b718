//! Persisted translation records.
//!
//! The store owns one SQLite connection behind a mutex. Writers use immediate transactions so that
//! lock contention with other processes surfaces while the busy timeout is still running, and a
//! failed batch never leaves part of itself committed.

use bon::Builder;
use indexmap::IndexMap;
use rusqlite::{
    functions::FunctionFlags, named_params, Connection, Row, TransactionBehavior,
};
use std::{
    fmt::{self, Debug},
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tes_strings::StringKind;
use tracing::{debug, info, instrument};

use crate::{
    error::{Error, Result},
    fold,
    record::{TranslationRecord, TranslationStatus},
    schema,
};

/// Columns selected to rebuild a [`TranslationRecord`], in the order [`TranslationStore::record_from_row`] expects
pub(crate) const RECORD_COLUMNS: &str =
    "plugin_name, string_index, type, original_string, translated_string, status, editor_id, form_id";

/// Options for how the store connection should be configured
#[derive(Debug, Clone, Copy, Builder)]
pub struct StoreOptions {
    /// How long to keep retrying while another connection holds the lock
    #[builder(default = Duration::from_secs(5))]
    pub busy_timeout: Duration,

    /// Use write-ahead logging for on-disk stores so readers don't block on writers
    #[builder(default = true)]
    pub wal: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions::builder().build()
    }
}

/// SQLite-backed store of translation records
///
/// ```no_run
/// # fn doit() -> tes_corpus::error::Result<()> {
/// use tes_corpus::store::{StoreOptions, TranslationStore};
///
/// let store = TranslationStore::open("database/translations.db", StoreOptions::default())?;
/// for record in store.lookup_by_group("dawnguard")? {
///     println!("{} => {:?}", record.original_text, record.translated_text);
/// }
/// # Ok(())
/// # }
/// ```
pub struct TranslationStore {
    conn: Mutex<Connection>,
    options: StoreOptions,
}

impl Debug for TranslationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TranslationStore({:?})", self.options)
    }
}

impl TranslationStore {
    /// Open (or create) a store on disk and migrate its schema. Missing parent directories are created.
    #[instrument(skip(path), fields(path = %path.as_ref().display()), err)]
    pub fn open(path: impl AsRef<Path>, options: StoreOptions) -> Result<TranslationStore> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::configure(conn, options, true)
    }

    /// Open a private in-memory store.
    pub fn open_in_memory(options: StoreOptions) -> Result<TranslationStore> {
        let conn = Connection::open_in_memory()?;
        Self::configure(conn, options, false)
    }

    fn configure(
        mut conn: Connection,
        options: StoreOptions,
        on_disk: bool,
    ) -> Result<TranslationStore> {
        conn.busy_timeout(options.busy_timeout)?;

        if on_disk && options.wal {
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            debug!(%mode, "journal mode");
        }

        conn.create_scalar_function(
            fold::SQL_FUNCTION,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let text = ctx.get::<Option<String>>(0)?;
                Ok(text.map(|t| fold::fold(&t)))
            },
        )?;

        schema::migrate(&mut conn)?;

        Ok(TranslationStore {
            conn: Mutex::new(conn),
            options,
        })
    }

    /// Options the store was opened with
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Insert the records of one group, skipping those already present.
    ///
    /// Records are stored under `group_name`. A record is already present when the group holds a row
    /// with the same kind and string id, or, for records without an id, the same original and
    /// translated text. Returns the number of newly added rows.
    #[instrument(skip(self, records), fields(records = records.len()), err)]
    pub fn insert_batch(&self, group_name: &str, records: &[TranslationRecord]) -> Result<usize> {
        let inserted = self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let mut inserted = 0;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT OR IGNORE INTO translations
                     (plugin_name, editor_id, form_id, string_index, type,
                      original_string, translated_string, status)
                     VALUES
                     (:plugin_name, :editor_id, :form_id, :string_index, :type,
                      :original_string, :translated_string, :status)",
                )?;

                for record in records {
                    inserted += stmt.execute(named_params! {
                        ":plugin_name": group_name,
                        ":editor_id": record.editor_id,
                        ":form_id": record.form_id,
                        ":string_index": record.string_id,
                        ":type": record.kind.as_str(),
                        ":original_string": record.original_text,
                        ":translated_string": record.translated_text,
                        ":status": record.status.to_string(),
                    })?;
                }
            }
            tx.commit()?;
            Ok(inserted)
        })?;

        debug!(inserted, "batch committed");
        Ok(inserted)
    }

    /// Every record of a group, in insertion order.
    pub fn lookup_by_group(&self, group_name: &str) -> Result<Vec<TranslationRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {RECORD_COLUMNS} FROM translations WHERE plugin_name = ?1 ORDER BY id"
            ))?;
            let rows = stmt.query_map([group_name], Self::record_from_row)?;
            rows.collect()
        })
    }

    /// Whether the corpus holds at least one record.
    pub fn exists_any(&self) -> Result<bool> {
        self.with_conn(|conn| {
            conn.query_row("SELECT EXISTS (SELECT 1 FROM translations)", [], |row| {
                row.get(0)
            })
        })
    }

    /// Whether the corpus holds at least one record of `group_name`.
    pub fn exists_group(&self, group_name: &str) -> Result<bool> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM translations WHERE plugin_name = ?1)",
                [group_name],
                |row| row.get(0),
            )
        })
    }

    /// Total number of records.
    pub fn count(&self) -> Result<u64> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM translations", [], |row| row.get(0))
        })
    }

    /// Number of records per group, ordered by group name.
    pub fn groups(&self) -> Result<IndexMap<String, u64>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT plugin_name, COUNT(*) FROM translations GROUP BY plugin_name ORDER BY plugin_name",
            )?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect()
        })
    }

    /// Delete every record. Returns the number of deleted rows.
    #[instrument(skip(self), err)]
    pub fn clear_all(&self) -> Result<usize> {
        let deleted = self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let deleted = tx.execute("DELETE FROM translations", [])?;
            tx.commit()?;
            Ok(deleted)
        })?;

        info!(deleted, "cleared translation store");
        Ok(deleted)
    }

    pub(crate) fn record_from_row(row: &Row<'_>) -> rusqlite::Result<TranslationRecord> {
        let kind: String = row.get(2)?;
        let status: String = row.get(5)?;

        Ok(TranslationRecord {
            group_name: row.get(0)?,
            string_id: row.get(1)?,
            kind: StringKind::from_name(&kind).unwrap_or_default(),
            original_text: row.get(3)?,
            translated_text: row.get(4)?,
            status: TranslationStatus::from_name(&status),
            editor_id: row.get(6)?,
            form_id: row.get(7)?,
        })
    }

    /// Run `f` against the connection, reporting lock contention as [`Error::StoreBusy`]
    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let conn = self.lock();
        f(&conn).map_err(|e| self.classify(e))
    }

    /// Like [`Self::with_conn`], for work that opens a transaction
    pub(crate) fn with_conn_mut<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let mut conn = self.lock();
        f(&mut conn).map_err(|e| self.classify(e))
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn classify(&self, error: rusqlite::Error) -> Error {
        if Error::is_busy(&error) {
            Error::StoreBusy {
                timeout: self.options.busy_timeout,
            }
        } else {
            Error::Store(error)
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tes_strings::StringKind;

    use crate::{
        error::{Error, Result},
        record::{TranslationRecord, TranslationStatus},
        store::{StoreOptions, TranslationStore},
    };

    fn records() -> Vec<TranslationRecord> {
        vec![
            TranslationRecord::new(
                "dawnguard",
                Some(1),
                StringKind::Strings,
                "Vampire Lord",
                Some("Лорд-вампир".into()),
            ),
            TranslationRecord::new("dawnguard", Some(2), StringKind::Strings, "Crossbow", None),
            TranslationRecord::new(
                "dawnguard",
                Some(1),
                StringKind::DLStrings,
                "A lord of vampires.",
                Some("Повелитель вампиров.".into()),
            ),
        ]
    }

    #[test]
    fn insert_batch_is_idempotent() -> Result<()> {
        let store = TranslationStore::open_in_memory(StoreOptions::default())?;
        assert!(!store.exists_any()?);

        assert_eq!(store.insert_batch("dawnguard", &records())?, 3);
        assert_eq!(store.insert_batch("dawnguard", &records())?, 0);
        assert_eq!(store.count()?, 3);
        assert!(store.exists_any()?);

        Ok(())
    }

    #[test]
    fn insert_without_ids_deduplicates_on_text() -> Result<()> {
        let store = TranslationStore::open_in_memory(StoreOptions::default())?;
        let record = TranslationRecord::new("hearthfire", None, StringKind::Strings, "Lumber", None);

        assert_eq!(store.insert_batch("hearthfire", &[record.clone(), record.clone()])?, 1);

        let translated = TranslationRecord {
            translated_text: Some("Брёвна".into()),
            ..record
        };
        assert_eq!(store.insert_batch("hearthfire", &[translated])?, 1);
        assert_eq!(store.count()?, 2);

        Ok(())
    }

    #[test]
    fn lookup_by_group_returns_inserted_records() -> Result<()> {
        let store = TranslationStore::open_in_memory(StoreOptions::default())?;
        store.insert_batch("dawnguard", &records())?;
        store.insert_batch(
            "dragonborn",
            &[TranslationRecord::new(
                "dragonborn",
                Some(9),
                StringKind::Strings,
                "Miraak",
                Some("Мирак".into()),
            )],
        )?;

        assert_eq!(store.lookup_by_group("dawnguard")?, records());
        assert_eq!(store.lookup_by_group("missing")?, vec![]);
        assert!(store.exists_group("dragonborn")?);
        assert!(!store.exists_group("hearthfire")?);

        let groups = store.groups()?;
        assert_eq!(groups.get("dawnguard"), Some(&3));
        assert_eq!(groups.get("dragonborn"), Some(&1));

        let miraak = &store.lookup_by_group("dragonborn")?[0];
        assert_eq!(miraak.status, TranslationStatus::Complete);

        Ok(())
    }

    #[test]
    fn clear_all_empties_store() -> Result<()> {
        let store = TranslationStore::open_in_memory(StoreOptions::default())?;
        store.insert_batch("dawnguard", &records())?;

        assert_eq!(store.clear_all()?, 3);
        assert!(!store.exists_any()?);

        Ok(())
    }

    #[test]
    fn reopen_keeps_records() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("translations.db");

        {
            let store = TranslationStore::open(&path, StoreOptions::default())?;
            store.insert_batch("dawnguard", &records())?;
        }

        let store = TranslationStore::open(&path, StoreOptions::default())?;
        assert_eq!(store.count()?, 3);

        Ok(())
    }

    #[test]
    fn locked_store_reports_busy() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("translations.db");
        let options = StoreOptions::builder()
            .busy_timeout(Duration::from_millis(50))
            .build();

        let first = TranslationStore::open(&path, options)?;
        let second = TranslationStore::open(&path, options)?;

        let holder = rusqlite::Connection::open(&path)?;
        holder.execute_batch("BEGIN IMMEDIATE")?;

        let result = second.insert_batch("dawnguard", &records());
        assert!(matches!(result, Err(Error::StoreBusy { .. })));

        holder.execute_batch("ROLLBACK")?;
        assert_eq!(first.insert_batch("dawnguard", &records())?, 3);

        Ok(())
    }

    #[test]
    fn failed_batch_leaves_no_rows() -> Result<()> {
        let store = TranslationStore::open_in_memory(StoreOptions::default())?;
        store.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER reject_marker BEFORE INSERT ON translations
                 WHEN NEW.original_string = 'rejected'
                 BEGIN SELECT RAISE(ABORT, 'marker text refused'); END;",
            )
        })?;

        let mut batch = records();
        batch.push(TranslationRecord::new(
            "dawnguard",
            Some(3),
            StringKind::Strings,
            "rejected",
            None,
        ));

        let result = store.insert_batch("dawnguard", &batch);
        assert!(matches!(result, Err(Error::Store(_))));
        assert_eq!(store.count()?, 0);

        assert_eq!(store.insert_batch("dawnguard", &records())?, 3);

        Ok(())
    }
}
