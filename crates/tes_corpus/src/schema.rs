//! Versioned schema of the `translations` table.
//!
//! Each migration runs once, in order, inside its own transaction. The applied version is kept in
//! `PRAGMA user_version`.

use rusqlite::Connection;
use tracing::{debug, info, instrument};

use crate::error::Result;

/// Table name
pub const TABLE: &str = "translations";

const MIGRATIONS: &[&str] = &[
    // 1: minimal corpus with provenance columns
    "CREATE TABLE IF NOT EXISTS translations (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        plugin_name       TEXT NOT NULL,
        editor_id         TEXT,
        form_id           TEXT,
        string_index      INTEGER,
        type              TEXT NOT NULL,
        original_string   TEXT NOT NULL,
        translated_string TEXT,
        status            TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_plugin_name ON translations (plugin_name);",
    // 2: accelerate ordering and filtering on text columns
    "CREATE INDEX IF NOT EXISTS idx_original_string ON translations (original_string);
    CREATE INDEX IF NOT EXISTS idx_translated_string ON translations (translated_string);",
    // 3: deduplicate re-inserted strings
    "DELETE FROM translations WHERE string_index IS NOT NULL AND id NOT IN (
        SELECT MIN(id) FROM translations WHERE string_index IS NOT NULL
        GROUP BY plugin_name, type, string_index
    );
    DELETE FROM translations WHERE string_index IS NULL AND id NOT IN (
        SELECT MIN(id) FROM translations WHERE string_index IS NULL
        GROUP BY plugin_name, original_string, IFNULL(translated_string, '')
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_unique_string_index
        ON translations (plugin_name, type, string_index)
        WHERE string_index IS NOT NULL;
    CREATE UNIQUE INDEX IF NOT EXISTS idx_unique_text
        ON translations (plugin_name, original_string, IFNULL(translated_string, ''))
        WHERE string_index IS NULL;",
];

/// The schema version this build migrates to
pub const VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the schema up to [`VERSION`]
#[instrument(skip(conn), err)]
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if current >= VERSION {
        debug!(version = current, "schema up to date");
        return Ok(());
    }

    for (index, migration) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        let version = index as u32 + 1;
        let tx = conn.transaction()?;
        tx.execute_batch(migration)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
        info!(version, "applied schema migration");
    }

    Ok(())
}
