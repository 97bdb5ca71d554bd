//! Schema migration registry and executor.
//!
//! # Responsibility
//! - Register schema steps in strictly increasing order.
//! - Create or repair the schema atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Every step is re-runnable (`IF NOT EXISTS`), so `create_schema` can
//!   restore a dropped table or index without touching existing rows.
//! - Applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_task_indexes.sql"),
    },
];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the schema version recorded in the database file.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Creates every table and index the store needs.
///
/// Safe to call on an already initialized database: all steps run again
/// inside one transaction and only recreate what is missing.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   schema than this binary knows.
pub fn create_schema(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        tx.execute_batch(migration.sql)?;
    }
    if from_version != latest {
        tx.execute_batch(&format!("PRAGMA user_version = {latest};"))?;
    }
    tx.commit()?;

    info!(
        "event=schema_create module=db status=ok from_version={} to_version={}",
        from_version, latest
    );
    Ok(())
}
