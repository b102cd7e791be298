//! Ordered schema scripts for the folders/bookmarks store.
//!
//! The applied version lives in `PRAGMA user_version`. Pending scripts run in
//! one transaction, so a failure leaves the previous version in place.

use crate::db::{DbError, DbResult};
use log::{debug, error, info};
use rusqlite::Connection;

/// `(version, script)` pairs, strictly increasing by version.
const MIGRATIONS: &[(u32, &str)] = &[
    (1, include_str!("0001_init.sql")),
    (2, include_str!("0002_bookmark_removed_at.sql")),
];

/// Returns the schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |&(version, _)| version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is already past this build.
/// - `Migration` naming the script that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<(u32, &str)> = MIGRATIONS
        .iter()
        .copied()
        .filter(|&(version, _)| version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| {
                error!(
                    "event=db_migrate module=db status=error version={version} error={source}"
                );
                DbError::Migration { version, source }
            })?;
        debug!("event=db_migrate module=db status=step version={version}");
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={latest}");
    Ok(())
}
