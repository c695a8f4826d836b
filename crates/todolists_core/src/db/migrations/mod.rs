//! Ordered schema migrations.
//!
//! Each step is a SQL script tagged with the `user_version` it produces.
//! Pending steps run inside one transaction, so a failure leaves the file at
//! its previous version.
//!
//! Schema:
//! - `users`: login name and opaque password credential.
//! - `todolists`: per-user lists, titles unique per user.
//! - `todos`: entries owned by a list, removed with it by cascade.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const STEPS: &[(u32, &str)] = &[(1, include_str!("0001_init.sql"))];

/// Highest schema version this build can produce.
pub fn latest_version() -> u32 {
    STEPS.iter().map(|(version, _)| *version).max().unwrap_or(0)
}

/// Brings `conn` up to `latest_version()`; returns how many steps ran.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<_> = STEPS.iter().filter(|(version, _)| *version > found).collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for (version, sql) in &pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        info!("event=db_migrate module=db status=ok from_version={found} version={version}");
    }
    tx.commit()?;
    Ok(pending.len())
}
