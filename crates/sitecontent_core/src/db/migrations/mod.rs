//! Content schema history.
//!
//! | version | file                          | adds                                  |
//! |---------|-------------------------------|---------------------------------------|
//! | 1       | `0001_content_tables.sql`     | one table per list kind               |
//! | 2       | `0002_form_submissions.sql`   | contact, demo and application inboxes |
//! | 3       | `0003_section_content.sql`    | section-keyed page content            |
//!
//! Every table stores catalog fields in a `json_valid` checked `fields`
//! column; list tables key on `id`, section tables on `section`.
//!
//! # Invariants
//! - Steps are listed in strictly increasing version order and never edited
//!   once released; schema changes append a new step.
//! - `PRAGMA user_version` holds the last applied step.
//! - Pending steps apply in one transaction, so a failed upgrade leaves the
//!   previous version intact.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "content_tables",
        sql: include_str!("0001_content_tables.sql"),
    },
    SchemaStep {
        version: 2,
        name: "form_submissions",
        sql: include_str!("0002_form_submissions.sql"),
    },
    SchemaStep {
        version: 3,
        name: "section_content",
        sql: include_str!("0003_section_content.sql"),
    },
];

/// Schema version this binary writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer binary.
/// - Any SQLite failure while applying a step.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();
    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > found)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        debug!(
            "event=db_migrate module=db status=applied version={} step={}",
            step.version, step.name
        );
    }
    tx.pragma_update(None, "user_version", latest)?;
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} steps={}",
        found,
        latest,
        pending.len()
    );
    Ok(())
}
