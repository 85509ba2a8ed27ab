//! Content store lifecycle.
//!
//! # Responsibility
//! - Own the SQLite connection backing every content kind.
//! - Verify the catalog tables, run the seed initializer, and hand out
//!   borrowed per-kind repositories.
//!
//! # Invariants
//! - Repositories borrow the store; none outlives `shutdown`.
//! - The connection is reachable only through those repositories.
//! - Seeding happens before any repository is reachable.

use crate::config::{CoreConfig, DatabaseLocation};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::catalog::{ContentKind, StorageShape, ALL_KINDS};
use crate::repo::content_repo::SqliteContentRepository;
use crate::repo::section_repo::SqliteKeyedConfigStore;
use crate::repo::{RepoError, RepoResult};
use crate::seed::{seed_defaults, SeedReport};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Content store lifecycle failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "content store database error: {err}"),
            Self::Repo(err) => write!(f, "content store error: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Process-wide content store.
///
/// Created once at startup and passed by reference to gateways; there is no
/// global instance.
pub struct ContentStore {
    conn: Connection,
    seed_report: Option<SeedReport>,
}

impl ContentStore {
    /// Opens the configured database and prepares it for use.
    pub fn init(config: &CoreConfig) -> StoreResult<Self> {
        let conn = match &config.database {
            DatabaseLocation::Memory => open_db_in_memory()?,
            DatabaseLocation::File { path } => open_db(path)?,
        };
        Self::from_connection(conn, config.seed_on_start)
    }

    /// Wraps an already-migrated connection.
    pub fn from_connection(conn: Connection, seed: bool) -> StoreResult<Self> {
        if let Err(err) = verify_catalog_tables(&conn) {
            error!(
                "event=store_init module=store status=error error_code={} error={}",
                err.code(),
                err
            );
            return Err(err.into());
        }

        let seed_report = if seed {
            Some(seed_defaults(&conn)?)
        } else {
            None
        };

        info!(
            "event=store_init module=store status=ok kinds={} seeded={}",
            ALL_KINDS.len(),
            seed_report
                .as_ref()
                .map_or(0, SeedReport::applied_total)
        );
        Ok(Self { conn, seed_report })
    }

    /// Repository for a list-shaped kind.
    pub fn content(&self, kind: ContentKind) -> RepoResult<SqliteContentRepository<'_>> {
        SqliteContentRepository::try_new(&self.conn, kind)
    }

    /// Keyed store for a section-keyed kind.
    pub fn sections(&self, kind: ContentKind) -> RepoResult<SqliteKeyedConfigStore<'_>> {
        SqliteKeyedConfigStore::try_new(&self.conn, kind)
    }

    /// Result of the startup seed run, if seeding was enabled.
    pub fn seed_report(&self) -> Option<&SeedReport> {
        self.seed_report.as_ref()
    }

    /// Closes the underlying connection.
    pub fn shutdown(self) -> StoreResult<()> {
        match self.conn.close() {
            Ok(()) => {
                info!("event=store_shutdown module=store status=ok");
                Ok(())
            }
            Err((_, err)) => {
                error!(
                    "event=store_shutdown module=store status=error error={}",
                    err
                );
                Err(StoreError::Db(DbError::Sqlite(err)))
            }
        }
    }
}

fn verify_catalog_tables(conn: &Connection) -> RepoResult<()> {
    for kind in ALL_KINDS.iter().copied() {
        match kind.schema().storage {
            StorageShape::List => {
                SqliteContentRepository::try_new(conn, kind)?;
            }
            StorageShape::Keyed => {
                SqliteKeyedConfigStore::try_new(conn, kind)?;
            }
        }
    }
    Ok(())
}
