//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-kind CRUD contracts for list content and section-keyed
//!   content.
//! - Isolate SQLite query details from services and gateways.
//!
//! # Invariants
//! - Repository writes validate against the entity catalog before SQL
//!   mutations.
//! - Repository APIs return semantic errors (`NotFound`, `Validation`,
//!   `Conflict`) in addition to DB transport errors.
//! - Each kind's table is only written through its repository.

pub mod content_repo;
pub mod section_repo;

use crate::db::{table_columns, table_exists, DbError};
use crate::model::catalog::{ContentKind, StorageShape};
use crate::model::entity::{EntityId, Fields, ValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for content persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input violates the entity catalog contract.
    Validation(ValidationError),
    /// No entity with that id (or section) exists in the kind.
    NotFound { kind: ContentKind, key: String },
    /// Stored `updated_at` no longer matches the caller's expectation.
    Conflict {
        kind: ContentKind,
        id: EntityId,
        expected_updated_at: i64,
        actual_updated_at: i64,
    },
    /// Kind was requested through the repository for the other storage shape.
    WrongStorage {
        kind: ContentKind,
        expected: StorageShape,
    },
    Db(DbError),
    /// Persisted row cannot be converted to a valid record.
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, key } => write!(f, "{kind} not found: {key}"),
            Self::Conflict {
                kind,
                id,
                expected_updated_at,
                actual_updated_at,
            } => write!(
                f,
                "{kind} {id} was modified concurrently (expected updated_at {expected_updated_at}, found {actual_updated_at})"
            ),
            Self::WrongStorage { kind, expected } => write!(
                f,
                "{kind} is not a {} kind",
                expected.as_str()
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted content: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "content repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "content repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Short stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::WrongStorage { .. } => "wrong_storage",
            Self::Db(_) => "db",
            Self::InvalidData(_) => "invalid_data",
            Self::MissingRequiredTable(_) | Self::MissingRequiredColumn { .. } => "schema",
        }
    }
}

/// Which audience a read is performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadView {
    /// Sees inactive entities too.
    Admin,
    /// Sees only `is_active == true`.
    Public,
}

impl ReadView {
    pub(crate) fn includes_inactive(self) -> bool {
        self == Self::Admin
    }
}

/// Current wall clock in epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Next `updated_at` for a mutation, strictly greater than `previous`.
pub(crate) fn next_updated_at(previous: i64) -> i64 {
    now_epoch_ms().max(previous.saturating_add(1))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn encode_fields(fields: &Fields) -> RepoResult<String> {
    serde_json::to_string(fields)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode fields: {err}")))
}

pub(crate) fn decode_fields(kind: ContentKind, raw: &str) -> RepoResult<Fields> {
    let table = kind.as_str();
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|err| RepoError::InvalidData(format!("{table}.fields is not JSON: {err}")))?;
    Fields::from_stored_json(kind.schema(), &value)
        .map_err(|err| RepoError::InvalidData(format!("{table}.fields: {err}")))
}

/// Verifies that `table` exists with every column in `columns`.
pub(crate) fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }
    let present = table_columns(conn, table)?;
    for column in columns.iter().copied() {
        if !present.iter().any(|name| name.as_str() == column) {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}
