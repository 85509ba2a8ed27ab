//! Default content seeding.
//!
//! # Responsibility
//! - Populate empty kinds with the embedded default content at startup.
//! - Report, per kind, whether defaults were applied or skipped.
//!
//! # Invariants
//! - A kind that already holds at least one entity (or section) is never
//!   touched; admin edits survive any number of later seed runs.
//! - Seed entities go through the same repositories and catalog validation
//!   as admin writes.
//! - Seed entities carry the fixed ids from the defaults document.

use crate::model::catalog::{ContentKind, StorageShape, ALL_KINDS};
use crate::model::entity::{EntityDraft, EntityPatch};
use crate::repo::content_repo::{ContentRepository, SqliteContentRepository};
use crate::repo::section_repo::{KeyedConfigStore, SqliteKeyedConfigStore};
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde_json::{Map, Value};
use std::time::Instant;

const DEFAULTS_JSON: &str = include_str!("defaults.json");

/// What the seed initializer did for one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The kind was empty and `count` defaults were written.
    Applied { count: usize },
    /// The kind already held `existing` records.
    Skipped { existing: u64 },
    /// The defaults document has nothing for this kind.
    NoDefaults,
}

/// Per-kind result of one seed run, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    outcomes: Vec<(ContentKind, SeedOutcome)>,
}

impl SeedReport {
    pub fn outcome(&self, kind: ContentKind) -> Option<SeedOutcome> {
        self.outcomes
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, outcome)| *outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContentKind, SeedOutcome)> + '_ {
        self.outcomes.iter().copied()
    }

    /// Total number of records written by this run.
    pub fn applied_total(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, outcome)| match outcome {
                SeedOutcome::Applied { count } => *count,
                _ => 0,
            })
            .sum()
    }

    /// Returns whether the run wrote nothing.
    pub fn is_noop(&self) -> bool {
        self.applied_total() == 0
    }
}

/// Seeds every empty kind from the embedded defaults document.
///
/// Each kind is seeded in one transaction, so a kind is either fully seeded
/// or left empty. A failure aborts the run and leaves kinds seeded earlier
/// in place.
pub fn seed_defaults(conn: &Connection) -> RepoResult<SeedReport> {
    seed_from_document(conn, DEFAULTS_JSON)
}

fn seed_from_document(conn: &Connection, source: &str) -> RepoResult<SeedReport> {
    let started_at = Instant::now();
    let defaults = parse_defaults(source)?;
    let mut report = SeedReport::default();

    for kind in ALL_KINDS.iter().copied() {
        let outcome = match defaults.get(kind.as_str()) {
            None => SeedOutcome::NoDefaults,
            Some(entries) => match kind.schema().storage {
                StorageShape::List => seed_list_kind(conn, kind, entries)?,
                StorageShape::Keyed => seed_keyed_kind(conn, kind, entries)?,
            },
        };
        match outcome {
            SeedOutcome::Applied { count } => info!(
                "event=seed_kind module=seed status=applied kind={kind} count={count}"
            ),
            SeedOutcome::Skipped { existing } => info!(
                "event=seed_kind module=seed status=skipped kind={kind} existing={existing}"
            ),
            SeedOutcome::NoDefaults => {}
        }
        report.outcomes.push((kind, outcome));
    }

    info!(
        "event=seed_defaults module=seed status=ok entities={} duration_ms={}",
        report.applied_total(),
        started_at.elapsed().as_millis()
    );
    Ok(report)
}

fn parse_defaults(source: &str) -> RepoResult<Map<String, Value>> {
    let document: Value = serde_json::from_str(source)
        .map_err(|err| RepoError::InvalidData(format!("seed defaults are not JSON: {err}")))?;
    let Value::Object(entries) = document else {
        return Err(RepoError::InvalidData(
            "seed defaults must be an object keyed by kind".to_string(),
        ));
    };
    for key in entries.keys() {
        if !ALL_KINDS.iter().any(|kind| kind.as_str() == key) {
            return Err(RepoError::InvalidData(format!(
                "seed defaults name unknown kind `{key}`"
            )));
        }
    }
    Ok(entries)
}

fn seed_list_kind(conn: &Connection, kind: ContentKind, entries: &Value) -> RepoResult<SeedOutcome> {
    let Value::Array(payloads) = entries else {
        return Err(RepoError::InvalidData(format!(
            "seed defaults for {kind} must be an array"
        )));
    };

    let repo = SqliteContentRepository::try_new(conn, kind)?;
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let existing = repo.count()?;
    if existing > 0 {
        return Ok(SeedOutcome::Skipped { existing });
    }

    for payload in payloads {
        let draft = EntityDraft::from_json(payload).map_err(|err| seed_error(kind, err))?;
        repo.insert_in(&tx, &draft).map_err(|err| seed_error(kind, err))?;
    }
    tx.commit()?;
    Ok(SeedOutcome::Applied {
        count: payloads.len(),
    })
}

fn seed_keyed_kind(conn: &Connection, kind: ContentKind, entries: &Value) -> RepoResult<SeedOutcome> {
    let Value::Object(sections) = entries else {
        return Err(RepoError::InvalidData(format!(
            "seed defaults for {kind} must be an object keyed by section"
        )));
    };

    let store = SqliteKeyedConfigStore::try_new(conn, kind)?;
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let existing = store.count()?;
    if existing > 0 {
        return Ok(SeedOutcome::Skipped { existing });
    }

    for (section, payload) in sections {
        let patch = EntityPatch::from_json(payload).map_err(|err| seed_error(kind, err))?;
        store
            .upsert_in(&tx, section, &patch)
            .map_err(|err| seed_error(kind, err))?;
    }
    tx.commit()?;
    Ok(SeedOutcome::Applied {
        count: sections.len(),
    })
}

fn seed_error(kind: ContentKind, err: impl Into<RepoError>) -> RepoError {
    let err = err.into();
    warn!(
        "event=seed_kind module=seed status=error kind={} error_code={}",
        kind,
        err.code()
    );
    match err {
        RepoError::Validation(inner) => {
            RepoError::InvalidData(format!("seed defaults for {kind}: {inner}"))
        }
        other => other,
    }
}
