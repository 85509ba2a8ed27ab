//! Section-keyed content store and SQLite implementation.
//!
//! # Responsibility
//! - Hold configuration-like content (career, about, contact pages) keyed
//!   by a section string instead of a generated id.
//!
//! # Invariants
//! - At most one row per `(kind, section)`; the section is the primary key.
//! - `upsert` updates an existing section and creates a missing one; a
//!   created section must satisfy full catalog validation.
//! - `list` is ordered by section key.

use crate::model::catalog::{ContentKind, KindSchema, StorageShape};
use crate::model::entity::{validate_section_key, EntityPatch, SectionContent};
use crate::repo::{
    decode_fields, encode_fields, ensure_table_ready, next_updated_at, now_epoch_ms, RepoError,
    RepoResult,
};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const SECTION_COLUMNS: &[&str] = &["section", "fields", "created_at", "updated_at"];

/// Keyed configuration store for one section-keyed kind.
pub trait KeyedConfigStore {
    fn kind(&self) -> ContentKind;
    /// Loads one section.
    fn get(&self, section: &str) -> RepoResult<SectionContent>;
    /// Returns every stored section, ordered by key.
    fn list(&self) -> RepoResult<Vec<SectionContent>>;
    /// Updates the section if present, creates it otherwise.
    fn upsert(&self, section: &str, patch: &EntityPatch) -> RepoResult<SectionContent>;
    /// Removes one section permanently.
    fn delete(&self, section: &str) -> RepoResult<()>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed keyed configuration store.
pub struct SqliteKeyedConfigStore<'conn> {
    conn: &'conn Connection,
    schema: &'static KindSchema,
}

impl<'conn> SqliteKeyedConfigStore<'conn> {
    pub fn try_new(conn: &'conn Connection, kind: ContentKind) -> RepoResult<Self> {
        let schema = kind.schema();
        if schema.storage != StorageShape::Keyed {
            return Err(RepoError::WrongStorage {
                kind,
                expected: StorageShape::Keyed,
            });
        }
        ensure_table_ready(conn, schema.table, SECTION_COLUMNS)?;
        Ok(Self { conn, schema })
    }

    fn load(&self, conn: &Connection, section: &str) -> RepoResult<Option<SectionContent>> {
        let sql = format!(
            "SELECT section, fields, created_at, updated_at FROM {} WHERE section = ?1;",
            self.schema.table
        );
        conn.query_row(&sql, [section], |row| Ok(self.parse_row(row)))
            .optional()?
            .transpose()
    }

    fn parse_row(&self, row: &Row<'_>) -> RepoResult<SectionContent> {
        let raw_fields: String = row.get("fields")?;
        Ok(SectionContent {
            kind: self.schema.kind,
            section: row.get("section")?,
            fields: decode_fields(self.schema.kind, &raw_fields)?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Updates or creates `section` on `conn` without opening a transaction.
    ///
    /// Returns the stored content and whether it was created.
    pub(crate) fn upsert_in(
        &self,
        conn: &Connection,
        section: &str,
        patch: &EntityPatch,
    ) -> RepoResult<(SectionContent, bool)> {
        validate_section_key(section)?;
        let outcome = match self.load(conn, section)? {
            Some(current) => {
                let fields = patch.apply_to(self.schema, &current.fields)?;
                let updated = SectionContent {
                    fields,
                    updated_at: next_updated_at(current.updated_at),
                    ..current
                };
                conn.execute(
                    &format!(
                        "UPDATE {} SET fields = ?1, updated_at = ?2 WHERE section = ?3;",
                        self.schema.table
                    ),
                    params![
                        encode_fields(&updated.fields)?,
                        updated.updated_at,
                        updated.section.as_str(),
                    ],
                )?;
                (updated, false)
            }
            None => {
                let now = now_epoch_ms();
                let content = SectionContent {
                    kind: self.schema.kind,
                    section: section.to_string(),
                    fields: patch.validate_as_new(self.schema)?,
                    created_at: now,
                    updated_at: now,
                };
                conn.execute(
                    &format!(
                        "INSERT INTO {} (section, fields, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4);",
                        self.schema.table
                    ),
                    params![
                        content.section.as_str(),
                        encode_fields(&content.fields)?,
                        content.created_at,
                        content.updated_at,
                    ],
                )?;
                (content, true)
            }
        };
        Ok(outcome)
    }

    fn not_found(&self, section: &str) -> RepoError {
        RepoError::NotFound {
            kind: self.schema.kind,
            key: section.to_string(),
        }
    }
}

impl KeyedConfigStore for SqliteKeyedConfigStore<'_> {
    fn kind(&self) -> ContentKind {
        self.schema.kind
    }

    fn get(&self, section: &str) -> RepoResult<SectionContent> {
        self.load(self.conn, section)?
            .ok_or_else(|| self.not_found(section))
    }

    fn list(&self) -> RepoResult<Vec<SectionContent>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT section, fields, created_at, updated_at FROM {} ORDER BY section ASC;",
            self.schema.table
        ))?;
        let mut rows = stmt.query([])?;
        let mut sections = Vec::new();
        while let Some(row) = rows.next()? {
            sections.push(self.parse_row(row)?);
        }
        Ok(sections)
    }

    fn upsert(&self, section: &str, patch: &EntityPatch) -> RepoResult<SectionContent> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let (content, created) = self.upsert_in(&tx, section, patch)?;
        tx.commit()?;

        info!(
            "event=section_upsert module=repo status=ok kind={} section={} created={}",
            self.schema.kind, content.section, created
        );
        Ok(content)
    }

    fn delete(&self, section: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE section = ?1;", self.schema.table),
            [section],
        )?;
        if changed == 0 {
            return Err(self.not_found(section));
        }

        info!(
            "event=section_delete module=repo status=ok kind={} section={}",
            self.schema.kind, section
        );
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", self.schema.table),
            [],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {count}")))
    }
}
