//! List-content repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete over one list-shaped kind.
//! - Keep SQL and JSON column encoding inside the persistence boundary.
//!
//! # Invariants
//! - `list` is ordered by `display_order ASC, created_at ASC`, ties resolved
//!   by insertion order.
//! - Public reads never return `is_active = 0` rows.
//! - `update` preserves `id`/`created_at` and strictly advances `updated_at`.
//! - Every mutation runs in an IMMEDIATE transaction, so read-modify-write
//!   on one id cannot interleave with another writer.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::catalog::{ContentKind, KindSchema, StorageShape};
use crate::model::entity::{ContentEntity, EntityDraft, EntityId, EntityPatch, ValidationError};
use crate::repo::{
    bool_to_int, decode_fields, encode_fields, ensure_table_ready, next_updated_at,
    now_epoch_ms, ReadView, RepoError, RepoResult,
};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const LIST_COLUMNS: &[&str] = &[
    "id",
    "fields",
    "display_order",
    "is_active",
    "created_at",
    "updated_at",
];

/// Repository interface for one list-shaped content kind.
pub trait ContentRepository {
    /// Kind served by this repository.
    fn kind(&self) -> ContentKind;
    /// Lists entities in presentation order.
    fn list(&self, view: ReadView) -> RepoResult<Vec<ContentEntity>>;
    /// Loads one entity; inactive entities are `NotFound` for public reads.
    fn get(&self, id: &str, view: ReadView) -> RepoResult<ContentEntity>;
    /// Validates and stores a new entity.
    fn create(&self, draft: &EntityDraft) -> RepoResult<ContentEntity>;
    /// Merges `patch` over an existing entity.
    fn update(&self, id: &str, patch: &EntityPatch) -> RepoResult<ContentEntity>;
    /// Like `update`, but fails with `Conflict` when the stored
    /// `updated_at` differs from `expected_updated_at`.
    fn update_if_unmodified(
        &self,
        id: &str,
        expected_updated_at: i64,
        patch: &EntityPatch,
    ) -> RepoResult<ContentEntity>;
    /// Removes an entity permanently.
    fn delete(&self, id: &str) -> RepoResult<()>;
    /// Number of stored entities, active or not.
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed list-content repository.
pub struct SqliteContentRepository<'conn> {
    conn: &'conn Connection,
    schema: &'static KindSchema,
}

impl<'conn> SqliteContentRepository<'conn> {
    /// Creates a repository for `kind` from a migrated connection.
    pub fn try_new(conn: &'conn Connection, kind: ContentKind) -> RepoResult<Self> {
        let schema = kind.schema();
        if schema.storage != StorageShape::List {
            return Err(RepoError::WrongStorage {
                kind,
                expected: StorageShape::List,
            });
        }
        ensure_table_ready(conn, schema.table, LIST_COLUMNS)?;
        Ok(Self { conn, schema })
    }

    fn select_sql(&self) -> String {
        format!(
            "SELECT id, fields, display_order, is_active, created_at, updated_at FROM {}",
            self.schema.table
        )
    }

    fn not_found(&self, id: &str) -> RepoError {
        RepoError::NotFound {
            kind: self.schema.kind,
            key: id.to_string(),
        }
    }

    fn load(&self, conn: &Connection, id: &str) -> RepoResult<Option<ContentEntity>> {
        let sql = format!("{} WHERE id = ?1;", self.select_sql());
        conn.query_row(&sql, [id], |row| Ok(self.parse_row(row)))
            .optional()?
            .transpose()
    }

    fn parse_row(&self, row: &Row<'_>) -> RepoResult<ContentEntity> {
        let table = self.schema.table;
        let raw_fields: String = row.get("fields")?;
        let is_active = match row.get::<_, i64>("is_active")? {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid is_active value `{other}` in {table}.is_active"
                )));
            }
        };

        Ok(ContentEntity {
            id: row.get("id")?,
            kind: self.schema.kind,
            fields: decode_fields(self.schema.kind, &raw_fields)?,
            display_order: row.get("display_order")?,
            is_active,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Validates and inserts `draft` on `conn` without opening a transaction.
    ///
    /// The caller owns the surrounding transaction.
    pub(crate) fn insert_in(
        &self,
        conn: &Connection,
        draft: &EntityDraft,
    ) -> RepoResult<ContentEntity> {
        let fields = draft.validate(self.schema)?;
        let id: EntityId = draft
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let now = now_epoch_ms();
        let entity = ContentEntity {
            id,
            kind: self.schema.kind,
            fields,
            display_order: draft.display_order.unwrap_or(0),
            is_active: draft.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        let encoded = encode_fields(&entity.fields)?;

        let exists: i64 = conn.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);",
                self.schema.table
            ),
            [entity.id.as_str()],
            |row| row.get(0),
        )?;
        if exists == 1 {
            return Err(ValidationError::DuplicateId(entity.id).into());
        }

        conn.execute(
            &format!(
                "INSERT INTO {} (
                    id,
                    fields,
                    display_order,
                    is_active,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                self.schema.table
            ),
            params![
                entity.id.as_str(),
                encoded,
                entity.display_order,
                bool_to_int(entity.is_active),
                entity.created_at,
                entity.updated_at,
            ],
        )?;
        Ok(entity)
    }

    fn write_patch(
        &self,
        id: &str,
        expected_updated_at: Option<i64>,
        patch: &EntityPatch,
    ) -> RepoResult<ContentEntity> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = self.load(&tx, id)?.ok_or_else(|| self.not_found(id))?;

        if let Some(expected) = expected_updated_at {
            if current.updated_at != expected {
                return Err(RepoError::Conflict {
                    kind: self.schema.kind,
                    id: current.id,
                    expected_updated_at: expected,
                    actual_updated_at: current.updated_at,
                });
            }
        }

        let fields = patch.apply_to(self.schema, &current.fields)?;
        let updated = ContentEntity {
            fields,
            display_order: patch.display_order.unwrap_or(current.display_order),
            is_active: patch.is_active.unwrap_or(current.is_active),
            updated_at: next_updated_at(current.updated_at),
            ..current
        };

        tx.execute(
            &format!(
                "UPDATE {}
                 SET
                    fields = ?1,
                    display_order = ?2,
                    is_active = ?3,
                    updated_at = ?4
                 WHERE id = ?5;",
                self.schema.table
            ),
            params![
                encode_fields(&updated.fields)?,
                updated.display_order,
                bool_to_int(updated.is_active),
                updated.updated_at,
                updated.id.as_str(),
            ],
        )?;
        tx.commit()?;

        info!(
            "event=content_update module=repo status=ok kind={} id={} fields={} checked={}",
            self.schema.kind,
            updated.id,
            patch.set.len() + patch.clear.len(),
            expected_updated_at.is_some()
        );
        Ok(updated)
    }
}

impl ContentRepository for SqliteContentRepository<'_> {
    fn kind(&self) -> ContentKind {
        self.schema.kind
    }

    fn list(&self, view: ReadView) -> RepoResult<Vec<ContentEntity>> {
        let sql = format!(
            "{}
             WHERE (?1 = 1 OR is_active = 1)
             ORDER BY display_order ASC, created_at ASC, rowid ASC;",
            self.select_sql()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([bool_to_int(view.includes_inactive())])?;
        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            entities.push(self.parse_row(row)?);
        }
        Ok(entities)
    }

    fn get(&self, id: &str, view: ReadView) -> RepoResult<ContentEntity> {
        match self.load(self.conn, id)? {
            Some(entity) if entity.is_active || view.includes_inactive() => Ok(entity),
            _ => Err(self.not_found(id)),
        }
    }

    fn create(&self, draft: &EntityDraft) -> RepoResult<ContentEntity> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let entity = self.insert_in(&tx, draft)?;
        tx.commit()?;

        info!(
            "event=content_create module=repo status=ok kind={} id={} caller_id={}",
            self.schema.kind,
            entity.id,
            draft.id.is_some()
        );
        Ok(entity)
    }

    fn update(&self, id: &str, patch: &EntityPatch) -> RepoResult<ContentEntity> {
        self.write_patch(id, None, patch)
    }

    fn update_if_unmodified(
        &self,
        id: &str,
        expected_updated_at: i64,
        patch: &EntityPatch,
    ) -> RepoResult<ContentEntity> {
        self.write_patch(id, Some(expected_updated_at), patch)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", self.schema.table),
            [id],
        )?;
        if changed == 0 {
            return Err(self.not_found(id));
        }

        info!(
            "event=content_delete module=repo status=ok kind={} id={}",
            self.schema.kind, id
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
