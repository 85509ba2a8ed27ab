//! Admin gateway: full CRUD over every kind.
//!
//! # Contract
//! - Callers are already authenticated; this layer performs no auth.
//! - Reads include inactive entities.
//! - Bodies are JSON objects in the camelCase wire shape; responses use the
//!   admin JSON shape with every language of every localized field.

use super::{resolve_kind, GatewayError, GatewayResult};
use crate::model::entity::{EntityDraft, EntityPatch};
use crate::repo::content_repo::SqliteContentRepository;
use crate::repo::section_repo::{KeyedConfigStore, SqliteKeyedConfigStore};
use crate::repo::{ReadView, RepoResult};
use crate::service::content_service::ContentService;
use crate::service::notifier::SubmissionNotifier;
use crate::store::ContentStore;
use serde_json::Value;

/// Admin entry points addressed by kind slug.
pub struct AdminGateway<'s> {
    store: &'s ContentStore,
    notifier: &'s dyn SubmissionNotifier,
}

impl<'s> AdminGateway<'s> {
    pub fn new(store: &'s ContentStore, notifier: &'s dyn SubmissionNotifier) -> Self {
        Self { store, notifier }
    }

    /// Every entity of a list kind, inactive ones included.
    pub fn list(&self, kind: &str) -> GatewayResult<Vec<Value>> {
        self.with_service("list", kind, |service| {
            Ok(service
                .list_admin()?
                .iter()
                .map(|entity| entity.to_json())
                .collect())
        })
    }

    pub fn get(&self, kind: &str, id: &str) -> GatewayResult<Value> {
        self.with_service("get", kind, |service| {
            Ok(service.get(id, ReadView::Admin)?.to_json())
        })
    }

    /// Creates an entity from a JSON body; responds with the stored entity.
    pub fn create(&self, kind: &str, body: &Value) -> GatewayResult<Value> {
        self.with_service("create", kind, |service| {
            let draft = EntityDraft::from_json(body)?;
            Ok(service.create(&draft)?.to_json())
        })
    }

    /// Applies a partial update; `null` values clear optional fields.
    pub fn update(&self, kind: &str, id: &str, body: &Value) -> GatewayResult<Value> {
        self.with_service("update", kind, |service| {
            let patch = EntityPatch::from_json(body)?;
            Ok(service.update(id, &patch)?.to_json())
        })
    }

    /// Like `update`, answering `409` when `updatedAt` moved on.
    pub fn update_if_unmodified(
        &self,
        kind: &str,
        id: &str,
        expected_updated_at: i64,
        body: &Value,
    ) -> GatewayResult<Value> {
        self.with_service("update", kind, |service| {
            let patch = EntityPatch::from_json(body)?;
            Ok(service
                .update_if_unmodified(id, expected_updated_at, &patch)?
                .to_json())
        })
    }

    pub fn delete(&self, kind: &str, id: &str) -> GatewayResult<()> {
        self.with_service("delete", kind, |service| service.delete(id))
    }

    /// Every stored section of a section-keyed kind, ordered by key.
    pub fn list_sections(&self, kind: &str) -> GatewayResult<Vec<Value>> {
        self.with_sections("list_sections", kind, |store| {
            Ok(store
                .list()?
                .iter()
                .map(|section| section.to_json())
                .collect())
        })
    }

    pub fn get_section(&self, kind: &str, section: &str) -> GatewayResult<Value> {
        self.with_sections("get_section", kind, |store| {
            Ok(store.get(section)?.to_json())
        })
    }

    /// Updates the section, creating it when missing.
    pub fn upsert_section(&self, kind: &str, section: &str, body: &Value) -> GatewayResult<Value> {
        self.with_sections("upsert_section", kind, |store| {
            let patch = EntityPatch::from_json(body)?;
            Ok(store.upsert(section, &patch)?.to_json())
        })
    }

    pub fn delete_section(&self, kind: &str, section: &str) -> GatewayResult<()> {
        self.with_sections("delete_section", kind, |store| store.delete(section))
    }

    fn with_service<T>(
        &self,
        op: &'static str,
        slug: &str,
        f: impl FnOnce(&ContentService<'_, SqliteContentRepository<'_>>) -> RepoResult<T>,
    ) -> GatewayResult<T> {
        let kind = resolve_kind(op, slug)?;
        let run = || -> RepoResult<T> {
            let repo = self.store.content(kind)?;
            let service = ContentService::new(repo, self.notifier);
            f(&service)
        };
        run().map_err(|err| GatewayError::from_repo(op, kind, err))
    }

    fn with_sections<T>(
        &self,
        op: &'static str,
        slug: &str,
        f: impl FnOnce(&SqliteKeyedConfigStore<'_>) -> RepoResult<T>,
    ) -> GatewayResult<T> {
        let kind = resolve_kind(op, slug)?;
        let run = || -> RepoResult<T> {
            let store = self.store.sections(kind)?;
            f(&store)
        };
        run().map_err(|err| GatewayError::from_repo(op, kind, err))
    }
}
