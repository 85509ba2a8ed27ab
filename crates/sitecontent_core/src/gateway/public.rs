//! Public read surface.
//!
//! # Contract
//! - Only kinds flagged public are readable; only active entities appear.
//! - Localized fields are resolved to a single string for the requested
//!   language.
//! - Reads never fail: unknown kinds, admin-only kinds and storage failures
//!   degrade to an empty list or `None` and are logged.
//! - `submit_form` is the only write, and only for submission kinds.

use super::{resolve_kind, GatewayError, GatewayResult};
use crate::model::catalog::{ContentKind, KindSchema, StorageShape};
use crate::model::entity::EntityDraft;
use crate::repo::content_repo::ContentRepository;
use crate::repo::section_repo::KeyedConfigStore;
use crate::repo::{ReadView, RepoError, RepoResult};
use crate::service::content_service::ContentService;
use crate::service::notifier::SubmissionNotifier;
use crate::store::ContentStore;
use log::warn;
use serde_json::Value;

/// Public entry points addressed by kind slug.
pub struct PublicReadApi<'s> {
    store: &'s ContentStore,
    notifier: &'s dyn SubmissionNotifier,
}

impl<'s> PublicReadApi<'s> {
    pub fn new(store: &'s ContentStore, notifier: &'s dyn SubmissionNotifier) -> Self {
        Self { store, notifier }
    }

    /// Active entities of a list kind in presentation order.
    pub fn list(&self, kind: &str, language: &str) -> Vec<Value> {
        let Some(kind) = readable_kind("public_list", kind, StorageShape::List) else {
            return Vec::new();
        };
        let result = self.store.content(kind).and_then(|repo| repo.list(ReadView::Public));
        match result {
            Ok(entities) => entities
                .iter()
                .map(|entity| entity.to_public_json(language))
                .collect(),
            Err(err) => {
                degraded("public_list", kind, &err);
                Vec::new()
            }
        }
    }

    /// One active entity, or `None` when missing, inactive or unreadable.
    pub fn get(&self, kind: &str, id: &str, language: &str) -> Option<Value> {
        let kind = readable_kind("public_get", kind, StorageShape::List)?;
        let result = self
            .store
            .content(kind)
            .and_then(|repo| repo.get(id, ReadView::Public));
        found_or_degraded("public_get", kind, result).map(|entity| entity.to_public_json(language))
    }

    /// One section of a section-keyed kind.
    pub fn section(&self, kind: &str, section: &str, language: &str) -> Option<Value> {
        let kind = readable_kind("public_section", kind, StorageShape::Keyed)?;
        let result = self.store.sections(kind).and_then(|store| store.get(section));
        found_or_degraded("public_section", kind, result)
            .map(|content| content.to_public_json(language))
    }

    /// Every section of a section-keyed kind, ordered by key.
    pub fn sections(&self, kind: &str, language: &str) -> Vec<Value> {
        let Some(kind) = readable_kind("public_sections", kind, StorageShape::Keyed) else {
            return Vec::new();
        };
        match self.store.sections(kind).and_then(|store| store.list()) {
            Ok(sections) => sections
                .iter()
                .map(|content| content.to_public_json(language))
                .collect(),
            Err(err) => {
                degraded("public_sections", kind, &err);
                Vec::new()
            }
        }
    }

    /// Stores a public form submission and notifies.
    ///
    /// Submitters cannot pick ids; any `id` in the body is ignored.
    pub fn submit_form(&self, kind: &str, body: &Value) -> GatewayResult<Value> {
        let op = "submit_form";
        let kind = resolve_kind(op, kind)?;
        if !kind.schema().accepts_submissions {
            return Err(GatewayError::not_found(format!(
                "{kind} does not accept submissions"
            )));
        }

        let run = || -> RepoResult<Value> {
            let mut draft = EntityDraft::from_json(body)?;
            draft.id = None;
            let service = ContentService::new(self.store.content(kind)?, self.notifier);
            let stored = service.create(&draft)?;
            Ok(stored.to_json())
        };
        run().map_err(|err| GatewayError::from_repo(op, kind, err))
    }
}

fn readable_kind(op: &'static str, slug: &str, storage: StorageShape) -> Option<ContentKind> {
    let kind = resolve_kind(op, slug).ok()?;
    let schema: &KindSchema = kind.schema();
    if schema.public && schema.storage == storage {
        Some(kind)
    } else {
        warn!(
            "event=public_read module=gateway status=skipped op={} kind={} reason=not_public",
            op, kind
        );
        None
    }
}

fn found_or_degraded<T>(op: &'static str, kind: ContentKind, result: RepoResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) if err.is_not_found() => None,
        Err(err) => {
            degraded(op, kind, &err);
            None
        }
    }
}

fn degraded(op: &'static str, kind: ContentKind, err: &RepoError) {
    warn!(
        "event=public_read module=gateway status=error op={} kind={} error_code={} error={}",
        op,
        kind,
        err.code(),
        err
    );
}
