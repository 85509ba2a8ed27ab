//! List-content use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points over one list kind's repository.
//! - Fire the submission notifier after form submissions are stored.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Notifier failures are logged and swallowed; `create` still succeeds.
//! - Service layer remains storage-agnostic.

use crate::model::catalog::ContentKind;
use crate::model::entity::{ContentEntity, EntityDraft, EntityPatch};
use crate::repo::content_repo::ContentRepository;
use crate::repo::{ReadView, RepoResult};
use crate::service::notifier::SubmissionNotifier;
use log::warn;

/// Use-case service wrapper for one list kind.
pub struct ContentService<'n, R: ContentRepository> {
    repo: R,
    notifier: &'n dyn SubmissionNotifier,
}

impl<'n, R: ContentRepository> ContentService<'n, R> {
    /// Creates a service over `repo`, announcing submissions to `notifier`.
    pub fn new(repo: R, notifier: &'n dyn SubmissionNotifier) -> Self {
        Self { repo, notifier }
    }

    pub fn kind(&self) -> ContentKind {
        self.repo.kind()
    }

    /// Lists every entity, inactive ones included.
    pub fn list_admin(&self) -> RepoResult<Vec<ContentEntity>> {
        self.repo.list(ReadView::Admin)
    }

    /// Lists active entities only.
    pub fn list_public(&self) -> RepoResult<Vec<ContentEntity>> {
        self.repo.list(ReadView::Public)
    }

    pub fn get(&self, id: &str, view: ReadView) -> RepoResult<ContentEntity> {
        self.repo.get(id, view)
    }

    /// Stores a new entity and, for submission kinds, notifies.
    ///
    /// # Contract
    /// - The notifier runs only after the write committed.
    /// - Notifier errors never surface to the caller.
    pub fn create(&self, draft: &EntityDraft) -> RepoResult<ContentEntity> {
        let entity = self.repo.create(draft)?;
        if entity.kind.schema().notify_on_create {
            if let Err(err) = self.notifier.notify(&entity) {
                warn!(
                    "event=submission_notify module=service status=error kind={} id={} error={}",
                    entity.kind, entity.id, err
                );
            }
        }
        Ok(entity)
    }

    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update(&self, id: &str, patch: &EntityPatch) -> RepoResult<ContentEntity> {
        self.repo.update(id, patch)
    }

    pub fn update_if_unmodified(
        &self,
        id: &str,
        expected_updated_at: i64,
        patch: &EntityPatch,
    ) -> RepoResult<ContentEntity> {
        self.repo
            .update_if_unmodified(id, expected_updated_at, patch)
    }

    /// Soft-hides or re-shows an entity.
    pub fn set_active(&self, id: &str, is_active: bool) -> RepoResult<ContentEntity> {
        self.repo.update(id, &EntityPatch::new().active(is_active))
    }

    /// Assigns `display_order = position` following `ids`.
    ///
    /// Each id is updated independently; a missing id stops the pass with
    /// `NotFound` and earlier updates stay applied.
    pub fn reorder(&self, ids: &[&str]) -> RepoResult<Vec<ContentEntity>> {
        let mut reordered = Vec::with_capacity(ids.len());
        for (position, id) in ids.iter().enumerate() {
            let order = i64::try_from(position).unwrap_or(i64::MAX);
            reordered.push(
                self.repo
                    .update(id, &EntityPatch::new().display_order(order))?,
            );
        }
        Ok(reordered)
    }

    pub fn delete(&self, id: &str) -> RepoResult<()> {
        self.repo.delete(id)
    }
}
