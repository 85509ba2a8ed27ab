//! Core content storage for a multilingual corporate site.
//! This crate is the single source of truth for catalog and content invariants.

pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig, DatabaseLocation};
pub use gateway::{AdminGateway, GatewayError, GatewayResult, PublicReadApi};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::catalog::{ContentKind, FieldType, KindSchema, StorageShape, ALL_KINDS};
pub use model::entity::{
    ContentEntity, EntityDraft, EntityId, EntityPatch, FieldValue, SectionContent,
    ValidationError,
};
pub use model::localized::{resolve, LocalizedText, DEFAULT_LANGUAGE};
pub use repo::content_repo::{ContentRepository, SqliteContentRepository};
pub use repo::section_repo::{KeyedConfigStore, SqliteKeyedConfigStore};
pub use repo::{ReadView, RepoError, RepoResult};
pub use seed::{seed_defaults, SeedOutcome, SeedReport};
pub use service::content_service::ContentService;
pub use service::notifier::{
    notifier_for, LogNotifier, NoopNotifier, NotifyError, SubmissionNotifier,
};
pub use store::{ContentStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
