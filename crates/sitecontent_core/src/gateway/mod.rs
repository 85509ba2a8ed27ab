//! JSON-in/JSON-out boundaries over the content store.
//!
//! # Responsibility
//! - Address kinds by slug and translate payloads to drafts and patches.
//! - Map repository errors to HTTP-shaped statuses for the admin surface.
//! - Serve active, language-resolved content to the public surface.
//!
//! # Invariants
//! - Internal failures (database, corrupt rows) never leak their message;
//!   callers see a generic `500`.
//! - Gateways never touch SQL directly; every call goes through a
//!   repository obtained from the `ContentStore`.

pub mod admin;
pub mod public;

use crate::model::catalog::ContentKind;
use crate::repo::RepoError;
use log::{error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use admin::AdminGateway;
pub use public::PublicReadApi;

pub type GatewayResult<T> = Result<T, GatewayError>;

pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_CONFLICT: u16 = 409;
pub const STATUS_INTERNAL: u16 = 500;

const INTERNAL_MESSAGE: &str = "internal error";

/// HTTP-shaped failure returned by gateway calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    pub status: u16,
    pub message: String,
}

impl GatewayError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(STATUS_NOT_FOUND, message)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Maps a repository error and records a `gateway_error` event.
    ///
    /// `NotFound` and `WrongStorage` become `404`, `Validation` `400`,
    /// `Conflict` `409`; everything else is a `500` with a generic message.
    pub fn from_repo(op: &'static str, kind: ContentKind, err: RepoError) -> Self {
        let status = match &err {
            RepoError::NotFound { .. } | RepoError::WrongStorage { .. } => STATUS_NOT_FOUND,
            RepoError::Validation(_) => STATUS_BAD_REQUEST,
            RepoError::Conflict { .. } => STATUS_CONFLICT,
            RepoError::Db(_)
            | RepoError::InvalidData(_)
            | RepoError::MissingRequiredTable(_)
            | RepoError::MissingRequiredColumn { .. } => STATUS_INTERNAL,
        };

        if status == STATUS_INTERNAL {
            error!(
                "event=gateway_error module=gateway status=error op={} kind={} http_status={} error_code={} error={}",
                op,
                kind,
                status,
                err.code(),
                err
            );
            return Self::new(status, INTERNAL_MESSAGE);
        }

        warn!(
            "event=gateway_error module=gateway status=error op={} kind={} http_status={} error_code={}",
            op,
            kind,
            status,
            err.code()
        );
        Self::new(status, err.to_string())
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

impl Error for GatewayError {}

/// Resolves a kind slug, answering `404` for unknown slugs.
pub(crate) fn resolve_kind(op: &'static str, slug: &str) -> GatewayResult<ContentKind> {
    ContentKind::parse(slug).ok_or_else(|| {
        warn!(
            "event=gateway_error module=gateway status=error op={} http_status={} error_code=unknown_kind",
            op, STATUS_NOT_FOUND
        );
        GatewayError::not_found(format!("unknown content kind `{slug}`"))
    })
}

#[cfg(test)]
mod tests {
    use super::{resolve_kind, GatewayError, STATUS_BAD_REQUEST, STATUS_INTERNAL};
    use crate::model::catalog::ContentKind;
    use crate::model::entity::ValidationError;
    use crate::repo::RepoError;

    #[test]
    fn internal_errors_hide_their_message() {
        let err = GatewayError::from_repo(
            "list",
            ContentKind::TeamMember,
            RepoError::InvalidData("team_members.fields is not JSON".to_string()),
        );
        assert_eq!(err.status, STATUS_INTERNAL);
        assert!(!err.message.contains("team_members"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn validation_errors_keep_their_message() {
        let err = GatewayError::from_repo(
            "create",
            ContentKind::CompanyValue,
            RepoError::Validation(ValidationError::PayloadNotObject),
        );
        assert_eq!(err.status, STATUS_BAD_REQUEST);
        assert_eq!(err.message, "payload must be a JSON object");
    }

    #[test]
    fn resolve_kind_accepts_dashed_slugs() {
        assert_eq!(
            resolve_kind("list", "faq-items").unwrap(),
            ContentKind::FaqItem
        );
        assert_eq!(resolve_kind("list", "gadgets").unwrap_err().status, 404);
    }
}
