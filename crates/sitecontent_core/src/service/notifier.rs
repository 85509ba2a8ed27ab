//! Submission notification boundary.
//!
//! # Responsibility
//! - Define the contract used to announce new form submissions (contact
//!   messages, demo requests, job applications).
//! - Provide log-only and no-op implementations; outbound email transport
//!   lives outside this crate behind the same trait.
//!
//! # Invariants
//! - Notification is best-effort: a failure never undoes the stored write.
//! - Implementations must not log submitted text, only metadata.

use crate::config::CoreConfig;
use crate::model::entity::ContentEntity;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Notifier failure, reported by transports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyError(pub String);

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "notification failed: {}", self.0)
    }
}

impl Error for NotifyError {}

/// Receives freshly stored submissions.
pub trait SubmissionNotifier {
    fn notify(&self, submission: &ContentEntity) -> Result<(), NotifyError>;
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl SubmissionNotifier for NoopNotifier {
    fn notify(&self, _submission: &ContentEntity) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Records a `submission_notify` log event per submission.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    recipient: String,
}

impl LogNotifier {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }
}

impl SubmissionNotifier for LogNotifier {
    fn notify(&self, submission: &ContentEntity) -> Result<(), NotifyError> {
        if self.recipient.trim().is_empty() {
            return Err(NotifyError("recipient is empty".to_string()));
        }
        info!(
            "event=submission_notify module=service status=ok kind={} id={} recipient={}",
            submission.kind, submission.id, self.recipient
        );
        Ok(())
    }
}

/// Picks the notifier for `config`: logging when a recipient is set.
pub fn notifier_for(config: &CoreConfig) -> Box<dyn SubmissionNotifier> {
    match config.notification_recipient.as_deref() {
        Some(recipient) => Box::new(LogNotifier::new(recipient)),
        None => Box::new(NoopNotifier),
    }
}
