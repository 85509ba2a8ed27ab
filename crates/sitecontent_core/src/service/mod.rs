//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own best-effort side effects (submission notification) around writes.

pub mod content_service;
pub mod notifier;
