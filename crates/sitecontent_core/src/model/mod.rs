//! Content domain model.
//!
//! # Responsibility
//! - Define the entity catalog, localized text and record shapes used by
//!   storage and the read/write surfaces.
//!
//! # Invariants
//! - List entities are identified by an opaque id unique within their kind.
//! - Section-keyed content is identified by `(kind, section)`.
//! - Deletion is a hard delete; `is_active=false` is the soft-hide mechanism.

pub mod catalog;
pub mod entity;
pub mod localized;
