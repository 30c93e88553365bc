//! Record identifier utilities.
//!
//! Appointments and billing items are identified by a random token allocated by the caller at
//! creation time and never reassigned afterwards. To keep identifiers comparable across the
//! REST, CLI and file-backed layers, the clinic uses a *canonical* representation:
//! **32 lowercase hexadecimal characters** (no hyphens).
//!
//! This module provides a small wrapper type ([`RecordId`]) that *guarantees* the canonical
//! format once constructed.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! This is the same value you would get from `Uuid::new_v4().simple().to_string()`.
//! Externally supplied identifiers must already be canonical; use [`RecordId::parse`] to
//! validate them.

mod service;

// Re-export public types
pub use service::RecordId;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
