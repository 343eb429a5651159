//! Error types for the authorization store.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A mutation or listing was attempted by a non-master machine.
    #[error("permission denied: only the master machine may modify the allow-list")]
    PermissionDenied,

    /// An attempt to remove the master fingerprint.
    #[error("the master fingerprint cannot be removed")]
    ProtectedEntry,

    /// Removal target absent from the allow-list.
    #[error("fingerprint not found in allow-list: {0}")]
    NotFound(String),

    /// A malformed fingerprint string was passed to a mutation.
    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(#[from] hwgate_fingerprint::InvalidFingerprint),

    /// The allow-list could not be created or written.
    #[error("allow-list persistence error: {0}")]
    Persistence(#[from] std::io::Error),
}
