//! Infrastructure error types for the store boundary.
//!
//! Domain errors live next to the domain logic in `cardvault-core`. The
//! types here cover the persistence boundary only: a `StoreError` means the
//! outcome of the attempted write is unknown to the caller, who must verify
//! the persisted state before retrying. Funds operations are never retried
//! blindly.

use thiserror::Error;

/// Result type alias using `StoreError`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a `CardStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (e.g. duplicate encrypted PAN).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing store is temporarily unreachable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The backing store reported an error.
    #[error("Store error: {0}")]
    Database(String),
}

impl StoreError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Conflict(_) => 409,
            Self::Unavailable(_) => 503,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "CONFLICT",
            Self::Unavailable(_) => "STORE_UNAVAILABLE",
            Self::Database(_) => "STORE_ERROR",
        }
    }

    /// Returns true if the outcome of the attempted operation is unknown.
    ///
    /// Callers must re-query persisted state before retrying such an
    /// operation.
    #[must_use]
    pub const fn outcome_unknown(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Database(_))
    }
}
