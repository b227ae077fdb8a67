//! Card error types for validation, ownership, and state errors.
//!
//! Every failure is surfaced to the immediate caller as a typed value;
//! nothing is swallowed and nothing is retried internally. Store failures
//! pass through unchanged so callers can tell a rejected request from an
//! operation whose outcome is unknown.

use rust_decimal::Decimal;
use thiserror::Error;

use cardvault_shared::error::StoreError;
use cardvault_shared::types::{CardId, UserId};

use super::codec::CodecError;
use super::types::CardStatus;

/// Errors that can occur during card operations.
#[derive(Debug, Error)]
pub enum CardError {
    // ========== Lookup Errors ==========
    /// Referenced card id does not exist.
    #[error("Card not found: {0}")]
    NotFound(CardId),

    // ========== Ownership Errors ==========
    /// The requesting user does not own the referenced card.
    #[error("User {user_id} does not own card {card_id}")]
    OwnershipViolation {
        /// The card the caller tried to use.
        card_id: CardId,
        /// The requesting user.
        user_id: UserId,
    },

    // ========== Funds Errors ==========
    /// The debit would make the balance negative.
    #[error("Insufficient funds on card {card_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// The card to be debited.
        card_id: CardId,
        /// The card's current balance.
        balance: Decimal,
        /// The requested transfer amount.
        requested: Decimal,
    },

    // ========== Lifecycle Errors ==========
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: CardStatus,
        /// The attempted target status.
        to: CardStatus,
    },

    /// A transfer leg referenced a card that is not active.
    #[error("Card {card_id} is {status}, transfers require ACTIVE")]
    CardNotActive {
        /// The offending card.
        card_id: CardId,
        /// Its current status.
        status: CardStatus,
    },

    // ========== Validation Errors ==========
    /// Initial balance at issuance cannot be negative.
    #[error("Initial balance cannot be negative: {0}")]
    NegativeInitialBalance(Decimal),

    /// Transfer amount must be positive.
    #[error("Transfer amount must be positive: {0}")]
    NonPositiveAmount(Decimal),

    /// Source and destination cards must be different.
    #[error("Cannot transfer from card {0} to itself")]
    SameCardTransfer(CardId),

    // ========== Boundary Errors ==========
    /// PAN encoding or decoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The store reported an infrastructure error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CardError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "CARD_NOT_FOUND",
            Self::OwnershipViolation { .. } => "OWNERSHIP_VIOLATION",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CardNotActive { .. } => "CARD_NOT_ACTIVE",
            Self::NegativeInitialBalance(_) => "NEGATIVE_INITIAL_BALANCE",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::SameCardTransfer(_) => "SAME_CARD_TRANSFER",
            Self::Codec(_) => "ENCODING_ERROR",
            Self::Store(err) => err.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed input
            Self::NegativeInitialBalance(_)
            | Self::NonPositiveAmount(_)
            | Self::SameCardTransfer(_)
            | Self::Codec(_) => 400,

            // 403 Forbidden - ownership errors
            Self::OwnershipViolation { .. } => 403,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 422 Unprocessable - business rule rejections
            Self::InsufficientFunds { .. }
            | Self::InvalidTransition { .. }
            | Self::CardNotActive { .. } => 422,

            Self::Store(err) => err.status_code(),
        }
    }

    /// Returns true if the outcome of the attempted operation is unknown
    /// and must be verified before any retry.
    ///
    /// Domain rejections never leave partial state; only store failures do.
    #[must_use]
    pub fn outcome_unknown(&self) -> bool {
        matches!(self, Self::Store(err) if err.outcome_unknown())
    }
}
