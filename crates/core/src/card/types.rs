//! Card domain types.
//!
//! The card aggregate holds the encrypted PAN only; the plaintext number
//! exists in memory just long enough to encrypt at issuance or to mask at
//! display time. The owner is referenced by id, never by an in-memory
//! pointer, so records are free of cross-entity cycles.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use cardvault_shared::types::{CardId, UserId};

/// Card status in the lifecycle state machine.
///
/// Cards start `Active`. The valid transitions are:
/// - Active → Blocked (block)
/// - Blocked → Active (activate)
/// - Active/Blocked → Expired (expire; terminal)
///
/// Blocking a blocked card and activating an active card are idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardStatus {
    /// Card may participate in transfers.
    Active,
    /// Card is temporarily blocked; it can be re-activated.
    Blocked,
    /// Card has expired. Terminal state.
    Expired,
}

impl CardStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Blocked => "BLOCKED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "BLOCKED" => Some(Self::Blocked),
            "EXPIRED" => Some(Self::Expired),
            _ => None,
        }
    }

    /// Returns true if the card may participate in transfers.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns true if no transition leaves this state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The persisted card aggregate.
///
/// `balance` is a fixed-point decimal in the single implicit currency and
/// is never negative between operations. `status` changes only through
/// [`crate::card::LifecycleService`] transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Opaque unique identifier, assigned at creation.
    pub id: CardId,
    /// Ciphertext of the 16-digit PAN; unique across all records.
    pub encrypted_pan: String,
    /// The owning user. A card has exactly one owner for its lifetime.
    pub owner_id: UserId,
    /// Calendar expiry date. Informational; the engine never transitions a
    /// card to `Expired` on its own.
    pub expiry_date: NaiveDate,
    /// Current lifecycle status.
    pub status: CardStatus,
    /// Current balance. Non-negative at every observable point.
    pub balance: Decimal,
}

/// Reference to an external user, resolved by the excluded auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// The user's identity.
    pub id: UserId,
    /// The user's display name.
    pub username: String,
}

/// Input for issuing a new card.
#[derive(Debug, Clone)]
pub struct IssueCardInput {
    /// The owning user.
    pub owner_id: UserId,
    /// Plaintext 16-digit PAN. Encrypted before the record is built.
    pub pan: String,
    /// Calendar expiry date.
    pub expiry_date: NaiveDate,
    /// Opening balance. Must be non-negative.
    pub initial_balance: Decimal,
}

/// Read projection of a card with the PAN masked.
///
/// This is the only card shape that leaves the engine for display. It
/// carries neither the plaintext nor the encrypted PAN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardDisplay {
    /// The card id.
    pub id: CardId,
    /// Masked number, e.g. `**** **** **** 3456`.
    pub masked_number: String,
    /// Username of the owning user.
    pub owner_username: String,
    /// Calendar expiry date.
    pub expiry_date: NaiveDate,
    /// Current lifecycle status.
    pub status: CardStatus,
    /// Current balance.
    pub balance: Decimal,
}
