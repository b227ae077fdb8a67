//! Status transition logic for the card lifecycle.
//!
//! Cards start `Active`; `Expired` is terminal. Re-applying a transition a
//! card has already taken is idempotent, never an error.

use super::error::CardError;
use super::types::CardStatus;

/// Stateless service for card status transitions.
///
/// All methods are associated functions that validate a transition from
/// the current status and return the resulting status. Persistence is the
/// caller's job; no other code path may change a card's status.
pub struct LifecycleService;

impl LifecycleService {
    /// Blocks a card.
    ///
    /// # Errors
    ///
    /// Returns `CardError::InvalidTransition` if the card is `Expired`.
    /// Blocking an already-blocked card is idempotent.
    pub fn block(current: CardStatus) -> Result<CardStatus, CardError> {
        match current {
            CardStatus::Active | CardStatus::Blocked => Ok(CardStatus::Blocked),
            CardStatus::Expired => Err(CardError::InvalidTransition {
                from: current,
                to: CardStatus::Blocked,
            }),
        }
    }

    /// Activates a blocked card.
    ///
    /// # Errors
    ///
    /// Returns `CardError::InvalidTransition` if the card is `Expired`.
    /// Activating an already-active card is idempotent.
    pub fn activate(current: CardStatus) -> Result<CardStatus, CardError> {
        match current {
            CardStatus::Blocked | CardStatus::Active => Ok(CardStatus::Active),
            CardStatus::Expired => Err(CardError::InvalidTransition {
                from: current,
                to: CardStatus::Active,
            }),
        }
    }

    /// Expires a card.
    ///
    /// Allowed from every state and idempotent on `Expired`. The engine
    /// never calls this on its own; a caller-side scheduler decides when a
    /// card's `expiry_date` has passed.
    #[must_use]
    pub fn expire(_current: CardStatus) -> CardStatus {
        CardStatus::Expired
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions (idempotent self-transitions included):
    /// - Active → Blocked (block)
    /// - Blocked → Active (activate)
    /// - any → Expired (expire)
    #[must_use]
    pub fn can_transition(from: CardStatus, to: CardStatus) -> bool {
        match (from, to) {
            (_, CardStatus::Expired) => true,
            (CardStatus::Expired, _) => false,
            (CardStatus::Active | CardStatus::Blocked, CardStatus::Active | CardStatus::Blocked) => {
                true
            }
        }
    }
}
