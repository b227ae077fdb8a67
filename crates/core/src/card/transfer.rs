//! Ownership, status, and funds validation for card-to-card transfers.
//!
//! This is the pure half of the transfer engine: given two loaded card
//! records it decides whether a transfer may proceed and applies the
//! two-leg balance update. Loading, locking, and persistence live in
//! [`crate::card::CardService`].

use rust_decimal::Decimal;

use cardvault_shared::types::UserId;

use super::error::CardError;
use super::types::CardRecord;

/// Stateless transfer validation and application.
pub struct TransferEngine;

impl TransferEngine {
    /// Validates a transfer of `amount` from `from` to `to` on behalf of
    /// `requesting_user`.
    ///
    /// Checks, in order:
    /// 1. Both cards are owned by the requesting user. Third-party
    ///    transfers are not supported.
    /// 2. Both cards are `ACTIVE`.
    /// 3. The source card covers the amount.
    ///
    /// # Errors
    ///
    /// `CardError::OwnershipViolation`, `CardError::CardNotActive`, or
    /// `CardError::InsufficientFunds` for the first failed check.
    pub fn validate(
        from: &CardRecord,
        to: &CardRecord,
        amount: Decimal,
        requesting_user: UserId,
    ) -> Result<(), CardError> {
        ensure_owned_by(from, requesting_user)?;
        ensure_owned_by(to, requesting_user)?;

        for card in [from, to] {
            if !card.status.is_active() {
                return Err(CardError::CardNotActive {
                    card_id: card.id,
                    status: card.status,
                });
            }
        }

        if from.balance < amount {
            return Err(CardError::InsufficientFunds {
                card_id: from.id,
                balance: from.balance,
                requested: amount,
            });
        }

        Ok(())
    }

    /// Applies the two-leg balance update.
    ///
    /// Must only be called after [`TransferEngine::validate`] succeeded;
    /// the debit then cannot take the source balance below zero, and the
    /// sum of both balances is unchanged.
    pub fn apply(from: &mut CardRecord, to: &mut CardRecord, amount: Decimal) {
        from.balance -= amount;
        to.balance += amount;
    }
}

/// Validates that `user` owns `card`.
///
/// # Errors
///
/// Returns `CardError::OwnershipViolation` otherwise.
pub fn ensure_owned_by(card: &CardRecord, user: UserId) -> Result<(), CardError> {
    if card.owner_id == user {
        Ok(())
    } else {
        Err(CardError::OwnershipViolation {
            card_id: card.id,
            user_id: user,
        })
    }
}
