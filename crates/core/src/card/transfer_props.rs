//! Property-based tests for the transfer engine.
//!
//! - Conservation: the sum of the two balances is unchanged by a transfer
//! - Non-negativity: no validated transfer leaves a negative balance
//! - Funds check: validation accepts exactly the amounts the source covers
//! - Ownership and status checks hold for arbitrary balances

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use cardvault_shared::types::{CardId, UserId};

use super::error::CardError;
use super::transfer::TransferEngine;
use super::types::{CardRecord, CardStatus};

/// Strategy for balances (0.00 to 10,000.00).
fn balance_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for positive transfer amounts (0.01 to 10,000.00).
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for non-active statuses.
fn inactive_status() -> impl Strategy<Value = CardStatus> {
    prop_oneof![Just(CardStatus::Blocked), Just(CardStatus::Expired)]
}

fn make_card(owner: UserId, balance: Decimal, status: CardStatus) -> CardRecord {
    CardRecord {
        id: CardId::new(),
        encrypted_pan: "k1:cGFu".to_string(),
        owner_id: owner,
        expiry_date: NaiveDate::from_ymd_opt(2028, 12, 31).unwrap(),
        status,
        balance,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* valid transfer, the sum of the two balances before SHALL
    /// equal the sum after.
    #[test]
    fn prop_conservation(
        from_balance in balance_strategy(),
        to_balance in balance_strategy(),
        amount in amount_strategy(),
    ) {
        let owner = UserId::new();
        let mut from = make_card(owner, from_balance, CardStatus::Active);
        let mut to = make_card(owner, to_balance, CardStatus::Active);
        let total = from.balance + to.balance;

        if TransferEngine::validate(&from, &to, amount, owner).is_ok() {
            TransferEngine::apply(&mut from, &mut to, amount);
            prop_assert_eq!(from.balance + to.balance, total);
        }
    }

    /// No validated transfer SHALL leave either balance negative.
    #[test]
    fn prop_non_negativity(
        from_balance in balance_strategy(),
        to_balance in balance_strategy(),
        amount in amount_strategy(),
    ) {
        let owner = UserId::new();
        let mut from = make_card(owner, from_balance, CardStatus::Active);
        let mut to = make_card(owner, to_balance, CardStatus::Active);

        if TransferEngine::validate(&from, &to, amount, owner).is_ok() {
            TransferEngine::apply(&mut from, &mut to, amount);
            prop_assert!(from.balance >= Decimal::ZERO);
            prop_assert!(to.balance >= Decimal::ZERO);
        }
    }

    /// Validation SHALL accept a transfer between two active cards of one
    /// owner exactly when the source balance covers the amount.
    #[test]
    fn prop_funds_check_is_exact(
        from_balance in balance_strategy(),
        amount in amount_strategy(),
    ) {
        let owner = UserId::new();
        let from = make_card(owner, from_balance, CardStatus::Active);
        let to = make_card(owner, Decimal::ZERO, CardStatus::Active);

        let result = TransferEngine::validate(&from, &to, amount, owner);
        if amount <= from_balance {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(matches!(result, Err(CardError::InsufficientFunds { .. })), "expected InsufficientFunds");
        }
    }

    /// A requesting user who owns neither or only one card SHALL always
    /// get an ownership violation, regardless of balances.
    #[test]
    fn prop_ownership_enforced(
        from_balance in balance_strategy(),
        to_balance in balance_strategy(),
        amount in amount_strategy(),
    ) {
        let owner = UserId::new();
        let stranger = UserId::new();
        let from = make_card(stranger, from_balance, CardStatus::Active);
        let to = make_card(owner, to_balance, CardStatus::Active);

        let result = TransferEngine::validate(&from, &to, amount, owner);
        prop_assert!(matches!(result, Err(CardError::OwnershipViolation { .. })), "expected OwnershipViolation");
    }

    /// A non-active card on either leg SHALL always reject the transfer.
    #[test]
    fn prop_inactive_card_rejected(
        from_balance in balance_strategy(),
        amount in amount_strategy(),
        status in inactive_status(),
    ) {
        let owner = UserId::new();
        let from = make_card(owner, from_balance, status);
        let to = make_card(owner, Decimal::ZERO, CardStatus::Active);

        let result = TransferEngine::validate(&from, &to, amount, owner);
        prop_assert!(matches!(result, Err(CardError::CardNotActive { .. })), "expected CardNotActive");
    }
}
