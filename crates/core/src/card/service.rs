//! Card service: orchestrates store reads/writes around the pure logic.
//!
//! This is the only component that mutates persisted cards. Lifecycle
//! updates and transfers run under per-card locks so their read-modify-
//! write windows are serializable with respect to each other; the transfer
//! path additionally compensates a written debit leg if the credit leg
//! fails to persist, so a partial transfer is never observable.

use rust_decimal::Decimal;
use tracing::{error, info};

use cardvault_shared::types::{CardId, PageRequest, PageResponse, UserId};

use super::codec::{mask, PanCodec};
use super::error::CardError;
use super::lifecycle::LifecycleService;
use super::locks::CardLocks;
use super::store::CardStore;
use super::transfer::{ensure_owned_by, TransferEngine};
use super::types::{CardDisplay, CardRecord, CardStatus, IssueCardInput, UserRef};

/// Card issuing, lifecycle, display, and transfer operations over a
/// [`CardStore`].
pub struct CardService<S> {
    store: S,
    codec: PanCodec,
    locks: CardLocks,
}

impl<S: CardStore> CardService<S> {
    /// Creates a service over a store and a PAN codec.
    pub fn new(store: S, codec: PanCodec) -> Self {
        Self {
            store,
            codec,
            locks: CardLocks::new(),
        }
    }

    /// Issues a new card with the given opening balance.
    ///
    /// The PAN is encrypted before the record exists; status is forced to
    /// `ACTIVE`; the id is assigned here and never changes.
    ///
    /// # Errors
    ///
    /// `CardError::Codec` for a malformed PAN,
    /// `CardError::NegativeInitialBalance` for a negative opening balance.
    pub async fn issue_card(&self, input: IssueCardInput) -> Result<CardRecord, CardError> {
        if input.initial_balance < Decimal::ZERO {
            return Err(CardError::NegativeInitialBalance(input.initial_balance));
        }

        let encrypted_pan = self.codec.encrypt(&input.pan)?;
        let card = CardRecord {
            id: CardId::new(),
            encrypted_pan,
            owner_id: input.owner_id,
            expiry_date: input.expiry_date,
            status: CardStatus::Active,
            balance: input.initial_balance,
        };

        let saved = self.store.save(card).await?;
        info!(card_id = %saved.id, owner_id = %saved.owner_id, "card issued");
        Ok(saved)
    }

    /// Looks up a card by id.
    pub async fn get_card(&self, id: CardId) -> Result<Option<CardRecord>, CardError> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Blocks a card.
    ///
    /// # Errors
    ///
    /// `CardError::NotFound` or `CardError::InvalidTransition`.
    pub async fn block_card(&self, id: CardId) -> Result<CardRecord, CardError> {
        self.apply_transition(id, LifecycleService::block).await
    }

    /// Activates a blocked card.
    ///
    /// # Errors
    ///
    /// `CardError::NotFound` or `CardError::InvalidTransition`.
    pub async fn activate_card(&self, id: CardId) -> Result<CardRecord, CardError> {
        self.apply_transition(id, LifecycleService::activate).await
    }

    /// Expires a card. Invoked by a caller-side scheduler once the card's
    /// `expiry_date` has passed; the engine never expires cards on its own.
    ///
    /// # Errors
    ///
    /// `CardError::NotFound`.
    pub async fn expire_card(&self, id: CardId) -> Result<CardRecord, CardError> {
        self.apply_transition(id, |status| Ok(LifecycleService::expire(status)))
            .await
    }

    async fn apply_transition<F>(&self, id: CardId, transition: F) -> Result<CardRecord, CardError>
    where
        F: FnOnce(CardStatus) -> Result<CardStatus, CardError>,
    {
        let _guard = self.locks.lock(id).await;

        let mut card = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(CardError::NotFound(id))?;

        let new_status = transition(card.status)?;
        if new_status == card.status {
            // Idempotent re-application; nothing to persist.
            return Ok(card);
        }

        card.status = new_status;
        let saved = self.store.save(card).await?;
        info!(card_id = %saved.id, status = %saved.status, "card status changed");
        Ok(saved)
    }

    /// Moves `amount` from one card to another card of the same owner.
    ///
    /// Both per-card locks are held (ascending id order) for the whole
    /// read-validate-write window. Callers needing post-transfer balances
    /// re-query; this returns nothing on success.
    ///
    /// # Errors
    ///
    /// `CardError::NonPositiveAmount`, `CardError::SameCardTransfer`,
    /// `CardError::NotFound`, `CardError::OwnershipViolation`,
    /// `CardError::CardNotActive`, `CardError::InsufficientFunds`, or a
    /// store error (outcome unknown; verify before retrying).
    pub async fn transfer(
        &self,
        from_id: CardId,
        to_id: CardId,
        amount: Decimal,
        requesting_user: UserId,
    ) -> Result<(), CardError> {
        if amount <= Decimal::ZERO {
            return Err(CardError::NonPositiveAmount(amount));
        }
        if from_id == to_id {
            return Err(CardError::SameCardTransfer(from_id));
        }

        let _guards = self.locks.lock_pair(from_id, to_id).await;

        let mut from = self
            .store
            .find_by_id(from_id)
            .await?
            .ok_or(CardError::NotFound(from_id))?;
        let mut to = self
            .store
            .find_by_id(to_id)
            .await?
            .ok_or(CardError::NotFound(to_id))?;

        TransferEngine::validate(&from, &to, amount, requesting_user)?;

        let from_before = from.clone();
        TransferEngine::apply(&mut from, &mut to, amount);

        self.store.save(from).await?;
        if let Err(save_err) = self.store.save(to).await {
            // The debit leg is already durable; restore it so no partial
            // transfer is ever observable.
            if let Err(restore_err) = self.store.save(from_before).await {
                error!(
                    card_id = %from_id,
                    error = %restore_err,
                    "failed to restore debit leg of aborted transfer"
                );
            }
            return Err(save_err.into());
        }

        info!(from = %from_id, to = %to_id, %amount, "transfer committed");
        Ok(())
    }

    /// Returns the current balance of a card the requesting user owns.
    ///
    /// # Errors
    ///
    /// `CardError::NotFound` or `CardError::OwnershipViolation`.
    pub async fn get_balance(
        &self,
        card_id: CardId,
        requesting_user: UserId,
    ) -> Result<Decimal, CardError> {
        let card = self
            .store
            .find_by_id(card_id)
            .await?
            .ok_or(CardError::NotFound(card_id))?;
        ensure_owned_by(&card, requesting_user)?;
        Ok(card.balance)
    }

    /// Removes a card.
    ///
    /// # Errors
    ///
    /// `CardError::NotFound` if the id does not resolve.
    pub async fn delete_card(&self, id: CardId) -> Result<(), CardError> {
        let _guard = self.locks.lock(id).await;

        self.store
            .find_by_id(id)
            .await?
            .ok_or(CardError::NotFound(id))?;
        self.store.delete(id).await?;
        info!(card_id = %id, "card deleted");
        Ok(())
    }

    /// Lists one page of a user's cards as display projections.
    pub async fn list_cards(
        &self,
        owner: &UserRef,
        page: &PageRequest,
    ) -> Result<PageResponse<CardDisplay>, CardError> {
        let (cards, total) = self.store.find_all_by_owner(owner.id, page).await?;

        let mut data = Vec::with_capacity(cards.len());
        for card in &cards {
            data.push(self.to_display(card, owner)?);
        }

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Builds the display projection of a card: PAN decrypted then masked,
    /// never exposed in either stored or plaintext form.
    ///
    /// # Errors
    ///
    /// `CardError::Codec` if the stored ciphertext cannot be decrypted.
    pub fn to_display(&self, card: &CardRecord, owner: &UserRef) -> Result<CardDisplay, CardError> {
        let pan = self.codec.decrypt(&card.encrypted_pan)?;
        Ok(CardDisplay {
            id: card.id,
            masked_number: mask(&pan)?,
            owner_username: owner.username.clone(),
            expiry_date: card.expiry_date,
            status: card.status,
            balance: card.balance,
        })
    }
}
