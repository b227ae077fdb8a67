//! The persistence contract the card engine depends on.
//!
//! Implementations live outside this crate (an in-memory reference store
//! ships in `cardvault-store`; a production deployment would back this with
//! a database). The store is the single serialization point for individual
//! reads and writes; multi-record atomicity is the service's job.

use async_trait::async_trait;

use cardvault_shared::error::StoreResult;
use cardvault_shared::types::{CardId, PageRequest, UserId};

use super::types::CardRecord;

/// Lookup and persistence of card records.
///
/// All errors are infrastructure errors ([`cardvault_shared::StoreError`]);
/// "not found" is an `Ok(None)`, not an error, so the engine decides what a
/// missing record means.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Looks up a card by id.
    async fn find_by_id(&self, id: CardId) -> StoreResult<Option<CardRecord>>;

    /// Looks up a card by its stored (encrypted) PAN.
    async fn find_by_encrypted_pan(&self, encrypted_pan: &str) -> StoreResult<Option<CardRecord>>;

    /// Returns one page of a user's cards plus the total count across all
    /// pages, in a stable id order.
    async fn find_all_by_owner(
        &self,
        owner_id: UserId,
        page: &PageRequest,
    ) -> StoreResult<(Vec<CardRecord>, u64)>;

    /// Inserts or updates a card, returning the persisted form.
    async fn save(&self, card: CardRecord) -> StoreResult<CardRecord>;

    /// Deletes a card. Deleting an absent id is not an error.
    async fn delete(&self, id: CardId) -> StoreResult<()>;
}
