//! In-memory card store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use cardvault_core::card::{CardRecord, CardStore};
use cardvault_shared::error::{StoreError, StoreResult};
use cardvault_shared::types::{CardId, PageRequest, UserId};

/// A thread-safe in-memory store for card records.
///
/// Reference implementation of [`CardStore`] for tests and local runs.
/// Uniqueness of the stored PAN ciphertext is enforced on save, mirroring
/// the unique column a database-backed store would declare. Owner listings
/// are returned in ascending id order, which for v7 ids is issuance order.
#[derive(Debug, Default, Clone)]
pub struct MemoryCardStore {
    cards: Arc<RwLock<HashMap<CardId, CardRecord>>>,
}

impl MemoryCardStore {
    /// Creates a new, empty in-memory card store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored cards.
    pub async fn len(&self) -> usize {
        self.cards.read().await.len()
    }

    /// Returns true if no cards are stored.
    pub async fn is_empty(&self) -> bool {
        self.cards.read().await.is_empty()
    }
}

#[async_trait]
impl CardStore for MemoryCardStore {
    async fn find_by_id(&self, id: CardId) -> StoreResult<Option<CardRecord>> {
        Ok(self.cards.read().await.get(&id).cloned())
    }

    async fn find_by_encrypted_pan(&self, encrypted_pan: &str) -> StoreResult<Option<CardRecord>> {
        Ok(self
            .cards
            .read()
            .await
            .values()
            .find(|card| card.encrypted_pan == encrypted_pan)
            .cloned())
    }

    async fn find_all_by_owner(
        &self,
        owner_id: UserId,
        page: &PageRequest,
    ) -> StoreResult<(Vec<CardRecord>, u64)> {
        let cards = self.cards.read().await;
        let mut owned: Vec<CardRecord> = cards
            .values()
            .filter(|card| card.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|card| card.id);

        let total = owned.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items = owned.into_iter().skip(offset).take(limit).collect();

        Ok((items, total))
    }

    async fn save(&self, card: CardRecord) -> StoreResult<CardRecord> {
        let mut cards = self.cards.write().await;

        let duplicate = cards
            .values()
            .any(|existing| existing.id != card.id && existing.encrypted_pan == card.encrypted_pan);
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "encrypted PAN already stored for another card than {}",
                card.id
            )));
        }

        cards.insert(card.id, card.clone());
        Ok(card)
    }

    async fn delete(&self, id: CardId) -> StoreResult<()> {
        self.cards.write().await.remove(&id);
        Ok(())
    }
}
