//! Per-card async locks for read-modify-write windows.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use cardvault_shared::types::CardId;

/// Registry of per-card locks.
///
/// A transfer holds both cards' locks for the whole read-modify-write
/// window, and lifecycle updates hold the single card's lock, so the
/// debit+credit pair appears instantaneous to every other engine
/// operation. Pairs are always acquired in ascending id order; two
/// transfers referencing the same cards in opposite order cannot deadlock.
#[derive(Debug, Default)]
pub(crate) struct CardLocks {
    locks: DashMap<CardId, Arc<Mutex<()>>>,
}

impl CardLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn entry(&self, id: CardId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Locks a single card.
    pub(crate) async fn lock(&self, id: CardId) -> OwnedMutexGuard<()> {
        self.entry(id).lock_owned().await
    }

    /// Locks two distinct cards in ascending id order.
    pub(crate) async fn lock_pair(
        &self,
        a: CardId,
        b: CardId,
    ) -> (OwnedMutexGuard<()>, OwnedMutexGuard<()>) {
        debug_assert_ne!(a, b, "lock_pair requires distinct cards");
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let first_guard = self.entry(first).lock_owned().await;
        let second_guard = self.entry(second).lock_owned().await;
        (first_guard, second_guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_lock_is_exclusive() {
        let locks = CardLocks::new();
        let id = CardId::new();

        let guard = locks.lock(id).await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.lock(id)).await;
        assert!(second.is_err(), "second lock must wait for the first");

        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(50), locks.lock(id)).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_opposite_order_pairs_do_not_deadlock() {
        let locks = Arc::new(CardLocks::new());
        let a = CardId::new();
        let b = CardId::new();

        let mut tasks = Vec::new();
        for _ in 0..50 {
            let forward = Arc::clone(&locks);
            let backward = Arc::clone(&locks);
            tasks.push(tokio::spawn(async move {
                let _guards = forward.lock_pair(a, b).await;
            }));
            tasks.push(tokio::spawn(async move {
                let _guards = backward.lock_pair(b, a).await;
            }));
        }

        let joined = tokio::time::timeout(Duration::from_secs(5), async {
            for task in tasks {
                task.await.unwrap();
            }
        })
        .await;
        assert!(joined.is_ok(), "lock ordering must prevent deadlock");
    }
}
