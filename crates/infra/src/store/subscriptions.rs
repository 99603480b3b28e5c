use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use subswap_core::SubscriptionId;
use subswap_subscriptions::{LineItem, RepositoryError, Subscription, SubscriptionRepository};

/// In-memory subscription storage.
///
/// Counts writes so tests can assert that a run had no side effects, and can
/// be switched to refuse writes to exercise failure paths.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionRepository {
    records: RwLock<HashMap<SubscriptionId, Subscription>>,
    saves: AtomicUsize,
    item_saves: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record without counting it as a write.
    ///
    /// A poisoned store drops the record with a warning.
    pub fn insert(&self, subscription: Subscription) {
        match self.records.write() {
            Ok(mut map) => {
                map.insert(subscription.id_typed(), subscription);
            }
            Err(_) => tracing::warn!(
                subscription_id = %subscription.id_typed(),
                "subscription store lock poisoned, record not inserted"
            ),
        }
    }

    /// Snapshot of the stored record.
    pub fn get(&self, id: SubscriptionId) -> Option<Subscription> {
        self.records.read().ok()?.get(&id).cloned()
    }

    /// Number of `save` calls that succeeded.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of `save_item` calls that succeeded.
    pub fn item_save_count(&self) -> usize {
        self.item_saves.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.save_count() + self.item_save_count()
    }

    /// Make every later write fail with `RepositoryError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "store is switched to unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("subscription store lock poisoned".to_string())
}

impl SubscriptionRepository for InMemorySubscriptionRepository {
    fn find(&self, id: SubscriptionId) -> Result<Option<Subscription>, RepositoryError> {
        let map = self.records.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    fn save(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        self.ensure_available()?;
        let mut map = self.records.write().map_err(|_| poisoned())?;
        map.insert(subscription.id_typed(), subscription.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(subscription_id = %subscription.id_typed(), "subscription saved");
        Ok(())
    }

    fn save_item(
        &self,
        subscription_id: SubscriptionId,
        item: &LineItem,
    ) -> Result<(), RepositoryError> {
        self.ensure_available()?;
        let mut map = self.records.write().map_err(|_| poisoned())?;
        let stored = map
            .get_mut(&subscription_id)
            .ok_or(RepositoryError::Missing(subscription_id))?;

        stored.upsert_item(item.clone());

        self.item_saves.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(
            subscription_id = %subscription_id,
            line_item_id = %item.id,
            "line item saved"
        );
        Ok(())
    }
}
