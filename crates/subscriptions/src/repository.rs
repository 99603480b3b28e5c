//! Subscription persistence collaborator.

use std::sync::Arc;

use thiserror::Error;

use subswap_core::SubscriptionId;

use crate::line_item::LineItem;
use crate::subscription::Subscription;

/// Host persistence failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The backing store could not be reached or refused the write.
    #[error("subscription store unavailable: {0}")]
    Unavailable(String),

    /// A write targeted a subscription the store does not hold.
    #[error("subscription {0} does not exist")]
    Missing(SubscriptionId),
}

/// Loads and saves subscriptions on the host platform.
///
/// `find` returning `Ok(None)` is an ordinary answer ("no such subscription"),
/// not an error.
pub trait SubscriptionRepository: Send + Sync {
    fn find(&self, id: SubscriptionId) -> Result<Option<Subscription>, RepositoryError>;

    /// Persist the whole record: line set, grand total and notes.
    fn save(&self, subscription: &Subscription) -> Result<(), RepositoryError>;

    /// Persist a single line item of an existing subscription.
    ///
    /// Inserts the line if the stored record has no line with that id.
    fn save_item(&self, subscription_id: SubscriptionId, item: &LineItem)
        -> Result<(), RepositoryError>;
}

impl<T> SubscriptionRepository for &T
where
    T: SubscriptionRepository + ?Sized,
{
    fn find(&self, id: SubscriptionId) -> Result<Option<Subscription>, RepositoryError> {
        (**self).find(id)
    }

    fn save(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        (**self).save(subscription)
    }

    fn save_item(
        &self,
        subscription_id: SubscriptionId,
        item: &LineItem,
    ) -> Result<(), RepositoryError> {
        (**self).save_item(subscription_id, item)
    }
}

impl<T> SubscriptionRepository for Arc<T>
where
    T: SubscriptionRepository + ?Sized,
{
    fn find(&self, id: SubscriptionId) -> Result<Option<Subscription>, RepositoryError> {
        (**self).find(id)
    }

    fn save(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        (**self).save(subscription)
    }

    fn save_item(
        &self,
        subscription_id: SubscriptionId,
        item: &LineItem,
    ) -> Result<(), RepositoryError> {
        (**self).save_item(subscription_id, item)
    }
}
