//! In-memory stores for tests/dev.

pub mod catalog;
pub mod subscriptions;

pub use catalog::InMemoryCatalog;
pub use subscriptions::InMemorySubscriptionRepository;
