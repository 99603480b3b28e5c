//! Host stand-ins: in-memory implementations of the collaborator traits the
//! swap procedure talks to, plus JSON fixtures to seed them.
//!
//! Intended for tests and local runs. A real deployment plugs the host
//! platform's own catalog and subscription storage in instead.

pub mod fixture;
pub mod store;

pub use fixture::{Fixture, FixtureError};
pub use store::{InMemoryCatalog, InMemorySubscriptionRepository};
