//! JSON fixtures describing a catalog and one subscription.
//!
//! ```json
//! {
//!   "products": [
//!     { "id": 42, "name": "Widget A", "kind": { "type": "simple" } },
//!     { "id": 51, "name": "Widget - Large", "kind": { "type": "variation", "parent_id": 50 } }
//!   ],
//!   "subscription": {
//!     "id": 7,
//!     "items": [
//!       { "id": 1, "kind": "product", "name": "Widget A", "product_id": 42, "quantity": 2,
//!         "totals": { "subtotal": "20.00", "subtotal_tax": "2.00", "total": "20.00", "total_tax": "2.00" } }
//!     ]
//!   }
//! }
//! ```
//!
//! Amounts are decimal strings in the subscription's currency.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use subswap_core::{DomainError, SubscriptionId};
use subswap_products::Product;
use subswap_subscriptions::Subscription;

use crate::store::{InMemoryCatalog, InMemorySubscriptionRepository};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("inconsistent fixture: {0}")]
    Invalid(#[from] DomainError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub products: Vec<Product>,
    pub subscription: Subscription,
}

impl Fixture {
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        let mut fixture: Fixture = serde_json::from_str(json)?;
        // Stored totals in fixtures are often left out; derive them from the lines.
        if fixture.subscription.total().is_zero() {
            fixture.subscription.recalculate_totals()?;
        }
        Ok(fixture)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn subscription_id(&self) -> SubscriptionId {
        self.subscription.id_typed()
    }

    /// Build in-memory host stores holding this fixture.
    pub fn seed(&self) -> (InMemorySubscriptionRepository, InMemoryCatalog) {
        let repository = InMemorySubscriptionRepository::new();
        repository.insert(self.subscription.clone());
        let catalog = InMemoryCatalog::with_products(self.products.iter().cloned());
        tracing::debug!(
            subscription_id = %self.subscription.id_typed(),
            products = self.products.len(),
            "fixture seeded"
        );
        (repository, catalog)
    }
}
