use std::collections::HashMap;
use std::sync::RwLock;

use subswap_core::ProductId;
use subswap_products::{Product, ProductLookup};

/// In-memory product catalog.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let catalog = Self::new();
        for product in products {
            catalog.insert(product);
        }
        catalog
    }

    /// Insert or replace a product. A poisoned catalog drops it with a warning.
    pub fn insert(&self, product: Product) {
        match self.products.write() {
            Ok(mut map) => {
                map.insert(product.id_typed(), product);
            }
            Err(_) => tracing::warn!(
                product_id = %product.id_typed(),
                "catalog lock poisoned, product not inserted"
            ),
        }
    }

    pub fn remove(&self, id: ProductId) -> Option<Product> {
        self.products.write().ok()?.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.products.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProductLookup for InMemoryCatalog {
    fn resolve_product(&self, id: ProductId) -> Option<Product> {
        let map = self.products.read().ok()?;
        map.get(&id).cloned()
    }
}
