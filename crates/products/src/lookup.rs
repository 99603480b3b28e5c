use std::sync::Arc;

use subswap_core::ProductId;

use crate::product::Product;

/// Resolves product ids against the host catalog.
///
/// A `None` answer means the id does not name a product the caller may use;
/// the swap treats it as "not applicable" rather than as a failure.
pub trait ProductLookup: Send + Sync {
    fn resolve_product(&self, id: ProductId) -> Option<Product>;
}

impl<T> ProductLookup for &T
where
    T: ProductLookup + ?Sized,
{
    fn resolve_product(&self, id: ProductId) -> Option<Product> {
        (**self).resolve_product(id)
    }
}

impl<T> ProductLookup for Arc<T>
where
    T: ProductLookup + ?Sized,
{
    fn resolve_product(&self, id: ProductId) -> Option<Product> {
        (**self).resolve_product(id)
    }
}
