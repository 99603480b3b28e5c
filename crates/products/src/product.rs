use serde::{Deserialize, Serialize};

use subswap_core::ProductId;

/// Whether a product stands alone or is a configured child of a base product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProductKind {
    /// Simple product, or the parent of a family of variations.
    Simple,
    /// A specific size/colour/etc. option of `parent_id`.
    Variation { parent_id: ProductId },
}

/// Immutable product reference resolved from the host catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    kind: ProductKind,
}

/// The `(product, variation)` pair a line item stores for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineReference {
    pub product_id: ProductId,
    pub variation_id: Option<ProductId>,
}

impl Product {
    pub fn simple(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: ProductKind::Simple,
        }
    }

    pub fn variation(id: ProductId, parent_id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: ProductKind::Variation { parent_id },
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_variation(&self) -> bool {
        matches!(self.kind, ProductKind::Variation { .. })
    }

    /// Id stored in a line item's product slot: the parent for a variation,
    /// the product itself otherwise.
    pub fn base_product_id(&self) -> ProductId {
        match self.kind {
            ProductKind::Simple => self.id,
            ProductKind::Variation { parent_id } => parent_id,
        }
    }

    /// Id stored in a line item's variation slot, if any.
    pub fn variation_id(&self) -> Option<ProductId> {
        match self.kind {
            ProductKind::Simple => None,
            ProductKind::Variation { .. } => Some(self.id),
        }
    }

    pub fn line_reference(&self) -> LineReference {
        LineReference {
            product_id: self.base_product_id(),
            variation_id: self.variation_id(),
        }
    }
}
