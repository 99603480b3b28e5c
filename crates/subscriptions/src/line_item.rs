use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use subswap_core::{LineItemId, Money, ProductId};

/// Kind tag of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    Product,
    Shipping,
    Fee,
    Tax,
    Coupon,
}

/// Monetary amounts of a line item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTotals {
    /// Line price before discounts.
    pub subtotal: Money,
    pub subtotal_tax: Money,
    /// Line price after discounts.
    pub total: Money,
    pub total_tax: Money,
}

/// Per-rate tax amounts, keyed by tax-rate id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    #[serde(default)]
    pub total: BTreeMap<String, Money>,
    #[serde(default)]
    pub subtotal: BTreeMap<String, Money>,
}

impl TaxBreakdown {
    pub fn is_empty(&self) -> bool {
        self.total.is_empty() && self.subtotal.is_empty()
    }
}

/// One key/value metadata entry. Keys may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    pub key: String,
    pub value: String,
}

impl MetaEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A single entry of a subscription: product line, shipping line, fee, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub kind: LineItemKind,
    pub name: String,
    /// Base product (the parent, when the line holds a variation).
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub variation_id: Option<ProductId>,
    pub quantity: u32,
    #[serde(default)]
    pub totals: LineTotals,
    #[serde(default)]
    pub taxes: TaxBreakdown,
    #[serde(default)]
    pub meta: Vec<MetaEntry>,
}

impl LineItem {
    /// A line with no product, totals, taxes or metadata.
    pub fn new(id: LineItemId, kind: LineItemKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            product_id: None,
            variation_id: None,
            quantity: 1,
            totals: LineTotals::default(),
            taxes: TaxBreakdown::default(),
            meta: Vec::new(),
        }
    }

    /// The most specific product the line refers to: its variation if set,
    /// otherwise its base product.
    pub fn resolved_product_id(&self) -> Option<ProductId> {
        self.variation_id.or(self.product_id)
    }

    /// True if either the product or the variation slot holds `id`.
    pub fn references(&self, id: ProductId) -> bool {
        self.product_id == Some(id) || self.variation_id == Some(id)
    }

    /// First value stored under `key`.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    pub fn meta_entries(&self) -> &[MetaEntry] {
        &self.meta
    }

    /// Replace the first value stored under `key`, or append a new entry.
    pub fn update_meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.meta.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.value = value,
            None => self.meta.push(MetaEntry { key, value }),
        }
    }

    /// Remove every entry stored under `key`. Returns whether anything was removed.
    pub fn delete_meta(&mut self, key: &str) -> bool {
        let before = self.meta.len();
        self.meta.retain(|entry| entry.key != key);
        self.meta.len() != before
    }
}
