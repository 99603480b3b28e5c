use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use subswap_core::{DomainError, DomainResult, LineItemId, Money, SubscriptionId};
use subswap_products::Product;

use crate::line_item::{LineItem, LineItemKind, LineTotals};

/// Subscription status lifecycle (driven by the host; carried for context only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    OnHold,
    PendingCancel,
    Cancelled,
    Expired,
}

/// Append-only history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionNote {
    pub content: String,
    pub added_at: DateTime<Utc>,
}

/// A recurring order: an ordered list of line items plus its history.
///
/// Line item ids are unique within a subscription; deserializing a record
/// that repeats one fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SubscriptionRecord")]
pub struct Subscription {
    id: SubscriptionId,
    status: SubscriptionStatus,
    items: Vec<LineItem>,
    notes: Vec<SubscriptionNote>,
    total: Money,
}

/// Stored shape of a subscription, checked before it becomes a [`Subscription`].
#[derive(Deserialize)]
struct SubscriptionRecord {
    id: SubscriptionId,
    #[serde(default)]
    status: SubscriptionStatus,
    #[serde(default)]
    items: Vec<LineItem>,
    #[serde(default)]
    notes: Vec<SubscriptionNote>,
    #[serde(default)]
    total: Money,
}

impl TryFrom<SubscriptionRecord> for Subscription {
    type Error = DomainError;

    fn try_from(record: SubscriptionRecord) -> DomainResult<Self> {
        ensure_unique_ids(&record.items)?;
        Ok(Self {
            id: record.id,
            status: record.status,
            items: record.items,
            notes: record.notes,
            total: record.total,
        })
    }
}

fn ensure_unique_ids(items: &[LineItem]) -> DomainResult<()> {
    for (idx, item) in items.iter().enumerate() {
        if items[..idx].iter().any(|other| other.id == item.id) {
            return Err(DomainError::conflict(format!(
                "duplicate line item id {}",
                item.id
            )));
        }
    }
    Ok(())
}

impl Subscription {
    pub fn new(id: SubscriptionId) -> Self {
        Self {
            id,
            status: SubscriptionStatus::Active,
            items: Vec::new(),
            notes: Vec::new(),
            total: Money::ZERO,
        }
    }

    /// Build a subscription from existing line items, rejecting duplicate ids.
    ///
    /// The grand total is computed from the given lines.
    pub fn with_items(id: SubscriptionId, items: Vec<LineItem>) -> DomainResult<Self> {
        ensure_unique_ids(&items)?;
        let mut subscription = Self::new(id);
        subscription.items = items;
        subscription.recalculate_totals()?;
        Ok(subscription)
    }

    pub fn id_typed(&self) -> SubscriptionId {
        self.id
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    /// All line items, in order.
    pub fn line_items(&self) -> &[LineItem] {
        &self.items
    }

    /// Line items whose kind is in `kinds`; an empty filter returns every line.
    pub fn items<'a>(
        &'a self,
        kinds: &'a [LineItemKind],
    ) -> impl Iterator<Item = &'a LineItem> + 'a {
        self.items
            .iter()
            .filter(move |item| kinds.is_empty() || kinds.contains(&item.kind))
    }

    pub fn item(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: LineItemId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn remove_item(&mut self, id: LineItemId) -> Option<LineItem> {
        let idx = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Replace the line with the same id, or append it.
    pub fn upsert_item(&mut self, item: LineItem) {
        match self.item_mut(item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Append a product line for `product` with explicit amounts.
    ///
    /// The amounts are stored as given; nothing is priced from the catalog.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
        totals: LineTotals,
    ) -> DomainResult<LineItemId> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let id = self.next_item_id();
        let reference = product.line_reference();
        let mut line = LineItem::new(id, LineItemKind::Product, product.name());
        line.product_id = Some(reference.product_id);
        line.variation_id = reference.variation_id;
        line.quantity = quantity;
        line.totals = totals;
        self.items.push(line);
        Ok(id)
    }

    /// Recompute the grand total from the line amounts already stored.
    ///
    /// Fails, leaving the stored total as it was, when the sum does not fit.
    pub fn recalculate_totals(&mut self) -> DomainResult<()> {
        let amounts = self
            .items
            .iter()
            .flat_map(|item| [item.totals.total, item.totals.total_tax]);
        self.total = Money::checked_sum(amounts).ok_or_else(|| {
            DomainError::validation("line amounts overflow the subscription total")
        })?;
        Ok(())
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn add_note(&mut self, content: impl Into<String>, added_at: DateTime<Utc>) {
        self.notes.push(SubscriptionNote {
            content: content.into(),
            added_at,
        });
    }

    pub fn notes(&self) -> &[SubscriptionNote] {
        &self.notes
    }

    fn next_item_id(&self) -> LineItemId {
        let max = self.items.iter().map(|item| item.id.get()).max().unwrap_or(0);
        LineItemId::new(max + 1)
    }
}
