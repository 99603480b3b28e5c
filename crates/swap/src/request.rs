use serde::{Deserialize, Serialize};

use subswap_core::{LineItemId, ProductId, SubscriptionId};

use crate::config::SwapStrategy;

/// Input of one swap run. Every field is required for the swap to apply;
/// a missing one makes the run a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SwapRequest {
    pub subscription: Option<SubscriptionId>,
    pub swap_out: Option<ProductId>,
    pub swap_in: Option<ProductId>,
}

impl SwapRequest {
    pub fn new(subscription: SubscriptionId, swap_out: ProductId, swap_in: ProductId) -> Self {
        Self {
            subscription: Some(subscription),
            swap_out: Some(swap_out),
            swap_in: Some(swap_in),
        }
    }
}

/// Why a run did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    MissingSubscription,
    MissingProduct,
    SubscriptionNotFound { subscription_id: SubscriptionId },
    ProductNotFound { product_id: ProductId },
}

impl core::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SkipReason::MissingSubscription => f.write_str("no subscription given"),
            SkipReason::MissingProduct => f.write_str("swap-out or swap-in product not given"),
            SkipReason::SubscriptionNotFound { subscription_id } => {
                write!(f, "subscription {subscription_id} not found")
            }
            SkipReason::ProductNotFound { product_id } => {
                write!(f, "product {product_id} not found")
            }
        }
    }
}

/// A line that now refers to the swap-in product.
///
/// With the in-place strategy `original == replacement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacedLine {
    pub original: LineItemId,
    pub replacement: LineItemId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReport {
    pub subscription_id: SubscriptionId,
    pub strategy: SwapStrategy,
    pub replaced: Vec<ReplacedLine>,
    /// Shipping lines whose stale `Items` summary was removed.
    pub cleared_shipping: Vec<LineItemId>,
    pub notes_added: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SwapOutcome {
    /// A precondition was not met; nothing was read beyond the guards and nothing written.
    Skipped(SkipReason),
    /// Everything resolved but no line referred to the swap-out product.
    NoMatchingLines { subscription_id: SubscriptionId },
    Swapped(SwapReport),
}

impl SwapOutcome {
    pub fn report(&self) -> Option<&SwapReport> {
        match self {
            SwapOutcome::Swapped(report) => Some(report),
            _ => None,
        }
    }
}
