//! The swap procedure.
//!
//! Every run follows the same shape:
//!
//! ```text
//! guards (ids present, subscription found, both products found)
//!   ↓
//! mutate a loaded copy of the subscription (strategy specific)
//!   ↓
//! write changed lines, then the subscription record with its notes
//! ```
//!
//! Nothing is written until every guard has passed and the in-memory copy has
//! been fully updated, so a skipped or failed run never leaves a half-swapped
//! record behind.

use chrono::Utc;
use tracing::{debug, info, warn};

use subswap_core::{LineItemId, ProductId, SubscriptionId};
use subswap_products::{Product, ProductLookup};
use subswap_subscriptions::{LineItemKind, Subscription, SubscriptionRepository};

use crate::config::{SwapConfig, SwapStrategy};
use crate::error::SwapError;
use crate::note::audit_note;
use crate::request::{ReplacedLine, SkipReason, SwapOutcome, SwapReport, SwapRequest};

/// Shipping-line metadata key holding a cached summary of the shipped products.
pub const STALE_ITEMS_META_KEY: &str = "Items";

/// Replaces one product with another on a subscription's line items.
pub struct ProductSwap<S, P> {
    subscriptions: S,
    products: P,
    config: SwapConfig,
}

struct Resolved {
    subscription: Subscription,
    swap_out: Product,
    swap_in: Product,
}

impl<S, P> ProductSwap<S, P>
where
    S: SubscriptionRepository,
    P: ProductLookup,
{
    pub fn new(subscriptions: S, products: P, config: SwapConfig) -> Self {
        Self {
            subscriptions,
            products,
            config,
        }
    }

    /// Run one swap.
    ///
    /// Unmet preconditions yield `Ok(SwapOutcome::Skipped(_))` with no side
    /// effects; `Err` is reserved for host persistence failures and corrupt
    /// line items.
    pub fn run(&self, request: &SwapRequest) -> Result<SwapOutcome, SwapError> {
        let resolved = match self.resolve(request)? {
            Ok(resolved) => resolved,
            Err(reason) => {
                debug!(?request, %reason, "product swap skipped");
                return Ok(SwapOutcome::Skipped(reason));
            }
        };

        let subscription_id = resolved.subscription.id_typed();
        let outcome = match self.config.strategy {
            SwapStrategy::InPlace => self.swap_in_place(resolved),
            SwapStrategy::Readd => self.swap_by_readding(resolved),
        }
        .inspect_err(|e| {
            warn!(subscription_id = %subscription_id, error = %e, "product swap failed");
        })?;

        match &outcome {
            SwapOutcome::Swapped(report) => info!(
                subscription_id = %subscription_id,
                strategy = %report.strategy,
                lines = report.replaced.len(),
                notes = report.notes_added,
                "product swap completed"
            ),
            _ => debug!(
                subscription_id = %subscription_id,
                "no line item references the swap-out product"
            ),
        }

        Ok(outcome)
    }

    /// Evaluate the guard clauses. The outer `Result` carries host failures,
    /// the inner one the reason for skipping.
    fn resolve(&self, request: &SwapRequest) -> Result<Result<Resolved, SkipReason>, SwapError> {
        let Some(subscription_id) = request.subscription else {
            return Ok(Err(SkipReason::MissingSubscription));
        };
        let (Some(swap_out_id), Some(swap_in_id)) = (request.swap_out, request.swap_in) else {
            return Ok(Err(SkipReason::MissingProduct));
        };

        let Some(subscription) = self.subscriptions.find(subscription_id)? else {
            return Ok(Err(SkipReason::SubscriptionNotFound { subscription_id }));
        };

        let swap_out = match self.lookup(swap_out_id) {
            Ok(product) => product,
            Err(reason) => return Ok(Err(reason)),
        };
        let swap_in = match self.lookup(swap_in_id) {
            Ok(product) => product,
            Err(reason) => return Ok(Err(reason)),
        };

        Ok(Ok(Resolved {
            subscription,
            swap_out,
            swap_in,
        }))
    }

    fn lookup(&self, product_id: ProductId) -> Result<Product, SkipReason> {
        self.products
            .resolve_product(product_id)
            .ok_or(SkipReason::ProductNotFound { product_id })
    }

    /// Rewrite matching lines where they stand.
    fn swap_in_place(&self, resolved: Resolved) -> Result<SwapOutcome, SwapError> {
        let Resolved {
            mut subscription,
            swap_out,
            swap_in,
        } = resolved;
        let subscription_id = subscription.id_typed();
        let reference = swap_in.line_reference();

        let matching: Vec<LineItemId> = subscription
            .items(&[LineItemKind::Product])
            .filter(|item| item.references(swap_out.id_typed()))
            .map(|item| item.id)
            .collect();

        if matching.is_empty() {
            return Ok(SwapOutcome::NoMatchingLines { subscription_id });
        }

        let mut replaced = Vec::with_capacity(matching.len());
        for id in &matching {
            if let Some(item) = subscription.item_mut(*id) {
                item.product_id = Some(reference.product_id);
                item.variation_id = reference.variation_id;
                item.name = swap_in.name().to_string();
                replaced.push(ReplacedLine {
                    original: *id,
                    replacement: *id,
                    quantity: item.quantity,
                });
            }
        }

        // The shipping summary still lists the old product.
        let shipping: Vec<LineItemId> = subscription
            .items(&[LineItemKind::Shipping])
            .map(|item| item.id)
            .collect();
        let mut cleared_shipping = Vec::new();
        for id in shipping {
            if let Some(item) = subscription.item_mut(id) {
                if item.delete_meta(STALE_ITEMS_META_KEY) {
                    cleared_shipping.push(id);
                }
            }
        }

        subscription.add_note(
            audit_note(&self.config.note_prefix, &swap_out, &swap_in),
            Utc::now(),
        );

        self.persist_items(
            &subscription,
            replaced
                .iter()
                .map(|line| line.replacement)
                .chain(cleared_shipping.iter().copied()),
        )?;
        self.subscriptions.save(&subscription)?;

        Ok(SwapOutcome::Swapped(SwapReport {
            subscription_id,
            strategy: SwapStrategy::InPlace,
            replaced,
            cleared_shipping,
            notes_added: 1,
        }))
    }

    /// Replace matching lines with new lines for the swap-in product.
    fn swap_by_readding(&self, resolved: Resolved) -> Result<SwapOutcome, SwapError> {
        let Resolved {
            mut subscription,
            swap_out,
            swap_in,
        } = resolved;
        let subscription_id = subscription.id_typed();

        let matching: Vec<LineItemId> = subscription
            .items(&[LineItemKind::Product])
            .filter(|item| item.resolved_product_id() == Some(swap_out.id_typed()))
            .map(|item| item.id)
            .collect();

        if matching.is_empty() {
            return Ok(SwapOutcome::NoMatchingLines { subscription_id });
        }

        let mut replaced = Vec::with_capacity(matching.len());
        for id in matching {
            let Some(original) = subscription.item(id).cloned() else {
                continue;
            };

            // Add before removing so the new line id is above every id the
            // subscription has handed out.
            let new_id = subscription.add_item(&swap_in, original.quantity, original.totals)?;
            if let Some(line) = subscription.item_mut(new_id) {
                line.taxes = original.taxes.clone();
                line.meta = original.meta.clone();
            }
            subscription.remove_item(id);

            replaced.push(ReplacedLine {
                original: id,
                replacement: new_id,
                quantity: original.quantity,
            });
        }

        subscription.recalculate_totals()?;

        let note = audit_note(&self.config.note_prefix, &swap_out, &swap_in);
        let now = Utc::now();
        for _ in &replaced {
            subscription.add_note(note.clone(), now);
        }

        self.persist_items(&subscription, replaced.iter().map(|line| line.replacement))?;
        self.subscriptions.save(&subscription)?;

        let notes_added = replaced.len();
        Ok(SwapOutcome::Swapped(SwapReport {
            subscription_id,
            strategy: SwapStrategy::Readd,
            replaced,
            cleared_shipping: Vec::new(),
            notes_added,
        }))
    }

    fn persist_items(
        &self,
        subscription: &Subscription,
        ids: impl IntoIterator<Item = LineItemId>,
    ) -> Result<(), SwapError> {
        let subscription_id: SubscriptionId = subscription.id_typed();
        for id in ids {
            if let Some(item) = subscription.item(id) {
                self.subscriptions.save_item(subscription_id, item)?;
            }
        }
        Ok(())
    }
}
