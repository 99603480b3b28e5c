//! End-to-end swap runs against the in-memory host.

use std::collections::BTreeMap;

use subswap_core::{LineItemId, Money, ProductId, SubscriptionId};
use subswap_infra::{InMemoryCatalog, InMemorySubscriptionRepository};
use subswap_products::Product;
use subswap_subscriptions::{
    LineItem, LineItemKind, LineTotals, MetaEntry, RepositoryError, Subscription,
    SubscriptionRepository, TaxBreakdown,
};
use subswap_swap::{
    ProductSwap, STALE_ITEMS_META_KEY, SkipReason, SwapConfig, SwapError, SwapOutcome,
    SwapRequest, SwapStrategy,
};

const SUB: SubscriptionId = SubscriptionId::new(7);
const WIDGET_A: ProductId = ProductId::new(42);
const WIDGET_B: ProductId = ProductId::new(99);
const GADGET_PARENT: ProductId = ProductId::new(50);
const GADGET_LARGE: ProductId = ProductId::new(51);
const GADGET_SMALL: ProductId = ProductId::new(52);
const UNRELATED: ProductId = ProductId::new(77);

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::with_products([
        Product::simple(WIDGET_A, "Widget A"),
        Product::simple(WIDGET_B, "Widget B"),
        Product::simple(GADGET_PARENT, "Gadget"),
        Product::variation(GADGET_LARGE, GADGET_PARENT, "Gadget - Large"),
        Product::variation(GADGET_SMALL, GADGET_PARENT, "Gadget - Small"),
        Product::simple(UNRELATED, "Unrelated"),
    ])
}

fn totals(total: i64, tax: i64) -> LineTotals {
    LineTotals {
        subtotal: Money::from_minor(total),
        subtotal_tax: Money::from_minor(tax),
        total: Money::from_minor(total),
        total_tax: Money::from_minor(tax),
    }
}

fn product_line(id: u64, product: ProductId, quantity: u32, total: i64, tax: i64) -> LineItem {
    let mut line = LineItem::new(LineItemId::new(id), LineItemKind::Product, "Widget A");
    line.product_id = Some(product);
    line.quantity = quantity;
    line.totals = totals(total, tax);
    line
}

fn variation_line(id: u64, parent: ProductId, variation: ProductId) -> LineItem {
    let mut line = product_line(id, parent, 1, 1500, 150);
    line.name = "Gadget - Small".to_string();
    line.variation_id = Some(variation);
    line
}

fn shipping_line(id: u64) -> LineItem {
    let mut line = LineItem::new(LineItemId::new(id), LineItemKind::Shipping, "Flat rate");
    line.totals.total = Money::from_minor(500);
    line.meta.push(MetaEntry::new(STALE_ITEMS_META_KEY, "Widget A × 2"));
    line.meta.push(MetaEntry::new("method_id", "flat_rate"));
    line
}

fn with_taxes_and_meta(mut line: LineItem) -> LineItem {
    line.taxes = TaxBreakdown {
        total: BTreeMap::from([("1".to_string(), Money::from_minor(150)), ("4".to_string(), Money::from_minor(50))]),
        subtotal: BTreeMap::from([("1".to_string(), Money::from_minor(150)), ("4".to_string(), Money::from_minor(50))]),
    };
    line.meta.push(MetaEntry::new("engraving", "AB"));
    line.meta.push(MetaEntry::new("_reduced_stock", "2"));
    line.meta.push(MetaEntry::new("engraving", "second entry"));
    line
}

fn host(items: Vec<LineItem>) -> InMemorySubscriptionRepository {
    let repository = InMemorySubscriptionRepository::new();
    repository.insert(Subscription::with_items(SUB, items).unwrap());
    repository
}

fn swap<'a>(
    repository: &'a InMemorySubscriptionRepository,
    catalog: &'a InMemoryCatalog,
    strategy: SwapStrategy,
) -> ProductSwap<&'a InMemorySubscriptionRepository, &'a InMemoryCatalog> {
    ProductSwap::new(
        repository,
        catalog,
        SwapConfig::default().with_strategy(strategy),
    )
}

fn stored(repository: &InMemorySubscriptionRepository) -> Subscription {
    repository.get(SUB).unwrap()
}

const BOTH: [SwapStrategy; 2] = [SwapStrategy::InPlace, SwapStrategy::Readd];

#[test]
fn simple_swap_keeps_quantity_and_amounts() {
    for strategy in BOTH {
        let catalog = catalog();
        let repository = host(vec![product_line(1, WIDGET_A, 2, 2000, 200)]);

        let outcome = swap(&repository, &catalog, strategy)
            .run(&SwapRequest::new(SUB, WIDGET_A, WIDGET_B))
            .unwrap();
        let report = outcome.report().expect("swap applied");
        assert_eq!(report.replaced.len(), 1);
        assert_eq!(report.notes_added, 1);

        let subscription = stored(&repository);
        assert_eq!(subscription.line_items().len(), 1);
        let line = &subscription.line_items()[0];
        assert_eq!(line.product_id, Some(WIDGET_B));
        assert_eq!(line.variation_id, None);
        assert_eq!(line.name, "Widget B");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.totals, totals(2000, 200));
        assert_eq!(subscription.total(), Money::from_minor(2200));

        assert_eq!(subscription.notes().len(), 1, "{strategy}");
        let note = &subscription.notes()[0].content;
        assert!(note.contains("99"), "{note}");
        assert!(note.contains("Widget B"), "{note}");
        assert!(note.contains("Widget A"), "{note}");
    }
}

#[test]
fn in_place_swap_to_variation_stores_parent_and_variation() {
    let catalog = catalog();
    let repository = host(vec![product_line(1, WIDGET_A, 1, 1000, 100)]);

    swap(&repository, &catalog, SwapStrategy::InPlace)
        .run(&SwapRequest::new(SUB, WIDGET_A, GADGET_LARGE))
        .unwrap();

    let subscription = stored(&repository);
    let line = subscription.item(LineItemId::new(1)).unwrap();
    assert_eq!(line.product_id, Some(GADGET_PARENT));
    assert_eq!(line.variation_id, Some(GADGET_LARGE));
    assert_eq!(line.name, "Gadget - Large");
}

#[test]
fn in_place_swap_from_variation_back_to_simple_clears_variation() {
    let catalog = catalog();
    let repository = host(vec![variation_line(1, GADGET_PARENT, GADGET_SMALL)]);

    swap(&repository, &catalog, SwapStrategy::InPlace)
        .run(&SwapRequest::new(SUB, GADGET_SMALL, WIDGET_B))
        .unwrap();

    let line = stored(&repository).line_items()[0].clone();
    assert_eq!(line.product_id, Some(WIDGET_B));
    assert_eq!(line.variation_id, None);
}

#[test]
fn in_place_matches_parent_product_of_variation_lines() {
    let catalog = catalog();
    let repository = host(vec![variation_line(1, GADGET_PARENT, GADGET_SMALL)]);

    let outcome = swap(&repository, &catalog, SwapStrategy::InPlace)
        .run(&SwapRequest::new(SUB, GADGET_PARENT, WIDGET_B))
        .unwrap();

    assert_eq!(outcome.report().map(|r| r.replaced.len()), Some(1));
    assert_eq!(stored(&repository).line_items()[0].product_id, Some(WIDGET_B));
}

#[test]
fn readd_matches_only_the_resolved_product() {
    let catalog = catalog();
    let repository = host(vec![variation_line(1, GADGET_PARENT, GADGET_SMALL)]);

    let outcome = swap(&repository, &catalog, SwapStrategy::Readd)
        .run(&SwapRequest::new(SUB, GADGET_PARENT, WIDGET_B))
        .unwrap();

    assert_eq!(outcome, SwapOutcome::NoMatchingLines { subscription_id: SUB });
    assert_eq!(repository.write_count(), 0);
}

#[test]
fn readd_copies_taxes_and_metadata_in_order() {
    let catalog = catalog();
    let original = with_taxes_and_meta(product_line(3, WIDGET_A, 2, 2000, 200));
    let repository = host(vec![original.clone()]);

    let outcome = swap(&repository, &catalog, SwapStrategy::Readd)
        .run(&SwapRequest::new(SUB, WIDGET_A, GADGET_LARGE))
        .unwrap();
    let replaced = outcome.report().unwrap().replaced[0];
    assert_eq!(replaced.original, LineItemId::new(3));
    assert_ne!(replaced.replacement, replaced.original);

    let subscription = stored(&repository);
    assert!(subscription.item(LineItemId::new(3)).is_none());
    let line = subscription.item(replaced.replacement).unwrap();
    assert_eq!(line.product_id, Some(GADGET_PARENT));
    assert_eq!(line.variation_id, Some(GADGET_LARGE));
    assert_eq!(line.quantity, original.quantity);
    assert_eq!(line.totals, original.totals);
    assert_eq!(line.taxes, original.taxes);
    assert_eq!(line.meta_entries(), original.meta_entries());
}

#[test]
fn non_matching_lines_are_untouched() {
    for strategy in BOTH {
        let catalog = catalog();
        let other = with_taxes_and_meta(product_line(2, UNRELATED, 5, 999, 99));
        let repository = host(vec![
            product_line(1, WIDGET_A, 2, 2000, 200),
            other.clone(),
            shipping_line(3),
        ]);

        swap(&repository, &catalog, strategy)
            .run(&SwapRequest::new(SUB, WIDGET_A, WIDGET_B))
            .unwrap();

        let subscription = stored(&repository);
        assert_eq!(subscription.item(LineItemId::new(2)), Some(&other), "{strategy}");
    }
}

#[test]
fn shipping_summary_is_cleared_only_by_in_place_swap() {
    let catalog = catalog();
    let items = vec![product_line(1, WIDGET_A, 2, 2000, 200), shipping_line(2)];

    let in_place = host(items.clone());
    let outcome = swap(&in_place, &catalog, SwapStrategy::InPlace)
        .run(&SwapRequest::new(SUB, WIDGET_A, WIDGET_B))
        .unwrap();
    assert_eq!(outcome.report().unwrap().cleared_shipping, vec![LineItemId::new(2)]);
    let shipping = stored(&in_place).item(LineItemId::new(2)).cloned().unwrap();
    assert_eq!(shipping.meta(STALE_ITEMS_META_KEY), None);
    assert_eq!(shipping.meta("method_id"), Some("flat_rate"));
    assert_eq!(shipping.totals, items[1].totals);

    let readd = host(items.clone());
    swap(&readd, &catalog, SwapStrategy::Readd)
        .run(&SwapRequest::new(SUB, WIDGET_A, WIDGET_B))
        .unwrap();
    assert_eq!(stored(&readd).item(LineItemId::new(2)), Some(&items[1]));
}

#[test]
fn no_matching_line_changes_nothing() {
    for strategy in BOTH {
        let catalog = catalog();
        let repository = host(vec![product_line(1, UNRELATED, 1, 100, 10), shipping_line(2)]);
        let before = stored(&repository);

        let outcome = swap(&repository, &catalog, strategy)
            .run(&SwapRequest::new(SUB, WIDGET_A, WIDGET_B))
            .unwrap();

        assert_eq!(outcome, SwapOutcome::NoMatchingLines { subscription_id: SUB });
        assert_eq!(stored(&repository), before);
        assert!(stored(&repository).notes().is_empty());
        assert_eq!(repository.write_count(), 0);
    }
}

#[test]
fn unmet_preconditions_are_silent_no_ops() {
    let cases = [
        (
            SwapRequest {
                subscription: None,
                swap_out: Some(WIDGET_A),
                swap_in: Some(WIDGET_B),
            },
            SkipReason::MissingSubscription,
        ),
        (
            SwapRequest {
                subscription: Some(SUB),
                swap_out: None,
                swap_in: Some(WIDGET_B),
            },
            SkipReason::MissingProduct,
        ),
        (
            SwapRequest {
                subscription: Some(SUB),
                swap_out: Some(WIDGET_A),
                swap_in: None,
            },
            SkipReason::MissingProduct,
        ),
        (
            SwapRequest::new(SubscriptionId::new(8), WIDGET_A, WIDGET_B),
            SkipReason::SubscriptionNotFound {
                subscription_id: SubscriptionId::new(8),
            },
        ),
        (
            SwapRequest::new(SUB, ProductId::new(1000), WIDGET_B),
            SkipReason::ProductNotFound {
                product_id: ProductId::new(1000),
            },
        ),
        (
            SwapRequest::new(SUB, WIDGET_A, ProductId::new(1001)),
            SkipReason::ProductNotFound {
                product_id: ProductId::new(1001),
            },
        ),
    ];

    for strategy in BOTH {
        for (request, reason) in cases {
            let catalog = catalog();
            let repository = host(vec![product_line(1, WIDGET_A, 2, 2000, 200), shipping_line(2)]);
            let before = stored(&repository);

            let outcome = swap(&repository, &catalog, strategy).run(&request).unwrap();

            assert_eq!(outcome, SwapOutcome::Skipped(reason));
            assert_eq!(stored(&repository), before);
            assert_eq!(repository.write_count(), 0);
        }
    }
}

#[test]
fn strategies_diverge_on_note_count_for_multiple_matching_lines() {
    let items = vec![
        product_line(1, WIDGET_A, 1, 1000, 100),
        product_line(2, WIDGET_A, 3, 3000, 300),
    ];

    let catalog = catalog();
    let in_place = host(items.clone());
    swap(&in_place, &catalog, SwapStrategy::InPlace)
        .run(&SwapRequest::new(SUB, WIDGET_A, WIDGET_B))
        .unwrap();
    assert_eq!(stored(&in_place).notes().len(), 1);
    let ids: Vec<u64> = stored(&in_place).line_items().iter().map(|l| l.id.get()).collect();
    assert_eq!(ids, vec![1, 2]);

    let readd = host(items);
    swap(&readd, &catalog, SwapStrategy::Readd)
        .run(&SwapRequest::new(SUB, WIDGET_A, WIDGET_B))
        .unwrap();
    let subscription = stored(&readd);
    assert_eq!(subscription.notes().len(), 2);
    assert!(subscription.notes().iter().all(|n| n.content == subscription.notes()[0].content));
    let ids: Vec<u64> = subscription.line_items().iter().map(|l| l.id.get()).collect();
    assert_eq!(ids, vec![3, 4]);
    let quantities: Vec<u32> = subscription.line_items().iter().map(|l| l.quantity).collect();
    assert_eq!(quantities, vec![1, 3]);
}

#[test]
fn readd_recalculates_grand_total_from_copied_amounts() {
    let catalog = catalog();
    let repository = host(vec![product_line(1, WIDGET_A, 2, 2000, 200), shipping_line(2)]);
    let before = stored(&repository).total();

    swap(&repository, &catalog, SwapStrategy::Readd)
        .run(&SwapRequest::new(SUB, WIDGET_A, WIDGET_B))
        .unwrap();

    assert_eq!(stored(&repository).total(), before);
    assert_eq!(before, Money::from_minor(2700));
}

#[test]
fn custom_note_prefix_is_used() {
    let catalog = catalog();
    let repository = host(vec![product_line(1, WIDGET_A, 2, 2000, 200)]);

    ProductSwap::new(
        &repository,
        &catalog,
        SwapConfig::default().with_note_prefix("Retention flow"),
    )
    .run(&SwapRequest::new(SUB, WIDGET_A, WIDGET_B))
    .unwrap();

    assert_eq!(
        stored(&repository).notes()[0].content,
        r#"Retention flow - Swapped out "Widget A" (ID: 42) for "Widget B" (ID: 99)"#
    );
}

#[test]
fn write_failure_leaves_stored_record_untouched() {
    for strategy in BOTH {
        let catalog = catalog();
        let repository = host(vec![product_line(1, WIDGET_A, 2, 2000, 200)]);
        let before = stored(&repository);
        repository.set_unavailable(true);

        let result = swap(&repository, &catalog, strategy)
            .run(&SwapRequest::new(SUB, WIDGET_A, WIDGET_B));

        assert!(result.is_err());
        assert_eq!(stored(&repository), before);
    }
}

/// Host whose line saves succeed but whose record save fails.
struct RecordSaveFails<'a>(&'a InMemorySubscriptionRepository);

impl SubscriptionRepository for RecordSaveFails<'_> {
    fn find(&self, id: SubscriptionId) -> Result<Option<Subscription>, RepositoryError> {
        self.0.find(id)
    }

    fn save(&self, _subscription: &Subscription) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("record save rejected".into()))
    }

    fn save_item(
        &self,
        subscription_id: SubscriptionId,
        item: &LineItem,
    ) -> Result<(), RepositoryError> {
        self.0.save_item(subscription_id, item)
    }
}

#[test]
fn failing_record_save_is_reported_after_line_writes() {
    let catalog = catalog();
    let repository = host(vec![product_line(1, WIDGET_A, 2, 2000, 200), shipping_line(2)]);

    let err = ProductSwap::new(RecordSaveFails(&repository), &catalog, SwapConfig::default())
        .run(&SwapRequest::new(SUB, WIDGET_A, WIDGET_B))
        .unwrap_err();
    assert!(matches!(
        err,
        SwapError::Repository(RepositoryError::Unavailable(_))
    ));

    // Line writes precede the record write: lines are swapped, the note is lost.
    let subscription = stored(&repository);
    assert_eq!(subscription.line_items()[0].product_id, Some(WIDGET_B));
    assert_eq!(subscription.line_items()[1].meta(STALE_ITEMS_META_KEY), None);
    assert!(subscription.notes().is_empty());
    assert_eq!(repository.item_save_count(), 2);
    assert_eq!(repository.save_count(), 0);
}
