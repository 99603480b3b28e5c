//! Subscription records as seen by the swap procedure.
//!
//! The host platform owns subscriptions and persists them; this crate models
//! the record (line items, totals, tax breakdown, metadata, notes) and the
//! repository collaborator used to load and save it. No IO lives here.

pub mod line_item;
pub mod repository;
pub mod subscription;

pub use line_item::{LineItem, LineItemKind, LineTotals, MetaEntry, TaxBreakdown};
pub use repository::{RepositoryError, SubscriptionRepository};
pub use subscription::{Subscription, SubscriptionNote, SubscriptionStatus};
