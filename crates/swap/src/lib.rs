//! Line-item product substitution for subscriptions.
//!
//! [`ProductSwap`] replaces every line of a subscription that refers to one
//! product with another product, keeping quantity, amounts, taxes and metadata
//! as they were, and records an audit note. Two strategies are available, see
//! [`SwapStrategy`].

pub mod config;
pub mod error;
pub mod note;
pub mod procedure;
pub mod request;

pub use config::{SwapConfig, SwapStrategy};
pub use error::SwapError;
pub use note::audit_note;
pub use procedure::{ProductSwap, STALE_ITEMS_META_KEY};
pub use request::{ReplacedLine, SkipReason, SwapOutcome, SwapReport, SwapRequest};
