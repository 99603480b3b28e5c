//! `subswap-core`: shared domain building blocks.
//!
//! Identifiers, money and the domain error type used by every other crate in
//! the workspace. No IO lives here.

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{LineItemId, ProductId, SubscriptionId};
pub use money::Money;
