//! Automation workflow glue.
//!
//! The host automation engine discovers actions by name, renders their fields
//! in its workflow editor and calls them with the workflow's data. This crate
//! carries only the narrow contract the swap needs: an [`Action`] trait, the
//! field/detail descriptors the engine reads, a name-keyed [`ActionRegistry`]
//! and the [`SwapProductAction`] itself.

pub mod action;
pub mod context;
pub mod error;
pub mod field;
pub mod registry;
pub mod swap_product;

pub use action::{Action, ActionDetails, ActionOutcome};
pub use context::WorkflowContext;
pub use error::ActionError;
pub use field::{FieldDefinition, FieldKind};
pub use registry::ActionRegistry;
pub use swap_product::{
    SWAP_IN_FIELD, SWAP_OUT_FIELD, SWAP_PRODUCT_ACTION, SwapProductAction, register_actions,
};
