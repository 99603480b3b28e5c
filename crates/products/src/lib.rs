//! Product catalog view used by the swap procedure.
//!
//! Products are owned by the host platform; this crate only models the parts
//! the swap needs (id, display name, simple vs variation) and the lookup
//! collaborator that resolves them.

pub mod lookup;
pub mod product;

pub use lookup::ProductLookup;
pub use product::{LineReference, Product, ProductKind};
