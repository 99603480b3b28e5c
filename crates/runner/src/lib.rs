//! Dev harness: run the swap action once against a JSON fixture.

pub mod run;

pub use run::{RunArgs, RunReport, execute};
