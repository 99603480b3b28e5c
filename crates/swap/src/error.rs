use thiserror::Error;

use subswap_core::DomainError;
use subswap_subscriptions::RepositoryError;

/// Failure of a swap run.
///
/// Unmet preconditions are not errors; they come back as
/// [`SwapOutcome::Skipped`](crate::SwapOutcome::Skipped).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwapError {
    /// The host refused to load or persist the subscription.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The loaded record violates a line-item invariant (e.g. zero quantity).
    #[error(transparent)]
    Domain(#[from] DomainError),
}
