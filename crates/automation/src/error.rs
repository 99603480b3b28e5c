use thiserror::Error;

use subswap_swap::SwapError;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action already registered: {0}")]
    AlreadyRegistered(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("product swap failed: {0}")]
    Swap(#[from] SwapError),
}
