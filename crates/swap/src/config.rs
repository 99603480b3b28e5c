//! Swap configuration.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use subswap_core::DomainError;

/// Environment variable selecting the strategy (`in_place` or `readd`).
pub const STRATEGY_ENV: &str = "SUBSWAP_STRATEGY";
/// Environment variable overriding the audit note prefix.
pub const NOTE_PREFIX_ENV: &str = "SUBSWAP_NOTE_PREFIX";

/// How matching line items are replaced.
///
/// The two strategies are not interchangeable:
///
/// - `InPlace` rewrites the product reference and name of each matching line,
///   keeps the line id, clears the stale `Items` summary on shipping lines and
///   records **one** note per run. Lines match on product id or variation id.
/// - `Readd` removes each matching line and adds a new line for the swap-in
///   product carrying the old amounts, taxes and metadata, recalculates the
///   grand total and records **one note per replaced line**. Lines match on
///   their resolved (most specific) product id; shipping lines are untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStrategy {
    #[default]
    InPlace,
    Readd,
}

impl SwapStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            SwapStrategy::InPlace => "in_place",
            SwapStrategy::Readd => "readd",
        }
    }
}

impl core::fmt::Display for SwapStrategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwapStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in_place" | "in-place" | "inplace" => Ok(SwapStrategy::InPlace),
            "readd" | "re-add" | "remove_readd" => Ok(SwapStrategy::Readd),
            other => Err(DomainError::validation(format!(
                "unknown swap strategy: {other}"
            ))),
        }
    }
}

/// Configuration of a [`ProductSwap`](crate::ProductSwap).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapConfig {
    pub strategy: SwapStrategy,
    /// Leading label of the audit note, naming who performed the swap.
    pub note_prefix: String,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            strategy: SwapStrategy::InPlace,
            note_prefix: "Automation".to_string(),
        }
    }
}

impl SwapConfig {
    pub fn with_strategy(mut self, strategy: SwapStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_note_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.note_prefix = prefix.into();
        self
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`; unset or invalid values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(STRATEGY_ENV) {
            match raw.parse::<SwapStrategy>() {
                Ok(strategy) => config.strategy = strategy,
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    "{STRATEGY_ENV} not understood; using {}",
                    config.strategy
                ),
            }
        }

        if let Some(prefix) = lookup(NOTE_PREFIX_ENV) {
            let prefix = prefix.trim();
            if !prefix.is_empty() {
                config.note_prefix = prefix.to_string();
            }
        }

        config
    }
}
