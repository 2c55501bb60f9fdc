//! Validation errors for domain values and game configuration.

use crate::chain::ChainId;

/// Errors raised while parsing or validating game configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("at least one chain must be configured")]
    NoChains,

    #[error("chain id 0 is reserved by the contract and cannot be configured")]
    ZeroChain,

    #[error("chain {0} is configured more than once")]
    DuplicateChain(ChainId),

    #[error("setup request targets chain {0}, which is not configured")]
    UnconfiguredChain(ChainId),

    #[error("unknown character id {0} (expected 1..=8)")]
    UnknownCharacter(u64),

    #[error("unknown power id {0} (expected 1..=2)")]
    UnknownPower(u64),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}
