//! Error taxonomy shared by every contract backend.
//!
//! Each failure kind is a distinct variant so callers (poll loops, CLI, tests)
//! can branch on it. Nothing in this crate retries or swallows an error.

use alloy_primitives::U256;
use game_core::ConfigError;
use thiserror::Error;

use crate::types::ReadCall;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("endpoint unreachable: {0}")]
    Connectivity(String),

    #[error("contract call `{call}` failed: {reason}")]
    Contract { call: String, reason: String },

    #[error("`{field}` returned {value}, which does not fit in {target}")]
    Range {
        field: String,
        value: U256,
        target: &'static str,
    },

    #[error("{action} transaction failed: {reason}")]
    Transaction { action: &'static str, reason: String },

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

/// Failure kind, for callers that only need to branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Connectivity,
    Contract,
    Range,
    Transaction,
    Configuration,
}

impl ClientError {
    pub fn connectivity(reason: impl ToString) -> Self {
        Self::Connectivity(reason.to_string())
    }

    pub fn contract(call: impl Into<String>, reason: impl ToString) -> Self {
        Self::Contract {
            call: call.into(),
            reason: reason.to_string(),
        }
    }

    pub fn transaction(action: &'static str, reason: impl ToString) -> Self {
        Self::Transaction {
            action,
            reason: reason.to_string(),
        }
    }

    pub fn configuration(reason: impl ToString) -> Self {
        Self::Configuration(reason.to_string())
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Connectivity(_) => ErrorKind::Connectivity,
            Self::Contract { .. } => ErrorKind::Contract,
            Self::Range { .. } => ErrorKind::Range,
            Self::Transaction { .. } => ErrorKind::Transaction,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }
}

impl From<ConfigError> for ClientError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Narrow the counter returned by `call` to `u64`, failing instead of truncating.
pub fn narrow_u64(call: ReadCall, value: U256) -> Result<u64> {
    u64::try_from(value).map_err(|_| ClientError::Range {
        field: call.to_string(),
        value,
        target: "u64",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::ChainId;

    #[test]
    fn narrowing_keeps_small_counters() {
        let call = ReadCall::Life(ChainId(421614));
        assert_eq!(narrow_u64(call, U256::from(100u64)).unwrap(), 100);
        assert_eq!(narrow_u64(call, U256::from(u64::MAX)).unwrap(), u64::MAX);
    }

    #[test]
    fn narrowing_rejects_overflow() {
        let value = U256::from(u64::MAX) + U256::from(1u64);
        let err = narrow_u64(ReadCall::ChemicalX(ChainId(421614)), value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(err.to_string().contains("chemicalXAmount(421614)"));
    }

    #[test]
    fn config_errors_become_configuration() {
        let err: ClientError = ConfigError::NoChains.into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.kind().as_ref(), "configuration");
    }
}
