//! EVM connection configuration.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use client_blockchain_core::{
    BlockchainConfig, ClientError, FeePolicy, ReaderOptions, Result, SubmissionOptions,
};

/// Connection settings for the live contract.
///
/// The signing key is parsed at load time and only ever held as a signer;
/// `Debug` shows the signer's address, never the key.
#[derive(Clone)]
pub struct EvmConfig {
    /// Label used in logs
    pub network: String,

    /// JSON-RPC endpoint (http or https)
    pub rpc_url: String,

    /// Deployed game contract
    pub contract_address: Address,

    /// Signer for action calls; `None` makes the client read-only
    signer: Option<PrivateKeySigner>,

    pub reader: ReaderOptions,
    pub submission: SubmissionOptions,
}

impl EvmConfig {
    pub const DEFAULT_NETWORK: &'static str = "evm";

    pub fn new(rpc_url: impl Into<String>, contract_address: Address) -> Self {
        Self {
            network: Self::DEFAULT_NETWORK.to_string(),
            rpc_url: rpc_url.into(),
            contract_address,
            signer: None,
            reader: ReaderOptions::default(),
            submission: SubmissionOptions::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `EVM_RPC_URL` - JSON-RPC endpoint (required)
    /// - `EVM_CONTRACT_ADDRESS` - Game contract address (required)
    /// - `EVM_PRIVATE_KEY` - Hex signing key (optional; read-only without it)
    /// - `EVM_NETWORK` - Label used in logs (default: evm)
    /// - `EVM_FEE_POLICY` - legacy, eip1559 or provider (default: legacy)
    /// - `EVM_GAS_PRICE` - Legacy gas price in wei (default: 0)
    /// - `EVM_MAX_FEE_PER_GAS` / `EVM_MAX_PRIORITY_FEE_PER_GAS` - EIP-1559 caps (default: 0)
    /// - `EVM_SEND_TIMEOUT_SECS` - Bound on handing a call to the node (default: 30)
    /// - `EVM_CONFIRMATION_TIMEOUT_SECS` - Receipt wait bound (default: 60)
    /// - `EVM_REQUIRED_CONFIRMATIONS` - Confirmations per transaction (default: 1)
    /// - `EVM_READ_TIMEOUT_SECS` - Snapshot read bound (default: 10)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let rpc_url = require(&lookup, "EVM_RPC_URL")?;
        let contract_address = require(&lookup, "EVM_CONTRACT_ADDRESS")?
            .parse::<Address>()
            .map_err(|err| invalid("EVM_CONTRACT_ADDRESS", err))?;

        let mut config = Self::new(rpc_url, contract_address);

        if let Some(network) = lookup("EVM_NETWORK").filter(|value| !value.trim().is_empty()) {
            config.network = network.trim().to_string();
        }

        if let Some(key) = lookup("EVM_PRIVATE_KEY").filter(|value| !value.trim().is_empty()) {
            let signer = key
                .trim()
                .parse::<PrivateKeySigner>()
                .map_err(|_| ClientError::configuration("EVM_PRIVATE_KEY is not a valid private key"))?;
            config.signer = Some(signer);
        }

        let fee = match lookup("EVM_FEE_POLICY")
            .unwrap_or_else(|| "legacy".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "legacy" => FeePolicy::Legacy {
                gas_price: read_var(&lookup, "EVM_GAS_PRICE")?.unwrap_or(0),
            },
            "eip1559" => FeePolicy::Eip1559 {
                max_fee_per_gas: read_var(&lookup, "EVM_MAX_FEE_PER_GAS")?.unwrap_or(0),
                max_priority_fee_per_gas: read_var(&lookup, "EVM_MAX_PRIORITY_FEE_PER_GAS")?
                    .unwrap_or(0),
            },
            "provider" => FeePolicy::Provider,
            other => {
                return Err(ClientError::configuration(format!(
                    "EVM_FEE_POLICY must be legacy, eip1559 or provider, got `{other}`"
                )));
            }
        };

        let mut submission = SubmissionOptions::default().with_fee(fee);
        if let Some(secs) = read_var::<u64>(&lookup, "EVM_SEND_TIMEOUT_SECS")? {
            submission = submission.with_send_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = read_var::<u64>(&lookup, "EVM_CONFIRMATION_TIMEOUT_SECS")? {
            submission = submission.with_confirmation_timeout(Duration::from_secs(secs));
        }
        if let Some(confirmations) = read_var::<u64>(&lookup, "EVM_REQUIRED_CONFIRMATIONS")? {
            submission = submission.with_required_confirmations(confirmations);
        }
        config.submission = submission;

        if let Some(secs) = read_var::<u64>(&lookup, "EVM_READ_TIMEOUT_SECS")? {
            config.reader = ReaderOptions::with_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = network.into();
        self
    }

    pub fn with_signer(mut self, signer: PrivateKeySigner) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_reader_options(mut self, options: ReaderOptions) -> Self {
        self.reader = options;
        self
    }

    pub fn with_submission_options(mut self, options: SubmissionOptions) -> Self {
        self.submission = options;
        self
    }

    pub fn signer(&self) -> Option<&PrivateKeySigner> {
        self.signer.as_ref()
    }

    /// Address actions are sent from, if a signer is configured.
    pub fn sender(&self) -> Option<Address> {
        self.signer.as_ref().map(PrivateKeySigner::address)
    }
}

impl fmt::Debug for EvmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmConfig")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url)
            .field("contract_address", &self.contract_address)
            .field("sender", &self.sender())
            .field("reader", &self.reader)
            .field("submission", &self.submission)
            .finish()
    }
}

impl BlockchainConfig for EvmConfig {
    fn network_name(&self) -> &str {
        &self.network
    }

    fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    fn validate(&self) -> Result<()> {
        let url = self.rpc_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::configuration(format!(
                "EVM_RPC_URL must be an http(s) URL, got `{url}`"
            )));
        }

        if self.contract_address == Address::ZERO {
            return Err(ClientError::configuration(
                "EVM_CONTRACT_ADDRESS cannot be the zero address",
            ));
        }

        if self.reader.timeout.is_zero() {
            return Err(ClientError::configuration(
                "EVM_READ_TIMEOUT_SECS must be greater than 0",
            ));
        }

        if self.submission.send_timeout.is_zero() {
            return Err(ClientError::configuration(
                "EVM_SEND_TIMEOUT_SECS must be greater than 0",
            ));
        }

        if self.submission.confirmation_timeout.is_zero() {
            return Err(ClientError::configuration(
                "EVM_CONFIRMATION_TIMEOUT_SECS must be greater than 0",
            ));
        }

        if let FeePolicy::Eip1559 {
            max_fee_per_gas,
            max_priority_fee_per_gas,
        } = self.submission.fee
        {
            if max_priority_fee_per_gas > max_fee_per_gas {
                return Err(ClientError::configuration(
                    "EVM_MAX_PRIORITY_FEE_PER_GAS cannot exceed EVM_MAX_FEE_PER_GAS",
                ));
            }
        }

        Ok(())
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ClientError::configuration(format!("{key} is not set")))
}

/// Parse an optional variable; present but malformed is an error.
fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|err| invalid(key, err)),
    }
}

fn invalid(key: &str, err: impl fmt::Display) -> ClientError {
    ClientError::configuration(format!("{key} is invalid: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    // Well-known development key (first default account of local dev nodes).
    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = EvmConfig::from_lookup(lookup(&[
            ("EVM_RPC_URL", "http://127.0.0.1:8545"),
            ("EVM_CONTRACT_ADDRESS", CONTRACT),
        ]))
        .unwrap();

        assert_eq!(config.network_name(), "evm");
        assert_eq!(config.rpc_url(), "http://127.0.0.1:8545");
        assert!(config.signer().is_none());
        assert_eq!(config.submission, SubmissionOptions::default());
        assert_eq!(config.reader, ReaderOptions::default());
    }

    #[test]
    fn full_config_is_parsed() {
        let config = EvmConfig::from_lookup(lookup(&[
            ("EVM_RPC_URL", "https://rpc.example.org"),
            ("EVM_CONTRACT_ADDRESS", CONTRACT),
            ("EVM_PRIVATE_KEY", DEV_KEY),
            ("EVM_NETWORK", "devnet"),
            ("EVM_FEE_POLICY", "EIP1559"),
            ("EVM_MAX_FEE_PER_GAS", "2000000000"),
            ("EVM_MAX_PRIORITY_FEE_PER_GAS", "1000000000"),
            ("EVM_SEND_TIMEOUT_SECS", "15"),
            ("EVM_CONFIRMATION_TIMEOUT_SECS", "90"),
            ("EVM_REQUIRED_CONFIRMATIONS", "2"),
            ("EVM_READ_TIMEOUT_SECS", "4"),
        ]))
        .unwrap();

        assert_eq!(config.network_name(), "devnet");
        assert!(config.sender().is_some());
        assert_eq!(
            config.submission.fee,
            FeePolicy::Eip1559 {
                max_fee_per_gas: 2_000_000_000,
                max_priority_fee_per_gas: 1_000_000_000,
            }
        );
        assert_eq!(config.submission.send_timeout, Duration::from_secs(15));
        assert_eq!(config.submission.confirmation_timeout, Duration::from_secs(90));
        assert_eq!(config.submission.required_confirmations, 2);
        assert_eq!(config.reader.timeout, Duration::from_secs(4));
    }

    #[test]
    fn debug_output_never_contains_the_key() {
        let config = EvmConfig::from_lookup(lookup(&[
            ("EVM_RPC_URL", "http://127.0.0.1:8545"),
            ("EVM_CONTRACT_ADDRESS", CONTRACT),
            ("EVM_PRIVATE_KEY", DEV_KEY),
        ]))
        .unwrap();

        let rendered = format!("{config:?}");
        assert!(!rendered.contains(DEV_KEY));
        assert!(!rendered.contains(&DEV_KEY[..16]));
    }

    #[test]
    fn missing_and_malformed_values_are_rejected() {
        let cases: Vec<Vec<(&str, &str)>> = vec![
            vec![("EVM_CONTRACT_ADDRESS", CONTRACT)],
            vec![("EVM_RPC_URL", "http://127.0.0.1:8545")],
            vec![("EVM_RPC_URL", "ws://127.0.0.1:8545"), ("EVM_CONTRACT_ADDRESS", CONTRACT)],
            vec![("EVM_RPC_URL", "http://127.0.0.1:8545"), ("EVM_CONTRACT_ADDRESS", "0x1234")],
            vec![
                ("EVM_RPC_URL", "http://127.0.0.1:8545"),
                ("EVM_CONTRACT_ADDRESS", CONTRACT),
                ("EVM_PRIVATE_KEY", "not-a-key"),
            ],
            vec![
                ("EVM_RPC_URL", "http://127.0.0.1:8545"),
                ("EVM_CONTRACT_ADDRESS", CONTRACT),
                ("EVM_FEE_POLICY", "free"),
            ],
            vec![
                ("EVM_RPC_URL", "http://127.0.0.1:8545"),
                ("EVM_CONTRACT_ADDRESS", CONTRACT),
                ("EVM_GAS_PRICE", "cheap"),
            ],
            vec![
                ("EVM_RPC_URL", "http://127.0.0.1:8545"),
                ("EVM_CONTRACT_ADDRESS", CONTRACT),
                ("EVM_READ_TIMEOUT_SECS", "0"),
            ],
            vec![
                ("EVM_RPC_URL", "http://127.0.0.1:8545"),
                ("EVM_CONTRACT_ADDRESS", CONTRACT),
                ("EVM_SEND_TIMEOUT_SECS", "0"),
            ],
        ];

        for vars in cases {
            let err = EvmConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert_eq!(
                err.kind(),
                client_blockchain_core::ErrorKind::Configuration,
                "vars: {vars:?}"
            );
        }
    }
}
