//! Client builder with dependency injection pattern.

use std::sync::Arc;

use client_blockchain_core::{
    ActionSubmitter, ClientError, GameContract, ReaderOptions, Result, StateReader,
    SubmissionOptions,
};
use game_core::GameConfig;

use crate::Client;

/// Builder for constructing a [`Client`] with proper validation.
///
/// # Design Principles
///
/// - **Required fields**: contract and configuration must be provided
/// - **Optional fields**: reader/submission options fall back to defaults
/// - **Fail-fast validation**: missing fields or an invalid configuration
///   cause `build()` to fail before any call is made
pub struct ClientBuilder<C> {
    contract: Option<Arc<C>>,
    config: Option<GameConfig>,
    reader_options: ReaderOptions,
    submission_options: SubmissionOptions,
    read_only: bool,
}

impl<C> Default for ClientBuilder<C> {
    fn default() -> Self {
        Self {
            contract: None,
            config: None,
            reader_options: ReaderOptions::default(),
            submission_options: SubmissionOptions::default(),
            read_only: false,
        }
    }
}

impl<C: GameContract + 'static> ClientBuilder<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the contract backend (required).
    pub fn contract(self, contract: C) -> Self {
        self.shared_contract(Arc::new(contract))
    }

    /// Set a contract backend that is also used elsewhere.
    pub fn shared_contract(mut self, contract: Arc<C>) -> Self {
        self.contract = Some(contract);
        self
    }

    /// Set the game configuration (required).
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn reader_options(mut self, options: ReaderOptions) -> Self {
        self.reader_options = options;
        self
    }

    pub fn submission_options(mut self, options: SubmissionOptions) -> Self {
        self.submission_options = options;
        self
    }

    /// Build without a submitter; every mutation fails with `Configuration`.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if:
    /// - the contract or configuration is not set
    /// - the configuration does not validate
    pub fn build(self) -> Result<Client<C>> {
        let contract = self.contract.ok_or_else(|| {
            ClientError::configuration("contract is required; use .contract() to set it")
        })?;
        let config = self.config.ok_or_else(|| {
            ClientError::configuration("game configuration is required; use .config() to set it")
        })?;
        config.validate()?;

        tracing::debug!(
            backend = contract.name(),
            network = contract.network(),
            chains = config.chains.len(),
            read_only = self.read_only,
            "Building client"
        );

        // Turn and winner may name any configured chain, not only the ones read.
        let mut reader_options = self.reader_options;
        if reader_options.known_chains.is_empty() {
            reader_options.known_chains = config.chain_ids();
        }

        let submitter = (!self.read_only)
            .then(|| ActionSubmitter::new(Arc::clone(&contract), self.submission_options));

        Ok(Client {
            chains: config.chain_ids(),
            config,
            reader: StateReader::new(contract, reader_options),
            submitter,
        })
    }
}
