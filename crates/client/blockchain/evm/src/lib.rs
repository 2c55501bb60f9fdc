//! EVM backend for the Puff Puff Pass contract.
//!
//! Implements [`GameContract`](client_blockchain_core::GameContract) on top of
//! `alloy`: view calls over HTTP JSON-RPC, action calls signed with a local
//! private key.
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_evm::{EvmConfig, EvmGameClient};
//! use client_blockchain_core::{StateReader, ReaderOptions};
//!
//! let config = EvmConfig::from_env()?;
//! let client = EvmGameClient::connect(&config)?;
//! let reader = StateReader::new(client, config.reader.clone());
//! let snapshot = reader.read(&[ChainId(421614), ChainId(11155420)]).await?;
//! ```

pub mod client;
pub mod config;
pub mod contract;
pub mod error;

pub use client::EvmGameClient;
pub use config::EvmConfig;
