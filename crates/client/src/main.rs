//! Puff Puff Pass client binary.
//!
//! Main entry point for the `puffpuff` command.
//!
//! # Architecture
//!
//! This binary is the composition root that assembles:
//! 1. Configuration (game from `GAME_*`, contract from `EVM_*`)
//! 2. Contract backend (`EvmGameClient`)
//! 3. Client (reader + optional submitter)
//!
//! # Examples
//!
//! ```bash
//! puffpuff state
//! puffpuff watch --interval-ms 5000
//! puffpuff play --chain 11155420 --character alienx --power buff
//! puffpuff refresh-life --chain 421614
//! ```

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use client_blockchain_evm::{EvmConfig, EvmGameClient};
use ppp_client::{Client, ClientConfig, logging};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Cli::parse();

    // 1. Load configuration from environment
    let config = ClientConfig::from_env().context("Failed to load game configuration")?;
    let evm_config = EvmConfig::from_env().context("Failed to load EVM configuration")?;

    // 2. Setup logging
    let log_dir = args
        .log_file
        .then(|| config.log_dir.clone().unwrap_or_else(logging::default_log_dir));
    let _log_guard = logging::setup_logging(log_dir.as_deref())?;

    tracing::info!(
        network = %evm_config.network,
        chains = ?config.game.chain_ids(),
        "Starting puffpuff"
    );

    // 3. Build contract backend
    let contract = EvmGameClient::connect(&evm_config).context("Failed to set up EVM client")?;
    let can_sign = contract.can_sign();

    // 4. Build Client
    let mut builder = Client::builder()
        .contract(contract)
        .config(config.game)
        .reader_options(evm_config.reader.clone())
        .submission_options(evm_config.submission.clone());
    if !can_sign {
        tracing::debug!("No signing key configured, client is read-only");
        builder = builder.read_only();
    }
    let client = builder.build().context("Failed to build client")?;

    // 5. Run command
    cli::run(args.command, &client).await
}
