//! Top-level client for the Puff Puff Pass game.
//!
//! # Architecture
//!
//! ```text
//! Client<C: GameContract> (composition root)
//!   ├─→ StateReader      (snapshot of the configured chains)
//!   ├─→ ActionSubmitter  (optional; absent on read-only clients)
//!   └─→ GameConfig       (chains, poll interval, setup plan)
//! ```
//!
//! # Separation of Concerns
//!
//! - **Client**: validates requests against the configuration and re-reads
//!   the game after every mutation
//! - **StateReader / ActionSubmitter**: contract access, confirmation, timeouts
//! - **GameContract**: the backend (live EVM or in-memory fixture)
//!
//! The same contract handle backs both the reader and the submitter.

mod builder;
pub mod config;
pub mod logging;
pub mod render;

pub use builder::ClientBuilder;
pub use config::ClientConfig;
pub use render::SnapshotView;

use std::sync::Arc;
use std::time::Duration;

use client_blockchain_core::{
    ActionSubmitter, ClientError, GameContract, Result, SnapshotPoller, StateReader,
};
use game_core::{ActionRequest, ChainId, GameConfig, GameSnapshot};
use tracing::info;

/// Game client bound to one contract backend.
///
/// # Lifecycle
///
/// 1. `Client::builder()` assembles the contract handle and configuration
/// 2. `snapshot()` reads the configured chains
/// 3. `play()` / `restart()` / `refresh_life()` submit, confirm, then re-read
/// 4. `poller()` yields a background poller over the same reader
pub struct Client<C> {
    config: GameConfig,
    chains: Vec<ChainId>,
    reader: StateReader<Arc<C>>,
    submitter: Option<ActionSubmitter<Arc<C>>>,
}

impl<C: GameContract + 'static> Client<C> {
    /// Create a new ClientBuilder.
    pub fn builder() -> ClientBuilder<C> {
        ClientBuilder::new()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn contract(&self) -> &C {
        self.reader.contract()
    }

    /// Whether mutations are rejected.
    pub fn is_read_only(&self) -> bool {
        self.submitter.is_none()
    }

    /// Read the current game state for all configured chains.
    pub async fn snapshot(&self) -> Result<GameSnapshot> {
        self.reader.read(&self.chains).await
    }

    /// Attack or heal on `request.chain`, then read the resulting state.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the chain is not configured or the client is read-only
    /// - `Transaction` if the call is rejected, reverts or is not confirmed
    /// - any error of the follow-up [`snapshot`](Self::snapshot)
    pub async fn play(&self, request: &ActionRequest) -> Result<GameSnapshot> {
        self.ensure_configured(request.chain)?;
        let receipt = self.submitter()?.submit_play(request).await?;
        info!(
            chain = %request.chain,
            character = %request.character,
            power = ?request.power,
            attack = request.is_attack,
            tx_hash = %receipt.tx_hash,
            "Played character"
        );
        self.snapshot().await
    }

    /// Run the configured setup plan chain by chain, then read the new game.
    ///
    /// Stops at the first failing chain; chains already set up stay set up.
    pub async fn restart(&self) -> Result<GameSnapshot> {
        let submitter = self.submitter()?;
        let receipts = submitter.submit_setup(&self.config.setup).await?;
        info!(chains = receipts.len(), "Game restarted");
        self.snapshot().await
    }

    /// Refresh life on `chains` (all configured chains when `None`), then read.
    pub async fn refresh_life(&self, chains: Option<&[ChainId]>) -> Result<GameSnapshot> {
        let chains = match chains {
            Some(chains) => {
                for chain in chains {
                    self.ensure_configured(*chain)?;
                }
                chains.to_vec()
            }
            None => self.chains.clone(),
        };

        let receipt = self.submitter()?.submit_life_refresh(&chains).await?;
        info!(chains = chains.len(), tx_hash = %receipt.tx_hash, "Life refreshed");
        self.snapshot().await
    }

    /// Poller over the configured chains at the configured interval.
    pub fn poller(&self) -> SnapshotPoller<Arc<C>> {
        self.poller_with_interval(self.config.poll_interval)
    }

    pub fn poller_with_interval(&self, interval: Duration) -> SnapshotPoller<Arc<C>> {
        SnapshotPoller::new(self.reader.clone(), self.chains.clone(), interval)
    }

    fn submitter(&self) -> Result<&ActionSubmitter<Arc<C>>> {
        self.submitter.as_ref().ok_or_else(|| {
            ClientError::configuration("client is read-only; no signing credential configured")
        })
    }

    fn ensure_configured(&self, chain: ChainId) -> Result<()> {
        if self.config.is_configured(chain) {
            Ok(())
        } else {
            Err(ClientError::configuration(format!(
                "chain {chain} is not configured"
            )))
        }
    }
}
