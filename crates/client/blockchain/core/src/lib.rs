//! Contract access layer for Puff Puff Pass.
//!
//! This crate provides a layered abstraction over the game contract.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: GameContract (composite trait, one per backend)
//!          ├── FixtureContract (in-memory)
//!          └── EvmGameClient   (client-blockchain-evm)
//!
//! Layer 1: StateReader / ActionSubmitter / SnapshotPoller
//!
//! Layer 0: ContractReader / ContractWriter (raw entrypoints)
//! ```
//!
//! # Design Philosophy
//!
//! - **Layer 0**: Raw view and action entrypoints, values exactly as on-chain
//! - **Layer 1**: Consistent snapshots, u64 narrowing, confirmation and timeouts
//! - **Layer 2**: Complete backend, swappable behind one trait
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_core::{FixtureContract, ReaderOptions, StateReader};
//!
//! let chains = [ChainId(421614), ChainId(11155420)];
//! let reader = StateReader::new(FixtureContract::in_progress(&chains), ReaderOptions::default());
//! let snapshot = reader.read(&chains).await?;
//! ```

pub mod error;
pub mod fixture;
pub mod poller;
pub mod reader;
pub mod submitter;
pub mod traits;
pub mod types;

pub use error::{ClientError, ErrorKind, Result, narrow_u64};
pub use fixture::FixtureContract;
pub use poller::{PollState, PollerCommand, PollerHandle, SnapshotPoller};
pub use reader::StateReader;
pub use submitter::ActionSubmitter;
pub use traits::{BlockchainConfig, ContractReader, ContractWriter, GameContract};
pub use types::{ContractCall, FeePolicy, ReadCall, ReaderOptions, SubmissionOptions, TxReceipt};
