//! Domain values for the Puff Puff Pass game client.
//!
//! `game-core` defines the identifiers (chains, characters, powers), the static
//! roster table, the immutable [`GameSnapshot`] assembled from contract reads, and
//! the request values handed to the submission layer. Game rules are owned by the
//! on-chain contract; nothing in this crate computes turns, damage or winners.
pub mod chain;
pub mod config;
pub mod error;
pub mod request;
pub mod roster;
pub mod snapshot;

pub use alloy_primitives::Address;
pub use chain::{ChainId, ChainProfile};
pub use config::GameConfig;
pub use error::ConfigError;
pub use request::{ActionRequest, SetupRequest};
pub use roster::{CharacterId, CharacterStats, PowerId, PowerStats};
pub use snapshot::{CharacterState, GameSnapshot, PowerState};
