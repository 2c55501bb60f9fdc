//! Common types for contract interactions.

use std::fmt;
use std::time::Duration;

use alloy_primitives::{Address, TxHash};
use game_core::{ChainId, CharacterId, PowerId};

// ============================================================================
// Calls
// ============================================================================

/// View function of the game contract, used to label reads in logs and errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReadCall {
    GameStarted,
    GameEnded,
    Winner,
    CurrentTurn,
    CharacterTurnsLeft(ChainId, CharacterId),
    PowersLeft(ChainId, PowerId),
    ChemicalX(ChainId),
    Life(ChainId),
}

impl fmt::Display for ReadCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameStarted => write!(f, "gameStarted()"),
            Self::GameEnded => write!(f, "gameEnded()"),
            Self::Winner => write!(f, "winner()"),
            Self::CurrentTurn => write!(f, "currentTurnChainSlug()"),
            Self::CharacterTurnsLeft(chain, character) => {
                write!(f, "playerCharacterTurnsLeft({chain}, {})", character.id())
            }
            Self::PowersLeft(chain, power) => write!(f, "playerPowersLeft({chain}, {})", power.id()),
            Self::ChemicalX(chain) => write!(f, "chemicalXAmount({chain})"),
            Self::Life(chain) => write!(f, "lifeMapping({chain})"),
        }
    }
}

/// State-changing call against the contract's action entrypoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractCall {
    Setup {
        chain: ChainId,
        characters: [CharacterId; 4],
        powers: [PowerId; 2],
        opponent: Address,
    },
    PlayWithCharacter {
        chain: ChainId,
        is_attack: bool,
        character: CharacterId,
        /// Raw power id; `0` means no power.
        power: u64,
    },
    RefreshLife {
        chains: Vec<ChainId>,
    },
}

impl ContractCall {
    /// Short action label used in logs and `TransactionError`s.
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Setup { .. } => "setup",
            Self::PlayWithCharacter { .. } => "playWithCharacter",
            Self::RefreshLife { .. } => "refreshLife",
        }
    }
}

// ============================================================================
// Submission
// ============================================================================

/// How transaction fees are set on submitted calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeePolicy {
    /// Legacy (type 0) envelope with an explicit gas price.
    Legacy { gas_price: u128 },

    /// EIP-1559 envelope with explicit fee caps.
    Eip1559 {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },

    /// Let the provider estimate fees.
    Provider,
}

impl Default for FeePolicy {
    /// Zero-priced legacy transactions, as accepted by the fee-free game network.
    fn default() -> Self {
        Self::Legacy { gas_price: 0 }
    }
}

/// Options applied to every submitted call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionOptions {
    pub fee: FeePolicy,

    /// Upper bound on handing a call to the network (nonce, gas and fee
    /// lookups included).
    pub send_timeout: Duration,

    /// Upper bound on waiting for the receipt after a call was accepted.
    pub confirmation_timeout: Duration,

    /// Blocks required on top of the inclusion block.
    pub required_confirmations: u64,
}

impl SubmissionOptions {
    pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn with_fee(mut self, fee: FeePolicy) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    pub fn with_required_confirmations(mut self, confirmations: u64) -> Self {
        self.required_confirmations = confirmations.max(1);
        self
    }
}

impl Default for SubmissionOptions {
    fn default() -> Self {
        Self {
            fee: FeePolicy::default(),
            send_timeout: Self::DEFAULT_SEND_TIMEOUT,
            confirmation_timeout: Self::DEFAULT_CONFIRMATION_TIMEOUT,
            required_confirmations: 1,
        }
    }
}

/// Outcome of a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// `false` when the transaction was mined but reverted.
    pub success: bool,
}

/// Options for snapshot reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Upper bound on one complete snapshot read.
    pub timeout: Duration,

    /// Chains the contract may name as current turn or winner. Empty accepts
    /// any non-zero slug.
    pub known_chains: Vec<ChainId>,
}

impl ReaderOptions {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            known_chains: Vec::new(),
        }
    }

    pub fn with_known_chains(mut self, chains: Vec<ChainId>) -> Self {
        self.known_chains = chains;
        self
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_submission_is_zero_priced_legacy() {
        let options = SubmissionOptions::default();
        assert_eq!(options.fee, FeePolicy::Legacy { gas_price: 0 });
        assert_eq!(options.required_confirmations, 1);
        assert_eq!(options.confirmation_timeout, Duration::from_secs(60));
        assert_eq!(options.send_timeout, Duration::from_secs(30));
    }

    #[test]
    fn read_calls_render_like_the_abi() {
        let call = ReadCall::CharacterTurnsLeft(ChainId(421614), CharacterId::ProfessorX);
        assert_eq!(call.to_string(), "playerCharacterTurnsLeft(421614, 4)");
        assert_eq!(ReadCall::Life(ChainId(7)).to_string(), "lifeMapping(7)");
    }
}
