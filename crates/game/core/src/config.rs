use std::collections::HashSet;
use std::time::Duration;

use alloy_primitives::{Address, address};

use crate::chain::{ChainId, ChainProfile};
use crate::error::ConfigError;
use crate::request::SetupRequest;
use crate::roster::{CharacterId, PowerId};

/// Game-level configuration: which chains take part, how often to poll, and the
/// roster plan submitted on restart.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Participating chains in setup order.
    pub chains: Vec<ChainProfile>,

    /// Delay between snapshot polls.
    pub poll_interval: Duration,

    /// One setup call per entry, submitted in order on restart.
    pub setup: Vec<SetupRequest>,
}

impl GameConfig {
    // ===== defaults of the public test deployment =====
    pub const ARBITRUM_SEPOLIA: ChainId = ChainId(421614);
    pub const OPTIMISM_SEPOLIA: ChainId = ChainId(11155420);
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);
    pub const DEFAULT_OPPONENT: Address = address!("b62505feacC486e809392c65614Ce4d7b051923b");
    pub const DEFAULT_POWERS: [PowerId; 2] = [PowerId::Buff, PowerId::Huff];

    /// Rosters handed out to chains by position (even index, odd index).
    pub const DEFAULT_ROSTERS: [[CharacterId; 4]; 2] = [
        [
            CharacterId::Bubbles,
            CharacterId::Blossom,
            CharacterId::Buttercup,
            CharacterId::ProfessorX,
        ],
        [
            CharacterId::Mojojojo,
            CharacterId::Sedusa,
            CharacterId::RowdyRuff,
            CharacterId::AlienX,
        ],
    ];

    pub fn new(chains: Vec<ChainProfile>) -> Self {
        let setup = Self::default_setup(&chains, Self::DEFAULT_OPPONENT);
        Self {
            chains,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            setup,
        }
    }

    /// Setup plan that alternates the two default rosters over `chains`.
    pub fn default_setup(chains: &[ChainProfile], opponent: Address) -> Vec<SetupRequest> {
        chains
            .iter()
            .enumerate()
            .map(|(index, profile)| {
                SetupRequest::new(
                    profile.id,
                    Self::DEFAULT_ROSTERS[index % Self::DEFAULT_ROSTERS.len()],
                    Self::DEFAULT_POWERS,
                    opponent,
                )
            })
            .collect()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_setup(mut self, setup: Vec<SetupRequest>) -> Self {
        self.setup = setup;
        self
    }

    /// Configured chain ids in configuration order.
    pub fn chain_ids(&self) -> Vec<ChainId> {
        self.chains.iter().map(|profile| profile.id).collect()
    }

    pub fn is_configured(&self, chain: ChainId) -> bool {
        self.chains.iter().any(|profile| profile.id == chain)
    }

    /// Display name of `chain`, falling back to its numeric id.
    pub fn chain_name(&self, chain: ChainId) -> String {
        self.chains
            .iter()
            .find(|profile| profile.id == chain)
            .map_or_else(|| chain.to_string(), |profile| profile.name.clone())
    }

    /// Check the chain list and setup plan for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chains.is_empty() {
            return Err(ConfigError::NoChains);
        }

        let mut seen = HashSet::new();
        for profile in &self.chains {
            if profile.id.get() == ChainId::UNSET {
                return Err(ConfigError::ZeroChain);
            }
            if !seen.insert(profile.id) {
                return Err(ConfigError::DuplicateChain(profile.id));
            }
        }

        if let Some(request) = self.setup.iter().find(|r| !seen.contains(&r.chain)) {
            return Err(ConfigError::UnconfiguredChain(request.chain));
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "poll interval".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(vec![
            ChainProfile::new(Self::ARBITRUM_SEPOLIA, "arbitrum-sepolia"),
            ChainProfile::new(Self::OPTIMISM_SEPOLIA, "optimism-sepolia"),
        ])
    }
}
