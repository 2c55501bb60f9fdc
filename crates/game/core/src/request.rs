//! Inputs for state-changing contract calls.

use alloy_primitives::Address;

use crate::chain::ChainId;
use crate::roster::{CharacterId, PowerId};

/// Attack or heal with one character, optionally boosted by a power.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRequest {
    pub chain: ChainId,
    pub character: CharacterId,
    pub power: Option<PowerId>,
    pub is_attack: bool,
}

impl ActionRequest {
    pub fn attack(chain: ChainId, character: CharacterId) -> Self {
        Self {
            chain,
            character,
            power: None,
            is_attack: true,
        }
    }

    pub fn heal(chain: ChainId, character: CharacterId) -> Self {
        Self {
            is_attack: false,
            ..Self::attack(chain, character)
        }
    }

    pub fn with_power(mut self, power: PowerId) -> Self {
        self.power = Some(power);
        self
    }

    /// Power argument as the contract expects it: `0` when no power is used.
    pub fn power_argument(&self) -> u64 {
        self.power
            .map_or(PowerId::NONE_ARGUMENT, |power| u64::from(power.id()))
    }
}

/// Per-chain roster selection submitted when (re)starting a game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetupRequest {
    pub chain: ChainId,
    pub characters: [CharacterId; 4],
    pub powers: [PowerId; 2],
    pub opponent: Address,
}

impl SetupRequest {
    pub fn new(
        chain: ChainId,
        characters: [CharacterId; 4],
        powers: [PowerId; 2],
        opponent: Address,
    ) -> Self {
        Self {
            chain,
            characters,
            powers,
            opponent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_power_is_sent_as_zero() {
        let request = ActionRequest::attack(ChainId(11155420), CharacterId::AlienX);
        assert_eq!(request.power_argument(), 0);

        let boosted = request.with_power(PowerId::Huff);
        assert_eq!(boosted.power_argument(), 2);
    }

    #[test]
    fn heal_keeps_character_and_chain() {
        let request = ActionRequest::heal(ChainId(421614), CharacterId::Bubbles);
        assert!(!request.is_attack);
        assert_eq!(request.character, CharacterId::Bubbles);
        assert_eq!(request.power, None);
    }
}
