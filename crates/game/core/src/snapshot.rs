//! Immutable view of the game assembled from one round of contract reads.
//!
//! A [`GameSnapshot`] is produced fresh by every read and is never updated in
//! place. Callers reconcile successive snapshots by replacing the old value.

use std::collections::BTreeMap;

use crate::chain::ChainId;
use crate::roster::{CharacterId, PowerId};

/// Remaining turns for one character on one chain.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterState {
    pub name: String,
    pub turns_left: u64,
}

impl CharacterState {
    pub fn new(id: CharacterId, turns_left: u64) -> Self {
        Self {
            name: id.name().to_string(),
            turns_left,
        }
    }

    pub fn is_available(&self) -> bool {
        self.turns_left > 0
    }
}

/// Remaining uses of one power on one chain.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerState {
    pub name: String,
    pub power_left: u64,
}

impl PowerState {
    pub fn new(id: PowerId, power_left: u64) -> Self {
        Self {
            name: id.name().to_string(),
            power_left,
        }
    }

    pub fn is_available(&self) -> bool {
        self.power_left > 0
    }
}

/// Consistent read of game state across every requested chain.
///
/// `characters` and `powers` always hold the full id ranges for each chain; a
/// counter of zero is data, not absence.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    pub game_started: bool,
    pub game_ended: bool,

    /// Winning chain; only set once the contract reports the game as ended.
    pub winner: Option<ChainId>,

    /// Chain whose turn it is; `None` while the contract has not assigned one.
    pub current_turn: Option<ChainId>,

    pub chemical_x: BTreeMap<ChainId, u64>,
    pub life: BTreeMap<ChainId, u64>,
    pub characters: BTreeMap<ChainId, BTreeMap<CharacterId, CharacterState>>,
    pub powers: BTreeMap<ChainId, BTreeMap<PowerId, PowerState>>,
}

impl GameSnapshot {
    /// Chains covered by this snapshot, in ascending id order.
    pub fn chains(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.life.keys().copied()
    }

    pub fn is_turn_of(&self, chain: ChainId) -> bool {
        self.current_turn == Some(chain)
    }

    pub fn is_winner(&self, chain: ChainId) -> bool {
        self.game_ended && self.winner == Some(chain)
    }

    pub fn life_of(&self, chain: ChainId) -> Option<u64> {
        self.life.get(&chain).copied()
    }

    pub fn chemical_x_of(&self, chain: ChainId) -> Option<u64> {
        self.chemical_x.get(&chain).copied()
    }

    /// Characters on `chain` that still have turns left, in id order.
    pub fn available_characters(
        &self,
        chain: ChainId,
    ) -> impl Iterator<Item = (CharacterId, &CharacterState)> + '_ {
        self.characters
            .get(&chain)
            .into_iter()
            .flat_map(|roster| roster.iter())
            .filter(|(_, state)| state.is_available())
            .map(|(id, state)| (*id, state))
    }

    /// Powers on `chain` that still have uses left, in id order.
    pub fn available_powers(
        &self,
        chain: ChainId,
    ) -> impl Iterator<Item = (PowerId, &PowerState)> + '_ {
        self.powers
            .get(&chain)
            .into_iter()
            .flat_map(|powers| powers.iter())
            .filter(|(_, state)| state.is_available())
            .map(|(id, state)| (*id, state))
    }
}
