//! Static roster table: character and power identifiers with their names and stats.
//!
//! The contract only deals in numeric ids. Names and stats are fixed client-side
//! metadata and live here, in one place, attached to the id enums themselves.

use strum::IntoEnumIterator;

use crate::error::ConfigError;

// ============================================================================
// Characters
// ============================================================================

/// Playable character (contract ids 1..=8).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
    strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum CharacterId {
    Bubbles = 1,
    Blossom = 2,
    Buttercup = 3,
    ProfessorX = 4,
    Mojojojo = 5,
    Sedusa = 6,
    RowdyRuff = 7,
    AlienX = 8,
}

/// Attack/heal profile shown next to a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStats {
    pub attack: u32,
    pub heal: u32,
    pub cost: u32,
}

impl CharacterId {
    pub const COUNT: usize = 8;

    /// Numeric id used in contract calls.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    pub const fn stats(self) -> CharacterStats {
        let (attack, heal, cost) = match self {
            Self::Bubbles => (5, 10, 5),
            Self::Blossom => (10, 5, 5),
            Self::Buttercup => (8, 7, 5),
            Self::ProfessorX => (2, 10, 5),
            Self::Mojojojo => (10, 5, 5),
            Self::Sedusa => (8, 7, 5),
            Self::RowdyRuff => (5, 10, 5),
            Self::AlienX => (25, 35, 6),
        };
        CharacterStats { attack, heal, cost }
    }

    /// All characters in id order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Parse either a numeric id (`"4"`) or a case-insensitive name (`"professorx"`).
    pub fn from_token(token: &str) -> Result<Self, ConfigError> {
        let token = token.trim();
        if let Ok(raw) = token.parse::<u64>() {
            return Self::try_from(raw);
        }
        token.parse().map_err(|_| ConfigError::InvalidValue {
            key: "character".to_string(),
            reason: format!("{token:?} is not a known character"),
        })
    }
}

impl TryFrom<u64> for CharacterId {
    type Error = ConfigError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        u8::try_from(raw)
            .ok()
            .and_then(Self::from_repr)
            .ok_or(ConfigError::UnknownCharacter(raw))
    }
}

// ============================================================================
// Powers
// ============================================================================

/// Modifier usable alongside an action (contract ids 1..=2).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
    strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum PowerId {
    Buff = 1,
    Huff = 2,
}

/// Multipliers a power applies to the action it accompanies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerStats {
    pub attack_multiplier: u32,
    pub heal_multiplier: u32,
    pub cost: u32,
}

impl PowerId {
    pub const COUNT: usize = 2;

    /// Raw argument the contract expects when an action uses no power.
    pub const NONE_ARGUMENT: u64 = 0;

    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    pub const fn stats(self) -> PowerStats {
        match self {
            Self::Buff => PowerStats {
                attack_multiplier: 2,
                heal_multiplier: 1,
                cost: 5,
            },
            Self::Huff => PowerStats {
                attack_multiplier: 1,
                heal_multiplier: 2,
                cost: 5,
            },
        }
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    pub fn from_token(token: &str) -> Result<Self, ConfigError> {
        let token = token.trim();
        if let Ok(raw) = token.parse::<u64>() {
            return Self::try_from(raw);
        }
        token.parse().map_err(|_| ConfigError::InvalidValue {
            key: "power".to_string(),
            reason: format!("{token:?} is not a known power"),
        })
    }
}

impl TryFrom<u64> for PowerId {
    type Error = ConfigError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        u8::try_from(raw)
            .ok()
            .and_then(Self::from_repr)
            .ok_or(ConfigError::UnknownPower(raw))
    }
}
