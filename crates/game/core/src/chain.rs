use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Identifier of a participating chain (the contract's `uint32 chainSlug`).
///
/// The contract stores `0` for "unset", so `ChainId(0)` never names a real chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ChainId(pub u32);

impl ChainId {
    /// Raw slug reported by the contract when no chain is assigned.
    pub const UNSET: u32 = 0;

    pub const fn new(slug: u32) -> Self {
        Self(slug)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Interpret a raw contract slug, mapping the unset sentinel to `None`.
    pub const fn from_raw(slug: u32) -> Option<Self> {
        if slug == Self::UNSET {
            None
        } else {
            Some(Self(slug))
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ChainId {
    fn from(slug: u32) -> Self {
        Self(slug)
    }
}

impl FromStr for ChainId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = s
            .trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "chain id".to_string(),
                reason: format!("{s:?}: {e}"),
            })?;
        match Self::from_raw(slug) {
            Some(chain) => Ok(chain),
            None => Err(ConfigError::ZeroChain),
        }
    }
}

/// A configured chain together with its display name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainProfile {
    pub id: ChainId,
    pub name: String,
}

impl ChainProfile {
    pub fn new(id: ChainId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Profile whose display name is just the numeric slug.
    pub fn unnamed(id: ChainId) -> Self {
        Self::new(id, id.to_string())
    }
}

impl FromStr for ChainProfile {
    type Err = ConfigError;

    /// Parses `id` or `id=name`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((id, name)) if !name.trim().is_empty() => {
                Ok(Self::new(id.parse()?, name.trim()))
            }
            Some((id, _)) => Ok(Self::unnamed(id.parse()?)),
            None => Ok(Self::unnamed(s.parse()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_slug_is_not_a_chain() {
        assert_eq!(ChainId::from_raw(0), None);
        assert_eq!(ChainId::from_raw(421614), Some(ChainId(421614)));
    }

    #[test]
    fn parses_profiles_with_and_without_names() {
        let named: ChainProfile = "421614=arbitrum-sepolia".parse().unwrap();
        assert_eq!(named.id, ChainId(421614));
        assert_eq!(named.name, "arbitrum-sepolia");

        let bare: ChainProfile = " 11155420 ".parse().unwrap();
        assert_eq!(bare.id, ChainId(11155420));
        assert_eq!(bare.name, "11155420");
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert_eq!("0".parse::<ChainId>(), Err(ConfigError::ZeroChain));
        assert!(matches!(
            "arbitrum".parse::<ChainId>(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
