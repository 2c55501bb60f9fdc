//! Client configuration loaded from the environment.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use client_blockchain_core::{ClientError, Result};
use game_core::{
    Address, ChainId, ChainProfile, CharacterId, ConfigError, GameConfig, PowerId, SetupRequest,
};

/// Everything the binary needs besides the contract connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub game: GameConfig,

    /// Directory for log files (`None`: platform cache directory)
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `GAME_CHAINS` - Chains in setup order, `id[=name],...`
    ///   (default: 421614=arbitrum-sepolia,11155420=optimism-sepolia)
    /// - `GAME_POLL_INTERVAL_MS` - Delay between polls (default: 3000)
    /// - `GAME_SETUP_OPPONENT` - Opponent address passed to setup
    /// - `GAME_SETUP_ROSTERS` - Per-chain rosters, `chain=c1,c2,c3,c4;...`
    ///   (characters by name or id; default: alternating default rosters)
    /// - `GAME_SETUP_POWERS` - Powers for every setup call, `p1,p2` (default: Buff,Huff)
    /// - `PPP_LOG_DIR` - Log file directory
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let chains = match read("GAME_CHAINS") {
            Some(value) => parse_chains(&value).map_err(|err| invalid("GAME_CHAINS", err))?,
            None => GameConfig::default().chains,
        };

        let opponent = match read("GAME_SETUP_OPPONENT") {
            Some(value) => value
                .trim()
                .parse::<Address>()
                .map_err(|err| invalid("GAME_SETUP_OPPONENT", err))?,
            None => GameConfig::DEFAULT_OPPONENT,
        };

        let powers = match read("GAME_SETUP_POWERS") {
            Some(value) => parse_powers(&value).map_err(|err| invalid("GAME_SETUP_POWERS", err))?,
            None => GameConfig::DEFAULT_POWERS,
        };

        let setup = match read("GAME_SETUP_ROSTERS") {
            Some(value) => parse_rosters(&value)
                .map_err(|err| invalid("GAME_SETUP_ROSTERS", err))?
                .into_iter()
                .map(|(chain, characters)| SetupRequest::new(chain, characters, powers, opponent))
                .collect(),
            None => GameConfig::default_setup(&chains, opponent)
                .into_iter()
                .map(|request| SetupRequest { powers, ..request })
                .collect(),
        };

        let mut game = GameConfig::new(chains).with_setup(setup);
        if let Some(value) = read("GAME_POLL_INTERVAL_MS") {
            let millis = value
                .trim()
                .parse::<u64>()
                .map_err(|err| invalid("GAME_POLL_INTERVAL_MS", err))?;
            game = game.with_poll_interval(Duration::from_millis(millis));
        }
        game.validate()?;

        Ok(Self {
            game,
            log_dir: read("PPP_LOG_DIR").map(PathBuf::from),
        })
    }
}

fn invalid(key: &str, err: impl fmt::Display) -> ClientError {
    ClientError::configuration(format!("{key} is invalid: {err}"))
}

fn parse_chains(value: &str) -> std::result::Result<Vec<ChainProfile>, ConfigError> {
    value
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(ChainProfile::from_str)
        .collect()
}

/// `p1,p2`, by name or id.
fn parse_powers(value: &str) -> std::result::Result<[PowerId; 2], ConfigError> {
    let powers = value
        .split(',')
        .map(PowerId::from_token)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    <[PowerId; 2]>::try_from(powers).map_err(|powers| ConfigError::InvalidValue {
        key: "powers".to_string(),
        reason: format!("expected 2 powers, got {}", powers.len()),
    })
}

/// `chain=c1,c2,c3,c4;chain=...`, characters by name or id.
fn parse_rosters(
    value: &str,
) -> std::result::Result<Vec<(ChainId, [CharacterId; 4])>, ConfigError> {
    value
        .split(';')
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| {
            let (chain, characters) =
                entry
                    .split_once('=')
                    .ok_or_else(|| ConfigError::InvalidValue {
                        key: "roster".to_string(),
                        reason: format!("`{}` is not `chain=c1,c2,c3,c4`", entry.trim()),
                    })?;
            let chain = chain.parse::<ChainId>()?;
            let characters = characters
                .split(',')
                .map(CharacterId::from_token)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            let characters = <[CharacterId; 4]>::try_from(characters).map_err(|characters| {
                ConfigError::InvalidValue {
                    key: "roster".to_string(),
                    reason: format!(
                        "chain {chain} needs 4 characters, got {}",
                        characters.len()
                    ),
                }
            })?;
            Ok((chain, characters))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_blockchain_core::ErrorKind;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_public_deployment() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.game, GameConfig::default());
        assert_eq!(config.game.poll_interval, Duration::from_secs(3));
        assert_eq!(config.game.setup.len(), 2);
        assert_eq!(config.game.setup[1].characters, GameConfig::DEFAULT_ROSTERS[1]);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn custom_chains_and_rosters() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("GAME_CHAINS", "84532=base-sepolia, 421614"),
            ("GAME_POLL_INTERVAL_MS", "500"),
            ("GAME_SETUP_ROSTERS", "84532=alienx,1,2,3; 421614=Sedusa,Mojojojo,4,5"),
            ("GAME_SETUP_POWERS", "huff,buff"),
            ("GAME_SETUP_OPPONENT", "0x0000000000000000000000000000000000000001"),
            ("PPP_LOG_DIR", "/tmp/ppp"),
        ]))
        .unwrap();

        let game = &config.game;
        assert_eq!(game.chain_ids(), vec![ChainId(84532), ChainId(421614)]);
        assert_eq!(game.chain_name(ChainId(84532)), "base-sepolia");
        assert_eq!(game.chain_name(ChainId(421614)), "421614");
        assert_eq!(game.poll_interval, Duration::from_millis(500));

        assert_eq!(game.setup.len(), 2);
        assert_eq!(
            game.setup[0].characters,
            [
                CharacterId::AlienX,
                CharacterId::Bubbles,
                CharacterId::Blossom,
                CharacterId::Buttercup
            ]
        );
        assert_eq!(game.setup[1].powers, [PowerId::Huff, PowerId::Buff]);
        assert_eq!(game.setup[1].opponent, Address::with_last_byte(1));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/ppp")));
    }

    #[test]
    fn default_setup_follows_custom_powers() {
        let config =
            ClientConfig::from_lookup(lookup(&[("GAME_SETUP_POWERS", "2,2")])).unwrap();
        assert!(
            config
                .game
                .setup
                .iter()
                .all(|request| request.powers == [PowerId::Huff, PowerId::Huff])
        );
    }

    #[test]
    fn malformed_values_are_configuration_errors() {
        let cases: &[&[(&str, &str)]] = &[
            &[("GAME_CHAINS", "421614,421614")],
            &[("GAME_CHAINS", "0")],
            &[("GAME_CHAINS", "arbitrum")],
            &[("GAME_POLL_INTERVAL_MS", "0")],
            &[("GAME_POLL_INTERVAL_MS", "soon")],
            &[("GAME_SETUP_POWERS", "buff")],
            &[("GAME_SETUP_ROSTERS", "421614=1,2,3")],
            &[("GAME_SETUP_ROSTERS", "421614=1,2,3,9")],
            &[("GAME_SETUP_ROSTERS", "999=1,2,3,4")],
            &[("GAME_SETUP_OPPONENT", "0xabc")],
        ];

        for vars in cases {
            let err = ClientConfig::from_lookup(lookup(vars)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration, "vars: {vars:?}");
        }
    }
}
