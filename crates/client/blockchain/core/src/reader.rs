//! Snapshot assembly from concurrent contract reads.
//!
//! One [`StateReader::read`] issues every view call it needs at once (4 global
//! reads plus 12 per chain) on the current task and only assembles a
//! [`GameSnapshot`] after all of them resolved. The first failure aborts the
//! whole read, so a torn snapshot is never observable.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::future::Future;
use std::time::Instant;

use futures::future::try_join_all;
use game_core::{CharacterId, CharacterState, ChainId, GameSnapshot, PowerId, PowerState};
use tracing::{debug, info, trace};

use crate::error::{ClientError, Result, narrow_u64};
use crate::traits::ContractReader;
use crate::types::{ReadCall, ReaderOptions};

/// Reads a consistent [`GameSnapshot`] through a [`ContractReader`].
#[derive(Clone, Debug)]
pub struct StateReader<R> {
    reader: R,
    options: ReaderOptions,
}

/// Per-chain counters before they are keyed into the snapshot maps.
struct ChainReading {
    chain: ChainId,
    characters: Vec<(CharacterId, u64)>,
    powers: Vec<(PowerId, u64)>,
    chemical_x: u64,
    life: u64,
}

impl<R: ContractReader> StateReader<R> {
    pub fn new(reader: R, options: ReaderOptions) -> Self {
        Self { reader, options }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    pub fn contract(&self) -> &R {
        &self.reader
    }

    /// Read the game state for `chains`.
    ///
    /// # Errors
    ///
    /// - `Configuration` if `chains` is empty or holds duplicates / the zero slug
    /// - `Connectivity` if the endpoint is unreachable or the read exceeds
    ///   [`ReaderOptions::timeout`]
    /// - `Contract` if any call reverts, returns malformed data, or names a chain
    ///   outside [`ReaderOptions::known_chains`]
    /// - `Range` if a counter does not fit in `u64`
    pub async fn read(&self, chains: &[ChainId]) -> Result<GameSnapshot> {
        validate_chains(chains)?;

        let started = Instant::now();
        let timeout = self.options.timeout;
        let reading = tokio::time::timeout(timeout, self.read_all(chains))
            .await
            .map_err(|_| {
                ClientError::connectivity(format!(
                    "snapshot read did not complete within {timeout:?}"
                ))
            })??;

        let snapshot = assemble(reading, &self.options.known_chains)?;
        info!(
            chains = chains.len(),
            started = snapshot.game_started,
            ended = snapshot.game_ended,
            turn = ?snapshot.current_turn,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Game snapshot read"
        );
        Ok(snapshot)
    }

    async fn read_all(&self, chains: &[ChainId]) -> Result<(Globals, Vec<ChainReading>)> {
        let globals = async {
            let (game_started, game_ended, winner, current_turn) = tokio::try_join!(
                traced(ReadCall::GameStarted, self.reader.game_started()),
                traced(ReadCall::GameEnded, self.reader.game_ended()),
                traced(ReadCall::Winner, self.reader.winner()),
                traced(ReadCall::CurrentTurn, self.reader.current_turn_chain_slug()),
            )?;
            Ok::<_, ClientError>(Globals {
                game_started,
                game_ended,
                winner,
                current_turn,
            })
        };
        let per_chain = try_join_all(chains.iter().map(|&chain| self.read_chain(chain)));

        tokio::try_join!(globals, per_chain)
    }

    async fn read_chain(&self, chain: ChainId) -> Result<ChainReading> {
        let characters = try_join_all(CharacterId::all().map(|character| async move {
            let call = ReadCall::CharacterTurnsLeft(chain, character);
            let raw = traced(call, self.reader.player_character_turns_left(chain, character)).await?;
            Ok::<_, ClientError>((character, narrow_u64(call, raw)?))
        }));

        let powers = try_join_all(PowerId::all().map(|power| async move {
            let call = ReadCall::PowersLeft(chain, power);
            let raw = traced(call, self.reader.player_powers_left(chain, power)).await?;
            Ok::<_, ClientError>((power, narrow_u64(call, raw)?))
        }));

        let chemical_x = async {
            let call = ReadCall::ChemicalX(chain);
            narrow_u64(call, traced(call, self.reader.chemical_x_amount(chain)).await?)
        };

        let life = async {
            let call = ReadCall::Life(chain);
            narrow_u64(call, traced(call, self.reader.life_mapping(chain)).await?)
        };

        let (characters, powers, chemical_x, life) =
            tokio::try_join!(characters, powers, chemical_x, life)?;

        Ok(ChainReading {
            chain,
            characters,
            powers,
            chemical_x,
            life,
        })
    }
}

struct Globals {
    game_started: bool,
    game_ended: bool,
    winner: u32,
    current_turn: u32,
}

async fn traced<T, F>(call: ReadCall, fut: F) -> Result<T>
where
    T: fmt::Debug,
    F: Future<Output = Result<T>>,
{
    let result = fut.await;
    match &result {
        Ok(value) => trace!(%call, ?value, "contract read"),
        Err(err) => debug!(%call, %err, "contract read failed"),
    }
    result
}

fn validate_chains(chains: &[ChainId]) -> Result<()> {
    if chains.is_empty() {
        return Err(ClientError::configuration("no chains requested"));
    }
    let mut seen = HashSet::with_capacity(chains.len());
    for chain in chains {
        if chain.get() == ChainId::UNSET {
            return Err(ClientError::configuration("chain id 0 cannot be read"));
        }
        if !seen.insert(*chain) {
            return Err(ClientError::configuration(format!(
                "chain {chain} requested more than once"
            )));
        }
    }
    Ok(())
}

/// Map a raw slug to a chain, treating `0` as unset.
///
/// The slug may name a chain outside the requested subset; it only has to be
/// one of `known` (any chain when `known` is empty).
fn resolve_chain(call: ReadCall, slug: u32, known: &[ChainId]) -> Result<Option<ChainId>> {
    match ChainId::from_raw(slug) {
        None => Ok(None),
        Some(chain) if known.is_empty() || known.contains(&chain) => Ok(Some(chain)),
        Some(chain) => Err(ClientError::contract(
            call.to_string(),
            format!("reported chain {chain}, which is not a known chain"),
        )),
    }
}

fn assemble((globals, readings): (Globals, Vec<ChainReading>), known: &[ChainId]) -> Result<GameSnapshot> {
    let current_turn = resolve_chain(ReadCall::CurrentTurn, globals.current_turn, known)?;

    let winner = if globals.game_ended {
        resolve_chain(ReadCall::Winner, globals.winner, known)?
    } else {
        if globals.winner != ChainId::UNSET {
            debug!(winner = globals.winner, "Ignoring winner of a game that has not ended");
        }
        None
    };

    let mut snapshot = GameSnapshot {
        game_started: globals.game_started,
        game_ended: globals.game_ended,
        winner,
        current_turn,
        chemical_x: BTreeMap::new(),
        life: BTreeMap::new(),
        characters: BTreeMap::new(),
        powers: BTreeMap::new(),
    };

    for reading in readings {
        snapshot.chemical_x.insert(reading.chain, reading.chemical_x);
        snapshot.life.insert(reading.chain, reading.life);
        snapshot.characters.insert(
            reading.chain,
            reading
                .characters
                .into_iter()
                .map(|(id, turns_left)| (id, CharacterState::new(id, turns_left)))
                .collect(),
        );
        snapshot.powers.insert(
            reading.chain,
            reading
                .powers
                .into_iter()
                .map(|(id, power_left)| (id, PowerState::new(id, power_left)))
                .collect(),
        );
    }

    Ok(snapshot)
}
