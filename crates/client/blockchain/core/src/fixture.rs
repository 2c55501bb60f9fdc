//! In-memory contract backend.
//!
//! [`FixtureContract`] answers every view call from a table of values and
//! records every submitted call. Failures (reverts, unreachable endpoint,
//! stalls, rejected or withheld transactions) can be injected per call so the
//! error paths of [`StateReader`](crate::StateReader) and
//! [`ActionSubmitter`](crate::ActionSubmitter) can be exercised without a node.
//!
//! Submitted calls are mined immediately and apply a small, deterministic
//! effect to the table. The effects are stand-ins, not the contract's rules.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::{TxHash, U256};
use async_trait::async_trait;
use game_core::{ChainId, CharacterId, GameConfig, PowerId};

use crate::error::{ClientError, Result};
use crate::traits::{ContractReader, ContractWriter, GameContract};
use crate::types::{ContractCall, ReadCall, SubmissionOptions, TxReceipt};

/// Turns granted to each selected character by a setup call.
pub const SETUP_TURNS: u64 = 3;
/// Uses granted to each selected power by a setup call.
pub const SETUP_POWER_USES: u64 = 2;
pub const SETUP_CHEMICAL_X: u64 = 100;
/// Life after setup or refresh.
pub const FULL_LIFE: u64 = 100;

#[derive(Debug, Default)]
struct FixtureState {
    game_started: bool,
    game_ended: bool,
    winner: u32,
    current_turn: u32,
    turns_left: HashMap<(ChainId, CharacterId), U256>,
    powers_left: HashMap<(ChainId, PowerId), U256>,
    chemical_x: HashMap<ChainId, U256>,
    life: HashMap<ChainId, U256>,

    // Failure injection
    unreachable: bool,
    stalled: bool,
    sends_stalled: bool,
    failing_reads: HashSet<ReadCall>,
    rejected_chains: HashSet<ChainId>,
    reverted_actions: HashSet<&'static str>,
    withhold_receipts: bool,

    // Bookkeeping
    reads: u64,
    sent: Vec<ContractCall>,
    receipts: HashMap<TxHash, TxReceipt>,
    block: u64,
}

impl FixtureState {
    fn apply(&mut self, call: &ContractCall) {
        match call {
            ContractCall::Setup {
                chain,
                characters,
                powers,
                ..
            } => {
                self.game_started = true;
                self.game_ended = false;
                self.winner = ChainId::UNSET;
                for &character in characters {
                    self.turns_left
                        .insert((*chain, character), U256::from(SETUP_TURNS));
                }
                for &power in powers {
                    self.powers_left
                        .insert((*chain, power), U256::from(SETUP_POWER_USES));
                }
                self.chemical_x.insert(*chain, U256::from(SETUP_CHEMICAL_X));
                self.life.insert(*chain, U256::from(FULL_LIFE));
                if self.current_turn == ChainId::UNSET {
                    self.current_turn = chain.get();
                }
            }
            ContractCall::PlayWithCharacter {
                chain,
                character,
                power,
                ..
            } => {
                let turns = self.turns_left.entry((*chain, *character)).or_default();
                *turns = turns.saturating_sub(U256::from(1u64));
                if let Ok(power) = PowerId::try_from(*power) {
                    let uses = self.powers_left.entry((*chain, power)).or_default();
                    *uses = uses.saturating_sub(U256::from(1u64));
                }
            }
            ContractCall::RefreshLife { chains } => {
                for chain in chains {
                    self.life.insert(*chain, U256::from(FULL_LIFE));
                }
            }
        }
    }

    fn rejects(&self, call: &ContractCall) -> bool {
        match call {
            ContractCall::Setup { chain, .. } | ContractCall::PlayWithCharacter { chain, .. } => {
                self.rejected_chains.contains(chain)
            }
            ContractCall::RefreshLife { chains } => {
                chains.iter().any(|chain| self.rejected_chains.contains(chain))
            }
        }
    }
}

/// Scriptable in-memory [`GameContract`].
///
/// Clones share the same table, so a test can keep one handle for scripting
/// while another is owned by a reader or submitter.
#[derive(Clone, Debug, Default)]
pub struct FixtureContract {
    state: Arc<Mutex<FixtureState>>,
}

impl FixtureContract {
    /// Empty contract: game not started, every mapping reads zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A game in progress on `chains`, as left by one setup per chain using
    /// the default rosters.
    pub fn in_progress(chains: &[ChainId]) -> Self {
        let fixture = Self::new();
        {
            let mut state = fixture.lock();
            for (index, chain) in chains.iter().enumerate() {
                let roster = GameConfig::DEFAULT_ROSTERS
                    [index % GameConfig::DEFAULT_ROSTERS.len()];
                state.apply(&ContractCall::Setup {
                    chain: *chain,
                    characters: roster,
                    powers: GameConfig::DEFAULT_POWERS,
                    opponent: GameConfig::DEFAULT_OPPONENT,
                });
            }
        }
        fixture
    }

    fn lock(&self) -> MutexGuard<'_, FixtureState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ========================================================================
    // Contract values
    // ========================================================================

    pub fn set_game_flags(&self, started: bool, ended: bool) -> &Self {
        let mut state = self.lock();
        state.game_started = started;
        state.game_ended = ended;
        self
    }

    /// Raw winner slug; `0` clears it.
    pub fn set_winner(&self, slug: u32) -> &Self {
        self.lock().winner = slug;
        self
    }

    /// Raw current-turn slug; `0` clears it.
    pub fn set_current_turn(&self, slug: u32) -> &Self {
        self.lock().current_turn = slug;
        self
    }

    pub fn set_turns_left(&self, chain: ChainId, character: CharacterId, value: u64) -> &Self {
        self.lock()
            .turns_left
            .insert((chain, character), U256::from(value));
        self
    }

    pub fn set_powers_left(&self, chain: ChainId, power: PowerId, value: u64) -> &Self {
        self.lock().powers_left.insert((chain, power), U256::from(value));
        self
    }

    pub fn set_chemical_x(&self, chain: ChainId, value: u64) -> &Self {
        self.set_chemical_x_raw(chain, U256::from(value))
    }

    /// Store a chemical-X value as-is, including values beyond `u64`.
    pub fn set_chemical_x_raw(&self, chain: ChainId, value: U256) -> &Self {
        self.lock().chemical_x.insert(chain, value);
        self
    }

    pub fn set_life(&self, chain: ChainId, value: u64) -> &Self {
        self.lock().life.insert(chain, U256::from(value));
        self
    }

    // ========================================================================
    // Failure injection
    // ========================================================================

    /// Make `call` revert on every read.
    pub fn fail_read(&self, call: ReadCall) -> &Self {
        self.lock().failing_reads.insert(call);
        self
    }

    pub fn clear_read_failures(&self) -> &Self {
        self.lock().failing_reads.clear();
        self
    }

    /// Fail every call with a connectivity error.
    pub fn set_unreachable(&self, unreachable: bool) -> &Self {
        self.lock().unreachable = unreachable;
        self
    }

    /// Let reads hang forever instead of answering.
    pub fn stall_reads(&self, stalled: bool) -> &Self {
        self.lock().stalled = stalled;
        self
    }

    /// Let sends hang forever, as an endpoint that never answers would.
    pub fn stall_sends(&self, stalled: bool) -> &Self {
        self.lock().sends_stalled = stalled;
        self
    }

    /// Refuse to accept any call targeting `chain`.
    pub fn reject_chain(&self, chain: ChainId) -> &Self {
        self.lock().rejected_chains.insert(chain);
        self
    }

    /// Mine calls of `action` (see [`ContractCall::action`]) as reverted.
    pub fn revert_action(&self, action: &'static str) -> &Self {
        self.lock().reverted_actions.insert(action);
        self
    }

    /// Accept calls but never produce their receipts.
    pub fn withhold_receipts(&self, withhold: bool) -> &Self {
        self.lock().withhold_receipts = withhold;
        self
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Calls accepted so far, in submission order.
    pub fn sent_calls(&self) -> Vec<ContractCall> {
        self.lock().sent.clone()
    }

    /// View calls attempted so far, including failed ones.
    pub fn read_count(&self) -> u64 {
        self.lock().reads
    }

    async fn view<T, F>(&self, call: ReadCall, read: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&FixtureState) -> T + Send,
    {
        let answer = {
            let mut state = self.lock();
            state.reads += 1;
            if state.unreachable {
                Some(Err(ClientError::connectivity("fixture endpoint unreachable")))
            } else if state.failing_reads.contains(&call) {
                Some(Err(ClientError::contract(call.to_string(), "execution reverted")))
            } else if state.stalled {
                None
            } else {
                Some(Ok(read(&*state)))
            }
        };

        match answer {
            Some(result) => result,
            None => std::future::pending().await,
        }
    }
}

#[async_trait]
impl ContractReader for FixtureContract {
    async fn game_started(&self) -> Result<bool> {
        self.view(ReadCall::GameStarted, |s| s.game_started).await
    }

    async fn game_ended(&self) -> Result<bool> {
        self.view(ReadCall::GameEnded, |s| s.game_ended).await
    }

    async fn winner(&self) -> Result<u32> {
        self.view(ReadCall::Winner, |s| s.winner).await
    }

    async fn current_turn_chain_slug(&self) -> Result<u32> {
        self.view(ReadCall::CurrentTurn, |s| s.current_turn).await
    }

    async fn player_character_turns_left(
        &self,
        chain: ChainId,
        character: CharacterId,
    ) -> Result<U256> {
        self.view(ReadCall::CharacterTurnsLeft(chain, character), |s| {
            s.turns_left
                .get(&(chain, character))
                .copied()
                .unwrap_or_default()
        })
        .await
    }

    async fn player_powers_left(&self, chain: ChainId, power: PowerId) -> Result<U256> {
        self.view(ReadCall::PowersLeft(chain, power), |s| {
            s.powers_left.get(&(chain, power)).copied().unwrap_or_default()
        })
        .await
    }

    async fn chemical_x_amount(&self, chain: ChainId) -> Result<U256> {
        self.view(ReadCall::ChemicalX(chain), |s| {
            s.chemical_x.get(&chain).copied().unwrap_or_default()
        })
        .await
    }

    async fn life_mapping(&self, chain: ChainId) -> Result<U256> {
        self.view(ReadCall::Life(chain), |s| {
            s.life.get(&chain).copied().unwrap_or_default()
        })
        .await
    }
}

#[async_trait]
impl ContractWriter for FixtureContract {
    async fn send_call(&self, call: &ContractCall, _options: &SubmissionOptions) -> Result<TxHash> {
        let stalled = self.lock().sends_stalled;
        if stalled {
            std::future::pending::<()>().await;
        }

        let mut state = self.lock();
        if state.unreachable {
            return Err(ClientError::connectivity("fixture endpoint unreachable"));
        }
        if state.rejects(call) {
            return Err(ClientError::transaction(
                call.action(),
                "rejected by fixture",
            ));
        }

        state.block += 1;
        let block = state.block;
        let tx_hash = TxHash::left_padding_from(&block.to_be_bytes());
        let success = !state.reverted_actions.contains(call.action());
        if success {
            state.apply(call);
        }

        state.sent.push(call.clone());
        state.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                block_number: Some(block),
                success,
            },
        );
        Ok(tx_hash)
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        _options: &SubmissionOptions,
    ) -> Result<TxReceipt> {
        let receipt = {
            let state = self.lock();
            if state.withhold_receipts {
                None
            } else {
                Some(state.receipts.get(&tx_hash).cloned().ok_or_else(|| {
                    ClientError::transaction("receipt", format!("unknown transaction {tx_hash}"))
                }))
            }
        };

        match receipt {
            Some(result) => result,
            None => std::future::pending().await,
        }
    }
}

impl GameContract for FixtureContract {
    fn name(&self) -> &str {
        "fixture"
    }

    fn network(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARB: ChainId = ChainId(421614);

    #[tokio::test]
    async fn unset_mappings_read_zero() {
        let fixture = FixtureContract::new();
        let life = fixture.life_mapping(ARB).await.unwrap();
        assert_eq!(life, U256::ZERO);
        assert_eq!(fixture.read_count(), 1);
    }

    #[tokio::test]
    async fn setup_seeds_the_selected_roster() {
        let fixture = FixtureContract::new();
        let call = ContractCall::Setup {
            chain: ARB,
            characters: GameConfig::DEFAULT_ROSTERS[0],
            powers: GameConfig::DEFAULT_POWERS,
            opponent: GameConfig::DEFAULT_OPPONENT,
        };
        let options = SubmissionOptions::default();
        let tx_hash = fixture.send_call(&call, &options).await.unwrap();
        let receipt = fixture.wait_for_receipt(tx_hash, &options).await.unwrap();

        assert!(receipt.success);
        assert!(fixture.game_started().await.unwrap());
        assert_eq!(fixture.current_turn_chain_slug().await.unwrap(), ARB.get());
        let selected = GameConfig::DEFAULT_ROSTERS[0][0];
        assert_eq!(
            fixture.player_character_turns_left(ARB, selected).await.unwrap(),
            U256::from(SETUP_TURNS)
        );
        assert_eq!(fixture.sent_calls(), vec![call]);
    }

    #[tokio::test]
    async fn reverted_calls_leave_state_untouched() {
        let fixture = FixtureContract::new();
        fixture.revert_action("refreshLife");
        let options = SubmissionOptions::default();
        let tx_hash = fixture
            .send_call(&ContractCall::RefreshLife { chains: vec![ARB] }, &options)
            .await
            .unwrap();
        let receipt = fixture.wait_for_receipt(tx_hash, &options).await.unwrap();

        assert!(!receipt.success);
        assert_eq!(fixture.life_mapping(ARB).await.unwrap(), U256::ZERO);
    }
}
