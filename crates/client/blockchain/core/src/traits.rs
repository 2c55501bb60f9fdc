//! Contract capability traits.
//!
//! This module defines a layered contract abstraction:
//! - Layer 0: ContractReader / ContractWriter (raw view and action entrypoints)
//! - Layer 1: StateReader, ActionSubmitter (snapshot assembly, confirmation)
//! - Layer 2: GameContract (composite implemented by complete backends)
//!
//! Backends only translate calls; validation, narrowing and timeouts live in
//! Layer 1 so every backend behaves the same.

use std::sync::Arc;

use alloy_primitives::{TxHash, U256};
use async_trait::async_trait;
use game_core::{ChainId, CharacterId, PowerId};

use crate::error::Result;
use crate::types::{ContractCall, SubmissionOptions, TxReceipt};

// ============================================================================
// Layer 0: Contract Entrypoints
// ============================================================================

/// Read-only view functions of the game contract.
///
/// Values are returned as the chain reports them; counters stay `U256`.
#[async_trait]
pub trait ContractReader: Send + Sync {
    async fn game_started(&self) -> Result<bool>;

    async fn game_ended(&self) -> Result<bool>;

    /// Raw winner slug (`0` when none).
    async fn winner(&self) -> Result<u32>;

    /// Raw slug of the chain whose turn it is (`0` when none).
    async fn current_turn_chain_slug(&self) -> Result<u32>;

    async fn player_character_turns_left(
        &self,
        chain: ChainId,
        character: CharacterId,
    ) -> Result<U256>;

    async fn player_powers_left(&self, chain: ChainId, power: PowerId) -> Result<U256>;

    async fn chemical_x_amount(&self, chain: ChainId) -> Result<U256>;

    async fn life_mapping(&self, chain: ChainId) -> Result<U256>;
}

/// Signing access to the contract's action entrypoints.
#[async_trait]
pub trait ContractWriter: Send + Sync {
    /// Sign and broadcast `call`, returning once the network accepted it.
    async fn send_call(&self, call: &ContractCall, options: &SubmissionOptions) -> Result<TxHash>;

    /// Wait until `tx_hash` is mined with the required confirmations.
    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        options: &SubmissionOptions,
    ) -> Result<TxReceipt>;
}

// ============================================================================
// Layer 2: Composite Trait
// ============================================================================

/// Complete contract backend.
pub trait GameContract: ContractReader + ContractWriter {
    /// Backend name (e.g., "evm", "fixture").
    fn name(&self) -> &str;

    /// Endpoint or network label used in logs.
    fn network(&self) -> &str;
}

/// Backend-specific connection configuration.
pub trait BlockchainConfig: Send + Sync {
    /// Human-readable network name.
    fn network_name(&self) -> &str;

    /// RPC endpoint URL.
    fn rpc_url(&self) -> &str;

    /// Validate configuration before any network call is attempted.
    fn validate(&self) -> Result<()>;
}

// ============================================================================
// Shared handles
// ============================================================================

#[async_trait]
impl<T: ContractReader + ?Sized> ContractReader for Arc<T> {
    async fn game_started(&self) -> Result<bool> {
        (**self).game_started().await
    }

    async fn game_ended(&self) -> Result<bool> {
        (**self).game_ended().await
    }

    async fn winner(&self) -> Result<u32> {
        (**self).winner().await
    }

    async fn current_turn_chain_slug(&self) -> Result<u32> {
        (**self).current_turn_chain_slug().await
    }

    async fn player_character_turns_left(
        &self,
        chain: ChainId,
        character: CharacterId,
    ) -> Result<U256> {
        (**self).player_character_turns_left(chain, character).await
    }

    async fn player_powers_left(&self, chain: ChainId, power: PowerId) -> Result<U256> {
        (**self).player_powers_left(chain, power).await
    }

    async fn chemical_x_amount(&self, chain: ChainId) -> Result<U256> {
        (**self).chemical_x_amount(chain).await
    }

    async fn life_mapping(&self, chain: ChainId) -> Result<U256> {
        (**self).life_mapping(chain).await
    }
}

#[async_trait]
impl<T: ContractWriter + ?Sized> ContractWriter for Arc<T> {
    async fn send_call(&self, call: &ContractCall, options: &SubmissionOptions) -> Result<TxHash> {
        (**self).send_call(call, options).await
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        options: &SubmissionOptions,
    ) -> Result<TxReceipt> {
        (**self).wait_for_receipt(tx_hash, options).await
    }
}
