//! Live contract backend over JSON-RPC.

use alloy::contract::{CallBuilder, CallDecoder};
use alloy::network::ReceiptResponse;
use alloy::primitives::{TxHash, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use client_blockchain_core::{
    BlockchainConfig, ClientError, ContractCall, ContractReader, ContractWriter, FeePolicy,
    GameContract, ReadCall, Result, SubmissionOptions, TxReceipt,
};
use game_core::{ChainId, CharacterId, PowerId};
use tracing::{debug, info};

use crate::config::EvmConfig;
use crate::contract::IPuffPuffPass::{self, IPuffPuffPassInstance};
use crate::error::{read_error, receipt_error, send_error};

/// Game contract reached through an EVM JSON-RPC endpoint.
///
/// Reads go through a plain HTTP provider. Action calls go through a second
/// provider that fills nonce, gas limit and chain id and signs locally; it only
/// exists when the configuration carries a signing key.
pub struct EvmGameClient {
    network: String,
    contract: IPuffPuffPassInstance<DynProvider>,
    signing: Option<IPuffPuffPassInstance<DynProvider>>,
}

impl EvmGameClient {
    /// Build providers for `config`. No request is made until the first call.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the configuration does not validate.
    pub fn connect(config: &EvmConfig) -> Result<Self> {
        config.validate()?;

        let url: Url = config.rpc_url.trim().parse().map_err(|err| {
            ClientError::configuration(format!("EVM_RPC_URL is invalid: {err}"))
        })?;

        let reader = ProviderBuilder::new().connect_http(url.clone()).erased();
        let contract = IPuffPuffPass::new(config.contract_address, reader);

        let signing = config.signer().cloned().map(|signer| {
            let provider = ProviderBuilder::new()
                .wallet(signer)
                .connect_http(url)
                .erased();
            IPuffPuffPass::new(config.contract_address, provider)
        });

        info!(
            network = %config.network_name(),
            contract = %config.contract_address,
            sender = ?config.sender(),
            "Connected to game contract"
        );

        Ok(Self {
            network: config.network.clone(),
            contract,
            signing,
        })
    }

    /// Whether action calls can be signed.
    pub fn can_sign(&self) -> bool {
        self.signing.is_some()
    }

    fn signing_contract(&self) -> Result<&IPuffPuffPassInstance<DynProvider>> {
        self.signing.as_ref().ok_or_else(|| {
            ClientError::configuration("no signing key configured (set EVM_PRIVATE_KEY)")
        })
    }
}

fn character_arg(character: CharacterId) -> U256 {
    U256::from(character.id())
}

fn power_arg(power: PowerId) -> U256 {
    U256::from(power.id())
}

/// Apply the fee policy. An explicit gas price selects the legacy envelope.
fn with_fee<P, D>(builder: CallBuilder<P, D>, fee: FeePolicy) -> CallBuilder<P, D>
where
    P: Provider,
    D: CallDecoder,
{
    match fee {
        FeePolicy::Legacy { gas_price } => builder.gas_price(gas_price),
        FeePolicy::Eip1559 {
            max_fee_per_gas,
            max_priority_fee_per_gas,
        } => builder
            .max_fee_per_gas(max_fee_per_gas)
            .max_priority_fee_per_gas(max_priority_fee_per_gas),
        FeePolicy::Provider => builder,
    }
}

#[async_trait]
impl ContractReader for EvmGameClient {
    async fn game_started(&self) -> Result<bool> {
        self.contract
            .gameStarted()
            .call()
            .await
            .map_err(|err| read_error(ReadCall::GameStarted, err))
    }

    async fn game_ended(&self) -> Result<bool> {
        self.contract
            .gameEnded()
            .call()
            .await
            .map_err(|err| read_error(ReadCall::GameEnded, err))
    }

    async fn winner(&self) -> Result<u32> {
        self.contract
            .winner()
            .call()
            .await
            .map_err(|err| read_error(ReadCall::Winner, err))
    }

    async fn current_turn_chain_slug(&self) -> Result<u32> {
        self.contract
            .currentTurnChainSlug()
            .call()
            .await
            .map_err(|err| read_error(ReadCall::CurrentTurn, err))
    }

    async fn player_character_turns_left(
        &self,
        chain: ChainId,
        character: CharacterId,
    ) -> Result<U256> {
        self.contract
            .playerCharacterTurnsLeft(chain.get(), character_arg(character))
            .call()
            .await
            .map_err(|err| read_error(ReadCall::CharacterTurnsLeft(chain, character), err))
    }

    async fn player_powers_left(&self, chain: ChainId, power: PowerId) -> Result<U256> {
        self.contract
            .playerPowersLeft(chain.get(), power_arg(power))
            .call()
            .await
            .map_err(|err| read_error(ReadCall::PowersLeft(chain, power), err))
    }

    async fn chemical_x_amount(&self, chain: ChainId) -> Result<U256> {
        self.contract
            .chemicalXAmount(chain.get())
            .call()
            .await
            .map_err(|err| read_error(ReadCall::ChemicalX(chain), err))
    }

    async fn life_mapping(&self, chain: ChainId) -> Result<U256> {
        self.contract
            .lifeMapping(chain.get())
            .call()
            .await
            .map_err(|err| read_error(ReadCall::Life(chain), err))
    }
}

#[async_trait]
impl ContractWriter for EvmGameClient {
    async fn send_call(&self, call: &ContractCall, options: &SubmissionOptions) -> Result<TxHash> {
        let contract = self.signing_contract()?;
        let action = call.action();

        let pending = match call {
            ContractCall::Setup {
                chain,
                characters,
                powers,
                opponent,
            } => {
                let builder = contract.setup(
                    chain.get(),
                    (*characters).map(character_arg),
                    (*powers).map(power_arg),
                    *opponent,
                );
                with_fee(builder, options.fee).send().await
            }
            ContractCall::PlayWithCharacter {
                chain,
                is_attack,
                character,
                power,
            } => {
                let builder = contract.playWithCharacter(
                    chain.get(),
                    *is_attack,
                    character_arg(*character),
                    U256::from(*power),
                );
                with_fee(builder, options.fee).send().await
            }
            ContractCall::RefreshLife { chains } => {
                let builder = contract.refreshLife(chains.iter().map(|chain| chain.get()).collect());
                with_fee(builder, options.fee).send().await
            }
        }
        .map_err(|err| send_error(action, err))?;

        let tx_hash = *pending.tx_hash();
        debug!(action, %tx_hash, "Transaction broadcast");
        Ok(tx_hash)
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        options: &SubmissionOptions,
    ) -> Result<TxReceipt> {
        let contract = self.signing_contract()?;
        let root = contract.provider().root().clone();

        let receipt = PendingTransactionBuilder::new(root, tx_hash)
            .with_required_confirmations(options.required_confirmations)
            .with_timeout(Some(options.confirmation_timeout))
            .get_receipt()
            .await
            .map_err(|err| receipt_error("receipt", err))?;

        Ok(TxReceipt {
            tx_hash: ReceiptResponse::transaction_hash(&receipt),
            block_number: ReceiptResponse::block_number(&receipt),
            success: ReceiptResponse::status(&receipt),
        })
    }
}

impl GameContract for EvmGameClient {
    fn name(&self) -> &str {
        "evm"
    }

    fn network(&self) -> &str {
        &self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use client_blockchain_core::ErrorKind;

    fn config(url: &str) -> EvmConfig {
        EvmConfig::new(url, address!("5FbDB2315678afecb367f032d93F642f64180aa3"))
    }

    #[test]
    fn connect_rejects_invalid_endpoint() {
        let err = EvmGameClient::connect(&config("ftp://127.0.0.1")).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn writes_without_a_key_are_configuration_errors() {
        let client = EvmGameClient::connect(&config("http://127.0.0.1:1")).unwrap();
        assert!(!client.can_sign());
        assert_eq!(client.name(), "evm");

        let call = ContractCall::RefreshLife {
            chains: vec![ChainId(421614)],
        };
        let err = client
            .send_call(&call, &SubmissionOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
