//! Action submission with confirmation.
//!
//! Every operation sends one call per transaction and reports success only once
//! the receipt is in and shows the call succeeded. Both the send and the
//! receipt wait are bounded by [`SubmissionOptions`]. Nothing is retried here; a
//! caller that retries must expect the backend to pick a fresh nonce.

use game_core::{ActionRequest, ChainId, SetupRequest};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::traits::ContractWriter;
use crate::types::{ContractCall, SubmissionOptions, TxReceipt};

/// Submits game actions through a [`ContractWriter`].
#[derive(Clone, Debug)]
pub struct ActionSubmitter<W> {
    writer: W,
    options: SubmissionOptions,
}

impl<W: ContractWriter> ActionSubmitter<W> {
    pub fn new(writer: W, options: SubmissionOptions) -> Self {
        Self { writer, options }
    }

    pub fn options(&self) -> &SubmissionOptions {
        &self.options
    }

    /// Attack or heal with a character. A missing power is sent as `0`.
    pub async fn submit_play(&self, request: &ActionRequest) -> Result<TxReceipt> {
        let call = ContractCall::PlayWithCharacter {
            chain: request.chain,
            is_attack: request.is_attack,
            character: request.character,
            power: request.power_argument(),
        };
        self.submit(&call).await
    }

    /// Submit one setup call per request, in order.
    ///
    /// Each call is confirmed before the next is sent. The first failure stops
    /// the sequence; chains set up before it stay set up.
    pub async fn submit_setup(&self, requests: &[SetupRequest]) -> Result<Vec<TxReceipt>> {
        if requests.is_empty() {
            return Err(ClientError::configuration("setup needs at least one chain"));
        }

        let mut receipts = Vec::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            let call = ContractCall::Setup {
                chain: request.chain,
                characters: request.characters,
                powers: request.powers,
                opponent: request.opponent,
            };
            match self.submit(&call).await {
                Ok(receipt) => {
                    info!(chain = %request.chain, "Chain set up");
                    receipts.push(receipt);
                }
                Err(err) => {
                    if index > 0 {
                        warn!(
                            failed = %request.chain,
                            completed = index,
                            "Setup stopped part-way; earlier chains remain set up"
                        );
                    }
                    return Err(err);
                }
            }
        }
        Ok(receipts)
    }

    /// Refresh life for `chains` in a single call.
    pub async fn submit_life_refresh(&self, chains: &[ChainId]) -> Result<TxReceipt> {
        if chains.is_empty() {
            return Err(ClientError::configuration(
                "life refresh needs at least one chain",
            ));
        }
        let call = ContractCall::RefreshLife {
            chains: chains.to_vec(),
        };
        self.submit(&call).await
    }

    async fn submit(&self, call: &ContractCall) -> Result<TxReceipt> {
        let action = call.action();
        debug!(action, ?call, "Submitting contract call");

        let send_timeout = self.options.send_timeout;
        let tx_hash = tokio::time::timeout(send_timeout, self.writer.send_call(call, &self.options))
            .await
            .map_err(|_| {
                ClientError::transaction(action, format!("not accepted within {send_timeout:?}"))
            })?
            .map_err(|err| into_transaction(action, err))?;
        debug!(action, %tx_hash, "Transaction accepted, waiting for confirmation");

        let timeout = self.options.confirmation_timeout;
        let receipt = tokio::time::timeout(timeout, self.writer.wait_for_receipt(tx_hash, &self.options))
            .await
            .map_err(|_| {
                ClientError::transaction(
                    action,
                    format!("{tx_hash} not confirmed within {timeout:?}"),
                )
            })?
            .map_err(|err| into_transaction(action, err))?;

        if !receipt.success {
            return Err(ClientError::transaction(
                action,
                format!("{tx_hash} reverted"),
            ));
        }

        info!(action, %tx_hash, block = ?receipt.block_number, "Transaction confirmed");
        Ok(receipt)
    }
}

/// Failures after a call has been handed to the writer are transaction failures,
/// except configuration problems which are reported as such.
fn into_transaction(action: &'static str, err: ClientError) -> ClientError {
    match err {
        ClientError::Transaction { .. } | ClientError::Configuration(_) => err,
        other => ClientError::transaction(action, other),
    }
}
