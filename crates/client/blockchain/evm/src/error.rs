//! Mapping of alloy failures onto [`ClientError`].

use alloy::contract::Error as CallError;
use alloy::providers::PendingTransactionError;
use alloy::transports::{RpcError, TransportError};
use client_blockchain_core::{ClientError, ReadCall};

/// Classify a failed view call.
///
/// Only a transport failure (the request never got an answer) is a
/// connectivity problem. JSON-RPC error responses, reverts, empty return data
/// and undecodable results all mean the contract did not answer as expected.
pub fn read_error(call: ReadCall, err: CallError) -> ClientError {
    match err {
        CallError::TransportError(err) => transport_read_error(call, err),
        other => ClientError::contract(call.to_string(), other),
    }
}

fn transport_read_error(call: ReadCall, err: TransportError) -> ClientError {
    match err {
        RpcError::Transport(kind) => ClientError::connectivity(format!("{call}: {kind}")),
        other => ClientError::contract(call.to_string(), other),
    }
}

/// Classify a failed send. The transaction may or may not have reached the node.
pub fn send_error(action: &'static str, err: CallError) -> ClientError {
    ClientError::transaction(action, err)
}

pub fn receipt_error(action: &'static str, err: PendingTransactionError) -> ClientError {
    ClientError::transaction(action, err)
}
