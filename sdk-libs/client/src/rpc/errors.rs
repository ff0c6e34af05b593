use std::time::Duration;

use solana_client::client_error::ClientError;
use solana_sdk::{signature::Signature, transaction::TransactionError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("ClientError: {0}")]
    ClientError(#[from] Box<ClientError>),

    #[error("TransactionError: {0}")]
    TransactionError(#[from] Box<TransactionError>),

    /// The cluster moved past the last valid block height of the blockhash
    /// the transaction was signed against.
    #[error("Signature {signature} has expired: block height exceeded")]
    BlockhashExpired { signature: Signature },

    #[error("Transaction {signature} was not confirmed in {timeout:?}")]
    ConfirmationTimeout {
        signature: Signature,
        timeout: Duration,
    },

    #[error("Failed to decode account {address}: {error}")]
    AccountDecode { address: String, error: String },
}

impl From<ClientError> for RpcError {
    fn from(err: ClientError) -> Self {
        RpcError::ClientError(Box::new(err))
    }
}

impl From<TransactionError> for RpcError {
    fn from(err: TransactionError) -> Self {
        RpcError::TransactionError(Box::new(err))
    }
}
