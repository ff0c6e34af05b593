use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer, SignerError},
    transaction::{Transaction, VersionedTransaction},
};
use thiserror::Error;

use crate::{
    rpc::{RpcConnection, RpcError},
    transaction::partial_sign_versioned,
};

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Signing failed: {0}")]
    Signer(#[from] SignerError),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}

/// A wallet able to sign and submit transactions for its public key.
#[async_trait]
pub trait WalletSigner: Send + Sync + Debug {
    fn pubkey(&self) -> Pubkey;

    /// Adds the wallet signature, keeping signatures already present.
    async fn sign_transaction(&self, transaction: &mut Transaction) -> Result<(), WalletError>;

    async fn sign_versioned_transaction(
        &self,
        transaction: &mut VersionedTransaction,
    ) -> Result<(), WalletError>;

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        rpc: &dyn RpcConnection,
    ) -> Result<Signature, WalletError> {
        Ok(rpc.send_transaction(transaction).await?)
    }
}

/// A wallet is either able to sign or only knows (at most) its address.
#[derive(Debug, Clone)]
pub enum WalletHandle {
    Connected(Arc<dyn WalletSigner>),
    ReadOnly(Option<Pubkey>),
}

impl WalletHandle {
    pub fn connected(signer: impl WalletSigner + 'static) -> Self {
        WalletHandle::Connected(Arc::new(signer))
    }

    /// Returns the signer, or [`WalletError::NotConnected`] for read-only
    /// handles.
    pub fn signer(&self) -> Result<&dyn WalletSigner, WalletError> {
        match self {
            WalletHandle::Connected(signer) => Ok(signer.as_ref()),
            WalletHandle::ReadOnly(_) => Err(WalletError::NotConnected),
        }
    }

    pub fn pubkey(&self) -> Option<Pubkey> {
        match self {
            WalletHandle::Connected(signer) => Some(signer.pubkey()),
            WalletHandle::ReadOnly(pubkey) => *pubkey,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, WalletHandle::Connected(_))
    }
}

/// Wallet backed by a local keypair file.
#[derive(Debug)]
pub struct KeypairWallet {
    keypair: Keypair,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait]
impl WalletSigner for KeypairWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_transaction(&self, transaction: &mut Transaction) -> Result<(), WalletError> {
        let blockhash = transaction.message.recent_blockhash;
        transaction.try_partial_sign(&[&self.keypair], blockhash)?;
        Ok(())
    }

    async fn sign_versioned_transaction(
        &self,
        transaction: &mut VersionedTransaction,
    ) -> Result<(), WalletError> {
        partial_sign_versioned(transaction, &[&self.keypair])?;
        Ok(())
    }
}
