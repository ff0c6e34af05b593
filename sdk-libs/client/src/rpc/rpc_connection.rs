use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use solana_sdk::{
    account::Account,
    address_lookup_table::{state::AddressLookupTable, AddressLookupTableAccount},
    clock::Slot,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, VersionedTransaction},
};

use crate::rpc::{errors::RpcError, TokenAccountSummary};

/// How long a confirmation is awaited before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationStrategy {
    /// Wait until the signature lands or the cluster passes the last valid
    /// block height of `blockhash`.
    BlockHeight {
        blockhash: Hash,
        last_valid_block_height: u64,
    },
    /// Wait until the signature lands or `Duration` elapses.
    Timeout(Duration),
}

impl ConfirmationStrategy {
    pub fn from_blockhash((blockhash, last_valid_block_height): (Hash, u64)) -> Self {
        Self::BlockHeight {
            blockhash,
            last_valid_block_height,
        }
    }
}

#[async_trait]
pub trait RpcConnection: Send + Sync + Debug + 'static {
    fn get_url(&self) -> String;

    /// Commitment used when a caller does not pass one.
    fn commitment(&self) -> CommitmentConfig;

    /// Returns the blockhash and the last block height it stays valid for.
    async fn get_latest_blockhash(&self) -> Result<(Hash, u64), RpcError>;
    async fn get_slot(&self) -> Result<Slot, RpcError>;
    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError>;

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError>;
    async fn send_versioned_transaction(
        &self,
        transaction: &VersionedTransaction,
    ) -> Result<Signature, RpcError>;

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        strategy: ConfirmationStrategy,
        commitment: Option<CommitmentConfig>,
    ) -> Result<(), RpcError>;

    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<Vec<TokenAccountSummary>, RpcError>;

    async fn get_address_lookup_table(
        &self,
        address: Pubkey,
    ) -> Result<Option<AddressLookupTableAccount>, RpcError> {
        match self.get_account(address).await? {
            Some(account) => {
                let table = AddressLookupTable::deserialize(&account.data).map_err(|e| {
                    RpcError::AccountDecode {
                        address: address.to_string(),
                        error: e.to_string(),
                    }
                })?;
                Ok(Some(AddressLookupTableAccount {
                    key: address,
                    addresses: table.addresses.to_vec(),
                }))
            }
            None => Ok(None),
        }
    }
}
