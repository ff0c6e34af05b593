use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use ingl_client::{
    rpc::{ConfirmationStrategy, RpcConnection, RpcError, TokenAccountSummary},
    wallet::{WalletError, WalletSigner},
};
use solana_sdk::{
    account::Account,
    address_lookup_table::{self, AddressLookupTableAccount},
    clock::Slot,
    commitment_config::CommitmentConfig,
    hash::Hash,
    instruction::CompiledInstruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::{Transaction, TransactionError, VersionedTransaction},
};

/// A decoded instruction of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentInstruction {
    pub program_id: Pubkey,
    pub accounts: Vec<Pubkey>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum SentTransaction {
    Legacy(Transaction),
    Versioned(VersionedTransaction),
}

impl SentTransaction {
    pub fn is_versioned(&self) -> bool {
        matches!(self, SentTransaction::Versioned(_))
    }

    pub fn fee_payer(&self) -> Pubkey {
        match self {
            SentTransaction::Legacy(tx) => tx.message.account_keys[0],
            SentTransaction::Versioned(tx) => tx.message.static_account_keys()[0],
        }
    }

    /// Instructions with account indexes resolved against the static keys.
    /// Indexes into lookup tables resolve to `Pubkey::default()`.
    pub fn instructions(&self) -> Vec<SentInstruction> {
        let (keys, instructions): (&[Pubkey], &[CompiledInstruction]) = match self {
            SentTransaction::Legacy(tx) => (
                tx.message.account_keys.as_slice(),
                tx.message.instructions.as_slice(),
            ),
            SentTransaction::Versioned(tx) => {
                (tx.message.static_account_keys(), tx.message.instructions())
            }
        };
        let key = |index: u8| keys.get(index as usize).copied().unwrap_or_default();
        instructions
            .iter()
            .map(|ix| SentInstruction {
                program_id: key(ix.program_id_index),
                accounts: ix.accounts.iter().map(|index| key(*index)).collect(),
                data: ix.data.clone(),
            })
            .collect()
    }

    pub fn lookup_table_keys(&self) -> Vec<Pubkey> {
        match self {
            SentTransaction::Legacy(_) => vec![],
            SentTransaction::Versioned(tx) => tx
                .message
                .address_table_lookups()
                .map(|lookups| lookups.iter().map(|lookup| lookup.account_key).collect())
                .unwrap_or_default(),
        }
    }

    pub fn verify(&self) -> bool {
        match self {
            SentTransaction::Legacy(tx) => tx.verify().is_ok(),
            SentTransaction::Versioned(tx) => tx.verify_with_results().iter().all(|ok| *ok),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    slot: Slot,
    /// The slot moves forward once every this many `get_slot` polls.
    polls_per_slot: u64,
    slot_polls: u64,
    sent: Vec<SentTransaction>,
    confirmations: Vec<(Signature, ConfirmationStrategy, Option<CommitmentConfig>)>,
    lookup_tables: HashMap<Pubkey, Vec<Pubkey>>,
    deactivated: Vec<Pubkey>,
    accounts: HashMap<Pubkey, Account>,
    token_accounts: Vec<TokenAccountSummary>,
}

/// In-memory cluster. Lookup table program instructions of submitted
/// transactions are applied so later transactions can resolve the tables.
#[derive(Debug)]
pub struct MockRpc {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
    calls: AtomicUsize,
    state: Mutex<MockState>,
}

impl Default for MockRpc {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl MockRpc {
    pub fn new() -> Self {
        Self {
            blockhash: Hash::new_unique(),
            last_valid_block_height: 150,
            calls: AtomicUsize::new(0),
            state: Mutex::new(MockState {
                slot: 1_000,
                polls_per_slot: 1,
                ..Default::default()
            }),
        }
    }

    /// Only every `polls`-th `get_slot` call sees a new slot.
    pub fn with_slot_advancing_every(self, polls: u64) -> Self {
        self.state.lock().unwrap().polls_per_slot = polls;
        self
    }

    pub fn slot_polls(&self) -> u64 {
        self.state.lock().unwrap().slot_polls
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<SentTransaction> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn confirmations(
        &self,
    ) -> Vec<(Signature, ConfirmationStrategy, Option<CommitmentConfig>)> {
        self.state.lock().unwrap().confirmations.clone()
    }

    pub fn lookup_table(&self, address: &Pubkey) -> Option<Vec<Pubkey>> {
        self.state.lock().unwrap().lookup_tables.get(address).cloned()
    }

    pub fn deactivated(&self) -> Vec<Pubkey> {
        self.state.lock().unwrap().deactivated.clone()
    }

    pub fn insert_lookup_table(&self, address: Pubkey, addresses: Vec<Pubkey>) {
        self.state
            .lock()
            .unwrap()
            .lookup_tables
            .insert(address, addresses);
    }

    pub fn insert_account(&self, address: Pubkey, account: Account) {
        self.state.lock().unwrap().accounts.insert(address, account);
    }

    pub fn insert_token_account(&self, account: TokenAccountSummary) {
        self.state.lock().unwrap().token_accounts.push(account);
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn apply_lookup_table_instructions(&self, transaction: &SentTransaction) {
        let mut state = self.state.lock().unwrap();
        for ix in transaction.instructions() {
            if ix.program_id != address_lookup_table::program::id() || ix.data.len() < 4 {
                continue;
            }
            let table = ix.accounts[0];
            match ix.data[0] {
                // CreateLookupTable
                0 => {
                    state.lookup_tables.insert(table, vec![]);
                }
                // ExtendLookupTable: u64 length followed by the addresses
                2 => {
                    let addresses = ix.data[12..]
                        .chunks_exact(32)
                        .map(|bytes| Pubkey::try_from(bytes).unwrap());
                    state
                        .lookup_tables
                        .entry(table)
                        .or_default()
                        .extend(addresses);
                }
                3 => state.deactivated.push(table),
                4 => {
                    state.lookup_tables.remove(&table);
                }
                _ => {}
            }
        }
    }

    /// A create for a table that already exists fails like it does on chain.
    fn creates_existing_table(&self, transaction: &SentTransaction) -> bool {
        let state = self.state.lock().unwrap();
        transaction.instructions().iter().any(|ix| {
            ix.program_id == address_lookup_table::program::id()
                && ix.data.first() == Some(&0)
                && state.lookup_tables.contains_key(&ix.accounts[0])
        })
    }

    fn submit(
        &self,
        transaction: SentTransaction,
        signature: Signature,
    ) -> Result<Signature, RpcError> {
        if self.creates_existing_table(&transaction) {
            return Err(RpcError::from(TransactionError::AccountInUse));
        }
        self.apply_lookup_table_instructions(&transaction);
        self.state.lock().unwrap().sent.push(transaction);
        Ok(signature)
    }
}

#[async_trait]
impl RpcConnection for MockRpc {
    fn get_url(&self) -> String {
        "mock://localhost".to_string()
    }

    fn commitment(&self) -> CommitmentConfig {
        CommitmentConfig::confirmed()
    }

    async fn get_latest_blockhash(&self) -> Result<(Hash, u64), RpcError> {
        self.record_call();
        Ok((self.blockhash, self.last_valid_block_height))
    }

    async fn get_slot(&self) -> Result<Slot, RpcError> {
        self.record_call();
        let mut state = self.state.lock().unwrap();
        state.slot_polls += 1;
        if state.slot_polls % state.polls_per_slot == 0 {
            state.slot += 1;
        }
        Ok(state.slot)
    }

    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        self.record_call();
        Ok(self.state.lock().unwrap().accounts.get(&address).cloned())
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        self.record_call();
        self.submit(
            SentTransaction::Legacy(transaction.clone()),
            transaction.signatures[0],
        )
    }

    async fn send_versioned_transaction(
        &self,
        transaction: &VersionedTransaction,
    ) -> Result<Signature, RpcError> {
        self.record_call();
        self.submit(
            SentTransaction::Versioned(transaction.clone()),
            transaction.signatures[0],
        )
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        strategy: ConfirmationStrategy,
        commitment: Option<CommitmentConfig>,
    ) -> Result<(), RpcError> {
        self.record_call();
        self.state
            .lock()
            .unwrap()
            .confirmations
            .push((*signature, strategy, commitment));
        Ok(())
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        _token_program: &Pubkey,
    ) -> Result<Vec<TokenAccountSummary>, RpcError> {
        self.record_call();
        Ok(self
            .state
            .lock()
            .unwrap()
            .token_accounts
            .iter()
            .filter(|account| account.owner == *owner)
            .cloned()
            .collect())
    }

    async fn get_address_lookup_table(
        &self,
        address: Pubkey,
    ) -> Result<Option<AddressLookupTableAccount>, RpcError> {
        self.record_call();
        Ok(self
            .lookup_table(&address)
            .map(|addresses| AddressLookupTableAccount {
                key: address,
                addresses,
            }))
    }
}

/// Keypair wallet that counts signing requests.
#[derive(Debug)]
pub struct MockWallet {
    pub keypair: Keypair,
    pub sign_requests: AtomicUsize,
}

#[allow(dead_code)]
impl MockWallet {
    pub fn new() -> Self {
        Self {
            keypair: Keypair::new(),
            sign_requests: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl WalletSigner for MockWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_transaction(&self, transaction: &mut Transaction) -> Result<(), WalletError> {
        self.sign_requests.fetch_add(1, Ordering::SeqCst);
        let blockhash = transaction.message.recent_blockhash;
        transaction.try_partial_sign(&[&self.keypair], blockhash)?;
        Ok(())
    }

    async fn sign_versioned_transaction(
        &self,
        transaction: &mut VersionedTransaction,
    ) -> Result<(), WalletError> {
        self.sign_requests.fetch_add(1, Ordering::SeqCst);
        ingl_client::transaction::partial_sign_versioned(transaction, &[&self.keypair])?;
        Ok(())
    }
}
