//! Submission of instructions as legacy or v0 transactions.
//!
//! Local signers sign first, the wallet signs last. Nothing is retried; an
//! expired blockhash or a rejected transaction is returned to the caller.

use solana_sdk::{
    address_lookup_table::AddressLookupTableAccount,
    commitment_config::CommitmentConfig,
    compute_budget::ComputeBudgetInstruction,
    instruction::Instruction,
    message::{v0, CompileError, VersionedMessage},
    pubkey::Pubkey,
    signature::{Keypair, Signature, SignerError},
    signers::Signers,
    transaction::{Transaction, VersionedTransaction},
};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    rpc::{ConfirmationStrategy, RpcConnection, RpcError},
    wallet::{WalletError, WalletHandle},
};

#[derive(Error, Debug)]
pub enum ForwardError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("no lookup table found at {0}")]
    LookupTableNotFound(Pubkey),

    #[error("Failed to compile message: {0}")]
    Compile(#[from] CompileError),

    #[error("Signing failed: {0}")]
    Signer(#[from] SignerError),
}

#[derive(Debug, Clone, Default)]
pub struct ForwardOptions<'a> {
    /// Commitment awaited after submission. `None` uses the connection's.
    pub commitment: Option<CommitmentConfig>,
    /// Keypairs signing before the wallet, e.g. a freshly generated mint.
    pub signers: Vec<&'a Keypair>,
    /// Compute unit limit; a leading compute budget instruction is added
    /// when set and non-zero.
    pub additional_units: Option<u32>,
    pub lookup_table_addresses: Vec<Pubkey>,
}

impl<'a> ForwardOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = Some(commitment);
        self
    }

    pub fn with_signer(mut self, signer: &'a Keypair) -> Self {
        self.signers.push(signer);
        self
    }

    pub fn with_additional_units(mut self, units: u32) -> Self {
        self.additional_units = Some(units);
        self
    }

    pub fn with_lookup_tables(mut self, addresses: Vec<Pubkey>) -> Self {
        self.lookup_table_addresses = addresses;
        self
    }

    fn compute_budget_instruction(&self) -> Option<Instruction> {
        self.additional_units
            .filter(|units| *units > 0)
            .map(ComputeBudgetInstruction::set_compute_unit_limit)
    }
}

/// Signs the message of a versioned transaction with every signer, placing
/// each signature at the index of the signer's key. Signatures of other
/// required signers are left as they are.
pub fn partial_sign_versioned<T: Signers + ?Sized>(
    transaction: &mut VersionedTransaction,
    signers: &T,
) -> Result<(), SignerError> {
    let num_required = usize::from(transaction.message.header().num_required_signatures);
    if transaction.signatures.len() < num_required {
        transaction
            .signatures
            .resize(num_required, Signature::default());
    }
    let signer_keys: Vec<Pubkey> = transaction
        .message
        .static_account_keys()
        .iter()
        .take(num_required)
        .copied()
        .collect();

    let message_data = transaction.message.serialize();
    let pubkeys = signers.try_pubkeys()?;
    let signatures = signers.try_sign_message(&message_data)?;
    for (pubkey, signature) in pubkeys.iter().zip(signatures) {
        let index = signer_keys
            .iter()
            .position(|key| key == pubkey)
            .ok_or(SignerError::KeypairPubkeyMismatch)?;
        transaction.signatures[index] = signature;
    }
    Ok(())
}

/// Sends `instructions` as a legacy transaction paid by the wallet and waits
/// until it lands or its blockhash expires.
pub async fn forward_legacy_transaction<R: RpcConnection>(
    rpc: &R,
    wallet: &WalletHandle,
    instructions: &[Instruction],
    options: &ForwardOptions<'_>,
) -> Result<Signature, ForwardError> {
    let signer = wallet.signer()?;
    let payer = signer.pubkey();

    let mut all_instructions = Vec::with_capacity(instructions.len() + 1);
    all_instructions.extend(options.compute_budget_instruction());
    all_instructions.extend_from_slice(instructions);

    let mut transaction = Transaction::new_with_payer(&all_instructions, Some(&payer));
    let latest_blockhash = rpc.get_latest_blockhash().await?;
    transaction.message.recent_blockhash = latest_blockhash.0;

    if !options.signers.is_empty() {
        transaction.try_partial_sign(options.signers.as_slice(), latest_blockhash.0)?;
    }
    signer.sign_transaction(&mut transaction).await?;

    let signature = signer.send_transaction(&transaction, rpc).await?;
    debug!("legacy transaction {} submitted", signature);
    rpc.confirm_transaction(
        &signature,
        ConfirmationStrategy::from_blockhash(latest_blockhash),
        options.commitment,
    )
    .await?;
    info!("Transaction {} confirmed", signature);
    Ok(signature)
}

/// Sends `instructions` as a v0 transaction compiled against the lookup
/// tables in `options`. Every table is fetched before anything else; a
/// missing one aborts without submitting.
pub async fn forward_versioned_transaction<R: RpcConnection>(
    rpc: &R,
    wallet: &WalletHandle,
    instructions: &[Instruction],
    options: &ForwardOptions<'_>,
) -> Result<Signature, ForwardError> {
    let signer = wallet.signer()?;
    let payer = signer.pubkey();

    let lookup_tables = fetch_lookup_tables(rpc, &options.lookup_table_addresses).await?;

    let mut all_instructions = Vec::with_capacity(instructions.len() + 1);
    all_instructions.extend(options.compute_budget_instruction());
    all_instructions.extend_from_slice(instructions);

    let latest_blockhash = rpc.get_latest_blockhash().await?;
    let message = v0::Message::try_compile(
        &payer,
        &all_instructions,
        &lookup_tables,
        latest_blockhash.0,
    )?;
    let num_required = usize::from(message.header.num_required_signatures);
    let mut transaction = VersionedTransaction {
        signatures: vec![Signature::default(); num_required],
        message: VersionedMessage::V0(message),
    };

    if !options.signers.is_empty() {
        partial_sign_versioned(&mut transaction, options.signers.as_slice())?;
    }
    signer.sign_versioned_transaction(&mut transaction).await?;

    let signature = rpc.send_versioned_transaction(&transaction).await?;
    debug!(
        "v0 transaction {} submitted with {} lookup tables",
        signature,
        lookup_tables.len()
    );
    rpc.confirm_transaction(
        &signature,
        ConfirmationStrategy::from_blockhash(latest_blockhash),
        options.commitment,
    )
    .await?;
    info!("Transaction {} confirmed", signature);
    Ok(signature)
}

async fn fetch_lookup_tables<R: RpcConnection>(
    rpc: &R,
    addresses: &[Pubkey],
) -> Result<Vec<AddressLookupTableAccount>, ForwardError> {
    let mut lookup_tables = Vec::with_capacity(addresses.len());
    for address in addresses {
        let table = rpc
            .get_address_lookup_table(*address)
            .await?
            .ok_or(ForwardError::LookupTableNotFound(*address))?;
        lookup_tables.push(table);
    }
    Ok(lookup_tables)
}
