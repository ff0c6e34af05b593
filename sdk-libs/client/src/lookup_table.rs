//! Address lookup tables holding the accounts of instructions too large for
//! a legacy transaction.
//!
//! A table goes through create, extend, use, deactivate and finally close.
//! Closing is only accepted by the runtime once the deactivation cooldown
//! (about 513 slots) has passed, so it is a separate step.

use std::time::Duration;

use solana_sdk::{
    address_lookup_table::instruction::{
        close_lookup_table, create_lookup_table, deactivate_lookup_table, extend_lookup_table,
    },
    clock::Slot,
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::Signature,
};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::{
    constants::MAX_ADDRESSES_PER_EXTEND,
    rpc::{ConfirmationStrategy, RpcConnection},
    transaction::{
        forward_legacy_transaction, forward_versioned_transaction, ForwardError, ForwardOptions,
    },
    wallet::WalletHandle,
};

/// Upper bound on waiting for the last batch to finalize.
pub const FINALIZE_TIMEOUT: Duration = Duration::from_secs(90);

/// Delay between slot polls while waiting for a fresh recent slot.
pub const SLOT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Creates one table per chunk of at most [`MAX_ADDRESSES_PER_EXTEND`]
/// addresses and returns the table addresses in input order.
///
/// Chunks are submitted one after the other at processed commitment; the
/// last one is awaited at finalized commitment before returning. Every
/// batch waits for a slot newer than the previous batch's so no two tables
/// share an address.
pub async fn create_lookup_tables<R: RpcConnection>(
    rpc: &R,
    wallet: &WalletHandle,
    addresses: &[Pubkey],
) -> Result<Vec<Pubkey>, ForwardError> {
    let authority = wallet.signer()?.pubkey();
    let options = ForwardOptions::new().with_commitment(CommitmentConfig::processed());

    let mut table_addresses =
        Vec::with_capacity(addresses.len().div_ceil(MAX_ADDRESSES_PER_EXTEND));
    let mut last_signature: Option<Signature> = None;
    let mut last_slot: Option<Slot> = None;
    for chunk in addresses.chunks(MAX_ADDRESSES_PER_EXTEND) {
        // The table address is derived from (authority, recent_slot).
        let recent_slot = next_recent_slot(rpc, last_slot).await?;
        last_slot = Some(recent_slot);
        let (create_instruction, table_address) =
            create_lookup_table(authority, authority, recent_slot);
        let extend_instruction =
            extend_lookup_table(table_address, authority, Some(authority), chunk.to_vec());

        let signature = forward_versioned_transaction(
            rpc,
            wallet,
            &[create_instruction, extend_instruction],
            &options,
        )
        .await?;
        debug!(
            "lookup table {} created with {} addresses",
            table_address,
            chunk.len()
        );
        table_addresses.push(table_address);
        last_signature = Some(signature);
    }

    if let Some(signature) = last_signature {
        rpc.confirm_transaction(
            &signature,
            ConfirmationStrategy::Timeout(FINALIZE_TIMEOUT),
            Some(CommitmentConfig::finalized()),
        )
        .await?;
    }
    info!("Created {} lookup tables", table_addresses.len());
    Ok(table_addresses)
}

/// Polls the cluster until it reports a slot past `previous`.
async fn next_recent_slot<R: RpcConnection>(
    rpc: &R,
    previous: Option<Slot>,
) -> Result<Slot, ForwardError> {
    loop {
        let slot = rpc.get_slot().await?;
        match previous {
            Some(previous) if slot <= previous => {
                debug!("slot {} has not moved past {}, waiting", slot, previous);
                sleep(SLOT_POLL_INTERVAL).await;
            }
            _ => return Ok(slot),
        }
    }
}

/// Deactivate instructions for every table followed by close instructions
/// for every table, rent going back to `authority`.
pub fn close_lookup_table_instructions(authority: Pubkey, tables: &[Pubkey]) -> Vec<Instruction> {
    let deactivate = tables
        .iter()
        .map(|table| deactivate_lookup_table(*table, authority));
    let close = tables
        .iter()
        .map(|table| close_lookup_table(*table, authority, authority));
    deactivate.chain(close).collect()
}

/// Deactivates `tables`. Returns `None` when there is nothing to do.
pub async fn deactivate_lookup_tables<R: RpcConnection>(
    rpc: &R,
    wallet: &WalletHandle,
    tables: &[Pubkey],
) -> Result<Option<Signature>, ForwardError> {
    if tables.is_empty() {
        return Ok(None);
    }
    let authority = wallet.signer()?.pubkey();
    let instructions: Vec<Instruction> = tables
        .iter()
        .map(|table| deactivate_lookup_table(*table, authority))
        .collect();
    let signature =
        forward_legacy_transaction(rpc, wallet, &instructions, &ForwardOptions::new()).await?;
    info!("Deactivated {} lookup tables", tables.len());
    Ok(Some(signature))
}

/// Closes tables whose deactivation cooldown has passed, returning their
/// rent to the wallet.
pub async fn close_lookup_tables<R: RpcConnection>(
    rpc: &R,
    wallet: &WalletHandle,
    tables: &[Pubkey],
) -> Result<Option<Signature>, ForwardError> {
    if tables.is_empty() {
        return Ok(None);
    }
    let authority = wallet.signer()?.pubkey();
    let instructions: Vec<Instruction> = tables
        .iter()
        .map(|table| close_lookup_table(*table, authority, authority))
        .collect();
    let signature =
        forward_legacy_transaction(rpc, wallet, &instructions, &ForwardOptions::new()).await?;
    info!("Closed {} lookup tables", tables.len());
    Ok(Some(signature))
}
