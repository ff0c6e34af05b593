use std::fmt::{Display, Formatter};

use solana_sdk::{
    instruction::AccountMeta,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    config::ProgramConfig,
    constants::{INIT_PROGRAM_COMPUTE_UNITS, MINT_NFT_COMPUTE_UNITS},
    instruction::{
        build_instruction, encode, InitPayload, InstructionKind, MintNftPayload, PayloadError,
    },
    lookup_table::{create_lookup_tables, deactivate_lookup_tables},
    pda::{AccountResolver, PdaError},
    price_feed::{fetch_history_buffers, PriceFeedError},
    rpc::{RpcConnection, RpcError, TokenAccountSummary},
    transaction::{
        forward_legacy_transaction, forward_versioned_transaction, ForwardError, ForwardOptions,
    },
    wallet::{WalletError, WalletHandle},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    MintNft,
    InitProgram,
    InitRarityImprint,
    ImprintRarity,
    RedeemNft,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::MintNft => "NFT Minting",
            Operation::InitProgram => "Program Init",
            Operation::InitRarityImprint => "Rarity Imprint Init",
            Operation::ImprintRarity => "Rarity Imprint",
            Operation::RedeemNft => "NFT Redemption",
        };
        write!(f, "{}", name)
    }
}

#[derive(Error, Debug)]
pub enum OperationError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Pda(#[from] PdaError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Forward(#[from] ForwardError),
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{operation} transaction failed with error {source}")]
    TransactionFailed {
        operation: Operation,
        source: OperationError,
    },

    #[error("Failed to read price feeds: {0}")]
    PriceFeed(#[from] PriceFeedError),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}

impl ServiceError {
    fn failed(operation: Operation) -> impl FnOnce(OperationError) -> Self {
        move |source| ServiceError::TransactionFailed { operation, source }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedNft {
    pub signature: Signature,
    pub mint: Pubkey,
    /// Tables used by the mint transaction. They are deactivated once the
    /// transaction settles and can be closed after the cooldown.
    pub lookup_tables: Vec<Pubkey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializedProgram {
    pub signature: Signature,
    pub validator: Pubkey,
}

/// Builds the account list of a discriminant-only instruction for
/// (payer, mint).
type AccountListFn = fn(&AccountResolver, &Pubkey, &Pubkey) -> Result<Vec<AccountMeta>, PdaError>;

/// The user facing operations of the Ingl program, one transaction each.
#[derive(Debug)]
pub struct NftService<R: RpcConnection> {
    rpc: R,
    wallet: WalletHandle,
    resolver: AccountResolver,
}

impl<R: RpcConnection> NftService<R> {
    pub fn new(rpc: R, wallet: WalletHandle, config: ProgramConfig) -> Self {
        Self {
            rpc,
            wallet,
            resolver: AccountResolver::new(config),
        }
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    pub fn wallet(&self) -> &WalletHandle {
        &self.wallet
    }

    pub fn resolver(&self) -> &AccountResolver {
        &self.resolver
    }

    /// Mints an NFT to a freshly generated mint. The instruction carries more
    /// accounts than fit a legacy transaction, so they are put into lookup
    /// tables first.
    pub async fn mint_nft(&self, payload: MintNftPayload) -> Result<MintedNft, ServiceError> {
        self.try_mint_nft(payload)
            .await
            .map_err(ServiceError::failed(Operation::MintNft))
    }

    async fn try_mint_nft(&self, payload: MintNftPayload) -> Result<MintedNft, OperationError> {
        let payer = self.wallet.signer()?.pubkey();
        let mint = Keypair::new();
        let accounts = self.resolver.mint_nft_accounts(&payer, &mint.pubkey())?;
        let data = encode(&payload)?;

        let mut addresses: Vec<Pubkey> = Vec::with_capacity(accounts.len());
        for meta in &accounts {
            if !addresses.contains(&meta.pubkey) {
                addresses.push(meta.pubkey);
            }
        }
        let lookup_tables = create_lookup_tables(&self.rpc, &self.wallet, &addresses).await?;

        let instruction = build_instruction(self.resolver.program_id(), accounts, data);
        let options = ForwardOptions::new()
            .with_signer(&mint)
            .with_additional_units(MINT_NFT_COMPUTE_UNITS)
            .with_lookup_tables(lookup_tables.clone());
        let result =
            forward_versioned_transaction(&self.rpc, &self.wallet, &[instruction], &options).await;
        self.release_lookup_tables(&lookup_tables).await;
        let signature = result?;

        info!("Minted NFT {} in {}", mint.pubkey(), signature);
        Ok(MintedNft {
            signature,
            mint: mint.pubkey(),
            lookup_tables,
        })
    }

    async fn release_lookup_tables(&self, lookup_tables: &[Pubkey]) {
        if let Err(error) = deactivate_lookup_tables(&self.rpc, &self.wallet, lookup_tables).await
        {
            warn!(
                "Failed to deactivate lookup tables {:?}: {}",
                lookup_tables, error
            );
        }
    }

    /// Initializes the program config with a freshly generated validator
    /// identity.
    pub async fn init_program(
        &self,
        payload: &InitPayload,
    ) -> Result<InitializedProgram, ServiceError> {
        self.try_init_program(payload)
            .await
            .map_err(ServiceError::failed(Operation::InitProgram))
    }

    async fn try_init_program(
        &self,
        payload: &InitPayload,
    ) -> Result<InitializedProgram, OperationError> {
        let payer = self.wallet.signer()?.pubkey();
        let validator = Keypair::new().pubkey();
        let accounts = self.resolver.init_program_accounts(&payer, &validator)?;
        let instruction =
            build_instruction(self.resolver.program_id(), accounts, encode(payload)?);
        let options = ForwardOptions::new().with_additional_units(INIT_PROGRAM_COMPUTE_UNITS);
        let signature =
            forward_legacy_transaction(&self.rpc, &self.wallet, &[instruction], &options).await?;
        Ok(InitializedProgram {
            signature,
            validator,
        })
    }

    /// Creates the gem account of `mint`. The program dispatches this on the
    /// imprint discriminant, telling the two apart by their accounts.
    pub async fn init_rarity_imprint(&self, mint: Pubkey) -> Result<Signature, ServiceError> {
        self.send_discriminant(
            Operation::InitRarityImprint,
            InstructionKind::ImprintRarity,
            AccountResolver::init_rarity_imprint_accounts,
            mint,
        )
        .await
    }

    pub async fn imprint_rarity(&self, mint: Pubkey) -> Result<Signature, ServiceError> {
        self.send_discriminant(
            Operation::ImprintRarity,
            InstructionKind::ImprintRarity,
            AccountResolver::imprint_rarity_accounts,
            mint,
        )
        .await
    }

    pub async fn redeem_nft(&self, mint: Pubkey) -> Result<Signature, ServiceError> {
        self.send_discriminant(
            Operation::RedeemNft,
            InstructionKind::Redeem,
            AccountResolver::redeem_nft_accounts,
            mint,
        )
        .await
    }

    async fn send_discriminant(
        &self,
        operation: Operation,
        kind: InstructionKind,
        accounts: AccountListFn,
        mint: Pubkey,
    ) -> Result<Signature, ServiceError> {
        let send = async {
            let payer = self.wallet.signer()?.pubkey();
            let accounts = accounts(&self.resolver, &payer, &mint)?;
            let instruction = build_instruction(self.resolver.program_id(), accounts, kind.data());
            let signature = forward_legacy_transaction(
                &self.rpc,
                &self.wallet,
                &[instruction],
                &ForwardOptions::new(),
            )
            .await?;
            Ok::<_, OperationError>(signature)
        };
        send.await.map_err(ServiceError::failed(operation))
    }

    /// Token accounts of the wallet owner. `None` when the wallet has no
    /// address.
    pub async fn get_account_data(
        &self,
    ) -> Result<Option<Vec<TokenAccountSummary>>, ServiceError> {
        let Some(owner) = self.wallet.pubkey() else {
            return Ok(None);
        };
        let accounts = self
            .rpc
            .get_token_accounts_by_owner(&owner, &spl_token::id())
            .await?;
        for account in &accounts {
            info!(
                address = %account.address,
                mint = %account.mint,
                owner = %account.owner,
                decimals = account.decimals,
                amount = account.amount,
                "token account"
            );
        }
        Ok(Some(accounts))
    }

    /// History buffer of every aggregator in `feeds`, in order.
    pub async fn feed_history_buffers(
        &self,
        feeds: &[(&str, Pubkey)],
    ) -> Result<Vec<(String, Option<Pubkey>)>, ServiceError> {
        Ok(fetch_history_buffers(&self.rpc, feeds).await?)
    }
}
