//! Program derived addresses and the ordered account lists of every Ingl
//! instruction. The order of each list is part of the program interface.

use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey, system_program, sysvar};
use thiserror::Error;

use crate::{
    config::ProgramConfig,
    constants::{
        ASSOCIATED_TOKEN_PROGRAM_ID, COLLECTION_HOLDER_SEED, EDITION_SEED, GEM_ACCOUNT_SEED,
        GENERAL_ACCOUNT_SEED, INGL_CONFIG_SEED, INGL_MINT_AUTHORITY_SEED,
        INGL_NFT_COLLECTION_NEWER_SEED, INGL_NFT_COLLECTION_SEED, INGL_TREASURY_SEED,
        METADATA_SEED, MINTING_POOL_SEED, MINT_AUTHORITY_SEED, NFT_ACCOUNT_SEED,
        PD_POOL_ACCOUNT_SEED, URIS_ACCOUNT_SEED,
    },
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PdaError {
    #[error("No valid bump found for seeds {seeds:?} under program {program_id}")]
    DerivationFailed {
        seeds: Vec<Vec<u8>>,
        program_id: Pubkey,
    },
}

pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), PdaError> {
    Pubkey::try_find_program_address(seeds, program_id).ok_or_else(|| {
        PdaError::DerivationFailed {
            seeds: seeds.iter().map(|seed| seed.to_vec()).collect(),
            program_id: *program_id,
        }
    })
}

/// Associated token account of `owner` for `mint`. `owner` may be off curve.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Result<Pubkey, PdaError> {
    find_program_address(
        &[owner.as_ref(), spl_token::id().as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _)| address)
}

fn writable(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new(pubkey, false)
}

fn readonly(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new_readonly(pubkey, false)
}

/// Resolves every address an instruction needs from a [`ProgramConfig`].
#[derive(Debug, Clone)]
pub struct AccountResolver {
    config: ProgramConfig,
}

impl AccountResolver {
    pub fn new(config: ProgramConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    pub fn program_id(&self) -> Pubkey {
        self.config.program_id
    }

    fn derive(&self, seeds: &[&[u8]]) -> Result<Pubkey, PdaError> {
        find_program_address(seeds, &self.config.program_id).map(|(address, _)| address)
    }

    pub fn ingl_mint_authority(&self) -> Result<Pubkey, PdaError> {
        self.derive(&[INGL_MINT_AUTHORITY_SEED])
    }

    pub fn mint_authority(&self) -> Result<Pubkey, PdaError> {
        self.derive(&[MINT_AUTHORITY_SEED])
    }

    pub fn general_account(&self) -> Result<Pubkey, PdaError> {
        self.derive(&[GENERAL_ACCOUNT_SEED])
    }

    pub fn nft_account(&self, mint: &Pubkey) -> Result<Pubkey, PdaError> {
        self.derive(&[NFT_ACCOUNT_SEED, mint.as_ref()])
    }

    pub fn gem_account(&self, mint: &Pubkey) -> Result<Pubkey, PdaError> {
        self.derive(&[GEM_ACCOUNT_SEED, mint.as_ref()])
    }

    pub fn pd_pool_account(&self) -> Result<Pubkey, PdaError> {
        self.derive(&[PD_POOL_ACCOUNT_SEED])
    }

    pub fn minting_pool(&self) -> Result<Pubkey, PdaError> {
        self.derive(&[MINTING_POOL_SEED])
    }

    pub fn collection_mint(&self) -> Result<Pubkey, PdaError> {
        self.derive(&[INGL_NFT_COLLECTION_SEED])
    }

    /// Collection mint referenced on redemption.
    pub fn newer_collection_mint(&self) -> Result<Pubkey, PdaError> {
        self.derive(&[INGL_NFT_COLLECTION_NEWER_SEED])
    }

    pub fn ingl_config(&self) -> Result<Pubkey, PdaError> {
        self.derive(&[INGL_CONFIG_SEED])
    }

    pub fn uris_account(&self) -> Result<Pubkey, PdaError> {
        self.derive(&[URIS_ACCOUNT_SEED])
    }

    pub fn collection_holder(&self) -> Result<Pubkey, PdaError> {
        self.derive(&[COLLECTION_HOLDER_SEED])
    }

    pub fn treasury(&self) -> Result<Pubkey, PdaError> {
        self.derive(&[INGL_TREASURY_SEED])
    }

    pub fn metadata(&self, mint: &Pubkey) -> Result<Pubkey, PdaError> {
        let metadata_program = self.config.metadata_program_id;
        find_program_address(
            &[METADATA_SEED, metadata_program.as_ref(), mint.as_ref()],
            &metadata_program,
        )
        .map(|(address, _)| address)
    }

    pub fn edition(&self, mint: &Pubkey) -> Result<Pubkey, PdaError> {
        let metadata_program = self.config.metadata_program_id;
        find_program_address(
            &[
                METADATA_SEED,
                metadata_program.as_ref(),
                mint.as_ref(),
                EDITION_SEED,
            ],
            &metadata_program,
        )
        .map(|(address, _)| address)
    }

    pub fn mint_nft_accounts(
        &self,
        payer: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<AccountMeta>, PdaError> {
        let collection_mint = self.collection_mint()?;
        let mut accounts = vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*mint, true),
            writable(self.ingl_mint_authority()?),
            writable(associated_token_address(payer, mint)?),
            readonly(spl_token::id()),
            readonly(sysvar::rent::id()),
            readonly(system_program::id()),
            writable(self.metadata(mint)?),
            writable(self.pd_pool_account()?),
            writable(self.nft_account(mint)?),
            writable(self.edition(&collection_mint)?),
            writable(self.edition(mint)?),
            readonly(collection_mint),
            readonly(self.metadata(&collection_mint)?),
            readonly(self.ingl_config()?),
            readonly(self.uris_account()?),
            writable(self.general_account()?),
        ];
        accounts.extend(self.config.feed_account_metas());
        accounts.extend([
            readonly(system_program::id()),
            readonly(spl_token::id()),
            readonly(ASSOCIATED_TOKEN_PROGRAM_ID),
            readonly(self.config.metadata_program_id),
        ]);
        Ok(accounts)
    }

    /// `validator` is the vote identity recorded in the config; it does not
    /// sign.
    pub fn init_program_accounts(
        &self,
        payer: &Pubkey,
        validator: &Pubkey,
    ) -> Result<Vec<AccountMeta>, PdaError> {
        let collection_mint = self.collection_mint()?;
        let collection_holder = self.collection_holder()?;
        Ok(vec![
            AccountMeta::new(*payer, true),
            writable(self.ingl_config()?),
            writable(self.general_account()?),
            writable(self.uris_account()?),
            readonly(sysvar::rent::id()),
            readonly(*validator),
            writable(collection_holder),
            writable(collection_mint),
            writable(self.ingl_mint_authority()?),
            writable(associated_token_address(&collection_holder, &collection_mint)?),
            writable(self.metadata(&collection_mint)?),
            writable(self.edition(&collection_mint)?),
            readonly(spl_token::id()),
            readonly(system_program::id()),
            readonly(system_program::id()),
            readonly(spl_token::id()),
            readonly(ASSOCIATED_TOKEN_PROGRAM_ID),
            readonly(self.config.metadata_program_id),
        ])
    }

    pub fn init_rarity_imprint_accounts(
        &self,
        payer: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<AccountMeta>, PdaError> {
        Ok(vec![
            AccountMeta::new(*payer, true),
            writable(self.gem_account(mint)?),
            readonly(*mint),
            writable(associated_token_address(payer, mint)?),
            writable(self.mint_authority()?),
            readonly(self.edition(mint)?),
            readonly(spl_token::id()),
            readonly(self.config.metadata_program_id),
        ])
    }

    pub fn imprint_rarity_accounts(
        &self,
        payer: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<AccountMeta>, PdaError> {
        Ok(vec![
            AccountMeta::new(*payer, true),
            writable(self.nft_account(mint)?),
            readonly(*mint),
            writable(associated_token_address(payer, mint)?),
            writable(self.mint_authority()?),
            writable(self.metadata(mint)?),
            readonly(self.edition(mint)?),
            readonly(spl_token::id()),
            readonly(self.config.metadata_program_id),
        ])
    }

    pub fn redeem_nft_accounts(
        &self,
        payer: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<AccountMeta>, PdaError> {
        let collection_mint = self.newer_collection_mint()?;
        Ok(vec![
            AccountMeta::new(*payer, true),
            writable(*mint),
            writable(self.minting_pool()?),
            writable(associated_token_address(payer, mint)?),
            writable(self.mint_authority()?),
            writable(self.gem_account(mint)?),
            writable(self.metadata(mint)?),
            writable(self.edition(mint)?),
            writable(self.metadata(&collection_mint)?),
            readonly(spl_token::id()),
            writable(self.treasury()?),
            readonly(system_program::id()),
            readonly(self.config.metadata_program_id),
        ])
    }
}
