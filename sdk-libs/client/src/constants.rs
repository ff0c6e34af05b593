use solana_sdk::{pubkey, pubkey::Pubkey};

/// Ingl validator NFT program.
pub const PROGRAM_ID: Pubkey = pubkey!("G5d6MNoa742nJz8XbJKE7diagi7JAWiZ266f9u9bJGwd");
/// Metaplex token metadata program.
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("ATokenGPvbdGVxuN9Yhwq1DLp6NmkGNYP7V6SHdGkLtS");

/// An extend instruction carrying more addresses than this does not fit in
/// a single transaction next to the create instruction.
pub const MAX_ADDRESSES_PER_EXTEND: usize = 20;

pub const MINT_NFT_COMPUTE_UNITS: u32 = 1_000_000;
pub const INIT_PROGRAM_COMPUTE_UNITS: u32 = 400_000;

pub const DEFAULT_LOG_LEVEL: u8 = 0;

// PDA seeds
pub const INGL_MINT_AUTHORITY_SEED: &[u8] = b"ingl_mint_authority";
pub const MINT_AUTHORITY_SEED: &[u8] = b"mint_authority";
pub const GENERAL_ACCOUNT_SEED: &[u8] = b"general_account";
pub const NFT_ACCOUNT_SEED: &[u8] = b"nft_account";
pub const GEM_ACCOUNT_SEED: &[u8] = b"gem_account";
pub const PD_POOL_ACCOUNT_SEED: &[u8] = b"pd_pool_account";
pub const MINTING_POOL_SEED: &[u8] = b"minting_pool";
pub const INGL_NFT_COLLECTION_SEED: &[u8] = b"ingl_nft_collection";
pub const INGL_NFT_COLLECTION_NEWER_SEED: &[u8] = b"ingl_nft_collection_newer";
pub const INGL_CONFIG_SEED: &[u8] = b"ingl_config";
pub const URIS_ACCOUNT_SEED: &[u8] = b"uris_account";
pub const COLLECTION_HOLDER_SEED: &[u8] = b"collection_holder";
pub const INGL_TREASURY_SEED: &[u8] = b"ingl_treasury_account_key";
pub const METADATA_SEED: &[u8] = b"metadata";
pub const EDITION_SEED: &[u8] = b"edition";
