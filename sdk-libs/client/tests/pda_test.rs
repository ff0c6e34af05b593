//! Account lists of every instruction: order, signer and writable flags.

use ingl_client::{
    config::{Network, ProgramConfig},
    constants::{ASSOCIATED_TOKEN_PROGRAM_ID, PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID},
    pda::{associated_token_address, find_program_address, AccountResolver},
    price_feed::{DEVNET_FEEDS, MAINNET_FEEDS},
};
use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey, system_program, sysvar};

fn resolver(network: Network) -> AccountResolver {
    AccountResolver::new(ProgramConfig::new(network))
}

fn pda(seeds: &[&[u8]]) -> Pubkey {
    Pubkey::find_program_address(seeds, &PROGRAM_ID).0
}

fn metadata(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[
            b"metadata",
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    )
    .0
}

fn edition(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[
            b"metadata",
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
            b"edition",
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    )
    .0
}

fn ata(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    associated_token_address(owner, mint).unwrap()
}

fn w(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new(pubkey, false)
}

fn r(pubkey: Pubkey) -> AccountMeta {
    AccountMeta::new_readonly(pubkey, false)
}

// ============================================================================
// Derivation
// ============================================================================

/// Deriving twice from the same seeds yields the same address and bump.
#[test]
fn test_derivation_is_deterministic() {
    let mint = Pubkey::new_unique();
    let seeds: &[&[u8]] = &[b"nft_account", mint.as_ref()];
    assert_eq!(
        find_program_address(seeds, &PROGRAM_ID).unwrap(),
        find_program_address(seeds, &PROGRAM_ID).unwrap()
    );
    assert_eq!(
        resolver(Network::Devnet).nft_account(&mint).unwrap(),
        pda(seeds)
    );
}

/// Addresses follow the configured program id.
#[test]
fn test_program_id_is_configurable() {
    let program_id = Pubkey::new_unique();
    let custom =
        AccountResolver::new(ProgramConfig::new(Network::Devnet).with_program_id(program_id));
    assert_eq!(
        custom.general_account().unwrap(),
        Pubkey::find_program_address(&[b"general_account"], &program_id).0
    );
    assert_ne!(
        custom.general_account().unwrap(),
        resolver(Network::Devnet).general_account().unwrap()
    );
}

/// Both mint authorities exist and differ.
#[test]
fn test_mint_authorities_differ() {
    let resolver = resolver(Network::Devnet);
    assert_eq!(
        resolver.ingl_mint_authority().unwrap(),
        pda(&[b"ingl_mint_authority"])
    );
    assert_eq!(resolver.mint_authority().unwrap(), pda(&[b"mint_authority"]));
    assert_ne!(
        resolver.ingl_mint_authority().unwrap(),
        resolver.mint_authority().unwrap()
    );
}

// ============================================================================
// Account lists
// ============================================================================

#[test]
fn test_mint_nft_accounts() {
    let resolver = resolver(Network::MainnetBeta);
    let payer = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let collection_mint = pda(&[b"ingl_nft_collection"]);

    let accounts = resolver.mint_nft_accounts(&payer, &mint).unwrap();
    let expected = vec![
        AccountMeta::new(payer, true),
        AccountMeta::new(mint, true),
        w(pda(&[b"ingl_mint_authority"])),
        w(ata(&payer, &mint)),
        r(spl_token::id()),
        r(sysvar::rent::id()),
        r(system_program::id()),
        w(metadata(&mint)),
        w(pda(&[b"pd_pool_account"])),
        w(pda(&[b"nft_account", mint.as_ref()])),
        w(edition(&collection_mint)),
        w(edition(&mint)),
        r(collection_mint),
        r(metadata(&collection_mint)),
        r(pda(&[b"ingl_config"])),
        r(pda(&[b"uris_account"])),
        w(pda(&[b"general_account"])),
        r(MAINNET_FEEDS[0].1),
        r(MAINNET_FEEDS[1].1),
        r(system_program::id()),
        r(spl_token::id()),
        r(ASSOCIATED_TOKEN_PROGRAM_ID),
        r(TOKEN_METADATA_PROGRAM_ID),
    ];
    assert_eq!(accounts, expected);
}

/// Devnet passes all twenty feeds between the general account and the
/// trailing programs.
#[test]
fn test_mint_nft_accounts_devnet_feeds() {
    let accounts = resolver(Network::Devnet)
        .mint_nft_accounts(&Pubkey::new_unique(), &Pubkey::new_unique())
        .unwrap();
    assert_eq!(accounts.len(), 17 + DEVNET_FEEDS.len() + 4);
    let feeds: Vec<AccountMeta> = DEVNET_FEEDS.iter().map(|(_, feed)| r(*feed)).collect();
    assert_eq!(&accounts[17..37], feeds.as_slice());
}

#[test]
fn test_init_program_accounts() {
    let resolver = resolver(Network::Devnet);
    let payer = Pubkey::new_unique();
    let validator = Pubkey::new_unique();
    let collection_mint = pda(&[b"ingl_nft_collection"]);
    let collection_holder = pda(&[b"collection_holder"]);

    let accounts = resolver.init_program_accounts(&payer, &validator).unwrap();
    let expected = vec![
        AccountMeta::new(payer, true),
        w(pda(&[b"ingl_config"])),
        w(pda(&[b"general_account"])),
        w(pda(&[b"uris_account"])),
        r(sysvar::rent::id()),
        r(validator),
        w(collection_holder),
        w(collection_mint),
        w(pda(&[b"ingl_mint_authority"])),
        w(ata(&collection_holder, &collection_mint)),
        w(metadata(&collection_mint)),
        w(edition(&collection_mint)),
        r(spl_token::id()),
        r(system_program::id()),
        r(system_program::id()),
        r(spl_token::id()),
        r(ASSOCIATED_TOKEN_PROGRAM_ID),
        r(TOKEN_METADATA_PROGRAM_ID),
    ];
    assert_eq!(accounts, expected);
}

#[test]
fn test_init_rarity_imprint_accounts() {
    let payer = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let accounts = resolver(Network::Devnet)
        .init_rarity_imprint_accounts(&payer, &mint)
        .unwrap();
    let expected = vec![
        AccountMeta::new(payer, true),
        w(pda(&[b"gem_account", mint.as_ref()])),
        r(mint),
        w(ata(&payer, &mint)),
        w(pda(&[b"mint_authority"])),
        r(edition(&mint)),
        r(spl_token::id()),
        r(TOKEN_METADATA_PROGRAM_ID),
    ];
    assert_eq!(accounts, expected);
}

#[test]
fn test_imprint_rarity_accounts() {
    let payer = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let accounts = resolver(Network::Devnet)
        .imprint_rarity_accounts(&payer, &mint)
        .unwrap();
    let expected = vec![
        AccountMeta::new(payer, true),
        w(pda(&[b"nft_account", mint.as_ref()])),
        r(mint),
        w(ata(&payer, &mint)),
        w(pda(&[b"mint_authority"])),
        w(metadata(&mint)),
        r(edition(&mint)),
        r(spl_token::id()),
        r(TOKEN_METADATA_PROGRAM_ID),
    ];
    assert_eq!(accounts, expected);
}

#[test]
fn test_redeem_nft_accounts() {
    let payer = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let collection_mint = pda(&[b"ingl_nft_collection_newer"]);
    let accounts = resolver(Network::Devnet)
        .redeem_nft_accounts(&payer, &mint)
        .unwrap();
    let expected = vec![
        AccountMeta::new(payer, true),
        w(mint),
        w(pda(&[b"minting_pool"])),
        w(ata(&payer, &mint)),
        w(pda(&[b"mint_authority"])),
        w(pda(&[b"gem_account", mint.as_ref()])),
        w(metadata(&mint)),
        w(edition(&mint)),
        w(metadata(&collection_mint)),
        r(spl_token::id()),
        w(pda(&[b"ingl_treasury_account_key"])),
        r(system_program::id()),
        r(TOKEN_METADATA_PROGRAM_ID),
    ];
    assert_eq!(accounts, expected);
}
