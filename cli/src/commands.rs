use std::str::FromStr;

use ingl_client::{
    instruction::MintNftPayload,
    lookup_table::{close_lookup_tables, deactivate_lookup_tables},
    price_feed::PRICE_FEEDS,
    rpc::RpcConnection,
    service::NftService,
};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info};

use crate::{
    cli::{CloseLookupTablesArgs, Commands},
    errors::CliError,
    settings::Settings,
};

/// Parses the `--mint` argument. An absent or blank mint is reported as
/// [`CliError::MissingMint`].
pub fn parse_mint(mint: Option<&str>) -> Result<Pubkey, CliError> {
    match mint.map(str::trim) {
        None | Some("") => Err(CliError::MissingMint),
        Some(mint) => parse_pubkey(mint),
    }
}

fn parse_pubkey(value: &str) -> Result<Pubkey, CliError> {
    Pubkey::from_str(value).map_err(|_| CliError::InvalidPubkey(value.to_string()))
}

pub async fn run<R: RpcConnection>(
    command: &Commands,
    service: &NftService<R>,
    mint: Option<&str>,
    settings: &Settings,
) -> Result<(), CliError> {
    debug!("running {:?}", command);
    match command {
        Commands::MintNft => {
            let minted = service.mint_nft(MintNftPayload::default()).await?;
            println!("Minted {} ({})", minted.mint, minted.signature);
            if !minted.lookup_tables.is_empty() {
                let tables: Vec<String> =
                    minted.lookup_tables.iter().map(Pubkey::to_string).collect();
                println!(
                    "Lookup tables deactivated, close them later with: ingl close-lookup-tables {}",
                    tables.join(" ")
                );
            }
        }
        Commands::InitProgram => {
            let initialized = service.init_program(&settings.init.to_payload()).await?;
            println!(
                "Initialized program with validator {} ({})",
                initialized.validator, initialized.signature
            );
        }
        Commands::InitImprint | Commands::ImprintRarity | Commands::Redeem => {
            let mint = match parse_mint(mint) {
                Ok(mint) => mint,
                Err(CliError::MissingMint) => {
                    println!("{}", CliError::MissingMint);
                    return Ok(());
                }
                Err(error) => return Err(error),
            };
            let signature = match command {
                Commands::InitImprint => service.init_rarity_imprint(mint).await?,
                Commands::ImprintRarity => service.imprint_rarity(mint).await?,
                _ => service.redeem_nft(mint).await?,
            };
            println!("{}", signature);
        }
        Commands::AccountData => match service.get_account_data().await? {
            Some(accounts) => {
                info!("{} token accounts", accounts.len());
                for account in accounts {
                    println!(
                        "{} mint={} amount={} decimals={}",
                        account.address, account.mint, account.amount, account.decimals
                    );
                }
            }
            None => println!("No wallet address, pass --keypair"),
        },
        Commands::HistoryFeeds => {
            for (symbol, history_buffer) in service.feed_history_buffers(&PRICE_FEEDS).await? {
                match history_buffer {
                    Some(history_buffer) => println!("{}: {}", symbol, history_buffer),
                    None => println!("{}: none", symbol),
                }
            }
        }
        Commands::CloseLookupTables(args) => close_tables(service, args).await?,
    }
    Ok(())
}

async fn close_tables<R: RpcConnection>(
    service: &NftService<R>,
    args: &CloseLookupTablesArgs,
) -> Result<(), CliError> {
    let tables = args
        .tables
        .iter()
        .map(|table| parse_pubkey(table))
        .collect::<Result<Vec<_>, _>>()?;
    let signature = if args.deactivate_only {
        deactivate_lookup_tables(service.rpc(), service.wallet(), &tables).await?
    } else {
        close_lookup_tables(service.rpc(), service.wallet(), &tables).await?
    };
    if let Some(signature) = signature {
        println!("{}", signature);
    }
    Ok(())
}
