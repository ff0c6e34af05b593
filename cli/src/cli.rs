use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ingl_client::config::Network;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Overrides the cluster url derived from the network.
    #[arg(long, global = true, env = "INGL_RPC_URL")]
    pub rpc_url: Option<String>,

    #[arg(long, global = true, env = "INGL_NETWORK")]
    pub network: Option<Network>,

    /// Wallet keypair file. Without one the wallet is read-only.
    #[arg(long, global = true, env = "INGL_KEYPAIR")]
    pub keypair: Option<PathBuf>,

    /// Token mint id used by the imprint and redeem commands.
    #[arg(long, global = true)]
    pub mint: Option<String>,

    /// Settings file, `ingl.toml` by default.
    #[arg(long, global = true, env = "INGL_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Mint an NFT to a new mint.
    MintNft,
    /// Initialize the program with the configured init parameters.
    InitProgram,
    /// Create the rarity imprint account of `--mint`.
    InitImprint,
    ImprintRarity,
    /// Redeem the NFT `--mint` for its backing.
    Redeem,
    /// List the token accounts of the wallet.
    AccountData,
    /// Print the history buffer of every mainnet price feed.
    HistoryFeeds,
    CloseLookupTables(CloseLookupTablesArgs),
}

#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct CloseLookupTablesArgs {
    #[arg(required = true, num_args = 1..)]
    pub tables: Vec<String>,

    /// Only deactivate; tables can be closed once the cooldown has passed.
    #[arg(long)]
    pub deactivate_only: bool,
}
