use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::Deserialize;
use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey};

use crate::{
    constants::{PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID},
    price_feed,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    #[default]
    Devnet,
    Testnet,
    #[serde(alias = "mainnet")]
    MainnetBeta,
    #[serde(alias = "local")]
    Localnet,
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::MainnetBeta => "mainnet-beta",
            Network::Localnet => "localnet",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "devnet" => Ok(Network::Devnet),
            "testnet" => Ok(Network::Testnet),
            "mainnet" | "mainnet-beta" => Ok(Network::MainnetBeta),
            "localnet" | "local" => Ok(Network::Localnet),
            other => Err(format!("unknown network `{}`", other)),
        }
    }
}

/// Addresses the client derives everything else from. Built once at start-up
/// and handed to the account resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramConfig {
    pub program_id: Pubkey,
    pub metadata_program_id: Pubkey,
    pub network: Network,
    /// Price-feed aggregators passed to the mint instruction, in order.
    pub feed_accounts: Vec<Pubkey>,
}

impl ProgramConfig {
    pub fn new(network: Network) -> Self {
        Self {
            program_id: PROGRAM_ID,
            metadata_program_id: TOKEN_METADATA_PROGRAM_ID,
            network,
            feed_accounts: price_feed::feed_accounts(network),
        }
    }

    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn with_feed_accounts(mut self, feed_accounts: Vec<Pubkey>) -> Self {
        self.feed_accounts = feed_accounts;
        self
    }

    pub fn feed_account_metas(&self) -> Vec<AccountMeta> {
        self.feed_accounts
            .iter()
            .map(|address| AccountMeta::new_readonly(*address, false))
            .collect()
    }
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self::new(Network::default())
    }
}
