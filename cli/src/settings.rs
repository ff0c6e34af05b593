use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use config::{Config, Environment, File};
use ingl_client::{
    config::Network,
    instruction::{InitPayload, InstructionKind},
    rpc::{RpcConnectionConfig, SolanaRpcUrl},
    wallet::{KeypairWallet, WalletHandle},
};
use serde::Deserialize;
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    signature::read_keypair_file,
};

use crate::{
    cli::{Commands, GlobalArgs},
    errors::{CliError, ConfigurationError},
    telemetry::DEFAULT_LOG_FILTER,
};

const CONFIG_FILE_NAME: &str = "ingl.toml";
const ENV_PREFIX: &str = "INGL";

/// Settings layered from `ingl.toml`, `INGL_*` environment variables and the
/// command line, later sources winning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub network: Network,
    pub rpc_url: Option<String>,
    pub keypair: Option<PathBuf>,
    /// processed, confirmed or finalized
    pub commitment: Option<String>,
    pub logging: LoggingSettings,
    pub init: InitProgramSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directives, overridden by `RUST_LOG`.
    pub filter: String,
    pub directory: PathBuf,
    pub to_file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            directory: PathBuf::from("logs"),
            to_file: true,
        }
    }
}

/// Parameters written by `init-program`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InitProgramSettings {
    pub log_level: u8,
    pub init_commission: u8,
    pub max_primary_stake: u64,
    pub nft_holders_share: u8,
    pub initial_redemption_fee: u8,
    pub is_validator_id_switchable: bool,
    pub unit_backing: u64,
    pub redemption_fee_duration: u32,
    pub proposal_quorum: u8,
    pub creator_royalties: u16,
    pub rarities: Vec<u16>,
    pub rarity_names: Vec<String>,
    pub twitter_handle: String,
    pub discord_invite: String,
    pub validator_name: String,
    pub collection_uri: String,
    pub website: String,
}

impl Default for InitProgramSettings {
    fn default() -> Self {
        let payload = InitPayload::default();
        Self {
            log_level: payload.log_level,
            init_commission: payload.init_commission,
            max_primary_stake: payload.max_primary_stake,
            nft_holders_share: payload.nft_holders_share,
            initial_redemption_fee: payload.initial_redemption_fee,
            is_validator_id_switchable: payload.is_validator_id_switchable,
            unit_backing: payload.unit_backing,
            redemption_fee_duration: payload.redemption_fee_duration,
            proposal_quorum: payload.proposal_quorum,
            creator_royalties: payload.creator_royalties,
            rarities: payload.rarities,
            rarity_names: payload.rarity_names,
            twitter_handle: payload.twitter_handle,
            discord_invite: payload.discord_invite,
            validator_name: payload.validator_name,
            collection_uri: payload.collection_uri,
            website: payload.website,
        }
    }
}

impl InitProgramSettings {
    pub fn to_payload(&self) -> InitPayload {
        InitPayload {
            instruction: InstructionKind::Init,
            log_level: self.log_level,
            init_commission: self.init_commission,
            max_primary_stake: self.max_primary_stake,
            nft_holders_share: self.nft_holders_share,
            initial_redemption_fee: self.initial_redemption_fee,
            is_validator_id_switchable: self.is_validator_id_switchable,
            unit_backing: self.unit_backing,
            redemption_fee_duration: self.redemption_fee_duration,
            proposal_quorum: self.proposal_quorum,
            creator_royalties: self.creator_royalties,
            rarities: self.rarities.clone(),
            rarity_names: self.rarity_names.clone(),
            twitter_handle: self.twitter_handle.clone(),
            discord_invite: self.discord_invite.clone(),
            validator_name: self.validator_name.clone(),
            collection_uri: self.collection_uri.clone(),
            website: self.website.clone(),
        }
    }
}

/// `ingl.toml` next to the executable if present, otherwise in the working
/// directory.
fn locate_config_file() -> PathBuf {
    let exe_config = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)));
    match exe_config {
        Some(path) if path.exists() => path,
        _ => PathBuf::from(CONFIG_FILE_NAME),
    }
}

impl Settings {
    /// Reads the settings file (optional unless given explicitly) and the
    /// `INGL_` environment. Nested keys use `__`, e.g.
    /// `INGL_INIT__VALIDATOR_NAME`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(locate_config_file()).required(false),
        };
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("init.rarities")
                    .with_list_parse_key("init.rarity_names")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn apply_args(mut self, args: &GlobalArgs) -> Self {
        if let Some(network) = args.network {
            self.network = network;
        }
        if let Some(rpc_url) = &args.rpc_url {
            self.rpc_url = Some(rpc_url.clone());
        }
        if let Some(keypair) = &args.keypair {
            self.keypair = Some(keypair.clone());
        }
        self
    }

    pub fn commitment_config(&self) -> Result<Option<CommitmentConfig>, ConfigurationError> {
        self.commitment
            .as_deref()
            .map(|commitment| {
                CommitmentLevel::from_str(commitment)
                    .map(|commitment| CommitmentConfig { commitment })
                    .map_err(|_| ConfigurationError::InvalidCommitment(commitment.to_string()))
            })
            .transpose()
    }

    /// Price feeds are read from mainnet unless a url is set explicitly.
    pub fn rpc_url(&self, command: &Commands) -> String {
        match (&self.rpc_url, command) {
            (Some(url), _) => url.clone(),
            (None, Commands::HistoryFeeds) => SolanaRpcUrl::Mainnet.to_string(),
            (None, _) => SolanaRpcUrl::from(self.network).to_string(),
        }
    }

    pub fn rpc_config(&self, command: &Commands) -> Result<RpcConnectionConfig, CliError> {
        let config = RpcConnectionConfig::new(self.rpc_url(command));
        Ok(match self.commitment_config()? {
            Some(commitment) => config.with_commitment(commitment),
            None => config,
        })
    }

    pub fn wallet(&self) -> Result<WalletHandle, CliError> {
        match &self.keypair {
            Some(path) => {
                let keypair = read_keypair_file(path).map_err(|e| CliError::Keypair {
                    path: path.clone(),
                    error: e.to_string(),
                })?;
                Ok(WalletHandle::connected(KeypairWallet::new(keypair)))
            }
            None => Ok(WalletHandle::ReadOnly(None)),
        }
    }
}
