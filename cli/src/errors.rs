use std::path::PathBuf;

use ingl_client::{service::ServiceError, transaction::ForwardError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Please Enter your token mint id")]
    MissingMint,

    #[error("Invalid pubkey `{0}`")]
    InvalidPubkey(String),

    #[error("Failed to read keypair {path}: {error}")]
    Keypair { path: PathBuf, error: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Forward(#[from] ForwardError),
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid commitment `{0}`, expected processed, confirmed or finalized")]
    InvalidCommitment(String),
}
