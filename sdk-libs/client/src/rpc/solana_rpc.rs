use std::{
    fmt::{Debug, Display, Formatter},
    time::Duration,
};

use async_trait::async_trait;
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_request::TokenAccountsFilter};
use solana_sdk::{
    account::Account,
    clock::Slot,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, VersionedTransaction},
};
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::{
    config::Network,
    rpc::{
        errors::RpcError,
        rpc_connection::{ConfirmationStrategy, RpcConnection},
        TokenAccountSummary,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolanaRpcUrl {
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
    Custom(String),
}

impl Display for SolanaRpcUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            SolanaRpcUrl::Mainnet => "https://api.mainnet-beta.solana.com".to_string(),
            SolanaRpcUrl::Testnet => "https://api.testnet.solana.com".to_string(),
            SolanaRpcUrl::Devnet => "https://api.devnet.solana.com".to_string(),
            SolanaRpcUrl::Localnet => "http://localhost:8899".to_string(),
            SolanaRpcUrl::Custom(url) => url.clone(),
        };
        write!(f, "{}", str)
    }
}

impl From<Network> for SolanaRpcUrl {
    fn from(network: Network) -> Self {
        match network {
            Network::MainnetBeta => SolanaRpcUrl::Mainnet,
            Network::Testnet => SolanaRpcUrl::Testnet,
            Network::Devnet => SolanaRpcUrl::Devnet,
            Network::Localnet => SolanaRpcUrl::Localnet,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RpcConnectionConfig {
    pub url: String,
    pub commitment_config: Option<CommitmentConfig>,
    /// Delay between two signature status polls while confirming.
    pub poll_interval: Duration,
}

impl RpcConnectionConfig {
    pub fn new(url: impl ToString) -> Self {
        Self {
            url: url.to_string(),
            commitment_config: None,
            poll_interval: Duration::from_millis(500),
        }
    }

    pub fn with_commitment(mut self, commitment_config: CommitmentConfig) -> Self {
        self.commitment_config = Some(commitment_config);
        self
    }
}

impl From<SolanaRpcUrl> for RpcConnectionConfig {
    fn from(url: SolanaRpcUrl) -> Self {
        Self::new(url)
    }
}

pub struct SolanaRpcConnection {
    pub client: RpcClient,
    poll_interval: Duration,
}

impl Debug for SolanaRpcConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolanaRpcConnection {{ client: {:?} }}",
            self.client.url()
        )
    }
}

impl SolanaRpcConnection {
    pub fn new(config: RpcConnectionConfig) -> Self {
        let commitment_config = config
            .commitment_config
            .unwrap_or(CommitmentConfig::confirmed());
        let client = RpcClient::new_with_commitment(config.url, commitment_config);
        Self {
            client,
            poll_interval: config.poll_interval,
        }
    }
}

#[async_trait]
impl RpcConnection for SolanaRpcConnection {
    fn get_url(&self) -> String {
        self.client.url()
    }

    fn commitment(&self) -> CommitmentConfig {
        self.client.commitment()
    }

    async fn get_latest_blockhash(&self) -> Result<(Hash, u64), RpcError> {
        self.client
            .get_latest_blockhash_with_commitment(self.client.commitment())
            .await
            .map_err(RpcError::from)
    }

    async fn get_slot(&self) -> Result<Slot, RpcError> {
        self.client.get_slot().await.map_err(RpcError::from)
    }

    async fn get_account(&self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        self.client
            .get_account_with_commitment(&address, self.client.commitment())
            .await
            .map(|response| response.value)
            .map_err(RpcError::from)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, RpcError> {
        self.client
            .send_transaction(transaction)
            .await
            .map_err(RpcError::from)
    }

    async fn send_versioned_transaction(
        &self,
        transaction: &VersionedTransaction,
    ) -> Result<Signature, RpcError> {
        self.client
            .send_transaction(transaction)
            .await
            .map_err(RpcError::from)
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        strategy: ConfirmationStrategy,
        commitment: Option<CommitmentConfig>,
    ) -> Result<(), RpcError> {
        let commitment = commitment.unwrap_or_else(|| self.client.commitment());
        let start_time = Instant::now();
        loop {
            match self
                .client
                .get_signature_status_with_commitment(signature, commitment)
                .await?
            {
                Some(Ok(())) => return Ok(()),
                Some(Err(e)) => return Err(RpcError::from(e)),
                None => {}
            }

            match strategy {
                ConfirmationStrategy::BlockHeight {
                    last_valid_block_height,
                    ..
                } => {
                    let block_height = self.client.get_block_height().await?;
                    if block_height > last_valid_block_height {
                        return Err(RpcError::BlockhashExpired {
                            signature: *signature,
                        });
                    }
                }
                ConfirmationStrategy::Timeout(timeout) => {
                    if start_time.elapsed() >= timeout {
                        return Err(RpcError::ConfirmationTimeout {
                            signature: *signature,
                            timeout,
                        });
                    }
                }
            }
            debug!(
                "signature {} not yet at {:?}, polling again",
                signature, commitment.commitment
            );
            sleep(self.poll_interval).await;
        }
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<Vec<TokenAccountSummary>, RpcError> {
        let accounts = self
            .client
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(*token_program))
            .await?;
        accounts
            .iter()
            .map(TokenAccountSummary::try_from_keyed_account)
            .collect()
    }
}
