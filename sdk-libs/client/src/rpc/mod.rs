pub mod errors;
pub mod rpc_connection;
pub mod solana_rpc;

use std::str::FromStr;

pub use errors::RpcError;
pub use rpc_connection::{ConfirmationStrategy, RpcConnection};
use solana_account_decoder::UiAccountData;
use solana_client::rpc_response::RpcKeyedAccount;
use solana_sdk::pubkey::Pubkey;
pub use solana_rpc::{RpcConnectionConfig, SolanaRpcConnection, SolanaRpcUrl};

/// The parsed fields of an SPL token account the client cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccountSummary {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub decimals: u8,
    pub amount: u64,
}

impl TokenAccountSummary {
    /// Reads a `jsonParsed` token account as returned by
    /// `getTokenAccountsByOwner`.
    pub fn try_from_keyed_account(keyed: &RpcKeyedAccount) -> Result<Self, RpcError> {
        let decode_error = |error: &str| RpcError::AccountDecode {
            address: keyed.pubkey.clone(),
            error: error.to_string(),
        };
        let parsed = match &keyed.account.data {
            UiAccountData::Json(parsed_account) => &parsed_account.parsed,
            _ => return Err(decode_error("account data is not jsonParsed")),
        };
        let info = &parsed["info"];
        let pubkey_field = |value: &serde_json::Value, field: &str| {
            value
                .as_str()
                .and_then(|s| Pubkey::from_str(s).ok())
                .ok_or_else(|| decode_error(&format!("missing or invalid `{}`", field)))
        };

        let address = Pubkey::from_str(&keyed.pubkey).map_err(|e| decode_error(&e.to_string()))?;
        let mint = pubkey_field(&info["mint"], "mint")?;
        let owner = pubkey_field(&info["owner"], "owner")?;
        let decimals = info["tokenAmount"]["decimals"]
            .as_u64()
            .and_then(|d| u8::try_from(d).ok())
            .ok_or_else(|| decode_error("missing or invalid `tokenAmount.decimals`"))?;
        let amount = info["tokenAmount"]["amount"]
            .as_str()
            .and_then(|a| a.parse::<u64>().ok())
            .ok_or_else(|| decode_error("missing or invalid `tokenAmount.amount`"))?;

        Ok(Self {
            address,
            mint,
            owner,
            decimals,
            amount,
        })
    }
}
