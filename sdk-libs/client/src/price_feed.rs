//! Switchboard v2 price-feed aggregators read by the mint instruction.
//!
//! The aggregators are owned by the oracle network; this module only reads
//! them. Each aggregator keeps its past results in a separate history-buffer
//! account whose address is stored inside the aggregator data.

use solana_sdk::{pubkey, pubkey::Pubkey};
use thiserror::Error;
use tracing::debug;

use crate::{
    config::Network,
    rpc::{RpcConnection, RpcError},
};

pub const SWITCHBOARD_V2_PROGRAM_ID: Pubkey =
    pubkey!("SW1TCH7qEPTdLsDHRgPuMQjbQxKdH2aBStViMFnt64f");

/// Byte offset of `history_buffer` in `AggregatorAccountData`, counting the
/// 8 byte account discriminator. The struct is `repr(packed)`:
///
/// | field                                   | size |
/// |-----------------------------------------|------|
/// | discriminator                           | 8    |
/// | name, metadata, _reserved1              | 192  |
/// | queue_pubkey                            | 32   |
/// | batch size, min results, min job, delay | 16   |
/// | start_after                             | 8    |
/// | variance_threshold (decimal)            | 20   |
/// | force_report_period, expiration         | 16   |
/// | consecutive_failure_count, next update  | 16   |
/// | is_locked                               | 1    |
/// | crank_pubkey                            | 32   |
/// | latest_confirmed_round, current_round   | 2194 |
/// | job_pubkeys_data, job_hashes            | 1024 |
/// | job_pubkeys_size                        | 4    |
/// | jobs_checksum, authority                | 64   |
pub const HISTORY_BUFFER_OFFSET: usize = 3627;

/// Aggregators passed to the mint instruction on devnet.
pub const DEVNET_FEEDS: [(&str, Pubkey); 20] = [
    ("BTC", pubkey!("9ATrvi6epR5hVYtwNs7BB7VCiYnd4WM7e8MfafWpfiXC")),
    ("SOL", pubkey!("7LLvRhMs73FqcLkA8jvEE1AM2mYZXTmqfUv8GAEurymx")),
    ("ETH", pubkey!("6fhxFvPocWapZ5Wa2miDnrX2jYRFKvFqYnX11GGkBo2f")),
    ("BNB", pubkey!("DR6PqK15tD21MEGSLmDpXwLA7Fw47kwtdZeUMdT7vd7L")),
    ("ADA", pubkey!("HPRYVJQ3DcTqszvorS4gCwbJvvNeWMgaCCoF3Lj3sAgC")),
    ("BCH", pubkey!("2qcLzR7FatMnfCbiB9BdhGsd6SxDgEqWq7xkD62n3xoT")),
    ("SBR", pubkey!("Bux82YCH8DgqFAQTKBxuQHDp3cud5AhD1Kibhjadz22D")),
    ("ZEC", pubkey!("9gGvxPErkRubNj1vKE19smLa4Kp89kkzMVyA6TMvmKEZ")),
    ("LUNA", pubkey!("3WNhN4RJwRui4R3k1S9agGzyMZkCwKQkWjoEHbDeAF8J")),
    ("TRX", pubkey!("CNzjdKHfXqyAeGd2APpzvwLcuPACrFdHb3k6SLsod6Ao")),
    ("SUSHI", pubkey!("6cBTHY4HQ4PABmhUqVLT4n4bNpmZAi2br5VnqTQoVRUo")),
    ("DOGE", pubkey!("GRGMtrTszsoNzjqwTxsvkHVAPq5Snju2UzaAws5KBPed")),
    ("LTC", pubkey!("C9CeLP5B4Lqq7cFppRBUZjt6hrvd99YR3Sk4EPPuAoAC")),
    ("XLM", pubkey!("FReW6u9YPpGQNaeEHNkVqA4KGA2WzbcT87NThwFb7fwm")),
    ("LINK", pubkey!("GEp5pZFjFPqn1teMmx9sLPyADf9N9aQsRn9TE17PwmmL")),
    ("DOT", pubkey!("Fd3UQMqmKCA6SNf6To97PdC2H3EfzYWR5bxr5CBYuFiy")),
    ("XMR", pubkey!("EQHf8ueSzJUPELF6yZkyGfwjbLsDmMwFrAYehmC15b6c")),
    ("SRM", pubkey!("C5x5W7BHVY61ULtWQ3qkP7kpE6zHViWd4AHpKDuAywPw")),
    ("PORT", pubkey!("HnbpTLbdv78hkVCDBZ52o5E6bkqtsZp4tUXBd2E8Sw9x")),
    ("PAI", pubkey!("EbpMMgMkC4Jt2oipUBc2GPL4XQo5uxKT8NpF8NEZWvqL")),
];

/// Aggregators passed to the mint instruction everywhere but devnet.
pub const MAINNET_FEEDS: [(&str, Pubkey); 2] = [
    ("BTC", pubkey!("8SXvChNYFhRq4EZuZvnhjrB3jJRQCv4k3P4W6hesH3Ee")),
    ("SOL", pubkey!("E3cqnoFvTeKKNsGmC8YitpMjo2E39hwfoyt2Aiem7dCb")),
];

/// Mainnet-beta aggregators by trading pair.
pub const PRICE_FEEDS: [(&str, Pubkey); 20] = [
    ("SOL_USD", pubkey!("GvDMxPzN1sCj7L26YDK2HnMRXEQmQ2aemov8YBtPS7vR")),
    ("BTC_USD", pubkey!("8SXvChNYFhRq4EZuZvnhjrB3jJRQCv4k3P4W6hesH3Ee")),
    ("ETH_USD", pubkey!("HNStfhaLnqwF2ZtJUizaA9uHDAVB976r2AgTUx9LrdEo")),
    ("BNB_USD", pubkey!("2steFGCbo9FNXksMBGDh9NwixtdG5PdQoaCuR4knyvrB")),
    ("BCH_USD", pubkey!("5ajwSK27wGKfbcJfUGCsu7Rp1VfEenUj64yMv5yKD85j")),
    ("ADA_USD", pubkey!("3hScmVMU4LyMKQwREEoLjj1YKaZJZov2G2R8GTQNcMkU")),
    ("SBR_USD", pubkey!("HFDJtPwJSn2kv96mn5wYUKVhA2QHbphfNtjGeKuyfXnm")),
    ("ZEC_USD", pubkey!("DxLVBqe19Rf2eAijqShLf9bs1CNubXQWUjQRixXfMNoT")),
    ("LUNA_USD", pubkey!("34cmagXChoAvGSwVdGpZfvDahdfnq2Q81Mp6J7joae3X")),
    ("TRX_USD", pubkey!("EnZ16z5ARbs3YHSmgmsYgmcajHxoUDueZc7Bsikma7rM")),
    ("SUSHI_USD", pubkey!("HeqreCR28Su4wPvzDFd4hkApi7XiGtWJxD4Q6EebtBCs")),
    ("DOGE_USD", pubkey!("FoBK7CgwobLrEfGC8MaGFpYxhucCo1DBhAm5EEvUPD2i")),
    ("LTC_USD", pubkey!("9gh7xLynnJ1FRfNquxPnLrCFsNeaANR2vFfadHgCJuoW")),
    ("XLM_USD", pubkey!("EQJ6sTgoKHEcfneHCpTWd4avBvZWDjh4oFqXqBeS5Rab")),
    ("LINK_USD", pubkey!("5ro9z5HxJtSeATderc8NgTQh37HP1ZWfJPCQPkFn4Jpq")),
    ("DOT_USD", pubkey!("B6bjqp6kL3qniMn9nuzHvjzRLiJvvVusugDXJXhYjNYz")),
    ("XMR_USD", pubkey!("Lk9PWt2Th6pmdzAJsPvzKzqwDYGTn2PerejJtg1mFsw")),
    ("SRM_USD", pubkey!("CUgoqwiQ4wCt6Tthkrgx5saAEpLBjPCdHshVa4Pbfcx2")),
    ("PORT_USD", pubkey!("BnT7954eT3UT4XX5zf9Zwfdrag5h3YmzG8LBRwmXo5Bi")),
    ("PAI_USD", pubkey!("DKayKbGmnby8XUagUL3bVLcN7NZKy6j5ugyBmHzwpqc8")),
];

#[derive(Error, Debug)]
pub enum PriceFeedError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Aggregator account {0} not found")]
    AccountNotFound(Pubkey),

    #[error("Account {address} is owned by {owner}, not the switchboard program")]
    InvalidOwner { address: Pubkey, owner: Pubkey },

    #[error("Aggregator account {address} is {len} bytes, too small to hold a history buffer")]
    AccountTooSmall { address: Pubkey, len: usize },
}

pub fn feed_accounts(network: Network) -> Vec<Pubkey> {
    let feeds: &[(&str, Pubkey)] = match network {
        Network::Devnet => &DEVNET_FEEDS,
        _ => &MAINNET_FEEDS,
    };
    feeds.iter().map(|(_, address)| *address).collect()
}

/// Reads the history-buffer address out of raw aggregator data. Returns `None`
/// when the aggregator has no history buffer configured.
pub fn history_buffer_from_data(
    address: &Pubkey,
    data: &[u8],
) -> Result<Option<Pubkey>, PriceFeedError> {
    let end = HISTORY_BUFFER_OFFSET + 32;
    let bytes: [u8; 32] = data
        .get(HISTORY_BUFFER_OFFSET..end)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(PriceFeedError::AccountTooSmall {
            address: *address,
            len: data.len(),
        })?;
    let history_buffer = Pubkey::new_from_array(bytes);
    Ok((history_buffer != Pubkey::default()).then_some(history_buffer))
}

pub async fn fetch_history_buffer<R: RpcConnection>(
    rpc: &R,
    aggregator: Pubkey,
) -> Result<Option<Pubkey>, PriceFeedError> {
    let account = rpc
        .get_account(aggregator)
        .await?
        .ok_or(PriceFeedError::AccountNotFound(aggregator))?;
    if account.owner != SWITCHBOARD_V2_PROGRAM_ID {
        return Err(PriceFeedError::InvalidOwner {
            address: aggregator,
            owner: account.owner,
        });
    }
    let history_buffer = history_buffer_from_data(&aggregator, &account.data)?;
    debug!("aggregator {} history buffer {:?}", aggregator, history_buffer);
    Ok(history_buffer)
}

/// Resolves the history buffer of every feed, one request at a time.
pub async fn fetch_history_buffers<R: RpcConnection>(
    rpc: &R,
    feeds: &[(&str, Pubkey)],
) -> Result<Vec<(String, Option<Pubkey>)>, PriceFeedError> {
    let mut history_buffers = Vec::with_capacity(feeds.len());
    for (symbol, aggregator) in feeds {
        let history_buffer = fetch_history_buffer(rpc, *aggregator).await?;
        history_buffers.push((symbol.to_string(), history_buffer));
    }
    Ok(history_buffers)
}
