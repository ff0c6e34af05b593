//! Instruction data understood by the Ingl program.
//!
//! Every payload starts with the one byte [`InstructionKind`] discriminant
//! followed by its fields in declaration order, borsh encoded. The program
//! does its own range checks, nothing is validated here.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use thiserror::Error;

use crate::constants::DEFAULT_LOG_LEVEL;

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Failed to serialize instruction data: {0}")]
    Serialization(#[from] std::io::Error),
}

#[repr(u8)]
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    MintNft,
    ImprintRarity,
    Init,
    Redeem,
    NftWithdraw,
    ProcessRewards,
    InitRebalance,
    FinalizeRebalance,
    UploadUris,
    ResetUris,
    UnDelegateNft,
    DelegateNft,
    CreateVoteAccount,
    InitGovernance,
    VoteGovernance,
    FinalizeGovernance,
    ExecuteGovernance,
}

impl InstructionKind {
    pub fn discriminant(self) -> u8 {
        self as u8
    }

    /// Instruction data made of the discriminant alone.
    pub fn data(self) -> Vec<u8> {
        vec![self.discriminant()]
    }
}

/// Payload of the instructions that only take a log level.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionPayload {
    pub instruction: InstructionKind,
    pub log_level: u8,
}

impl InstructionPayload {
    pub fn new(instruction: InstructionKind) -> Self {
        Self {
            instruction,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintNftPayload {
    pub instruction: InstructionKind,
    pub switchboard_state_bump: u8,
    pub permission_bump: u8,
    pub log_level: u8,
}

impl Default for MintNftPayload {
    fn default() -> Self {
        Self {
            instruction: InstructionKind::MintNft,
            switchboard_state_bump: 0,
            permission_bump: 0,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

/// Program configuration written by [`InstructionKind::Init`].
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct InitPayload {
    pub instruction: InstructionKind,
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

impl Default for InitPayload {
    fn default() -> Self {
        Self {
            instruction: InstructionKind::Init,
            log_level: DEFAULT_LOG_LEVEL,
            init_commission: 5,
            max_primary_stake: 15_500_000_000,
            nft_holders_share: 55,
            initial_redemption_fee: 5,
            is_validator_id_switchable: true,
            unit_backing: 1_500_000_000,
            redemption_fee_duration: 365,
            proposal_quorum: 65,
            creator_royalties: 105,
            rarities: vec![5300, 3000, 1000, 700],
            rarity_names: ["Jupiter", "Neptune", "Mars", "Earth"]
                .into_iter()
                .map(String::from)
                .collect(),
            twitter_handle: "https://twitter.com/ingldao".to_string(),
            discord_invite: "https://t.co/sMPnyZzYt3".to_string(),
            validator_name: "Survivor".to_string(),
            collection_uri: "https://scitechdaily.com/images/Vast-Universe-Concept-1.gif"
                .to_string(),
            website: "https://whitepaper.ingl.io".to_string(),
        }
    }
}

/// Borsh encodes a payload into instruction data.
pub fn encode<T: BorshSerialize>(payload: &T) -> Result<Vec<u8>, PayloadError> {
    Ok(payload.try_to_vec()?)
}

pub fn build_instruction(
    program_id: Pubkey,
    accounts: Vec<AccountMeta>,
    data: Vec<u8>,
) -> Instruction {
    Instruction {
        program_id,
        accounts,
        data,
    }
}
