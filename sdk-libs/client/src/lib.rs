pub mod config;
pub mod constants;
pub mod instruction;
pub mod lookup_table;
pub mod pda;
pub mod price_feed;
pub mod rpc;
pub mod service;
pub mod transaction;
pub mod wallet;
