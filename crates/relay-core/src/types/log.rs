//! Ethereum log shape (spec §3).

use ethers_core::types::{Address, Bytes, H256, U64};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub address: Address,
    pub block_hash: H256,
    pub block_number: U64,
    pub data: Bytes,
    pub log_index: U64,
    /// Always false: this ledger has no concept of a reorg-removed log.
    pub removed: bool,
    pub topics: Vec<H256>,
    pub transaction_hash: H256,
    pub transaction_index: U64,
}
