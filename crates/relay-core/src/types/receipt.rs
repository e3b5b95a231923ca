//! Transaction receipt shape (spec §3, §4.3).

use super::log::Log;
use ethers_core::types::{Address, Bloom, H256, U256, U64};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub block_hash: H256,
    pub block_number: U64,
    pub from: Address,
    pub to: Option<Address>,
    pub cumulative_gas_used: U256,
    pub gas_used: U256,
    /// Present only when a contract was created in this transaction
    /// (spec §3: derived from the first `created_contract_ids` entry).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
    pub logs: Vec<Log>,
    pub logs_bloom: Bloom,
    pub transaction_hash: H256,
    pub transaction_index: U64,
    /// `max_fee_per_gas` if set and non-empty, else `gas_price`,
    /// converted tinybar -> weibar (spec §4.3).
    pub effective_gas_price: U256,
    pub root: Option<H256>,
    pub status: U64,
}
