//! Ethereum transaction shape (spec §3).

use ethers_core::types::{Address, Bytes, H256, U256, U64};
use serde::Serialize;

/// An Ethereum transaction, as assembled from one or more mirror/consensus
/// records (spec §4.3). String fields are truncated to canonical widths
/// by construction (hashes via `H256`, addresses via `Address`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: H256,
    pub block_hash: Option<H256>,
    pub block_number: Option<U64>,
    pub from: Address,
    pub to: Option<Address>,
    pub nonce: U256,
    pub value: U256,
    pub gas: U256,
    pub gas_price: Option<U256>,
    pub input: Bytes,
    pub transaction_index: Option<U64>,
    #[serde(rename = "type")]
    pub transaction_type: U64,
    pub chain_id: Option<U256>,
    pub v: U64,
    pub r: U256,
    pub s: U256,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,
    /// Always absent: this ledger has no EIP-2930 access list concept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_list: Option<Vec<()>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_list_is_omitted_when_absent() {
        let tx = Transaction {
            hash: H256::zero(),
            block_hash: None,
            block_number: None,
            from: Address::zero(),
            to: None,
            nonce: U256::zero(),
            value: U256::zero(),
            gas: U256::zero(),
            gas_price: None,
            input: Bytes::default(),
            transaction_index: None,
            transaction_type: U64::zero(),
            chain_id: None,
            v: U64::zero(),
            r: U256::zero(),
            s: U256::zero(),
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            access_list: None,
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert!(json.get("accessList").is_none());
    }
}
