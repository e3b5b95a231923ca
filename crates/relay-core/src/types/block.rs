//! Ethereum-shaped block (spec §3).

use super::transaction::Transaction;
use ethers_core::types::{Address, Bloom, Bytes, H256, H64, U256, U64};
use serde::Serialize;

/// Either a list of transaction hashes or full [`Transaction`] records,
/// controlled by the `showDetails`/"full" flag on `eth_getBlockBy*`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BlockTransactions {
    Hashes(Vec<H256>),
    Full(Vec<Transaction>),
}

impl BlockTransactions {
    pub fn len(&self) -> usize {
        match self {
            BlockTransactions::Hashes(h) => h.len(),
            BlockTransactions::Full(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An Ethereum-shaped block.
///
/// `difficulty`, `mixHash`, `nonce`, `sha3Uncles`, `receiptsRoot`,
/// `stateRoot` and `uncles` are constant-valued: the underlying ledger
/// has no equivalent concept (spec §3).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub hash: H256,
    pub parent_hash: H256,
    pub number: U64,
    pub timestamp: U256,
    pub gas_limit: U256,
    pub gas_used: U256,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<U256>,
    pub transactions: BlockTransactions,
    pub transactions_root: H256,

    pub difficulty: U256,
    pub mix_hash: H256,
    pub nonce: H64,
    pub sha3_uncles: H256,
    pub receipts_root: H256,
    pub state_root: H256,
    pub uncles: Vec<H256>,

    // fields clients commonly expect alongside the above, constant or
    // mirrored from the request context.
    pub miner: Address,
    pub size: U256,
    pub extra_data: Bytes,
    pub logs_bloom: Bloom,
    pub total_difficulty: U256,
}

impl Block {
    /// Builds the block, filling every constant-valued field and
    /// deriving `transactionsRoot` per invariant 5.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hash: H256,
        parent_hash: H256,
        number: u64,
        timestamp: u64,
        gas_limit: U256,
        gas_used: U256,
        base_fee_per_gas: Option<U256>,
        transactions: BlockTransactions,
        miner: Address,
        logs_bloom: Bloom,
    ) -> Self {
        let transactions_root = if transactions.is_empty() {
            crate::constants::EMPTY_TRIE_ROOT.parse().expect("valid constant")
        } else {
            hash
        };

        Block {
            hash,
            parent_hash,
            number: number.into(),
            timestamp: timestamp.into(),
            gas_limit,
            gas_used,
            base_fee_per_gas,
            transactions,
            transactions_root,
            difficulty: U256::zero(),
            mix_hash: H256::zero(),
            nonce: H64::zero(),
            sha3_uncles: crate::constants::EMPTY_ARRAY_KECCAK.parse().expect("valid constant"),
            receipts_root: H256::zero(),
            state_root: H256::zero(),
            uncles: Vec::new(),
            miner,
            size: U256::zero(),
            extra_data: Bytes::default(),
            logs_bloom,
            total_difficulty: U256::zero(),
        }
    }
}
