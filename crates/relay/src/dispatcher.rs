//! `eth_*` method requests (spec §4.1, §4.9) and the constant-response
//! table for methods with no backend-dependent behavior.

use ethers_core::types::{Address, H256};
use relay_core::types::{BlockId, CallRequest};
use serde_json::Value;

use crate::logs::LogFilter;

/// One variant per supported `eth_*` method. Built by the transport from
/// parsed JSON-RPC params; this core never touches request framing.
#[derive(Debug, Clone)]
pub enum EthRequest {
    ChainId,
    BlockNumber,
    GasPrice,
    GetBalance { address: String, block: BlockId },
    GetCode { address: Address, block: BlockId },
    GetTransactionCount { address: String, block: BlockId },
    GetBlockByHash { hash: H256, full: bool },
    GetBlockByNumber { block: BlockId, full: bool },
    GetTransactionByHash { hash: H256 },
    GetTransactionByBlockHashAndIndex { hash: H256, index: usize },
    GetTransactionByBlockNumberAndIndex { block: BlockId, index: usize },
    GetTransactionReceipt { hash: H256 },
    GetLogs { filter: LogFilter },
    Call { request: CallRequest, block: BlockId },
    EstimateGas { request: CallRequest },
    FeeHistory { block_count: i64, newest_block: BlockId, reward_percentiles: Option<Vec<f64>> },
    SendRawTransaction { raw_tx_hex: String },
    /// Any method in §4.9's constant table.
    Constant(ConstantMethod),
    /// Any method in §4.1's deliberately-unimplemented list.
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantMethod {
    Accounts,
    Mining,
    Syncing,
    SubmitWork,
    Hashrate,
    GetUncleByBlockHashAndIndex,
    GetUncleByBlockNumberAndIndex,
    GetUncleCountByBlockHash,
    GetUncleCountByBlockNumber,
}

impl ConstantMethod {
    /// The fixed response for this method (spec §4.9).
    pub fn response(self) -> Value {
        match self {
            ConstantMethod::Accounts => Value::Array(Vec::new()),
            ConstantMethod::Mining => Value::Bool(false),
            ConstantMethod::Syncing => Value::Bool(false),
            ConstantMethod::SubmitWork => Value::Bool(false),
            ConstantMethod::Hashrate => Value::String(relay_core::constants::ZERO_HEX.to_string()),
            ConstantMethod::GetUncleByBlockHashAndIndex
            | ConstantMethod::GetUncleByBlockNumberAndIndex => Value::Null,
            ConstantMethod::GetUncleCountByBlockHash
            | ConstantMethod::GetUncleCountByBlockNumber => {
                Value::String(relay_core::constants::ZERO_HEX.to_string())
            }
        }
    }
}

/// Methods deliberately left unimplemented (spec §4.1); kept only for
/// documentation at the call site that constructs `EthRequest::Unsupported`.
pub const UNSUPPORTED_METHODS: &[&str] = &[
    "eth_getStorageAt",
    "eth_sign",
    "eth_signTransaction",
    "eth_sendTransaction",
    "eth_submitHashrate",
    "eth_getWork",
    "eth_protocolVersion",
    "eth_coinbase",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_responses_match_table() {
        assert_eq!(ConstantMethod::Accounts.response(), Value::Array(Vec::new()));
        assert_eq!(ConstantMethod::Mining.response(), Value::Bool(false));
        assert_eq!(ConstantMethod::Hashrate.response(), Value::String("0x0".to_string()));
        assert_eq!(ConstantMethod::GetUncleByBlockHashAndIndex.response(), Value::Null);
    }
}
