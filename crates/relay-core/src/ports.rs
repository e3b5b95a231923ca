//! External collaborators this core composes against (spec §6). Neither
//! port is implemented here: HTTP/REST framing for the mirror indexer and
//! signing/transport for the consensus client are out of scope (spec §1).
//! These traits exist so the engine crate can be built and tested against
//! fakes before a real backend is wired in.

use async_trait::async_trait;
use ethers_core::types::{Address, Bytes};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type PortResult<T> = std::result::Result<T, PortError>;

/// Everything a port call can fail with, collapsed to the handful of
/// shapes handlers actually branch on (spec §7 "Backend invalid-id").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    NotFound,
    InvalidAccountId,
    InvalidContractId,
    Other(String),
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PortError::NotFound => write!(f, "not found"),
            PortError::InvalidAccountId => write!(f, "invalid account id"),
            PortError::InvalidContractId => write!(f, "invalid contract id"),
            PortError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PortError {}

/// A consensus-formatted `seconds.nanoseconds` timestamp range, as returned
/// on every mirror block/result record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorBlock {
    pub number: u64,
    pub hash: String,
    pub previous_hash: String,
    pub timestamp: TimestampRange,
    pub size: Option<u64>,
    pub gas_used: u64,
    pub logs_bloom: String,
}

/// Sort order for a paginated blocks/results query (spec §4.4 step 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockFilter {
    pub lte: Option<u64>,
    pub gte: Option<u64>,
}

/// `getContractResult` / `getContractResultsByAddressAndTimestamp` record
/// (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractResult {
    pub hash: String,
    pub block_hash: String,
    pub block_number: u64,
    pub from: String,
    pub to: Option<String>,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub gas_price: Option<String>,
    pub max_fee_per_gas: Option<String>,
    pub max_priority_fee_per_gas: Option<String>,
    pub chain_id: Option<String>,
    pub nonce: u64,
    pub r: String,
    pub s: String,
    pub v: u64,
    #[serde(rename = "type")]
    pub transaction_type: u64,
    pub amount: u64,
    pub function_parameters: String,
    pub bloom: String,
    pub logs: Vec<ContractLog>,
    pub created_contract_ids: Vec<String>,
    pub block_gas_used: u64,
    pub root: Option<String>,
    pub status: String,
    pub transaction_index: u64,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractLog {
    pub address: String,
    pub data: String,
    pub index: u64,
    pub topics: Vec<String>,
    pub timestamp: String,
    pub contract_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkFee {
    pub gas: u64,
    pub transaction_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub runtime_bytecode: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Account,
    Contract,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntity {
    pub entity_type: EntityType,
    pub entity_id: String,
}

/// Positional log filter params (spec §4.4 step 2): `topic0..topic3`, plus
/// the resolved timestamp window and optional contract address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogsParams {
    pub timestamp: TimestampRangeFilter,
    pub topics: [Option<String>; 4],
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampRangeFilter {
    pub gte: Option<String>,
    pub lte: Option<String>,
}

/// Read-only REST indexer over the ledger (spec §6 "MirrorPort").
#[async_trait]
pub trait MirrorPort: Send + Sync {
    async fn get_latest_block(&self) -> PortResult<MirrorBlock>;

    /// `hash_or_number` is either a 0x-prefixed 32-byte hash or a decimal
    /// block number rendered as a string.
    async fn get_block(&self, hash_or_number: &str) -> PortResult<MirrorBlock>;

    async fn get_blocks(&self, filter: BlockFilter, order: Order) -> PortResult<Vec<MirrorBlock>>;

    async fn get_contract_results(
        &self,
        timestamp: TimestampRangeFilter,
        transaction_index: Option<u64>,
    ) -> PortResult<Vec<ContractResult>>;

    async fn get_contract_result(&self, hash: &str) -> PortResult<ContractResult>;

    async fn get_contract_results_by_address_and_timestamp(
        &self,
        to: &str,
        timestamp: &str,
    ) -> PortResult<ContractResult>;

    async fn get_contract_results_logs(&self, params: LogsParams) -> PortResult<Vec<ContractLog>>;

    async fn get_contract_results_logs_by_address(
        &self,
        address: &str,
        params: LogsParams,
    ) -> PortResult<Vec<ContractLog>>;

    async fn get_contract_results_details(
        &self,
        contract_id: &str,
        timestamp: &str,
    ) -> PortResult<ContractResult>;

    async fn get_network_fees(&self, timestamp: Option<&str>) -> PortResult<Vec<NetworkFee>>;

    async fn get_contract(&self, address: &str) -> PortResult<ContractRecord>;

    async fn resolve_entity_type(&self, id_or_address: &str) -> PortResult<ResolvedEntity>;
}

/// The record a successful submission eventually resolves to (spec §4.6
/// step 5): an `ethereumHash` when the consensus node can supply one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRecord {
    pub ethereum_hash: Option<Bytes>,
}

/// A pending submission handle, opaque to this core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionHandle(pub String);

/// Write-capable native-protocol client (spec §6 "ConsensusPort").
#[async_trait]
pub trait ConsensusPort: Send + Sync {
    async fn get_tiny_bar_gas_fee(&self, caller_name: &str) -> PortResult<u64>;

    async fn get_account_balance_in_weibar(
        &self,
        account_id: &str,
        caller_name: &str,
    ) -> PortResult<ethers_core::types::U256>;

    async fn get_contract_balance_in_weibar(
        &self,
        contract_id: &str,
        caller_name: &str,
    ) -> PortResult<ethers_core::types::U256>;

    async fn get_contract_byte_code(
        &self,
        shard: u64,
        realm: u64,
        address: Address,
        caller_name: &str,
    ) -> PortResult<Bytes>;

    async fn get_account_info(&self, account_id: &str, caller_name: &str) -> PortResult<AccountInfo>;

    async fn submit_ethereum_transaction(
        &self,
        bytes: Bytes,
        caller_name: &str,
    ) -> PortResult<SubmissionHandle>;

    async fn execute_get_transaction_record(
        &self,
        handle: &SubmissionHandle,
        tx_name: &str,
        caller_name: &str,
    ) -> PortResult<ExecutionRecord>;

    async fn submit_contract_call_query(
        &self,
        to: Address,
        data: Bytes,
        gas: u64,
        from: Option<Address>,
        caller_name: &str,
    ) -> PortResult<Bytes>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub ethereum_nonce: u64,
}

/// Pre-submission validation external to this core (spec §6 "Precheck").
#[async_trait]
pub trait Precheck: Send + Sync {
    async fn send_raw_transaction_check(
        &self,
        raw_tx_hex: &str,
        gas_price: ethers_core::types::U256,
        request_id: Option<&str>,
    ) -> std::result::Result<(), crate::error::EthError>;
}
