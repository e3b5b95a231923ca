//! In-memory port fakes for unit and scenario tests. Not part of the
//! public API surface used in production; gated behind `test-support` so
//! `tests/` binaries can depend on it without a shared-kernel workaround.

use async_trait::async_trait;
use ethers_core::types::{Address, Bytes, U256};
use parking_lot::Mutex;
use relay_core::ports::{
    AccountInfo, BlockFilter, ConsensusPort, ContractLog, ContractRecord, ContractResult,
    ExecutionRecord, LogsParams, MirrorBlock, MirrorPort, NetworkFee, Order,
    PortError, PortResult, Precheck, ResolvedEntity, SubmissionHandle, TimestampRange,
};
use relay_core::EthError;
use std::collections::HashMap;

#[derive(Default)]
pub struct FakeMirror {
    pub blocks_by_number: Mutex<HashMap<u64, MirrorBlock>>,
    pub blocks_by_hash: Mutex<HashMap<String, MirrorBlock>>,
    pub latest: Mutex<Option<MirrorBlock>>,
    pub contract_results: Mutex<Vec<ContractResult>>,
    pub contract_result_by_hash: Mutex<HashMap<String, ContractResult>>,
    pub network_fees: Mutex<Option<Vec<NetworkFee>>>,
    pub contracts: Mutex<HashMap<String, ContractRecord>>,
    pub entities: Mutex<HashMap<String, ResolvedEntity>>,
    pub logs: Mutex<Vec<ContractLog>>,
}

impl FakeMirror {
    pub fn with_latest(number: u64) -> Self {
        let mirror = Self::default();
        let block = MirrorBlock {
            number,
            hash: format!("0x{:064x}", number),
            previous_hash: format!("0x{:064x}", number.saturating_sub(1)),
            timestamp: TimestampRange { from: format!("{number}.0"), to: format!("{number}.1") },
            size: Some(0),
            gas_used: 0,
            logs_bloom: relay_core::constants::EMPTY_BLOOM_HEX.to_string(),
        };
        mirror.latest.lock().replace(block.clone());
        mirror.blocks_by_number.lock().insert(number, block.clone());
        mirror.blocks_by_hash.lock().insert(block.hash.clone(), block);
        mirror
    }
}

#[async_trait]
impl MirrorPort for FakeMirror {
    async fn get_latest_block(&self) -> PortResult<MirrorBlock> {
        self.latest.lock().clone().ok_or(PortError::NotFound)
    }

    async fn get_block(&self, hash_or_number: &str) -> PortResult<MirrorBlock> {
        if let Some(block) = self.blocks_by_hash.lock().get(hash_or_number) {
            return Ok(block.clone());
        }
        if let Ok(n) = hash_or_number.parse::<u64>() {
            if let Some(block) = self.blocks_by_number.lock().get(&n) {
                return Ok(block.clone());
            }
        }
        Err(PortError::NotFound)
    }

    async fn get_blocks(&self, _filter: BlockFilter, _order: Order) -> PortResult<Vec<MirrorBlock>> {
        Ok(self.blocks_by_number.lock().values().cloned().collect())
    }

    async fn get_contract_results(
        &self,
        _timestamp: relay_core::ports::TimestampRangeFilter,
        _transaction_index: Option<u64>,
    ) -> PortResult<Vec<ContractResult>> {
        Ok(self.contract_results.lock().clone())
    }

    async fn get_contract_result(&self, hash: &str) -> PortResult<ContractResult> {
        self.contract_result_by_hash.lock().get(hash).cloned().ok_or(PortError::NotFound)
    }

    async fn get_contract_results_by_address_and_timestamp(
        &self,
        _to: &str,
        _timestamp: &str,
    ) -> PortResult<ContractResult> {
        self.contract_results.lock().first().cloned().ok_or(PortError::NotFound)
    }

    async fn get_contract_results_logs(&self, _params: LogsParams) -> PortResult<Vec<ContractLog>> {
        Ok(self.logs.lock().clone())
    }

    async fn get_contract_results_logs_by_address(
        &self,
        _address: &str,
        _params: LogsParams,
    ) -> PortResult<Vec<ContractLog>> {
        Ok(self.logs.lock().clone())
    }

    async fn get_contract_results_details(
        &self,
        _contract_id: &str,
        _timestamp: &str,
    ) -> PortResult<ContractResult> {
        self.contract_results.lock().first().cloned().ok_or(PortError::NotFound)
    }

    async fn get_network_fees(&self, _timestamp: Option<&str>) -> PortResult<Vec<NetworkFee>> {
        self.network_fees.lock().clone().ok_or(PortError::NotFound)
    }

    async fn get_contract(&self, address: &str) -> PortResult<ContractRecord> {
        self.contracts.lock().get(address).cloned().ok_or(PortError::NotFound)
    }

    async fn resolve_entity_type(&self, id_or_address: &str) -> PortResult<ResolvedEntity> {
        self.entities.lock().get(id_or_address).cloned().ok_or(PortError::NotFound)
    }
}

#[derive(Default)]
pub struct FakeConsensus {
    pub tiny_bar_gas_fee: Mutex<Option<u64>>,
    pub account_balances: Mutex<HashMap<String, U256>>,
    pub contract_balances: Mutex<HashMap<String, U256>>,
    pub account_infos: Mutex<HashMap<String, AccountInfo>>,
    pub invalid_account_ids: Mutex<Vec<String>>,
    pub invalid_contract_ids: Mutex<Vec<String>>,
    pub submission_result: Mutex<Option<PortResult<SubmissionHandle>>>,
    pub execution_record: Mutex<Option<PortResult<ExecutionRecord>>>,
    pub call_result: Mutex<Option<Bytes>>,
    pub byte_code: Mutex<Option<Bytes>>,
}

#[async_trait]
impl ConsensusPort for FakeConsensus {
    async fn get_tiny_bar_gas_fee(&self, _caller_name: &str) -> PortResult<u64> {
        self.tiny_bar_gas_fee.lock().ok_or(PortError::NotFound)
    }

    async fn get_account_balance_in_weibar(
        &self,
        account_id: &str,
        _caller_name: &str,
    ) -> PortResult<U256> {
        if self.invalid_account_ids.lock().contains(&account_id.to_string()) {
            return Err(PortError::InvalidAccountId);
        }
        self.account_balances.lock().get(account_id).copied().ok_or(PortError::NotFound)
    }

    async fn get_contract_balance_in_weibar(
        &self,
        contract_id: &str,
        _caller_name: &str,
    ) -> PortResult<U256> {
        if self.invalid_contract_ids.lock().contains(&contract_id.to_string()) {
            return Err(PortError::InvalidContractId);
        }
        self.contract_balances.lock().get(contract_id).copied().ok_or(PortError::NotFound)
    }

    async fn get_contract_byte_code(
        &self,
        _shard: u64,
        _realm: u64,
        _address: Address,
        _caller_name: &str,
    ) -> PortResult<Bytes> {
        self.byte_code.lock().clone().ok_or(PortError::NotFound)
    }

    async fn get_account_info(&self, account_id: &str, _caller_name: &str) -> PortResult<AccountInfo> {
        self.account_infos.lock().get(account_id).cloned().ok_or(PortError::NotFound)
    }

    async fn submit_ethereum_transaction(
        &self,
        _bytes: Bytes,
        _caller_name: &str,
    ) -> PortResult<SubmissionHandle> {
        self.submission_result.lock().clone().unwrap_or(Err(PortError::NotFound))
    }

    async fn execute_get_transaction_record(
        &self,
        _handle: &SubmissionHandle,
        _tx_name: &str,
        _caller_name: &str,
    ) -> PortResult<ExecutionRecord> {
        self.execution_record.lock().clone().unwrap_or(Err(PortError::NotFound))
    }

    async fn submit_contract_call_query(
        &self,
        _to: Address,
        _data: Bytes,
        _gas: u64,
        _from: Option<Address>,
        _caller_name: &str,
    ) -> PortResult<Bytes> {
        self.call_result.lock().clone().ok_or(PortError::NotFound)
    }
}

#[derive(Default)]
pub struct FakePrecheck {
    pub rejection: Mutex<Option<EthError>>,
}

#[async_trait]
impl Precheck for FakePrecheck {
    async fn send_raw_transaction_check(
        &self,
        _raw_tx_hex: &str,
        _gas_price: U256,
        _request_id: Option<&str>,
    ) -> Result<(), EthError> {
        match self.rejection.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
