//! Transaction & receipt assembler (spec §4.3), including the shared
//! `getBlock` retrieval used by both `getBlockByHash` and `getBlockByNumber`.

use ethers_core::types::{Address, Bloom, Bytes, H256, U256, U64};
use futures::future::try_join_all;
use relay_core::{
    hex::to_null_if_empty,
    ports::{ContractResult, MirrorPort, PortError},
    types::{Block, BlockId, BlockTransactions, Log as EthLog, Receipt, Transaction},
    BlockchainError, Result,
};
use std::sync::Arc;

use crate::fees::FeeEngine;

fn parse_hash(s: &str) -> Result<H256> {
    s.parse().map_err(|_| BlockchainError::Mirror(format!("bad hash {s}")))
}

fn parse_address(s: &str) -> Result<Address> {
    s.parse().map_err(|_| BlockchainError::Mirror(format!("bad address {s}")))
}

fn parse_hex_u256(s: &str) -> Result<U256> {
    U256::from_str_radix(relay_core::hex::prune_0x(s), 16)
        .map_err(|_| BlockchainError::Mirror(format!("bad hex number {s}")))
}

fn parse_optional_hex_u256(s: Option<&String>) -> Result<Option<U256>> {
    match to_null_if_empty(s.cloned()) {
        Some(v) => Ok(Some(parse_hex_u256(&v)?)),
        None => Ok(None),
    }
}

/// Projects a mirror contract-result into the Ethereum transaction shape
/// (spec §4.3 "getTransactionByHash").
fn project_transaction(result: &ContractResult) -> Result<Transaction> {
    Ok(Transaction {
        hash: parse_hash(&result.hash)?,
        block_hash: Some(parse_hash(&result.block_hash)?),
        block_number: Some(U64::from(result.block_number)),
        from: parse_address(&result.from)?,
        to: result.to.as_deref().map(parse_address).transpose()?,
        nonce: U256::from(result.nonce),
        value: U256::from(result.amount),
        gas: U256::from(result.gas_limit),
        gas_price: parse_optional_hex_u256(result.gas_price.as_ref())?,
        input: result.function_parameters.parse::<Bytes>().unwrap_or_default(),
        transaction_index: Some(U64::from(result.transaction_index)),
        transaction_type: U64::from(result.transaction_type),
        chain_id: parse_optional_hex_u256(result.chain_id.as_ref())?,
        v: U64::from(result.v),
        r: parse_hex_u256(&relay_core::hex::to_hash32(&result.r)).unwrap_or_default(),
        s: parse_hex_u256(&relay_core::hex::to_hash32(&result.s)).unwrap_or_default(),
        max_fee_per_gas: parse_optional_hex_u256(result.max_fee_per_gas.as_ref())?,
        max_priority_fee_per_gas: parse_optional_hex_u256(result.max_priority_fee_per_gas.as_ref())?,
        access_list: None,
    })
}

pub struct TxAssembler {
    mirror: Arc<dyn MirrorPort>,
    fees: Arc<FeeEngine>,
}

impl TxAssembler {
    pub fn new(mirror: Arc<dyn MirrorPort>, fees: Arc<FeeEngine>) -> Self {
        Self { mirror, fees }
    }

    /// `eth_getTransactionByHash`.
    pub async fn get_transaction_by_hash(&self, hash: H256) -> Result<Option<Transaction>> {
        match self.mirror.get_contract_result(&format!("{hash:#x}")).await {
            Ok(result) if !result.hash.is_empty() => Ok(Some(project_transaction(&result)?)),
            Ok(_) | Err(PortError::NotFound) => Ok(None),
            Err(e) => Err(BlockchainError::Mirror(e.to_string())),
        }
    }

    /// `eth_getTransactionByBlockHashAndIndex` / `...AndIndex` for numbers:
    /// both resolve the block, list its results, and project the one at
    /// `index` via the secondary fee/nonce/signature lookup (spec §4.3).
    pub async fn get_transaction_by_block_and_index(
        &self,
        block: &BlockId,
        index: usize,
    ) -> Result<Option<Transaction>> {
        let block_record = match self.resolve_block_record(block).await? {
            Some(b) => b,
            None => return Ok(None),
        };

        let results = self
            .mirror
            .get_contract_results(
                relay_core::ports::TimestampRangeFilter {
                    gte: Some(block_record.timestamp.from.clone()),
                    lte: Some(block_record.timestamp.to.clone()),
                },
                Some(index as u64),
            )
            .await
            .map_err(|e| BlockchainError::Mirror(e.to_string()))?;

        let candidate = match results.into_iter().next() {
            Some(c) => c,
            None => return Ok(None),
        };

        let to = match &candidate.to {
            Some(to) => to.clone(),
            None => return Ok(None),
        };

        let detail = self
            .mirror
            .get_contract_results_by_address_and_timestamp(&to, &candidate.timestamp)
            .await
            .map_err(|e| BlockchainError::Mirror(e.to_string()))?;

        Ok(Some(project_transaction(&detail)?))
    }

    /// `eth_getTransactionReceipt`.
    pub async fn get_transaction_receipt(&self, hash: H256) -> Result<Option<Receipt>> {
        let result = match self.mirror.get_contract_result(&format!("{hash:#x}")).await {
            Ok(result) => result,
            Err(PortError::NotFound) => return Ok(None),
            Err(e) => return Err(BlockchainError::Mirror(e.to_string())),
        };

        let effective_gas_price = match to_null_if_empty(result.max_fee_per_gas.clone()) {
            Some(fee) => parse_hex_u256(&fee)?,
            None => match &result.gas_price {
                Some(fee) => parse_hex_u256(fee)?,
                None => U256::zero(),
            },
        } * U256::from(relay_core::constants::TINYBAR_TO_WEIBAR);

        let contract_address = result
            .created_contract_ids
            .first()
            .map(|id| contract_id_to_address(id));

        let block_hash = parse_hash(&result.block_hash)?;
        let block_number = U64::from(result.block_number);
        let transaction_hash = parse_hash(&result.hash)?;
        let transaction_index = U64::from(result.transaction_index);

        let logs = result
            .logs
            .iter()
            .map(|log| -> Result<EthLog> {
                Ok(EthLog {
                    address: parse_address(&log.address)?,
                    block_hash,
                    block_number,
                    data: log.data.parse().map_err(|_| BlockchainError::Mirror("bad log data".into()))?,
                    log_index: U64::from(log.index),
                    removed: false,
                    topics: log
                        .topics
                        .iter()
                        .map(|t| parse_hash(t))
                        .collect::<Result<Vec<_>>>()?,
                    transaction_hash,
                    transaction_index,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Receipt {
            block_hash,
            block_number,
            from: parse_address(&result.from)?,
            to: result.to.as_deref().map(parse_address).transpose()?,
            cumulative_gas_used: U256::from(result.block_gas_used),
            gas_used: U256::from(result.gas_used),
            contract_address,
            logs,
            logs_bloom: parse_bloom(&result.bloom)?,
            transaction_hash,
            transaction_index,
            effective_gas_price,
            root: to_null_if_empty(result.root.clone()).map(|r| parse_hash(&r)).transpose()?,
            status: U64::from(if result.status == "0x1" || result.status == "1" { 1 } else { 0 }),
        }))
    }

    /// Shared `getBlock` retrieval (spec §4.3 "getBlock").
    pub async fn get_block(&self, selector: &BlockId, full: bool) -> Result<Option<Block>> {
        let block_record = match self.resolve_block_record(selector).await? {
            Some(b) => b,
            None => return Ok(None),
        };

        let results = self
            .mirror
            .get_contract_results(
                relay_core::ports::TimestampRangeFilter {
                    gte: Some(block_record.timestamp.from.clone()),
                    lte: Some(block_record.timestamp.to.clone()),
                },
                None,
            )
            .await
            .map_err(|e| BlockchainError::Mirror(e.to_string()))?;

        let gas_used: u64 = results.iter().map(|r| r.gas_used).sum();
        let gas_limit = results.iter().map(|r| r.gas_limit).max().unwrap_or(0);
        let timestamp = results
            .first()
            .map(|r| truncate_timestamp_seconds(&r.timestamp))
            .unwrap_or(0);

        let with_target = results.into_iter().filter(|r| r.to.is_some()).collect::<Vec<_>>();

        let transactions = if full {
            let fetches = with_target.iter().map(|r| {
                let mirror = self.mirror.clone();
                let to = r.to.clone().expect("filtered above");
                let timestamp = r.timestamp.clone();
                async move {
                    mirror
                        .get_contract_results_by_address_and_timestamp(&to, &timestamp)
                        .await
                }
            });
            let details = try_join_all(fetches)
                .await
                .map_err(|e| BlockchainError::Mirror(e.to_string()))?;
            let txs = details.iter().map(project_transaction).collect::<Result<Vec<_>>>()?;
            BlockTransactions::Full(txs)
        } else {
            let hashes = with_target
                .iter()
                .map(|r| parse_hash(&r.hash))
                .collect::<Result<Vec<_>>>()?;
            BlockTransactions::Hashes(hashes)
        };

        let base_fee_per_gas = self.fees.gas_price(None).await.ok();

        Ok(Some(Block::new(
            parse_hash(&block_record.hash)?,
            parse_hash(&block_record.previous_hash)?,
            block_record.number,
            timestamp,
            U256::from(gas_limit),
            U256::from(gas_used),
            base_fee_per_gas,
            transactions,
            Address::zero(),
            parse_bloom(&block_record.logs_bloom)?,
        )))
    }

    async fn resolve_block_record(
        &self,
        selector: &BlockId,
    ) -> Result<Option<relay_core::ports::MirrorBlock>> {
        let lookup = match selector {
            BlockId::Latest | BlockId::Pending => self.mirror.get_latest_block().await,
            BlockId::Earliest => self.mirror.get_block("0").await,
            BlockId::Number(n) => self.mirror.get_block(&n.to_string()).await,
            BlockId::Hash(h) => self.mirror.get_block(&format!("{h:#x}")).await,
        };
        match lookup {
            Ok(block) => Ok(Some(block)),
            Err(PortError::NotFound) => Ok(None),
            Err(e) => Err(BlockchainError::Mirror(e.to_string())),
        }
    }
}

/// The whole-seconds portion of a `seconds.nanoseconds` consensus
/// timestamp (spec §9 "Block timestamp truncation" — preserved quirk: it
/// is the *first transaction's* timestamp, not the block's own).
fn truncate_timestamp_seconds(timestamp: &str) -> u64 {
    timestamp.split('.').next().unwrap_or("0").parse().unwrap_or(0)
}

/// Converts a `shard.realm.num`-style contract id into a 20-byte EVM
/// address by big-endian-encoding the low 8 bytes of `num` (and non-zero
/// shard/realm into the remaining bytes, matching the ledger's own
/// canonical long-zero-address encoding).
fn contract_id_to_address(id: &str) -> Address {
    let parts: Vec<u64> = id.split('.').filter_map(|p| p.parse().ok()).collect();
    let (shard, realm, num) = match parts.as_slice() {
        [shard, realm, num] => (*shard, *realm, *num),
        [num] => (0, 0, *num),
        _ => (0, 0, 0),
    };
    let mut bytes = [0u8; 20];
    bytes[0..4].copy_from_slice(&(shard as u32).to_be_bytes());
    bytes[4..12].copy_from_slice(&(realm as u64).to_be_bytes());
    bytes[12..20].copy_from_slice(&(num as u64).to_be_bytes());
    Address::from(bytes)
}

fn parse_bloom(s: &str) -> Result<Bloom> {
    if s.is_empty() || s == "0x" {
        return Ok(Bloom::zero());
    }
    s.parse().map_err(|_| BlockchainError::Mirror(format!("bad bloom {s}")))
}
