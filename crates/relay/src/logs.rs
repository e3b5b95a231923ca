//! Log query planner (spec §4.4).

use ethers_core::types::{H256, U64};
use futures::future::try_join_all;
use relay_core::{
    ports::{LogsParams, MirrorPort, Order, TimestampRangeFilter},
    types::Log as EthLog,
    BlockchainError, Result,
};
use std::{collections::HashMap, sync::Arc};

#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub block_hash: Option<H256>,
    pub from_block: Option<u64>,
    pub to_block: Option<u64>,
    pub address: Option<String>,
    pub topics: [Option<String>; 4],
}

/// `eth_getLogs`. Returns `[]` wherever the spec calls for "not found"
/// rather than an error (block-hash miss, detail-fetch miss).
pub async fn get_logs(mirror: &Arc<dyn MirrorPort>, filter: LogFilter) -> Result<Vec<EthLog>> {
    let timestamp = match resolve_timestamp_window(mirror, &filter).await? {
        Some(window) => window,
        None => return Ok(Vec::new()),
    };

    let params = LogsParams { timestamp, topics: filter.topics.clone() };

    let raw_logs = if let Some(address) = &filter.address {
        mirror
            .get_contract_results_logs_by_address(address, params)
            .await
            .map_err(|e| BlockchainError::Mirror(e.to_string()))?
    } else {
        mirror
            .get_contract_results_logs(params)
            .await
            .map_err(|e| BlockchainError::Mirror(e.to_string()))?
    };

    if raw_logs.is_empty() {
        return Ok(Vec::new());
    }

    // Dedup by (contract_id, timestamp): the same timestamp can appear on
    // several logs and must share exactly one detail fetch (spec §4.4.4).
    let mut seen = HashMap::new();
    for log in &raw_logs {
        seen.entry((log.contract_id.clone(), log.timestamp.clone())).or_insert(());
    }

    let fetches = seen.into_keys().map(|(contract_id, timestamp)| {
        let mirror = mirror.clone();
        async move {
            mirror
                .get_contract_results_details(&contract_id, &timestamp)
                .await
                .map(|detail| ((contract_id, timestamp), detail))
        }
    });

    let details = match try_join_all(fetches).await {
        Ok(details) => details,
        Err(e) if e == relay_core::ports::PortError::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(BlockchainError::Mirror(e.to_string())),
    };
    let details: HashMap<_, _> = details.into_iter().collect();

    let mut result = Vec::with_capacity(raw_logs.len());
    for (index, raw) in raw_logs.into_iter().enumerate() {
        let detail = details
            .get(&(raw.contract_id.clone(), raw.timestamp.clone()))
            .ok_or_else(|| BlockchainError::Mirror("missing detail for log".to_string()))?;

        result.push(EthLog {
            address: raw.address.parse().map_err(|_| BlockchainError::Mirror("bad address".into()))?,
            block_hash: detail.block_hash.parse().map_err(|_| BlockchainError::Mirror("bad block hash".into()))?,
            block_number: U64::from(detail.block_number),
            data: raw.data.parse().map_err(|_| BlockchainError::Mirror("bad log data".into()))?,
            // Ethereum convention assigns logIndex sequentially within a
            // block; this planner assigns the array position (spec §4.4.5).
            log_index: U64::from(index as u64),
            removed: false,
            topics: raw
                .topics
                .iter()
                .map(|t| t.parse())
                .collect::<std::result::Result<Vec<H256>, _>>()
                .map_err(|_| BlockchainError::Mirror("bad topic".into()))?,
            transaction_hash: detail.hash.parse().map_err(|_| BlockchainError::Mirror("bad tx hash".into()))?,
            transaction_index: U64::from(detail.transaction_index),
        });
    }

    Ok(result)
}

async fn resolve_timestamp_window(
    mirror: &Arc<dyn MirrorPort>,
    filter: &LogFilter,
) -> Result<Option<TimestampRangeFilter>> {
    if let Some(hash) = filter.block_hash {
        return match mirror.get_block(&format!("{hash:#x}")).await {
            Ok(block) => {
                Ok(Some(TimestampRangeFilter { gte: Some(block.timestamp.from), lte: Some(block.timestamp.to) }))
            }
            Err(_) => Ok(None),
        };
    }

    if filter.from_block.is_none() && filter.to_block.is_none() {
        return Ok(Some(TimestampRangeFilter::default()));
    }

    let order = if filter.to_block.is_some() { Order::Desc } else { Order::Asc };
    let blocks = mirror
        .get_blocks(
            relay_core::ports::BlockFilter { lte: filter.to_block, gte: filter.from_block },
            order,
        )
        .await
        .map_err(|e| BlockchainError::Mirror(e.to_string()))?;

    if blocks.is_empty() {
        return Ok(None);
    }

    let earliest = blocks.iter().min_by_key(|b| b.number).expect("non-empty");
    let latest = blocks.iter().max_by_key(|b| b.number).expect("non-empty");
    Ok(Some(TimestampRangeFilter {
        gte: Some(earliest.timestamp.from.clone()),
        lte: Some(latest.timestamp.to.clone()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeMirror;

    #[tokio::test]
    async fn block_hash_not_found_returns_empty() {
        let mirror: Arc<dyn MirrorPort> = Arc::new(FakeMirror::with_latest(5));
        let filter = LogFilter { block_hash: Some(H256::repeat_byte(0xee)), ..Default::default() };
        let logs = get_logs(&mirror, filter).await.unwrap();
        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn no_logs_returns_empty_without_detail_fetch() {
        let mirror: Arc<dyn MirrorPort> = Arc::new(FakeMirror::with_latest(5));
        let logs = get_logs(&mirror, LogFilter::default()).await.unwrap();
        assert!(logs.is_empty());
    }
}
