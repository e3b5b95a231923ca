//! Fee / gas-price engine (spec §4.5).

use crate::cache::Cache;
use ethers_core::types::U256;
use relay_core::{
    constants::{
        CONSTANT_GAS_USED_RATIO, DEFAULT_FEE_HISTORY_MAX_BLOCK_COUNT, FEE_CACHE_TTL_MS,
        TINYBAR_TO_WEIBAR,
    },
    ports::{ConsensusPort, MirrorPort},
    types::{BlockId, FeeHistory},
    BlockchainError, EthError, EthOutcome, Result,
};
use std::sync::Arc;
use tracing::{debug, trace};

const CACHE_KEY_GAS_PRICE: &str = "gasPrice";
const CACHE_KEY_FEE_HISTORY: &str = "feeHistory";

pub struct FeeEngine {
    mirror: Arc<dyn MirrorPort>,
    consensus: Arc<dyn ConsensusPort>,
    cache: Cache,
    fee_history_max_block_count: u64,
}

impl FeeEngine {
    pub fn new(mirror: Arc<dyn MirrorPort>, consensus: Arc<dyn ConsensusPort>, cache: Cache) -> Self {
        Self { mirror, consensus, cache, fee_history_max_block_count: DEFAULT_FEE_HISTORY_MAX_BLOCK_COUNT }
    }

    pub fn with_fee_history_max_block_count(mut self, max: u64) -> Self {
        self.fee_history_max_block_count = max;
        self
    }

    /// `eth_gasPrice` (spec §4.5 "gasPrice").
    pub async fn gas_price(&self, request_id: Option<&str>) -> Result<U256> {
        if let Some(cached) = self.cache.get(CACHE_KEY_GAS_PRICE) {
            if let Some(n) = cached.as_str().and_then(|s| U256::from_str_radix(s, 16).ok()) {
                trace!(request_id, "gasPrice cache hit");
                return Ok(n);
            }
        }
        let fee = self.get_fee_weibars("eth_gasPrice", None).await?;
        self.cache.set(CACHE_KEY_GAS_PRICE, serde_json::json!(format!("{fee:x}")), FEE_CACHE_TTL_MS);
        Ok(fee)
    }

    /// The critical fee primitive (spec §4.5 "getFeeWeibars"): queries the
    /// mirror's network-fees endpoint, falling back to the consensus
    /// node's synthetic single-fee list when the mirror has nothing.
    pub async fn get_fee_weibars(&self, caller_name: &str, timestamp: Option<&str>) -> Result<U256> {
        let fees = match self.mirror.get_network_fees(timestamp).await {
            Ok(fees) if !fees.is_empty() => fees,
            _ => {
                let tinybars = self
                    .consensus
                    .get_tiny_bar_gas_fee(caller_name)
                    .await
                    .map_err(|e| BlockchainError::Consensus(e.to_string()))?;
                vec![relay_core::ports::NetworkFee {
                    gas: tinybars,
                    transaction_type: "EthereumTransaction".to_string(),
                }]
            }
        };
        let entry = fees
            .into_iter()
            .find(|f| f.transaction_type == "EthereumTransaction")
            .ok_or_else(|| BlockchainError::Mirror("no EthereumTransaction fee entry".to_string()))?;
        Ok(U256::from(entry.gas) * U256::from(TINYBAR_TO_WEIBAR))
    }

    /// `eth_feeHistory` (spec §4.5 "feeHistory").
    pub async fn fee_history(
        &self,
        block_count: i64,
        newest_block: &BlockId,
        reward_percentiles: Option<&[f64]>,
        request_id: Option<&str>,
    ) -> Result<EthOutcome<FeeHistory>> {
        let latest = crate::block_tag::resolve_block_number(&self.mirror, &BlockId::Latest).await?;
        let newest = crate::block_tag::resolve_block_number(&self.mirror, newest_block).await?;

        if newest > latest {
            debug!(request_id, newest, latest, "feeHistory requested beyond head");
            return Ok(EthOutcome::error(EthError::request_beyond_head_block(newest, latest)));
        }

        let block_count = block_count.clamp(0, self.fee_history_max_block_count as i64) as u64;
        if block_count == 0 {
            return Ok(EthOutcome::success(FeeHistory::zero_count()));
        }

        if let Some(cached) = self.cache.get(CACHE_KEY_FEE_HISTORY) {
            if let Ok(history) = serde_json::from_value::<CachedFeeHistory>(cached) {
                return Ok(EthOutcome::success(history.into()));
            }
        }

        match self.compute_fee_history(block_count, newest, latest, reward_percentiles).await {
            Ok(history) => {
                let cached = CachedFeeHistory::from(&history);
                self.cache.set(
                    CACHE_KEY_FEE_HISTORY,
                    serde_json::to_value(cached).expect("serializable"),
                    FEE_CACHE_TTL_MS,
                );
                Ok(EthOutcome::success(history))
            }
            Err(_) => Ok(EthOutcome::success(FeeHistory::empty())),
        }
    }

    async fn compute_fee_history(
        &self,
        block_count: u64,
        newest: u64,
        latest: u64,
        reward_percentiles: Option<&[f64]>,
    ) -> Result<FeeHistory> {
        let oldest = newest.saturating_sub(block_count - 1);

        let mut base_fee_per_gas = Vec::with_capacity((block_count + 1) as usize);
        let mut gas_used_ratio = Vec::with_capacity(block_count as usize);

        // Sequential by contract (spec §5): output order must match block
        // order and a mid-range failure must substitute 0x0 in place.
        for number in oldest..=newest {
            let fee = self.fee_for_block(number).await.unwrap_or(U256::zero());
            base_fee_per_gas.push(fee);
            gas_used_ratio.push(CONSTANT_GAS_USED_RATIO);
        }

        let forward_fee = if latest > newest {
            self.fee_for_block(newest + 1).await.unwrap_or(U256::zero())
        } else {
            *base_fee_per_gas.last().expect("block_count > 0")
        };
        base_fee_per_gas.push(forward_fee);

        let reward = reward_percentiles.filter(|p| !p.is_empty()).map(|percentiles| {
            vec![vec![U256::zero(); percentiles.len()]; block_count as usize]
        });

        Ok(FeeHistory {
            oldest_block: U256::from(oldest),
            base_fee_per_gas: Some(base_fee_per_gas),
            gas_used_ratio: Some(gas_used_ratio),
            reward,
        })
    }

    async fn fee_for_block(&self, number: u64) -> Result<U256> {
        let block = self
            .mirror
            .get_block(&number.to_string())
            .await
            .map_err(|e| BlockchainError::Mirror(e.to_string()))?;
        self.get_fee_weibars("eth_feeHistory", Some(&block.timestamp.to)).await
    }
}

/// Serializable mirror of [`FeeHistory`], used only as the cache payload
/// since `FeeHistory` itself only derives `Serialize`.
#[derive(serde::Serialize, serde::Deserialize)]
struct CachedFeeHistory {
    oldest_block: U256,
    base_fee_per_gas: Option<Vec<U256>>,
    gas_used_ratio: Option<Vec<f64>>,
    reward: Option<Vec<Vec<U256>>>,
}

impl From<&FeeHistory> for CachedFeeHistory {
    fn from(h: &FeeHistory) -> Self {
        CachedFeeHistory {
            oldest_block: h.oldest_block,
            base_fee_per_gas: h.base_fee_per_gas.clone(),
            gas_used_ratio: h.gas_used_ratio.clone(),
            reward: h.reward.clone(),
        }
    }
}

impl From<CachedFeeHistory> for FeeHistory {
    fn from(c: CachedFeeHistory) -> Self {
        FeeHistory {
            oldest_block: c.oldest_block,
            base_fee_per_gas: c.base_fee_per_gas,
            gas_used_ratio: c.gas_used_ratio,
            reward: c.reward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeConsensus, FakeMirror};
    use relay_core::ports::NetworkFee;

    fn engine_with_latest(latest: u64) -> (FeeEngine, Arc<FakeMirror>, Arc<FakeConsensus>) {
        let mirror = Arc::new(FakeMirror::with_latest(latest));
        let consensus = Arc::new(FakeConsensus::default());
        *consensus.tiny_bar_gas_fee.lock() = Some(100);
        let engine = FeeEngine::new(mirror.clone(), consensus.clone(), Cache::new());
        (engine, mirror, consensus)
    }

    #[tokio::test]
    async fn zero_block_count_returns_zero_count_shortcut() {
        let (engine, _mirror, _consensus) = engine_with_latest(10);
        let outcome = engine.fee_history(0, &BlockId::Latest, None, None).await.unwrap();
        match outcome {
            EthOutcome::Success(h) => {
                assert_eq!(h.oldest_block, U256::zero());
                assert!(h.gas_used_ratio.is_none());
            }
            EthOutcome::Error(_) => panic!("expected success"),
        }
    }

    #[tokio::test]
    async fn newest_beyond_head_returns_error_value() {
        let (engine, _mirror, _consensus) = engine_with_latest(10);
        let outcome = engine.fee_history(1, &BlockId::Number(255), None, None).await.unwrap();
        match outcome {
            EthOutcome::Error(err) => {
                assert_eq!(err.code, relay_core::error::codes::REQUEST_BEYOND_HEAD_BLOCK);
            }
            EthOutcome::Success(_) => panic!("expected error value"),
        }
    }

    #[tokio::test]
    async fn falls_back_to_consensus_when_mirror_has_no_fees() {
        let mirror = Arc::new(FakeMirror::with_latest(5));
        let consensus = Arc::new(FakeConsensus::default());
        *consensus.tiny_bar_gas_fee.lock() = Some(7);
        let engine = FeeEngine::new(mirror, consensus, Cache::new());
        let fee = engine.get_fee_weibars("eth_gasPrice", None).await.unwrap();
        assert_eq!(fee, U256::from(7u64) * U256::from(TINYBAR_TO_WEIBAR));
    }

    #[tokio::test]
    async fn prefers_mirror_network_fee_when_present() {
        let mirror = Arc::new(FakeMirror::with_latest(5));
        *mirror.network_fees.lock() =
            Some(vec![NetworkFee { gas: 3, transaction_type: "EthereumTransaction".to_string() }]);
        let consensus = Arc::new(FakeConsensus::default());
        *consensus.tiny_bar_gas_fee.lock() = Some(999);
        let engine = FeeEngine::new(mirror, consensus, Cache::new());
        let fee = engine.get_fee_weibars("eth_gasPrice", None).await.unwrap();
        assert_eq!(fee, U256::from(3u64) * U256::from(TINYBAR_TO_WEIBAR));
    }
}
