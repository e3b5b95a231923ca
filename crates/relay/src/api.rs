//! `EthApi`: owns the ports and engines, and dispatches an [`EthRequest`]
//! to the right handler (spec §4, "Control flow" in §2).

#[cfg(test)]
use ethers_core::types::U256;
use relay_core::{ports::{ConsensusPort, MirrorPort, Precheck}, ResponseResult, ToRpcResult};
use std::sync::Arc;
use tracing::trace;

use crate::{
    cache::Cache,
    config::RelayConfig,
    dispatcher::EthRequest,
    fees::FeeEngine,
    logs,
    read::ReadHandlers,
    send_raw_tx::SendRawTxHandler,
    tx::TxAssembler,
};

pub struct EthApi {
    config: RelayConfig,
    mirror: Arc<dyn MirrorPort>,
    fees: Arc<FeeEngine>,
    tx: TxAssembler,
    read: ReadHandlers,
    send_raw_tx: SendRawTxHandler,
}

impl EthApi {
    pub fn new(
        mirror: Arc<dyn MirrorPort>,
        consensus: Arc<dyn ConsensusPort>,
        precheck: Arc<dyn Precheck>,
        config: RelayConfig,
    ) -> Self {
        let cache = Cache::new();
        let fees = Arc::new(
            FeeEngine::new(mirror.clone(), consensus.clone(), cache.clone())
                .with_fee_history_max_block_count(config.fee_history_max_block_count),
        );
        let tx = TxAssembler::new(mirror.clone(), fees.clone());
        let read = ReadHandlers::new(mirror.clone(), consensus.clone(), cache.clone());
        let send_raw_tx = SendRawTxHandler::new(consensus, precheck, fees.clone());

        Self { config, mirror, fees, tx, read, send_raw_tx }
    }

    /// Executes one request, translating every outcome (thrown or
    /// returned) into the wire-level result (spec §9).
    pub async fn execute(&self, request: EthRequest, request_id: Option<&str>) -> ResponseResult {
        trace!(request_id, ?request, "dispatching eth_* request");

        match request {
            EthRequest::ChainId => {
                ok(relay_core::hex::to_hex(self.config.chain_id)).to_rpc_result()
            }

            EthRequest::BlockNumber => crate::block_tag::resolve_block_number(
                &self.mirror,
                &relay_core::types::BlockId::Latest,
            )
            .await
            .map(relay_core::hex::to_hex)
            .to_rpc_result(),

            EthRequest::GasPrice => {
                self.fees.gas_price(request_id).await.map(relay_core::hex::to_hex).to_rpc_result()
            }

            EthRequest::GetBalance { address, block } => {
                self.read.get_balance(&address, &block).await.map(relay_core::hex::to_hex).to_rpc_result()
            }

            EthRequest::GetCode { address, block } => {
                self.read.get_code(address, &block).await.to_rpc_result()
            }

            EthRequest::GetTransactionCount { address, block } => self
                .read
                .get_transaction_count(&address, &block)
                .await
                .map(relay_core::hex::to_hex)
                .to_rpc_result(),

            EthRequest::GetBlockByHash { hash, full } => self
                .tx
                .get_block(&relay_core::types::BlockId::Hash(hash), full)
                .await
                .to_rpc_result(),

            EthRequest::GetBlockByNumber { block, full } => {
                self.tx.get_block(&block, full).await.to_rpc_result()
            }

            EthRequest::GetTransactionByHash { hash } => {
                self.tx.get_transaction_by_hash(hash).await.to_rpc_result()
            }

            EthRequest::GetTransactionByBlockHashAndIndex { hash, index } => self
                .tx
                .get_transaction_by_block_and_index(&relay_core::types::BlockId::Hash(hash), index)
                .await
                .to_rpc_result(),

            EthRequest::GetTransactionByBlockNumberAndIndex { block, index } => {
                self.tx.get_transaction_by_block_and_index(&block, index).await.to_rpc_result()
            }

            EthRequest::GetTransactionReceipt { hash } => {
                self.tx.get_transaction_receipt(hash).await.to_rpc_result()
            }

            EthRequest::GetLogs { filter } => logs::get_logs(&self.mirror, filter).await.to_rpc_result(),

            EthRequest::Call { request, block } => self.read.call(&request, &block).await.to_rpc_result(),

            EthRequest::EstimateGas { request } => {
                ok(relay_core::hex::to_hex(self.read.estimate_gas(request.data.as_ref()))).to_rpc_result()
            }

            EthRequest::FeeHistory { block_count, newest_block, reward_percentiles } => self
                .fees
                .fee_history(block_count, &newest_block, reward_percentiles.as_deref(), request_id)
                .await
                .to_rpc_result(),

            EthRequest::SendRawTransaction { raw_tx_hex } => {
                self.send_raw_tx.send_raw_transaction(&raw_tx_hex, request_id).await.to_rpc_result()
            }

            EthRequest::Constant(method) => ok(method.response()).to_rpc_result(),

            EthRequest::Unsupported => ok(relay_core::EthOutcome::<()>::error(
                relay_core::EthError::unsupported_method(),
            ))
            .to_rpc_result(),
        }
    }
}

fn ok<T>(value: T) -> relay_core::Result<T> {
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::ConstantMethod;
    use crate::test_support::{FakeConsensus, FakeMirror, FakePrecheck};

    fn api_with_latest(latest: u64, chain_id: u64) -> EthApi {
        let mirror: Arc<dyn MirrorPort> = Arc::new(FakeMirror::with_latest(latest));
        let consensus: Arc<dyn ConsensusPort> = Arc::new(FakeConsensus::default());
        let precheck: Arc<dyn Precheck> = Arc::new(FakePrecheck::default());
        EthApi::new(mirror, consensus, precheck, RelayConfig::new(U256::from(chain_id)))
    }

    #[tokio::test]
    async fn chain_id_is_immutable_and_side_effect_free() {
        let api = api_with_latest(1, 0x12a);
        let result = api.execute(EthRequest::ChainId, None).await;
        match result {
            ResponseResult::Success(v) => assert_eq!(v, serde_json::json!("0x12a")),
            ResponseResult::Error(e) => panic!("unexpected error {e:?}"),
        }
    }

    #[tokio::test]
    async fn unsupported_method_returns_success_shaped_error_value() {
        let api = api_with_latest(1, 1);
        let result = api.execute(EthRequest::Unsupported, None).await;
        match result {
            ResponseResult::Success(v) => {
                assert_eq!(v["code"], serde_json::json!(relay_core::error::codes::UNSUPPORTED_METHOD));
            }
            ResponseResult::Error(_) => panic!("unsupported method must not be a thrown error"),
        }
    }

    #[tokio::test]
    async fn constant_method_dispatches_fixed_value() {
        let api = api_with_latest(1, 1);
        let result = api.execute(EthRequest::Constant(ConstantMethod::Mining), None).await;
        match result {
            ResponseResult::Success(v) => assert_eq!(v, serde_json::json!(false)),
            ResponseResult::Error(e) => panic!("unexpected error {e:?}"),
        }
    }
}
