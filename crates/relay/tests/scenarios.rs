//! End-to-end scenario tests against [`relay::EthApi`], one per numbered
//! scenario.

use ethers_core::types::{Bytes, H256, U256};
use relay::{
    dispatcher::{ConstantMethod, EthRequest},
    test_support::{FakeConsensus, FakeMirror, FakePrecheck},
    EthApi, RelayConfig,
};
use relay_core::{
    ports::{EntityType, ExecutionRecord, ResolvedEntity, SubmissionHandle},
    types::BlockId,
    ResponseResult,
};
use std::sync::Arc;

fn new_api(
    mirror: Arc<FakeMirror>,
    consensus: Arc<FakeConsensus>,
    precheck: Arc<FakePrecheck>,
    chain_id: u64,
) -> EthApi {
    EthApi::new(mirror, consensus, precheck, RelayConfig::new(U256::from(chain_id)))
}

fn success(result: ResponseResult) -> serde_json::Value {
    match result {
        ResponseResult::Success(v) => v,
        ResponseResult::Error(e) => panic!("expected success, got error: {e}"),
    }
}

#[tokio::test]
async fn s1_chain_id() {
    let mirror = Arc::new(FakeMirror::with_latest(0));
    let consensus = Arc::new(FakeConsensus::default());
    let precheck = Arc::new(FakePrecheck::default());
    let api = new_api(mirror, consensus, precheck, 0x12a);

    let result = api.execute(EthRequest::ChainId, None).await;
    assert_eq!(success(result), serde_json::json!("0x12a"));
}

#[tokio::test]
async fn s2_fee_history_clamps_zero_block_count() {
    let mirror = Arc::new(FakeMirror::with_latest(10));
    let consensus = Arc::new(FakeConsensus::default());
    let precheck = Arc::new(FakePrecheck::default());
    let api = new_api(mirror, consensus, precheck, 1);

    let result = api
        .execute(
            EthRequest::FeeHistory { block_count: 0, newest_block: BlockId::Latest, reward_percentiles: None },
            None,
        )
        .await;
    let value = success(result);
    assert_eq!(value["oldestBlock"], serde_json::json!("0x0"));
    assert!(value["gasUsedRatio"].is_null());
}

#[tokio::test]
async fn s3_fee_history_beyond_head() {
    let mirror = Arc::new(FakeMirror::with_latest(10));
    let consensus = Arc::new(FakeConsensus::default());
    let precheck = Arc::new(FakePrecheck::default());
    let api = new_api(mirror, consensus, precheck, 1);

    let result = api
        .execute(
            EthRequest::FeeHistory {
                block_count: 1,
                newest_block: BlockId::Number(0xff),
                reward_percentiles: None,
            },
            None,
        )
        .await;
    let value = success(result);
    assert_eq!(value["code"], serde_json::json!(relay_core::error::codes::REQUEST_BEYOND_HEAD_BLOCK));
}

#[tokio::test]
async fn s4_get_balance_not_found_then_cached() {
    let mirror = Arc::new(FakeMirror::with_latest(1));
    mirror.entities.lock().insert(
        "0xabc".to_string(),
        ResolvedEntity { entity_type: EntityType::Account, entity_id: "0.0.7".to_string() },
    );
    let consensus = Arc::new(FakeConsensus::default());
    consensus.invalid_account_ids.lock().push("0.0.7".to_string());
    let precheck = Arc::new(FakePrecheck::default());
    let api = new_api(mirror, consensus.clone(), precheck, 1);

    let request = || EthRequest::GetBalance { address: "0xabc".to_string(), block: BlockId::Latest };

    let result = api.execute(request(), None).await;
    assert_eq!(success(result), serde_json::json!("0x0"));

    // A second call within the TTL must be served entirely from cache:
    // clear the invalid-id marker and seed a real balance, then confirm
    // the api still reports the cached negative result.
    consensus.invalid_account_ids.lock().clear();
    consensus.account_balances.lock().insert("0.0.7".to_string(), U256::from(500));
    let result = api.execute(request(), None).await;
    assert_eq!(success(result), serde_json::json!("0x0"));
}

#[tokio::test]
async fn s5_call_bad_address_is_invalid_params() {
    let mirror = Arc::new(FakeMirror::with_latest(1));
    let consensus = Arc::new(FakeConsensus::default());
    let precheck = Arc::new(FakePrecheck::default());
    let api = new_api(mirror, consensus, precheck, 1);

    let request = relay_core::types::CallRequest {
        to: Some("0xabc".to_string()),
        data: Some(Bytes::from(vec![0x00])),
        ..Default::default()
    };
    let result = api.execute(EthRequest::Call { request, block: BlockId::Latest }, None).await;
    match result {
        ResponseResult::Error(e) => assert_eq!(e.code, relay_core::error::ErrorCode::InvalidParams),
        ResponseResult::Success(_) => panic!("expected a thrown invalid-params error"),
    }
}

#[tokio::test]
async fn s6_send_raw_transaction_success() {
    let mirror = Arc::new(FakeMirror::with_latest(1));
    let consensus = Arc::new(FakeConsensus::default());
    *consensus.tiny_bar_gas_fee.lock() = Some(1);
    *consensus.submission_result.lock() = Some(Ok(SubmissionHandle("h".into())));
    *consensus.execution_record.lock() = Some(Ok(ExecutionRecord {
        ethereum_hash: Some(Bytes::from(vec![0xde, 0xad, 0xbe, 0xef])),
    }));
    let precheck = Arc::new(FakePrecheck::default());
    let api = new_api(mirror, consensus, precheck, 1);

    let result = api
        .execute(EthRequest::SendRawTransaction { raw_tx_hex: "0x1234".to_string() }, None)
        .await;
    assert_eq!(success(result), serde_json::json!("0xdeadbeef"));
}

#[tokio::test]
async fn s7_get_logs_by_missing_block_hash_is_empty_not_error() {
    let mirror = Arc::new(FakeMirror::with_latest(1));
    let consensus = Arc::new(FakeConsensus::default());
    let precheck = Arc::new(FakePrecheck::default());
    let api = new_api(mirror, consensus, precheck, 1);

    let filter = relay::logs::LogFilter { block_hash: Some(H256::repeat_byte(0x99)), ..Default::default() };
    let result = api.execute(EthRequest::GetLogs { filter }, None).await;
    assert_eq!(success(result), serde_json::json!([]));
}

#[tokio::test]
async fn constant_method_table_matches_spec() {
    let mirror = Arc::new(FakeMirror::with_latest(1));
    let consensus = Arc::new(FakeConsensus::default());
    let precheck = Arc::new(FakePrecheck::default());
    let api = new_api(mirror, consensus, precheck, 1);

    let result = api.execute(EthRequest::Constant(ConstantMethod::Accounts), None).await;
    assert_eq!(success(result), serde_json::json!([]));
}
