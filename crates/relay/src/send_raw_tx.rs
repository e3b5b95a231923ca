//! `eth_sendRawTransaction` (spec §4.6).

use ethers_core::{
    types::Bytes,
    utils::keccak256,
};
use relay_core::{
    ports::{ConsensusPort, Precheck},
    EthError, EthOutcome, Result,
};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct SendRawTxHandler {
    consensus: Arc<dyn ConsensusPort>,
    precheck: Arc<dyn Precheck>,
    fees: Arc<crate::fees::FeeEngine>,
}

impl SendRawTxHandler {
    pub fn new(
        consensus: Arc<dyn ConsensusPort>,
        precheck: Arc<dyn Precheck>,
        fees: Arc<crate::fees::FeeEngine>,
    ) -> Self {
        Self { consensus, precheck, fees }
    }

    pub async fn send_raw_transaction(
        &self,
        raw_tx_hex: &str,
        request_id: Option<&str>,
    ) -> Result<EthOutcome<String>> {
        let gas_price = self.fees.gas_price(request_id).await?;

        if let Err(rejection) = self
            .precheck
            .send_raw_transaction_check(raw_tx_hex, gas_price, request_id)
            .await
        {
            debug!(request_id, code = rejection.code, "sendRawTransaction rejected by pre-check");
            return Ok(EthOutcome::error(rejection));
        }

        let stripped = relay_core::hex::prune_0x(raw_tx_hex);
        let raw_bytes = match hex::decode(stripped) {
            Ok(bytes) => bytes,
            Err(_) => return Ok(EthOutcome::error(EthError::internal_error())),
        };

        let handle = match self
            .consensus
            .submit_ethereum_transaction(Bytes::from(raw_bytes.clone()), "eth_sendRawTransaction")
            .await
        {
            Ok(handle) => handle,
            Err(e) => {
                warn!(request_id, error = %e, "sendRawTransaction submission failed");
                return Ok(EthOutcome::error(EthError::internal_error()));
            }
        };

        let hash = match self
            .consensus
            .execute_get_transaction_record(&handle, "eth_sendRawTransaction", "eth_sendRawTransaction")
            .await
        {
            Ok(record) => match record.ethereum_hash {
                Some(hash) => format!("0x{}", hex::encode(hash.as_ref())),
                None => format!("0x{}", hex::encode(keccak256(&raw_bytes))),
            },
            // Submission succeeded but record retrieval failed: fall back
            // to the locally computed hash rather than surface an error
            // (spec §4.6 step 5).
            Err(_) => format!("0x{}", hex::encode(keccak256(&raw_bytes))),
        };

        Ok(EthOutcome::success(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use crate::test_support::{FakeConsensus, FakeMirror, FakePrecheck};
    use relay_core::ports::{ExecutionRecord, SubmissionHandle};

    fn handler(consensus: Arc<FakeConsensus>, precheck: Arc<FakePrecheck>) -> SendRawTxHandler {
        let mirror: Arc<dyn relay_core::ports::MirrorPort> = Arc::new(FakeMirror::with_latest(1));
        *consensus.tiny_bar_gas_fee.lock() = Some(1);
        let fees = Arc::new(crate::fees::FeeEngine::new(mirror, consensus.clone(), Cache::new()));
        SendRawTxHandler::new(consensus, precheck, fees)
    }

    #[tokio::test]
    async fn returns_ethereum_hash_when_record_has_one() {
        let consensus = Arc::new(FakeConsensus::default());
        *consensus.submission_result.lock() = Some(Ok(SubmissionHandle("h".into())));
        *consensus.execution_record.lock() =
            Some(Ok(ExecutionRecord { ethereum_hash: Some(Bytes::from(vec![0xde, 0xad, 0xbe, 0xef])) }));
        let h = handler(consensus, Arc::new(FakePrecheck::default()));

        let outcome = h.send_raw_transaction("0x1234", None).await.unwrap();
        match outcome {
            EthOutcome::Success(hash) => assert_eq!(hash, "0xdeadbeef"),
            EthOutcome::Error(e) => panic!("expected success, got {e:?}"),
        }
    }

    #[tokio::test]
    async fn falls_back_to_keccak256_when_record_fetch_fails() {
        let consensus = Arc::new(FakeConsensus::default());
        *consensus.submission_result.lock() = Some(Ok(SubmissionHandle("h".into())));
        *consensus.execution_record.lock() = None;
        let h = handler(consensus, Arc::new(FakePrecheck::default()));

        let outcome = h.send_raw_transaction("0x1234", None).await.unwrap();
        match outcome {
            EthOutcome::Success(hash) => {
                let expected = format!("0x{}", hex::encode(keccak256([0x12, 0x34])));
                assert_eq!(hash, expected);
            }
            EthOutcome::Error(e) => panic!("expected success, got {e:?}"),
        }
    }

    #[tokio::test]
    async fn precheck_rejection_is_returned_not_thrown() {
        let consensus = Arc::new(FakeConsensus::default());
        let precheck = Arc::new(FakePrecheck::default());
        *precheck.rejection.lock() = Some(EthError::new(-32001, "nonce too low"));
        let h = handler(consensus, precheck);

        let outcome = h.send_raw_transaction("0x1234", None).await.unwrap();
        match outcome {
            EthOutcome::Error(e) => assert_eq!(e.code, -32001),
            EthOutcome::Success(_) => panic!("expected precheck rejection"),
        }
    }
}
