//! Block-tag resolution (spec §4.2).

use relay_core::{
    ports::MirrorPort,
    types::BlockId,
    BlockchainError, Result,
};
use std::sync::Arc;

/// Resolves a [`BlockId`] to an integer block number.
///
/// `null | "latest" | "pending"` both resolve against the mirror's highest
/// known block; `"pending"` is aliased to `"latest"` since this ledger has
/// no visible pending pool. `"earliest"` is always block 0.
pub async fn resolve_block_number(mirror: &Arc<dyn MirrorPort>, id: &BlockId) -> Result<u64> {
    match id {
        BlockId::Latest | BlockId::Pending => {
            let block = mirror
                .get_latest_block()
                .await
                .map_err(|e| BlockchainError::Mirror(e.to_string()))?;
            Ok(block.number)
        }
        BlockId::Earliest => Ok(0),
        BlockId::Number(n) => Ok(*n),
        BlockId::Hash(hash) => {
            let block = mirror
                .get_block(&format!("{hash:#x}"))
                .await
                .map_err(|e| BlockchainError::Mirror(e.to_string()))?;
            Ok(block.number)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeMirror;

    #[tokio::test]
    async fn latest_queries_mirror_head() {
        let mirror: Arc<dyn MirrorPort> = Arc::new(FakeMirror::with_latest(42));
        assert_eq!(resolve_block_number(&mirror, &BlockId::Latest).await.unwrap(), 42);
        assert_eq!(resolve_block_number(&mirror, &BlockId::Pending).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn earliest_is_zero() {
        let mirror: Arc<dyn MirrorPort> = Arc::new(FakeMirror::with_latest(42));
        assert_eq!(resolve_block_number(&mirror, &BlockId::Earliest).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn number_passes_through() {
        let mirror: Arc<dyn MirrorPort> = Arc::new(FakeMirror::with_latest(42));
        assert_eq!(resolve_block_number(&mirror, &BlockId::Number(7)).await.unwrap(), 7);
    }
}
