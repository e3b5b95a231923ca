//! Engine configuration (spec SPEC_FULL §4.10). Loaded from the process
//! environment the way the teacher's node builder reads `ANVIL_*`
//! variables, but scoped to what this core actually needs.

use ethers_core::types::U256;
use relay_core::constants::DEFAULT_FEE_HISTORY_MAX_BLOCK_COUNT;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Immutable after construction (spec §3 invariant 4).
    pub chain_id: U256,
    pub fee_history_max_block_count: u64,
}

impl RelayConfig {
    pub fn new(chain_id: U256) -> Self {
        Self { chain_id, fee_history_max_block_count: DEFAULT_FEE_HISTORY_MAX_BLOCK_COUNT }
    }

    pub fn from_env() -> Self {
        let chain_id = std::env::var("CHAIN_ID")
            .ok()
            .and_then(|v| {
                let stripped = relay_core::hex::prune_0x(&v);
                U256::from_str_radix(stripped, 16).ok()
            })
            .unwrap_or_else(U256::zero);

        let fee_history_max_block_count = std::env::var("FEE_HISTORY_MAX_BLOCK_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_FEE_HISTORY_MAX_BLOCK_COUNT);

        Self { chain_id, fee_history_max_block_count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_env_unset() {
        std::env::remove_var("CHAIN_ID");
        std::env::remove_var("FEE_HISTORY_MAX_BLOCK_COUNT");
        let config = RelayConfig::from_env();
        assert_eq!(config.chain_id, U256::zero());
        assert_eq!(config.fee_history_max_block_count, DEFAULT_FEE_HISTORY_MAX_BLOCK_COUNT);
    }
}
