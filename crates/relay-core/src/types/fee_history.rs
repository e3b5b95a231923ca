//! `eth_feeHistory` response shape (spec §3, §4.5).

use ethers_core::types::U256;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeeHistory {
    pub oldest_block: U256,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<Vec<U256>>,
    /// `None` signals the zero-`blockCount` shortcut response.
    pub gas_used_ratio: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<Vec<Vec<U256>>>,
}

impl FeeHistory {
    /// The response to `feeHistory(blockCount <= 0, ..)` (spec §4.5 step 2).
    pub fn zero_count() -> Self {
        FeeHistory {
            oldest_block: U256::zero(),
            base_fee_per_gas: None,
            gas_used_ratio: None,
            reward: None,
        }
    }

    /// The response when any unrecoverable error occurs (spec §4.5, final
    /// paragraph).
    pub fn empty() -> Self {
        FeeHistory {
            oldest_block: U256::zero(),
            base_fee_per_gas: Some(Vec::new()),
            gas_used_ratio: Some(Vec::new()),
            reward: Some(Vec::new()),
        }
    }
}
