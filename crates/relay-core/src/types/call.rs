//! `eth_call` / `eth_estimateGas` request shape (spec §4.7).

use ethers_core::types::{Address, Bytes, U256};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    pub from: Option<Address>,
    /// Validated by the handler to be exactly 42 characters (spec §4.7);
    /// kept as a raw string rather than `Address` so a malformed value can
    /// be rejected with the spec's specific length check instead of a
    /// generic hex-parse error.
    pub to: Option<String>,
    pub gas: Option<GasValue>,
    pub gas_price: Option<U256>,
    pub max_fee_per_gas: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    pub value: Option<U256>,
    #[serde(default)]
    pub data: Option<Bytes>,
}

/// `gas` accepts either a numeric or hex-string value (spec §4.7).
#[derive(Debug, Clone, Copy)]
pub struct GasValue(pub u64);

impl<'de> Deserialize<'de> for GasValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(u64),
            Str(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(GasValue(n)),
            Repr::Str(s) => {
                let stripped = s.strip_prefix("0x").unwrap_or(&s);
                u64::from_str_radix(stripped, 16)
                    .map(GasValue)
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}
