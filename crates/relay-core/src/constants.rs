//! Bit-exact constants shared by the hex codec, the block/transaction
//! assembler and the fee engine. See spec §6 "Constants (bit-exact)".

/// `0x`, the mirror's encoding of an empty byte string.
pub const EMPTY_HEX: &str = "0x";

/// `0x0`, the canonical encoding of the integer zero.
pub const ZERO_HEX: &str = "0x0";

/// An 8-byte (16 hex digit) zero, used for `nonce`.
pub const ZERO_HEX_8_BYTE: &str = "0x0000000000000000";

/// A 32-byte (64 hex digit) zero, used for `difficulty`, `mixHash`,
/// `receiptsRoot`, `stateRoot`.
pub const ZERO_HEX_32_BYTE: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

/// `keccak256(rlp([]))` — the hash of an empty list, used for `sha3Uncles`
/// on every block (this chain has no uncles).
pub const EMPTY_ARRAY_KECCAK: &str =
    "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347";

/// The root of an empty Merkle-Patricia trie, used as `transactionsRoot`
/// when a block has no transactions.
pub const EMPTY_TRIE_ROOT: &str =
    "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421";

/// 20-byte zero address.
pub const ZERO_ADDRESS_HEX: &str = "0x0000000000000000000000000000000000000000";

/// 256-byte (2048 bit) empty bloom filter.
pub const EMPTY_BLOOM_HEX: &str = const_empty_bloom();

const fn const_empty_bloom() -> &'static str {
    "0x00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000"
}

/// Multiplier converting tinybar (the ledger's native unit) to weibar
/// (its EVM-scaled equivalent): `weibar = tinybar * 10^10`.
pub const TINYBAR_TO_WEIBAR: u64 = 10_000_000_000;

/// `gasUsedRatio` is a known-constant lie: the ledger does not expose
/// per-block utilization, so every block reports exactly 50%.
pub const CONSTANT_GAS_USED_RATIO: f64 = 0.5;

/// Default gas used by `eth_call`/`eth_estimateGas` when the caller omits
/// `gas` entirely.
pub const DEFAULT_CALL_GAS: u64 = 400_000;

/// Synthetic gas for a plain value transfer (`data` absent or `0x`).
pub const TX_BASE_COST: u64 = 21_000;

/// Synthetic gas for any other (contract-call-shaped) transaction when we
/// have no execution trace to estimate from.
pub const TX_DEFAULT_GAS: u64 = 400_000;

/// Maximum number of blocks a single `eth_feeHistory` call may request.
pub const DEFAULT_FEE_HISTORY_MAX_BLOCK_COUNT: u64 = 1024;

/// TTL shared by the `gasPrice` and `feeHistory` caches (independent keys).
pub const FEE_CACHE_TTL_MS: i64 = 60 * 60 * 1000;

/// TTL for cached `getBalance`/`getCode` negative results.
pub const NEGATIVE_RESULT_CACHE_TTL_MS: i64 = 60 * 60 * 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bloom_is_512_zero_nibbles() {
        assert_eq!(EMPTY_BLOOM_HEX.len(), 2 + 512);
        assert!(EMPTY_BLOOM_HEX[2..].chars().all(|c| c == '0'));
    }

    #[test]
    fn hash_constants_are_66_chars() {
        assert_eq!(EMPTY_ARRAY_KECCAK.len(), 66);
        assert_eq!(EMPTY_TRIE_ROOT.len(), 66);
    }

    #[test]
    fn address_constant_is_42_chars() {
        assert_eq!(ZERO_ADDRESS_HEX.len(), 42);
    }
}
