//! Hex codec contract (spec §4.1).
//!
//! `ethers_core`'s `U256`/`H256`/`Address` already serialize as
//! minimal-length `0x`-prefixed lower-case hex, satisfying invariant 3 on
//! their own. This module covers the cases the spec calls out explicitly:
//! manual integer-to-hex, idempotent prefix/strip, hash truncation and the
//! `0x` -> absent canonicalization.

use ethers_core::types::U256;

/// Converts an unsigned integer (anything that fits in a `U256`) to
/// `0x`-prefixed hex with no leading zeros. Zero renders as `0x0`, never
/// `0x` or `0x00`.
pub fn to_hex(n: impl Into<U256>) -> String {
    let n: U256 = n.into();
    if n.is_zero() {
        "0x0".to_string()
    } else {
        format!("{n:#x}")
    }
}

/// `null`-passthrough version of [`to_hex`].
pub fn to_hex_or_null(n: Option<impl Into<U256>>) -> Option<String> {
    n.map(to_hex)
}

/// Idempotently ensures `s` starts with `0x`.
pub fn prepend_0x(s: &str) -> String {
    if s.starts_with("0x") {
        s.to_string()
    } else {
        format!("0x{s}")
    }
}

/// Idempotently strips a leading `0x`, if present.
pub fn prune_0x(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Truncates an already `0x`-prefixed hex string of at least 64 nibbles to
/// the canonical 66-character (`0x` + 64 hex) hash width.
pub fn to_hash32(s: &str) -> String {
    s.chars().take(66).collect()
}

/// Maps the literal `0x` (the mirror's encoding of "empty") to `None`;
/// any other value passes through unchanged. The single choke point for
/// canonicalizing the source's `undefined`-vs-`null`-vs-`"0x"` ambiguity
/// (spec §9).
pub fn to_null_if_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| v != "0x")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_renders_as_0x0() {
        assert_eq!(to_hex(U256::zero()), "0x0");
    }

    #[test]
    fn no_leading_zeros() {
        assert_eq!(to_hex(U256::from(0x0fu64)), "0xf");
        assert_eq!(to_hex(U256::from(256u64)), "0x100");
    }

    #[test]
    fn prepend_is_idempotent() {
        assert_eq!(prepend_0x("ab"), "0xab");
        assert_eq!(prepend_0x(&prepend_0x("ab")), "0xab");
    }

    #[test]
    fn prune_is_idempotent() {
        assert_eq!(prune_0x("0xab"), "ab");
        assert_eq!(prune_0x(prune_0x("0xab")), "ab");
    }

    #[test]
    fn hash32_truncates() {
        let long = format!("0x{}", "a".repeat(100));
        assert_eq!(to_hash32(&long).len(), 66);
    }

    #[test]
    fn empty_maps_to_none() {
        assert_eq!(to_null_if_empty(Some("0x".to_string())), None);
        assert_eq!(to_null_if_empty(Some("0x1".to_string())), Some("0x1".to_string()));
        assert_eq!(to_null_if_empty(None), None);
    }

    #[test]
    fn to_hex_or_null_passthrough() {
        assert_eq!(to_hex_or_null(None::<U256>), None);
        assert_eq!(to_hex_or_null(Some(U256::zero())), Some("0x0".to_string()));
    }
}
