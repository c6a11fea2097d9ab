// src/utils/crypto.rs
//! Hashing and address helpers.
//!
//! Content hashes use SHA-256 (via `ring`), hex-encoded in lowercase. Addresses
//! are normalized to their EIP-55 checksummed form before they take part in any
//! hash, so the same contract always hashes the same way regardless of how the
//! caller spelled it.

use crate::error::{Error, Result};
use crate::utils::serialization::serialize;
use ethers_core::types::Address;
use ethers_core::utils::{hex, to_checksum};
use ring::digest::{digest, SHA256};
use serde::Serialize;
use std::str::FromStr;

/// All-zero address, used as the "unset" sentinel in contract argument tuples.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Computes the SHA-256 digest of `data` as 64 lowercase hex characters.
///
/// # Example
/// ```
/// use ocean_sdk::utils::crypto::hash_data;
/// assert_eq!(
///     hash_data(b"hello world"),
///     "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
/// );
/// ```
pub fn hash_data(data: &[u8]) -> String {
    hex::encode(digest(&SHA256, data).as_ref())
}

/// Hashes the compact `serde_json` encoding of `value`.
///
/// Struct fields are written in declaration order, so the encoding of a typed
/// value is stable across platforms.
pub fn hash_json<T: Serialize>(value: &T) -> Result<String> {
    let encoded = serialize(value)?;
    Ok(hash_data(encoded.as_bytes()))
}

/// Parses an address string, enforcing EIP-55 when the input is mixed-case.
///
/// Accepted forms are `0x` followed by 40 hex digits, either all lowercase, all
/// uppercase, or mixed-case with a valid checksum.
pub fn parse_address(address: &str) -> Result<Address> {
    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| Error::InvalidAddress(address.to_string()))?;

    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidAddress(address.to_string()));
    }

    let parsed = Address::from_str(digits).map_err(|_| Error::InvalidAddress(address.to_string()))?;

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&parsed, None)[2..] != *digits {
        return Err(Error::InvalidAddress(format!("{address} fails EIP-55 checksum validation")));
    }

    Ok(parsed)
}

/// Returns the EIP-55 checksummed spelling of `address`.
pub fn checksum_address(address: &str) -> Result<String> {
    parse_address(address).map(|parsed| to_checksum(&parsed, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_hash_data_is_lowercase_sha256() {
        let hash = hash_data(b"");
        assert_eq!(hash, "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
        assert!(hash.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_hash_json_matches_hash_of_encoding() {
        let value = serde_json::json!({ "a": [1, 2] });
        assert_eq!(hash_json(&value).unwrap(), hash_data(br#"{"a":[1,2]}"#));
    }

    #[test]
    fn test_checksum_normalizes_single_case_input() {
        assert_eq!(checksum_address(&CHECKSUMMED.to_lowercase()).unwrap(), CHECKSUMMED);
        let upper = format!("0x{}", CHECKSUMMED[2..].to_uppercase());
        assert_eq!(checksum_address(&upper).unwrap(), CHECKSUMMED);
        assert_eq!(checksum_address(CHECKSUMMED).unwrap(), CHECKSUMMED);
    }

    #[test]
    fn test_rejects_bad_checksum() {
        // Swap the case of two adjacent letters.
        let broken = CHECKSUMMED.replacen("aA", "Aa", 1);
        assert!(matches!(checksum_address(&broken), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for bad in ["", "0x", "5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed", "0x1234", "0xzzAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"] {
            assert!(matches!(parse_address(bad), Err(Error::InvalidAddress(_))), "{bad}");
        }
    }
}
