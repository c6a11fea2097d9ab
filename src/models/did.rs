// src/models/did.rs
//! Asset identifiers (`did:op:...`).
//!
//! An asset's identifier is derived from the address of its NFT contract and the
//! chain the contract lives on:
//!
//! ```text
//! did:op:<sha256-hex( checksum(address) || decimal(chain_id) )>
//! ```
//!
//! Derivation is pure: the same `(address, chain_id)` always yields the same
//! identifier.

use crate::error::{Error, Result};
use crate::utils::crypto::{checksum_address, hash_data};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Method prefix shared by every asset identifier.
pub const DID_PREFIX: &str = "did:op:";

/// A validated asset identifier.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

impl Did {
    /// Derives the identifier of the asset minted by `nft_address` on `chain_id`.
    ///
    /// # Errors
    /// `Error::InvalidAddress` when `nft_address` is malformed or mixed-case
    /// with a wrong EIP-55 checksum.
    pub fn derive(nft_address: &str, chain_id: u64) -> Result<Self> {
        let checksummed = checksum_address(nft_address)?;
        let digest = hash_data(format!("{checksummed}{chain_id}").as_bytes());
        Ok(Did(format!("{DID_PREFIX}{digest}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hex digest following `did:op:`.
    pub fn digest(&self) -> &str {
        &self.0[DID_PREFIX.len()..]
    }
}

/// Free-function form of [`Did::derive`].
pub fn derive_identifier(nft_address: &str, chain_id: u64) -> Result<Did> {
    Did::derive(nft_address, chain_id)
}

impl FromStr for Did {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let digest = value
            .strip_prefix(DID_PREFIX)
            .ok_or_else(|| Error::InvalidIdentifier(value.to_string()))?;
        if digest.len() != 64 || !digest.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')) {
            return Err(Error::InvalidIdentifier(value.to_string()));
        }
        Ok(Did(value.to_string()))
    }
}

impl TryFrom<String> for Did {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.0
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NFT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_derive_is_deterministic_and_well_formed() {
        let a = Did::derive(NFT, 137).unwrap();
        let b = Did::derive(NFT, 137).unwrap();
        assert_eq!(a, b);
        assert!(a.as_str().starts_with(DID_PREFIX));
        assert_eq!(a.digest().len(), 64);
        assert!(a.digest().chars().all(|c| c.is_ascii_digit() || matches!(c, 'a'..='f')));
    }

    #[test]
    fn test_derive_hashes_checksummed_address_and_chain_id() {
        let did = Did::derive(&NFT.to_lowercase(), 8996).unwrap();
        let expected = hash_data(format!("{NFT}8996").as_bytes());
        assert_eq!(did.digest(), expected);
    }

    #[test]
    fn test_distinct_inputs_give_distinct_identifiers() {
        let base = Did::derive(NFT, 1).unwrap();
        assert_ne!(base, Did::derive(NFT, 10).unwrap());
        assert_ne!(base, Did::derive("0x0000000000000000000000000000000000000001", 1).unwrap());
    }

    #[test]
    fn test_derive_rejects_malformed_address() {
        assert!(matches!(derive_identifier("0xnothex", 1), Err(Error::InvalidAddress(_))));
        let bad_checksum = NFT.replacen("aA", "Aa", 1);
        assert!(matches!(derive_identifier(&bad_checksum, 1), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_parse_and_serde() {
        let did = Did::derive(NFT, 1).unwrap();
        let parsed: Did = did.to_string().parse().unwrap();
        assert_eq!(parsed, did);

        let json = serde_json::to_string(&did).unwrap();
        assert_eq!(json, format!("\"{did}\""));
        assert!(serde_json::from_str::<Did>("\"did:op:xyz\"").is_err());
        assert!("did:web:example.com".parse::<Did>().is_err());
    }
}
