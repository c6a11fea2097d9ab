// src/models/ddo.rs
//! Asset document (DDO) as served by the metadata cache.
//!
//! Only the fields the SDK reasons about are typed; anything else a cache
//! attaches (stats, purgatory flags, ...) is dropped on decode.

use crate::error::Result;
use crate::models::did::Did;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-LD context of a DDO.
pub const DDO_CONTEXT: &str = "https://w3id.org/did/v1";

/// Schema version written by [`Ddo::new`].
pub const DDO_VERSION: &str = "4.1.0";

/// Indexing event recorded by the metadata cache once it has seen the asset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IndexedEvent {
    pub tx: Option<String>,
    pub block: Option<u64>,
    pub from: Option<String>,
    pub contract: Option<String>,
    pub datetime: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Ddo {
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    pub id: Did,

    pub version: String,

    #[serde(rename = "nftAddress")]
    pub nft_address: String,

    #[serde(rename = "chainId")]
    pub chain_id: u64,

    #[serde(default)]
    pub metadata: Value,

    #[serde(default)]
    pub services: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<IndexedEvent>,
}

impl Ddo {
    /// Starts a document for the asset minted by `nft_address` on `chain_id`,
    /// deriving its identifier.
    pub fn new(nft_address: &str, chain_id: u64, metadata: Value) -> Result<Self> {
        let id = Did::derive(nft_address, chain_id)?;
        Ok(Self {
            context: vec![DDO_CONTEXT.to_string()],
            id,
            version: DDO_VERSION.to_string(),
            nft_address: nft_address.to_string(),
            chain_id,
            metadata,
            services: Vec::new(),
            credentials: None,
            event: None,
        })
    }

    /// Whether the identifier matches the one derived from `nft_address` and
    /// `chain_id`.
    pub fn has_consistent_id(&self) -> bool {
        Did::derive(&self.nft_address, self.chain_id)
            .map(|derived| derived == self.id)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NFT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_new_derives_identifier() {
        let ddo = Ddo::new(NFT, 8996, json!({ "name": "Weather" })).unwrap();
        assert_eq!(ddo.id, Did::derive(NFT, 8996).unwrap());
        assert!(ddo.has_consistent_id());
    }

    #[test]
    fn test_tampered_chain_is_inconsistent() {
        let mut ddo = Ddo::new(NFT, 8996, Value::Null).unwrap();
        ddo.chain_id = 1;
        assert!(!ddo.has_consistent_id());
    }

    #[test]
    fn test_decodes_cache_response() {
        let did = Did::derive(NFT, 1).unwrap();
        let raw = json!({
            "@context": [DDO_CONTEXT],
            "id": did,
            "version": "4.1.0",
            "nftAddress": NFT,
            "chainId": 1,
            "metadata": {},
            "services": [],
            "stats": { "orders": 3 },
            "event": { "tx": "0xabc", "block": 12 }
        });
        let ddo: Ddo = serde_json::from_value(raw).unwrap();
        assert_eq!(ddo.id, did);
        assert_eq!(ddo.event.as_ref().and_then(|e| e.tx.as_deref()), Some("0xabc"));
        assert_eq!(ddo.event.as_ref().and_then(|e| e.block), Some(12));
    }
}
