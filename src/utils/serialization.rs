// src/utils/serialization.rs
//! Serialization utilities for the SDK.
//!
//! Provides:
//! - JSON encoding/decoding used by the HTTP clients
//! - unpadded base64url, the alphabet of every JWS segment

use serde::{Deserialize, Serialize};

/// Serializes a value to a JSON string.
///
/// # Arguments
/// * `data` - The value to serialize (must implement `Serialize`)
///
/// # Returns
/// - `Ok(String)` with JSON representation on success
/// - `Err(serde_json::Error)` if serialization fails
pub fn serialize<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(data)
}

/// Deserializes a value from a JSON string.
///
/// The lifetime parameter lets the result borrow from `data`.
pub fn deserialize<'a, T: Deserialize<'a>>(data: &'a str) -> Result<T, serde_json::Error> {
    serde_json::from_str(data)
}

/// Encodes bytes as base64url without padding.
pub fn base64url_encode<T: AsRef<[u8]>>(data: T) -> String {
    base64::encode_config(data, base64::URL_SAFE_NO_PAD)
}

/// Decodes unpadded base64url.
///
/// # Errors
/// Returns a description of the failure when `data` is not valid base64url.
pub fn base64url_decode(data: &str) -> Result<Vec<u8>, String> {
    base64::decode_config(data, base64::URL_SAFE_NO_PAD)
        .map_err(|e| format!("Base64url decoding failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64url_uses_url_alphabet_without_padding() {
        let encoded = base64url_encode([0xfb, 0xff]);
        assert_eq!(encoded, "-_8");
        assert_eq!(base64url_decode(&encoded).unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn test_base64url_rejects_standard_alphabet() {
        assert!(base64url_decode("+/8=").is_err());
    }

    #[test]
    fn test_json_helpers() {
        let text = serialize(&serde_json::json!({ "alg": "ES256K" })).unwrap();
        let value: serde_json::Value = deserialize(&text).unwrap();
        assert_eq!(value["alg"], "ES256K");
    }
}
