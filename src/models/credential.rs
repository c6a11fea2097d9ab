// src/models/credential.rs
//! Verifiable Credential data model implementation.
//!
//! A credential wraps an asset document (the `credentialSubject`) together with
//! its issuer. Signing never mutates a credential; it produces a separate
//! [`SignedCredential`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default JSON-LD context of a credential.
pub const CREDENTIALS_CONTEXT_V1: &str = "https://www.w3.org/2018/credentials/v1";

/// A Verifiable Credential about an asset.
///
/// # Fields
/// - `context`: ordered JSON-LD contexts (`@context`)
/// - `credential_subject`: the asset document; its `id` is the subject DID
/// - `version`: document schema version
/// - `issuer`: identifier of the issuing party
/// - `additional_ddos`: extra documents bundled with the subject
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerifiableCredential {
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    #[serde(rename = "credentialSubject")]
    pub credential_subject: Value,

    pub version: String,

    pub issuer: String,

    #[serde(rename = "additionalDdos", default, skip_serializing_if = "Option::is_none")]
    pub additional_ddos: Option<Vec<Value>>,
}

impl VerifiableCredential {
    /// Builds a credential with the default W3C context.
    pub fn new(issuer: impl Into<String>, version: impl Into<String>, credential_subject: Value) -> Self {
        Self {
            context: vec![CREDENTIALS_CONTEXT_V1.to_string()],
            credential_subject,
            version: version.into(),
            issuer: issuer.into(),
            additional_ddos: None,
        }
    }

    /// The subject's identifier (`credentialSubject.id`), if present.
    pub fn subject_id(&self) -> Option<&str> {
        self.credential_subject.get("id").and_then(Value::as_str)
    }
}

/// The immutable result of signing a credential.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SignedCredential {
    /// Compact JWS (`header.payload.signature`).
    pub jws: String,
    /// Decoded protected header of `jws`.
    pub header: Map<String, Value>,
    /// Who signed: a public key hex string for local signing, the issuer DID for
    /// remote signing.
    pub issuer: String,
}

/// Claims recovered from a verified JWS.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerifiedPayload {
    /// `iss` claim.
    pub issuer: Option<String>,
    /// `iat` claim, seconds since the Unix epoch.
    pub issued_at: Option<i64>,
    /// Every claim, `iss` and `iat` included.
    pub claims: Map<String, Value>,
}

impl VerifiedPayload {
    pub fn from_claims(claims: Map<String, Value>) -> Self {
        Self {
            issuer: claims.get("iss").and_then(Value::as_str).map(str::to_string),
            issued_at: claims.get("iat").and_then(Value::as_i64),
            claims,
        }
    }

    /// Re-reads the claims as the credential that was signed.
    pub fn credential(&self) -> Result<VerifiableCredential, serde_json::Error> {
        serde_json::from_value(Value::Object(self.claims.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> VerifiableCredential {
        VerifiableCredential::new(
            "did:op:issuer",
            "5.0.0",
            json!({ "id": "did:op:subject", "metadata": { "name": "Weather" } }),
        )
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["@context"], json!([CREDENTIALS_CONTEXT_V1]));
        assert_eq!(value["credentialSubject"]["id"], "did:op:subject");
        assert!(value.get("additionalDdos").is_none());
    }

    #[test]
    fn test_subject_id() {
        assert_eq!(sample().subject_id(), Some("did:op:subject"));
        let anonymous = VerifiableCredential::new("i", "1", json!({ "name": "x" }));
        assert_eq!(anonymous.subject_id(), None);
    }

    #[test]
    fn test_payload_exposes_registered_claims() {
        let mut claims = serde_json::to_value(sample()).unwrap().as_object().cloned().unwrap();
        claims.insert("iss".into(), json!("02abcdef"));
        claims.insert("iat".into(), json!(1_700_000_000));

        let payload = VerifiedPayload::from_claims(claims);
        assert_eq!(payload.issuer.as_deref(), Some("02abcdef"));
        assert_eq!(payload.issued_at, Some(1_700_000_000));
        assert_eq!(payload.credential().unwrap(), sample());
    }
}
