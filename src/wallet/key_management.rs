// src/wallet/key_management.rs
//! Issuer key material for credential signing.
//!
//! Keys are secp256k1 (via the `k256` crate) and travel as JSON Web Keys:
//! - `d`: private scalar, base64url
//! - `x`, `y`: affine public coordinates, base64url
//!
//! The SDK only ever borrows an [`IssuerKey`]; it never stores one.

use crate::error::{SigningError, VerificationError};
use crate::utils::serialization::{base64url_decode, base64url_encode};
use ethers_core::utils::hex;
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Value of [`IssuerKey::key_type`] for JWK-encoded keys.
pub const KEY_TYPE_JWK: &str = "JWK";
/// JWK `kty` for elliptic-curve keys.
pub const KTY_EC: &str = "EC";
/// JWK `crv` for secp256k1.
pub const CRV_SECP256K1: &str = "secp256k1";
/// JWS algorithm: ECDSA over secp256k1 with SHA-256.
pub const ALG_ES256K: &str = "ES256K";

const SCALAR_LEN: usize = 32;

/// Key material could not be turned into a usable key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct KeyImportError(String);

impl From<KeyImportError> for SigningError {
    fn from(err: KeyImportError) -> Self {
        SigningError::KeyImport(err.0)
    }
}

impl From<KeyImportError> for VerificationError {
    fn from(err: KeyImportError) -> Self {
        VerificationError::KeyImport(err.0)
    }
}

/// An elliptic-curve JSON Web Key.
///
/// Public keys leave `d` unset.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Jwk {
    pub kty: String,
    pub crv: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
}

impl fmt::Debug for Jwk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jwk")
            .field("kty", &self.kty)
            .field("crv", &self.crv)
            .field("kid", &self.kid)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("d", &self.d.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn decode_scalar(field: &str, value: Option<&String>) -> Result<Vec<u8>, KeyImportError> {
    let value = value.ok_or_else(|| KeyImportError(format!("JWK is missing `{field}`")))?;
    let bytes = base64url_decode(value).map_err(|e| KeyImportError(format!("JWK `{field}`: {e}")))?;
    if bytes.len() != SCALAR_LEN {
        return Err(KeyImportError(format!(
            "JWK `{field}` must be {SCALAR_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(bytes)
}

impl Jwk {
    /// Public JWK for `key`.
    pub fn from_verifying_key(key: &VerifyingKey, kid: Option<String>) -> Self {
        let point = key.to_encoded_point(false);
        Self {
            kty: KTY_EC.to_string(),
            crv: CRV_SECP256K1.to_string(),
            kid,
            alg: Some(ALG_ES256K.to_string()),
            x: point.x().map(base64url_encode),
            y: point.y().map(base64url_encode),
            d: None,
        }
    }

    fn check_key_type(&self) -> Result<(), KeyImportError> {
        if self.kty != KTY_EC || self.crv != CRV_SECP256K1 {
            return Err(KeyImportError(format!(
                "unsupported key {}/{}, expected {KTY_EC}/{CRV_SECP256K1}",
                self.kty, self.crv
            )));
        }
        match self.alg.as_deref() {
            None | Some(ALG_ES256K) => Ok(()),
            Some(other) => Err(KeyImportError(format!(
                "key is bound to algorithm {other}, expected {ALG_ES256K}"
            ))),
        }
    }

    /// Imports the public point `(x, y)`.
    pub fn verifying_key(&self) -> Result<VerifyingKey, KeyImportError> {
        self.check_key_type()?;
        let x = decode_scalar("x", self.x.as_ref())?;
        let y = decode_scalar("y", self.y.as_ref())?;

        let mut sec1 = Vec::with_capacity(1 + 2 * SCALAR_LEN);
        sec1.push(0x04);
        sec1.extend_from_slice(&x);
        sec1.extend_from_slice(&y);
        VerifyingKey::from_sec1_bytes(&sec1).map_err(|_| KeyImportError("JWK point is not on secp256k1".into()))
    }

    /// Imports the private scalar `d`.
    ///
    /// When `x`/`y` are present they must match the public key derived from `d`.
    pub fn signing_key(&self) -> Result<SigningKey, KeyImportError> {
        self.check_key_type()?;
        let d = decode_scalar("d", self.d.as_ref())?;
        let key = SigningKey::from_slice(&d).map_err(|_| KeyImportError("JWK `d` is not a valid secp256k1 scalar".into()))?;

        if self.x.is_some() || self.y.is_some() {
            if self.verifying_key()? != *key.verifying_key() {
                return Err(KeyImportError("JWK public coordinates do not match `d`".into()));
            }
        }
        Ok(key)
    }
}

/// Issuer key handed to the signer by the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IssuerKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub jwk: Jwk,
}

impl IssuerKey {
    /// Wraps `key` as a private JWK.
    pub fn from_signing_key(key: &SigningKey, kid: Option<String>) -> Self {
        let mut jwk = Jwk::from_verifying_key(key.verifying_key(), kid);
        jwk.d = Some(base64url_encode(key.to_bytes()));
        Self { key_type: KEY_TYPE_JWK.to_string(), jwk }
    }

    /// Generates a fresh secp256k1 key.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::from_signing_key(&SigningKey::random(rng), None)
    }

    pub fn signing_key(&self) -> Result<SigningKey, KeyImportError> {
        self.jwk.signing_key()
    }

    /// The public half of the key, without `d`.
    pub fn public_jwk(&self) -> Result<Jwk, KeyImportError> {
        let key = self.signing_key()?;
        Ok(Jwk::from_verifying_key(key.verifying_key(), self.jwk.kid.clone()))
    }

    /// Compressed SEC1 public key, hex encoded.
    pub fn public_key_hex(&self) -> Result<String, KeyImportError> {
        let key = self.signing_key()?;
        Ok(hex::encode(key.verifying_key().to_encoded_point(true).as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn key(seed: u64) -> IssuerKey {
        IssuerKey::generate(&mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_generated_key_round_trips_through_jwk() {
        let issuer = key(1);
        assert_eq!(issuer.key_type, KEY_TYPE_JWK);
        let imported = issuer.signing_key().unwrap();
        let public = issuer.public_jwk().unwrap();
        assert!(public.d.is_none());
        assert_eq!(public.verifying_key().unwrap(), *imported.verifying_key());
    }

    #[test]
    fn test_import_rejects_foreign_algorithm() {
        let mut issuer = key(5);
        issuer.jwk.alg = Some("ES256".into());
        let err = issuer.signing_key().unwrap_err();
        assert!(err.to_string().contains("ES256"));

        issuer.jwk.alg = None;
        assert!(issuer.signing_key().is_ok());
        issuer.jwk.alg = Some(ALG_ES256K.into());
        assert!(issuer.signing_key().is_ok());
    }

    #[test]
    fn test_public_key_hex_is_compressed_sec1() {
        let hex = key(2).public_key_hex().unwrap();
        assert_eq!(hex.len(), 66);
        assert!(hex.starts_with("02") || hex.starts_with("03"));
    }

    #[test]
    fn test_import_rejects_mismatched_coordinates() {
        let mut issuer = key(3);
        issuer.jwk.x = key(4).jwk.x;
        assert!(issuer.signing_key().is_err());
    }

    #[test]
    fn test_import_accepts_bare_scalar() {
        let mut issuer = key(5);
        issuer.jwk.x = None;
        issuer.jwk.y = None;
        assert!(issuer.signing_key().is_ok());
    }

    #[test]
    fn test_import_rejects_bad_material() {
        let mut issuer = key(6);
        issuer.jwk.d = Some("not*base64".into());
        assert!(issuer.signing_key().is_err());

        let mut short = key(6);
        short.jwk.d = Some(base64url_encode([1u8; 16]));
        assert!(short.signing_key().is_err());

        let mut wrong_curve = key(6);
        wrong_curve.jwk.crv = "P-256".into();
        assert!(wrong_curve.signing_key().is_err());
    }

    #[test]
    fn test_debug_redacts_private_scalar() {
        let issuer = key(7);
        let d = issuer.jwk.d.clone().unwrap();
        assert!(!format!("{issuer:?}").contains(&d));
    }
}
