// src/services/credential_signer.rs
//! Credential Signer Service
//!
//! Turns a [`VerifiableCredential`] into a [`SignedCredential`] carrying a
//! compact ES256K JSON Web Signature, and checks such signatures.
//!
//! Two signing methods are supported:
//! - `Local`: the caller hands over a secp256k1 JWK and the JWS is produced
//!   in-process
//! - `Remote`: the credential is posted to an issuer API which answers with
//!   the JWS
//!
//! Each call is a single attempt. Nothing is retried and nothing is timed out
//! here; callers that need a deadline pass an [`AbortRegistration`].

use crate::error::{Error, Result, SigningError, VerificationError};
use crate::models::credential::{SignedCredential, VerifiableCredential, VerifiedPayload};
use crate::utils::logging::Logger;
use crate::utils::serialization::{base64url_decode, base64url_encode};
use crate::wallet::key_management::{IssuerKey, Jwk, ALG_ES256K};
use chrono::Utc;
use futures::future::{AbortRegistration, Abortable};
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// How a credential gets its signature.
#[derive(Debug, Clone)]
pub enum SigningMethod {
    /// Sign in-process with `key`; `public_key_hex` becomes the `iss` claim.
    Local { key: IssuerKey, public_key_hex: String },
    /// Delegate to the issuer API at `endpoint`.
    Remote {
        endpoint: String,
        issuer_did: String,
        issuer_key: IssuerKey,
    },
}

/// Body posted to a remote issuer API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoteSignRequest<'a> {
    credential_data: &'a VerifiableCredential,
    issuer_did: &'a str,
    issuer_key: &'a IssuerKey,
    subject_did: &'a str,
}

/// Signs credentials with a fixed [`SigningMethod`].
///
/// The signer holds no mutable state, so one instance can serve concurrent
/// callers.
#[derive(Debug, Clone)]
pub struct CredentialSigner {
    method: SigningMethod,
    http: reqwest::Client,
    logger: Logger,
}

impl CredentialSigner {
    pub fn new(method: SigningMethod, logger: Logger) -> Self {
        Self {
            method,
            http: reqwest::Client::new(),
            logger: logger.with_target("ocean_sdk::credential_signer"),
        }
    }

    pub fn local(key: IssuerKey, public_key_hex: impl Into<String>, logger: Logger) -> Self {
        Self::new(
            SigningMethod::Local { key, public_key_hex: public_key_hex.into() },
            logger,
        )
    }

    pub fn remote(
        endpoint: impl Into<String>,
        issuer_did: impl Into<String>,
        issuer_key: IssuerKey,
        logger: Logger,
    ) -> Self {
        Self::new(
            SigningMethod::Remote {
                endpoint: endpoint.into(),
                issuer_did: issuer_did.into(),
                issuer_key,
            },
            logger,
        )
    }

    /// Replaces the HTTP client used for remote signing (proxies, TLS roots...).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn method(&self) -> &SigningMethod {
        &self.method
    }

    /// Signs `credential`.
    ///
    /// When `cancel` fires before completion the call resolves to
    /// `SigningError::Cancelled`.
    ///
    /// # Errors
    /// `Error::Signing` wrapping the cause: key import, signature computation,
    /// a network failure or a non-success answer from the issuer API.
    pub async fn sign(
        &self,
        credential: &VerifiableCredential,
        cancel: Option<AbortRegistration>,
    ) -> Result<SignedCredential> {
        let work = self.sign_once(credential);
        let outcome = match cancel {
            Some(registration) => Abortable::new(work, registration)
                .await
                .unwrap_or(Err(SigningError::Cancelled)),
            None => work.await,
        };

        match outcome {
            Ok(signed) => {
                self.logger.info(format_args!(
                    "signed credential for {} as {}",
                    credential.subject_id().unwrap_or("<no subject>"),
                    signed.issuer
                ));
                Ok(signed)
            }
            Err(err) => {
                self.logger.warn(format_args!("credential signing failed: {err}"));
                Err(err.into())
            }
        }
    }

    async fn sign_once(&self, credential: &VerifiableCredential) -> Result<SignedCredential, SigningError> {
        match &self.method {
            SigningMethod::Local { key, public_key_hex } => {
                let signing_key = key.signing_key()?;
                let claims = credential_claims(credential, public_key_hex, Utc::now().timestamp())?;
                let jws = tokio::task::spawn_blocking(move || sign_jws(&signing_key, &claims))
                    .await
                    .map_err(|e| SigningError::Crypto(format!("signing task failed: {e}")))??;
                signed_credential(jws, public_key_hex.clone())
            }
            SigningMethod::Remote { endpoint, issuer_did, issuer_key } => {
                let jws = self.request_remote(endpoint, issuer_did, issuer_key, credential).await?;
                signed_credential(jws, issuer_did.clone())
            }
        }
    }

    async fn request_remote(
        &self,
        endpoint: &str,
        issuer_did: &str,
        issuer_key: &IssuerKey,
        credential: &VerifiableCredential,
    ) -> Result<String, SigningError> {
        let subject_did = credential.subject_id().ok_or(SigningError::MissingSubject)?;
        let body = RemoteSignRequest {
            credential_data: credential,
            issuer_did,
            issuer_key,
            subject_did,
        };

        self.logger.debug(format_args!("posting credential for {subject_did} to {endpoint}"));
        let response = self.http.post(endpoint).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(SigningError::Rejected { status: status.as_u16(), body: text });
        }
        Ok(text.trim().trim_matches('"').to_string())
    }

    /// Verifies `jws` against `issuer_public_key`. See [`verify_credential`].
    pub async fn verify(&self, jws: &str, issuer_public_key: &Jwk) -> Result<VerifiedPayload> {
        let result = verify_credential(jws, issuer_public_key).await;
        if let Err(err) = &result {
            self.logger.warn(format_args!("credential verification failed: {err}"));
        }
        result
    }
}

/// Claims of a locally signed credential: the credential body plus `iat` and
/// `iss`.
fn credential_claims(
    credential: &VerifiableCredential,
    issuer: &str,
    issued_at: i64,
) -> Result<Map<String, Value>, SigningError> {
    let mut claims = match serde_json::to_value(credential)? {
        Value::Object(map) => map,
        _ => return Err(SigningError::Crypto("credential did not encode to a JSON object".into())),
    };
    claims.insert("iat".to_string(), json!(issued_at));
    claims.insert("iss".to_string(), json!(issuer));
    Ok(claims)
}

/// Builds the result shared by both signing methods.
fn signed_credential(jws: String, issuer: String) -> Result<SignedCredential, SigningError> {
    let header = jws
        .split('.')
        .next()
        .ok_or_else(|| SigningError::Crypto("empty JWS".into()))
        .and_then(|segment| {
            decode_json_segment(segment).map_err(|e| SigningError::Crypto(format!("JWS header is unreadable: {e}")))
        })?;
    Ok(SignedCredential { jws, header, issuer })
}

fn decode_json_segment(segment: &str) -> Result<Map<String, Value>, String> {
    let bytes = base64url_decode(segment)?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}

/// Produces a compact ES256K JWS over `claims`.
pub fn sign_jws(key: &SigningKey, claims: &Map<String, Value>) -> Result<String, SigningError> {
    let header = serde_json::to_vec(&json!({ "alg": ALG_ES256K }))?;
    let payload = serde_json::to_vec(claims)?;
    let signing_input = format!("{}.{}", base64url_encode(header), base64url_encode(payload));

    let signature: Signature = key
        .try_sign(signing_input.as_bytes())
        .map_err(|e| SigningError::Crypto(e.to_string()))?;
    Ok(format!("{signing_input}.{}", base64url_encode(signature.to_bytes())))
}

/// Checks a compact ES256K JWS and returns its claims.
///
/// The algorithm is fixed: a header announcing anything but `ES256K` is
/// rejected before the signature is looked at.
pub fn verify_jws(jws: &str, issuer_public_key: &Jwk) -> Result<VerifiedPayload, VerificationError> {
    let key = issuer_public_key.verifying_key()?;

    let segments: Vec<&str> = jws.split('.').collect();
    let [header, payload, signature] = segments.as_slice() else {
        return Err(VerificationError::Malformed(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    };

    let protected = decode_json_segment(header).map_err(VerificationError::Malformed)?;
    match protected.get("alg").and_then(Value::as_str) {
        Some(ALG_ES256K) => {}
        Some(other) => return Err(VerificationError::UnsupportedAlgorithm(other.to_string())),
        None => return Err(VerificationError::Malformed("protected header has no `alg`".into())),
    }

    let signature_bytes = base64url_decode(signature).map_err(VerificationError::Malformed)?;
    let signature = Signature::from_slice(&signature_bytes)
        .map_err(|_| VerificationError::Malformed("signature must be 64 bytes (r || s)".into()))?;
    // ES256K does not mandate low-S; k256 only verifies the low-S form.
    let signature = signature.normalize_s().unwrap_or(signature);

    key.verify(format!("{header}.{payload}").as_bytes(), &signature)
        .map_err(|_| VerificationError::InvalidSignature)?;

    let claims = decode_json_segment(payload).map_err(VerificationError::Payload)?;
    Ok(VerifiedPayload::from_claims(claims))
}

/// Async form of [`verify_jws`]; the check runs on the blocking pool.
pub async fn verify_credential(jws: &str, issuer_public_key: &Jwk) -> Result<VerifiedPayload> {
    let jws = jws.to_string();
    let jwk = issuer_public_key.clone();
    tokio::task::spawn_blocking(move || verify_jws(&jws, &jwk))
        .await
        .map_err(|e| VerificationError::Crypto(format!("verification task failed: {e}")))?
        .map_err(Error::from)
}
