// src/error.rs
//! Error taxonomy for the SDK.
//!
//! Errors fall into two families:
//! - malformed input (`InvalidAddress`, `InvalidAmount`, `InvalidIdentifier`),
//!   which is a caller bug
//! - cryptographic or network failures (`Signing`, `Verification`, `Network`),
//!   which may be transient and are left to the caller to retry
//!
//! Nothing in the SDK retries internally.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("signing failed: {0}")]
    Signing(#[from] SigningError),

    #[error("verification failed: {0}")]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("contract call failed: {0}")]
    Contract(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True when the failure stems from malformed caller input rather than from
    /// a cryptographic or network problem.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidAddress(_) | Error::InvalidAmount(_) | Error::InvalidIdentifier(_)
        )
    }
}

/// Failure while producing a signed credential.
#[derive(Error, Debug)]
pub enum SigningError {
    #[error("issuer key import failed: {0}")]
    KeyImport(String),

    #[error("signature computation failed: {0}")]
    Crypto(String),

    #[error("credential could not be encoded: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("credentialSubject.id is missing")]
    MissingSubject,

    #[error("issuer API rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("signing was cancelled")]
    Cancelled,
}

/// Failure while checking a JWS envelope.
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("issuer public key import failed: {0}")]
    KeyImport(String),

    #[error("malformed JWS: {0}")]
    Malformed(String),

    #[error("unsupported algorithm `{0}`, expected ES256K")]
    UnsupportedAlgorithm(String),

    #[error("signature does not match the issuer key")]
    InvalidSignature,

    #[error("payload could not be parsed: {0}")]
    Payload(String),

    #[error("signature check could not run: {0}")]
    Crypto(String),
}

/// Failure talking to a remote HTTP service.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(NetworkError::Request(err))
    }
}

impl From<reqwest::Error> for SigningError {
    fn from(err: reqwest::Error) -> Self {
        SigningError::Network(NetworkError::Request(err))
    }
}
