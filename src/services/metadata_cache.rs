// src/services/metadata_cache.rs
//! Metadata cache (Aquarius) client.
//!
//! Resolves published assets by DID, asks the cache to validate a DDO before
//! it is written on-chain, and waits for a freshly published asset to show up
//! in the cache.

use crate::config::SdkConfig;
use crate::error::{Error, NetworkError, Result};
use crate::models::ddo::Ddo;
use crate::models::did::Did;
use crate::utils::logging::Logger;
use crate::utils::serialization::deserialize;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DDO_PATH: &str = "/api/aquarius/assets/ddo";

/// Outcome of `POST /ddo/validate`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    /// Hash of the validated document, present when `valid`
    pub hash: Option<String>,
    /// Validator signature over `hash`
    pub proof: Option<Value>,
    pub errors: Option<Value>,
}

#[derive(Deserialize)]
struct ValidationResponse {
    hash: Option<String>,
    proof: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct MetadataCache {
    base_uri: String,
    http: reqwest::Client,
    poll_interval: Duration,
    max_attempts: u32,
    logger: Logger,
}

impl MetadataCache {
    pub fn new(base_uri: impl Into<String>, logger: Logger) -> Self {
        Self {
            base_uri: base_uri.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            poll_interval: Duration::from_millis(1500),
            max_attempts: 100,
            logger: logger.with_target("ocean_sdk::metadata_cache"),
        }
    }

    pub fn from_config(config: &SdkConfig, logger: Logger) -> Self {
        Self::new(config.metadata_cache_uri.clone(), logger)
            .with_polling(config.indexing_poll_interval(), config.indexing_max_attempts)
    }

    /// Sets how often and how many times [`MetadataCache::wait_for_indexing`]
    /// asks the cache.
    pub fn with_polling(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = interval;
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Fetches the DDO published under `did`.
    ///
    /// # Errors
    /// `Error::NotFound` when the cache does not know the asset,
    /// `Error::Network` for transport failures and other non-success codes.
    pub async fn resolve(&self, did: &Did) -> Result<Ddo> {
        let url = format!("{}{DDO_PATH}/{did}", self.base_uri);
        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(did.to_string()));
        }
        if !status.is_success() {
            return Err(NetworkError::Status { status: status.as_u16(), url }.into());
        }

        let body = response.text().await?;
        Ok(deserialize(&body)?)
    }

    /// Submits `ddo` for schema validation.
    ///
    /// A `400` answer is a validation verdict, not a failure: it comes back as
    /// `valid == false` with the cache's error report.
    pub async fn validate(&self, ddo: &Ddo) -> Result<ValidationResult> {
        let url = format!("{}{DDO_PATH}/validate", self.base_uri);
        let body = serde_json::to_vec(ddo)?;
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            let parsed: ValidationResponse = deserialize(&text)?;
            return Ok(ValidationResult {
                valid: true,
                hash: parsed.hash,
                proof: parsed.proof,
                errors: None,
            });
        }
        if status == reqwest::StatusCode::BAD_REQUEST {
            let errors: Value = deserialize(&text).unwrap_or(Value::String(text));
            self.logger.warn(format_args!("DDO {} failed validation: {errors}", ddo.id));
            return Ok(ValidationResult { valid: false, hash: None, proof: None, errors: Some(errors) });
        }
        Err(NetworkError::Status { status: status.as_u16(), url }.into())
    }

    /// Polls [`MetadataCache::resolve`] until the asset is indexed.
    ///
    /// With `tx_id`, the asset only counts as indexed once its `event.tx`
    /// matches, so an update is not mistaken for the previous version.
    ///
    /// # Errors
    /// `Error::NotFound` once the attempt budget is spent. Errors other than
    /// `NotFound` end the wait immediately.
    pub async fn wait_for_indexing(&self, did: &Did, tx_id: Option<&str>) -> Result<Ddo> {
        for attempt in 1..=self.max_attempts {
            match self.resolve(did).await {
                Ok(ddo) if is_indexed(&ddo, tx_id) => {
                    self.logger.info(format_args!("{did} indexed after {attempt} attempt(s)"));
                    return Ok(ddo);
                }
                Ok(_) | Err(Error::NotFound(_)) => {
                    self.logger.debug(format_args!("{did} not indexed yet ({attempt}/{})", self.max_attempts));
                }
                Err(err) => return Err(err),
            }
            if attempt < self.max_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        self.logger.warn(format_args!("gave up waiting for {did}"));
        Err(Error::NotFound(format!("{did} not indexed after {} attempts", self.max_attempts)))
    }
}

fn is_indexed(ddo: &Ddo, tx_id: Option<&str>) -> bool {
    match tx_id {
        None => true,
        Some(tx) => ddo
            .event
            .as_ref()
            .and_then(|event| event.tx.as_deref())
            .map_or(false, |indexed| indexed.eq_ignore_ascii_case(tx)),
    }
}
