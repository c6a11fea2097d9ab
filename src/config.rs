// src/config.rs
//! Network configuration.
//!
//! Values come from `OCEAN_*` environment variables (a `.env` file is loaded
//! first when present), on top of the defaults below:
//!
//! | variable                         | default |
//! |----------------------------------|---------|
//! | `OCEAN_NODE_URI`                 | -       |
//! | `OCEAN_CHAIN_ID`                 | -       |
//! | `OCEAN_METADATA_CACHE_URI`       | -       |
//! | `OCEAN_PROVIDER_URI`             | -       |
//! | `OCEAN_NFT_FACTORY_ADDRESS`      | -       |
//! | `OCEAN_GAS_FEE_MULTIPLIER`       | `1.05`  |
//! | `OCEAN_ISSUER_API_ENDPOINT`      | unset   |
//! | `OCEAN_INDEXING_POLL_INTERVAL_MS`| `1500`  |
//! | `OCEAN_INDEXING_MAX_ATTEMPTS`    | `100`   |

use crate::error::{Error, Result};
use crate::utils::conversion::{estimate_gas_multiplied, DEFAULT_GAS_FEE_MULTIPLIER};
use crate::utils::crypto::parse_address;
use config::{Config, Environment};
use dotenv::dotenv;
use ethers_core::types::U256;
use serde::Deserialize;
use std::time::Duration;

const ENV_PREFIX: &str = "OCEAN";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SdkConfig {
    /// JSON-RPC endpoint of the chain node
    pub node_uri: String,
    pub chain_id: u64,
    /// Base URL of the metadata cache (Aquarius)
    pub metadata_cache_uri: String,
    /// Base URL of the access provider
    pub provider_uri: String,
    pub nft_factory_address: String,
    pub gas_fee_multiplier: String,
    pub issuer_api_endpoint: Option<String>,
    pub indexing_poll_interval_ms: u64,
    pub indexing_max_attempts: u32,
}

impl SdkConfig {
    /// Loads `.env` (if any) and then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    /// Builds the configuration from an explicit environment source.
    pub fn load(environment: Environment) -> Result<Self> {
        let config: SdkConfig = Config::builder()
            .set_default("gas_fee_multiplier", DEFAULT_GAS_FEE_MULTIPLIER)?
            .set_default("indexing_poll_interval_ms", 1500_u64)?
            .set_default("indexing_max_attempts", 100_u64)?
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects a malformed multiplier or factory address, and a zero attempt
    /// budget.
    pub fn validate(&self) -> Result<()> {
        estimate_gas_multiplied(U256::one(), &self.gas_fee_multiplier)?;
        parse_address(&self.nft_factory_address)?;
        if self.indexing_max_attempts == 0 {
            return Err(Error::Config(config::ConfigError::Message(
                "indexing_max_attempts must be at least 1".to_string(),
            )));
        }
        Ok(())
    }

    pub fn indexing_poll_interval(&self) -> Duration {
        Duration::from_millis(self.indexing_poll_interval_ms)
    }
}
