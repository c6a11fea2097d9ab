// src/lib.rs

//! # Ocean SDK - Publishing Primitives
//!
//! Client-side building blocks for publishing data assets on an EVM chain
//! and issuing verifiable credentials about them.
//!
//! ## Architecture Overview
//! 1. **Models**: asset identifiers (`Did`), DDOs and credentials
//! 2. **Utils**: amount conversion, random identifiers, hashing, logging
//! 3. **Wallet**: secp256k1 issuer keys in JWK form
//! 4. **Services**: credential signing and the metadata cache client
//! 5. **Contracts**: argument tuples plus NFT factory and datatoken wrappers
//! 6. **Blockchain**: `ChainClient`, the only place transactions are sent
//!
//! ## Environment Variables
//! See [`crate::config`] for the `OCEAN_*` variables read by [`SdkConfig::from_env`].

pub mod blockchain;   // RPC provider and signing wallet
pub mod config;       // Environment driven settings
pub mod contracts;    // Contract argument builders and wrappers
pub mod error;        // Error taxonomy
pub mod models;       // Data structures
pub mod services;     // Credential signing and metadata cache
pub mod utils;        // Helper functions
pub mod wallet;       // Issuer key material

pub use crate::blockchain::chain_client::ChainClient;
pub use crate::config::SdkConfig;
pub use crate::error::{Error, Result};
pub use crate::models::credential::{SignedCredential, VerifiableCredential, VerifiedPayload};
pub use crate::models::ddo::Ddo;
pub use crate::models::did::{derive_identifier, Did};
pub use crate::services::credential_signer::{verify_credential, CredentialSigner, SigningMethod};
pub use crate::services::metadata_cache::{MetadataCache, ValidationResult};
pub use crate::utils::crypto::{checksum_address, hash_data};
pub use crate::utils::conversion::{estimate_gas_multiplied, to_base_units, to_human_amount};
pub use crate::utils::logging::Logger;
pub use crate::utils::random::generate_id;
