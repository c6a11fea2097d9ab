pub mod credential_signer;
pub mod metadata_cache;
