pub mod chain_client;
