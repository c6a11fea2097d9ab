// src/contracts/nft_factory.rs
//! NFT factory smart contract interface.
//!
//! Publishes a data NFT together with its first datatoken and, optionally, a
//! pricing schema (fixed-rate exchange, dispenser or pool) in one transaction.
//! Argument tuples come from [`crate::contracts::params`].

use crate::blockchain::chain_client::ChainClient;
use crate::contracts::params::{
    get_dispenser_creation_params, get_erc_creation_params, get_fre_creation_params,
    get_nft_creation_params, get_pool_creation_params, DatatokenCreateParams,
    DispenserCreateParams, FreCreateParams, NftCreateParams, PoolCreateParams,
};
use crate::error::{Error, Result};
use crate::utils::random::WordList;
use ethers_core::abi::{parse_abi, Abi};
use ethers_core::types::{Address, TransactionReceipt, U256};
use std::sync::Arc;

const NFT_TUPLE: &str = "tuple(string,string,uint256,string,bool,address)";
const ERC_TUPLE: &str = "tuple(uint256,string[],address[],uint256[],bytes[])";
const FRE_TUPLE: &str = "tuple(address,address[],uint256[])";
const DISPENSER_TUPLE: &str = "tuple(address,uint256,uint256,bool,address)";
const POOL_TUPLE: &str = "tuple(address[],uint256[],uint256[])";

pub(crate) fn nft_factory_abi() -> Result<Abi> {
    let signatures = [
        format!("function createNftWithErc20({NFT_TUPLE},{ERC_TUPLE}) returns (address,address)"),
        format!(
            "function createNftWithErc20WithFixedRate({NFT_TUPLE},{ERC_TUPLE},{FRE_TUPLE}) returns (address,address,bytes32)"
        ),
        format!(
            "function createNftWithErc20WithDispenser({NFT_TUPLE},{ERC_TUPLE},{DISPENSER_TUPLE}) returns (address,address)"
        ),
        format!(
            "function createNftWithErc20WithPool({NFT_TUPLE},{ERC_TUPLE},{POOL_TUPLE}) returns (address,address,address)"
        ),
        "function getCurrentNFTCount() view returns (uint256)".to_string(),
    ];
    let signatures: Vec<&str> = signatures.iter().map(String::as_str).collect();
    parse_abi(&signatures).map_err(|e| Error::Contract(format!("NFT factory ABI: {e}")))
}

fn count_to_u64(count: U256) -> Result<u64> {
    if count > U256::from(u64::MAX) {
        return Err(Error::Contract(format!("getCurrentNFTCount: {count} does not fit in u64")));
    }
    Ok(count.as_u64())
}

/// NFT factory contract wrapper.
///
/// Datatoken names are generated from `words` when the caller leaves them out.
#[derive(Clone)]
pub struct NftFactory {
    client: Arc<ChainClient>,
    address: Address,
    abi: Abi,
    words: WordList,
}

impl NftFactory {
    pub fn new(client: Arc<ChainClient>, address: Address) -> Result<Self> {
        Ok(Self {
            client,
            address,
            abi: nft_factory_abi()?,
            words: WordList::default(),
        })
    }

    /// Uses a custom vocabulary for generated datatoken names.
    pub fn with_word_list(mut self, words: WordList) -> Self {
        self.words = words;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn nft_count(&self) -> Result<u64> {
        let count: U256 = self
            .client
            .query_contract(self.address, &self.abi, "getCurrentNFTCount", ())
            .await?;
        count_to_u64(count)
    }

    pub async fn create_nft_with_datatoken(
        &self,
        nft: &NftCreateParams,
        datatoken: &DatatokenCreateParams,
    ) -> Result<TransactionReceipt> {
        let nft = get_nft_creation_params(nft).into_token();
        let erc = get_erc_creation_params(datatoken, &mut rand::thread_rng(), &self.words)?.into_token();
        self.client
            .send_transaction(self.address, &self.abi, "createNftWithErc20", (nft, erc))
            .await
    }

    pub async fn create_nft_with_datatoken_with_fixed_rate(
        &self,
        nft: &NftCreateParams,
        datatoken: &DatatokenCreateParams,
        fixed_rate: &FreCreateParams,
    ) -> Result<TransactionReceipt> {
        let nft = get_nft_creation_params(nft).into_token();
        let erc = get_erc_creation_params(datatoken, &mut rand::thread_rng(), &self.words)?.into_token();
        let fre = get_fre_creation_params(fixed_rate)?.into_token();
        self.client
            .send_transaction(self.address, &self.abi, "createNftWithErc20WithFixedRate", (nft, erc, fre))
            .await
    }

    pub async fn create_nft_with_datatoken_with_dispenser(
        &self,
        nft: &NftCreateParams,
        datatoken: &DatatokenCreateParams,
        dispenser: &DispenserCreateParams,
    ) -> Result<TransactionReceipt> {
        let nft = get_nft_creation_params(nft).into_token();
        let erc = get_erc_creation_params(datatoken, &mut rand::thread_rng(), &self.words)?.into_token();
        let dispenser = get_dispenser_creation_params(dispenser)?.into_token();
        self.client
            .send_transaction(
                self.address,
                &self.abi,
                "createNftWithErc20WithDispenser",
                (nft, erc, dispenser),
            )
            .await
    }

    pub async fn create_nft_with_datatoken_with_pool(
        &self,
        nft: &NftCreateParams,
        datatoken: &DatatokenCreateParams,
        pool: &PoolCreateParams,
    ) -> Result<TransactionReceipt> {
        let nft = get_nft_creation_params(nft).into_token();
        let erc = get_erc_creation_params(datatoken, &mut rand::thread_rng(), &self.words)?.into_token();
        let pool = get_pool_creation_params(pool)?.into_token();
        self.client
            .send_transaction(self.address, &self.abi, "createNftWithErc20WithPool", (nft, erc, pool))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::abi::ParamType;

    #[test]
    fn test_abi_parses_tuple_arguments() {
        let abi = nft_factory_abi().unwrap();
        let with_pool = abi.function("createNftWithErc20WithPool").unwrap();
        assert_eq!(with_pool.inputs.len(), 3);
        assert_eq!(
            with_pool.inputs[2].kind,
            ParamType::Tuple(vec![
                ParamType::Array(Box::new(ParamType::Address)),
                ParamType::Array(Box::new(ParamType::Uint(256))),
                ParamType::Array(Box::new(ParamType::Uint(256))),
            ])
        );
        assert_eq!(abi.function("createNftWithErc20WithFixedRate").unwrap().outputs.len(), 3);
    }

    #[test]
    fn test_abi_parses_every_create_method() {
        let abi = nft_factory_abi().unwrap();
        for (method, inputs) in [
            ("createNftWithErc20", 2),
            ("createNftWithErc20WithFixedRate", 3),
            ("createNftWithErc20WithDispenser", 3),
            ("createNftWithErc20WithPool", 3),
        ] {
            assert_eq!(abi.function(method).unwrap().inputs.len(), inputs, "{method}");
        }
        let with_nft = abi.function("createNftWithErc20").unwrap();
        assert_eq!(
            with_nft.inputs[0].kind,
            ParamType::Tuple(vec![
                ParamType::String,
                ParamType::String,
                ParamType::Uint(256),
                ParamType::String,
                ParamType::Bool,
                ParamType::Address,
            ])
        );
    }

    #[test]
    fn test_nft_count_rejects_oversized_values() {
        assert_eq!(count_to_u64(U256::from(42)).unwrap(), 42);
        assert_eq!(count_to_u64(U256::from(u64::MAX)).unwrap(), u64::MAX);
        let too_big = U256::from(u64::MAX) + U256::one();
        assert!(matches!(count_to_u64(too_big), Err(Error::Contract(_))));
    }
}
