// src/blockchain/chain_client.rs
//! EVM chain client implementation.
//!
//! The contract-invocation boundary of the SDK: every on-chain call goes through
//! [`ChainClient`], which pairs an HTTP JSON-RPC provider with a local signing
//! wallet. Callers hand it a contract address, an ABI, a method name and the
//! ordered argument tuple; the client never builds calldata by hand.

use crate::error::{Error, Result};
use crate::utils::conversion::{estimate_gas_multiplied, DEFAULT_GAS_FEE_MULTIPLIER};
use crate::utils::logging::Logger;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers_contract::{BaseContract, Contract};
use ethers_core::abi::{Abi, Detokenize, Tokenize};
use ethers_core::types::{Address, TransactionReceipt, U256};
use std::fmt::Display;
use std::sync::Arc;

type SignerClient = SignerMiddleware<Arc<Provider<Http>>, LocalWallet>;

fn contract_error(method: &str, err: impl Display) -> Error {
    Error::Contract(format!("{method}: {err}"))
}

/// Chain client for managing wallet and contract interactions.
///
/// This client provides:
/// - Transaction sending with a padded gas price
/// - Gas estimation
/// - Read-only contract queries
#[derive(Clone)]
pub struct ChainClient {
    /// RPC provider used for reads
    provider: Arc<Provider<Http>>,
    /// Provider wrapped with the signing wallet, used for writes
    signer: Arc<SignerClient>,
    chain_id: u64,
    gas_fee_multiplier: String,
    logger: Logger,
}

impl ChainClient {
    /// Creates a new chain client instance.
    ///
    /// # Arguments
    /// * `rpc_url` - JSON-RPC endpoint URL
    /// * `private_key` - Hex-encoded private key (with or without 0x prefix)
    /// * `gas_fee_multiplier` - decimal applied to the node's gas price
    /// * `logger` - sink for transaction logs
    ///
    /// # Errors
    /// Returns error if:
    /// - The RPC URL cannot be parsed
    /// - Private key is invalid
    /// - Chain ID cannot be retrieved
    /// - The multiplier is not a decimal numeral
    pub async fn new(rpc_url: &str, private_key: &str, gas_fee_multiplier: &str, logger: Logger) -> Result<Self> {
        // Reject a malformed multiplier before connecting.
        estimate_gas_multiplied(U256::one(), gas_fee_multiplier)?;

        let provider = Arc::new(
            Provider::<Http>::try_from(rpc_url).map_err(|e| contract_error("connect", e))?,
        );
        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| contract_error("eth_chainId", e))?
            .as_u64();

        let wallet = private_key
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| contract_error("wallet", e))?
            .with_chain_id(chain_id);
        let signer = Arc::new(SignerMiddleware::new(provider.clone(), wallet));

        let logger = logger.with_target("ocean_sdk::chain");
        logger.info(format_args!("connected to chain {chain_id} at {rpc_url}"));

        Ok(Self {
            provider,
            signer,
            chain_id,
            gas_fee_multiplier: gas_fee_multiplier.to_string(),
            logger,
        })
    }

    /// Same as [`ChainClient::new`] with the default 1.05 multiplier.
    pub async fn with_default_multiplier(rpc_url: &str, private_key: &str, logger: Logger) -> Result<Self> {
        Self::new(rpc_url, private_key, DEFAULT_GAS_FEE_MULTIPLIER, logger).await
    }

    /// Address of the signing wallet.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Node gas price padded by the configured multiplier, rounded down.
    pub async fn fair_gas_price(&self) -> Result<U256> {
        let base = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| contract_error("eth_gasPrice", e))?;
        estimate_gas_multiplied(base, &self.gas_fee_multiplier)
    }

    fn contract(&self, address: Address, abi: &Abi) -> Contract<SignerClient> {
        Contract::new(address, BaseContract::from(abi.clone()), self.signer.clone())
    }

    /// Estimates the gas a transaction would use without sending it.
    pub async fn estimate_gas(
        &self,
        contract_address: Address,
        abi: &Abi,
        method: &str,
        params: impl Tokenize,
    ) -> Result<U256> {
        self.contract(contract_address, abi)
            .method::<_, ()>(method, params)
            .map_err(|e| contract_error(method, e))?
            .estimate_gas()
            .await
            .map_err(|e| contract_error(method, e))
    }

    /// Sends a state-changing call and waits for its receipt.
    ///
    /// Gas is estimated first and the gas price is [`ChainClient::fair_gas_price`].
    ///
    /// # Errors
    /// Returns `Error::Contract` if the method is not in `abi`, estimation
    /// reverts, sending fails or the transaction is dropped.
    pub async fn send_transaction(
        &self,
        contract_address: Address,
        abi: &Abi,
        method: &str,
        params: impl Tokenize,
    ) -> Result<TransactionReceipt> {
        let contract = self.contract(contract_address, abi);
        let call = contract
            .method::<_, ()>(method, params)
            .map_err(|e| contract_error(method, e))?;

        let gas = call.estimate_gas().await.map_err(|e| contract_error(method, e))?;
        let gas_price = self.fair_gas_price().await?;
        self.logger.debug(format_args!(
            "sending {method} to {contract_address:?} (gas {gas}, gas price {gas_price})"
        ));

        let call = call.gas(gas).gas_price(gas_price);
        let pending = call.send().await.map_err(|e| contract_error(method, e))?;
        let receipt = pending
            .await
            .map_err(|e| contract_error(method, e))?
            .ok_or_else(|| Error::Contract(format!("{method}: transaction dropped from mempool")))?;

        self.logger.info(format_args!(
            "{method} mined in tx {:?} (block {:?})",
            receipt.transaction_hash, receipt.block_number
        ));
        Ok(receipt)
    }

    /// Queries a smart contract (read-only operation).
    ///
    /// # Returns
    /// Decoded return value from the contract call
    pub async fn query_contract<R: Detokenize>(
        &self,
        contract_address: Address,
        abi: &Abi,
        method: &str,
        params: impl Tokenize,
    ) -> Result<R> {
        let contract = Contract::new(contract_address, BaseContract::from(abi.clone()), self.provider.clone());
        contract
            .method::<_, R>(method, params)
            .map_err(|e| contract_error(method, e))?
            .call()
            .await
            .map_err(|e| contract_error(method, e))
    }
}
