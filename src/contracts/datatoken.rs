// src/contracts/datatoken.rs
//! ERC-20 datatoken interface.
//!
//! Thin wrapper that speaks human amounts: every amount going in is scaled with
//! the token's own `decimals()` and every amount coming out is formatted back.

use crate::blockchain::chain_client::ChainClient;
use crate::error::{Error, Result};
use crate::utils::conversion::{to_base_units_u256, units_to_human};
use ethers_core::abi::{parse_abi, Abi};
use ethers_core::types::{Address, TransactionReceipt, U256};
use std::sync::Arc;

const ERC20_ABI: &[&str] = &[
    "function decimals() view returns (uint8)",
    "function balanceOf(address) view returns (uint256)",
    "function allowance(address,address) view returns (uint256)",
    "function cap() view returns (uint256)",
    "function transfer(address,uint256) returns (bool)",
    "function approve(address,uint256) returns (bool)",
];

pub(crate) fn erc20_abi() -> Result<Abi> {
    parse_abi(ERC20_ABI).map_err(|e| Error::Contract(format!("ERC-20 ABI: {e}")))
}

/// Datatoken (or any ERC-20) contract wrapper.
#[derive(Clone)]
pub struct Datatoken {
    client: Arc<ChainClient>,
    abi: Abi,
}

impl Datatoken {
    pub fn new(client: Arc<ChainClient>) -> Result<Self> {
        Ok(Self { client, abi: erc20_abi()? })
    }

    pub async fn decimals(&self, token: Address) -> Result<u8> {
        self.client.query_contract(token, &self.abi, "decimals", ()).await
    }

    /// Scales `amount` with the token's decimals, rounding down.
    pub async fn amount_to_units(&self, token: Address, amount: &str) -> Result<U256> {
        let decimals = self.decimals(token).await?;
        to_base_units_u256(amount, decimals)
    }

    /// Formats `units` with the token's decimals.
    pub async fn units_to_amount(&self, token: Address, units: U256) -> Result<String> {
        let decimals = self.decimals(token).await?;
        Ok(units_to_human(units, decimals))
    }

    pub async fn balance(&self, token: Address, owner: Address) -> Result<String> {
        let units: U256 = self.client.query_contract(token, &self.abi, "balanceOf", owner).await?;
        self.units_to_amount(token, units).await
    }

    pub async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<String> {
        let units: U256 = self
            .client
            .query_contract(token, &self.abi, "allowance", (owner, spender))
            .await?;
        self.units_to_amount(token, units).await
    }

    pub async fn cap(&self, token: Address) -> Result<String> {
        let units: U256 = self.client.query_contract(token, &self.abi, "cap", ()).await?;
        self.units_to_amount(token, units).await
    }

    pub async fn transfer(&self, token: Address, to: Address, amount: &str) -> Result<TransactionReceipt> {
        let units = self.amount_to_units(token, amount).await?;
        self.client.send_transaction(token, &self.abi, "transfer", (to, units)).await
    }

    pub async fn approve(&self, token: Address, spender: Address, amount: &str) -> Result<TransactionReceipt> {
        let units = self.amount_to_units(token, amount).await?;
        self.client.send_transaction(token, &self.abi, "approve", (spender, units)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abi_exposes_used_methods() {
        let abi = erc20_abi().unwrap();
        for method in ["decimals", "balanceOf", "allowance", "cap", "transfer", "approve"] {
            assert!(abi.function(method).is_ok(), "{method}");
        }
        let transfer = abi.function("transfer").unwrap();
        assert_eq!(transfer.inputs.len(), 2);
    }
}
