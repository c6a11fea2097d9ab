// src/contracts/params.rs
//! Creation-parameter builders for the NFT factory.
//!
//! Each builder turns a human-friendly parameter record into the positional
//! tuple the factory contract expects. Human amounts are scaled to base units
//! here and unset optional addresses become the zero address. The builders are
//! pure; the only randomness (datatoken name generation) comes from the RNG the
//! caller passes in.

use crate::error::Result;
use crate::utils::conversion::{to_base_units_u256, DEFAULT_DECIMALS};
use crate::utils::random::{generate_dt_name, WordList};
use ethers_core::abi::Token;
use ethers_core::types::{Address, Bytes, U256};
use rand::Rng;

fn or_zero(address: Option<Address>) -> Address {
    address.unwrap_or_else(Address::zero)
}

fn address_array(addresses: &[Address]) -> Token {
    Token::Array(addresses.iter().copied().map(Token::Address).collect())
}

fn uint_array(values: &[U256]) -> Token {
    Token::Array(values.iter().copied().map(Token::Uint).collect())
}

// ---------------------------------------------------------------------------
// NFT
// ---------------------------------------------------------------------------

/// Parameters of the data NFT that anchors an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftCreateParams {
    pub name: String,
    pub symbol: String,
    pub template_index: u64,
    pub token_uri: String,
    pub transferable: bool,
    pub owner: Address,
}

/// `(name, symbol, templateIndex, tokenURI, transferable, owner)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftCreateData {
    pub name: String,
    pub symbol: String,
    pub template_index: U256,
    pub token_uri: String,
    pub transferable: bool,
    pub owner: Address,
}

impl NftCreateData {
    pub fn into_token(self) -> Token {
        Token::Tuple(vec![
            Token::String(self.name),
            Token::String(self.symbol),
            Token::Uint(self.template_index),
            Token::String(self.token_uri),
            Token::Bool(self.transferable),
            Token::Address(self.owner),
        ])
    }
}

pub fn get_nft_creation_params(params: &NftCreateParams) -> NftCreateData {
    NftCreateData {
        name: params.name.clone(),
        symbol: params.symbol.clone(),
        template_index: U256::from(params.template_index),
        token_uri: params.token_uri.clone(),
        transferable: params.transferable,
        owner: params.owner,
    }
}

// ---------------------------------------------------------------------------
// Datatoken
// ---------------------------------------------------------------------------

/// Parameters of a datatoken. Amounts are human decimal strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatatokenCreateParams {
    pub template_index: u64,
    pub minter: Address,
    pub payment_collector: Option<Address>,
    pub mp_fee_address: Option<Address>,
    pub fee_token: Option<Address>,
    pub fee_amount: String,
    pub cap: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

impl DatatokenCreateParams {
    /// Defaults: template 1, unlimited-looking cap, no publish fee, generated
    /// name and symbol.
    pub fn new(minter: Address) -> Self {
        Self {
            template_index: 1,
            minter,
            payment_collector: None,
            mp_fee_address: None,
            fee_token: None,
            fee_amount: "0".to_string(),
            cap: "100000".to_string(),
            name: None,
            symbol: None,
        }
    }
}

/// `(templateIndex, strings, addresses, uints, bytess)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErcCreateData {
    pub template_index: U256,
    /// `[name, symbol]`
    pub strings: Vec<String>,
    /// `[minter, paymentCollector, mpFeeAddress, feeToken]`
    pub addresses: Vec<Address>,
    /// `[cap, feeAmount]`
    pub uints: Vec<U256>,
    pub bytess: Vec<Bytes>,
}

impl ErcCreateData {
    pub fn into_token(self) -> Token {
        Token::Tuple(vec![
            Token::Uint(self.template_index),
            Token::Array(self.strings.into_iter().map(Token::String).collect()),
            address_array(&self.addresses),
            uint_array(&self.uints),
            Token::Array(self.bytess.into_iter().map(|b| Token::Bytes(b.to_vec())).collect()),
        ])
    }
}

/// Builds the datatoken tuple.
///
/// When `name` or `symbol` is missing both are generated from `words` using
/// `rng`; a provided value always wins over the generated one.
pub fn get_erc_creation_params<R: Rng + ?Sized>(
    params: &DatatokenCreateParams,
    rng: &mut R,
    words: &WordList,
) -> Result<ErcCreateData> {
    let (name, symbol) = match (&params.name, &params.symbol) {
        (Some(name), Some(symbol)) => (name.clone(), symbol.clone()),
        (name, symbol) => {
            let generated = generate_dt_name(rng, words);
            (
                name.clone().unwrap_or(generated.name),
                symbol.clone().unwrap_or(generated.symbol),
            )
        }
    };

    Ok(ErcCreateData {
        template_index: U256::from(params.template_index),
        strings: vec![name, symbol],
        addresses: vec![
            params.minter,
            or_zero(params.payment_collector),
            or_zero(params.mp_fee_address),
            or_zero(params.fee_token),
        ],
        uints: vec![
            to_base_units_u256(&params.cap, DEFAULT_DECIMALS)?,
            to_base_units_u256(&params.fee_amount, DEFAULT_DECIMALS)?,
        ],
        bytess: Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// Fixed-rate exchange
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreCreateParams {
    pub fixed_rate_address: Address,
    pub base_token_address: Address,
    pub owner: Address,
    pub market_fee_collector: Option<Address>,
    pub base_token_decimals: u8,
    pub datatoken_decimals: u8,
    /// Base tokens per datatoken.
    pub fixed_rate: String,
    /// Fraction of each swap kept by the market, e.g. `"0.001"`.
    pub market_fee: String,
    pub allowed_consumer: Option<Address>,
    pub with_mint: bool,
}

/// `(fixedPriceAddress, addresses, uints)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreCreateData {
    pub fixed_price_address: Address,
    /// `[baseToken, owner, marketFeeCollector, allowedConsumer]`
    pub addresses: Vec<Address>,
    /// `[baseTokenDecimals, datatokenDecimals, fixedRate, marketFee, withMint]`
    pub uints: Vec<U256>,
}

impl FreCreateData {
    pub fn into_token(self) -> Token {
        Token::Tuple(vec![
            Token::Address(self.fixed_price_address),
            address_array(&self.addresses),
            uint_array(&self.uints),
        ])
    }
}

pub fn get_fre_creation_params(params: &FreCreateParams) -> Result<FreCreateData> {
    Ok(FreCreateData {
        fixed_price_address: params.fixed_rate_address,
        addresses: vec![
            params.base_token_address,
            params.owner,
            or_zero(params.market_fee_collector),
            or_zero(params.allowed_consumer),
        ],
        uints: vec![
            U256::from(params.base_token_decimals),
            U256::from(params.datatoken_decimals),
            to_base_units_u256(&params.fixed_rate, DEFAULT_DECIMALS)?,
            to_base_units_u256(&params.market_fee, DEFAULT_DECIMALS)?,
            U256::from(u8::from(params.with_mint)),
        ],
    })
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolCreateParams {
    pub ss_contract: Address,
    pub base_token_address: Address,
    pub base_token_sender: Address,
    pub publisher_address: Address,
    pub market_fee_collector: Option<Address>,
    pub pool_template_address: Address,
    pub rate: String,
    pub base_token_decimals: u8,
    pub vesting_amount: String,
    pub vested_blocks: u64,
    /// In base-token units, scaled with `base_token_decimals`.
    pub initial_base_token_liquidity: String,
    pub swap_fee_liquidity_provider: String,
    pub swap_fee_market_runner: String,
}

/// `(addresses, ssParams, swapFees)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolCreateData {
    /// `[ssContract, baseToken, baseTokenSender, publisher, marketFeeCollector, poolTemplate]`
    pub addresses: Vec<Address>,
    /// `[rate, baseTokenDecimals, vestingAmount, vestedBlocks, initialBaseTokenLiquidity]`
    pub ss_params: Vec<U256>,
    /// `[liquidityProviderFee, marketRunnerFee]`
    pub swap_fees: Vec<U256>,
}

impl PoolCreateData {
    pub fn into_token(self) -> Token {
        Token::Tuple(vec![
            address_array(&self.addresses),
            uint_array(&self.ss_params),
            uint_array(&self.swap_fees),
        ])
    }
}

pub fn get_pool_creation_params(params: &PoolCreateParams) -> Result<PoolCreateData> {
    Ok(PoolCreateData {
        addresses: vec![
            params.ss_contract,
            params.base_token_address,
            params.base_token_sender,
            params.publisher_address,
            or_zero(params.market_fee_collector),
            params.pool_template_address,
        ],
        ss_params: vec![
            to_base_units_u256(&params.rate, DEFAULT_DECIMALS)?,
            U256::from(params.base_token_decimals),
            to_base_units_u256(&params.vesting_amount, DEFAULT_DECIMALS)?,
            U256::from(params.vested_blocks),
            to_base_units_u256(&params.initial_base_token_liquidity, params.base_token_decimals)?,
        ],
        swap_fees: vec![
            to_base_units_u256(&params.swap_fee_liquidity_provider, DEFAULT_DECIMALS)?,
            to_base_units_u256(&params.swap_fee_market_runner, DEFAULT_DECIMALS)?,
        ],
    })
}

// ---------------------------------------------------------------------------
// Dispenser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispenserCreateParams {
    pub dispenser_address: Address,
    pub max_tokens: String,
    pub max_balance: String,
    pub with_mint: bool,
    pub allowed_swapper: Option<Address>,
}

/// `(dispenserAddress, maxTokens, maxBalance, withMint, allowedSwapper)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispenserCreateData {
    pub dispenser_address: Address,
    pub max_tokens: U256,
    pub max_balance: U256,
    pub with_mint: bool,
    pub allowed_swapper: Address,
}

impl DispenserCreateData {
    pub fn into_token(self) -> Token {
        Token::Tuple(vec![
            Token::Address(self.dispenser_address),
            Token::Uint(self.max_tokens),
            Token::Uint(self.max_balance),
            Token::Bool(self.with_mint),
            Token::Address(self.allowed_swapper),
        ])
    }
}

pub fn get_dispenser_creation_params(params: &DispenserCreateParams) -> Result<DispenserCreateData> {
    Ok(DispenserCreateData {
        dispenser_address: params.dispenser_address,
        max_tokens: to_base_units_u256(&params.max_tokens, DEFAULT_DECIMALS)?,
        max_balance: to_base_units_u256(&params.max_balance, DEFAULT_DECIMALS)?,
        with_mint: params.with_mint,
        allowed_swapper: or_zero(params.allowed_swapper),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn wei(value: u128) -> U256 {
        U256::from(value)
    }

    const ONE: u128 = 1_000_000_000_000_000_000;

    fn pool_params() -> PoolCreateParams {
        PoolCreateParams {
            ss_contract: addr(1),
            base_token_address: addr(2),
            base_token_sender: addr(3),
            publisher_address: addr(4),
            market_fee_collector: None,
            pool_template_address: addr(6),
            rate: "1".into(),
            base_token_decimals: 6,
            vesting_amount: "10000".into(),
            vested_blocks: 2_500_000,
            initial_base_token_liquidity: "2000.5".into(),
            swap_fee_liquidity_provider: "0.001".into(),
            swap_fee_market_runner: "0.0005".into(),
        }
    }

    #[test]
    fn test_pool_params_zero_fill_and_scale() {
        let data = get_pool_creation_params(&pool_params()).unwrap();
        assert_eq!(
            data.addresses,
            vec![addr(1), addr(2), addr(3), addr(4), Address::zero(), addr(6)]
        );
        assert_eq!(
            data.ss_params,
            vec![
                wei(ONE),
                U256::from(6),
                wei(10_000 * ONE),
                U256::from(2_500_000),
                U256::from(2_000_500_000u64),
            ]
        );
        assert_eq!(data.swap_fees, vec![wei(ONE / 1000), wei(ONE / 2000)]);
    }

    #[test]
    fn test_pool_params_keep_explicit_collector() {
        let mut params = pool_params();
        params.market_fee_collector = Some(addr(5));
        let data = get_pool_creation_params(&params).unwrap();
        assert_eq!(data.addresses[4], addr(5));
    }

    #[test]
    fn test_pool_params_reject_bad_amount() {
        let mut params = pool_params();
        params.rate = "one".into();
        assert!(matches!(get_pool_creation_params(&params), Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn test_fre_params() {
        let params = FreCreateParams {
            fixed_rate_address: addr(9),
            base_token_address: addr(2),
            owner: addr(3),
            market_fee_collector: Some(addr(4)),
            base_token_decimals: 18,
            datatoken_decimals: 18,
            fixed_rate: "2.5".into(),
            market_fee: "0.001".into(),
            allowed_consumer: None,
            with_mint: false,
        };
        let data = get_fre_creation_params(&params).unwrap();
        assert_eq!(data.fixed_price_address, addr(9));
        assert_eq!(data.addresses, vec![addr(2), addr(3), addr(4), Address::zero()]);
        assert_eq!(
            data.uints,
            vec![U256::from(18), U256::from(18), wei(5 * ONE / 2), wei(ONE / 1000), U256::zero()]
        );

        match data.into_token() {
            Token::Tuple(items) => assert_eq!(items.len(), 3),
            other => panic!("unexpected token {other:?}"),
        }
    }

    #[test]
    fn test_erc_params_generate_names_deterministically() {
        let params = DatatokenCreateParams::new(addr(7));
        let words = WordList::default();
        let a = get_erc_creation_params(&params, &mut StdRng::seed_from_u64(11), &words).unwrap();
        let b = get_erc_creation_params(&params, &mut StdRng::seed_from_u64(11), &words).unwrap();
        assert_eq!(a, b);
        assert!(a.strings[0].ends_with(" Token"));
        assert_eq!(a.addresses, vec![addr(7), Address::zero(), Address::zero(), Address::zero()]);
        assert_eq!(a.uints, vec![wei(100_000 * ONE), U256::zero()]);
        assert!(a.bytess.is_empty());
    }

    #[test]
    fn test_erc_params_keep_given_names() {
        let mut params = DatatokenCreateParams::new(addr(7));
        params.name = Some("Weather Token".into());
        params.symbol = Some("WTH".into());
        params.fee_amount = "0.5".into();
        params.fee_token = Some(addr(8));
        let data = get_erc_creation_params(&params, &mut StdRng::seed_from_u64(1), &WordList::default()).unwrap();
        assert_eq!(data.strings, vec!["Weather Token".to_string(), "WTH".to_string()]);
        assert_eq!(data.addresses[3], addr(8));
        assert_eq!(data.uints[1], wei(ONE / 2));
    }

    #[test]
    fn test_erc_params_fill_only_missing_symbol() {
        let mut params = DatatokenCreateParams::new(addr(7));
        params.name = Some("Weather Token".into());
        let data = get_erc_creation_params(&params, &mut StdRng::seed_from_u64(2), &WordList::default()).unwrap();
        assert_eq!(data.strings[0], "Weather Token");
        assert!(data.strings[1].contains('-'));
    }

    #[test]
    fn test_dispenser_params() {
        let data = get_dispenser_creation_params(&DispenserCreateParams {
            dispenser_address: addr(1),
            max_tokens: "1".into(),
            max_balance: "1".into(),
            with_mint: true,
            allowed_swapper: None,
        })
        .unwrap();
        assert_eq!(data.max_tokens, wei(ONE));
        assert_eq!(data.allowed_swapper, Address::zero());
        assert!(data.with_mint);
    }

    #[test]
    fn test_nft_params_token_shape() {
        let data = get_nft_creation_params(&NftCreateParams {
            name: "Data NFT".into(),
            symbol: "DNFT".into(),
            template_index: 1,
            token_uri: "https://oceanprotocol.com/nft/".into(),
            transferable: true,
            owner: addr(3),
        });
        assert_eq!(
            data.into_token(),
            Token::Tuple(vec![
                Token::String("Data NFT".into()),
                Token::String("DNFT".into()),
                Token::Uint(U256::one()),
                Token::String("https://oceanprotocol.com/nft/".into()),
                Token::Bool(true),
                Token::Address(addr(3)),
            ])
        );
    }
}
