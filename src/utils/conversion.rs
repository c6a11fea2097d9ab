// src/utils/conversion.rs
//! Conversion between human-readable token amounts and integer base units.
//!
//! Human amounts are plain decimal numerals (`"1.5"`, `"0.0001"`, `"42"`). Base
//! units are the integer quantity in the token's smallest denomination. All
//! arithmetic happens on arbitrary-precision integers; no floating point value
//! ever stands between the two representations.
//!
//! Scaling from human to base units always rounds down: fractional digits beyond
//! the token's precision are truncated.

use crate::error::{Error, Result};
use ethers_core::types::U256;
use num_bigint::BigUint;

/// Precision used by datatokens and by most base tokens.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Padding applied to the node's gas price before sending a transaction.
pub const DEFAULT_GAS_FEE_MULTIPLIER: &str = "1.05";

/// Splits a non-negative decimal numeral into its integer and fractional digits.
fn split_decimal(value: &str) -> Result<(&str, &str)> {
    let (integer, fraction) = match value.split_once('.') {
        Some((integer, fraction)) if !fraction.is_empty() => (integer, fraction),
        Some(_) => return Err(Error::InvalidAmount(value.to_string())),
        None => (value, ""),
    };

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if integer.is_empty() || !is_digits(integer) || !is_digits(fraction) {
        return Err(Error::InvalidAmount(value.to_string()));
    }

    Ok((integer, fraction))
}

fn parse_digits(digits: &str, original: &str) -> Result<BigUint> {
    BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| Error::InvalidAmount(original.to_string()))
}

fn pow10(exponent: u32) -> BigUint {
    BigUint::from(10u32).pow(exponent)
}

fn to_u256(value: &BigUint, original: &str) -> Result<U256> {
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return Err(Error::InvalidAmount(format!("{original} does not fit in 256 bits")));
    }
    Ok(U256::from_big_endian(&bytes))
}

fn from_u256(value: U256) -> BigUint {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    BigUint::from_bytes_be(&buf)
}

fn scale_to_units(human_amount: &str, decimals: u8) -> Result<BigUint> {
    let (integer, fraction) = split_decimal(human_amount)?;
    let precision = decimals as usize;

    let kept = &fraction[..fraction.len().min(precision)];
    let mut digits = String::with_capacity(integer.len() + precision);
    digits.push_str(integer);
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(precision - kept.len()));

    parse_digits(&digits, human_amount)
}

fn format_units(units: &BigUint, decimals: u8) -> String {
    let divisor = pow10(decimals as u32);
    let whole = units / &divisor;
    let remainder = units % &divisor;

    if remainder == BigUint::ZERO {
        return whole.to_string();
    }

    let fraction = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Converts a human decimal amount into base units, rounding down.
///
/// # Example
/// ```
/// use ocean_sdk::utils::conversion::to_base_units;
/// assert_eq!(to_base_units("1.5", 18).unwrap(), "1500000000000000000");
/// assert_eq!(to_base_units("0.129", 2).unwrap(), "12");
/// ```
///
/// # Errors
/// `Error::InvalidAmount` when `human_amount` is not of the form `digits` or
/// `digits.digits`.
pub fn to_base_units(human_amount: &str, decimals: u8) -> Result<String> {
    scale_to_units(human_amount, decimals).map(|units| units.to_string())
}

/// Same as [`to_base_units`] but yields a `U256` ready for an ABI tuple.
pub fn to_base_units_u256(human_amount: &str, decimals: u8) -> Result<U256> {
    let units = scale_to_units(human_amount, decimals)?;
    to_u256(&units, human_amount)
}

/// Converts an integer amount of base units into its exact decimal form.
///
/// The result is minimal: no leading zeros in the integer part, no trailing
/// zeros in the fraction and no fraction at all for whole amounts.
pub fn to_human_amount(base_units: &str, decimals: u8) -> Result<String> {
    if base_units.is_empty() || !base_units.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidAmount(base_units.to_string()));
    }

    let units = parse_digits(base_units, base_units)?;
    Ok(format_units(&units, decimals))
}

/// Formats a `U256` amount of base units as a human decimal string.
pub fn units_to_human(units: U256, decimals: u8) -> String {
    format_units(&from_u256(units), decimals)
}

/// Multiplies `base_gas_price` by a decimal `multiplier` and rounds down.
///
/// ```
/// use ethers_core::types::U256;
/// use ocean_sdk::utils::conversion::estimate_gas_multiplied;
/// assert_eq!(estimate_gas_multiplied(U256::from(99), "1.05").unwrap(), U256::from(103));
/// ```
pub fn estimate_gas_multiplied(base_gas_price: U256, multiplier: &str) -> Result<U256> {
    let (integer, fraction) = split_decimal(multiplier)?;
    let mantissa = parse_digits(&format!("{integer}{fraction}"), multiplier)?;
    let product = from_u256(base_gas_price) * mantissa / pow10(fraction.len() as u32);
    to_u256(&product, multiplier)
}
