//! Helper functions for EVM-specific parsing.
//!
//! Addresses are compared case-insensitively, so they are parsed into
//! [`Address`] values once instead of being compared as strings.

use alloy::primitives::{keccak256, Address, U256};
use std::str::FromStr;

use crate::services::filter::FilterError;

/// Strips an optional `0x`/`0X` prefix and surrounding whitespace
pub fn strip_hex_prefix(value: &str) -> &str {
	let trimmed = value.trim();
	trimmed
		.strip_prefix("0x")
		.or_else(|| trimmed.strip_prefix("0X"))
		.unwrap_or(trimmed)
}

/// Normalizes an address string by removing the "0x" prefix, spaces, and converting to lowercase.
pub fn normalize_address(address: &str) -> String {
	strip_hex_prefix(address).replace(' ', "").to_lowercase()
}

/// Parses a hex address, case-insensitively.
///
/// Short inputs are left-padded with zeroes (`0xabc` is
/// `0x0000000000000000000000000000000000000abc`). Inputs longer than 20 bytes are
/// rejected.
pub fn parse_address(address: &str) -> Result<Address, FilterError> {
	let normalized = normalize_address(address);
	if normalized.is_empty() || normalized.len() > 40 {
		return Err(FilterError::invalid_address(address));
	}

	let padded = format!("{:0>40}", normalized);
	let bytes = hex::decode(&padded).map_err(|_| FilterError::invalid_address(address))?;
	Ok(Address::from_slice(&bytes))
}

/// Removes whitespace from a textual function signature.
///
/// Case is preserved: function names are case-sensitive in the selector hash.
pub fn normalize_signature(signature: &str) -> String {
	signature.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parses a function selector.
///
/// Accepts four hex bytes with or without `0x` (`a9059cbb`, `0xA9059CBB`) or a
/// textual signature (`transfer(address, uint256)`), which is hashed.
pub fn parse_selector(signature: &str) -> Result<[u8; 4], FilterError> {
	if signature.contains('(') {
		let normalized = normalize_signature(signature);
		if !normalized.ends_with(')') {
			return Err(FilterError::invalid_signature(signature));
		}
		let hash = keccak256(normalized.as_bytes());
		let mut selector = [0u8; 4];
		selector.copy_from_slice(&hash[..4]);
		return Ok(selector);
	}

	let bytes =
		hex::decode(strip_hex_prefix(signature)).map_err(|_| FilterError::invalid_signature(signature))?;
	<[u8; 4]>::try_from(bytes.as_slice()).map_err(|_| FilterError::invalid_signature(signature))
}

/// Converts a decimal or `0x`-prefixed hex string to a U256 value.
pub fn string_to_u256(value_str: &str) -> Result<U256, FilterError> {
	let trimmed = value_str.trim();

	if trimmed.is_empty() {
		return Err(FilterError::invalid_value(value_str, "input string is empty"));
	}

	if let Some(hex_val) = trimmed
		.strip_prefix("0x")
		.or_else(|| trimmed.strip_prefix("0X"))
	{
		if hex_val.is_empty() {
			return Err(FilterError::invalid_value(
				value_str,
				"hex string '0x' is missing value digits",
			));
		}
		U256::from_str_radix(hex_val, 16)
			.map_err(|e| FilterError::invalid_value(value_str, e.to_string()))
	} else {
		U256::from_str(trimmed).map_err(|e| FilterError::invalid_value(value_str, e.to_string()))
	}
}
