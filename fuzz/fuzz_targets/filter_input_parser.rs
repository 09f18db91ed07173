#![no_main]

use blockscan::services::filter::helpers::evm::{parse_address, parse_selector, string_to_u256};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
	if let Ok(address) = parse_address(input) {
		assert_eq!(parse_address(&address.to_string()).ok(), Some(address));
	}
	let _ = parse_selector(input);
	if let Ok(value) = string_to_u256(input) {
		assert_eq!(string_to_u256(&value.to_string()).ok(), Some(value));
	}
});
