//! Declarative filter definitions.
//!
//! A `FilterConfig` lists conditions that must all hold for a transaction to
//! match. A list of them forms a filter set where any entry may match. Values
//! are strings so amounts beyond the JSON number range survive parsing; they
//! accept decimal or `0x`-prefixed hex.
//!
//! ```json
//! [
//!   { "value_gt": "1000" },
//!   { "to": "0x00000000000000000000000000000000000abc", "signature": "0xa9059cbb" }
//! ]
//! ```

use serde::{Deserialize, Serialize};

/// Conjunction of transaction conditions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
	/// Destination address
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to: Option<String>,
	/// Recovered sender address
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value_gt: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value_lt: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cost_gt: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cost_lt: Option<String>,
	/// Four byte selector (`0xa9059cbb`) or a function signature (`transfer(address,uint256)`)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub signature: Option<String>,
}

impl FilterConfig {
	/// Returns true when no condition is set
	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}
}
