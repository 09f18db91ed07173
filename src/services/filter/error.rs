//! Filter error types.
//!
//! Filters are evaluated infallibly; errors only arise while building filters
//! from textual input such as a [`FilterConfig`](crate::models::FilterConfig).

use thiserror::Error;
use tracing::error;

/// Represents errors that can occur while building filters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
	/// The input is not a 20-byte hex address
	#[error("Invalid address: {0}")]
	InvalidAddress(String),

	/// The input is neither a 4-byte hex selector nor a function signature
	#[error("Invalid function signature: {0}")]
	InvalidSignature(String),

	/// The input is not a decimal or hex 256-bit amount
	#[error("Invalid value '{value}': {reason}")]
	InvalidValue { value: String, reason: String },

	/// The filter definition is unusable as a whole
	#[error("Invalid filter config: {0}")]
	InvalidConfig(String),
}

impl FilterError {
	pub fn invalid_address(address: impl Into<String>) -> Self {
		Self::InvalidAddress(address.into())
	}

	pub fn invalid_signature(signature: impl Into<String>) -> Self {
		Self::InvalidSignature(signature.into())
	}

	pub fn invalid_value(value: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidValue {
			value: value.into(),
			reason: reason.into(),
		}
	}

	/// Creates a new config error with logging
	pub fn invalid_config(msg: impl Into<String>) -> Self {
		let error = Self::InvalidConfig(msg.into());
		error!("{}", error);
		error
	}
}
