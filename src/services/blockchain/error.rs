//! Blockchain error types and handling.
//!
//! Errors raised while talking to a node. Connection and subscription failures
//! are fatal for a scan session and are logged when constructed; request
//! failures concern a single block and are left to the caller to report.

use alloy::primitives::B256;
use thiserror::Error;
use tracing::error;

/// Represents possible errors that can occur during blockchain operations
#[derive(Debug, Error)]
pub enum BlockChainError {
	/// The node could not be reached
	#[error("Connection error: {0}")]
	ConnectionError(String),

	/// The node refused or failed to open a header subscription
	#[error("Subscription error: {0}")]
	SubscriptionError(String),

	/// Errors related to malformed requests or invalid responses
	#[error("Request error: {0}")]
	RequestError(String),

	/// When a requested block cannot be found on the blockchain
	///
	/// Contains the hash of the block that was not found
	#[error("Block not found: {0}")]
	BlockNotFound(B256),
}

impl BlockChainError {
	/// Creates a new connection error with logging
	pub fn connection_error(msg: impl Into<String>) -> Self {
		let error = Self::ConnectionError(msg.into());
		error!("{}", error);
		error
	}

	/// Creates a new subscription error with logging
	pub fn subscription_error(msg: impl Into<String>) -> Self {
		let error = Self::SubscriptionError(msg.into());
		error!("{}", error);
		error
	}

	pub fn request_error(msg: impl Into<String>) -> Self {
		Self::RequestError(msg.into())
	}

	pub fn block_not_found(hash: B256) -> Self {
		Self::BlockNotFound(hash)
	}
}
