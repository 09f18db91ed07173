//! Sender recovery error types.

use thiserror::Error;

/// Why the sender of a transaction could not be determined
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
	/// The signature does not recover to a valid public key
	#[error("Invalid signature: {0}")]
	InvalidSignature(String),

	/// The transaction was signed for another chain
	#[error("Chain id mismatch: expected {expected}, transaction has {actual}")]
	ChainIdMismatch { expected: u64, actual: u64 },
}
