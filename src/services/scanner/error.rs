//! Scanner error types.
//!
//! Only failures that invalidate a whole session surface as errors. Failures
//! local to one block or one transaction are absorbed by the scan loop.

use thiserror::Error;

use crate::{models::ConfigError, services::blockchain::BlockChainError};

/// Errors returned synchronously by [`Scanner`](crate::services::scanner::Scanner)
#[derive(Debug, Error)]
pub enum ScannerError {
	/// The node could not be dialed or queried during construction
	#[error("Failed to connect: {0}")]
	ConnectionError(#[source] BlockChainError),

	/// The header subscription could not be opened
	#[error("Failed to subscribe: {0}")]
	SubscriptionError(#[source] BlockChainError),

	/// The scanner configuration is invalid
	#[error("Invalid configuration: {0}")]
	ConfigError(#[from] ConfigError),

	/// The session counters could not be created or exported
	#[error("Failed to set up metrics: {0}")]
	MetricsError(#[from] prometheus::Error),
}
