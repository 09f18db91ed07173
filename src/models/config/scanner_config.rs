//! Scanner configuration loading and validation.
//!
//! This module implements the ConfigLoader trait for `ScannerConfig`, allowing a
//! scanner to be described by a JSON file:
//!
//! ```json
//! {
//!   "endpoint": "wss://node.example:8546",
//!   "chain_id": 1,
//!   "block_fetch_timeout_ms": 15000,
//!   "channel_capacity": 64,
//!   "overflow_policy": "block",
//!   "filters": [{ "value_gt": "1000000000000000000" }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};
use url::Url;

use crate::{
	models::{config::error::ConfigError, ConfigLoader, FilterConfig},
	services::filter::FilterSet,
};

/// Default bound on a single block fetch
pub const DEFAULT_BLOCK_FETCH_TIMEOUT_MS: u64 = 15_000;

/// Default number of matches buffered between the scan loop and the consumer
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Largest output queue the runtime can allocate
pub const MAX_CHANNEL_CAPACITY: usize = tokio::sync::Semaphore::MAX_PERMITS;

const SUPPORTED_SCHEMES: [&str; 4] = ["ws", "wss", "http", "https"];

/// What the scan loop does when the output channel is full
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
	/// Wait for the consumer; the scan loop stalls until a slot frees up
	#[default]
	Block,
	/// Drop the match that does not fit and count it
	DropNewest,
}

/// Configuration of one scanner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScannerConfig {
	/// Node endpoint: `ws://`, `wss://`, `http(s)://` or a path to an IPC socket
	pub endpoint: String,
	/// Chain id used for sender recovery; queried from the node when absent
	#[serde(default)]
	pub chain_id: Option<u64>,
	#[serde(default = "default_block_fetch_timeout_ms")]
	pub block_fetch_timeout_ms: u64,
	#[serde(default = "default_channel_capacity")]
	pub channel_capacity: usize,
	#[serde(default)]
	pub overflow_policy: OverflowPolicy,
	/// Filters applied by subscriptions opened with [`ScannerConfig::filter_set`]
	#[serde(default)]
	pub filters: Vec<FilterConfig>,
}

fn default_block_fetch_timeout_ms() -> u64 {
	DEFAULT_BLOCK_FETCH_TIMEOUT_MS
}

fn default_channel_capacity() -> usize {
	DEFAULT_CHANNEL_CAPACITY
}

impl ScannerConfig {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
			chain_id: None,
			block_fetch_timeout_ms: DEFAULT_BLOCK_FETCH_TIMEOUT_MS,
			channel_capacity: DEFAULT_CHANNEL_CAPACITY,
			overflow_policy: OverflowPolicy::default(),
			filters: Vec::new(),
		}
	}

	pub fn with_chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = Some(chain_id);
		self
	}

	pub fn with_block_fetch_timeout(mut self, timeout: Duration) -> Self {
		// Sub-millisecond timeouts round up rather than collapsing to zero
		let millis = timeout.as_nanos().div_ceil(1_000_000);
		self.block_fetch_timeout_ms = u64::try_from(millis).unwrap_or(u64::MAX);
		self
	}

	pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
		self.channel_capacity = capacity;
		self
	}

	pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
		self.overflow_policy = policy;
		self
	}

	pub fn with_filters(mut self, filters: Vec<FilterConfig>) -> Self {
		self.filters = filters;
		self
	}

	pub fn block_fetch_timeout(&self) -> Duration {
		Duration::from_millis(self.block_fetch_timeout_ms)
	}

	/// Compiles the configured filters
	pub fn filter_set(&self) -> Result<FilterSet, ConfigError> {
		FilterSet::try_from(self.filters.as_slice())
			.map_err(|e| ConfigError::validation_error(format!("Invalid filter: {}", e)))
	}

	fn is_ipc_path(&self) -> bool {
		self.endpoint.ends_with(".ipc")
	}
}

impl ConfigLoader for ScannerConfig {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(format!(
				"Expected a .json file: {}",
				path.display()
			)));
		}

		let file = fs::File::open(path)?;
		let config: ScannerConfig = serde_json::from_reader(file)?;
		config.validate()?;

		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.endpoint.trim().is_empty() {
			return Err(ConfigError::validation_error("Endpoint is required"));
		}

		if !self.is_ipc_path() {
			let url = Url::parse(&self.endpoint).map_err(|e| {
				ConfigError::validation_error(format!("Invalid endpoint {}: {}", self.endpoint, e))
			})?;
			if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
				return Err(ConfigError::validation_error(format!(
					"Endpoint scheme must be one of: {}",
					SUPPORTED_SCHEMES.join(", ")
				)));
			}
		}

		if self.block_fetch_timeout_ms == 0 {
			return Err(ConfigError::validation_error(
				"block_fetch_timeout_ms must be greater than 0",
			));
		}

		if self.channel_capacity == 0 || self.channel_capacity > MAX_CHANNEL_CAPACITY {
			return Err(ConfigError::validation_error(format!(
				"channel_capacity must be between 1 and {}",
				MAX_CHANNEL_CAPACITY
			)));
		}

		self.filter_set()?;

		Ok(())
	}
}
