//! Configuration loading and validation.
//!
//! - `scanner_config`: endpoint, timeouts, output channel sizing and filters
//! - `filter_config`: declarative filter definitions

use std::path::Path;

mod error;
mod filter_config;
mod scanner_config;

pub use error::ConfigError;
pub use filter_config::FilterConfig;
pub use scanner_config::{OverflowPolicy, ScannerConfig};

/// Common interface for loading configuration files
pub trait ConfigLoader: Sized {
	/// Load and validate a configuration from a JSON file
	fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	fn validate(&self) -> Result<(), ConfigError>;

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
