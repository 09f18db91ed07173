//! Domain models and data structures for block scanning.
//!
//! - `blockchain`: EVM blocks, headers and transactions
//! - `config`: Scanner and filter configuration loading and validation

mod blockchain;
mod config;

pub use blockchain::evm::{EVMBlock, EVMEnrichedTransaction, EVMHeader, EVMTransaction};

pub use config::{ConfigError, ConfigLoader, FilterConfig, OverflowPolicy, ScannerConfig};
