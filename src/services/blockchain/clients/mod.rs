//! Blockchain client implementations.
//!
//! - EVM client for Ethereum-compatible chains, backed by an alloy provider

mod evm;

pub use evm::EvmClient;
