//! Blockchain client interfaces and implementations.
//!
//! Provides the capability the scanner needs from a node (subscribe to new
//! headers, fetch a block by hash, read the chain id) and an alloy-backed
//! implementation of it.

mod client;
mod clients;
mod error;

pub use client::{ChainClient, HeaderStream};
pub use clients::EvmClient;
pub use error::BlockChainError;
