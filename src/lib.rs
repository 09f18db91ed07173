//! Live EVM transaction scanner.
//!
//! Watches a node for new block headers, fetches every announced block, recovers the
//! sender of each transaction once, and streams the transactions matching a
//! [`FilterSet`](services::filter::FilterSet) to the caller.
//!
//! - `models`: blocks, headers, transactions and configuration
//! - `services`: the chain client, sender recovery, filters and the scanner itself
//! - `utils`: logging setup and test builders

pub mod models;
pub mod services;
pub mod utils;
