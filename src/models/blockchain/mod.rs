//! Blockchain-specific model implementations.
//!
//! Only EVM-compatible chains are scanned: blocks, headers and transactions as
//! delivered by the node, plus the enriched transaction handed to consumers.

pub mod evm;
