//! Ethereum Virtual Machine (EVM) blockchain specific implementations.
//!
//! This module contains the data structures the scanner moves around: announced
//! headers, fully fetched blocks, raw signed transactions and transactions enriched
//! with their recovered sender.

mod block;
mod transaction;

pub use block::{Block as EVMBlock, Header as EVMHeader};
pub use transaction::{
	EnrichedTransaction as EVMEnrichedTransaction, Transaction as EVMTransaction,
};
