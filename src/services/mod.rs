//! Core services of the scanner.
//!
//! - `blockchain`: the chain client capability and its alloy implementation
//! - `signer`: sender recovery for signed transactions
//! - `filter`: composable transaction predicates
//! - `scanner`: the live scan loop and subscription handle

pub mod blockchain;
pub mod filter;
pub mod scanner;
pub mod signer;
