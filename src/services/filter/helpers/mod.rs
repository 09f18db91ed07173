//! Helper functions for filter implementations.
//!
//! Parsing and normalization of the textual inputs filters are built from:
//! addresses, selectors and amounts.

pub mod evm;
