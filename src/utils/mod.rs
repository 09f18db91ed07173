//! Utility modules for common functionality.
//!
//! - logging: tracing subscriber setup
//! - tests: builders for test instances of blocks and transactions

pub mod logging;
