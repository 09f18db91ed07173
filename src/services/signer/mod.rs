//! Sender recovery for signed transactions.
//!
//! Recovery runs once per transaction when a block is enriched; filters only ever
//! see the recovered address.

mod error;
mod recovery;

pub use error::RecoveryError;
pub use recovery::{SenderRecovery, SignatureRecovery};
