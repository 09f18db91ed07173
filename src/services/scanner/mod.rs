//! Live block scanning.
//!
//! A [`Scanner`] owns a node connection. Each call to
//! [`Scanner::subscribe_new_transactions`] opens a header subscription and
//! spawns a scan loop that fetches every announced block, recovers the sender of
//! each transaction once, and forwards the transactions accepted by a
//! [`FilterSet`](crate::services::filter::FilterSet) to the returned
//! [`Subscription`].

mod enrich;
mod error;
mod service;
mod stats;
mod subscription;
mod tracker;

pub use enrich::{enrich_transaction, filter_block};
pub use error::ScannerError;
pub use service::Scanner;
pub use stats::{ScanStats, ScanStatsSnapshot};
pub use subscription::{CancelHandle, ScanTermination, ScannerState, Subscription};
pub use tracker::{HeaderCheckResult, HeaderTracker, DEFAULT_HEADER_HISTORY};
