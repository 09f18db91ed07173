//! Counters describing a scan session.
//!
//! Each session owns one `blockscan_scan_events_total` counter vector labelled
//! by `event`, with the chain id and session number as constant labels. The
//! vector can be registered with a Prometheus [`Registry`] to export it.

use std::fmt;

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};
use serde::Serialize;

const EVENTS_METRIC: &str = "blockscan_scan_events_total";

/// Live counters updated by the scan loop
#[derive(Clone)]
pub struct ScanStats {
	events: IntCounterVec,
	headers_seen: IntCounter,
	blocks_fetched: IntCounter,
	blocks_skipped: IntCounter,
	transactions_recovered: IntCounter,
	recovery_failures: IntCounter,
	matches_delivered: IntCounter,
	matches_dropped: IntCounter,
}

/// Point-in-time copy of [`ScanStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStatsSnapshot {
	pub headers_seen: u64,
	pub blocks_fetched: u64,
	/// Blocks whose fetch failed or timed out
	pub blocks_skipped: u64,
	pub transactions_recovered: u64,
	pub recovery_failures: u64,
	pub matches_delivered: u64,
	/// Matches discarded because the output queue was full
	pub matches_dropped: u64,
}

impl ScanStats {
	/// Creates the counters of one session
	///
	/// # Errors
	/// Returns a `prometheus::Error` if the metric description is rejected
	pub fn new(chain_id: u64, session: u64) -> Result<Self, prometheus::Error> {
		let opts = Opts::new(EVENTS_METRIC, "Events observed by a scan session")
			.const_label("chain_id", chain_id.to_string())
			.const_label("session", session.to_string());
		let events = IntCounterVec::new(opts, &["event"])?;

		Ok(Self {
			headers_seen: events.get_metric_with_label_values(&["headers_seen"])?,
			blocks_fetched: events.get_metric_with_label_values(&["blocks_fetched"])?,
			blocks_skipped: events.get_metric_with_label_values(&["blocks_skipped"])?,
			transactions_recovered: events
				.get_metric_with_label_values(&["transactions_recovered"])?,
			recovery_failures: events.get_metric_with_label_values(&["recovery_failures"])?,
			matches_delivered: events.get_metric_with_label_values(&["matches_delivered"])?,
			matches_dropped: events.get_metric_with_label_values(&["matches_dropped"])?,
			events,
		})
	}

	/// Exports the counters through `registry`
	pub fn register(&self, registry: &Registry) -> Result<(), prometheus::Error> {
		registry.register(Box::new(self.events.clone()))
	}

	/// Stops exporting the counters; they keep their values
	pub fn unregister(&self, registry: &Registry) -> Result<(), prometheus::Error> {
		registry.unregister(Box::new(self.events.clone()))
	}

	pub fn record_header(&self) {
		self.headers_seen.inc();
	}

	pub fn record_block_fetched(&self) {
		self.blocks_fetched.inc();
	}

	pub fn record_block_skipped(&self) {
		self.blocks_skipped.inc();
	}

	pub fn record_recovered(&self) {
		self.transactions_recovered.inc();
	}

	pub fn record_recovery_failure(&self) {
		self.recovery_failures.inc();
	}

	pub fn record_delivered(&self) {
		self.matches_delivered.inc();
	}

	pub fn record_dropped(&self) {
		self.matches_dropped.inc();
	}

	pub fn snapshot(&self) -> ScanStatsSnapshot {
		ScanStatsSnapshot {
			headers_seen: self.headers_seen.get(),
			blocks_fetched: self.blocks_fetched.get(),
			blocks_skipped: self.blocks_skipped.get(),
			transactions_recovered: self.transactions_recovered.get(),
			recovery_failures: self.recovery_failures.get(),
			matches_delivered: self.matches_delivered.get(),
			matches_dropped: self.matches_dropped.get(),
		}
	}
}

impl fmt::Debug for ScanStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ScanStats").field(&self.snapshot()).finish()
	}
}
