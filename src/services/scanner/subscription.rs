//! Consumer side of a scan session.

use std::sync::Arc;

use futures::{stream, Stream};
use tokio::sync::{mpsc, watch};

use crate::{
	models::EVMEnrichedTransaction,
	services::scanner::{ScanStats, ScanStatsSnapshot},
};

/// Why a scan loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTermination {
	/// The subscription was cancelled by the caller
	Cancelled,
	/// The node closed the header subscription
	UpstreamClosed,
	/// The header subscription failed
	UpstreamError(String),
	/// The consumer dropped its end of the output queue
	ConsumerDropped,
	/// The scan task ended without reporting a reason (it panicked)
	Aborted,
}

/// Lifecycle of a subscription
///
/// Dialing and opening the subscription happen before a [`Subscription`]
/// exists, so the observable states start at `Subscribed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannerState {
	/// The header subscription is open and the scan task is starting
	Subscribed,
	/// The scan loop is running
	Scanning,
	/// The scan loop has stopped and the output queue is closed
	Closed(ScanTermination),
}

impl ScannerState {
	pub fn is_closed(&self) -> bool {
		matches!(self, Self::Closed(_))
	}
}

/// Cancels a subscription from anywhere
///
/// Cloning the handle does not keep the scan loop alive; dropping the
/// [`Subscription`] ends it regardless of outstanding handles.
#[derive(Debug, Clone)]
pub struct CancelHandle {
	sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
	pub(crate) fn new(sender: watch::Sender<bool>) -> Self {
		Self {
			sender: Arc::new(sender),
		}
	}

	/// Asks the scan loop to stop; it is observed before the next header is processed
	pub fn cancel(&self) {
		self.sender.send_replace(true);
	}

	pub fn is_cancelled(&self) -> bool {
		*self.sender.borrow()
	}
}

/// A live scan session
///
/// Matching transactions are received in block order, and within a block in
/// transaction order. The queue closes exactly once, when the scan loop stops;
/// [`Subscription::termination`] then tells why.
#[derive(Debug)]
pub struct Subscription {
	receiver: mpsc::Receiver<EVMEnrichedTransaction>,
	cancel: CancelHandle,
	state: watch::Receiver<ScannerState>,
	stats: Arc<ScanStats>,
}

impl Subscription {
	pub(crate) fn new(
		receiver: mpsc::Receiver<EVMEnrichedTransaction>,
		cancel: CancelHandle,
		state: watch::Receiver<ScannerState>,
		stats: Arc<ScanStats>,
	) -> Self {
		Self {
			receiver,
			cancel,
			state,
			stats,
		}
	}

	/// Receives the next matching transaction, or `None` once the scan loop has stopped
	pub async fn recv(&mut self) -> Option<EVMEnrichedTransaction> {
		self.receiver.recv().await
	}

	pub fn cancel_handle(&self) -> CancelHandle {
		self.cancel.clone()
	}

	/// Cancels the subscription; transactions already queued can still be received
	pub fn unsubscribe(&self) {
		self.cancel.cancel();
	}

	pub fn state(&self) -> ScannerState {
		let state = self.state.borrow().clone();
		if !state.is_closed() && self.state.has_changed().is_err() {
			return ScannerState::Closed(ScanTermination::Aborted);
		}
		state
	}

	/// Reason the scan loop stopped, once it has
	pub fn termination(&self) -> Option<ScanTermination> {
		match self.state() {
			ScannerState::Closed(termination) => Some(termination),
			_ => None,
		}
	}

	/// Error reported by the header subscription, if that is what ended the session
	pub fn error(&self) -> Option<String> {
		match self.termination() {
			Some(ScanTermination::UpstreamError(e)) => Some(e),
			_ => None,
		}
	}

	/// Waits for the scan loop to stop
	pub async fn closed(&mut self) -> ScanTermination {
		match self.state.wait_for(ScannerState::is_closed).await {
			Ok(state) => match &*state {
				ScannerState::Closed(termination) => termination.clone(),
				_ => ScanTermination::Aborted,
			},
			Err(_) => ScanTermination::Aborted,
		}
	}

	pub fn stats(&self) -> ScanStatsSnapshot {
		self.stats.snapshot()
	}

	/// Converts the subscription into a stream of matching transactions
	///
	/// Dropping the stream ends the scan loop.
	pub fn into_stream(self) -> impl Stream<Item = EVMEnrichedTransaction> + Send + 'static {
		stream::unfold(self, |mut subscription| async move {
			subscription
				.recv()
				.await
				.map(|transaction| (transaction, subscription))
		})
	}
}
