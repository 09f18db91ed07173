//! Scanner service and scan loop.
//!
//! The scan loop is the only writer of a subscription's output queue. It waits
//! on cancellation, consumer departure and the next header, in that priority
//! order. Each header leads to one block fetch bounded by the configured timeout;
//! a block that cannot be fetched in time is skipped and the loop moves on.

use std::{
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
	time::Duration,
};

use futures::StreamExt;
use prometheus::Registry;
use tokio::{
	sync::{
		mpsc::{self, error::TrySendError},
		watch,
	},
	time::timeout,
};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::{
	models::{ConfigLoader, EVMEnrichedTransaction, EVMHeader, OverflowPolicy, ScannerConfig},
	services::{
		blockchain::{BlockChainError, ChainClient, EvmClient, HeaderStream},
		filter::FilterSet,
		scanner::{
			filter_block, CancelHandle, HeaderCheckResult, HeaderTracker, ScanStats,
			ScanTermination, ScannerError, ScannerState, Subscription,
		},
		signer::{SenderRecovery, SignatureRecovery},
	},
};

/// Watches a chain for transactions accepted by a filter set
///
/// The scanner owns its client. Every subscription runs its own scan task
/// sharing that client.
pub struct Scanner<C: ChainClient = EvmClient, R: SenderRecovery = SignatureRecovery> {
	client: Arc<C>,
	recovery: Arc<R>,
	chain_id: u64,
	config: ScannerConfig,
	registry: Option<Registry>,
	sessions: AtomicU64,
}

impl Scanner<EvmClient, SignatureRecovery> {
	/// Validates `config` and dials its endpoint
	///
	/// # Errors
	/// * `ScannerError::ConfigError` - the configuration is invalid
	/// * `ScannerError::ConnectionError` - the node cannot be reached or queried
	pub async fn connect(config: ScannerConfig) -> Result<Self, ScannerError> {
		config.validate()?;

		let client = EvmClient::connect(&config.endpoint)
			.await
			.map_err(ScannerError::ConnectionError)?;

		Self::from_parts(client, SignatureRecovery, config).await
	}
}

impl<C: ChainClient, R: SenderRecovery> Scanner<C, R> {
	/// Creates a scanner over an already connected client
	///
	/// The chain id is queried from the client unless `config` provides one.
	pub async fn with_client(
		client: C,
		recovery: R,
		config: ScannerConfig,
	) -> Result<Self, ScannerError> {
		config.validate()?;
		Self::from_parts(client, recovery, config).await
	}

	async fn from_parts(
		client: C,
		recovery: R,
		config: ScannerConfig,
	) -> Result<Self, ScannerError> {
		let chain_id = match config.chain_id {
			Some(chain_id) => chain_id,
			None => client
				.get_chain_id()
				.await
				.map_err(ScannerError::ConnectionError)?,
		};

		info!(chain_id, endpoint = %config.endpoint, "Scanner ready");

		Ok(Self {
			client: Arc::new(client),
			recovery: Arc::new(recovery),
			chain_id,
			config,
			registry: None,
			sessions: AtomicU64::new(0),
		})
	}

	/// Exports the counters of every subscription through `registry`
	///
	/// A session's counters are registered when it starts and unregistered
	/// when its scan loop stops.
	pub fn with_registry(mut self, registry: Registry) -> Self {
		self.registry = Some(registry);
		self
	}

	pub fn chain_id(&self) -> u64 {
		self.chain_id
	}

	pub fn config(&self) -> &ScannerConfig {
		&self.config
	}

	pub fn client(&self) -> &C {
		&self.client
	}

	/// Opens a header subscription and starts scanning in the background
	///
	/// Returns once the subscription is established. An empty `filters` set
	/// forwards every transaction whose sender can be recovered.
	///
	/// # Errors
	/// * `ScannerError::SubscriptionError` - the node refused the subscription;
	///   no scan task is started
	/// * `ScannerError::MetricsError` - the session counters could not be registered
	pub async fn subscribe_new_transactions(
		&self,
		filters: FilterSet,
	) -> Result<Subscription, ScannerError> {
		let session = self.sessions.fetch_add(1, Ordering::Relaxed);
		let stats = Arc::new(ScanStats::new(self.chain_id, session)?);

		let headers = self
			.client
			.subscribe_new_headers()
			.await
			.map_err(ScannerError::SubscriptionError)?;

		if let Some(registry) = &self.registry {
			stats.register(registry)?;
		}

		let (output_tx, output_rx) = mpsc::channel(self.config.channel_capacity);
		let (cancel_tx, cancel_rx) = watch::channel(false);
		let (state_tx, state_rx) = watch::channel(ScannerState::Subscribed);

		debug!(filters = filters.len(), "Subscribed to new headers");

		let scan_loop = ScanLoop {
			client: self.client.clone(),
			recovery: self.recovery.clone(),
			filters,
			chain_id: self.chain_id,
			fetch_timeout: self.config.block_fetch_timeout(),
			overflow_policy: self.config.overflow_policy,
			output: output_tx,
			cancel: cancel_rx,
			state: state_tx,
			stats: stats.clone(),
			registry: self.registry.clone(),
			tracker: HeaderTracker::default(),
		};
		let span = info_span!("scan", chain_id = self.chain_id, session);
		tokio::spawn(scan_loop.run(headers).instrument(span));

		Ok(Subscription::new(
			output_rx,
			CancelHandle::new(cancel_tx),
			state_rx,
			stats,
		))
	}

	/// Subscribes with the filters listed in the scanner's configuration
	pub async fn subscribe_configured(&self) -> Result<Subscription, ScannerError> {
		let filters = self.config.filter_set()?;
		self.subscribe_new_transactions(filters).await
	}
}

enum LoopEvent {
	Cancelled,
	ConsumerDropped,
	Header(Option<Result<EVMHeader, BlockChainError>>),
}

struct ScanLoop<C, R> {
	client: Arc<C>,
	recovery: Arc<R>,
	filters: FilterSet,
	chain_id: u64,
	fetch_timeout: Duration,
	overflow_policy: OverflowPolicy,
	output: mpsc::Sender<EVMEnrichedTransaction>,
	cancel: watch::Receiver<bool>,
	state: watch::Sender<ScannerState>,
	stats: Arc<ScanStats>,
	registry: Option<Registry>,
	tracker: HeaderTracker,
}

impl<C: ChainClient, R: SenderRecovery> ScanLoop<C, R> {
	async fn run(mut self, mut headers: HeaderStream) {
		self.state.send_replace(ScannerState::Scanning);
		info!(chain_id = self.chain_id, "Scan loop started");

		let termination = loop {
			if *self.cancel.borrow_and_update() {
				break ScanTermination::Cancelled;
			}

			let event = tokio::select! {
				biased;
				_ = cancelled(&mut self.cancel) => LoopEvent::Cancelled,
				_ = self.output.closed() => LoopEvent::ConsumerDropped,
				header = headers.next() => LoopEvent::Header(header),
			};

			match event {
				LoopEvent::Cancelled => break ScanTermination::Cancelled,
				LoopEvent::ConsumerDropped => break ScanTermination::ConsumerDropped,
				LoopEvent::Header(None) => break ScanTermination::UpstreamClosed,
				LoopEvent::Header(Some(Err(e))) => {
					warn!("Header subscription failed: {}", e);
					break ScanTermination::UpstreamError(e.to_string());
				}
				LoopEvent::Header(Some(Ok(header))) => {
					if let Some(termination) = self.process_header(header).await {
						break termination;
					}
				}
			}
		};

		drop(headers);
		info!(
			chain_id = self.chain_id,
			stats = ?self.stats.snapshot(),
			"Scan loop stopped: {:?}",
			termination
		);
		if let Some(registry) = &self.registry {
			if let Err(e) = self.stats.unregister(registry) {
				debug!("Failed to unregister scan counters: {}", e);
			}
		}
		// The output queue closes when `self` is dropped, after the final state is published
		self.state.send_replace(ScannerState::Closed(termination));
	}

	async fn process_header(&mut self, header: EVMHeader) -> Option<ScanTermination> {
		self.stats.record_header();

		match self.tracker.check(&header) {
			HeaderCheckResult::Ok => {}
			HeaderCheckResult::Duplicate { number } => {
				warn!(block = number, hash = %header.hash, "Duplicate header announced");
			}
			HeaderCheckResult::OutOfOrder { expected, received } => {
				warn!(expected, received, hash = %header.hash, "Header out of order");
			}
			HeaderCheckResult::Gap { expected, received } => {
				debug!(expected, received, "Headers skipped by the node");
			}
		}

		let fetch = self.client.get_block_by_hash(header.hash);
		let block = match timeout(self.fetch_timeout, fetch).await {
			Ok(Ok(block)) => block,
			Ok(Err(e)) => {
				self.stats.record_block_skipped();
				warn!(block = header.number, hash = %header.hash, "Skipping block: {}", e);
				return None;
			}
			Err(_) => {
				self.stats.record_block_skipped();
				warn!(
					block = header.number,
					hash = %header.hash,
					"Skipping block: fetch timed out after {:?}",
					self.fetch_timeout
				);
				return None;
			}
		};
		self.stats.record_block_fetched();

		let block_number = block.number;
		let transaction_count = block.transactions.len();
		let matches = filter_block(
			self.recovery.as_ref(),
			block,
			self.chain_id,
			&self.filters,
			&self.stats,
		);
		debug!(
			block = block_number,
			transactions = transaction_count,
			matches = matches.len(),
			"Processed block"
		);

		for transaction in matches {
			if let Some(termination) = self.deliver(transaction).await {
				return Some(termination);
			}
		}

		None
	}

	async fn deliver(&mut self, transaction: EVMEnrichedTransaction) -> Option<ScanTermination> {
		match self.overflow_policy {
			OverflowPolicy::Block => {
				tokio::select! {
					biased;
					_ = cancelled(&mut self.cancel) => Some(ScanTermination::Cancelled),
					sent = self.output.send(transaction) => match sent {
						Ok(()) => {
							self.stats.record_delivered();
							None
						}
						Err(_) => Some(ScanTermination::ConsumerDropped),
					},
				}
			}
			OverflowPolicy::DropNewest => match self.output.try_send(transaction) {
				Ok(()) => {
					self.stats.record_delivered();
					None
				}
				Err(TrySendError::Full(transaction)) => {
					self.stats.record_dropped();
					debug!(tx = %transaction.hash(), "Output queue full, dropping match");
					None
				}
				Err(TrySendError::Closed(_)) => Some(ScanTermination::ConsumerDropped),
			},
		}
	}
}

/// Resolves once cancellation is requested; never resolves if every handle is gone
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
	while !*cancel.borrow_and_update() {
		if cancel.changed().await.is_err() {
			std::future::pending::<()>().await;
		}
	}
}
