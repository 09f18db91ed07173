use std::time::Duration;

use alloy::primitives::{Address, U256};
use blockscan::{
	models::{EVMBlock, EVMTransaction, OverflowPolicy, ScannerConfig},
	services::{
		blockchain::BlockChainError,
		filter::{FilterSet, TransactionFilter},
		scanner::{ScanTermination, Scanner, ScannerError, ScannerState, Subscription},
		signer::{RecoveryError, SignatureRecovery},
	},
	utils::tests::builders::evm::{
		block::BlockBuilder,
		transaction::{test_signer, TransactionBuilder},
	},
};
use futures::StreamExt;
use tracing_test::traced_test;

use crate::integration::mocks::{MockChainClient, MockSenderRecovery, ScriptedClient};

const ENDPOINT: &str = "ws://localhost:8546";

fn config() -> ScannerConfig {
	ScannerConfig::new(ENDPOINT).with_chain_id(1)
}

/// Block `number` holding signed transactions with the given nonces
fn signed_block(number: u64, nonces: &[u64]) -> EVMBlock {
	let signer = test_signer(1);
	nonces
		.iter()
		.fold(BlockBuilder::new().number(number), |builder, nonce| {
			builder.add_transaction(TransactionBuilder::new().nonce(*nonce).signed(&signer))
		})
		.build()
}

async fn collect_nonces(subscription: &mut Subscription) -> Vec<u64> {
	let mut nonces = Vec::new();
	while let Some(transaction) = subscription.recv().await {
		nonces.push(transaction.nonce());
	}
	nonces
}

/// Waits (bounded) until `condition` holds
async fn eventually(mut condition: impl FnMut() -> bool) {
	tokio::time::timeout(Duration::from_secs(5), async {
		while !condition() {
			tokio::time::sleep(Duration::from_millis(5)).await;
		}
	})
	.await
	.expect("condition not reached in time");
}

#[tokio::test]
async fn test_fetch_timeout_skips_only_that_block() {
	let first = signed_block(1, &[1]);
	let second = signed_block(2, &[2]);
	let third = signed_block(3, &[3]);
	let headers = [first.header(), second.header(), third.header()];

	let (client, sender) = ScriptedClient::new();
	let client = client
		.with_block(first)
		.with_slow_block(second, Duration::from_secs(10))
		.with_block(third);

	let scanner = Scanner::with_client(
		client,
		SignatureRecovery,
		config().with_block_fetch_timeout(Duration::from_millis(100)),
	)
	.await
	.unwrap();
	let mut subscription = scanner
		.subscribe_new_transactions(FilterSet::new())
		.await
		.unwrap();

	for header in headers {
		sender.unbounded_send(Ok(header)).unwrap();
	}
	drop(sender);

	assert_eq!(collect_nonces(&mut subscription).await, vec![1, 3]);
	assert_eq!(
		subscription.termination(),
		Some(ScanTermination::UpstreamClosed)
	);
	assert_eq!(subscription.error(), None);

	let stats = subscription.stats();
	assert_eq!(stats.headers_seen, 3);
	assert_eq!(stats.blocks_fetched, 2);
	assert_eq!(stats.blocks_skipped, 1);
	assert_eq!(scanner.client().fetched(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_recovery_failure_drops_single_transaction() {
	let block = (1..=5u64)
		.fold(BlockBuilder::new().number(1), |builder, nonce| {
			builder.add_transaction(TransactionBuilder::new().nonce(nonce).build())
		})
		.base_fee_per_gas(7)
		.build();
	let header = block.header();

	let (client, sender) = ScriptedClient::new();
	let mut recovery = MockSenderRecovery::new();
	recovery
		.expect_recover_sender()
		.withf(|_, chain_id, base_fee| *chain_id == 1 && *base_fee == Some(7))
		.times(5)
		.returning(|transaction: &EVMTransaction, _, _| {
			if transaction.nonce() == 3 {
				Err(RecoveryError::InvalidSignature("bad s".to_string()))
			} else {
				Ok(Address::repeat_byte(transaction.nonce() as u8))
			}
		});

	let scanner = Scanner::with_client(client.with_block(block), recovery, config())
		.await
		.unwrap();
	let mut subscription = scanner
		.subscribe_new_transactions(FilterSet::new())
		.await
		.unwrap();

	sender.unbounded_send(Ok(header)).unwrap();
	drop(sender);

	let mut received = Vec::new();
	while let Some(transaction) = subscription.recv().await {
		assert_eq!(
			transaction.sender(),
			Address::repeat_byte(transaction.nonce() as u8)
		);
		assert_eq!(transaction.base_fee_per_gas(), Some(7));
		received.push(transaction.nonce());
	}

	assert_eq!(received, vec![1, 2, 4, 5]);
	assert_eq!(subscription.stats().recovery_failures, 1);
	assert_eq!(subscription.stats().transactions_recovered, 4);
}

#[tokio::test]
async fn test_upstream_error_closes_stream_once() {
	let block = signed_block(1, &[1]);
	let header = block.header();
	let hash = block.hash;

	let mut client = MockChainClient::new();
	client.expect_subscribe_new_headers().times(1).returning(move || {
		Ok(futures::stream::iter(vec![
			Ok(header),
			Err(BlockChainError::SubscriptionError(
				"connection reset".to_string(),
			)),
			Ok(BlockBuilder::new().number(2).header()),
		])
		.boxed())
	});
	client
		.expect_get_block_by_hash()
		.withf(move |requested| *requested == hash)
		.times(1)
		.returning(move |_| Ok(block.clone()));

	let scanner = Scanner::with_client(client, SignatureRecovery, config())
		.await
		.unwrap();
	let mut subscription = scanner
		.subscribe_new_transactions(FilterSet::new())
		.await
		.unwrap();

	assert_eq!(collect_nonces(&mut subscription).await, vec![1]);
	assert!(subscription.recv().await.is_none());
	assert_eq!(
		subscription.termination(),
		Some(ScanTermination::UpstreamError(
			"Subscription error: connection reset".to_string()
		))
	);
	assert_eq!(
		subscription.error().as_deref(),
		Some("Subscription error: connection reset")
	);
	assert_eq!(subscription.stats().headers_seen, 1);
}

#[tokio::test]
async fn test_oversized_channel_capacity_is_rejected_before_subscribing() {
	let mut client = MockChainClient::new();
	client.expect_subscribe_new_headers().never();

	let result = Scanner::with_client(
		client,
		SignatureRecovery,
		config().with_channel_capacity(usize::MAX),
	)
	.await;

	assert!(matches!(result, Err(ScannerError::ConfigError(_))));
}

#[tokio::test]
async fn test_subscribe_failure_starts_no_scan() {
	let mut client = MockChainClient::new();
	client
		.expect_subscribe_new_headers()
		.times(1)
		.returning(|| Err(BlockChainError::SubscriptionError("not supported".to_string())));
	client.expect_get_block_by_hash().never();

	let scanner = Scanner::with_client(client, SignatureRecovery, config())
		.await
		.unwrap();
	let result = scanner.subscribe_new_transactions(FilterSet::new()).await;

	assert!(matches!(result, Err(ScannerError::SubscriptionError(_))));
}

#[tokio::test]
async fn test_chain_id_failure_is_a_connection_error() {
	let mut client = MockChainClient::new();
	client
		.expect_get_chain_id()
		.times(1)
		.returning(|| Err(BlockChainError::RequestError("timeout".to_string())));

	let result = Scanner::with_client(
		client,
		SignatureRecovery,
		ScannerConfig::new(ENDPOINT),
	)
	.await;

	assert!(matches!(result, Err(ScannerError::ConnectionError(_))));
}

#[tokio::test]
async fn test_filters_select_matches_in_block_order() {
	let signer = test_signer(1);
	let recipient = Address::repeat_byte(0xab);
	let block = BlockBuilder::new()
		.number(1)
		.add_transaction(
			TransactionBuilder::new()
				.nonce(1)
				.value(U256::from(2000u64))
				.signed(&signer),
		)
		.add_transaction(
			TransactionBuilder::new()
				.nonce(2)
				.value(U256::from(500u64))
				.signed(&signer),
		)
		.add_transaction(
			TransactionBuilder::new()
				.nonce(3)
				.to(recipient)
				.value(U256::from(500u64))
				.signed(&signer),
		)
		.build();
	let header = block.header();

	let (client, sender) = ScriptedClient::new();
	let scanner = Scanner::with_client(client.with_block(block), SignatureRecovery, config())
		.await
		.unwrap();

	let filters = FilterSet::new()
		.with(TransactionFilter::value_greater_than(U256::from(1000u64)))
		.with(TransactionFilter::ToAddress(recipient));
	let mut subscription = scanner.subscribe_new_transactions(filters).await.unwrap();

	sender.unbounded_send(Ok(header)).unwrap();
	drop(sender);

	assert_eq!(collect_nonces(&mut subscription).await, vec![1, 3]);
}

#[tokio::test]
async fn test_subscribe_configured_uses_config_filters() {
	let block = signed_block(1, &[1, 2]);
	let header = block.header();
	let (client, sender) = ScriptedClient::new();

	let config = config().with_filters(vec![blockscan::models::FilterConfig {
		from: Some(test_signer(2).address().to_string()),
		..Default::default()
	}]);
	let scanner = Scanner::with_client(client.with_block(block), SignatureRecovery, config)
		.await
		.unwrap();
	let mut subscription = scanner.subscribe_configured().await.unwrap();

	sender.unbounded_send(Ok(header)).unwrap();
	drop(sender);

	// Transactions are signed by another key
	assert!(collect_nonces(&mut subscription).await.is_empty());
	assert_eq!(subscription.stats().transactions_recovered, 2);
}

#[tokio::test]
async fn test_cancel_stops_loop_before_next_header() {
	let block = signed_block(1, &[1]);
	let header = block.header();
	let (client, sender) = ScriptedClient::new();

	let scanner = Scanner::with_client(client.with_block(block), SignatureRecovery, config())
		.await
		.unwrap();
	let mut subscription = scanner
		.subscribe_new_transactions(FilterSet::new())
		.await
		.unwrap();

	subscription.cancel_handle().cancel();
	assert_eq!(subscription.closed().await, ScanTermination::Cancelled);

	// The header stream was released by the loop
	assert!(sender.unbounded_send(Ok(header)).is_err());
	assert!(subscription.recv().await.is_none());
	assert!(scanner.client().fetched().is_empty());
	assert_eq!(
		subscription.state(),
		ScannerState::Closed(ScanTermination::Cancelled)
	);
}

#[tokio::test]
async fn test_unsubscribe_keeps_queued_matches() {
	let block = signed_block(1, &[1, 2]);
	let header = block.header();
	let (client, sender) = ScriptedClient::new();

	let scanner = Scanner::with_client(client.with_block(block), SignatureRecovery, config())
		.await
		.unwrap();
	let mut subscription = scanner
		.subscribe_new_transactions(FilterSet::new())
		.await
		.unwrap();

	sender.unbounded_send(Ok(header)).unwrap();
	eventually(|| subscription.stats().matches_delivered == 2).await;

	subscription.unsubscribe();

	assert_eq!(collect_nonces(&mut subscription).await, vec![1, 2]);
	assert_eq!(
		subscription.termination(),
		Some(ScanTermination::Cancelled)
	);
}

#[tokio::test]
async fn test_dropping_subscription_ends_loop() {
	let (client, sender) = ScriptedClient::new();
	let scanner = Scanner::with_client(client, SignatureRecovery, config())
		.await
		.unwrap();
	let subscription = scanner
		.subscribe_new_transactions(FilterSet::new())
		.await
		.unwrap();

	drop(subscription);

	eventually(|| sender.is_closed()).await;
}

#[tokio::test]
async fn test_block_policy_waits_for_consumer() {
	let block = signed_block(1, &[1, 2, 3]);
	let header = block.header();
	let (client, sender) = ScriptedClient::new();

	let scanner = Scanner::with_client(
		client.with_block(block),
		SignatureRecovery,
		config()
			.with_channel_capacity(1)
			.with_overflow_policy(OverflowPolicy::Block),
	)
	.await
	.unwrap();
	let mut subscription = scanner
		.subscribe_new_transactions(FilterSet::new())
		.await
		.unwrap();

	sender.unbounded_send(Ok(header)).unwrap();
	drop(sender);

	eventually(|| subscription.stats().matches_delivered == 1).await;
	tokio::time::sleep(Duration::from_millis(50)).await;
	// The loop is parked on the full queue
	assert_eq!(subscription.stats().matches_delivered, 1);
	assert_eq!(subscription.state(), ScannerState::Scanning);

	assert_eq!(collect_nonces(&mut subscription).await, vec![1, 2, 3]);
	assert_eq!(subscription.stats().matches_dropped, 0);
}

#[tokio::test]
async fn test_cancel_while_waiting_on_full_queue() {
	let block = signed_block(1, &[1, 2, 3]);
	let header = block.header();
	let (client, sender) = ScriptedClient::new();

	let scanner = Scanner::with_client(
		client.with_block(block),
		SignatureRecovery,
		config().with_channel_capacity(1),
	)
	.await
	.unwrap();
	let mut subscription = scanner
		.subscribe_new_transactions(FilterSet::new())
		.await
		.unwrap();

	sender.unbounded_send(Ok(header)).unwrap();
	eventually(|| subscription.stats().matches_delivered == 1).await;

	subscription.unsubscribe();

	assert_eq!(subscription.closed().await, ScanTermination::Cancelled);
	assert_eq!(collect_nonces(&mut subscription).await, vec![1]);
}

#[tokio::test]
async fn test_drop_newest_policy_discards_overflow() {
	let block = signed_block(1, &[1, 2, 3]);
	let header = block.header();
	let (client, sender) = ScriptedClient::new();

	let scanner = Scanner::with_client(
		client.with_block(block),
		SignatureRecovery,
		config()
			.with_channel_capacity(1)
			.with_overflow_policy(OverflowPolicy::DropNewest),
	)
	.await
	.unwrap();
	let mut subscription = scanner
		.subscribe_new_transactions(FilterSet::new())
		.await
		.unwrap();

	sender.unbounded_send(Ok(header)).unwrap();
	drop(sender);

	assert_eq!(
		subscription.closed().await,
		ScanTermination::UpstreamClosed
	);
	assert_eq!(collect_nonces(&mut subscription).await, vec![1]);

	let stats = subscription.stats();
	assert_eq!(stats.matches_delivered, 1);
	assert_eq!(stats.matches_dropped, 2);
}

#[tokio::test]
async fn test_into_stream() {
	let first = signed_block(1, &[1, 2]);
	let second = signed_block(2, &[3]);
	let headers = [first.header(), second.header()];
	let (client, sender) = ScriptedClient::new();

	let scanner = Scanner::with_client(
		client.with_block(first).with_block(second),
		SignatureRecovery,
		config(),
	)
	.await
	.unwrap();
	let stream = scanner
		.subscribe_new_transactions(FilterSet::new())
		.await
		.unwrap()
		.into_stream();

	for header in headers {
		sender.unbounded_send(Ok(header)).unwrap();
	}
	drop(sender);

	let nonces: Vec<u64> = stream.map(|transaction| transaction.nonce()).collect().await;
	assert_eq!(nonces, vec![1, 2, 3]);
}

#[traced_test]
#[tokio::test]
async fn test_skipped_block_is_logged() {
	let missing = BlockBuilder::new().number(9).header();
	let (client, sender) = ScriptedClient::new();

	let scanner = Scanner::with_client(client, SignatureRecovery, config())
		.await
		.unwrap();
	let mut subscription = scanner
		.subscribe_new_transactions(FilterSet::new())
		.await
		.unwrap();

	sender.unbounded_send(Ok(missing)).unwrap();
	drop(sender);

	assert!(subscription.recv().await.is_none());
	assert!(logs_contain("Skipping block"));
	assert!(logs_contain("Block not found"));
	assert!(logs_contain("Scan loop stopped"));
}
