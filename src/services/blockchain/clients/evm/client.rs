//! EVM-compatible blockchain client implementation.
//!
//! This module provides the [`ChainClient`] implementation backed by an alloy
//! provider. The transport is picked from the endpoint: `ws://`/`wss://` and IPC
//! paths support header subscriptions, plain HTTP only supports block fetching.

use alloy::{
	primitives::B256,
	providers::{DynProvider, Provider, ProviderBuilder},
};
use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, info};

use crate::{
	models::{EVMBlock, EVMHeader},
	services::blockchain::{BlockChainError, ChainClient, HeaderStream},
};

/// Client implementation for Ethereum Virtual Machine (EVM) compatible blockchains
#[derive(Clone, Debug)]
pub struct EvmClient {
	/// The underlying alloy provider for RPC communication
	provider: DynProvider,
}

impl EvmClient {
	/// Dials the node at `endpoint`
	///
	/// # Errors
	/// * `BlockChainError::ConnectionError` - the endpoint is unreachable or malformed
	pub async fn connect(endpoint: &str) -> Result<Self, BlockChainError> {
		debug!("Connecting to {}", endpoint);

		let provider = ProviderBuilder::new()
			.connect(endpoint)
			.await
			.map_err(|e| {
				BlockChainError::connection_error(format!(
					"Failed to connect to {}: {}",
					endpoint, e
				))
			})?;

		info!("Connected to {}", endpoint);
		Ok(Self::new_with_provider(provider.erased()))
	}

	/// Creates a client around an existing provider
	pub fn new_with_provider(provider: DynProvider) -> Self {
		Self { provider }
	}

	pub fn provider(&self) -> &DynProvider {
		&self.provider
	}
}

#[async_trait]
impl ChainClient for EvmClient {
	async fn get_chain_id(&self) -> Result<u64, BlockChainError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| BlockChainError::request_error(format!("Failed to get chain id: {}", e)))
	}

	async fn subscribe_new_headers(&self) -> Result<HeaderStream, BlockChainError> {
		let subscription = self.provider.subscribe_blocks().await.map_err(|e| {
			BlockChainError::subscription_error(format!(
				"Failed to subscribe to new headers: {}",
				e
			))
		})?;

		Ok(subscription
			.into_stream()
			.map(|header| Ok(EVMHeader::from(header)))
			.boxed())
	}

	async fn get_block_by_hash(&self, hash: B256) -> Result<EVMBlock, BlockChainError> {
		let block = self
			.provider
			.get_block_by_hash(hash)
			.full()
			.await
			.map_err(|e| {
				BlockChainError::request_error(format!("Failed to get block {}: {}", hash, e))
			})?
			.ok_or_else(|| BlockChainError::block_not_found(hash))?;

		if block.transactions.is_hashes() && !block.transactions.is_empty() {
			return Err(BlockChainError::request_error(format!(
				"Block {} returned transaction hashes instead of full transactions",
				hash
			)));
		}

		Ok(EVMBlock::from(block))
	}
}
