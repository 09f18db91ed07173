//! Core blockchain client interface.
//!
//! This module defines what the scanner needs from a node connection, so the
//! scan loop can run against any transport (or a mock in tests).

use alloy::primitives::B256;
use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::{
	models::{EVMBlock, EVMHeader},
	services::blockchain::BlockChainError,
};

/// Stream of newly announced headers.
///
/// The stream ending means the node closed the subscription; an `Err` item means
/// the subscription failed. Both end a scan session.
pub type HeaderStream = BoxStream<'static, Result<EVMHeader, BlockChainError>>;

/// Defines the node capabilities the scanner relies on
///
/// Implementations are shared between the caller and the scan loop task, so they
/// must be `Send + Sync`.
#[async_trait]
pub trait ChainClient: Send + Sync + 'static {
	/// Retrieves the chain id of the connected network
	async fn get_chain_id(&self) -> Result<u64, BlockChainError>;

	/// Opens a `newHeads` subscription
	///
	/// # Errors
	/// * `BlockChainError::SubscriptionError` - the node refused the subscription
	async fn subscribe_new_headers(&self) -> Result<HeaderStream, BlockChainError>;

	/// Fetches a block by hash, including full transaction objects
	///
	/// # Errors
	/// * `BlockChainError::BlockNotFound` - the node does not know the block
	/// * `BlockChainError::RequestError` - the request failed
	async fn get_block_by_hash(&self, hash: B256) -> Result<EVMBlock, BlockChainError>;
}
