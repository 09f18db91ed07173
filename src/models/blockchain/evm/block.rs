//! EVM block and header data structures.

use alloy::{
	primitives::B256,
	rpc::types::{Block as RpcBlock, Header as RpcHeader},
};
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// Lightweight header announced by a `newHeads` subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Header {
	/// Block hash, used to fetch the full block
	pub hash: B256,
	/// Block height
	pub number: u64,
	pub parent_hash: B256,
	/// EIP-1559 base fee (None before London)
	pub base_fee_per_gas: Option<u64>,
	pub timestamp: u64,
}

impl From<RpcHeader> for Header {
	fn from(header: RpcHeader) -> Self {
		Self {
			hash: header.hash,
			number: header.inner.number,
			parent_hash: header.inner.parent_hash,
			base_fee_per_gas: header.inner.base_fee_per_gas,
			timestamp: header.inner.timestamp,
		}
	}
}

/// A fully fetched block with its transactions in inclusion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Block {
	pub hash: B256,
	pub number: u64,
	pub base_fee_per_gas: Option<u64>,
	pub transactions: Vec<Transaction>,
}

impl Block {
	/// Header fields of this block
	pub fn header(&self) -> Header {
		Header {
			hash: self.hash,
			number: self.number,
			base_fee_per_gas: self.base_fee_per_gas,
			..Default::default()
		}
	}
}

impl From<RpcBlock> for Block {
	/// Converts a block fetched with full transaction objects.
	///
	/// A block fetched with hashes only yields no transactions.
	fn from(block: RpcBlock) -> Self {
		let header = Header::from(block.header);
		let transactions = block
			.transactions
			.into_transactions()
			.map(|tx| Transaction::from(tx.inner.into_inner()))
			.collect();

		Self {
			hash: header.hash,
			number: header.number,
			base_fee_per_gas: header.base_fee_per_gas,
			transactions,
		}
	}
}
