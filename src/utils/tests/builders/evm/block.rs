use alloy::primitives::B256;

use crate::models::{EVMBlock, EVMHeader, EVMTransaction};

/// A builder for creating test EVM blocks with default values.
#[derive(Debug, Clone, Default)]
pub struct BlockBuilder {
	block: EVMBlock,
}

impl BlockBuilder {
	/// Creates a new BlockBuilder instance.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the number of the block; the hash defaults to the number left-padded.
	pub fn number(mut self, number: u64) -> Self {
		self.block.number = number;
		if self.block.hash == B256::ZERO {
			self.block.hash = B256::left_padding_from(&number.to_be_bytes());
		}
		self
	}

	/// Sets the hash of the block.
	pub fn hash(mut self, hash: B256) -> Self {
		self.block.hash = hash;
		self
	}

	/// Sets the base fee of the block.
	pub fn base_fee_per_gas(mut self, base_fee: u64) -> Self {
		self.block.base_fee_per_gas = Some(base_fee);
		self
	}

	/// Adds a transaction to the block.
	pub fn add_transaction(mut self, transaction: EVMTransaction) -> Self {
		self.block.transactions.push(transaction);
		self
	}

	/// Sets the transactions of the block.
	pub fn transactions(mut self, transactions: Vec<EVMTransaction>) -> Self {
		self.block.transactions = transactions;
		self
	}

	/// Builds the block.
	pub fn build(self) -> EVMBlock {
		self.block
	}

	/// Builds the header announcing this block.
	pub fn header(&self) -> EVMHeader {
		self.block.header()
	}
}
