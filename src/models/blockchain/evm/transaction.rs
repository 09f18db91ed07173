//! EVM transaction data structures.

use std::ops::Deref;

use alloy::{
	consensus::{Transaction as ConsensusTransaction, TxEnvelope},
	eips::eip4844::DATA_GAS_PER_BLOB,
	primitives::{Address, Bytes, B256, U256},
};
use serde::{Deserialize, Serialize};

/// Wrapper around a signed alloy transaction envelope
///
/// This type exposes the fields the filters look at (destination, value, cost,
/// call-data) for every transaction type (legacy, EIP-2930, EIP-1559, EIP-4844,
/// EIP-7702) without callers having to match on the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction(pub TxEnvelope);

impl Transaction {
	/// Get the transaction hash
	pub fn hash(&self) -> B256 {
		*self.0.tx_hash()
	}

	/// Get the transaction nonce
	pub fn nonce(&self) -> u64 {
		self.0.nonce()
	}

	/// Get the transaction recipient address (None for contract creation)
	pub fn to(&self) -> Option<Address> {
		ConsensusTransaction::to(&self.0)
	}

	/// Returns true when the transaction deploys a contract
	pub fn is_contract_creation(&self) -> bool {
		self.0.is_create()
	}

	/// Get the transaction value (amount of native currency transferred)
	pub fn value(&self) -> U256 {
		self.0.value()
	}

	/// Get the call-data
	pub fn input(&self) -> &Bytes {
		self.0.input()
	}

	/// Get the leading four bytes of the call-data, if present
	pub fn selector(&self) -> Option<[u8; 4]> {
		self.input().get(..4).and_then(|bytes| bytes.try_into().ok())
	}

	/// Get the gas limit for the transaction
	pub fn gas_limit(&self) -> u64 {
		self.0.gas_limit()
	}

	/// Get the gas price (None for EIP-1559 style transactions)
	pub fn gas_price(&self) -> Option<u128> {
		self.0.gas_price()
	}

	/// Get the fee cap per gas; equals the gas price for legacy transactions
	pub fn max_fee_per_gas(&self) -> u128 {
		self.0.max_fee_per_gas()
	}

	/// Get the priority fee cap (None for legacy transactions)
	pub fn max_priority_fee_per_gas(&self) -> Option<u128> {
		self.0.max_priority_fee_per_gas()
	}

	/// Get the chain id embedded in the transaction (None for pre-EIP-155 legacy)
	pub fn chain_id(&self) -> Option<u64> {
		self.0.chain_id()
	}

	/// Upper bound of what the transaction can cost its sender.
	///
	/// `gas_limit * max_fee_per_gas + blob_gas * max_fee_per_blob_gas + value`
	pub fn cost(&self) -> U256 {
		let mut cost = U256::from(self.gas_limit()) * U256::from(self.max_fee_per_gas());

		if let (Some(hashes), Some(blob_fee)) = (
			self.0.blob_versioned_hashes(),
			self.0.max_fee_per_blob_gas(),
		) {
			let blob_gas = U256::from(hashes.len() as u64) * U256::from(DATA_GAS_PER_BLOB);
			cost = cost.saturating_add(blob_gas * U256::from(blob_fee));
		}

		cost.saturating_add(self.value())
	}
}

impl From<TxEnvelope> for Transaction {
	fn from(envelope: TxEnvelope) -> Self {
		Self(envelope)
	}
}

impl Deref for Transaction {
	type Target = TxEnvelope;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// A transaction paired with its recovered sender.
///
/// Built once per transaction when a block is fetched. The sender is never
/// re-derived afterwards, so filters stay pure functions over this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedTransaction {
	transaction: Transaction,
	sender: Address,
	base_fee_per_gas: Option<u64>,
}

impl EnrichedTransaction {
	pub fn new(transaction: Transaction, sender: Address, base_fee_per_gas: Option<u64>) -> Self {
		Self {
			transaction,
			sender,
			base_fee_per_gas,
		}
	}

	/// Address that signed the transaction
	pub fn sender(&self) -> Address {
		self.sender
	}

	pub fn transaction(&self) -> &Transaction {
		&self.transaction
	}

	pub fn into_transaction(self) -> Transaction {
		self.transaction
	}

	/// Base fee of the block the transaction was included in
	pub fn base_fee_per_gas(&self) -> Option<u64> {
		self.base_fee_per_gas
	}

	/// Price per gas actually paid, given the enclosing block's base fee
	pub fn effective_gas_price(&self) -> u128 {
		self.transaction.0.effective_gas_price(self.base_fee_per_gas)
	}
}

impl Deref for EnrichedTransaction {
	type Target = Transaction;

	fn deref(&self) -> &Self::Target {
		&self.transaction
	}
}
