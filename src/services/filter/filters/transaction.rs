//! Transaction filter tree.
//!
//! Every filter is a pure function of one enriched transaction. Combinators build
//! new filter values and never modify their operands, so a filter can be reused in
//! as many compositions as needed.

use std::{fmt, sync::Arc};

use alloy::primitives::{Address, U256};

use crate::{
	models::{EVMEnrichedTransaction, FilterConfig},
	services::filter::{
		helpers::evm::{parse_address, parse_selector, string_to_u256},
		FilterError,
	},
};

type PredicateFn = dyn Fn(&EVMEnrichedTransaction) -> bool + Send + Sync;

/// A named caller-supplied predicate
#[derive(Clone)]
pub struct Predicate {
	name: String,
	func: Arc<PredicateFn>,
}

impl Predicate {
	pub fn new<F>(name: impl Into<String>, func: F) -> Self
	where
		F: Fn(&EVMEnrichedTransaction) -> bool + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			func: Arc::new(func),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn evaluate(&self, transaction: &EVMEnrichedTransaction) -> bool {
		(self.func)(transaction)
	}
}

impl fmt::Debug for Predicate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Predicate").field("name", &self.name).finish()
	}
}

/// A predicate over an enriched transaction
///
/// Leaves compare one field of the transaction; `And`, `Or` and `Not` nodes
/// combine them. Comparisons on value and cost are strict.
#[derive(Debug, Clone)]
pub enum TransactionFilter {
	/// Destination equals the address; never matches a contract creation
	ToAddress(Address),
	/// Recovered sender equals the address
	FromAddress(Address),
	ValueGreaterThan(U256),
	ValueLessThan(U256),
	/// Total cost (value plus maximum fees) is above the threshold
	CostGreaterThan(U256),
	/// Total cost (value plus maximum fees) is below the threshold
	CostLessThan(U256),
	/// The first four bytes of call-data equal the selector
	FunctionSignature([u8; 4]),
	Custom(Predicate),
	And(Box<TransactionFilter>, Box<TransactionFilter>),
	Or(Box<TransactionFilter>, Box<TransactionFilter>),
	Not(Box<TransactionFilter>),
}

impl TransactionFilter {
	/// Matches transactions sent to `address` (hex, any case, `0x` optional)
	pub fn to_address(address: &str) -> Result<Self, FilterError> {
		parse_address(address).map(Self::ToAddress)
	}

	/// Matches transactions signed by `address` (hex, any case, `0x` optional)
	pub fn from_address(address: &str) -> Result<Self, FilterError> {
		parse_address(address).map(Self::FromAddress)
	}

	pub fn value_greater_than(value: impl Into<U256>) -> Self {
		Self::ValueGreaterThan(value.into())
	}

	pub fn value_less_than(value: impl Into<U256>) -> Self {
		Self::ValueLessThan(value.into())
	}

	pub fn cost_greater_than(cost: impl Into<U256>) -> Self {
		Self::CostGreaterThan(cost.into())
	}

	pub fn cost_less_than(cost: impl Into<U256>) -> Self {
		Self::CostLessThan(cost.into())
	}

	/// Matches calls whose selector equals `signature`
	///
	/// Accepts a 4-byte hex selector (`a9059cbb`, `0xa9059cbb`) or a textual
	/// signature (`transfer(address,uint256)`).
	pub fn function_signature(signature: &str) -> Result<Self, FilterError> {
		parse_selector(signature).map(Self::FunctionSignature)
	}

	pub fn custom<F>(name: impl Into<String>, func: F) -> Self
	where
		F: Fn(&EVMEnrichedTransaction) -> bool + Send + Sync + 'static,
	{
		Self::Custom(Predicate::new(name, func))
	}

	/// Returns a filter matching when both `self` and `other` match
	pub fn and(self, other: TransactionFilter) -> Self {
		Self::And(Box::new(self), Box::new(other))
	}

	/// Returns a filter matching when either `self` or `other` matches
	pub fn or(self, other: TransactionFilter) -> Self {
		Self::Or(Box::new(self), Box::new(other))
	}

	/// Returns a filter matching when `self` does not
	#[allow(clippy::should_implement_trait)]
	pub fn not(self) -> Self {
		Self::Not(Box::new(self))
	}

	/// Evaluates the filter against a transaction
	pub fn evaluate(&self, transaction: &EVMEnrichedTransaction) -> bool {
		match self {
			Self::ToAddress(address) => transaction.to() == Some(*address),
			Self::FromAddress(address) => transaction.sender() == *address,
			Self::ValueGreaterThan(threshold) => transaction.value() > *threshold,
			Self::ValueLessThan(threshold) => transaction.value() < *threshold,
			Self::CostGreaterThan(threshold) => transaction.cost() > *threshold,
			Self::CostLessThan(threshold) => transaction.cost() < *threshold,
			Self::FunctionSignature(selector) => transaction.selector() == Some(*selector),
			Self::Custom(predicate) => predicate.evaluate(transaction),
			Self::And(left, right) => left.evaluate(transaction) && right.evaluate(transaction),
			Self::Or(left, right) => left.evaluate(transaction) || right.evaluate(transaction),
			Self::Not(inner) => !inner.evaluate(transaction),
		}
	}
}

impl fmt::Display for TransactionFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ToAddress(address) => write!(f, "to == {}", address),
			Self::FromAddress(address) => write!(f, "from == {}", address),
			Self::ValueGreaterThan(threshold) => write!(f, "value > {}", threshold),
			Self::ValueLessThan(threshold) => write!(f, "value < {}", threshold),
			Self::CostGreaterThan(threshold) => write!(f, "cost > {}", threshold),
			Self::CostLessThan(threshold) => write!(f, "cost < {}", threshold),
			Self::FunctionSignature(selector) => {
				write!(f, "selector == 0x{}", hex::encode(selector))
			}
			Self::Custom(predicate) => write!(f, "{}(tx)", predicate.name()),
			Self::And(left, right) => write!(f, "({} && {})", left, right),
			Self::Or(left, right) => write!(f, "({} || {})", left, right),
			Self::Not(inner) => write!(f, "!({})", inner),
		}
	}
}

impl TryFrom<&FilterConfig> for TransactionFilter {
	type Error = FilterError;

	/// Builds the conjunction of every condition set in the config
	fn try_from(config: &FilterConfig) -> Result<Self, Self::Error> {
		let mut conditions = Vec::new();

		if let Some(to) = &config.to {
			conditions.push(Self::to_address(to)?);
		}
		if let Some(from) = &config.from {
			conditions.push(Self::from_address(from)?);
		}
		if let Some(value) = &config.value_gt {
			conditions.push(Self::ValueGreaterThan(string_to_u256(value)?));
		}
		if let Some(value) = &config.value_lt {
			conditions.push(Self::ValueLessThan(string_to_u256(value)?));
		}
		if let Some(cost) = &config.cost_gt {
			conditions.push(Self::CostGreaterThan(string_to_u256(cost)?));
		}
		if let Some(cost) = &config.cost_lt {
			conditions.push(Self::CostLessThan(string_to_u256(cost)?));
		}
		if let Some(signature) = &config.signature {
			conditions.push(Self::function_signature(signature)?);
		}

		conditions
			.into_iter()
			.reduce(Self::and)
			.ok_or_else(|| FilterError::invalid_config("filter has no conditions"))
	}
}
