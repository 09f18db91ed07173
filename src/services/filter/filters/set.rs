//! Ordered disjunction of filters.

use crate::{
	models::{EVMEnrichedTransaction, FilterConfig},
	services::filter::{FilterError, TransactionFilter},
};

/// Filters of which any one must match
///
/// An empty set matches every transaction.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
	filters: Vec<TransactionFilter>,
}

impl FilterSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a filter, builder style
	pub fn with(mut self, filter: TransactionFilter) -> Self {
		self.filters.push(filter);
		self
	}

	pub fn push(&mut self, filter: TransactionFilter) {
		self.filters.push(filter);
	}

	pub fn len(&self) -> usize {
		self.filters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.filters.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &TransactionFilter> {
		self.filters.iter()
	}

	/// Returns true if the set is empty or any filter matches, stopping at the first match
	pub fn evaluate(&self, transaction: &EVMEnrichedTransaction) -> bool {
		self.filters.is_empty() || self.filters.iter().any(|f| f.evaluate(transaction))
	}
}

impl From<Vec<TransactionFilter>> for FilterSet {
	fn from(filters: Vec<TransactionFilter>) -> Self {
		Self { filters }
	}
}

impl FromIterator<TransactionFilter> for FilterSet {
	fn from_iter<I: IntoIterator<Item = TransactionFilter>>(iter: I) -> Self {
		Self {
			filters: iter.into_iter().collect(),
		}
	}
}

impl TryFrom<&[FilterConfig]> for FilterSet {
	type Error = FilterError;

	fn try_from(configs: &[FilterConfig]) -> Result<Self, Self::Error> {
		configs.iter().map(TransactionFilter::try_from).collect()
	}
}
