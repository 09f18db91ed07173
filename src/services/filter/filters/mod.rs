//! Filter implementations.

mod set;
mod transaction;

pub use set::FilterSet;
pub use transaction::{Predicate, TransactionFilter};
