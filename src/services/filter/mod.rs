//! Transaction filtering.
//!
//! A [`TransactionFilter`] is a predicate over an enriched transaction. Filters
//! compose with `and`/`or`/`not` into a single tree, and a [`FilterSet`] matches
//! a transaction when any of its filters does (or when it is empty).

mod error;
mod filters;
pub mod helpers;

pub use error::FilterError;
pub use filters::{FilterSet, Predicate, TransactionFilter};
