//! Header sequence diagnostics.
//!
//! The scan loop processes headers in the order the node announces them. The
//! [`HeaderTracker`] keeps a short history so that duplicates, heights going
//! backwards and skipped heights can be reported. It never reorders or drops
//! anything itself.

use std::collections::VecDeque;

use alloy::primitives::B256;

use crate::models::EVMHeader;

/// Number of recent header hashes kept for duplicate detection
pub const DEFAULT_HEADER_HISTORY: usize = 128;

/// Result of checking an announced header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheckResult {
	/// Header follows the previous one
	Ok,
	/// Header with this hash was already announced
	Duplicate { number: u64 },
	/// Header height is below the next expected height (reorg or late delivery)
	OutOfOrder { expected: u64, received: u64 },
	/// Heights between `expected` and `received` were never announced
	Gap { expected: u64, received: u64 },
}

/// Tracks the sequence of headers seen by one scan loop
#[derive(Debug, Clone)]
pub struct HeaderTracker {
	history: VecDeque<B256>,
	expected_next: Option<u64>,
	last_number: Option<u64>,
	history_size: usize,
}

impl Default for HeaderTracker {
	fn default() -> Self {
		Self::new(DEFAULT_HEADER_HISTORY)
	}
}

impl HeaderTracker {
	/// Creates a tracker remembering the last `history_size` header hashes
	pub fn new(history_size: usize) -> Self {
		Self {
			history: VecDeque::with_capacity(history_size),
			expected_next: None,
			last_number: None,
			history_size,
		}
	}

	/// Height of the most recently recorded header
	pub fn last_number(&self) -> Option<u64> {
		self.last_number
	}

	/// Records a header and reports how it relates to the previous ones
	pub fn check(&mut self, header: &EVMHeader) -> HeaderCheckResult {
		if self.history.contains(&header.hash) {
			return HeaderCheckResult::Duplicate {
				number: header.number,
			};
		}

		let result = match self.expected_next {
			Some(expected) if header.number < expected => HeaderCheckResult::OutOfOrder {
				expected,
				received: header.number,
			},
			Some(expected) if header.number > expected => HeaderCheckResult::Gap {
				expected,
				received: header.number,
			},
			_ => HeaderCheckResult::Ok,
		};

		self.history.push_back(header.hash);
		while self.history.len() > self.history_size {
			self.history.pop_front();
		}

		// A lower height replaces the tip (reorg), so the next expected height follows it
		self.expected_next = Some(header.number.saturating_add(1));
		self.last_number = Some(header.number);

		result
	}
}
