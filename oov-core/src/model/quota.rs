use rand::Rng;
use serde::Serialize;

use super::frequency::{WordFrequencyEntry, sum_counts};
use crate::error::{Error, Result};

/// Words picked for removal from one candidate set.
///
/// # Invariants
/// - No word appears twice
/// - `total() >= quota`, and the total before the last pick was `< quota`
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct WordSelection {
	entries: Vec<WordFrequencyEntry>,
	quota: u64,
}

impl WordSelection {
	pub fn entries(&self) -> &[WordFrequencyEntry] {
		&self.entries
	}

	pub fn quota(&self) -> u64 {
		self.quota
	}

	/// Number of distinct words selected.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Summed occurrences of the selected words.
	pub fn total(&self) -> u64 {
		sum_counts(&self.entries)
	}
}

/// Greedy selection of words until their occurrences reach a quota.
///
/// Each step computes what is left of the quota. If the remainder passes
/// the `max_occurrence` gate and a candidate occurs exactly that many
/// times, the first such candidate is taken; otherwise a uniformly random
/// candidate is. Picked candidates are removed from the working set.
#[derive(Clone, Copy, Debug)]
pub struct QuotaSelector {
	max_occurrence: u64,
}

impl QuotaSelector {
	pub fn new(max_occurrence: u64) -> Self {
		Self { max_occurrence }
	}

	/// The exact-match gate: `left / quota <= max_occurrence / quota`.
	fn prefers_exact_match(&self, left: u64, quota: u64) -> bool {
		left as f64 / quota as f64 <= self.max_occurrence as f64 / quota as f64
	}

	/// Selects words from `working` until their summed count reaches `quota`.
	///
	/// # Notes
	/// - `working` is consumed: every selected entry is removed from it.
	///   Pass a copy to keep the original candidates.
	///
	/// # Errors
	/// - `Error::Config` if `quota` is 0.
	/// - `Error::Exhausted` if `working` empties before the quota is reached.
	pub fn select<R: Rng + ?Sized>(
		&self,
		working: &mut Vec<WordFrequencyEntry>,
		quota: u64,
		rng: &mut R,
	) -> Result<WordSelection> {
		if quota == 0 {
			return Err(Error::Config("the quota must be > 0".to_owned()));
		}

		let mut entries = Vec::new();
		let mut selected: u64 = 0;

		while selected < quota {
			if working.is_empty() {
				return Err(Error::Exhausted { quota, reached: selected, selected: entries.len() });
			}

			let left = quota - selected;
			let exact = if self.prefers_exact_match(left, quota) {
				working.iter().position(|e| e.count == left)
			} else {
				None
			};
			let index = exact.unwrap_or_else(|| rng.random_range(0..working.len()));

			let entry = working.remove(index);
			selected += entry.count;
			entries.push(entry);
		}

		Ok(WordSelection { entries, quota })
	}
}
