use serde::{Deserialize, Serialize};

use super::frequency::WordFrequencyEntry;

/// Bounds a word must satisfy to become an OOV candidate.
///
/// A word qualifies iff `min_occurrence <= count <= max_occurrence`
/// and it has at least `min_length` characters.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
	pub min_occurrence: u64,
	pub max_occurrence: u64,
	pub min_length: usize,
}

impl Default for Thresholds {
	fn default() -> Self {
		Self { min_occurrence: 5, max_occurrence: 50, min_length: 2 }
	}
}

impl Thresholds {
	/// Whether a single entry is eligible.
	///
	/// Length is measured in characters, not bytes.
	pub fn accepts(&self, entry: &WordFrequencyEntry) -> bool {
		(self.min_occurrence..=self.max_occurrence).contains(&entry.count)
			&& entry.word.chars().count() >= self.min_length
	}

	/// Keeps the qualifying entries, preserving their order.
	pub fn filter(&self, entries: &[WordFrequencyEntry]) -> Vec<WordFrequencyEntry> {
		entries.iter().filter(|e| self.accepts(e)).cloned().collect()
	}
}
