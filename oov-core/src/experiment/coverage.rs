use std::collections::BTreeSet;

use log::info;

use crate::error::{Error, Result};
use crate::model::frequency::FrequencyTable;

/// Checks that every character of the test corpus occurs in the training text.
///
/// Returns the characters of the training text on success.
///
/// # Errors
/// Returns `Error::Coverage` with the sorted, de-duplicated characters
/// of `test` that never occur in `train`.
pub fn check_coverage(train: &FrequencyTable, test: &FrequencyTable) -> Result<BTreeSet<char>> {
	let legal = train.characters();
	info!(
		"chars in text corpus: {}",
		legal.iter().map(char::to_string).collect::<Vec<_>>().join(" ")
	);

	let illegal: Vec<char> = test.characters().difference(&legal).copied().collect();
	if !illegal.is_empty() {
		return Err(Error::Coverage { chars: illegal });
	}
	Ok(legal)
}
