use rand::Rng;
use rand::seq::SliceRandom;

use super::frequency::WordFrequencyEntry;
use crate::error::{Error, Result};

/// Randomly splits candidates into `num_sets` disjoint sets.
///
/// The candidates are shuffled, then cut into contiguous chunks of
/// `ceil(len / num_sets)` entries. The last chunk may be shorter, and
/// when there are too few candidates to fill every set the trailing
/// sets are empty, so exactly `num_sets` sets are always returned.
///
/// # Errors
/// Returns `Error::Config` if `num_sets` is 0.
pub fn partition<R: Rng + ?Sized>(
	candidates: &[WordFrequencyEntry],
	num_sets: usize,
	rng: &mut R,
) -> Result<Vec<Vec<WordFrequencyEntry>>> {
	if num_sets == 0 {
		return Err(Error::Config("the number of sets must be >= 1".to_owned()));
	}

	let mut shuffled = candidates.to_vec();
	shuffled.shuffle(rng);

	let chunk_size = shuffled.len().div_ceil(num_sets).max(1);
	let mut sets: Vec<Vec<WordFrequencyEntry>> = shuffled
		.chunks(chunk_size)
		.map(<[WordFrequencyEntry]>::to_vec)
		.collect();
	sets.resize_with(num_sets, Vec::new);

	Ok(sets)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn candidates(n: usize) -> Vec<WordFrequencyEntry> {
		(0..n).map(|i| WordFrequencyEntry::new(format!("w{i}"), (i % 7 + 1) as u64)).collect()
	}

	fn sorted_words(sets: &[Vec<WordFrequencyEntry>]) -> Vec<String> {
		let mut words: Vec<String> = sets.iter().flatten().map(|e| e.word.clone()).collect();
		words.sort();
		words
	}

	#[test]
	fn union_is_the_input_for_any_set_count() {
		let input = candidates(23);
		let mut expected: Vec<String> = input.iter().map(|e| e.word.clone()).collect();
		expected.sort();

		let mut rng = StdRng::seed_from_u64(7);
		for n in 1..=30 {
			let sets = partition(&input, n, &mut rng).unwrap();
			assert_eq!(sets.len(), n);
			assert_eq!(sorted_words(&sets), expected, "n = {n}");
		}
	}

	#[test]
	fn chunks_have_ceiling_size() {
		let mut rng = StdRng::seed_from_u64(1);
		let sets = partition(&candidates(10), 4, &mut rng).unwrap();
		let sizes: Vec<usize> = sets.iter().map(Vec::len).collect();
		assert_eq!(sizes, vec![3, 3, 3, 1]);

		let sets = partition(&candidates(5), 4, &mut rng).unwrap();
		let sizes: Vec<usize> = sets.iter().map(Vec::len).collect();
		assert_eq!(sizes, vec![2, 2, 1, 0]);
	}

	#[test]
	fn same_seed_same_partition() {
		let input = candidates(50);
		let a = partition(&input, 5, &mut StdRng::seed_from_u64(42)).unwrap();
		let b = partition(&input, 5, &mut StdRng::seed_from_u64(42)).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn empty_input_gives_empty_sets() {
		let sets = partition(&[], 3, &mut StdRng::seed_from_u64(0)).unwrap();
		assert_eq!(sets.len(), 3);
		assert!(sets.iter().all(Vec::is_empty));
	}

	#[test]
	fn zero_sets_is_rejected() {
		let err = partition(&candidates(3), 0, &mut StdRng::seed_from_u64(0)).unwrap_err();
		assert!(matches!(err, Error::Config(_)));
	}
}
