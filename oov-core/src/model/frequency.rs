use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::Path;
use std::thread;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::io::{create_writer, read_lines};

/// A word and the number of times it occurs in a corpus.
///
/// # Invariants
/// - `count` is always >= 1
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WordFrequencyEntry {
	pub word: String,
	pub count: u64,
}

impl WordFrequencyEntry {
	pub fn new(word: impl Into<String>, count: u64) -> Self {
		Self { word: word.into(), count }
	}
}

/// Word counts of a whole corpus, ordered by descending count.
///
/// Words are unique. Equal counts keep the order in which the words
/// first appeared in the corpus (or in the frequency file they were
/// read from).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyTable {
	entries: Vec<WordFrequencyEntry>,
}

impl FrequencyTable {
	/// Builds a table from entries already in tie-break order.
	///
	/// The sort is stable, so entries with equal counts keep their relative order.
	pub fn from_entries(mut entries: Vec<WordFrequencyEntry>) -> Self {
		entries.sort_by(|a, b| b.count.cmp(&a.count));
		Self { entries }
	}

	pub fn entries(&self) -> &[WordFrequencyEntry] {
		&self.entries
	}

	pub fn into_entries(self) -> Vec<WordFrequencyEntry> {
		self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Count of a single word, if present.
	pub fn count_of(&self, word: &str) -> Option<u64> {
		self.entries.iter().find(|e| e.word == word).map(|e| e.count)
	}

	/// Sum of all counts, i.e. the number of tokens in the corpus.
	pub fn total_occurrences(&self) -> u64 {
		sum_counts(&self.entries)
	}

	/// Every character used by at least one word.
	pub fn characters(&self) -> BTreeSet<char> {
		self.entries.iter().flat_map(|e| e.word.chars()).collect()
	}
}

/// Sum of the counts of a list of entries.
pub fn sum_counts(entries: &[WordFrequencyEntry]) -> u64 {
	entries.iter().map(|e| e.count).sum()
}

/// Partial counts of one chunk of lines.
///
/// Each word keeps its count and the position `(line, token)` where it
/// was first seen, so that chunks counted on different threads can be
/// merged back into the sequential order.
#[derive(Default)]
struct Tally {
	words: HashMap<String, (u64, (usize, usize))>,
}

impl Tally {
	fn add(&mut self, word: &str, position: (usize, usize)) {
		match self.words.get_mut(word) {
			Some((count, _)) => *count += 1,
			None => {
				self.words.insert(word.to_owned(), (1, position));
			}
		}
	}

	fn merge(&mut self, other: Tally) {
		for (word, (count, position)) in other.words {
			let slot = self.words.entry(word).or_insert((0, position));
			slot.0 += count;
			slot.1 = slot.1.min(position);
		}
	}

	fn into_table(self) -> FrequencyTable {
		let mut words: Vec<_> = self.words.into_iter().collect();
		words.sort_by(|(_, (ca, pa)), (_, (cb, pb))| cb.cmp(ca).then(pa.cmp(pb)));
		FrequencyTable {
			entries: words
				.into_iter()
				.map(|(word, (count, _))| WordFrequencyEntry { word, count })
				.collect(),
		}
	}
}

/// Counts whitespace-separated words in a corpus.
///
/// # Parameters
/// - `contains_id`: the first token of every line is an utterance id
///   (Kaldi `text` files) and is not counted.
/// - `jobs`: number of threads used to count. `0` uses one per CPU.
#[derive(Clone, Copy, Debug)]
pub struct FrequencyCounter {
	contains_id: bool,
	jobs: usize,
}

impl FrequencyCounter {
	pub fn new(contains_id: bool) -> Self {
		Self { contains_id, jobs: 1 }
	}

	pub fn with_jobs(mut self, jobs: usize) -> Self {
		self.jobs = jobs;
		self
	}

	fn tokens<'a>(&self, line: &'a str) -> impl Iterator<Item = &'a str> {
		let mut tokens = line.split_whitespace();
		if self.contains_id {
			tokens.next();
		}
		tokens
	}

	fn tally(&self, lines: &[String], offset: usize) -> Tally {
		let mut tally = Tally::default();
		for (i, line) in lines.iter().enumerate() {
			for (j, word) in self.tokens(line).enumerate() {
				tally.add(word, (offset + i, j));
			}
		}
		tally
	}

	/// Counts the words of in-memory lines.
	///
	/// With more than one job, the lines are split in contiguous chunks,
	/// each chunk is counted on its own thread and the partial counts are
	/// merged. The result is identical to a sequential count.
	pub fn count_lines(&self, lines: &[String]) -> Result<FrequencyTable> {
		let jobs = match self.jobs {
			0 => num_cpus::get(),
			n => n,
		};

		if jobs <= 1 || lines.len() < 2 {
			return Ok(self.tally(lines, 0).into_table());
		}

		let chunk_size = lines.len().div_ceil(jobs);
		debug!("counting {} lines on {} threads", lines.len(), lines.len().div_ceil(chunk_size));

		let mut handles = Vec::new();
		for (index, chunk) in lines.chunks(chunk_size).enumerate() {
			let counter = *self;
			let chunk: Vec<String> = chunk.to_vec();
			let offset = index * chunk_size;
			handles.push(thread::spawn(move || counter.tally(&chunk, offset)));
		}

		let mut total = Tally::default();
		for handle in handles {
			total.merge(handle.join().map_err(|_| Error::Join)?);
		}
		Ok(total.into_table())
	}

	/// Reads a corpus file and counts its words.
	pub fn count_file<P: AsRef<Path>>(&self, path: P) -> Result<FrequencyTable> {
		let path = path.as_ref();
		let lines = read_lines(path)?;
		info!("counting words in {} ({} lines)", path.display(), lines.len());
		self.count_lines(&lines)
	}
}

/// Writes a frequency table as `word count` lines.
pub fn write_frequency_file<P: AsRef<Path>>(table: &FrequencyTable, path: P) -> Result<()> {
	let path = path.as_ref();
	let mut writer = create_writer(path)?;
	for entry in table.entries() {
		writeln!(writer, "{} {}", entry.word, entry.count).map_err(Error::io(path))?;
	}
	writer.flush().map_err(Error::io(path))
}

/// Reads a frequency file written by [`write_frequency_file`].
///
/// # Errors
/// Returns `Error::Format` with the 1-based line number when a line is
/// not exactly `word count` with a positive integer count.
pub fn read_frequency_file<P: AsRef<Path>>(path: P) -> Result<FrequencyTable> {
	let path = path.as_ref();
	let mut entries = Vec::new();

	for (index, line) in read_lines(path)?.iter().enumerate() {
		let format_error = |reason: &str| Error::Format {
			path: path.to_path_buf(),
			line: index + 1,
			reason: reason.to_owned(),
		};

		let (word, count) = line
			.trim_end()
			.split_once(' ')
			.ok_or_else(|| format_error("expected `word count`"))?;
		if word.is_empty() {
			return Err(format_error("empty word"));
		}
		let count: u64 = count
			.parse()
			.map_err(|_| format_error("count is not a positive integer"))?;
		if count == 0 {
			return Err(format_error("count is not a positive integer"));
		}
		entries.push(WordFrequencyEntry::new(word, count));
	}

	Ok(FrequencyTable::from_entries(entries))
}

/// Returns the frequency table of `source`, using `cache` when possible.
///
/// - If `cache` is missing or `recompute` is set, `source` is counted and
///   the table is written to `cache`.
/// - Otherwise the table is read back from `cache`.
pub fn load_or_count<S, C>(counter: &FrequencyCounter, source: S, cache: C, recompute: bool) -> Result<FrequencyTable>
where
	S: AsRef<Path>,
	C: AsRef<Path>,
{
	let cache = cache.as_ref();
	if cache.exists() && !recompute {
		info!("reusing word frequencies from {}", cache.display());
		return read_frequency_file(cache);
	}

	let table = counter.count_file(source)?;
	write_frequency_file(&table, cache)?;
	info!("wrote {} word frequencies to {}", table.len(), cache.display());
	Ok(table)
}
