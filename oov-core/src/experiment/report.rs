use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use super::orchestrator::ExperimentConfig;
use crate::error::{Error, Result};
use crate::io::create_writer;
use crate::model::quota::WordSelection;

/// Statistics of one persisted candidate set.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SetStats {
	/// 1-based set index, also the set file name.
	pub set: usize,
	pub unique_words: usize,
	pub total: u64,
	pub goal: u64,
	/// `|1 - total / goal| * 100`, rounded to two decimals.
	pub diff_percent: f64,
}

impl SetStats {
	pub fn new(set: usize, selection: &WordSelection) -> Self {
		let total = selection.total();
		let goal = selection.quota();
		let diff = (1.0 - total as f64 / goal as f64).abs() * 100.0;
		Self {
			set,
			unique_words: selection.len(),
			total,
			goal,
			diff_percent: (diff * 100.0).round() / 100.0,
		}
	}
}

/// A set whose candidates ran out before reaching the quota.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SetFailure {
	pub set: usize,
	pub quota: u64,
	pub reached: u64,
	pub selected: usize,
	pub available: usize,
}

/// Outcome of one OOV rate.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GroupReport {
	/// 1-based group index.
	pub group: usize,
	pub oov_rate: f64,
	pub quota: u64,
	pub directory: PathBuf,
	pub sets: Vec<SetStats>,
	pub failures: Vec<SetFailure>,
}

impl GroupReport {
	/// Logs the per-set table of this group.
	pub fn log_table(&self) {
		info!("Set\tnum-unique-words\tsum-of-words-in-set\tgoal\tdiff");
		for stats in &self.sets {
			info!(
				"set {}:\t{}\t{}\t{}\t{}%",
				stats.set, stats.unique_words, stats.total, stats.goal, stats.diff_percent
			);
		}
	}
}

/// Summary of a whole run, written as `summary.json`.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RunReport {
	pub config: ExperimentConfig,
	/// Number of word tokens in the test corpus.
	pub test_total: u64,
	/// Distinct words left after threshold filtering.
	pub candidate_words: usize,
	/// Summed occurrences of those candidate words.
	pub candidate_total: u64,
	pub groups: Vec<GroupReport>,
}

impl RunReport {
	/// All sets that could not reach their quota, with their group index.
	pub fn failures(&self) -> impl Iterator<Item = (usize, &SetFailure)> {
		self.groups
			.iter()
			.flat_map(|g| g.failures.iter().map(move |f| (g.group, f)))
	}

	pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let path = path.as_ref();
		let mut writer = create_writer(path)?;
		serde_json::to_writer_pretty(&mut writer, self).map_err(|e| Error::io(path)(e.into()))?;
		writer.flush().map_err(Error::io(path))
	}
}
