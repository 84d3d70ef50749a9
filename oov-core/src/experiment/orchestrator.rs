use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::coverage::check_coverage;
use super::report::{GroupReport, RunReport, SetFailure, SetStats};
use crate::corpora::parse_group_dir_name;
use crate::error::{Error, Result};
use crate::io::{create_writer, ensure_dir, file_name, list_entries};
use crate::model::frequency::{FrequencyTable, WordFrequencyEntry, sum_counts};
use crate::model::partition::partition;
use crate::model::quota::{QuotaSelector, WordSelection};
use crate::model::threshold::Thresholds;

/// Parameters of an OOV experiment.
///
/// Group `i` (0-based) targets the OOV rate `starting_oov_rate + increase * i`
/// and holds `num_sets_in_group` independently selected word sets.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ExperimentConfig {
	pub starting_oov_rate: f64,
	pub increase: f64,
	pub num_groups: usize,
	pub num_sets_in_group: usize,
	pub thresholds: Thresholds,
}

impl Default for ExperimentConfig {
	fn default() -> Self {
		Self {
			starting_oov_rate: 0.005,
			increase: 0.005,
			num_groups: 5,
			num_sets_in_group: 5,
			thresholds: Thresholds::default(),
		}
	}
}

impl ExperimentConfig {
	/// Rejects parameters no run can satisfy.
	pub fn validate(&self) -> Result<()> {
		let fail = |reason: &str| Err(Error::Config(reason.to_owned()));
		if !self.starting_oov_rate.is_finite() || self.starting_oov_rate <= 0.0 {
			return fail("starting_oov_rate must be a positive number");
		}
		if !self.increase.is_finite() || self.increase < 0.0 {
			return fail("increase must be >= 0");
		}
		if self.num_groups == 0 {
			return fail("num_groups must be >= 1");
		}
		if self.num_sets_in_group == 0 {
			return fail("num_sets_in_group must be >= 1");
		}
		if self.thresholds.min_occurrence > self.thresholds.max_occurrence {
			return fail("min_occurrence must be <= max_occurrence");
		}
		Ok(())
	}

	/// OOV rate of a 1-based group index.
	pub fn oov_rate(&self, group: usize) -> f64 {
		self.starting_oov_rate + self.increase * group.saturating_sub(1) as f64
	}
}

/// Number of word occurrences to remove to reach `oov_rate`.
///
/// Example: `0.005` of `20000` words → `100`.
pub fn quota_for(oov_rate: f64, total_occurrences: u64) -> u64 {
	(oov_rate * total_occurrences as f64).ceil() as u64
}

/// Name of a group directory: `group_<group>_<oov_rate>`.
pub fn group_dir_name(group: usize, oov_rate: f64) -> String {
	format!("group_{group}_{oov_rate}")
}

/// Layout of the experiment under a data directory.
#[derive(Clone, Debug)]
pub struct ExperimentPaths {
	pub frequency_dir: PathBuf,
	pub candidate_dir: PathBuf,
}

impl ExperimentPaths {
	pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
		let data_dir = data_dir.as_ref();
		Self {
			frequency_dir: data_dir.join("word_frequency_files"),
			candidate_dir: data_dir.join("candidate_output"),
		}
	}

	/// Creates both output directories.
	pub fn create(&self) -> Result<()> {
		ensure_dir(&self.frequency_dir)?;
		ensure_dir(&self.candidate_dir)?;
		Ok(())
	}

	pub fn text_corpus_frequencies(&self) -> PathBuf {
		self.frequency_dir.join("text_corpus")
	}

	pub fn test_corpus_frequencies(&self) -> PathBuf {
		self.frequency_dir.join("test_corpus")
	}

	pub fn group_dir(&self, group: usize, oov_rate: f64) -> PathBuf {
		self.candidate_dir.join(group_dir_name(group, oov_rate))
	}

	pub fn summary(&self) -> PathBuf {
		self.candidate_dir.join("summary.json")
	}
}

/// What happened to one set of a group.
#[derive(Clone, Debug, PartialEq)]
pub enum SetOutcome {
	Selected(WordSelection),
	Exhausted(SetFailure),
}

/// All sets selected for one OOV rate.
#[derive(Clone, Debug, PartialEq)]
pub struct OovGroup {
	/// 1-based group index.
	pub group: usize,
	pub oov_rate: f64,
	pub quota: u64,
	pub sets: Vec<SetOutcome>,
}

/// Sweeps the OOV rates and builds the candidate sets of every group.
#[derive(Clone, Copy, Debug)]
pub struct GroupOrchestrator {
	config: ExperimentConfig,
}

impl GroupOrchestrator {
	/// # Errors
	/// Returns `Error::Config` if the configuration does not validate.
	pub fn new(config: ExperimentConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self { config })
	}

	pub fn config(&self) -> &ExperimentConfig {
		&self.config
	}

	/// Builds one group from the filtered candidates.
	///
	/// The candidates are never modified: the partition works on a copy,
	/// and each set is consumed by its own selection. A set whose
	/// candidates run out is logged and kept as `SetOutcome::Exhausted`.
	pub fn build_group<R: Rng + ?Sized>(
		&self,
		group: usize,
		candidates: &[WordFrequencyEntry],
		test_total: u64,
		rng: &mut R,
	) -> Result<OovGroup> {
		if group == 0 {
			return Err(Error::Config("group indices start at 1".to_owned()));
		}
		let oov_rate = self.config.oov_rate(group);
		let quota = quota_for(oov_rate, test_total);
		if quota == 0 {
			return Err(Error::Config(format!(
				"OOV rate {oov_rate} of {test_total} test words gives nothing to remove"
			)));
		}

		let selector = QuotaSelector::new(self.config.thresholds.max_occurrence);
		let mut sets = Vec::with_capacity(self.config.num_sets_in_group);

		for (index, mut working) in partition(candidates, self.config.num_sets_in_group, rng)?
			.into_iter()
			.enumerate()
		{
			let available = working.len();
			match selector.select(&mut working, quota, rng) {
				Ok(selection) => sets.push(SetOutcome::Selected(selection)),
				Err(Error::Exhausted { quota, reached, selected }) => {
					warn!(
						"group {group} set {}: candidates exhausted at {reached} of {quota} occurrences ({selected} of {available} words used)",
						index + 1
					);
					sets.push(SetOutcome::Exhausted(SetFailure {
						set: index + 1,
						quota,
						reached,
						selected,
						available,
					}));
				}
				Err(e) => return Err(e),
			}
		}

		Ok(OovGroup { group, oov_rate, quota, sets })
	}

	/// Writes the sets of a group as `word<TAB>count` files named `1..=N`.
	///
	/// Exhausted sets get no file. Files left by a previous run are removed,
	/// both for exhausted sets and for set numbers above the group's size.
	pub fn save_group(&self, group: &OovGroup, dir: &Path) -> Result<GroupReport> {
		ensure_dir(dir)?;
		let mut report = GroupReport {
			group: group.group,
			oov_rate: group.oov_rate,
			quota: group.quota,
			directory: dir.to_path_buf(),
			sets: Vec::new(),
			failures: Vec::new(),
		};

		for (index, outcome) in group.sets.iter().enumerate() {
			let path = dir.join((index + 1).to_string());
			match outcome {
				SetOutcome::Selected(selection) => {
					let mut writer = create_writer(&path)?;
					for entry in selection.entries() {
						writeln!(writer, "{}\t{}", entry.word, entry.count).map_err(Error::io(&path))?;
					}
					writer.flush().map_err(Error::io(&path))?;
					report.sets.push(SetStats::new(index + 1, selection));
				}
				SetOutcome::Exhausted(failure) => {
					if path.exists() {
						fs::remove_file(&path).map_err(Error::io(&path))?;
					}
					report.failures.push(failure.clone());
				}
			}
		}

		for path in list_entries(dir, |p| p.is_file())? {
			let stale = file_name(&path)
				.and_then(|name| name.parse::<usize>().ok())
				.is_some_and(|set| set > group.sets.len());
			if stale {
				warn!("removing {}: left by a previous run", path.display());
				fs::remove_file(&path).map_err(Error::io(&path))?;
			}
		}

		Ok(report)
	}

	/// Removes the `group_<i>_<rate>` directories of `candidate_dir` that
	/// the current configuration does not produce.
	fn remove_stale_groups(&self, candidate_dir: &Path) -> Result<()> {
		let current: HashSet<String> = (1..=self.config.num_groups)
			.map(|group| group_dir_name(group, self.config.oov_rate(group)))
			.collect();

		for dir in list_entries(candidate_dir, |p| p.is_dir())? {
			let Some(name) = file_name(&dir) else { continue };
			if parse_group_dir_name(&name).is_some() && !current.contains(&name) {
				warn!("removing {}: left by a previous run", dir.display());
				fs::remove_dir_all(&dir).map_err(Error::io(&dir))?;
			}
		}
		Ok(())
	}

	/// Runs the whole experiment.
	///
	/// # Behavior
	/// - Checks that the test corpus only uses characters of the training text.
	/// - Filters the test corpus words with the thresholds.
	/// - Builds, saves and logs every group.
	/// - Removes group directories left by a run with another configuration.
	/// - Writes `summary.json` in the candidate directory.
	///
	/// # Errors
	/// - `Error::Coverage` before anything is written if the check fails.
	/// - `Error::Io` if an output cannot be written.
	///
	/// Exhausted sets are not errors; they are listed in the returned report.
	pub fn run<R: Rng + ?Sized>(
		&self,
		train: &FrequencyTable,
		test: &FrequencyTable,
		paths: &ExperimentPaths,
		rng: &mut R,
	) -> Result<RunReport> {
		check_coverage(train, test)?;

		info!("creating {} groups of sets", self.config.num_groups);
		let test_total = test.total_occurrences();
		info!("total number of words in the test set: {test_total}");

		let candidates = self.config.thresholds.filter(test.entries());
		let candidate_total = sum_counts(&candidates);
		info!(
			"total number of words after threshold filtering: {candidate_total} ({} distinct)",
			candidates.len()
		);
		info!("thresholds: {:?}", self.config.thresholds);

		let mut groups = Vec::with_capacity(self.config.num_groups);
		for group in 1..=self.config.num_groups {
			let oov_rate = self.config.oov_rate(group);
			info!("OOV rate: {}%", oov_rate * 100.0);

			let built = self.build_group(group, &candidates, test_total, rng)?;
			let report = self.save_group(&built, &paths.group_dir(group, oov_rate))?;
			report.log_table();
			groups.push(report);
		}
		self.remove_stale_groups(&paths.candidate_dir)?;

		let report = RunReport {
			config: self.config,
			test_total,
			candidate_words: candidates.len(),
			candidate_total,
			groups,
		};
		report.write_json(paths.summary())?;
		Ok(report)
	}
}
