//! Language-model corpora with the candidate words held out.
//!
//! Every set written by the experiment becomes one text corpus made of
//! the training lines that contain none of the set's words, so that
//! those words are truly out of vocabulary for a model trained on it.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::io::{create_writer, ensure_dir, file_name, list_entries, read_lines};

/// A `group_<i>_<rate>` directory found on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateGroup {
	/// 1-based group index parsed from the directory name.
	pub group: usize,
	/// Directory name, reused for the output directory.
	pub name: String,
	pub oov_rate: f64,
	/// Set files, sorted by their numeric name.
	pub sets: Vec<PathBuf>,
}

/// Parses `group_<i>_<rate>` into its index and rate.
pub fn parse_group_dir_name(name: &str) -> Option<(usize, f64)> {
	let (group, rate) = name.strip_prefix("group_")?.split_once('_')?;
	Some((group.parse().ok()?, rate.parse().ok()?))
}

/// Finds the candidate groups in `candidates_dir`, sorted by group index.
///
/// Entries that are not `group_<i>_<rate>` directories are skipped, as
/// are files inside a group whose name is not a set number. Two
/// directories with the same group index are a `Error::Config`.
pub fn discover_groups<P: AsRef<Path>>(candidates_dir: P) -> Result<Vec<CandidateGroup>> {
	let mut groups = Vec::new();

	for dir in list_entries(&candidates_dir, |p| p.is_dir())? {
		let Some(name) = file_name(&dir) else { continue };
		let Some((group, oov_rate)) = parse_group_dir_name(&name) else {
			warn!("skipping {}: not a group directory", dir.display());
			continue;
		};

		let mut sets: Vec<(usize, PathBuf)> = list_entries(&dir, |p| p.is_file())?
			.into_iter()
			.filter_map(|path| Some((file_name(&path)?.parse().ok()?, path)))
			.collect();
		sets.sort();

		groups.push(CandidateGroup {
			group,
			name,
			oov_rate,
			sets: sets.into_iter().map(|(_, path)| path).collect(),
		});
	}

	groups.sort_by_key(|g| g.group);
	if let Some(pair) = groups.windows(2).find(|pair| pair[0].group == pair[1].group) {
		return Err(Error::Config(format!(
			"{} and {} both hold group {}",
			pair[0].name, pair[1].name, pair[0].group
		)));
	}
	Ok(groups)
}

/// Reads the words of a set file (first tab-separated column).
pub fn read_candidate_words<P: AsRef<Path>>(path: P) -> Result<HashSet<String>> {
	let path = path.as_ref();
	let mut words = HashSet::new();
	for (index, line) in read_lines(path)?.iter().enumerate() {
		let word = line.split('\t').next().unwrap_or_default().trim();
		if word.is_empty() {
			return Err(Error::Format {
				path: path.to_path_buf(),
				line: index + 1,
				reason: "empty candidate word".to_owned(),
			});
		}
		words.insert(word.to_owned());
	}
	Ok(words)
}

/// Line counts of one generated corpus.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CorpusStats {
	pub group: usize,
	pub set: String,
	pub path: PathBuf,
	pub kept: usize,
	pub dropped: usize,
}

struct SetCorpus {
	set: String,
	path: PathBuf,
	words: HashSet<String>,
	writer: BufWriter<File>,
	kept: usize,
	dropped: usize,
}

/// Writes `<outdir>/<group name>/<set>` for every set of every group.
///
/// Each output keeps, in order, the lines of `text_corpus` containing
/// none of the set's words. The corpus is streamed once per group.
pub fn create_lm_corpora<P, Q>(groups: &[CandidateGroup], text_corpus: P, outdir: Q) -> Result<Vec<CorpusStats>>
where
	P: AsRef<Path>,
	Q: AsRef<Path>,
{
	let text_corpus = text_corpus.as_ref();
	let mut stats = Vec::new();

	for group in groups {
		let out_dir = ensure_dir(outdir.as_ref().join(&group.name))?;
		info!("group {} (OOV rate {}): {} sets", group.group, group.oov_rate, group.sets.len());

		let mut corpora = Vec::with_capacity(group.sets.len());
		for set_path in &group.sets {
			let set = file_name(set_path).unwrap_or_default();
			let path = out_dir.join(&set);
			corpora.push(SetCorpus {
				words: read_candidate_words(set_path)?,
				writer: create_writer(&path)?,
				set,
				path,
				kept: 0,
				dropped: 0,
			});
		}

		let reader = BufReader::new(File::open(text_corpus).map_err(Error::io(text_corpus))?);
		for line in reader.lines() {
			let line = line.map_err(Error::io(text_corpus))?;
			let tokens: Vec<&str> = line.split_whitespace().collect();
			for corpus in &mut corpora {
				if tokens.iter().any(|t| corpus.words.contains(*t)) {
					corpus.dropped += 1;
				} else {
					writeln!(corpus.writer, "{line}").map_err(Error::io(&corpus.path))?;
					corpus.kept += 1;
				}
			}
		}

		for mut corpus in corpora {
			corpus.writer.flush().map_err(Error::io(&corpus.path))?;
			info!(
				"set {}: kept {} lines, dropped {} -> {}",
				corpus.set,
				corpus.kept,
				corpus.dropped,
				corpus.path.display()
			);
			stats.push(CorpusStats {
				group: group.group,
				set: corpus.set,
				path: corpus.path,
				kept: corpus.kept,
				dropped: corpus.dropped,
			});
		}
	}

	Ok(stats)
}
