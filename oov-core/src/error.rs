//! Error types shared by every stage of the experiment setup.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while building OOV candidate sets.
#[derive(Debug, Error)]
pub enum Error {
	/// A file or directory could not be read, created or written.
	#[error("i/o error on {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// A frequency or candidate file does not follow its line format.
	#[error("malformed line {line} in {}: {reason}", .path.display())]
	Format {
		path: PathBuf,
		line: usize,
		reason: String,
	},

	/// The test corpus uses characters the training text never does.
	#[error("found characters in test set that are not in train: {}", join_chars(.chars))]
	Coverage { chars: Vec<char> },

	/// The candidates ran out before the quota was reached.
	#[error("candidates exhausted: reached {reached} of quota {quota} with {selected} words selected")]
	Exhausted {
		quota: u64,
		reached: u64,
		selected: usize,
	},

	/// Invalid run parameters.
	#[error("invalid configuration: {0}")]
	Config(String),

	/// A counting worker panicked.
	#[error("a counting worker thread panicked")]
	Join,
}

impl Error {
	/// Wraps an `io::Error` with the path it happened on.
	pub(crate) fn io<P: Into<PathBuf>>(path: P) -> impl FnOnce(std::io::Error) -> Self {
		let path = path.into();
		move |source| Error::Io { path, source }
	}
}

fn join_chars(chars: &[char]) -> String {
	chars.iter().map(char::to_string).collect::<Vec<_>>().join(" ")
}

/// Result type alias for oov-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn coverage_message_lists_characters() {
		let err = Error::Coverage { chars: vec!['ð', 'þ'] };
		assert_eq!(err.to_string(), "found characters in test set that are not in train: ð þ");
	}

	#[test]
	fn io_message_names_path() {
		let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
		let err = Error::io("data/text")(source);
		assert!(err.to_string().contains("data/text"));
	}
}
