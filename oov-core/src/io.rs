use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
	let path = filename.as_ref();
	let mut contents = String::new();
	File::open(path)
		.and_then(|mut file| file.read_to_string(&mut contents))
		.map_err(Error::io(path))?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Creates a buffered writer on `path`, truncating any previous content.
pub(crate) fn create_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
	let path = path.as_ref();
	let file = File::create(path).map_err(Error::io(path))?;
	Ok(BufWriter::new(file))
}

/// Writes every line followed by `\n` and flushes.
pub(crate) fn write_lines<P, I, S>(path: P, lines: I) -> Result<()>
where
	P: AsRef<Path>,
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let path = path.as_ref();
	let mut writer = create_writer(path)?;
	for line in lines {
		writeln!(writer, "{}", line.as_ref()).map_err(Error::io(path))?;
	}
	writer.flush().map_err(Error::io(path))
}

/// Creates a directory and its parents if they don't exist.
pub(crate) fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<PathBuf> {
	let dir = dir.as_ref();
	fs::create_dir_all(dir).map_err(Error::io(dir))?;
	Ok(dir.to_path_buf())
}

/// Lists the entries of a directory, keeping the ones matching `keep`.
///
/// Returns full paths, sorted by file name.
pub(crate) fn list_entries<P, F>(dir: P, keep: F) -> Result<Vec<PathBuf>>
where
	P: AsRef<Path>,
	F: Fn(&Path) -> bool,
{
	let dir = dir.as_ref();
	let mut entries = Vec::new();

	for entry in fs::read_dir(dir).map_err(Error::io(dir))? {
		let path = entry.map_err(Error::io(dir))?.path();
		if keep(&path) {
			entries.push(path);
		}
	}

	entries.sort();
	Ok(entries)
}

/// Extracts the final path component as a string.
///
/// Examples:
/// - `"./out/group_1_0.005"` → `"group_1_0.005"`
/// - `"3"` → `"3"`
pub(crate) fn file_name<P: AsRef<Path>>(path: P) -> Option<String> {
	path.as_ref()
		.file_name()
		.map(|name| name.to_string_lossy().to_string())
}

/// Size of a file in bytes.
pub fn file_size<P: AsRef<Path>>(path: P) -> Result<u64> {
	let path = path.as_ref();
	Ok(fs::metadata(path).map_err(Error::io(path))?.len())
}
