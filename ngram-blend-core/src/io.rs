use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::{env, fs::File};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Reads a text file and returns its lines, trimmed of the line terminator.
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let contents = fs::read_to_string(filename)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Builds a sibling path by appending an extension to the full file name.
///
/// The result never equals `input_path`, so a derived file cannot replace its source.
///
/// Example:
/// `data/450k.txt` + `"bin"` → `data/450k.txt.bin`
pub(crate) fn sibling_with_appended_extension<P: AsRef<Path>>(input_path: P, extension: &str) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();
	let mut file_name = input_path
		.file_name()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?
		.to_os_string();
	file_name.push(".");
	file_name.push(extension);

	Ok(input_path.with_file_name(file_name))
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./static/language_data/english.json"` → `"english"`
/// - `"qwerty.kb"` → `"qwerty"`
pub(crate) fn file_stem<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder<P: AsRef<Path>>(input: P) -> PathBuf {
	let input = input.as_ref();
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists the stems of all files with a given extension directly inside `dir`.
///
/// Subdirectories are ignored. The result is sorted so listings are stable
/// across platforms.
pub(crate) fn list_stems<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut stems = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
			stems.push(file_stem(&path)?);
		}
	}

	stems.sort();
	Ok(stems)
}

/// Recursively collects every file with a given extension below `dir`.
pub(crate) fn walk_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
	let mut found = Vec::new();
	let mut pending = vec![dir.as_ref().to_path_buf()];

	while let Some(current) = pending.pop() {
		for entry in fs::read_dir(&current)? {
			let path = entry?.path();
			if path.is_dir() {
				pending.push(path);
			} else if path.extension() == Some(OsStr::new(extension)) {
				found.push(path);
			}
		}
	}

	found.sort();
	Ok(found)
}

/// Returns `true` if `derived` exists and is at least as recent as `source`.
///
/// Any metadata failure counts as stale.
pub(crate) fn is_up_to_date<P: AsRef<Path>, Q: AsRef<Path>>(derived: P, source: Q) -> bool {
	let modified = |p: &Path| fs::metadata(p).and_then(|m| m.modified());
	match (modified(derived.as_ref()), modified(source.as_ref())) {
		(Ok(derived), Ok(source)) => derived >= source,
		_ => false,
	}
}

/// Serializes `value` as pretty JSON with a custom indent and writes it to `path`.
///
/// The whole document is rendered in memory first so a serialization
/// failure never leaves a truncated file behind.
pub(crate) fn write_json<P, T>(path: P, value: &T, indent: &[u8]) -> crate::error::Result<()>
where
	P: AsRef<Path>,
	T: Serialize + ?Sized,
{
	let mut buffer = Vec::new();
	let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent));
	value.serialize(&mut serializer)?;

	if let Some(parent) = path.as_ref().parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent)?;
		}
	}
	let mut file = File::create(path)?;
	file.write_all(&buffer)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn appended_extension_keeps_the_original_name() {
		let path = sibling_with_appended_extension("data/words.bin", "bin").unwrap();
		assert_eq!(path, PathBuf::from("data/words.bin.bin"));
	}

	#[test]
	fn stems_are_filtered_and_sorted() {
		let dir = TempDir::new().unwrap();
		fs::write(dir.path().join("english.json"), "{}").unwrap();
		fs::write(dir.path().join("dutch.json"), "{}").unwrap();
		fs::write(dir.path().join("notes.txt"), "").unwrap();

		let stems = list_stems(dir.path(), "json").unwrap();
		assert_eq!(stems, vec!["dutch".to_owned(), "english".to_owned()]);
	}

	#[test]
	fn walk_descends_into_subfolders() {
		let dir = TempDir::new().unwrap();
		fs::create_dir_all(dir.path().join("a/b")).unwrap();
		fs::write(dir.path().join("top.kb"), "").unwrap();
		fs::write(dir.path().join("a/b/deep.kb"), "").unwrap();
		fs::write(dir.path().join("a/skip.txt"), "").unwrap();

		let found = walk_files(dir.path(), "kb").unwrap();
		assert_eq!(found.len(), 2);
		assert!(found.iter().any(|p| p.ends_with("a/b/deep.kb")));
	}
}
