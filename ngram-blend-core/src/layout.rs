use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{BlendError, Result};
use crate::io;

/// Extension of row-based layout files.
pub const KB_EXTENSION: &str = "kb";

/// Extension of the JSON layout descriptors.
pub const DOF_EXTENSION: &str = "dof";

/// Structured layout descriptor: one `main` layer of three rows on an ortho board.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LayoutDescriptor {
	pub name: String,
	pub board: String,
	pub layers: IndexMap<String, Vec<String>>,
	pub fingering: String,
}

impl LayoutDescriptor {
	/// Builds a descriptor from the lines of a `.kb` file.
	///
	/// Rows are trimmed. Blank trailing lines are allowed; anything with
	/// fewer than three rows or a non-blank row after the third is rejected.
	pub fn from_rows(name: &str, rows: &[String]) -> Result<Self> {
		let rows: Vec<&str> = rows.iter().map(|row| row.trim()).collect();

		if rows.len() < 3 {
			return Err(BlendError::InvalidLayout {
				name: name.to_owned(),
				reason: format!("expected 3 rows, found {}", rows.len()),
			});
		}
		if let Some(extra) = rows[3..].iter().find(|row| !row.is_empty()) {
			return Err(BlendError::InvalidLayout {
				name: name.to_owned(),
				reason: format!("unexpected row after the third: '{}'", extra),
			});
		}

		let mut layers = IndexMap::new();
		layers.insert("main".to_owned(), rows[..3].iter().map(|row| row.to_string()).collect());

		Ok(Self {
			name: name.to_owned(),
			board: "ortho".to_owned(),
			layers,
			fingering: "traditional".to_owned(),
		})
	}

	/// Reads a `.kb` file; the file stem becomes the layout name.
	pub fn from_kb_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let name = io::file_stem(&path)?;
		let rows = io::read_lines(&path)?;
		Self::from_rows(&name, &rows)
	}

	/// Writes the descriptor as 4-space indented JSON.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		io::write_json(path, self, b"    ")
	}
}

/// Converts every `.kb` file below `input` into a `.dof` under `output`.
///
/// The relative folder structure is mirrored. Invalid layouts are logged
/// and skipped.
///
/// # Returns
/// The written descriptor paths, sorted.
pub fn convert_folder<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<Vec<PathBuf>> {
	let input = input.as_ref();
	let mut written = Vec::new();

	for kb in io::walk_files(input, KB_EXTENSION)? {
		let descriptor = match LayoutDescriptor::from_kb_file(&kb) {
			Ok(descriptor) => descriptor,
			Err(BlendError::InvalidLayout { name, reason }) => {
				log::warn!("Skipping {} ({}): {}", kb.display(), name, reason);
				continue;
			}
			Err(e) => return Err(e),
		};

		let relative = kb.strip_prefix(input).unwrap_or(kb.as_path());
		let target = output.as_ref().join(relative).with_extension(DOF_EXTENSION);
		descriptor.save(&target)?;
		log::debug!("Converted {} -> {}", kb.display(), target.display());
		written.push(target);
	}

	Ok(written)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use tempfile::TempDir;

	fn lines(text: &str) -> Vec<String> {
		text.lines().map(str::to_owned).collect()
	}

	#[test]
	fn three_rows_make_a_descriptor() {
		let layout = LayoutDescriptor::from_rows("qwerty", &lines("qwertyuiop \n asdfghjkl;\nzxcvbnm,./\n")).unwrap();

		assert_eq!(layout.board, "ortho");
		assert_eq!(layout.fingering, "traditional");
		assert_eq!(layout.layers["main"], vec!["qwertyuiop", "asdfghjkl;", "zxcvbnm,./"]);
	}

	#[test]
	fn wrong_row_counts_are_rejected() {
		assert!(matches!(
			LayoutDescriptor::from_rows("short", &lines("abc\ndef")),
			Err(BlendError::InvalidLayout { .. })
		));
		assert!(matches!(
			LayoutDescriptor::from_rows("long", &lines("abc\ndef\nghi\njkl")),
			Err(BlendError::InvalidLayout { .. })
		));
		assert!(matches!(
			LayoutDescriptor::from_rows("gap", &lines("abc\ndef\nghi\n\nextra")),
			Err(BlendError::InvalidLayout { .. })
		));
	}

	#[test]
	fn blank_trailing_rows_are_allowed() {
		let layout = LayoutDescriptor::from_rows("padded", &lines("abc\ndef\nghi\n\n  \n")).unwrap();
		assert_eq!(layout.layers["main"], vec!["abc", "def", "ghi"]);
	}

	#[test]
	fn converts_folder_and_skips_invalid() {
		let input = TempDir::new().unwrap();
		let output = TempDir::new().unwrap();
		fs::create_dir_all(input.path().join("ortho/custom")).unwrap();
		fs::write(input.path().join("ortho/custom/semimak.kb"), "flhvzqwuoy\nsrntkcdeai\nxjbmgpk,.;\n").unwrap();
		fs::write(input.path().join("broken.kb"), "only one row").unwrap();

		let written = convert_folder(input.path(), output.path()).unwrap();

		assert_eq!(written, vec![output.path().join("ortho/custom/semimak.dof")]);
		let text = fs::read_to_string(&written[0]).unwrap();
		assert!(text.starts_with("{\n    \"name\": \"semimak\""));

		let parsed: LayoutDescriptor = serde_json::from_str(&text).unwrap();
		assert_eq!(parsed.layers["main"][1], "srntkcdeai");
	}
}
