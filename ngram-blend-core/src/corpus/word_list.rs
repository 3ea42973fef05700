use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io::{is_up_to_date, sibling_with_appended_extension};

/// Extension of the binary cache written next to a word list.
pub const CACHE_EXTENSION: &str = "bin";

/// Whitespace-delimited word list, loaded once and sampled many times.
///
/// Duplicates are kept: a word listed twice is twice as likely to be drawn.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WordList {
	tokens: Vec<String>,
}

impl WordList {
	/// Splits `text` on any whitespace.
	pub fn parse(text: &str) -> Self {
		Self { tokens: text.split_whitespace().map(str::to_owned).collect() }
	}

	/// Loads a word list, going through a `postcard` cache beside the file.
	///
	/// - If `<file_name>.bin` exists and is not older than the text file, it is used.
	/// - Otherwise the text is parsed and the cache is (re)written.
	///
	/// The source file is never written. A cache that fails to decode is
	/// ignored and rebuilt; a cache that cannot be written is only logged.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let cache_path = sibling_with_appended_extension(path, CACHE_EXTENSION)?;

		if is_up_to_date(&cache_path, path) {
			let cached = fs::read(&cache_path)
				.map_err(|e| e.to_string())
				.and_then(|bytes| postcard::from_bytes::<WordList>(&bytes).map_err(|e| e.to_string()));
			match cached {
				Ok(list) => {
					log::debug!("Loaded {} words from cache {}", list.len(), cache_path.display());
					return Ok(list);
				}
				Err(e) => log::warn!("Ignoring unreadable cache {}: {}", cache_path.display(), e),
			}
		}

		let list = Self::parse(&fs::read_to_string(path)?);
		let cached = postcard::to_stdvec(&list)
			.map_err(|e| e.to_string())
			.and_then(|bytes| fs::write(&cache_path, bytes).map_err(|e| e.to_string()));
		if let Err(e) = cached {
			log::warn!("Could not write cache {}: {}", cache_path.display(), e);
		}
		log::debug!("Parsed {} words from {}", list.len(), path.display());

		Ok(list)
	}

	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub fn into_tokens(self) -> Vec<String> {
		self.tokens
	}
}
