use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::blend::combiner::MetadataPolicy;
use crate::blend::weights::normalize_raw;
use crate::error::{BlendError, Result};

/// Top-level job file.
///
/// Both sections are optional so a file can describe a blend, a corpus,
/// or both:
///
/// ```toml
/// [blend]
/// name = "du-en-hu_45-45-10"
/// folder = "static/language_data"
///
/// [blend.weights]
/// dutch = 45
/// english = 45
/// hungarian = 10
///
/// [corpus]
/// word_list = "450k.txt"
/// output = "450k_corpus.txt"
/// sample_count = 100000000
/// ```
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	pub blend: Option<BlendConfig>,
	pub corpus: Option<CorpusConfig>,
}

/// A weighted blend of stored profiles.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BlendConfig {
	/// Name of the composite profile (also its file stem).
	pub name: String,

	/// Folder holding `<profile_id>.json` files; the composite is written there too.
	#[serde(default = "current_folder")]
	pub folder: PathBuf,

	/// Handling of scalar metadata during merges.
	#[serde(default)]
	pub metadata: MetadataPolicy,

	/// `profile_id = weight`, folded in document order.
	pub weights: IndexMap<String, f64>,
}

/// A uniform word-sampling job.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CorpusConfig {
	pub word_list: PathBuf,
	pub output: PathBuf,
	/// Signed so that zero and negative counts reach validation instead of a parse error.
	pub sample_count: i64,
	pub seed: Option<u64>,
}

fn current_folder() -> PathBuf {
	PathBuf::from(".")
}

impl Config {
	/// Parses a job description from TOML text. Paths are kept as written.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	/// Loads a job file; relative paths are resolved against the file's folder.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let text = fs::read_to_string(&path)?;
		let mut config = Self::from_toml_str(&text)?;

		let base = path.as_ref().parent().unwrap_or_else(|| Path::new("."));
		if let Some(blend) = config.blend.as_mut() {
			blend.folder = base.join(&blend.folder);
		}
		if let Some(corpus) = config.corpus.as_mut() {
			corpus.word_list = base.join(&corpus.word_list);
			corpus.output = base.join(&corpus.output);
		}

		log::debug!("Loaded config {}", path.as_ref().display());
		Ok(config)
	}
}

impl BlendConfig {
	/// Returns the weights normalized to fractions, paired with their profile id.
	///
	/// # Errors
	/// `InvalidWeight` under the same rules as `normalize_weights`.
	pub fn normalized_weights(&self) -> Result<Vec<(&str, f64)>> {
		let raw: Vec<f64> = self.weights.values().copied().collect();
		let normalized = normalize_raw(&raw)?;
		Ok(self.weights.keys().map(String::as_str).zip(normalized).collect())
	}
}

impl CorpusConfig {
	/// Checks the configured count and converts it to `usize`.
	pub fn sample_count(&self) -> Result<usize> {
		if self.sample_count <= 0 {
			return Err(BlendError::InvalidCount(format!("sample_count must be positive, got {}", self.sample_count)));
		}
		usize::try_from(self.sample_count).map_err(|e| BlendError::InvalidCount(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const JOB: &str = r#"
		[blend]
		name = "du-en-hu_45-45-10"
		folder = "static/language_data"
		metadata = "fail"

		[blend.weights]
		english = 45
		dutch = 45
		hungarian = 10.0

		[corpus]
		word_list = "450k.txt"
		output = "450k_corpus.txt"
		sample_count = 100000000
		seed = 7
	"#;

	#[test]
	fn parses_full_job() {
		let config = Config::from_toml_str(JOB).unwrap();
		let blend = config.blend.unwrap();

		assert_eq!(blend.metadata, MetadataPolicy::FailOnConflict);
		assert_eq!(blend.weights.keys().collect::<Vec<_>>(), vec!["english", "dutch", "hungarian"]);

		let weights = blend.normalized_weights().unwrap();
		assert_eq!(weights[0].0, "english");
		assert!((weights[2].1 - 0.1).abs() < 1e-12);

		let corpus = config.corpus.unwrap();
		assert_eq!(corpus.sample_count().unwrap(), 100_000_000);
		assert_eq!(corpus.seed, Some(7));
	}

	#[test]
	fn defaults_apply() {
		let config = Config::from_toml_str("[blend]\nname = \"solo\"\n[blend.weights]\nenglish = 1\n").unwrap();
		let blend = config.blend.unwrap();
		assert_eq!(blend.folder, PathBuf::from("."));
		assert_eq!(blend.metadata, MetadataPolicy::Drop);
		assert!(config.corpus.is_none());
	}

	#[test]
	fn rejects_bad_values() {
		let config = Config::from_toml_str("[blend]\nname = \"x\"\n[blend.weights]\na = 0\nb = 0\n").unwrap();
		assert!(matches!(config.blend.unwrap().normalized_weights(), Err(BlendError::InvalidWeight(_))));

		let config = Config::from_toml_str("[corpus]\nword_list = \"w\"\noutput = \"o\"\nsample_count = 0\n").unwrap();
		assert!(matches!(config.corpus.unwrap().sample_count(), Err(BlendError::InvalidCount(_))));

		assert!(matches!(Config::from_toml_str("[corpus]\nword_list = \"w\"\noutput = \"o\"\nsample_count = 2.5\n"), Err(BlendError::Config(_))));
	}
}
