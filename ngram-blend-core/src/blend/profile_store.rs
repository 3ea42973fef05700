use std::path::{Path, PathBuf};

use crate::config::BlendConfig;
use crate::error::{BlendError, Result};
use crate::io;
use crate::profile::FrequencyProfile;
use super::combiner::combine_with_policy;
use super::weights::WeightedInput;

/// Extension of stored profile files.
pub const PROFILE_EXTENSION: &str = "json";

/// A folder of profile files, addressed by id (`<id>.json`).
///
/// # Responsibilities
/// - List and load the stored profiles
/// - Run configured blends against them
/// - Persist composites next to their sources
#[derive(Debug, Clone)]
pub struct ProfileStore {
	folder: PathBuf,
}

impl ProfileStore {
	/// Opens a profile folder.
	///
	/// Both `"folder"` and `"folder/"` are accepted; `"."` resolves to the
	/// current directory.
	///
	/// # Errors
	/// Returns an IO error if the path is not a directory.
	pub fn open<P: AsRef<Path>>(folder: P) -> Result<Self> {
		let folder = io::normalize_folder(folder);
		if !folder.is_dir() {
			return Err(BlendError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("Expected a directory, got: {}", folder.display()),
			)));
		}
		Ok(Self { folder })
	}

	pub fn folder(&self) -> &Path {
		&self.folder
	}

	/// Ids of every stored profile, sorted.
	pub fn available(&self) -> Result<Vec<String>> {
		Ok(io::list_stems(&self.folder, PROFILE_EXTENSION)?)
	}

	/// Path a profile id maps to.
	pub fn path_of(&self, id: &str) -> PathBuf {
		self.folder.join(format!("{}.{}", id, PROFILE_EXTENSION))
	}

	/// Loads the profile stored as `<id>.json`.
	///
	/// # Errors
	/// `ProfileNotFound` if no such file exists, otherwise any parse error.
	pub fn load(&self, id: &str) -> Result<FrequencyProfile> {
		let path = self.path_of(id);
		if !path.is_file() {
			return Err(BlendError::ProfileNotFound(id.to_owned()));
		}
		FrequencyProfile::from_file(path)
	}

	/// Runs a configured blend.
	///
	/// Weights are validated before any profile is read, and nothing is
	/// written; call `save` on the result.
	pub fn combine_config(&self, config: &BlendConfig) -> Result<FrequencyProfile> {
		// Weights are checked before any profile is read
		config.normalized_weights()?;

		let profiles = config
			.weights
			.keys()
			.map(|id| self.load(id))
			.collect::<Result<Vec<_>>>()?;

		let inputs: Vec<WeightedInput> = profiles
			.iter()
			.zip(config.weights.values())
			.map(|(profile, weight)| WeightedInput::new(profile, *weight))
			.collect();

		combine_with_policy(&inputs, &config.name, config.metadata)
	}

	/// Writes `profile` as `<language_id>.json` in this folder and returns the path.
	pub fn save(&self, profile: &FrequencyProfile) -> Result<PathBuf> {
		let path = self.path_of(&profile.language_id);
		profile.save(&path)?;
		Ok(path)
	}
}
