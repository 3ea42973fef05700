use thiserror::Error;

/// Errors produced while blending profiles, synthesizing corpora,
/// or converting the surrounding artifacts.
///
/// Validation errors (`InvalidWeight`, `EmptySource`, `InvalidCount`,
/// `MalformedProfile`, `MetadataConflict`) are always raised before any
/// output artifact is written.
#[derive(Error, Debug)]
pub enum BlendError {
	#[error("Invalid weight: {0}")]
	InvalidWeight(String),

	#[error("Cannot sample from an empty token list")]
	EmptySource,

	#[error("Invalid sample count: {0}")]
	InvalidCount(String),

	#[error("Malformed profile '{profile}': {reason}")]
	MalformedProfile { profile: String, reason: String },

	#[error("Metadata conflict on '{key}' while merging profiles")]
	MetadataConflict { key: String },

	#[error("Profile '{0}' not found")]
	ProfileNotFound(String),

	#[error("Invalid layout '{name}': {reason}")]
	InvalidLayout { name: String, reason: String },

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Config error: {0}")]
	Config(#[from] toml::de::Error),

	#[error("Config serialization error: {0}")]
	ConfigWrite(#[from] toml::ser::Error),

	#[error("Cache error: {0}")]
	Cache(#[from] postcard::Error),
}

impl BlendError {
	/// Shorthand for a `MalformedProfile` error.
	pub(crate) fn malformed(profile: &str, reason: impl Into<String>) -> Self {
		BlendError::MalformedProfile { profile: profile.to_owned(), reason: reason.into() }
	}
}

pub type Result<T> = std::result::Result<T, BlendError>;
