use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{BlendError, Result};
use crate::io;
use super::metric::MetricValue;
use super::ngram_table::NgramTable;

/// Key under which the profile name is written.
pub const LANGUAGE_KEY: &str = "language";

/// Alternative key accepted when reading.
pub const LANGUAGE_ID_KEY: &str = "language_id";

/// A named bundle of n-gram frequency tables for one language or blend.
///
/// On disk this is a JSON object: the name under `"language"` and every
/// other key a metric, either a frequency table (`"bigrams": {"th": 1.2}`)
/// or plain metadata.
///
/// # Invariants
/// - `metrics` never contains the name keys
/// - Metric order is the order read from disk (or merged in)
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "Value")]
pub struct FrequencyProfile {
	pub language_id: String,
	pub metrics: IndexMap<String, MetricValue>,
}

impl FrequencyProfile {
	/// Creates an empty profile.
	pub fn new(language_id: &str) -> Self {
		Self { language_id: language_id.to_owned(), metrics: IndexMap::new() }
	}

	/// Adds or replaces a frequency table.
	pub fn with_table(mut self, metric: &str, table: NgramTable) -> Self {
		self.metrics.insert(metric.to_owned(), MetricValue::Table(table));
		self
	}

	/// Adds or replaces a scalar metadata field.
	pub fn with_scalar(mut self, metric: &str, value: Value) -> Self {
		self.metrics.insert(metric.to_owned(), MetricValue::Scalar(value));
		self
	}

	/// Returns the frequency table stored under `metric`, if it is one.
	pub fn table(&self, metric: &str) -> Option<&NgramTable> {
		self.metrics.get(metric).and_then(MetricValue::as_table)
	}

	/// Iterates over every table metric.
	pub fn tables(&self) -> impl Iterator<Item = (&str, &NgramTable)> {
		self.metrics
			.iter()
			.filter_map(|(name, metric)| metric.as_table().map(|table| (name.as_str(), table)))
	}

	/// Iterates mutably over every table metric.
	pub fn tables_mut(&mut self) -> impl Iterator<Item = (&str, &mut NgramTable)> {
		self.metrics
			.iter_mut()
			.filter_map(|(name, metric)| metric.as_table_mut().map(|table| (name.as_str(), table)))
	}

	/// Parses a profile from JSON text.
	pub fn from_json_str(text: &str) -> Result<Self> {
		let value: Value = serde_json::from_str(text)?;
		Self::try_from(value)
	}

	/// Loads a profile from a JSON file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let text = fs::read_to_string(&path)?;
		log::debug!("Loaded profile file {}", path.as_ref().display());
		Self::from_json_str(&text)
	}

	/// Writes the profile as tab-indented JSON.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		io::write_json(&path, self, b"\t")?;
		log::info!("Saved profile '{}' to {}", self.language_id, path.as_ref().display());
		Ok(())
	}

	/// Share of bigram frequency carried by doubled letters ("ll", "ee", ...), in percent.
	///
	/// Returns `None` if the profile has no `bigrams` table or its total is zero.
	pub fn double_letter_percentage(&self) -> Option<f64> {
		let bigrams = self.table("bigrams")?;
		let total = bigrams.total();
		if total == 0.0 {
			return None;
		}

		let doubles: f64 = bigrams
			.iter()
			.filter(|(bigram, _)| {
				let mut chars = bigram.chars();
				matches!((chars.next(), chars.next()), (Some(a), Some(b)) if a == b)
			})
			.map(|(_, frequency)| frequency)
			.sum();

		Some(doubles / total * 100.0)
	}
}

impl TryFrom<Value> for FrequencyProfile {
	type Error = BlendError;

	/// Builds a profile from a JSON object.
	///
	/// # Errors
	/// `MalformedProfile` if the value is not an object, has no string
	/// name, or contains a table with non-numeric frequencies.
	fn try_from(value: Value) -> Result<Self> {
		let Value::Object(mut object) = value else {
			return Err(BlendError::malformed("<unnamed>", "profile is not a JSON object"));
		};

		let name = object
			.shift_remove(LANGUAGE_KEY)
			.or_else(|| object.shift_remove(LANGUAGE_ID_KEY));
		// Both keys may be present; the second one must not leak into the metrics.
		object.shift_remove(LANGUAGE_ID_KEY);

		let language_id = match name {
			Some(Value::String(name)) => name,
			Some(other) => return Err(BlendError::malformed("<unnamed>", format!("language is not a string: {}", other))),
			None => return Err(BlendError::malformed("<unnamed>", "missing 'language' field")),
		};

		let mut metrics = IndexMap::with_capacity(object.len());
		for (metric, raw) in object {
			let value = MetricValue::from_json(&language_id, &metric, raw)?;
			metrics.insert(metric, value);
		}

		Ok(Self { language_id, metrics })
	}
}

impl Serialize for FrequencyProfile {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.metrics.len() + 1))?;
		map.serialize_entry(LANGUAGE_KEY, &self.language_id)?;
		for (metric, value) in &self.metrics {
			map.serialize_entry(metric, value)?;
		}
		map.end()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn parses_tables_and_metadata() {
		let profile = FrequencyProfile::from_json_str(
			r#"{"language": "english", "characters": {"e": 12.5}, "bigrams": {"th": 3.1}, "source": "wiki"}"#,
		)
		.unwrap();

		assert_eq!(profile.language_id, "english");
		assert_eq!(profile.table("bigrams").unwrap().get("th"), Some(3.1));
		assert_eq!(profile.metrics.get("source"), Some(&MetricValue::Scalar(json!("wiki"))));
		assert_eq!(profile.tables().count(), 2);
	}

	#[test]
	fn accepts_language_id_key() {
		let profile = FrequencyProfile::from_json_str(r#"{"language_id": "dutch", "bigrams": {}}"#).unwrap();
		assert_eq!(profile.language_id, "dutch");
		assert!(!profile.metrics.contains_key(LANGUAGE_ID_KEY));
	}

	#[test]
	fn missing_name_is_malformed() {
		let result = FrequencyProfile::from_json_str(r#"{"bigrams": {"th": 1}}"#);
		assert!(matches!(result, Err(BlendError::MalformedProfile { .. })));
	}

	#[test]
	fn serializes_name_first_in_metric_order() {
		let profile = FrequencyProfile::new("mix")
			.with_table("trigrams", [("the", 2.0)].into_iter().collect())
			.with_table("bigrams", [("th", 1.0)].into_iter().collect());

		let text = serde_json::to_string(&profile).unwrap();
		assert_eq!(text, r#"{"language":"mix","trigrams":{"the":2.0},"bigrams":{"th":1.0}}"#);
	}

	#[test]
	fn deserializes_through_serde() {
		let profile: FrequencyProfile = serde_json::from_value(json!({"language": "fr", "bigrams": {"es": 2}})).unwrap();
		assert_eq!(profile.table("bigrams").unwrap().get("es"), Some(2.0));

		let invalid: std::result::Result<FrequencyProfile, _> = serde_json::from_value(json!({"language": "fr", "bigrams": {"es": null}}));
		assert!(invalid.is_err());
	}

	#[test]
	fn double_letters_share() {
		let profile = FrequencyProfile::new("en").with_table(
			"bigrams",
			[("ll", 1.0), ("ee", 1.0), ("th", 2.0)].into_iter().collect(),
		);
		assert_eq!(profile.double_letter_percentage(), Some(50.0));
		assert_eq!(FrequencyProfile::new("empty").double_letter_percentage(), None);
	}
}
