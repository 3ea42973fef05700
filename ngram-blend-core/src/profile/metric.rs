use serde::Serialize;
use serde_json::Value;

use crate::error::{BlendError, Result};
use super::ngram_table::NgramTable;

/// A single named entry of a profile.
///
/// Frequency tables are scaled and merged; scalars are metadata and are
/// carried along untouched. Every operation dispatches on this tag rather
/// than inspecting the JSON shape again.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum MetricValue {
	Table(NgramTable),
	Scalar(Value),
}

impl MetricValue {
	/// Classifies a raw JSON value.
	///
	/// Objects are frequency tables and must hold numbers only; anything
	/// else is kept as a scalar.
	///
	/// # Errors
	/// `MalformedProfile` if an object holds a non-numeric value.
	pub(crate) fn from_json(profile: &str, metric: &str, value: Value) -> Result<Self> {
		let Value::Object(entries) = value else {
			return Ok(MetricValue::Scalar(value));
		};

		let mut table = NgramTable::new();
		for (ngram, frequency) in entries {
			let frequency = frequency.as_f64().ok_or_else(|| {
				BlendError::malformed(
					profile,
					format!("metric '{}' has a non-numeric frequency for '{}': {}", metric, ngram, frequency),
				)
			})?;
			table.insert(ngram, frequency);
		}
		Ok(MetricValue::Table(table))
	}

	pub fn as_table(&self) -> Option<&NgramTable> {
		match self {
			MetricValue::Table(table) => Some(table),
			MetricValue::Scalar(_) => None,
		}
	}

	pub fn as_table_mut(&mut self) -> Option<&mut NgramTable> {
		match self {
			MetricValue::Table(table) => Some(table),
			MetricValue::Scalar(_) => None,
		}
	}
}
