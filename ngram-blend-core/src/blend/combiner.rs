use serde::Deserialize;

use crate::error::{BlendError, Result};
use crate::profile::{FrequencyProfile, MetricValue};
use super::weights::{normalize_weights, WeightedInput};

/// What `merge_two` does with scalar metadata coming from the addend.
///
/// Frequency tables are always merged; this only concerns non-table
/// metrics such as a source note or a version string.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MetadataPolicy {
	/// Keep the base's scalars, discard the addend's.
	#[default]
	Drop,
	/// Addend scalars replace or extend the base's.
	Overwrite,
	/// Addend-only scalars are added; differing values on a shared key fail.
	#[serde(alias = "fail")]
	FailOnConflict,
}

/// Returns a copy of `profile` with every frequency table multiplied by `weight`.
///
/// Scalar metrics are copied unchanged. The input is left untouched so it
/// can be reused in further combinations.
pub fn scale_profile(profile: &FrequencyProfile, weight: f64) -> FrequencyProfile {
	let mut scaled = profile.clone();
	for (_, table) in scaled.tables_mut() {
		table.scale(weight);
	}
	scaled
}

/// Merges `addend` into `base` and renames the result `new_name`.
///
/// Uses the default `MetadataPolicy::Drop`.
pub fn merge_two(base: FrequencyProfile, addend: &FrequencyProfile, new_name: &str) -> Result<FrequencyProfile> {
	merge_two_with_policy(base, addend, new_name, MetadataPolicy::Drop)
}

/// Merges `addend` into `base` and renames the result `new_name`.
///
/// # Behavior
/// - For every table of `addend`, values are added to the base table with
///   the same metric name (key union); the table is then re-sorted by
///   decreasing frequency.
/// - A table missing from `base` is carried over as-is.
/// - Scalars follow `policy`.
///
/// # Errors
/// - `MalformedProfile` if a metric is a table on one side and a scalar on the other.
/// - `MetadataConflict` under `FailOnConflict` when a shared scalar differs.
pub fn merge_two_with_policy(
	mut base: FrequencyProfile,
	addend: &FrequencyProfile,
	new_name: &str,
	policy: MetadataPolicy,
) -> Result<FrequencyProfile> {
	for (metric, value) in &addend.metrics {
		match (base.metrics.get_mut(metric), value) {
			(Some(MetricValue::Table(existing)), MetricValue::Table(table)) => {
				existing.absorb(table);
				existing.sort_descending();
			}
			(None, MetricValue::Table(table)) => {
				let mut table = table.clone();
				table.sort_descending();
				base.metrics.insert(metric.clone(), MetricValue::Table(table));
			}
			(Some(MetricValue::Scalar(_)), MetricValue::Table(_)) | (Some(MetricValue::Table(_)), MetricValue::Scalar(_)) => {
				return Err(BlendError::malformed(
					&addend.language_id,
					format!("metric '{}' is a table in one profile and a scalar in '{}'", metric, base.language_id),
				));
			}
			(existing, MetricValue::Scalar(scalar)) => match policy {
				MetadataPolicy::Drop => {
					log::debug!("Dropping metadata '{}' from '{}'", metric, addend.language_id);
				}
				MetadataPolicy::Overwrite => {
					base.metrics.insert(metric.clone(), MetricValue::Scalar(scalar.clone()));
				}
				MetadataPolicy::FailOnConflict => match existing {
					Some(MetricValue::Scalar(current)) if *current != *scalar => {
						return Err(BlendError::MetadataConflict { key: metric.clone() });
					}
					Some(_) => (),
					None => {
						base.metrics.insert(metric.clone(), MetricValue::Scalar(scalar.clone()));
					}
				},
			},
		}
	}

	base.language_id = new_name.to_owned();
	Ok(base)
}

/// Blends weighted profiles into one composite named `new_name`.
///
/// Uses the default `MetadataPolicy::Drop`.
pub fn combine(inputs: &[WeightedInput], new_name: &str) -> Result<FrequencyProfile> {
	combine_with_policy(inputs, new_name, MetadataPolicy::Drop)
}

/// Blends weighted profiles into one composite named `new_name`.
///
/// Weights are normalized, each profile is scaled by its normalized
/// weight, and the scaled profiles are folded left with
/// `merge_two_with_policy` in input order. Every table of the result is
/// sorted by decreasing frequency.
///
/// A composite can be fed back in as an input; weighting behaves the same.
///
/// # Errors
/// `InvalidWeight` for an empty or invalid weight set, plus any merge error.
pub fn combine_with_policy(inputs: &[WeightedInput], new_name: &str, policy: MetadataPolicy) -> Result<FrequencyProfile> {
	let normalized = normalize_weights(inputs)?;

	let mut scaled = normalized.iter().map(|input| {
		log::debug!("Scaling '{}' by {:.6}", input.profile.language_id, input.weight);
		scale_profile(input.profile, input.weight)
	});

	// normalize_weights rejects empty input, so there is always a first profile
	let Some(first) = scaled.next() else {
		return Err(BlendError::InvalidWeight("no profiles to combine".to_owned()));
	};

	let mut composite = scaled.try_fold(first, |base, addend| merge_two_with_policy(base, &addend, new_name, policy))?;

	for (_, table) in composite.tables_mut() {
		table.sort_descending();
	}
	composite.language_id = new_name.to_owned();

	log::info!("Combined {} profiles into '{}'", inputs.len(), new_name);
	Ok(composite)
}
