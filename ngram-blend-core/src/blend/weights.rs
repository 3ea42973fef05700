use crate::error::{BlendError, Result};
use crate::profile::FrequencyProfile;

/// Tolerance for "normalized weights sum to one".
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// A profile paired with its contribution weight.
///
/// Weights are relative: `45 / 45 / 10` and `4.5 / 4.5 / 1.0` describe the
/// same blend. They only become fractions after `normalize_weights`.
#[derive(Clone, Copy, Debug)]
pub struct WeightedInput<'a> {
	pub profile: &'a FrequencyProfile,
	pub weight: f64,
}

impl<'a> WeightedInput<'a> {
	pub fn new(profile: &'a FrequencyProfile, weight: f64) -> Self {
		Self { profile, weight }
	}
}

/// Validates a list of raw weights and divides each by their sum.
///
/// # Errors
/// `InvalidWeight` if a weight is negative or not finite, or if the sum
/// is not strictly positive (this includes an empty list).
pub fn normalize_raw(weights: &[f64]) -> Result<Vec<f64>> {
	for (index, weight) in weights.iter().enumerate() {
		if !weight.is_finite() {
			return Err(BlendError::InvalidWeight(format!("weight #{} is not finite: {}", index, weight)));
		}
		if *weight < 0.0 {
			return Err(BlendError::InvalidWeight(format!("weight #{} is negative: {}", index, weight)));
		}
	}

	// Dividing by the largest weight first keeps the sum finite for huge weights
	let largest = weights.iter().copied().fold(0.0, f64::max);
	if largest <= 0.0 {
		return Err(BlendError::InvalidWeight("weights must sum to a positive value, got 0".to_owned()));
	}

	let relative: Vec<f64> = weights.iter().map(|weight| weight / largest).collect();
	let sum: f64 = relative.iter().sum();

	Ok(relative.iter().map(|weight| weight / sum).collect())
}

/// Returns the inputs with every weight replaced by `weight / sum(weights)`.
///
/// # Errors
/// See `normalize_raw`.
pub fn normalize_weights<'a>(inputs: &[WeightedInput<'a>]) -> Result<Vec<WeightedInput<'a>>> {
	let raw: Vec<f64> = inputs.iter().map(|input| input.weight).collect();
	let normalized = normalize_raw(&raw)?;

	Ok(inputs
		.iter()
		.zip(normalized)
		.map(|(input, weight)| WeightedInput::new(input.profile, weight))
		.collect())
}
