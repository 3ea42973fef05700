//! Weighted blending of frequency profiles.
//!
//! - `weights`: weight validation and normalization
//! - `combiner`: scale / merge / combine over in-memory profiles
//! - `profile_store`: folder-backed loading and saving around the combiner

/// Weighted inputs and weight normalization.
pub mod weights;

/// Profile scaling, pairwise merging and weighted combination.
///
/// Pure functions: inputs are never mutated and nothing is written to disk.
pub mod combiner;

/// Folder of `<id>.json` profiles.
pub mod profile_store;

pub use combiner::{combine, combine_with_policy, merge_two, merge_two_with_policy, scale_profile, MetadataPolicy};
pub use profile_store::ProfileStore;
pub use weights::{normalize_weights, WeightedInput};
