//! Frequency profiles: the per-language n-gram tables the layout analyzer consumes.
//!
//! - `NgramTable`: ordered n-gram → frequency mapping
//! - `MetricValue`: a profile entry, either a table or scalar metadata
//! - `FrequencyProfile`: a named bundle of metrics, read from and written to JSON

/// Ordered n-gram frequency table.
pub mod ngram_table;

/// Tagged profile entry (table or scalar).
pub mod metric;

/// Named collection of metrics with JSON persistence.
pub mod frequency_profile;

pub use frequency_profile::FrequencyProfile;
pub use metric::MetricValue;
pub use ngram_table::NgramTable;
