//! Statistical inputs for keyboard-layout analysis.
//!
//! This crate prepares the data a layout analyzer consumes:
//! - Weighted blends of per-language n-gram frequency profiles
//! - Large sampled text corpora built from word lists
//! - Small conversion helpers around those artifacts (row layouts, corpus stubs)
//!
//! Everything is synchronous and single-threaded. Every operation validates
//! its inputs before writing any artifact.

/// Crate-wide error type.
pub mod error;

/// Job configuration (TOML).
pub mod config;

/// Frequency profiles and n-gram tables.
pub mod profile;

/// Weighted profile combination.
pub mod blend;

/// Word-list based corpus synthesis.
pub mod corpus;

/// Row-based layout to JSON descriptor conversion.
pub mod layout;

/// Boilerplate corpus definitions for stored profiles.
pub mod scaffold;

/// File and path helpers.
///
/// Not exposed
pub(crate) mod io;

pub use error::{BlendError, Result};
