//! Flat-text corpus synthesis from word lists.

/// Whitespace word lists with a binary cache.
pub mod word_list;

/// Uniform sampling with replacement, in memory or streamed to disk.
pub mod synthesizer;

pub use synthesizer::{synthesize, synthesize_into, synthesize_to_file, synthesize_with_rng, CorpusRequest};
pub use word_list::WordList;
