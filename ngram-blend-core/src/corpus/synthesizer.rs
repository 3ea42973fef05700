use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::config::CorpusConfig;
use crate::error::{BlendError, Result};
use crate::io::sibling_with_appended_extension;
use super::word_list::WordList;

/// Extension of the in-progress file a corpus is streamed into.
pub const PARTIAL_EXTENSION: &str = "partial";

/// Output buffer size for streamed corpora.
const WRITE_BUFFER: usize = 1 << 20;

/// Upper bound on the up-front reservation of an in-memory corpus.
const MAX_RESERVE: usize = 1 << 30;

/// Words to sample from and how many draws to make.
#[derive(Clone, Debug, PartialEq)]
pub struct CorpusRequest {
	pub source_tokens: Vec<String>,
	pub sample_count: usize,
}

impl CorpusRequest {
	/// Builds a request, validating it up front.
	///
	/// # Errors
	/// `EmptySource` or `InvalidCount`.
	pub fn new(source_tokens: Vec<String>, sample_count: usize) -> Result<Self> {
		validate(&source_tokens, sample_count)?;
		Ok(Self { source_tokens, sample_count })
	}

	/// Loads the configured word list and builds the request.
	pub fn from_config(config: &CorpusConfig) -> Result<Self> {
		let sample_count = config.sample_count()?;
		let words = WordList::load(&config.word_list)?;
		Self::new(words.into_tokens(), sample_count)
	}

	/// Streams the corpus to `output`; see `synthesize_to_file`.
	pub fn write_to<R: Rng + ?Sized, P: AsRef<Path>>(&self, rng: &mut R, output: P) -> Result<PathBuf> {
		synthesize_to_file(&self.source_tokens, self.sample_count, rng, output)
	}
}

fn validate<S: AsRef<str>>(source_tokens: &[S], sample_count: usize) -> Result<()> {
	if source_tokens.is_empty() {
		return Err(BlendError::EmptySource);
	}
	if sample_count == 0 {
		return Err(BlendError::InvalidCount("sample count must be positive, got 0".to_owned()));
	}
	Ok(())
}

/// Draws `sample_count` words uniformly with replacement and joins them with single spaces.
///
/// Uses the thread-local RNG. For large counts prefer `synthesize_into`
/// or `synthesize_to_file`, which do not hold the corpus in memory.
///
/// # Errors
/// `EmptySource` if there is nothing to draw from, `InvalidCount` if
/// `sample_count` is zero.
pub fn synthesize<S: AsRef<str>>(source_tokens: &[S], sample_count: usize) -> Result<String> {
	synthesize_with_rng(source_tokens, sample_count, &mut rand::rng())
}

/// Same as `synthesize` with an explicit random source.
pub fn synthesize_with_rng<S, R>(source_tokens: &[S], sample_count: usize, rng: &mut R) -> Result<String>
where
	S: AsRef<str>,
	R: Rng + ?Sized,
{
	validate(source_tokens, sample_count)?;

	// Capacity from the average token length plus separator
	let total_len: usize = source_tokens.iter().map(|t| t.as_ref().len()).sum();
	let average = total_len / source_tokens.len() + 1;
	let mut corpus = String::with_capacity(reserve_hint(average, sample_count));

	for i in 0..sample_count {
		if i > 0 {
			corpus.push(' ');
		}
		corpus.push_str(draw(source_tokens, rng));
	}

	Ok(corpus)
}

/// Streams `sample_count` uniformly drawn words, space separated, into `writer`.
///
/// Memory use is bounded by the write buffer, independent of `sample_count`.
/// Validation happens before the first byte is written.
pub fn synthesize_into<S, R, W>(source_tokens: &[S], sample_count: usize, rng: &mut R, writer: W) -> Result<()>
where
	S: AsRef<str>,
	R: Rng + ?Sized,
	W: Write,
{
	validate(source_tokens, sample_count)?;

	let mut writer = BufWriter::with_capacity(WRITE_BUFFER, writer);
	writer.write_all(draw(source_tokens, rng).as_bytes())?;
	for _ in 1..sample_count {
		writer.write_all(b" ")?;
		writer.write_all(draw(source_tokens, rng).as_bytes())?;
	}
	writer.flush()?;

	Ok(())
}

/// Streams a corpus into `<file_name>.partial` next to `output`, then renames it into place.
///
/// The target path only ever holds a complete corpus: on any error the
/// partial file is removed and `output` is left as it was.
///
/// # Returns
/// The path of the written corpus.
pub fn synthesize_to_file<S, R, P>(source_tokens: &[S], sample_count: usize, rng: &mut R, output: P) -> Result<PathBuf>
where
	S: AsRef<str>,
	R: Rng + ?Sized,
	P: AsRef<Path>,
{
	validate(source_tokens, sample_count)?;

	let output = output.as_ref();
	if let Some(parent) = output.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent)?;
		}
	}
	let partial = sibling_with_appended_extension(output, PARTIAL_EXTENSION)?;

	let written = File::create(&partial)
		.map_err(BlendError::from)
		.and_then(|file| synthesize_into(source_tokens, sample_count, rng, file));
	if let Err(e) = written {
		let _ = fs::remove_file(&partial);
		return Err(e);
	}

	fs::rename(&partial, output)?;
	log::info!("Wrote {} words to {}", sample_count, output.display());
	Ok(output.to_path_buf())
}

/// Bytes to reserve for `sample_count` tokens of `average` bytes, capped at `MAX_RESERVE`.
fn reserve_hint(average: usize, sample_count: usize) -> usize {
	average.checked_mul(sample_count).map_or(MAX_RESERVE, |bytes| bytes.min(MAX_RESERVE))
}

#[inline]
fn draw<'a, S: AsRef<str>, R: Rng + ?Sized>(source_tokens: &'a [S], rng: &mut R) -> &'a str {
	source_tokens[rng.random_range(0..source_tokens.len())].as_ref()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use tempfile::TempDir;

	#[test]
	fn produces_requested_token_count() {
		let corpus = synthesize(&["a", "b"], 1000).unwrap();
		let tokens: Vec<&str> = corpus.split(' ').collect();

		assert_eq!(tokens.len(), 1000);
		assert!(tokens.iter().all(|t| *t == "a" || *t == "b"));
		assert!(!corpus.contains("  "));
	}

	#[test]
	fn draws_are_roughly_uniform() {
		let mut rng = StdRng::seed_from_u64(0x5eed);
		let corpus = synthesize_with_rng(&["a", "b"], 100_000, &mut rng).unwrap();

		let a = corpus.split(' ').filter(|t| *t == "a").count() as f64 / 100_000.0;
		assert!((a - 0.5).abs() < 0.01, "share of 'a' was {}", a);
	}

	#[test]
	fn duplicates_weight_the_draw() {
		let mut rng = StdRng::seed_from_u64(11);
		let corpus = synthesize_with_rng(&["x", "x", "x", "y"], 40_000, &mut rng).unwrap();

		let x = corpus.split(' ').filter(|t| *t == "x").count() as f64 / 40_000.0;
		assert!((x - 0.75).abs() < 0.02, "share of 'x' was {}", x);
	}

	#[test]
	fn reservation_is_bounded() {
		assert_eq!(reserve_hint(6, 1000), 6000);
		assert_eq!(reserve_hint(6, usize::MAX), MAX_RESERVE);
		assert_eq!(reserve_hint(usize::MAX / 2, 3), MAX_RESERVE);
		assert_eq!(reserve_hint(8, MAX_RESERVE), MAX_RESERVE);
	}

	#[test]
	fn same_seed_same_corpus() {
		let words = ["the", "of", "and", "to"];
		let first = synthesize_with_rng(&words, 500, &mut StdRng::seed_from_u64(3)).unwrap();
		let second = synthesize_with_rng(&words, 500, &mut StdRng::seed_from_u64(3)).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn rejects_empty_source_and_zero_count() {
		let empty: [&str; 0] = [];
		assert!(matches!(synthesize(&empty, 10), Err(BlendError::EmptySource)));
		assert!(matches!(synthesize(&["x"], 0), Err(BlendError::InvalidCount(_))));
		assert!(matches!(CorpusRequest::new(vec![], 5), Err(BlendError::EmptySource)));
	}

	#[test]
	fn streaming_matches_in_memory() {
		let words = ["lorem", "ipsum", "dolor"];
		let expected = synthesize_with_rng(&words, 2_000, &mut StdRng::seed_from_u64(9)).unwrap();

		let mut sink = Vec::new();
		synthesize_into(&words, 2_000, &mut StdRng::seed_from_u64(9), &mut sink).unwrap();
		assert_eq!(String::from_utf8(sink).unwrap(), expected);
	}

	#[test]
	fn invalid_request_writes_nothing() {
		let mut sink = Vec::new();
		let empty: [&str; 0] = [];
		assert!(synthesize_into(&empty, 3, &mut StdRng::seed_from_u64(1), &mut sink).is_err());
		assert!(sink.is_empty());

		let dir = TempDir::new().unwrap();
		let output = dir.path().join("corpus.txt");
		assert!(synthesize_to_file(&["a"], 0, &mut StdRng::seed_from_u64(1), &output).is_err());
		assert!(!output.exists());
		assert!(!dir.path().join("corpus.txt.partial").exists());
	}

	#[test]
	fn file_output_is_renamed_into_place() {
		let dir = TempDir::new().unwrap();
		let output = dir.path().join("out/corpus.txt");

		let request = CorpusRequest::new(vec!["word".to_owned()], 4).unwrap();
		let path = request.write_to(&mut StdRng::seed_from_u64(2), &output).unwrap();

		assert_eq!(path, output);
		assert_eq!(fs::read_to_string(&output).unwrap(), "word word word word");
		assert!(!dir.path().join("out/corpus.txt.partial").exists());
	}
}
