use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::blend::ProfileStore;
use crate::error::Result;

/// Corpus definition inheriting from the shared defaults.
#[derive(Serialize, Debug)]
struct CorpusStub<'a> {
	based_on: [&'a str; 1],
}

/// Writes `<out_dir>/<id>.toml` containing `based_on = ["default"]` for every stored profile.
///
/// Existing stubs are overwritten.
pub fn emit_corpus_stubs<P: AsRef<Path>>(store: &ProfileStore, out_dir: P) -> Result<Vec<PathBuf>> {
	let out_dir = out_dir.as_ref();
	fs::create_dir_all(out_dir)?;

	let content = toml::to_string(&CorpusStub { based_on: ["default"] })?;

	let mut written = Vec::new();
	for id in store.available()? {
		let path = out_dir.join(format!("{}.toml", id));
		fs::write(&path, &content)?;
		written.push(path);
	}

	log::info!("Wrote {} corpus stubs to {}", written.len(), out_dir.display());
	Ok(written)
}
