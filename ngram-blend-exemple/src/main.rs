use ngram_blend_core::blend::ProfileStore;
use ngram_blend_core::config::Config;
use ngram_blend_core::corpus::CorpusRequest;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Verbosity is controlled with RUST_LOG (ex. RUST_LOG=debug)
    env_logger::init();

    // Everything this example does is described in one job file.
    // Relative paths inside it are resolved against the "data" folder.
    let config = Config::from_file("./data/blend.toml")?;

    if let Some(blend) = &config.blend {
        // Profiles are the "<id>.json" files of the configured folder
        let store = ProfileStore::open(&blend.folder)?;
        log::info!("Available profiles: {}", store.available()?.join(", "));

        // Weights are relative, they are normalized before use
        for (id, weight) in blend.normalized_weights()? {
            println!("{}: {:.3}", id, weight);
        }

        // Combine, then write the composite next to its sources
        let composite = store.combine_config(blend)?;
        let path = store.save(&composite)?;
        println!("Saved '{}' to {}", composite.language_id, path.display());

        if let Some(doubles) = composite.double_letter_percentage() {
            println!("Doubled letters: {:.2}% of bigrams", doubles);
        }
    }

    if let Some(corpus) = &config.corpus {
        // The word list is cached as a .bin file next to it after the first run
        let request = CorpusRequest::from_config(corpus)?;

        // A fixed seed gives the same corpus on every run
        let path = match corpus.seed {
            Some(seed) => request.write_to(&mut StdRng::seed_from_u64(seed), &corpus.output)?,
            None => request.write_to(&mut rand::rng(), &corpus.output)?,
        };
        println!(
            "Sampled {} words from {} candidates into {}",
            request.sample_count,
            request.source_tokens.len(),
            path.display()
        );
    }

    Ok(())
}
