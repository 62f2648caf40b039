//! wordcloud - build per-country word-frequency JSON for word clouds.
//!
//! Loads the caches, runs one incremental pass over the configured source,
//! saves the caches and regenerates the export files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wordcloud_core::cache::{CacheSnapshot, CacheStore, JsonCacheStore};
use wordcloud_core::clock::SystemClock;
use wordcloud_core::config::{Config, SourceConfig};
use wordcloud_core::export::Exporter;
use wordcloud_core::pipeline::Pipeline;
use wordcloud_core::source::{CorpusSource, DocumentSource, OmekaSource};
use wordcloud_core::tokenize::StopwordTokenizer;

#[derive(Parser, Debug)]
#[command(name = "wordcloud")]
#[command(about = "Incremental per-country word frequencies for word clouds")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, default_value = "wordcloud.toml", env = "WORDCLOUD_CONFIG")]
    config: PathBuf,

    /// Directory for export files (overrides paths.data_dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for cache files (overrides paths.cache_dir)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Start from empty caches if a cache file is corrupt
    #[arg(long)]
    reset_corrupt_cache: bool,

    #[arg(long, env = "OMEKA_BASE_URL")]
    omeka_base_url: Option<String>,

    #[arg(long, env = "OMEKA_KEY_IDENTITY", hide_env_values = true)]
    omeka_key_identity: Option<String>,

    #[arg(long, env = "OMEKA_KEY_CREDENTIAL", hide_env_values = true)]
    omeka_key_credential: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordcloud=info,wordcloud_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid configuration")?;

    let store = JsonCacheStore::new(config.cache_dir())
        .with_reset_on_corrupt(config.cache.reset_on_corrupt || args.reset_corrupt_cache);
    info!("Cache directory: {}", store.dir().display());

    let CacheSnapshot {
        mut documents,
        mut frequencies,
    } = store.load().context("Failed to load cache")?;

    let mut tokenizer = StopwordTokenizer::new(&config.tokenizer.language);
    tokenizer.add_stopwords(&config.tokenizer.extra_stopwords);

    let source: Box<dyn DocumentSource> = match &config.source {
        SourceConfig::Omeka(settings) => Box::new(
            OmekaSource::new(settings, &config.countries).context("Failed to set up Omeka source")?,
        ),
        SourceConfig::Corpus(settings) => Box::new(CorpusSource::new(settings.clone())),
    };

    let mut pipeline = Pipeline::new(source, tokenizer, SystemClock, config.pipeline_settings());
    let summary = pipeline.run(&mut documents, &mut frequencies);
    print!("{summary}");

    store
        .save(&documents, &frequencies)
        .context("Failed to save cache")?;

    let exporter = Exporter::new(&config.paths.data_dir, config.export.top_n);
    let tables = config
        .countries
        .keys()
        .filter_map(|country| frequencies.get(country).map(|r| (country, &r.frequencies)));
    let written = exporter.write_all(tables).context("Failed to write exports")?;
    info!("Wrote {} export files to {}", written.len(), exporter.dir().display());

    Ok(())
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(dir) = &args.data_dir {
        config.paths.data_dir = dir.clone();
    }
    if let Some(dir) = &args.cache_dir {
        config.paths.cache_dir = Some(dir.clone());
    }

    if let SourceConfig::Omeka(omeka) = &mut config.source {
        if let Some(url) = &args.omeka_base_url {
            omeka.base_url = url.clone();
        }
        if let Some(identity) = &args.omeka_key_identity {
            omeka.key_identity = identity.clone();
        }
        if let Some(credential) = &args.omeka_key_credential {
            omeka.key_credential = credential.clone();
        }
    }
}
