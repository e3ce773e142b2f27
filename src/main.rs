//! News curation bot entrypoint. Loads configuration, wires one pipeline
//! per group, and supervises them for the life of the process.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use news_curator::config;
use news_curator::ingest::newsapi::NewsApiClient;
use news_curator::publish::PlatformPublisher;
use news_curator::runner::PipelineRunner;
use news_curator::store::ArticleStore;
use news_curator::supervisor;
use news_curator::text::translate::GoogleTranslator;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("news_curator=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op where the environment is real.
    let _ = dotenvy::dotenv();
    init_tracing();
    news_curator::metrics::init()?;

    let config_dir = config::config_dir();
    let data_dir = config::data_dir();
    let groups = config::load_groups(&config_dir)?;
    let rules = config::load_rules(&config_dir.join("rules.toml"))?;

    let translate_key = std::env::var("GOOGLE_TRANSLATE_API_KEY").unwrap_or_default();
    if translate_key.is_empty() {
        tracing::warn!("GOOGLE_TRANSLATE_API_KEY unset, translations will fall back to the original text");
    }

    let mut runners = Vec::with_capacity(groups.len());
    for cfg in groups {
        tracing::info!(
            group = %cfg.group,
            keywords = cfg.keywords.len(),
            phase = cfg.phase,
            interval_minutes = cfg.interval_minutes,
            "configuring pipeline"
        );
        let store = ArticleStore::new(data_dir.clone(), &cfg.group);
        let search = NewsApiClient::new(cfg.search_api_key.clone(), &cfg.exclude_domains);
        let translator = GoogleTranslator::new(translate_key.clone());
        let publisher = PlatformPublisher::new(
            &cfg.group,
            &cfg.consumer_key,
            &cfg.consumer_secret,
            &cfg.refresh_token,
        );
        runners.push(PipelineRunner::new(
            cfg,
            rules.clone(),
            store,
            Box::new(search),
            Box::new(translator),
            Box::new(publisher),
        ));
    }

    supervisor::run_groups(runners).await;
    Ok(())
}
