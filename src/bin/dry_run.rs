//! Renders what the next cycle would publish for one group, without posting
//! or touching the store. Reads configuration exactly like the main binary.
//!
//! Usage: `cargo run --bin dry_run -- <group-id>`

use anyhow::{bail, Context, Result};

use news_curator::article::sort_newest_first;
use news_curator::config;
use news_curator::select;
use news_curator::store::ArticleStore;
use news_curator::text::{self, translate::GoogleTranslator};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let group = std::env::args().nth(1).context("usage: dry_run <group-id>")?;
    let config_dir = config::config_dir();
    let groups = config::load_groups(&config_dir)?;
    let Some(cfg) = groups.into_iter().find(|g| g.group == group) else {
        bail!("no config for group {group}");
    };
    let rules = config::load_rules(&config_dir.join("rules.toml"))?;

    let store = ArticleStore::new(config::data_dir(), &cfg.group);
    let mut active = store.load()?;
    sort_newest_first(&mut active);
    if active.is_empty() {
        println!("store for {group} is empty, nothing to render");
        return Ok(());
    }

    let translator =
        GoogleTranslator::new(std::env::var("GOOGLE_TRANSLATE_API_KEY").unwrap_or_default());
    let idx = select::pick(&active);
    let post = text::render_post(&active[idx], &translator, &rules).await;
    let blocked = text::violates_blocklist(&post, &cfg.blocked_words);

    println!("--- candidate #{idx} (posted: {}) ---", active[idx].posted);
    println!("{post}");
    println!(
        "--- blocklist: {} ---",
        if blocked { "REJECTED" } else { "clear" }
    );
    Ok(())
}
