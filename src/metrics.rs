use std::net::SocketAddr;

use anyhow::{Context, Result};
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;

const ENV_METRICS_ADDR: &str = "CURATOR_METRICS_ADDR";

/// Install the Prometheus exporter when `CURATOR_METRICS_ADDR` is set.
/// Without it the counters scattered through the pipeline stay no-ops.
pub fn init() -> Result<()> {
    let Ok(addr) = std::env::var(ENV_METRICS_ADDR) else {
        tracing::debug!("{ENV_METRICS_ADDR} unset, metrics exporter disabled");
        return Ok(());
    };
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("parsing {ENV_METRICS_ADDR}"))?;
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("installing prometheus exporter")?;
    tracing::info!(%addr, "metrics exporter listening");
    Ok(())
}

/// One-time metrics registration (so series show up with help text).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("cycles_total", "Completed pipeline cycles.");
        describe_counter!(
            "ingest_merged_total",
            "New articles merged into active lists."
        );
        describe_counter!(
            "ingest_duplicates_total",
            "Candidates dropped as fingerprint duplicates."
        );
        describe_counter!(
            "ingest_api_errors_total",
            "Error envelopes returned by the search service."
        );
        describe_counter!(
            "select_fallback_total",
            "Selections that exhausted retries and fell back to index 0."
        );
        describe_counter!(
            "blocklist_rejects_total",
            "Composed posts vetoed by the blocklist."
        );
        describe_counter!(
            "translate_fallback_total",
            "Translations that failed and kept the original text."
        );
        describe_counter!(
            "publish_attempts_total",
            "Publish attempts, token refresh included."
        );
        describe_counter!(
            "publish_http_errors_total",
            "Posts that failed in transit or were rejected by the platform."
        );
        describe_counter!(
            "token_refresh_failures_total",
            "OAuth2 refresh grants that failed."
        );
    });
}
