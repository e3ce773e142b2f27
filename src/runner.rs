//! One group's pipeline: an infinite sequential cycle over the persisted
//! store. Nothing within a group overlaps; every external call happens
//! inline in the cycle that needs it.

use std::time::Duration;

use anyhow::Result;
use metrics::counter;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::article::{sort_newest_first, Article};
use crate::config::{GroupConfig, TranslationRule};
use crate::ingest::{self, NewsSearch};
use crate::publish::ContentPublisher;
use crate::select;
use crate::store::{self, ArticleStore};
use crate::text::{self, translate::Translator};

/// Sleep when there is nothing to publish or the token step failed.
const IDLE_SLEEP: Duration = Duration::from_secs(60);
/// Backoff after a blocklist veto; bounds the redraw loop when the list is
/// saturated with blocked candidates.
const REJECT_BACKOFF: Duration = Duration::from_secs(1);

/// What a single cycle did. Drives the sleep policy in [`PipelineRunner::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Delivery attempted and the store persisted.
    Published,
    /// Empty active list, nothing eligible.
    Idle,
    /// Composed text hit the blocklist; nothing persisted.
    Rejected,
    /// Token refresh failed; nothing persisted, the article stays unposted.
    PublishSkipped,
}

/// Owns everything one group needs: its config, store handle, collaborator
/// set and the ingest phase countdown.
pub struct PipelineRunner {
    cfg: GroupConfig,
    rules: Vec<TranslationRule>,
    store: ArticleStore,
    search: Box<dyn NewsSearch>,
    translator: Box<dyn Translator>,
    publisher: Box<dyn ContentPublisher>,
    /// Cycles left until the next ingest. Zero at startup, so the first
    /// cycle always fetches.
    phase: u32,
}

impl PipelineRunner {
    pub fn new(
        cfg: GroupConfig,
        rules: Vec<TranslationRule>,
        store: ArticleStore,
        search: Box<dyn NewsSearch>,
        translator: Box<dyn Translator>,
        publisher: Box<dyn ContentPublisher>,
    ) -> Self {
        Self {
            cfg,
            rules,
            store,
            search,
            translator,
            publisher,
            phase: 0,
        }
    }

    pub fn group(&self) -> &str {
        &self.cfg.group
    }

    /// Run cycles until a fatal error: a corrupt store or a failed search
    /// call. Benign conditions (empty list, blocked post, refresh failure)
    /// only shape the sleep between cycles.
    pub async fn run(mut self) -> Result<()> {
        crate::metrics::ensure_described();
        loop {
            let outcome = self.cycle().await?;
            counter!("cycles_total").increment(1);
            match outcome {
                CycleOutcome::Published => {
                    let pause = publish_sleep(self.cfg.interval_minutes);
                    debug!(group = %self.cfg.group, seconds = pause.as_secs(), "sleeping after publish");
                    tokio::time::sleep(pause).await;
                }
                CycleOutcome::Idle | CycleOutcome::PublishSkipped => {
                    tokio::time::sleep(IDLE_SLEEP).await;
                }
                CycleOutcome::Rejected => {
                    tokio::time::sleep(REJECT_BACKOFF).await;
                }
            }
        }
    }

    /// One pass: ingest when due, order, pick, compose, gate, publish,
    /// persist. Split out from [`run`] so tests can drive cycles without
    /// the sleeps.
    pub async fn cycle(&mut self) -> Result<CycleOutcome> {
        let mut active = self.store.load()?;

        if self.phase == 0 {
            self.ingest_due(&mut active).await?;
            // Config loading clamps phase to >= 1; the max keeps a directly
            // constructed zero from underflowing the countdown.
            self.phase = self.cfg.phase.max(1);
        }
        self.phase -= 1;

        sort_newest_first(&mut active);
        if active.is_empty() {
            debug!(group = %self.cfg.group, "active list empty");
            return Ok(CycleOutcome::Idle);
        }

        let idx = select::pick(&active);
        let post = text::render_post(&active[idx], self.translator.as_ref(), &self.rules).await;

        if text::violates_blocklist(&post, &self.cfg.blocked_words) {
            counter!("blocklist_rejects_total").increment(1);
            info!(group = %self.cfg.group, title = %active[idx].title, "post vetoed by blocklist");
            return Ok(CycleOutcome::Rejected);
        }

        info!(group = %self.cfg.group, title = %active[idx].title, "publishing");
        if let Err(e) = self.publisher.publish(&post).await {
            warn!(group = %self.cfg.group, error = ?e, "token refresh failed, article stays unposted");
            return Ok(CycleOutcome::PublishSkipped);
        }

        // Mark before rotating: the selected entry keeps its flag even when
        // it is demoted in the same cycle.
        active[idx].posted = true;
        let demoted = store::rotate(&mut active);
        if !demoted.is_empty() {
            let mut archive = demoted;
            archive.append(&mut self.store.load_archive()?);
            self.store.save_archive(&archive)?;
        }
        self.store.save(&active)?;
        Ok(CycleOutcome::Published)
    }

    /// Fetch one randomly chosen keyword's results into the active list.
    async fn ingest_due(&mut self, active: &mut Vec<Article>) -> Result<()> {
        if self.cfg.keywords.is_empty() {
            debug!(group = %self.cfg.group, "no keywords configured, skipping ingest");
            return Ok(());
        }
        let pick = rand::rng().random_range(0..self.cfg.keywords.len());
        let keyword = &self.cfg.keywords[pick];
        ingest::ingest_once(self.search.as_ref(), active, keyword, &self.cfg.language).await?;
        Ok(())
    }
}

/// Uniform whole-minute draw below the configured bound. The zero guard
/// mirrors the phase reset; `random_range` panics on an empty range.
fn publish_sleep(interval_minutes: u32) -> Duration {
    let minutes = rand::rng().random_range(0..interval_minutes.max(1));
    Duration::from_secs(u64::from(minutes) * 60)
}
