// src/ingest/mod.rs
pub mod newsapi;

use anyhow::Result;
use async_trait::async_trait;
use metrics::counter;
use tracing::{info, warn};

use crate::article::{Article, SearchResponse};
use crate::fingerprint::fingerprint;

/// News-search collaborator. `Err` means the call itself failed (transport,
/// decode) and aborts the calling cycle; a service-reported problem arrives
/// as a normal envelope with `status == "error"` and is handled here.
#[async_trait]
pub trait NewsSearch: Send + Sync {
    async fn search(&self, query: &str, language: &str) -> Result<SearchResponse>;
}

/// Merge a candidate batch into the active list, dropping fingerprints that
/// are already present. Candidates are stamped on the way in: fingerprint
/// from the description, `posted` cleared, `keyword` set to the query term.
/// Returns how many entries were appended.
pub fn merge_batch(active: &mut Vec<Article>, batch: Vec<Article>, keyword: &str) -> usize {
    let mut added = 0;
    for mut candidate in batch {
        candidate.fingerprint = fingerprint(&candidate.description);
        candidate.posted = false;
        candidate.keyword = keyword.to_string();
        if active.iter().any(|a| a.fingerprint == candidate.fingerprint) {
            counter!("ingest_duplicates_total").increment(1);
            continue;
        }
        active.push(candidate);
        added += 1;
    }
    added
}

/// One ingest step: query the collaborator and merge what came back. An
/// error envelope contributes zero articles and the cycle carries on; a
/// failed call propagates.
pub async fn ingest_once(
    search: &dyn NewsSearch,
    active: &mut Vec<Article>,
    keyword: &str,
    language: &str,
) -> Result<usize> {
    let resp = search.search(keyword, language).await?;
    if resp.is_error() {
        counter!("ingest_api_errors_total").increment(1);
        warn!(
            code = resp.code.as_deref().unwrap_or("unknown"),
            message = resp.message.as_deref().unwrap_or(""),
            "search service reported an error"
        );
        return Ok(0);
    }
    let added = merge_batch(active, resp.articles, keyword);
    counter!("ingest_merged_total").increment(added as u64);
    info!(keyword, added, total = active.len(), "ingest merged");
    Ok(added)
}

// --- Test helper ---

/// Scripted search double: hands out queued envelopes in order and records
/// every query. An exhausted script yields an empty default envelope.
#[derive(Clone, Default)]
pub struct MockSearch {
    batches: std::sync::Arc<std::sync::Mutex<std::collections::VecDeque<SearchResponse>>>,
    pub calls: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    fail: bool,
}

impl MockSearch {
    /// Double whose every call fails at the transport level.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn push_batch(&self, resp: SearchResponse) {
        self.batches.lock().unwrap().push_back(resp);
    }
}

#[async_trait]
impl NewsSearch for MockSearch {
    async fn search(&self, query: &str, _language: &str) -> Result<SearchResponse> {
        self.calls.lock().unwrap().push(query.to_string());
        if self.fail {
            anyhow::bail!("search transport down");
        }
        Ok(self.batches.lock().unwrap().pop_front().unwrap_or_default())
    }
}
