use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use super::NewsSearch;
use crate::article::SearchResponse;

const ENDPOINT: &str = "https://newsapi.org/v2/everything";
const PAGE_SIZE: &str = "100";
/// Only articles published inside this window count as fresh.
const LOOKBACK_HOURS: i64 = 12;

/// Keyword search against the NewsAPI `everything` endpoint. One page per
/// call; the recency floor keeps result sets small enough that paging has
/// never been needed.
pub struct NewsApiClient {
    http: reqwest::Client,
    api_key: String,
    exclude_domains: String,
}

impl NewsApiClient {
    pub fn new(api_key: String, exclude_domains: &[String]) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("news-curator/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(20))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            exclude_domains: exclude_domains.join(","),
        }
    }
}

/// Oldest publication instant still considered fresh, RFC 3339 in UTC.
fn query_floor() -> String {
    (Utc::now() - chrono::Duration::hours(LOOKBACK_HOURS))
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[async_trait]
impl NewsSearch for NewsApiClient {
    async fn search(&self, query: &str, language: &str) -> Result<SearchResponse> {
        let from = query_floor();
        // Service errors (rate limits included) ride non-2xx statuses with a
        // JSON envelope in the body, so the status code is not checked here.
        let resp = self
            .http
            .get(ENDPOINT)
            .query(&[
                ("q", query),
                ("pageSize", PAGE_SIZE),
                ("from", from.as_str()),
                ("page", "1"),
                ("language", language),
                ("apiKey", self.api_key.as_str()),
                ("excludeDomains", self.exclude_domains.as_str()),
            ])
            .send()
            .await
            .context("news search request")?;
        resp.json().await.context("news search decode")
    }
}
