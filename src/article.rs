// src/article.rs
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// The search service sends explicit `null` for text fields of retracted
/// articles, which `#[serde(default)]` alone does not absorb. Coerce `null`
/// to the default so one retracted article cannot fail a whole batch.
fn null_to_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Origin outlet as reported by the search service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// One curated article. Wire names match the legacy store files (`hash`,
/// `urlToImage`, `publishedAt`), so databases written by earlier deployments
/// load and re-save without loss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub source: ArticleSource,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    /// RFC 3339 publication time as the service sent it. Kept as a string;
    /// unparseable values still round-trip.
    #[serde(default, deserialize_with = "null_to_default")]
    pub published_at: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub content: String,
    /// Salted digest of `description`; the dedup identity.
    #[serde(rename = "hash", default)]
    pub fingerprint: String,
    #[serde(default)]
    pub posted: bool,
    /// Query term that surfaced this article; reused as the post hashtag.
    #[serde(default)]
    pub keyword: String,
    /// Written by an offline enrichment job; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<Vec<f32>>,
    /// Written by an offline enrichment job; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// Search service reply: a success carrying `articles`, or an error envelope
/// carrying `code` and `message` (HTTP status is not authoritative, the
/// `status` field is).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SearchResponse {
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

/// `publishedAt` as a real instant, when it parses as RFC 3339.
pub fn published_instant(article: &Article) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(&article.published_at).ok()
}

/// Order newest first, comparing instants rather than strings. Entries whose
/// timestamp does not parse sort last, behind every dated entry.
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by_cached_key(|a| std::cmp::Reverse(published_instant(a)));
}
