//! Outbound side: refresh the OAuth2 access token, then submit the composed
//! text as a comment on the group's topic.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;
use tracing::{info, warn};

/// Publishing collaborator. `Err` means the attempt never reached the
/// platform (the token step failed) and the article must stay unposted.
/// `Ok` means delivery was attempted; whatever the platform then said has
/// been logged and the pipeline moves on.
#[async_trait]
pub trait ContentPublisher: Send + Sync {
    async fn publish(&self, content: &str) -> Result<()>;
}

const PLATFORM_BASE: &str = "https://emma.pixnet.cc";

/// Grant envelope. Only the access token is consumed; expiry, scope and the
/// echoed refresh token are ignored because a fresh grant happens per post.
#[derive(Deserialize)]
struct TokenGrant {
    access_token: String,
}

/// Comment publisher for one group topic, OAuth2 refresh-token flow.
pub struct PlatformPublisher {
    http: reqwest::Client,
    base: String,
    group: String,
    consumer_key: String,
    consumer_secret: String,
    refresh_token: String,
}

impl PlatformPublisher {
    pub fn new(group: &str, consumer_key: &str, consumer_secret: &str, refresh_token: &str) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("news-curator/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(20))
            .build()
            .expect("reqwest client");
        Self {
            http,
            base: PLATFORM_BASE.to_string(),
            group: group.to_string(),
            consumer_key: consumer_key.to_string(),
            consumer_secret: consumer_secret.to_string(),
            refresh_token: refresh_token.to_string(),
        }
    }

    /// Exchange the long-lived refresh token for a fresh access token.
    async fn refresh_access_token(&self) -> Result<String> {
        let grant: TokenGrant = self
            .http
            .get(format!("{}/oauth2/grant", self.base))
            .query(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.refresh_token.as_str()),
                ("client_id", self.consumer_key.as_str()),
                ("client_secret", self.consumer_secret.as_str()),
            ])
            .send()
            .await
            .context("token refresh request")?
            .json()
            .await
            .context("token refresh decode")?;
        Ok(grant.access_token)
    }
}

#[async_trait]
impl ContentPublisher for PlatformPublisher {
    async fn publish(&self, content: &str) -> Result<()> {
        counter!("publish_attempts_total").increment(1);
        let token = match self.refresh_access_token().await {
            Ok(token) => token,
            Err(e) => {
                counter!("token_refresh_failures_total").increment(1);
                return Err(e);
            }
        };

        let url = format!("{}/topic/{}/comment", self.base, self.group);
        let form = [
            ("access_token", token.as_str()),
            ("content", content),
            ("format", "json"),
        ];
        match self.http.post(&url).form(&form).send().await {
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                if status.is_success() {
                    info!(group = %self.group, %status, "post delivered");
                } else {
                    counter!("publish_http_errors_total").increment(1);
                    warn!(group = %self.group, %status, body = %body, "platform rejected the post");
                }
            }
            Err(e) => {
                counter!("publish_http_errors_total").increment(1);
                warn!(group = %self.group, error = ?e, "post request failed");
            }
        }
        Ok(())
    }
}

// --- Test helper ---

/// Records published payloads; can be scripted to fail the token step.
#[derive(Clone, Default)]
pub struct MockPublisher {
    pub posts: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    fail_refresh: bool,
}

impl MockPublisher {
    /// Double whose token step always fails, so nothing is ever delivered.
    pub fn failing() -> Self {
        Self {
            fail_refresh: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ContentPublisher for MockPublisher {
    async fn publish(&self, content: &str) -> Result<()> {
        if self.fail_refresh {
            anyhow::bail!("refresh grant rejected");
        }
        self.posts.lock().unwrap().push(content.to_string());
        Ok(())
    }
}
