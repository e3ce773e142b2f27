use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use whatlang::Script;

/// True when the text already reads as Han script. Traditional and
/// Simplified ideographs detect as the same script family, so either form
/// skips translation.
pub fn is_han(text: &str) -> bool {
    matches!(whatlang::detect_script(text), Some(Script::Mandarin))
}

/// Translation collaborator for the fixed English to Traditional Chinese
/// pair. Implementations return the translated text or an error; callers
/// decide what a failure falls back to.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

const ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Cloud Translation v2 REST client, key-authenticated.
pub struct GoogleTranslator {
    http: reqwest::Client,
    api_key: String,
}

impl GoogleTranslator {
    pub fn new(api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("news-curator/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("reqwest client");
        Self { http, api_key }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Body {
            data: Payload,
        }
        #[derive(Deserialize)]
        struct Payload {
            translations: Vec<Item>,
        }
        #[derive(Deserialize)]
        struct Item {
            #[serde(rename = "translatedText")]
            translated_text: String,
        }

        let resp = self
            .http
            .post(ENDPOINT)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("q", text),
                ("source", "en"),
                ("target", "zh-TW"),
                ("format", "text"),
            ])
            .send()
            .await
            .context("translate request")?
            .error_for_status()
            .context("translate rejected")?;

        let body: Body = resp.json().await.context("translate decode")?;
        body.data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| anyhow!("translate response carried no translations"))
    }
}

// --- Test helper ---

/// Scripted translator: prepends a marker to its input, or fails every call.
pub struct MockTranslator {
    prefix: String,
    fail: bool,
}

impl MockTranslator {
    pub fn prefixing(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            prefix: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        if self.fail {
            anyhow::bail!("translator down");
        }
        Ok(format!("{}{}", self.prefix, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn han_text_is_detected() {
        assert!(is_han("晶片產量大幅成長，市場樂觀。"));
    }

    #[test]
    fn latin_text_is_not_han() {
        assert!(!is_han("Chip production grew sharply this quarter."));
        assert!(!is_han(""));
    }
}
