use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::language::LanguagePair;
use super::provider::{ProviderError, TranslationProvider, non_empty};

pub const GOOGLE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// The public `gtx` endpoint of Google Translate.
pub struct GoogleProvider {
    client: Client,
    url: String,
    pair: LanguagePair,
}

impl GoogleProvider {
    pub fn new(pair: LanguagePair, timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_url(GOOGLE_URL, pair, timeout)
    }

    pub fn with_url(
        url: &str,
        pair: LanguagePair,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url: url.to_string(),
            pair,
        })
    }
}

/// Joins the sentence segments found at `[0][*][0]`.
fn extract_translation(body: &Value) -> Result<String, ProviderError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::Malformed("missing sentence list".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    non_empty(&text)
}

#[async_trait]
impl TranslationProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn attempt_translate(&self, word: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("client", "gtx"),
                ("sl", self.pair.source()),
                ("tl", self.pair.target()),
                ("dt", "t"),
                ("q", word),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        extract_translation(&body)
    }
}
