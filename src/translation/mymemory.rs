use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::language::LanguagePair;
use super::provider::{ProviderError, TranslationProvider, non_empty};

pub const MYMEMORY_URL: &str = "https://api.mymemory.translated.net/get";

/// The free MyMemory translation memory API.
pub struct MyMemoryProvider {
    client: Client,
    url: String,
    pair: LanguagePair,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: Option<ResponseData>,
    // A number on success, sometimes a string such as "403" on errors.
    response_status: Option<serde_json::Value>,
}

impl MyMemoryResponse {
    /// Whether the in-body status reports success. A missing status does.
    fn succeeded(&self) -> bool {
        match &self.response_status {
            None => true,
            Some(serde_json::Value::Number(n)) => n.as_u64() == Some(200),
            Some(serde_json::Value::String(s)) => s.trim() == "200",
            Some(_) => false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

impl MyMemoryProvider {
    pub fn new(pair: LanguagePair, timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_url(MYMEMORY_URL, pair, timeout)
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

#[async_trait]
impl TranslationProvider for MyMemoryProvider {
    fn name(&self) -> &str {
        "mymemory"
    }

    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn attempt_translate(&self, word: &str) -> Result<String, ProviderError> {
        let langpair = format!("{}|{}", self.pair.source(), self.pair.target());
        let response = self
            .client
            .get(&self.url)
            .query(&[("q", word), ("langpair", langpair.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let body: MyMemoryResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        // Quota and language-pair errors arrive as HTTP 200 with the message in translatedText.
        if !body.succeeded() {
            return Err(ProviderError::Malformed(format!(
                "responseStatus {}",
                body.response_status.unwrap_or_default()
            )));
        }

        let text = body
            .response_data
            .and_then(|data| data.translated_text)
            .ok_or(ProviderError::Empty)?;

        non_empty(&text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> MyMemoryProvider {
        MyMemoryProvider::with_url(
            &server.uri(),
            LanguagePair::new("en", "ru").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_reads_translated_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "cat"))
            .and(query_param("langpair", "en|ru"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseData": {"translatedText": "кот", "match": 1},
                "responseStatus": 200
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        assert_eq!(provider.attempt_translate("cat").await.unwrap(), "кот");
    }

    #[tokio::test]
    async fn test_missing_text_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"responseData": {}})),
            )
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        assert!(matches!(
            provider.attempt_translate("cat").await,
            Err(ProviderError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>down</html>"))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        assert!(matches!(
            provider.attempt_translate("cat").await,
            Err(ProviderError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_error_status_in_body_is_not_a_translation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseData": {
                    "translatedText": "MYMEMORY WARNING: YOU USED ALL AVAILABLE FREE TRANSLATIONS FOR TODAY"
                },
                "responseStatus": 429
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        assert!(matches!(
            provider.attempt_translate("cat").await,
            Err(ProviderError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_string_error_status_is_not_a_translation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseData": {"translatedText": "INVALID LANGUAGE PAIR SPECIFIED"},
                "responseStatus": "403"
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        assert!(provider.attempt_translate("cat").await.is_err());
    }
}
