use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{StoreError, StoreResult, UserId, UserRecord, UserStore, WordId, WordRecord, WordStore};

/// Client for the remote user and dictionary services.
pub struct HttpStore {
    client: Client,
    user_service_url: String,
    dictionary_service_url: String,
}

#[derive(Debug, Serialize)]
struct CreateUserRequest<'a> {
    #[serde(rename = "telegramId")]
    telegram_id: &'a str,
}

#[derive(Debug, Serialize)]
struct WordPayload<'a> {
    word: &'a str,
    translation: &'a str,
}

#[derive(Debug, Deserialize)]
struct DictionaryResponse {
    #[serde(default)]
    words: Vec<DictionaryWord>,
}

#[derive(Debug, Deserialize)]
struct DictionaryWord {
    #[serde(rename = "_id")]
    id: String,
    word: String,
    translation: String,
}

impl DictionaryWord {
    fn into_record(self, owner: &UserId) -> WordRecord {
        WordRecord {
            id: WordId::new(self.id),
            owner: owner.clone(),
            original: self.word,
            translation: self.translation,
        }
    }
}

impl HttpStore {
    pub fn new(
        user_service_url: &str,
        dictionary_service_url: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            user_service_url: user_service_url.trim_end_matches('/').to_string(),
            dictionary_service_url: dictionary_service_url.trim_end_matches('/').to_string(),
        })
    }

    fn user_url(&self, user: &UserId) -> String {
        format!("{}/api/users/{user}", self.user_service_url)
    }

    fn words_url(&self, user: &UserId) -> String {
        format!("{}/api/dictionary/{user}/words", self.dictionary_service_url)
    }

    fn word_url(&self, user: &UserId, id: &WordId) -> String {
        format!("{}/{id}", self.words_url(user))
    }
}

async fn read_dictionary(response: reqwest::Response) -> StoreResult<DictionaryResponse> {
    let response = response.error_for_status()?;
    response
        .json::<DictionaryResponse>()
        .await
        .map_err(|e| StoreError::Unavailable(format!("malformed dictionary response: {e}")))
}

#[async_trait]
impl UserStore for HttpStore {
    async fn ensure_user(&self, user: &UserId) -> StoreResult<UserRecord> {
        match self.get_user(user).await {
            Err(StoreError::NotFound) => {}
            other => return other,
        }

        self.client
            .post(format!("{}/api/users", self.user_service_url))
            .json(&CreateUserRequest {
                telegram_id: user.as_str(),
            })
            .send()
            .await?
            .error_for_status()?;

        tracing::info!(user = %user, "registered user with user service");
        Ok(UserRecord { id: user.clone() })
    }

    async fn get_user(&self, user: &UserId) -> StoreResult<UserRecord> {
        self.client
            .get(self.user_url(user))
            .send()
            .await?
            .error_for_status()?;
        Ok(UserRecord { id: user.clone() })
    }
}

#[async_trait]
impl WordStore for HttpStore {
    async fn add_word(
        &self,
        user: &UserId,
        word: &str,
        translation: &str,
    ) -> StoreResult<WordRecord> {
        let response = self
            .client
            .post(self.words_url(user))
            .json(&WordPayload { word, translation })
            .send()
            .await?;

        // The service answers with the whole dictionary; the new word is appended last.
        read_dictionary(response)
            .await?
            .words
            .pop()
            .map(|w| w.into_record(user))
            .ok_or_else(|| StoreError::Unavailable("dictionary service returned no words".into()))
    }

    async fn list_words(&self, user: &UserId) -> StoreResult<Vec<WordRecord>> {
        let response = self.client.get(self.words_url(user)).send().await?;

        // A user without a dictionary document simply has no words yet.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        Ok(read_dictionary(response)
            .await?
            .words
            .into_iter()
            .map(|w| w.into_record(user))
            .collect())
    }

    async fn update_word(
        &self,
        user: &UserId,
        id: &WordId,
        word: &str,
        translation: &str,
    ) -> StoreResult<WordRecord> {
        let response = self
            .client
            .put(self.word_url(user, id))
            .json(&WordPayload { word, translation })
            .send()
            .await?;

        read_dictionary(response)
            .await?
            .words
            .into_iter()
            .find(|w| w.id == id.as_str())
            .map(|w| w.into_record(user))
            .ok_or(StoreError::NotFound)
    }

    async fn delete_word(&self, user: &UserId, id: &WordId) -> StoreResult<()> {
        // The service silently ignores unknown ids, so check ownership first.
        let owned = self.list_words(user).await?.iter().any(|w| &w.id == id);
        if !owned {
            return Err(StoreError::NotFound);
        }

        self.client
            .delete(self.word_url(user, id))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
