use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::chat::ChatSession;
use crate::config::{ResolvedConfig, StorageSettings};
use crate::dialogue::DialogueEngine;
use crate::records::{HttpStore, MemoryStore, SqliteStore, UserStore, WordStore};
use crate::session::SessionStore;
use crate::translation::build_resolver;

pub async fn run_chat(config: &ResolvedConfig) -> Result<()> {
    let engine = Arc::new(build_engine(config)?);
    let mut session = ChatSession::new(engine, config.user.clone(), config.languages.clone());
    session.run().await
}

/// Assembles the dialogue engine from resolved configuration.
pub fn build_engine(config: &ResolvedConfig) -> Result<DialogueEngine> {
    let resolver = build_resolver(&config.providers, &config.languages, config.timeout)?;
    let (users, words) = open_stores(&config.storage, config.timeout)?;

    Ok(DialogueEngine::new(
        SessionStore::new(config.eviction),
        resolver,
        users,
        words,
    ))
}

/// Opens the user and word stores for the configured backend.
pub fn open_stores(
    storage: &StorageSettings,
    timeout: Duration,
) -> Result<(Arc<dyn UserStore>, Arc<dyn WordStore>)> {
    Ok(match storage {
        StorageSettings::Memory => shared(MemoryStore::new()),
        StorageSettings::Sqlite { path } => shared(SqliteStore::open(path.clone())?),
        StorageSettings::Http {
            user_service_url,
            dictionary_service_url,
        } => shared(
            HttpStore::new(user_service_url, dictionary_service_url, timeout)
                .context("Failed to create HTTP client for the record services")?,
        ),
    })
}

fn shared<S>(store: S) -> (Arc<dyn UserStore>, Arc<dyn WordStore>)
where
    S: UserStore + WordStore + 'static,
{
    let store = Arc::new(store);
    (store.clone(), store)
}
