use std::sync::Arc;
use tracing::{debug, error, info};

use super::message::{Action, Command, Inbound, MessageRef, Outbound, Reply};
use super::parse::{WordPairInput, parse_word_pair};
use super::replies;
use crate::records::{StoreError, UserId, UserStore, WordId, WordStore};
use crate::session::{ConversationSession, Mode, SessionStore};
use crate::translation::{TranslationOutcome, TranslationResolver};

/// Next mode plus what to tell the user.
#[derive(Debug)]
struct Transition {
    mode: Mode,
    outbound: Vec<Outbound>,
}

impl Transition {
    fn to(mode: Mode, outbound: Outbound) -> Self {
        Self {
            mode,
            outbound: vec![outbound],
        }
    }

    fn idle(outbound: Outbound) -> Self {
        Self::to(Mode::Idle, outbound)
    }
}

/// Drives each user's conversation: interprets a message against the user's
/// current mode, performs the resulting record operations, and answers.
///
/// Shared across tasks behind an `Arc`; messages from different users can be
/// handled concurrently.
pub struct DialogueEngine {
    sessions: SessionStore,
    resolver: TranslationResolver,
    users: Arc<dyn UserStore>,
    words: Arc<dyn WordStore>,
}

impl DialogueEngine {
    pub fn new(
        sessions: SessionStore,
        resolver: TranslationResolver,
        users: Arc<dyn UserStore>,
        words: Arc<dyn WordStore>,
    ) -> Self {
        Self {
            sessions,
            resolver,
            users,
            words,
        }
    }

    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub const fn resolver(&self) -> &TranslationResolver {
        &self.resolver
    }

    /// Handles one inbound message and returns the instructions for the channel.
    ///
    /// Applies the session eviction policy first, so stale sessions are dropped
    /// as traffic arrives. Never fails: every error is turned into a reply.
    pub async fn handle(&self, user: &UserId, inbound: Inbound) -> Vec<Outbound> {
        self.sessions.evict();
        let session = self.sessions.get(user);

        let transition = match inbound {
            Inbound::Command(command) => self.on_command(&session, command).await,
            Inbound::Text(text) => self.on_text(&session, text.trim()).await,
            Inbound::Action { action, origin } => self.on_action(&session, action, origin).await,
        };

        if transition.mode != session.mode {
            debug!(user = %user, from = %session.mode, to = %transition.mode, "mode changed");
        }
        self.sessions.set(user, session.with_mode(transition.mode));
        transition.outbound
    }

    async fn on_command(&self, session: &ConversationSession, command: Command) -> Transition {
        let user = &session.user_id;
        match command {
            Command::Start => match self.users.ensure_user(user).await {
                Ok(_) => Transition::idle(Outbound::send(replies::welcome())),
                Err(err) => store_failure(session, "ensure_user", &err),
            },
            Command::AddWord => {
                Transition::to(Mode::AwaitingWordPair, Outbound::send(replies::ask_word_pair()))
            }
            Command::Translate => Transition::to(
                Mode::AwaitingTranslationQuery,
                Outbound::send(replies::ASK_TRANSLATION_QUERY),
            ),
            Command::Dictionary => self.show_dictionary(session).await,
            Command::Help => Transition::to(session.mode.clone(), Outbound::send(replies::help())),
            Command::Cancel => Transition::idle(Outbound::send(replies::CANCELLED)),
        }
    }

    async fn on_text(&self, session: &ConversationSession, text: &str) -> Transition {
        match &session.mode {
            // Free text while a suggestion is pending abandons the suggestion.
            Mode::Idle | Mode::ConfirmingSuggestedTranslation { .. } => {
                self.implicit_translation(text).await
            }
            Mode::AwaitingWordPair => self.add_from_text(session, text).await,
            Mode::AwaitingTranslationQuery => {
                if text.is_empty() {
                    return Transition::to(
                        session.mode.clone(),
                        Outbound::send(replies::ASK_TRANSLATION_QUERY),
                    );
                }
                let reply = match self.resolver.resolve(text).await {
                    TranslationOutcome::Translated { text, .. } => replies::translation(&text),
                    TranslationOutcome::Exhausted => replies::TRANSLATION_FAILED.to_string(),
                };
                Transition::idle(Outbound::send(reply))
            }
            Mode::AwaitingEditPair { word_id } => self.edit_from_text(session, word_id, text).await,
        }
    }

    async fn on_action(
        &self,
        session: &ConversationSession,
        action: Action,
        origin: MessageRef,
    ) -> Transition {
        match action {
            Action::ConfirmAdd { word, translation } => {
                self.confirm_add(session, &word, &translation, origin).await
            }
            Action::Cancel => Transition::idle(Outbound::Edit {
                target: origin,
                text: replies::CANCELLED.to_string(),
            }),
            Action::EditWord(id) => self.begin_edit(session, id).await,
            Action::DeleteWord(id) => self.delete(session, &id, origin).await,
        }
    }

    async fn implicit_translation(&self, word: &str) -> Transition {
        if word.is_empty() {
            return Transition::idle(Outbound::send(replies::ASK_TRANSLATION_QUERY));
        }
        match self.resolver.resolve(word).await {
            TranslationOutcome::Translated { text, .. } => {
                let reply = Reply::text(replies::translation(&text)).with_action(
                    replies::ADD_LABEL,
                    Action::ConfirmAdd {
                        word: word.to_string(),
                        translation: text,
                    },
                );
                Transition::idle(Outbound::Send(reply))
            }
            TranslationOutcome::Exhausted => {
                Transition::idle(Outbound::send(replies::TRANSLATION_FAILED))
            }
        }
    }

    async fn add_from_text(&self, session: &ConversationSession, text: &str) -> Transition {
        match parse_word_pair(text) {
            Ok(WordPairInput::Pair { word, translation }) => {
                match self.words.add_word(&session.user_id, &word, &translation).await {
                    Ok(record) => {
                        info!(user = %session.user_id, id = %record.id, "word added");
                        Transition::idle(Outbound::send(replies::word_added(&word, &translation)))
                    }
                    Err(err) => store_failure(session, "add_word", &err),
                }
            }
            Ok(WordPairInput::WordOnly(word)) => match self.resolver.resolve(&word).await {
                TranslationOutcome::Translated { text, .. } => {
                    let reply = Reply::text(replies::suggest_translation(&word, &text))
                        .with_action(
                            replies::CONFIRM_LABEL,
                            Action::ConfirmAdd {
                                word: word.clone(),
                                translation: text.clone(),
                            },
                        )
                        .with_action(replies::CANCEL_LABEL, Action::Cancel);
                    Transition::to(
                        Mode::ConfirmingSuggestedTranslation {
                            word,
                            translation: text,
                        },
                        Outbound::Send(reply),
                    )
                }
                TranslationOutcome::Exhausted => Transition::to(
                    Mode::AwaitingWordPair,
                    Outbound::send(replies::pair_translation_failed()),
                ),
            },
            Err(_) => Transition::to(
                Mode::AwaitingWordPair,
                Outbound::send(replies::pair_format_reminder()),
            ),
        }
    }

    async fn edit_from_text(
        &self,
        session: &ConversationSession,
        word_id: &WordId,
        text: &str,
    ) -> Transition {
        let Ok(WordPairInput::Pair { word, translation }) = parse_word_pair(text) else {
            return Transition::to(
                session.mode.clone(),
                Outbound::send(replies::pair_format_reminder()),
            );
        };

        match self
            .words
            .update_word(&session.user_id, word_id, &word, &translation)
            .await
        {
            Ok(_) => {
                info!(user = %session.user_id, id = %word_id, "word updated");
                Transition::idle(Outbound::send(replies::word_updated(&word, &translation)))
            }
            Err(StoreError::NotFound) => Transition::idle(Outbound::send(replies::WORD_NOT_FOUND)),
            Err(err) => store_failure(session, "update_word", &err),
        }
    }

    async fn confirm_add(
        &self,
        session: &ConversationSession,
        word: &str,
        translation: &str,
        origin: MessageRef,
    ) -> Transition {
        let user = &session.user_id;

        // A repeated confirmation must not store the pair twice.
        let existing = match self.words.list_words(user).await {
            Ok(words) => words,
            Err(err) => return store_failure(session, "list_words", &err),
        };
        if existing
            .iter()
            .any(|w| w.original == word && w.translation == translation)
        {
            debug!(user = %user, word, "pair already stored, ignoring confirmation");
            return Transition::idle(Outbound::Edit {
                target: origin,
                text: replies::word_already_added(word, translation),
            });
        }

        match self.words.add_word(user, word, translation).await {
            Ok(record) => {
                info!(user = %user, id = %record.id, "word added");
                Transition::idle(Outbound::Edit {
                    target: origin,
                    text: replies::word_added(word, translation),
                })
            }
            Err(err) => store_failure(session, "add_word", &err),
        }
    }

    async fn begin_edit(&self, session: &ConversationSession, id: WordId) -> Transition {
        let words = match self.words.list_words(&session.user_id).await {
            Ok(words) => words,
            Err(err) => return store_failure(session, "list_words", &err),
        };

        match words.into_iter().find(|w| w.id == id) {
            Some(record) => Transition::to(
                Mode::AwaitingEditPair { word_id: id },
                Outbound::send(replies::ask_edit_pair(&record.original, &record.translation)),
            ),
            None => Transition::to(
                session.mode.clone(),
                Outbound::send(replies::WORD_NOT_FOUND),
            ),
        }
    }

    async fn delete(
        &self,
        session: &ConversationSession,
        id: &WordId,
        origin: MessageRef,
    ) -> Transition {
        match self.words.delete_word(&session.user_id, id).await {
            Ok(()) => {
                info!(user = %session.user_id, id = %id, "word deleted");
                Transition {
                    mode: session.mode.clone(),
                    outbound: vec![
                        Outbound::send(replies::WORD_DELETED),
                        Outbound::Remove(origin),
                    ],
                }
            }
            Err(StoreError::NotFound) => Transition::to(
                session.mode.clone(),
                Outbound::send(replies::WORD_NOT_FOUND),
            ),
            Err(err) => store_failure(session, "delete_word", &err),
        }
    }

    async fn show_dictionary(&self, session: &ConversationSession) -> Transition {
        let words = match self.words.list_words(&session.user_id).await {
            Ok(words) => words,
            Err(err) => return store_failure(session, "list_words", &err),
        };

        if words.is_empty() {
            return Transition::to(
                session.mode.clone(),
                Outbound::send(replies::DICTIONARY_EMPTY),
            );
        }

        let outbound = words
            .into_iter()
            .map(|record| {
                Outbound::Send(
                    Reply::text(replies::dictionary_entry(
                        &record.original,
                        &record.translation,
                    ))
                    .with_action(replies::EDIT_LABEL, Action::EditWord(record.id.clone()))
                    .with_action(replies::DELETE_LABEL, Action::DeleteWord(record.id)),
                )
            })
            .collect();

        Transition {
            mode: session.mode.clone(),
            outbound,
        }
    }
}

/// Reports a collaborator failure and leaves the mode alone so the user can retry.
fn store_failure(session: &ConversationSession, operation: &str, err: &StoreError) -> Transition {
    let text = match err {
        StoreError::NotFound => replies::USER_NOT_FOUND,
        StoreError::Unavailable(_) => {
            error!(user = %session.user_id, operation, error = %err, "record store call failed");
            replies::RETRY_LATER
        }
    };
    Transition::to(session.mode.clone(), Outbound::send(text))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::records::{MemoryStore, StoreResult, UserRecord, WordRecord};
    use crate::session::EvictionPolicy;
    use crate::translation::{ProviderError, TranslationProvider};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers from a fixed table; unknown words fail.
    struct TableProvider(Vec<(&'static str, &'static str)>);

    #[async_trait]
    impl TranslationProvider for TableProvider {
        fn name(&self) -> &str {
            "table"
        }

        async fn attempt_translate(&self, word: &str) -> Result<String, ProviderError> {
            self.0
                .iter()
                .find(|(w, _)| *w == word)
                .map(|(_, t)| (*t).to_string())
                .ok_or(ProviderError::Empty)
        }
    }

    /// Word store that counts writes and can be switched into a failing state.
    #[derive(Default)]
    struct RecordingStore {
        inner: MemoryStore,
        adds: AtomicUsize,
        deletes: AtomicUsize,
        failing: Mutex<bool>,
    }

    impl RecordingStore {
        fn fail(&self, on: bool) {
            *self.failing.lock().unwrap() = on;
        }

        fn check(&self) -> StoreResult<()> {
            if *self.failing.lock().unwrap() {
                Err(StoreError::Unavailable("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl UserStore for RecordingStore {
        async fn ensure_user(&self, user: &UserId) -> StoreResult<UserRecord> {
            self.check()?;
            self.inner.ensure_user(user).await
        }

        async fn get_user(&self, user: &UserId) -> StoreResult<UserRecord> {
            self.check()?;
            self.inner.get_user(user).await
        }
    }

    #[async_trait]
    impl WordStore for RecordingStore {
        async fn add_word(
            &self,
            user: &UserId,
            word: &str,
            translation: &str,
        ) -> StoreResult<WordRecord> {
            self.check()?;
            self.adds.fetch_add(1, Ordering::SeqCst);
            self.inner.add_word(user, word, translation).await
        }

        async fn list_words(&self, user: &UserId) -> StoreResult<Vec<WordRecord>> {
            self.check()?;
            self.inner.list_words(user).await
        }

        async fn update_word(
            &self,
            user: &UserId,
            id: &WordId,
            word: &str,
            translation: &str,
        ) -> StoreResult<WordRecord> {
            self.check()?;
            self.inner.update_word(user, id, word, translation).await
        }

        async fn delete_word(&self, user: &UserId, id: &WordId) -> StoreResult<()> {
            self.check()?;
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_word(user, id).await
        }
    }

    fn engine_with(store: &Arc<RecordingStore>) -> DialogueEngine {
        engine_with_policy(store, EvictionPolicy::Unbounded)
    }

    fn engine_with_policy(store: &Arc<RecordingStore>, policy: EvictionPolicy) -> DialogueEngine {
        let resolver = TranslationResolver::new(Duration::from_secs(1))
            .with_provider(TableProvider(vec![("cat", "кот"), ("dog", "собака")]));
        DialogueEngine::new(
            SessionStore::new(policy),
            resolver,
            Arc::clone(store) as Arc<dyn UserStore>,
            Arc::clone(store) as Arc<dyn WordStore>,
        )
    }

    fn alice() -> UserId {
        UserId::new("alice")
    }

    fn text(s: &str) -> Inbound {
        Inbound::Text(s.to_string())
    }

    fn mode(engine: &DialogueEngine) -> Mode {
        engine.sessions().get(&alice()).mode
    }

    fn only_reply(outbound: &[Outbound]) -> &Reply {
        match outbound {
            [Outbound::Send(reply)] => reply,
            other => panic!("expected a single reply, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_start_registers_user_and_welcomes() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);

        let out = engine.handle(&alice(), Inbound::Command(Command::Start)).await;

        assert!(only_reply(&out).text.contains("/add"));
        assert!(store.inner.get_user(&alice()).await.is_ok());
        assert_eq!(mode(&engine), Mode::Idle);
    }

    #[tokio::test]
    async fn test_pair_in_awaiting_word_pair_adds_once() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);

        engine.handle(&alice(), Inbound::Command(Command::AddWord)).await;
        assert_eq!(mode(&engine), Mode::AwaitingWordPair);

        let out = engine.handle(&alice(), text("cat - кот")).await;

        assert!(only_reply(&out).text.contains("cat - кот"));
        assert_eq!(store.adds.load(Ordering::SeqCst), 1);
        let words = store.inner.list_words(&alice()).await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!((words[0].original.as_str(), words[0].translation.as_str()), ("cat", "кот"));
        assert_eq!(mode(&engine), Mode::Idle);
    }

    #[tokio::test]
    async fn test_single_word_proposes_translation_without_adding() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);

        engine.handle(&alice(), Inbound::Command(Command::AddWord)).await;
        let out = engine.handle(&alice(), text("cat")).await;

        assert_eq!(
            mode(&engine),
            Mode::ConfirmingSuggestedTranslation {
                word: "cat".to_string(),
                translation: "кот".to_string()
            }
        );
        let reply = only_reply(&out);
        assert_eq!(reply.actions.len(), 2);
        assert_eq!(
            reply.actions[0].action,
            Action::ConfirmAdd {
                word: "cat".to_string(),
                translation: "кот".to_string()
            }
        );
        assert_eq!(store.adds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_confirm_then_repeat_confirm_does_not_duplicate() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);
        let confirm = Inbound::Action {
            action: Action::ConfirmAdd {
                word: "cat".to_string(),
                translation: "кот".to_string(),
            },
            origin: MessageRef(4),
        };

        engine.handle(&alice(), Inbound::Command(Command::AddWord)).await;
        engine.handle(&alice(), text("cat")).await;

        let first = engine.handle(&alice(), confirm.clone()).await;
        assert!(matches!(
            first.as_slice(),
            [Outbound::Edit { target: MessageRef(4), .. }]
        ));
        assert_eq!(mode(&engine), Mode::Idle);

        let second = engine.handle(&alice(), confirm).await;
        assert!(second[0].text().unwrap().contains("Already"));
        assert_eq!(store.adds.load(Ordering::SeqCst), 1);
        assert_eq!(store.inner.list_words(&alice()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_action_resets_to_idle() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);

        engine.handle(&alice(), Inbound::Command(Command::AddWord)).await;
        engine.handle(&alice(), text("dog")).await;

        let out = engine
            .handle(
                &alice(),
                Inbound::Action {
                    action: Action::Cancel,
                    origin: MessageRef(9),
                },
            )
            .await;

        assert_eq!(
            out,
            vec![Outbound::Edit {
                target: MessageRef(9),
                text: replies::CANCELLED.to_string()
            }]
        );
        assert_eq!(mode(&engine), Mode::Idle);
        assert_eq!(store.adds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_free_text_while_confirming_translates_and_discards_pending() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);

        engine.handle(&alice(), Inbound::Command(Command::AddWord)).await;
        engine.handle(&alice(), text("cat")).await;
        let out = engine.handle(&alice(), text("dog")).await;

        assert_eq!(only_reply(&out).text, "Translation: собака");
        assert_eq!(mode(&engine), Mode::Idle);
    }

    #[tokio::test]
    async fn test_idle_text_offers_add_action() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);

        let out = engine.handle(&alice(), text("  cat ")).await;

        let reply = only_reply(&out);
        assert_eq!(reply.text, "Translation: кот");
        assert_eq!(reply.actions[0].label, replies::ADD_LABEL);
        assert_eq!(mode(&engine), Mode::Idle);
    }

    #[tokio::test]
    async fn test_idle_text_untranslatable_reports_failure() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);

        let out = engine.handle(&alice(), text("qwertyuiop")).await;

        assert_eq!(only_reply(&out).text, replies::TRANSLATION_FAILED);
        assert!(only_reply(&out).actions.is_empty());
    }

    #[tokio::test]
    async fn test_translation_query_returns_to_idle_either_way() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);

        engine.handle(&alice(), Inbound::Command(Command::Translate)).await;
        assert_eq!(mode(&engine), Mode::AwaitingTranslationQuery);
        let out = engine.handle(&alice(), text("unknown")).await;
        assert_eq!(only_reply(&out).text, replies::TRANSLATION_FAILED);
        assert_eq!(mode(&engine), Mode::Idle);

        engine.handle(&alice(), Inbound::Command(Command::Translate)).await;
        let out = engine.handle(&alice(), text("cat")).await;
        assert_eq!(only_reply(&out).text, "Translation: кот");
        assert!(only_reply(&out).actions.is_empty());
        assert_eq!(mode(&engine), Mode::Idle);
    }

    #[tokio::test]
    async fn test_malformed_pair_keeps_mode() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);

        engine.handle(&alice(), Inbound::Command(Command::AddWord)).await;
        let out = engine.handle(&alice(), text("cat - ")).await;

        assert!(only_reply(&out).text.contains("format"));
        assert_eq!(mode(&engine), Mode::AwaitingWordPair);
    }

    #[tokio::test]
    async fn test_dictionary_lists_one_message_per_word() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);

        let out = engine.handle(&alice(), Inbound::Command(Command::Dictionary)).await;
        assert_eq!(only_reply(&out).text, replies::DICTIONARY_EMPTY);

        let cat = store.inner.add_word(&alice(), "cat", "кот").await.unwrap();
        store.inner.add_word(&alice(), "dog", "собака").await.unwrap();

        let out = engine.handle(&alice(), Inbound::Command(Command::Dictionary)).await;
        assert_eq!(out.len(), 2);
        let Outbound::Send(first) = &out[0] else {
            panic!("expected a reply");
        };
        assert_eq!(first.text, "cat - кот");
        assert_eq!(
            first.actions.iter().map(|a| &a.action).collect::<Vec<_>>(),
            vec![&Action::EditWord(cat.id.clone()), &Action::DeleteWord(cat.id)]
        );
        assert_eq!(mode(&engine), Mode::Idle);
    }

    #[tokio::test]
    async fn test_edit_flow_updates_word() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);
        let record = store.inner.add_word(&alice(), "cat", "кошка").await.unwrap();

        let out = engine
            .handle(
                &alice(),
                Inbound::Action {
                    action: Action::EditWord(record.id.clone()),
                    origin: MessageRef(1),
                },
            )
            .await;
        assert!(only_reply(&out).text.contains("cat - кошка"));
        assert_eq!(
            mode(&engine),
            Mode::AwaitingEditPair {
                word_id: record.id.clone()
            }
        );

        let out = engine.handle(&alice(), text("cat")).await;
        assert!(only_reply(&out).text.contains("format"));
        assert!(matches!(mode(&engine), Mode::AwaitingEditPair { .. }));

        engine.handle(&alice(), text("cat - кот")).await;
        assert_eq!(mode(&engine), Mode::Idle);
        assert_eq!(
            store.inner.list_words(&alice()).await.unwrap()[0].translation,
            "кот"
        );
    }

    #[tokio::test]
    async fn test_edit_unknown_word_is_not_found() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);

        let out = engine
            .handle(
                &alice(),
                Inbound::Action {
                    action: Action::EditWord(WordId::new("404")),
                    origin: MessageRef(1),
                },
            )
            .await;

        assert_eq!(only_reply(&out).text, replies::WORD_NOT_FOUND);
        assert_eq!(mode(&engine), Mode::Idle);
    }

    #[tokio::test]
    async fn test_delete_removes_word_and_origin_message() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);
        let record = store.inner.add_word(&alice(), "cat", "кот").await.unwrap();

        let out = engine
            .handle(
                &alice(),
                Inbound::Action {
                    action: Action::DeleteWord(record.id),
                    origin: MessageRef(2),
                },
            )
            .await;

        assert_eq!(
            out,
            vec![
                Outbound::send(replies::WORD_DELETED),
                Outbound::Remove(MessageRef(2))
            ]
        );
        assert!(store.inner.list_words(&alice()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_foreign_word_is_not_found_and_changes_nothing() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);
        let bobs = store
            .inner
            .add_word(&UserId::new("bob"), "cat", "кот")
            .await
            .unwrap();

        let out = engine
            .handle(
                &alice(),
                Inbound::Action {
                    action: Action::DeleteWord(bobs.id),
                    origin: MessageRef(2),
                },
            )
            .await;

        assert_eq!(only_reply(&out).text, replies::WORD_NOT_FOUND);
        assert_eq!(
            store
                .inner
                .list_words(&UserId::new("bob"))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_store_outage_keeps_mode_for_retry() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);

        engine.handle(&alice(), Inbound::Command(Command::AddWord)).await;
        store.fail(true);
        let out = engine.handle(&alice(), text("cat - кот")).await;

        assert_eq!(only_reply(&out).text, replies::RETRY_LATER);
        assert_eq!(mode(&engine), Mode::AwaitingWordPair);

        store.fail(false);
        engine.handle(&alice(), text("cat - кот")).await;
        assert_eq!(mode(&engine), Mode::Idle);
        assert_eq!(store.inner.list_words(&alice()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commands_override_any_mode() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with(&store);

        engine.handle(&alice(), Inbound::Command(Command::AddWord)).await;
        engine.handle(&alice(), text("cat")).await;
        engine.handle(&alice(), Inbound::Command(Command::Translate)).await;
        assert_eq!(mode(&engine), Mode::AwaitingTranslationQuery);

        engine.handle(&alice(), Inbound::Command(Command::Cancel)).await;
        assert_eq!(mode(&engine), Mode::Idle);
    }

    #[tokio::test]
    async fn test_users_have_independent_sessions() {
        let store = Arc::new(RecordingStore::default());
        let engine = Arc::new(engine_with(&store));
        let bob = UserId::new("bob");

        engine.handle(&alice(), Inbound::Command(Command::AddWord)).await;

        let handle = {
            let engine = Arc::clone(&engine);
            let bob = bob.clone();
            tokio::spawn(async move { engine.handle(&bob, text("cat")).await })
        };
        handle.await.unwrap();

        assert_eq!(mode(&engine), Mode::AwaitingWordPair);
        assert_eq!(engine.sessions().get(&bob).mode, Mode::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_dropped_as_traffic_arrives() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with_policy(&store, EvictionPolicy::IdleFor(Duration::from_secs(60)));

        for i in 0..100 {
            engine
                .handle(&UserId::new(format!("user-{i}")), Inbound::Command(Command::Help))
                .await;
            tokio::time::advance(Duration::from_secs(3600)).await;
        }

        assert_eq!(engine.sessions().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_pending_step_is_forgotten() {
        let store = Arc::new(RecordingStore::default());
        let engine = engine_with_policy(&store, EvictionPolicy::IdleFor(Duration::from_secs(60)));

        engine.handle(&alice(), Inbound::Command(Command::AddWord)).await;
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(mode(&engine), Mode::AwaitingWordPair);

        tokio::time::advance(Duration::from_secs(120)).await;
        let outbound = engine.handle(&alice(), text("cat - кот")).await;

        // Back at Idle, the text is a translation request rather than a pair.
        assert_eq!(store.adds.load(Ordering::SeqCst), 0);
        assert_eq!(outbound.len(), 1);
        assert_eq!(mode(&engine), Mode::Idle);
    }
}
