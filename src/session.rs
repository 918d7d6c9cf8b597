//! Composer session for one conversation view.
//!
//! Ties the mode resolver, the conversation cache and a [`ChatBackend`]
//! together: opening a conversation, selecting a mode and sending the draft.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::ApiError;
use crate::cache::ConversationCache;
use crate::mode::ModeResolver;
use crate::models::{
    Conversation, ConversationWithMessages, CreateConversationRequest, Message, OperationalMode,
    SendMessagesRequest, UiMessage,
};
use crate::normalize::to_ui_messages;
use crate::traits::ChatBackend;

/// Send flow errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A previous send has not finished
    #[error("A message is already being sent")]
    SendInProgress,
    /// The operation needs an open conversation
    #[error("No conversation is open")]
    NoConversation,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Holds the in-flight flag for one send and clears it when dropped,
/// including when the send future is dropped before completing.
struct SendingGuard(Arc<AtomicBool>);

impl SendingGuard {
    fn new(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(Arc::clone(flag))
    }
}

impl Drop for SendingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// State behind the composer and the message list.
#[derive(Debug)]
pub struct ChatSession<B: ChatBackend> {
    backend: B,
    resolver: ModeResolver,
    cache: ConversationCache,
    conversation: Option<Conversation>,
    transcript: Vec<Message>,
    draft: String,
    /// System prompt for a conversation that does not exist yet
    draft_system_prompt: Option<String>,
    sending: Arc<AtomicBool>,
    local_seq: u64,
}

impl<B: ChatBackend> ChatSession<B> {
    /// Create a session showing no conversation.
    pub fn new(backend: B, mut resolver: ModeResolver) -> Self {
        resolver.on_conversation_changed(None, None);
        Self {
            backend,
            resolver,
            cache: ConversationCache::new(),
            conversation: None,
            transcript: Vec::new(),
            draft: String::new(),
            draft_system_prompt: None,
            sending: Arc::new(AtomicBool::new(false)),
            local_seq: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn resolver(&self) -> &ModeResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &ConversationCache {
        &self.cache
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation.as_ref().map(|c| c.id.as_str())
    }

    pub fn mode(&self) -> OperationalMode {
        self.resolver.current()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn draft_system_prompt(&self) -> Option<&str> {
        self.draft_system_prompt.as_deref()
    }

    /// System prompt used when the next send creates a conversation.
    pub fn set_draft_system_prompt(&mut self, prompt: Option<String>) {
        self.draft_system_prompt = prompt;
    }

    /// Input is locked while a send is in flight.
    pub fn is_input_disabled(&self) -> bool {
        self.sending.load(Ordering::SeqCst)
    }

    /// Transcript in render-ready form.
    pub fn ui_messages(&self) -> Vec<UiMessage> {
        to_ui_messages(Some(self.transcript.as_slice()))
    }

    /// Show a conversation, or the empty composer for `None`.
    pub async fn open(&mut self, conversation_id: Option<&str>) -> Result<(), SessionError> {
        let Some(id) = conversation_id.filter(|id| !id.is_empty()) else {
            self.resolver.on_conversation_changed(None, None);
            self.conversation = None;
            self.transcript.clear();
            return Ok(());
        };

        // The resolver only moves once the conversation is actually loaded
        let detail = match self.cache.detail(id) {
            Some(detail) => detail.clone(),
            None => {
                let detail = self.backend.get_conversation(id).await?;
                self.cache.insert_detail(detail.clone());
                detail
            }
        };

        let ConversationWithMessages {
            conversation,
            messages,
        } = detail;
        self.resolver.on_conversation_changed(Some(id), None);
        self.resolver.on_server_mode(conversation.operational_mode);
        self.conversation = Some(conversation);
        self.transcript = messages;
        Ok(())
    }

    /// Re-fetch the open conversation from the backend.
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let id = self
            .conversation_id()
            .map(str::to_string)
            .ok_or(SessionError::NoConversation)?;
        self.cache.invalidate_detail(&id);
        self.open(Some(id.as_str())).await
    }

    /// Conversation list, from cache when available.
    pub async fn conversations(&mut self) -> Result<Vec<Conversation>, SessionError> {
        if let Some(list) = self.cache.list() {
            return Ok(list.to_vec());
        }

        let list = self.backend.list_conversations().await?;
        self.cache.set_list(list.clone());
        Ok(list)
    }

    /// Explicit user selection. Local only; see [`Self::sync_mode_to_server`].
    pub fn select_mode(&mut self, mode: OperationalMode) {
        self.resolver.select(mode);
    }

    /// Record the current mode on the open conversation.
    pub async fn sync_mode_to_server(&mut self) -> Result<Conversation, SessionError> {
        let id = self
            .conversation_id()
            .map(str::to_string)
            .ok_or(SessionError::NoConversation)?;

        let updated = self
            .backend
            .update_operational_mode(&id, self.resolver.current())
            .await?;

        self.cache.invalidate_detail(&id);
        self.cache.invalidate_lists();
        self.conversation = Some(updated.clone());
        Ok(updated)
    }

    /// Send the draft.
    ///
    /// Returns the conversation the message went to, or `None` when the draft
    /// is blank. On failure the draft is restored.
    pub async fn send(&mut self) -> Result<Option<String>, SessionError> {
        if self.is_input_disabled() {
            return Err(SessionError::SendInProgress);
        }

        let text = self.draft.trim().to_string();
        if text.is_empty() {
            return Ok(None);
        }

        let draft = std::mem::take(&mut self.draft);
        let guard = SendingGuard::new(&self.sending);
        let result = match self.conversation_id().map(str::to_string) {
            Some(id) => self.post_message(&id, &text).await.map(|()| id.clone()),
            None => self.create_conversation(&text).await,
        };
        drop(guard);

        match result {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                tracing::warn!(error = %e, "Send failed, restoring draft");
                self.draft = draft;
                Err(e.into())
            }
        }
    }

    async fn create_conversation(&mut self, text: &str) -> Result<String, ApiError> {
        let request = CreateConversationRequest::new(text)
            .with_system_prompt(self.draft_system_prompt.clone())
            .with_mode(self.resolver.current());

        let conversation = self.backend.create_conversation(&request).await?;
        tracing::info!(
            conversation_id = %conversation.id,
            mode = %self.resolver.current(),
            "Created conversation"
        );

        self.resolver.carry_over_to(&conversation.id);
        self.draft_system_prompt = None;
        self.transcript = vec![self.local_user_message(text)];
        self.cache.invalidate_lists();

        let id = conversation.id.clone();
        self.conversation = Some(conversation);
        Ok(id)
    }

    async fn post_message(&mut self, conversation_id: &str, text: &str) -> Result<(), ApiError> {
        let message = self.local_user_message(text);

        let mut outgoing = to_ui_messages(Some(self.transcript.as_slice()));
        outgoing.extend(to_ui_messages(Some(std::slice::from_ref(&message))));
        let request = SendMessagesRequest::new(outgoing).with_mode(self.resolver.current());

        self.backend.send_messages(conversation_id, &request).await?;

        self.transcript.push(message);
        self.cache.invalidate_detail(conversation_id);
        Ok(())
    }

    fn local_user_message(&mut self, text: &str) -> Message {
        self.local_seq += 1;
        Message::user(format!("local-{}", self.local_seq), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MemoryStore, MockBackend, RecordedCall};
    use crate::mode::{ModeCache, ModeKeyScope};
    use crate::models::ModeOverride;
    use std::sync::Arc;

    fn session(store: &MemoryStore, backend: &MockBackend) -> ChatSession<MockBackend> {
        let cache = ModeCache::new(Arc::new(store.clone()), ModeKeyScope::Conversation);
        ChatSession::new(backend.clone(), ModeResolver::new(cache))
    }

    #[tokio::test]
    async fn test_blank_draft_is_a_no_op() {
        let store = MemoryStore::new();
        let backend = MockBackend::new();
        let mut session = session(&store, &backend);

        session.set_draft("   \n");
        assert_eq!(session.send().await.unwrap(), None);
        assert!(backend.calls().is_empty());
        assert_eq!(session.draft(), "   \n");
    }

    #[tokio::test]
    async fn test_send_in_progress_is_rejected() {
        let store = MemoryStore::new();
        let backend = MockBackend::new();
        let mut session = session(&store, &backend);

        session.sending.store(true, Ordering::SeqCst);
        session.set_draft("hello");
        assert!(session.is_input_disabled());
        assert!(matches!(
            session.send().await,
            Err(SessionError::SendInProgress)
        ));
        assert_eq!(session.draft(), "hello");
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_first_send_creates_and_carries_mode() {
        let store = MemoryStore::new();
        let backend = MockBackend::new();
        let mut session = session(&store, &backend);

        session.select_mode(OperationalMode::Thinking);
        session.set_draft_system_prompt(Some("Be brief".to_string()));
        session.set_draft("Plan a trip");

        let id = session.send().await.unwrap().expect("conversation id");

        assert_eq!(id, "conv-1");
        assert_eq!(session.conversation_id(), Some("conv-1"));
        assert_eq!(session.draft(), "");
        assert_eq!(session.draft_system_prompt(), None);
        assert!(!session.is_input_disabled());
        assert_eq!(
            store.peek("conversation_mode_conv-1").as_deref(),
            Some("thinking")
        );

        let created = backend.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].title, "Untitled");
        assert_eq!(created[0].first_message, "Plan a trip");
        assert_eq!(created[0].system_prompt.as_deref(), Some("Be brief"));
        assert_eq!(created[0].operational_mode, OperationalMode::Thinking);
    }

    #[tokio::test]
    async fn test_follow_up_send_attaches_override() {
        let store = MemoryStore::new();
        let backend = MockBackend::new();
        let mut session = session(&store, &backend);

        session.set_draft("first");
        session.send().await.unwrap();

        session.select_mode(OperationalMode::Fast);
        session.set_draft("second");
        session.send().await.unwrap();

        let sent = backend.sent();
        assert_eq!(sent.len(), 1);
        let (conversation_id, request) = &sent[0];
        assert_eq!(conversation_id, "conv-1");
        assert_eq!(request.mode_override, Some(ModeOverride::Fast));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[1].text(), "second");
        assert_eq!(session.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_auto_send_has_no_override() {
        let store = MemoryStore::new();
        let backend = MockBackend::new();
        let mut session = session(&store, &backend);

        session.set_draft("first");
        session.send().await.unwrap();
        session.set_draft("second");
        session.send().await.unwrap();

        let (_, request) = &backend.sent()[0];
        assert_eq!(request.mode_override, None);
        let body = serde_json::to_value(request).unwrap();
        assert!(body.get("modeOverride").is_none());
    }

    #[tokio::test]
    async fn test_failed_send_restores_draft() {
        let store = MemoryStore::new();
        let backend = MockBackend::new();
        let mut session = session(&store, &backend);

        backend.set_fail_with(Some((502, "bad gateway")));
        session.set_draft("hello");

        let err = session.send().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Api(ApiError::ServerError { status: 502, .. })
        ));
        assert_eq!(session.draft(), "hello");
        assert!(!session.is_input_disabled());
        assert_eq!(session.conversation_id(), None);
        assert!(store.is_empty());

        backend.set_fail_with(None);
        assert_eq!(session.send().await.unwrap().as_deref(), Some("conv-1"));
    }

    #[tokio::test]
    async fn test_failed_open_keeps_resolver_on_shown_conversation() {
        let store = MemoryStore::new();
        let backend = MockBackend::new();
        let mut session = session(&store, &backend);

        session.set_draft("first");
        session.send().await.unwrap();
        session.select_mode(OperationalMode::Fast);

        backend.set_fail_with(Some((503, "unavailable")));
        assert!(session.open(Some("c2")).await.is_err());
        assert_eq!(session.conversation_id(), Some("conv-1"));
        assert_eq!(session.resolver().conversation_id(), Some("conv-1"));
        assert_eq!(session.mode(), OperationalMode::Fast);

        backend.set_fail_with(None);
        session.select_mode(OperationalMode::Thinking);
        session.set_draft("second");
        session.send().await.unwrap();

        let sent = backend.sent();
        assert_eq!(sent[0].0, "conv-1");
        assert_eq!(sent[0].1.mode_override, Some(ModeOverride::Thinking));
        assert_eq!(
            store.peek("conversation_mode_conv-1").as_deref(),
            Some("thinking")
        );
        assert_eq!(store.peek("conversation_mode_c2"), None);
    }

    #[tokio::test]
    async fn test_dropped_send_releases_input() {
        let store = MemoryStore::new();
        let backend = MockBackend::new();
        let mut session = session(&store, &backend);

        backend.set_delay(Some(std::time::Duration::from_secs(5)));
        session.set_draft("hello");
        let result =
            tokio::time::timeout(std::time::Duration::from_millis(20), session.send()).await;
        assert!(result.is_err());
        assert!(!session.is_input_disabled());

        backend.set_delay(None);
        session.set_draft("hello again");
        assert_eq!(session.send().await.unwrap().as_deref(), Some("conv-1"));
    }

    #[tokio::test]
    async fn test_open_uses_server_mode_then_cache() {
        let store = MemoryStore::new();
        let backend = MockBackend::new();
        let created = backend
            .create_conversation(
                &CreateConversationRequest::new("x").with_mode(OperationalMode::Fast),
            )
            .await
            .unwrap();
        let mut session = session(&store, &backend);

        session.open(Some(created.id.as_str())).await.unwrap();
        assert_eq!(session.mode(), OperationalMode::Fast);
        assert_eq!(store.write_count(), 1);

        session.select_mode(OperationalMode::Thinking);
        session.open(None).await.unwrap();
        assert_eq!(session.mode(), OperationalMode::Auto);

        session.open(Some(created.id.as_str())).await.unwrap();
        assert_eq!(session.mode(), OperationalMode::Thinking);

        let fetches = backend
            .calls()
            .into_iter()
            .filter(|c| matches!(c, RecordedCall::GetConversation(_)))
            .count();
        assert_eq!(fetches, 1);
    }

    #[tokio::test]
    async fn test_select_mode_makes_no_network_call() {
        let store = MemoryStore::new();
        let backend = MockBackend::new();
        let mut session = session(&store, &backend);

        session.select_mode(OperationalMode::Fast);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sync_mode_invalidates_views() {
        let store = MemoryStore::new();
        let backend = MockBackend::new();
        let mut session = session(&store, &backend);

        assert!(matches!(
            session.sync_mode_to_server().await,
            Err(SessionError::NoConversation)
        ));

        session.set_draft("hi");
        session.send().await.unwrap();
        session.open(Some("conv-1")).await.unwrap();
        session.conversations().await.unwrap();
        assert!(session.cache().detail("conv-1").is_some());
        assert!(session.cache().list().is_some());

        session.select_mode(OperationalMode::Thinking);
        let updated = session.sync_mode_to_server().await.unwrap();

        assert_eq!(updated.operational_mode, Some(OperationalMode::Thinking));
        assert!(session.cache().detail("conv-1").is_none());
        assert!(session.cache().list().is_none());
    }
}
