//! Recording chat backend for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::ApiError;
use crate::models::{
    Conversation, ConversationWithMessages, CreateConversationRequest, OperationalMode,
    SendMessagesRequest,
};
use crate::traits::ChatBackend;

/// A backend call as the mock saw it.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    ListConversations,
    GetConversation(String),
    CreateConversation(CreateConversationRequest),
    SendMessages {
        conversation_id: String,
        request: SendMessagesRequest,
    },
    UpdateMode {
        conversation_id: String,
        mode: OperationalMode,
    },
}

/// In-memory backend that records every call.
///
/// Conversations created through it are stored and can be fetched back.
/// Clones share state.
///
/// # Example
///
/// ```ignore
/// use converse::adapters::mock::MockBackend;
///
/// let backend = MockBackend::new();
/// backend.set_fail_with(Some((503, "unavailable")));
/// assert!(backend.list_conversations().await.is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    conversations: Arc<Mutex<HashMap<String, ConversationWithMessages>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    /// Status and message every call fails with, when set
    failure: Arc<Mutex<Option<(u16, String)>>>,
    next_id: Arc<Mutex<u64>>,
    /// How long create and send calls take before answering
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a conversation the backend will return.
    pub fn with_conversation(self, conversation: ConversationWithMessages) -> Self {
        self.insert(conversation);
        self
    }

    pub fn insert(&self, conversation: ConversationWithMessages) {
        self.conversations
            .lock()
            .unwrap()
            .insert(conversation.conversation.id.clone(), conversation);
    }

    /// Make every subsequent call fail with this status, or succeed again with `None`.
    pub fn set_fail_with(&self, failure: Option<(u16, &str)>) {
        *self.failure.lock().unwrap() =
            failure.map(|(status, message)| (status, message.to_string()));
    }

    /// Make create and send calls wait this long before answering.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Send requests so far, in order.
    pub fn sent(&self) -> Vec<(String, SendMessagesRequest)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::SendMessages {
                    conversation_id,
                    request,
                } => Some((conversation_id, request)),
                _ => None,
            })
            .collect()
    }

    /// Create requests so far, in order.
    pub fn created(&self) -> Vec<CreateConversationRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::CreateConversation(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some((status, message)) => Err(ApiError::ServerError { status, message }),
            None => Ok(()),
        }
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn not_found(id: &str) -> ApiError {
        ApiError::ServerError {
            status: 404,
            message: format!("Conversation {} not found", id),
        }
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        self.record(RecordedCall::ListConversations)?;
        let mut list: Vec<Conversation> = self
            .conversations
            .lock()
            .unwrap()
            .values()
            .map(|detail| detail.conversation.clone())
            .collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(list)
    }

    async fn get_conversation(&self, id: &str) -> Result<ConversationWithMessages, ApiError> {
        self.record(RecordedCall::GetConversation(id.to_string()))?;
        self.conversations
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create_conversation(
        &self,
        request: &CreateConversationRequest,
    ) -> Result<Conversation, ApiError> {
        self.pause().await;
        self.record(RecordedCall::CreateConversation(request.clone()))?;

        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            format!("conv-{}", *next_id)
        };
        let now = Utc::now();
        let conversation = Conversation {
            id,
            title: request.title.clone(),
            system_prompt: request.system_prompt.clone(),
            operational_mode: Some(request.operational_mode),
            created_at: now,
            updated_at: now,
        };
        self.insert(ConversationWithMessages {
            conversation: conversation.clone(),
            messages: Vec::new(),
        });
        Ok(conversation)
    }

    async fn send_messages(
        &self,
        conversation_id: &str,
        request: &SendMessagesRequest,
    ) -> Result<(), ApiError> {
        self.pause().await;
        self.record(RecordedCall::SendMessages {
            conversation_id: conversation_id.to_string(),
            request: request.clone(),
        })
    }

    async fn update_operational_mode(
        &self,
        conversation_id: &str,
        mode: OperationalMode,
    ) -> Result<Conversation, ApiError> {
        self.record(RecordedCall::UpdateMode {
            conversation_id: conversation_id.to_string(),
            mode,
        })?;

        let mut conversations = self.conversations.lock().unwrap();
        let detail = conversations
            .get_mut(conversation_id)
            .ok_or_else(|| Self::not_found(conversation_id))?;
        detail.conversation.operational_mode = Some(mode);
        detail.conversation.updated_at = Utc::now();
        Ok(detail.conversation.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get() {
        let backend = MockBackend::new();
        let created = backend
            .create_conversation(&CreateConversationRequest::new("hello"))
            .await
            .unwrap();

        assert_eq!(created.id, "conv-1");
        assert_eq!(created.title, "Untitled");

        let detail = backend.get_conversation("conv-1").await.unwrap();
        assert_eq!(detail.conversation.operational_mode, Some(OperationalMode::Auto));
        assert_eq!(backend.created().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_conversation_is_404() {
        let backend = MockBackend::new();
        let err = backend.get_conversation("nope").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_returned() {
        let backend = MockBackend::new();
        backend.set_fail_with(Some((503, "unavailable")));

        let request = SendMessagesRequest::new(vec![]);
        let err = backend.send_messages("c1", &request).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(backend.sent().len(), 1);

        backend.set_fail_with(None);
        assert!(backend.send_messages("c1", &request).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_mode() {
        let backend = MockBackend::new();
        let created = backend
            .create_conversation(&CreateConversationRequest::new("hi"))
            .await
            .unwrap();

        let updated = backend
            .update_operational_mode(&created.id, OperationalMode::Fast)
            .await
            .unwrap();
        assert_eq!(updated.operational_mode, Some(OperationalMode::Fast));
        assert_eq!(
            backend.calls().last(),
            Some(&RecordedCall::UpdateMode {
                conversation_id: created.id.clone(),
                mode: OperationalMode::Fast
            })
        );
    }
}
