//! Chat backend trait abstraction.
//!
//! [`ApiClient`](crate::api::ApiClient) is the production implementation;
//! [`MockBackend`](crate::adapters::mock::MockBackend) records calls for tests.

use async_trait::async_trait;

use crate::api::ApiError;
use crate::models::{
    Conversation, ConversationWithMessages, CreateConversationRequest, OperationalMode,
    SendMessagesRequest,
};

/// Trait for the conversation backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// List conversations, most recent first as the backend orders them.
    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError>;

    /// Fetch one conversation with its messages.
    async fn get_conversation(&self, id: &str) -> Result<ConversationWithMessages, ApiError>;

    /// Create a conversation from its first message.
    async fn create_conversation(
        &self,
        request: &CreateConversationRequest,
    ) -> Result<Conversation, ApiError>;

    /// Post the transcript plus the new user message.
    async fn send_messages(
        &self,
        conversation_id: &str,
        request: &SendMessagesRequest,
    ) -> Result<(), ApiError>;

    /// Record the operational mode on the conversation.
    async fn update_operational_mode(
        &self,
        conversation_id: &str,
        mode: OperationalMode,
    ) -> Result<Conversation, ApiError>;
}
