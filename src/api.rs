//! HTTP client for the chat backend.
//!
//! Thin request/response wrapper: every call maps to one endpoint, non-2xx
//! statuses become [`ApiError::ServerError`], and bodies are camelCase JSON.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, DEFAULT_API_URL};
use crate::models::{
    Conversation, ConversationWithMessages, CreateConversationRequest, OperationalMode,
    SendMessagesRequest, UpdateModeRequest,
};
use crate::traits::ChatBackend;

/// Error type for backend client operations
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// JSON deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Server returned an error status
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },
    /// Base URL or path segment could not form a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ServerError { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ApiError::ServerError { status, .. } => *status >= 500 || *status == 429,
            ApiError::Json(_) | ApiError::InvalidUrl(_) => false,
        }
    }
}

/// Client for the chat backend REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base URL, e.g. `http://localhost:3000/api`
    pub base_url: String,
    /// Reusable HTTP client
    client: Client,
    /// Optional bearer token
    auth_token: Option<String>,
}

impl ApiClient {
    /// Create a client from configuration.
    pub fn new(config: &ClientConfig) -> Self {
        let client = Self::with_base_url(config.api_base_url.clone());
        match &config.auth_token {
            Some(token) => client.with_auth(token),
            None => client,
        }
    }

    /// Create a client with a custom base URL.
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            auth_token: None,
        }
    }

    /// Set the authentication token for Bearer auth.
    pub fn with_auth(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    /// Set the authentication token on an existing client.
    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.auth_token = token;
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Helper to add auth header to a request builder if token is set.
    fn add_auth_header(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref token) = self.auth_token {
            builder.header("Authorization", format!("Bearer {}", token))
        } else {
            builder
        }
    }

    /// Build an endpoint URL from path segments. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ApiError::InvalidUrl(format!(
                "empty path segment in {:?}",
                segments
            )));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{}: cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::warn!(status, message = %message, "Backend returned error status");
        Err(ApiError::ServerError { status, message })
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// GET /chat/conversations
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let url = self.endpoint(&["chat", "conversations"])?;
        tracing::debug!(url = %url, "Listing conversations");

        let response = self.add_auth_header(self.client.get(url)).send().await?;
        Self::parse_json(Self::check_status(response).await?).await
    }

    /// GET /chat/conversations/{id}
    pub async fn get_conversation(&self, id: &str) -> Result<ConversationWithMessages, ApiError> {
        let url = self.endpoint(&["chat", "conversations", id])?;
        tracing::debug!(url = %url, "Fetching conversation");

        let response = self.add_auth_header(self.client.get(url)).send().await?;
        Self::parse_json(Self::check_status(response).await?).await
    }

    /// POST /chat/conversations
    pub async fn create_conversation(
        &self,
        request: &CreateConversationRequest,
    ) -> Result<Conversation, ApiError> {
        let url = self.endpoint(&["chat", "conversations"])?;

        let response = self
            .add_auth_header(self.client.post(url))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;
        Self::parse_json(Self::check_status(response).await?).await
    }

    /// POST /chat/conversations/{id}/messages
    ///
    /// The response body (the assistant's streamed reply) is not consumed.
    pub async fn send_messages(
        &self,
        conversation_id: &str,
        request: &SendMessagesRequest,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["chat", "conversations", conversation_id, "messages"])?;
        tracing::debug!(
            url = %url,
            messages = request.messages.len(),
            mode_override = ?request.mode_override,
            "Sending messages"
        );

        let response = self
            .add_auth_header(self.client.post(url))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// PATCH /chat/conversations/{id}/mode
    pub async fn update_operational_mode(
        &self,
        conversation_id: &str,
        mode: OperationalMode,
    ) -> Result<Conversation, ApiError> {
        let url = self.endpoint(&["chat", "conversations", conversation_id, "mode"])?;
        let body = UpdateModeRequest {
            operational_mode: mode,
        };

        let response = self
            .add_auth_header(self.client.patch(url))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;
        Self::parse_json(Self::check_status(response).await?).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_API_URL.to_string())
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        ApiClient::list_conversations(self).await
    }

    async fn get_conversation(&self, id: &str) -> Result<ConversationWithMessages, ApiError> {
        ApiClient::get_conversation(self, id).await
    }

    async fn create_conversation(
        &self,
        request: &CreateConversationRequest,
    ) -> Result<Conversation, ApiError> {
        ApiClient::create_conversation(self, request).await
    }

    async fn send_messages(
        &self,
        conversation_id: &str,
        request: &SendMessagesRequest,
    ) -> Result<(), ApiError> {
        ApiClient::send_messages(self, conversation_id, request).await
    }

    async fn update_operational_mode(
        &self,
        conversation_id: &str,
        mode: OperationalMode,
    ) -> Result<Conversation, ApiError> {
        ApiClient::update_operational_mode(self, conversation_id, mode).await
    }
}
