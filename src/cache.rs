use std::collections::HashMap;

use crate::models::{Conversation, ConversationWithMessages};

/// Local cache of backend conversation views.
///
/// Holds one detail view per conversation id and the conversation list.
/// Entries stay until invalidated; a missing entry means "fetch again".
#[derive(Debug, Default)]
pub struct ConversationCache {
    /// Detail views indexed by conversation id
    details: HashMap<String, ConversationWithMessages>,
    /// Conversation list as last fetched
    list: Option<Vec<Conversation>>,
}

impl ConversationCache {
    /// Create a new empty ConversationCache
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a detail view
    pub fn insert_detail(&mut self, detail: ConversationWithMessages) {
        self.details
            .insert(detail.conversation.id.clone(), detail);
    }

    /// Get a detail view by conversation id
    pub fn detail(&self, id: &str) -> Option<&ConversationWithMessages> {
        self.details.get(id)
    }

    pub fn set_list(&mut self, conversations: Vec<Conversation>) {
        self.list = Some(conversations);
    }

    /// The cached list, if one has been fetched since the last invalidation
    pub fn list(&self) -> Option<&[Conversation]> {
        self.list.as_deref()
    }

    /// Drop one conversation's detail view. Returns whether one was cached.
    pub fn invalidate_detail(&mut self, id: &str) -> bool {
        self.details.remove(id).is_some()
    }

    /// Drop every list view
    pub fn invalidate_lists(&mut self) {
        self.list = None;
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.details.clear();
        self.list = None;
    }
}
