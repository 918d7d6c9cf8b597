use super::{ModeCache, ModeKeyScope};
use crate::models::{ModeOverride, OperationalMode};

/// Effective operational mode for the conversation on screen.
///
/// Precedence, per conversation: a stored preference always wins; otherwise
/// the server's last-known mode is adopted and stored (once); otherwise the
/// current value is kept. A conversation that does not exist yet is auto.
///
/// In [`ModeKeyScope::Global`] the stored device-wide preference (or auto)
/// applies to every conversation and the server value is never consulted.
#[derive(Debug, Clone)]
pub struct ModeResolver {
    cache: ModeCache,
    conversation_id: Option<String>,
    current: OperationalMode,
}

impl ModeResolver {
    pub fn new(cache: ModeCache) -> Self {
        let mut resolver = Self {
            cache,
            conversation_id: None,
            current: OperationalMode::Auto,
        };
        if resolver.is_global() {
            resolver.current = resolver.cache.get(None).unwrap_or_default();
        }
        resolver
    }

    pub fn current(&self) -> OperationalMode {
        self.current
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Override to attach to an outgoing message; `None` for auto.
    pub fn mode_override(&self) -> Option<ModeOverride> {
        self.current.as_override()
    }

    /// Re-resolve after the displayed conversation changed.
    pub fn on_conversation_changed(
        &mut self,
        conversation_id: Option<&str>,
        server_mode: Option<OperationalMode>,
    ) -> OperationalMode {
        self.conversation_id = conversation_id
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        if self.is_global() {
            self.current = self.cache.get(None).unwrap_or_default();
            return self.current;
        }

        if self.conversation_id.is_none() {
            tracing::debug!("No conversation yet, mode is auto");
            self.current = OperationalMode::Auto;
            return self.current;
        }

        if let Some(cached) = self.cache.get(self.conversation_id()) {
            tracing::debug!(
                conversation_id = ?self.conversation_id,
                mode = %cached,
                "Using stored mode preference"
            );
            self.current = cached;
            return self.current;
        }

        self.adopt_server_mode(server_mode);
        self.current
    }

    /// Server reported a mode for the current conversation after load.
    ///
    /// Adopted only while no local preference exists.
    pub fn on_server_mode(&mut self, server_mode: Option<OperationalMode>) -> OperationalMode {
        if self.is_global() || self.conversation_id.is_none() {
            return self.current;
        }

        if self.cache.contains(self.conversation_id()) {
            return self.current;
        }

        self.adopt_server_mode(server_mode);
        self.current
    }

    /// Explicit user selection. Persisted when there is something to key on.
    pub fn select(&mut self, mode: OperationalMode) {
        self.current = mode;
        self.cache.set(self.conversation_id(), mode);
    }

    /// A conversation was just created; keep the mode chosen before it existed.
    pub fn carry_over_to(&mut self, conversation_id: &str) {
        self.conversation_id = Some(conversation_id.to_string()).filter(|id| !id.is_empty());
        if !self.is_global() {
            self.cache.set(self.conversation_id(), self.current);
        }
    }

    fn adopt_server_mode(&mut self, server_mode: Option<OperationalMode>) {
        let Some(server_mode) = server_mode else {
            return;
        };

        tracing::debug!(
            conversation_id = ?self.conversation_id,
            mode = %server_mode,
            "Seeding mode preference from server"
        );
        self.current = server_mode;
        self.cache.set(self.conversation_id(), server_mode);
    }

    fn is_global(&self) -> bool {
        self.cache.scope() == ModeKeyScope::Global
    }
}
