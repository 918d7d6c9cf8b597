use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inference behaviour profile a conversation runs under.
///
/// `Auto` means "no override, let the server decide"; `Fast` and `Thinking`
/// are explicit user overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationalMode {
    Fast,
    Thinking,
    /// Server decides (default)
    #[default]
    Auto,
}

impl OperationalMode {
    /// All modes in the order the selector lists them.
    pub const ALL: [OperationalMode; 3] = [
        OperationalMode::Fast,
        OperationalMode::Thinking,
        OperationalMode::Auto,
    ];

    /// Wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationalMode::Fast => "fast",
            OperationalMode::Thinking => "thinking",
            OperationalMode::Auto => "auto",
        }
    }

    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            OperationalMode::Fast => "Fast",
            OperationalMode::Thinking => "Thinking",
            OperationalMode::Auto => "Auto",
        }
    }

    /// One-line description shown in the selector.
    pub fn description(&self) -> &'static str {
        match self {
            OperationalMode::Fast => "Quick & concise",
            OperationalMode::Thinking => "Detailed & comprehensive",
            OperationalMode::Auto => "AI decides",
        }
    }

    /// The override to transmit with an outgoing message.
    ///
    /// Returns `None` for `Auto`, which must never reach the wire.
    pub fn as_override(&self) -> Option<ModeOverride> {
        match self {
            OperationalMode::Fast => Some(ModeOverride::Fast),
            OperationalMode::Thinking => Some(ModeOverride::Thinking),
            OperationalMode::Auto => None,
        }
    }
}

impl fmt::Display for OperationalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text is not one of `fast`, `thinking`, `auto`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid operational mode: {0:?}")]
pub struct ParseModeError(pub String);

impl FromStr for OperationalMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fast" => Ok(OperationalMode::Fast),
            "thinking" => Ok(OperationalMode::Thinking),
            "auto" => Ok(OperationalMode::Auto),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// An explicit mode override. There is deliberately no `Auto` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeOverride {
    Fast,
    Thinking,
}

impl From<ModeOverride> for OperationalMode {
    fn from(value: ModeOverride) -> Self {
        match value {
            ModeOverride::Fast => OperationalMode::Fast,
            ModeOverride::Thinking => OperationalMode::Thinking,
        }
    }
}
