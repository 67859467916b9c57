//! Value types exchanged with the host.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Options for a single command execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteOptions {
    /// Whether the host should display the command's output to the user.
    pub show_output: bool,
}

/// Result of running a command string through the host interpreter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Value left in the interpreter pipe after the last command.
    #[serde(default)]
    pub pipe: Option<String>,
    /// Whether the interpreter flagged the run as failed.
    #[serde(default)]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl CommandResult {
    pub fn ok(pipe: impl Into<String>) -> Self {
        Self {
            pipe: Some(pipe.into()),
            is_error: false,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            pipe: None,
            is_error: true,
            error_message: Some(message.into()),
        }
    }
}

/// Which kind of named configuration a catalog serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConfigurationKind {
    /// Generation preset
    Preset,
    /// Connection profile
    Profile,
}

/// A configuration name resolved against the host's current catalog.
///
/// `name` is the host's own spelling, which may differ in case from what the
/// user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationHandle {
    pub kind: ConfigurationKind,
    pub name: String,
}

/// Raw swipe state of the last chat message as reported by the host.
///
/// Fields are optional because the host may hand back a message without swipe
/// bookkeeping; such a state is malformed and never defaulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMessageState {
    pub swipe_id: Option<usize>,
    pub swipe_count: Option<usize>,
}

impl LastMessageState {
    pub fn new(swipe_id: usize, swipe_count: usize) -> Self {
        Self {
            swipe_id: Some(swipe_id),
            swipe_count: Some(swipe_count),
        }
    }
}

/// Opaque reference to the host's advance (swipe-right) control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlHandle(pub String);

/// Identifies a text field in the host page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef(pub String);

impl FieldRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The host's main chat input.
    pub fn chat_input() -> Self {
        Self::new("send_textarea")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FieldRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Severity of a message surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
}
