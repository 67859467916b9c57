//! Result of a single action run.

use quill_core::ActionKind;
use quill_core::host::CommandResult;
use quill_core::swipe::SwipeReport;
use serde::Serialize;

/// What an action did. Host failures end up in `errors` rather than as an
/// `Err`, because cleanup has already run by the time the caller sees them.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    /// True when the action had nothing to do (e.g. an empty template).
    pub skipped: bool,
    /// The rendered command sent to the host.
    pub command: Option<String>,
    pub result: Option<CommandResult>,
    pub swipe: Option<SwipeReport>,
    pub errors: Vec<String>,
}

impl ActionOutcome {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            skipped: false,
            command: None,
            result: None,
            swipe: None,
            errors: Vec::new(),
        }
    }

    pub fn skipped(kind: ActionKind) -> Self {
        Self {
            skipped: true,
            ..Self::new(kind)
        }
    }

    /// Whether every step the action attempted went through.
    pub fn succeeded(&self) -> bool {
        !self.skipped
            && self.errors.is_empty()
            && self.result.as_ref().is_none_or(|r| !r.is_error)
            && self.swipe.as_ref().is_none_or(SwipeReport::succeeded)
    }

    pub(crate) fn record_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }
}
