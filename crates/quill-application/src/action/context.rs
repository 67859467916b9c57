//! Per-caller state shared by the actions a user triggers.

use std::collections::HashSet;
use std::sync::Mutex;

use quill_core::ActionKind;
use quill_core::error::{QuillError, Result};

/// State owned by the caller and passed to every action run.
///
/// Holds the in-flight set that prevents re-entering an action while it is
/// pending and the last captured chat input. Nothing here is global: two
/// contexts never observe each other.
#[derive(Debug, Default)]
pub struct ActionContext {
    in_flight: Mutex<HashSet<ActionKind>>,
    last_input: Mutex<Option<String>>,
}

impl ActionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `kind` as running until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns `QuillError::ActionInFlight` if `kind` is already running on
    /// this context.
    pub fn begin(&self, kind: ActionKind) -> Result<InFlightGuard<'_>> {
        let mut in_flight = self
            .in_flight
            .lock()
            .map_err(|e| QuillError::internal(format!("in-flight set poisoned: {e}")))?;

        if !in_flight.insert(kind) {
            return Err(QuillError::ActionInFlight(kind.to_string()));
        }

        Ok(InFlightGuard { context: self, kind })
    }

    pub fn is_running(&self, kind: ActionKind) -> bool {
        self.in_flight
            .lock()
            .map(|set| set.contains(&kind))
            .unwrap_or(false)
    }

    /// The chat input captured by the most recent action, if any.
    pub fn last_input(&self) -> Option<String> {
        self.last_input.lock().ok().and_then(|slot| slot.clone())
    }

    pub(crate) fn remember_input(&self, value: Option<&str>) {
        if let (Some(value), Ok(mut slot)) = (value, self.last_input.lock()) {
            *slot = Some(value.to_string());
        }
    }
}

/// Releases the in-flight mark on drop, whatever path the action took.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    context: &'a ActionContext,
    kind: ActionKind,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.context.in_flight.lock() {
            in_flight.remove(&self.kind);
        }
    }
}
