//! Types describing a swipe run.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::LastMessageState;

/// Position in the last message's swipe list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeProgress {
    pub current_index: usize,
    pub total_count: usize,
}

impl SwipeProgress {
    /// Validates a raw host state. Missing fields and empty lists are rejected,
    /// never defaulted.
    pub fn from_state(state: Option<LastMessageState>) -> Result<Self, SwipeFailure> {
        let state = state.ok_or(SwipeFailure::EmptyChat)?;
        match (state.swipe_id, state.swipe_count) {
            (Some(_), Some(0)) => Err(SwipeFailure::EmptyChat),
            (Some(current_index), Some(total_count)) => Ok(Self {
                current_index,
                total_count,
            }),
            _ => Err(SwipeFailure::MalformedState),
        }
    }

    pub fn last_index(&self) -> usize {
        self.total_count.saturating_sub(1)
    }

    pub fn is_at_last(&self) -> bool {
        self.current_index >= self.last_index()
    }

    /// Triggers still needed to reach the last swipe.
    pub fn remaining(&self) -> usize {
        self.last_index().saturating_sub(self.current_index)
    }
}

/// Phases of the swipe state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SwipePhase {
    Idle,
    Seeking,
    Verifying,
    Forcing { attempt: u32 },
    Committing,
    Done,
    Failed,
}

/// Why a swipe run stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SwipeFailure {
    #[error("swipe control not found on the last message")]
    ControlMissing,
    #[error("chat has no message to swipe")]
    EmptyChat,
    #[error("last message has no swipe information")]
    MalformedState,
    #[error("host error: {0}")]
    Host(String),
}

impl SwipeFailure {
    /// Whether the failure is worth telling the user about directly.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::ControlMissing)
    }
}

/// Delays and budgets of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeTimings {
    /// Pause between consecutive triggers; the host drops clicks fired back to back.
    pub click_interval: Duration,
    /// Wait after a batch of triggers.
    pub settle_delay: Duration,
    /// Pause between verification reads.
    pub verify_delay: Duration,
    pub max_verify_attempts: u32,
}

impl Default for SwipeTimings {
    fn default() -> Self {
        Self {
            click_interval: Duration::from_millis(50),
            settle_delay: Duration::from_millis(150),
            verify_delay: Duration::from_millis(100),
            max_verify_attempts: 3,
        }
    }
}

/// What happened during one run, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeReport {
    pub phases: Vec<SwipePhase>,
    pub seek_triggers: usize,
    pub forced_triggers: usize,
    pub commit_triggers: usize,
    pub verify_attempts: u32,
    pub initial: Option<SwipeProgress>,
    /// Last reading taken before committing.
    pub last_seen: Option<SwipeProgress>,
    pub failure: Option<SwipeFailure>,
}

impl SwipeReport {
    pub(crate) fn new() -> Self {
        Self {
            phases: vec![SwipePhase::Idle],
            seek_triggers: 0,
            forced_triggers: 0,
            commit_triggers: 0,
            verify_attempts: 0,
            initial: None,
            last_seen: None,
            failure: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none() && self.phases.last() == Some(&SwipePhase::Done)
    }

    pub fn total_triggers(&self) -> usize {
        self.seek_triggers + self.forced_triggers + self.commit_triggers
    }

    pub fn was_forced(&self) -> bool {
        self.phases
            .iter()
            .any(|p| matches!(p, SwipePhase::Forcing { .. }))
    }
}
