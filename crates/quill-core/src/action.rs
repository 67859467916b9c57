//! Actions a user can trigger from the host UI.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A user-triggered generation action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ActionKind {
    /// Write the user's next message from the input as guidance
    Impersonate,
    /// Continue the last message
    Continue,
    /// Generate a new character response
    Respond,
    /// Swipe the last message to a new generation
    Swipe,
}

impl ActionKind {
    /// Whether the action drives the swipe state machine.
    pub fn is_swipe(self) -> bool {
        matches!(self, Self::Swipe)
    }
}
