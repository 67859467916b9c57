//! Core building blocks of Quill.
//!
//! Quill drives a chat host through its command interpreter. The host owns
//! generation, chat state and persistence; this crate owns the pieces with
//! real failure-handling contracts:
//!
//! - [`override_scope`]: run host operations under a temporary preset/profile
//!   and always put the previous one back
//! - [`snapshot`]: the same guarantee for a single text field
//! - [`swipe`]: the bounded-retry state machine behind "swipe to latest and
//!   regenerate"
//! - [`settle`]: waiting for an event or a timeout, whichever comes first
//!
//! Host access goes exclusively through the traits in [`host`].

pub mod action;
pub mod command;
pub mod config;
pub mod error;
pub mod host;
pub mod override_scope;
pub mod settle;
pub mod snapshot;
pub mod swipe;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use action::ActionKind;
pub use config::{ActionSettings, QuillConfig};
pub use error::QuillError;
pub use host::HostCapabilities;
pub use override_scope::OverrideSession;
pub use snapshot::InputSnapshot;
pub use swipe::{SwipeMachine, SwipeReport};
