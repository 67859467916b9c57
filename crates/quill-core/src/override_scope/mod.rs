//! Scoped configuration overrides.
//!
//! An [`OverrideSession`] switches the host to a named preset and/or profile
//! for the duration of a host operation and puts the previous configuration
//! back afterwards. Resolution of the names lives in [`resolver`].

pub mod resolver;
pub mod session;

pub use resolver::{match_name, resolve};
pub use session::{OverrideSession, DEFAULT_SETTLE_TIMEOUT};
