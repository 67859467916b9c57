//! User-triggered actions: impersonate, continue, respond and swipe.

pub mod context;
pub mod outcome;
pub mod runner;

pub use context::{ActionContext, InFlightGuard};
pub use outcome::ActionOutcome;
pub use runner::{ActionRunner, SWIPE_CONTROL_MISSING_ALERT};
