pub mod action;

pub use action::{ActionContext, ActionOutcome, ActionRunner};
