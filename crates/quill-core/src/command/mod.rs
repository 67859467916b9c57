//! Command string composition.
//!
//! Quill never interprets the commands it builds; it only fills templates and
//! hands the result to the host's interpreter.

pub mod template;

pub use template::{TemplateVars, render};

/// Token replaced with the captured chat input.
pub const INPUT_TOKEN: &str = "input";

/// Token replaced with the action's configured guide text.
pub const GUIDE_TOKEN: &str = "guide";
