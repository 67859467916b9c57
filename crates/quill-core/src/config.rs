//! Extension settings model.
//!
//! Every field has a default so a partial or missing settings file still
//! yields a usable configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::action::ActionKind;
use crate::error::{QuillError, Result};
use crate::host::FieldRef;
use crate::swipe::SwipeTimings;

/// Injection id used by the default templates.
pub const GUIDE_INJECTION_ID: &str = "quill_guide";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct QuillConfig {
    /// Show command output in the host UI.
    pub show_output: bool,
    /// Host id of the text field captured and restored around actions.
    pub input_field: String,
    pub actions: ActionsConfig,
    pub timings: TimingConfig,
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            show_output: false,
            input_field: FieldRef::chat_input().0,
            actions: ActionsConfig::default(),
            timings: TimingConfig::default(),
        }
    }
}

impl QuillConfig {
    pub fn input_field(&self) -> FieldRef {
        FieldRef::new(self.input_field.clone())
    }

    /// Checks values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `QuillError::Config` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.input_field.trim().is_empty() {
            return Err(QuillError::config("input_field cannot be empty"));
        }
        if self.timings.max_verify_attempts == 0 {
            return Err(QuillError::config(
                "timings.max_verify_attempts must be at least 1",
            ));
        }
        for kind in ActionKind::iter() {
            self.actions.get(kind).validate(kind)?;
        }
        Ok(())
    }
}

/// Per-action settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ActionsConfig {
    pub impersonate: ActionSettings,
    #[serde(rename = "continue")]
    pub continue_: ActionSettings,
    pub respond: ActionSettings,
    pub swipe: ActionSettings,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            impersonate: ActionSettings::with_command("/impersonate await=true {{input}}"),
            continue_: ActionSettings::with_command("/continue await=true {{input}}"),
            respond: ActionSettings::with_command(format!(
                "/inject id={GUIDE_INJECTION_ID} position=chat depth=0 role=system [{{{{guide}}}} {{{{input}}}}] | /trigger await=true"
            ))
            .cleanup(format!("/flushinject {GUIDE_INJECTION_ID}")),
            swipe: ActionSettings::with_command(format!(
                "/inject id={GUIDE_INJECTION_ID} position=chat depth=0 role=system [{{{{guide}}}} {{{{input}}}}]"
            ))
            .cleanup(format!("/flushinject {GUIDE_INJECTION_ID}")),
        }
    }
}

impl ActionsConfig {
    pub fn get(&self, kind: ActionKind) -> &ActionSettings {
        match kind {
            ActionKind::Impersonate => &self.impersonate,
            ActionKind::Continue => &self.continue_,
            ActionKind::Respond => &self.respond,
            ActionKind::Swipe => &self.swipe,
        }
    }

    pub fn get_mut(&mut self, kind: ActionKind) -> &mut ActionSettings {
        match kind {
            ActionKind::Impersonate => &mut self.impersonate,
            ActionKind::Continue => &mut self.continue_,
            ActionKind::Respond => &mut self.respond,
            ActionKind::Swipe => &mut self.swipe,
        }
    }
}

/// Settings of a single action.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ActionSettings {
    /// Command template; `{{input}}` and `{{guide}}` are substituted.
    /// Empty disables the command.
    pub command: String,
    /// Runs after the action body on every path (e.g. removing an injection).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_command: Option<String>,
    /// Preset to switch to while the action runs; empty for none.
    pub preset: String,
    /// Connection profile to switch to while the action runs; empty for none.
    pub profile: String,
    /// Extra guidance substituted for `{{guide}}`.
    pub guide: String,
}

impl ActionSettings {
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn cleanup(mut self, command: impl Into<String>) -> Self {
        self.cleanup_command = Some(command.into());
        self
    }

    pub fn preset_name(&self) -> &str {
        self.preset.trim()
    }

    pub fn profile_name(&self) -> Option<&str> {
        let profile = self.profile.trim();
        (!profile.is_empty()).then_some(profile)
    }

    pub fn has_command(&self) -> bool {
        !self.command.trim().is_empty()
    }

    fn validate(&self, kind: ActionKind) -> Result<()> {
        let commands = std::iter::once(self.command.as_str())
            .chain(self.cleanup_command.as_deref());
        for command in commands {
            let command = command.trim();
            if !command.is_empty() && !command.starts_with('/') {
                return Err(QuillError::config(format!(
                    "actions.{kind}: command '{command}' must start with '/'"
                )));
            }
        }
        Ok(())
    }
}

/// Delays used when driving the host.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    /// Upper bound on waiting for a preset/profile change event.
    pub settle_timeout_ms: u64,
    pub click_interval_ms: u64,
    pub swipe_settle_ms: u64,
    pub verify_delay_ms: u64,
    pub max_verify_attempts: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let swipe = SwipeTimings::default();
        Self {
            settle_timeout_ms: crate::override_scope::DEFAULT_SETTLE_TIMEOUT.as_millis() as u64,
            click_interval_ms: swipe.click_interval.as_millis() as u64,
            swipe_settle_ms: swipe.settle_delay.as_millis() as u64,
            verify_delay_ms: swipe.verify_delay.as_millis() as u64,
            max_verify_attempts: swipe.max_verify_attempts,
        }
    }
}

impl TimingConfig {
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }

    pub fn swipe_timings(&self) -> SwipeTimings {
        SwipeTimings {
            click_interval: Duration::from_millis(self.click_interval_ms),
            settle_delay: Duration::from_millis(self.swipe_settle_ms),
            verify_delay: Duration::from_millis(self.verify_delay_ms),
            max_verify_attempts: self.max_verify_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(QuillConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_templates_use_tokens() {
        let actions = ActionsConfig::default();
        assert!(actions.respond.command.contains("{{guide}} {{input}}"));
        // The injection is flushed by the cleanup command, which also runs
        // when the generation fails.
        assert!(!actions.respond.command.contains("/flushinject"));
        for settings in [&actions.respond, &actions.swipe] {
            assert_eq!(
                settings.cleanup_command.as_deref(),
                Some("/flushinject quill_guide")
            );
        }
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: QuillConfig = toml::from_str(
            r#"
            show_output = true

            [actions.continue]
            command = "/continue"
            preset = "GGSytemPrompt"

            [timings]
            click_interval_ms = 80
            "#,
        )
        .unwrap();

        assert!(config.show_output);
        assert_eq!(config.actions.continue_.command, "/continue");
        assert_eq!(config.actions.continue_.preset_name(), "GGSytemPrompt");
        assert_eq!(config.actions.continue_.profile_name(), None);
        assert_eq!(config.actions.impersonate, ActionsConfig::default().impersonate);
        assert_eq!(config.timings.click_interval_ms, 80);
        assert_eq!(config.timings.max_verify_attempts, 3);
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = QuillConfig::default();
        config.timings.max_verify_attempts = 0;
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_validate_rejects_non_slash_command() {
        let mut config = QuillConfig::default();
        config.actions.get_mut(ActionKind::Swipe).cleanup_command = Some("flush".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("actions.swipe"));
    }

    #[test]
    fn test_swipe_timings_conversion() {
        let timings = TimingConfig::default().swipe_timings();
        assert_eq!(timings, SwipeTimings::default());
    }
}
