//! Orchestration of user-triggered actions.

use std::sync::Arc;

use quill_core::command::{GUIDE_TOKEN, INPUT_TOKEN, TemplateVars, render};
use quill_core::error::Result;
use quill_core::host::{AlertLevel, ExecuteOptions, HostCapabilities};
use quill_core::swipe::{SwipeFailure, SwipeMachine};
use quill_core::{ActionKind, ActionSettings, InputSnapshot, OverrideSession, QuillConfig};
use tokio::sync::RwLock;

use super::context::ActionContext;
use super::outcome::ActionOutcome;

/// Message shown to the user when the swipe control cannot be found.
pub const SWIPE_CONTROL_MISSING_ALERT: &str =
    "Quill could not find the swipe button on the last message.";

/// Runs actions against the host.
///
/// Every run follows the same shape:
///
/// 1. capture the chat input
/// 2. switch to the action's preset/profile
/// 3. execute the rendered command (and the swipe machine for swipes)
/// 4. run the cleanup command, restore the configuration, restore the input
///
/// Step 4 happens on every path. Host failures are logged and recorded in the
/// [`ActionOutcome`]; only re-entering a running action is an `Err`.
pub struct ActionRunner {
    host: HostCapabilities,
    config: Arc<RwLock<QuillConfig>>,
}

impl ActionRunner {
    pub fn new(host: HostCapabilities, config: QuillConfig) -> Self {
        Self {
            host,
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Replaces the settings used by subsequent runs.
    pub async fn set_config(&self, config: QuillConfig) {
        *self.config.write().await = config;
    }

    pub async fn config(&self) -> QuillConfig {
        self.config.read().await.clone()
    }

    /// Runs `kind` on `ctx`.
    ///
    /// # Errors
    ///
    /// Returns `QuillError::ActionInFlight` when `kind` is already running on
    /// `ctx`. All host failures are reported through the outcome instead.
    pub async fn run(&self, kind: ActionKind, ctx: &ActionContext) -> Result<ActionOutcome> {
        let _guard = ctx.begin(kind)?;
        let config = self.config().await;
        let settings = config.actions.get(kind).clone();

        if !settings.has_command() && !kind.is_swipe() {
            tracing::debug!(target: "quill::action", %kind, "no command configured, skipping");
            return Ok(ActionOutcome::skipped(kind));
        }

        tracing::info!(target: "quill::action", %kind, "action started");

        let mut snapshot =
            InputSnapshot::capture(self.host.fields.as_ref(), config.input_field()).await;
        ctx.remember_input(snapshot.value());

        let mut session = OverrideSession::prepare(
            &self.host,
            settings.preset_name(),
            settings.profile_name(),
        )
        .await
        .with_settle_timeout(config.timings.settle_timeout());

        let mut outcome = ActionOutcome::new(kind);

        session.switch().await;
        self.run_body(kind, &settings, &config, snapshot.value(), &mut outcome)
            .await;
        self.run_cleanup(&settings, &mut outcome).await;
        session.restore().await;
        snapshot.restore(self.host.fields.as_ref()).await;

        tracing::info!(
            target: "quill::action",
            %kind,
            succeeded = outcome.succeeded(),
            errors = outcome.errors.len(),
            "action finished"
        );

        Ok(outcome)
    }

    /// Writes the input captured by the most recent action back into the
    /// chat input. Returns false when there is nothing to recover.
    pub async fn recover_input(&self, ctx: &ActionContext) -> bool {
        let Some(value) = ctx.last_input() else {
            return false;
        };
        let field = self.config.read().await.input_field();

        match self.host.fields.write_field(&field, &value).await {
            Ok(()) => {
                if let Err(e) = self.host.fields.notify_change(&field).await {
                    tracing::warn!(target: "quill::action", error = %e, "failed to notify input change");
                }
                true
            }
            Err(e) => {
                tracing::warn!(target: "quill::action", error = %e, "failed to recover input");
                false
            }
        }
    }

    async fn run_body(
        &self,
        kind: ActionKind,
        settings: &ActionSettings,
        config: &QuillConfig,
        input: Option<&str>,
        outcome: &mut ActionOutcome,
    ) {
        if settings.has_command() {
            let vars = TemplateVars::new()
                .with(INPUT_TOKEN, input.unwrap_or_default())
                .with(GUIDE_TOKEN, settings.guide.as_str());
            let command = render(&settings.command, &vars);
            let executed = self.execute(&command, config, outcome).await;
            outcome.command = Some(command);

            if !executed {
                if kind.is_swipe() {
                    tracing::warn!(target: "quill::action", "guide command failed, not swiping");
                }
                return;
            }
        }

        if kind.is_swipe() {
            let report =
                SwipeMachine::new(self.host.swipes.as_ref(), config.timings.swipe_timings())
                    .run()
                    .await;

            if let Some(failure) = &report.failure {
                if *failure == SwipeFailure::ControlMissing {
                    tracing::error!(target: "quill::action", %failure, "swipe aborted");
                    self.host
                        .notifier
                        .alert(AlertLevel::Error, SWIPE_CONTROL_MISSING_ALERT);
                }
                outcome.record_error(failure.to_string());
            }
            outcome.swipe = Some(report);
        }
    }

    async fn run_cleanup(&self, settings: &ActionSettings, outcome: &mut ActionOutcome) {
        let Some(cleanup) = settings
            .cleanup_command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        else {
            return;
        };

        let options = ExecuteOptions { show_output: false };
        match self.host.commands.execute_command(cleanup, options).await {
            Ok(result) if result.is_error => {
                let message = result.error_message.unwrap_or_default();
                tracing::warn!(target: "quill::action", command = cleanup, %message, "cleanup command reported an error");
                outcome.record_error(format!("cleanup failed: {message}"));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(target: "quill::action", command = cleanup, error = %e, "cleanup command failed");
                outcome.record_error(format!("cleanup failed: {e}"));
            }
        }
    }

    /// Executes `command`, recording the result. Returns false on failure.
    async fn execute(
        &self,
        command: &str,
        config: &QuillConfig,
        outcome: &mut ActionOutcome,
    ) -> bool {
        let options = ExecuteOptions {
            show_output: config.show_output,
        };

        match self.host.commands.execute_command(command, options).await {
            Ok(result) => {
                let ok = !result.is_error;
                if !ok {
                    let message = result.error_message.clone().unwrap_or_default();
                    tracing::warn!(target: "quill::action", %message, "command reported an error");
                    outcome.record_error(message);
                }
                outcome.result = Some(result);
                ok
            }
            Err(e) => {
                tracing::warn!(target: "quill::action", error = %e, "command execution failed");
                outcome.record_error(e.to_string());
                false
            }
        }
    }
}
