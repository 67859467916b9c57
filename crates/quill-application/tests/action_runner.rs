use std::sync::Arc;

use async_trait::async_trait;
use quill_application::{ActionContext, ActionRunner};
use quill_application::action::SWIPE_CONTROL_MISSING_ALERT;
use quill_core::error::{QuillError, Result};
use quill_core::host::{
    AlertLevel, CommandExecutor, CommandResult, ExecuteOptions, FieldRef, HostCapabilities,
    LastMessageState,
};
use quill_core::testing::{FakeFields, FakeHost};
use quill_core::{ActionKind, QuillConfig};

/// Overwrites the chat input the way a generation would, then fails.
struct OverwritingCommands {
    fields: Arc<FakeFields>,
}

#[async_trait]
impl CommandExecutor for OverwritingCommands {
    async fn execute_command(
        &self,
        _command: &str,
        _options: ExecuteOptions,
    ) -> Result<CommandResult> {
        self.fields.set(&FieldRef::chat_input(), "impersonated text");
        Err(QuillError::host("execute_command", "generation aborted"))
    }
}

fn config_with_preset(kind: ActionKind, preset: &str) -> QuillConfig {
    let mut config = QuillConfig::default();
    config.actions.get_mut(kind).preset = preset.to_string();
    config
}

#[tokio::test(start_paused = true)]
async fn test_continue_runs_under_preset_and_restores_everything() {
    let host = FakeHost::new();
    host.fields.set(&FieldRef::chat_input(), "hello");
    let runner = ActionRunner::new(
        host.capabilities(),
        config_with_preset(ActionKind::Continue, "GGSytemPrompt"),
    );
    let ctx = ActionContext::new();

    let outcome = runner.run(ActionKind::Continue, &ctx).await.unwrap();

    assert!(outcome.succeeded(), "errors: {:?}", outcome.errors);
    assert_eq!(host.commands.executed(), vec!["/continue await=true hello"]);
    assert_eq!(host.presets.selections(), vec!["GGSytemPrompt", "Default"]);
    assert_eq!(host.presets.current().as_deref(), Some("Default"));
    assert_eq!(host.fields.get(&FieldRef::chat_input()).as_deref(), Some("hello"));
    assert_eq!(ctx.last_input().as_deref(), Some("hello"));
}

#[tokio::test(start_paused = true)]
async fn test_failing_host_call_still_restores_input_and_preset() {
    let host = FakeHost::new();
    host.fields.set(&FieldRef::chat_input(), "hello");
    let caps = HostCapabilities {
        commands: Arc::new(OverwritingCommands {
            fields: host.fields.clone(),
        }),
        ..host.capabilities()
    };
    let runner = ActionRunner::new(caps, config_with_preset(ActionKind::Impersonate, "ggsytemprompt"));
    let ctx = ActionContext::new();

    let outcome = runner.run(ActionKind::Impersonate, &ctx).await.unwrap();

    assert!(!outcome.succeeded());
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(host.fields.get(&FieldRef::chat_input()).as_deref(), Some("hello"));
    assert_eq!(host.presets.current().as_deref(), Some("Default"));
}

#[tokio::test(start_paused = true)]
async fn test_swipe_injects_guide_swipes_and_cleans_up() {
    let host = FakeHost::new();
    host.fields.set(&FieldRef::chat_input(), "make it rain");
    let mut config = QuillConfig::default();
    config.actions.swipe.guide = "Weather:".to_string();
    let runner = ActionRunner::new(host.capabilities(), config);

    let outcome = runner.run(ActionKind::Swipe, &ActionContext::new()).await.unwrap();

    assert!(outcome.succeeded(), "errors: {:?}", outcome.errors);
    assert_eq!(
        host.commands.executed(),
        vec![
            "/inject id=quill_guide position=chat depth=0 role=system [Weather: make it rain]",
            "/flushinject quill_guide",
        ]
    );
    let report = outcome.swipe.unwrap();
    assert_eq!(report.seek_triggers, 2);
    assert_eq!(report.commit_triggers, 1);
    assert_eq!(host.swipes.state(), Some(LastMessageState::new(3, 4)));
}

#[tokio::test(start_paused = true)]
async fn test_swipe_without_control_alerts_and_still_cleans_up() {
    let host = FakeHost::new();
    *host.swipes.control_present.lock().unwrap() = false;
    let runner = ActionRunner::new(host.capabilities(), QuillConfig::default());

    let outcome = runner.run(ActionKind::Swipe, &ActionContext::new()).await.unwrap();

    assert!(!outcome.succeeded());
    assert_eq!(host.swipes.triggers(), 0);
    assert_eq!(
        host.notifier.alerts(),
        vec![(AlertLevel::Error, SWIPE_CONTROL_MISSING_ALERT.to_string())]
    );
    assert_eq!(host.commands.executed().last().map(String::as_str), Some("/flushinject quill_guide"));
}

#[tokio::test(start_paused = true)]
async fn test_failed_guide_command_skips_swipe_but_runs_cleanup() {
    let host = FakeHost::new();
    host.commands.set_fail(true);
    let runner = ActionRunner::new(host.capabilities(), QuillConfig::default());

    let outcome = runner.run(ActionKind::Swipe, &ActionContext::new()).await.unwrap();

    assert!(outcome.swipe.is_none());
    assert_eq!(host.swipes.triggers(), 0);
    assert_eq!(host.commands.executed().len(), 2);
    assert_eq!(outcome.errors.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_same_action_cannot_reenter_while_pending() {
    let host = FakeHost::new();
    let runner = ActionRunner::new(host.capabilities(), QuillConfig::default());
    let ctx = ActionContext::new();

    let (first, second) = tokio::join!(
        runner.run(ActionKind::Swipe, &ctx),
        runner.run(ActionKind::Swipe, &ctx)
    );

    let results = [first, second];
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.is_in_flight()))
        .count();
    assert_eq!(rejected, 1);
    assert!(results.iter().any(|r| matches!(r, Ok(o) if o.succeeded())));
    assert_eq!(host.swipes.triggers(), 3);
    assert!(!ctx.is_running(ActionKind::Swipe));

    // The guard is released once the first run finishes.
    assert!(runner.run(ActionKind::Swipe, &ctx).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_guard_released_after_failed_run() {
    let host = FakeHost::new();
    host.commands.set_fail(true);
    let runner = ActionRunner::new(host.capabilities(), QuillConfig::default());
    let ctx = ActionContext::new();

    let first = runner.run(ActionKind::Respond, &ctx).await.unwrap();
    let second = runner.run(ActionKind::Respond, &ctx).await.unwrap();

    assert!(!first.succeeded());
    assert!(!second.succeeded());
    // Command and cleanup for each run.
    assert_eq!(host.commands.executed().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_failed_respond_still_flushes_guide_injection() {
    let host = FakeHost::new();
    host.fields.set(&FieldRef::chat_input(), "be brief");
    host.commands.set_fail(true);
    let runner = ActionRunner::new(host.capabilities(), QuillConfig::default());

    let outcome = runner.run(ActionKind::Respond, &ActionContext::new()).await.unwrap();

    assert!(!outcome.succeeded());
    assert_eq!(
        host.commands.executed(),
        vec![
            "/inject id=quill_guide position=chat depth=0 role=system [ be brief] | /trigger await=true",
            "/flushinject quill_guide",
        ]
    );
    assert_eq!(host.fields.get(&FieldRef::chat_input()).as_deref(), Some("be brief"));
}

#[tokio::test(start_paused = true)]
async fn test_empty_template_skips_action() {
    let host = FakeHost::new();
    let mut config = QuillConfig::default();
    config.actions.impersonate.command = "  ".to_string();
    let runner = ActionRunner::new(host.capabilities(), config);

    let outcome = runner.run(ActionKind::Impersonate, &ActionContext::new()).await.unwrap();

    assert!(outcome.skipped);
    assert!(host.commands.executed().is_empty());
    assert!(host.fields.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_interpreter_error_result_is_recorded() {
    let host = FakeHost::new();
    host.commands.set_response(CommandResult::failed("Unknown command /trigger"));
    let runner = ActionRunner::new(host.capabilities(), QuillConfig::default());

    let outcome = runner.run(ActionKind::Respond, &ActionContext::new()).await.unwrap();

    assert!(!outcome.succeeded());
    assert_eq!(
        outcome.errors,
        vec![
            "Unknown command /trigger".to_string(),
            "cleanup failed: Unknown command /trigger".to_string(),
        ]
    );
    assert!(outcome.result.unwrap().is_error);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_host_does_not_fail_the_run() {
    let host = FakeHost::new();
    host.commands.set_fail(true);
    *host.fields.fail.lock().unwrap() = true;
    *host.presets.fail_listing.lock().unwrap() = true;
    let runner = ActionRunner::new(
        host.capabilities(),
        config_with_preset(ActionKind::Continue, "GGSytemPrompt"),
    );

    let outcome = runner.run(ActionKind::Continue, &ActionContext::new()).await.unwrap();

    assert_eq!(outcome.command.as_deref(), Some("/continue await=true "));
    assert!(host.presets.selections().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_recover_input_writes_last_capture_back() {
    let host = FakeHost::new();
    host.fields.set(&FieldRef::chat_input(), "my draft");
    let runner = ActionRunner::new(host.capabilities(), QuillConfig::default());
    let ctx = ActionContext::new();

    assert!(!runner.recover_input(&ctx).await);

    runner.run(ActionKind::Continue, &ctx).await.unwrap();
    host.fields.set(&FieldRef::chat_input(), "");

    assert!(runner.recover_input(&ctx).await);
    assert_eq!(host.fields.get(&FieldRef::chat_input()).as_deref(), Some("my draft"));
}

#[tokio::test(start_paused = true)]
async fn test_profile_and_preset_override_for_respond() {
    let host = FakeHost::new();
    let mut config = QuillConfig::default();
    config.actions.respond.preset = "GGSytemPrompt".to_string();
    config.actions.respond.profile = "Summarizer".to_string();
    let runner = ActionRunner::new(host.capabilities(), config);

    runner.run(ActionKind::Respond, &ActionContext::new()).await.unwrap();

    assert_eq!(host.profiles.selections(), vec!["Summarizer", "Main"]);
    assert_eq!(host.presets.selections(), vec!["GGSytemPrompt", "Default"]);
}

#[tokio::test(start_paused = true)]
async fn test_swipe_with_zero_verify_budget_generates_once() {
    let host = FakeHost::new();
    let mut config = QuillConfig::default();
    config.timings.max_verify_attempts = 0;
    config.actions.swipe.command.clear();
    config.actions.swipe.cleanup_command = None;
    let runner = ActionRunner::new(host.capabilities(), config);

    let outcome = runner.run(ActionKind::Swipe, &ActionContext::new()).await.unwrap();

    assert!(outcome.succeeded(), "errors: {:?}", outcome.errors);
    let report = outcome.swipe.unwrap();
    assert_eq!(report.seek_triggers, 2);
    assert_eq!(report.forced_triggers, 0);
    assert_eq!(host.swipes.state(), Some(LastMessageState::new(3, 4)));
    assert!(host.commands.executed().is_empty());
}
