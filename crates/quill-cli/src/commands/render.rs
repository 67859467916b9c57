use anyhow::{Result, anyhow};
use colored::Colorize;
use quill_core::command::{GUIDE_TOKEN, INPUT_TOKEN, TemplateVars, render};
use quill_core::{ActionKind, QuillConfig};
use quill_infrastructure::ConfigService;
use serde_json::json;
use strum::IntoEnumIterator;

/// What an action would send to the host, without a host.
#[derive(Debug, PartialEq, Eq)]
pub struct RenderedAction {
    pub kind: ActionKind,
    pub command: Option<String>,
    pub cleanup: Option<String>,
    pub preset: Option<String>,
    pub profile: Option<String>,
}

pub fn run(service: &ConfigService, action: &str, input: &str, json: bool) -> Result<()> {
    let kind = parse_action(action)?;
    let rendered = render_action(&service.get_config()?, kind, input);

    if json {
        let value = json!({
            "action": rendered.kind.to_string(),
            "command": rendered.command,
            "cleanup": rendered.cleanup,
            "preset": rendered.preset,
            "profile": rendered.profile,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", format!("[{}]", rendered.kind).bold());
    match &rendered.command {
        Some(command) => println!("  command: {}", command.cyan()),
        None => println!("  command: {}", "(none, action is skipped)".dimmed()),
    }
    if let Some(cleanup) = &rendered.cleanup {
        println!("  cleanup: {}", cleanup.cyan());
    }
    if let Some(preset) = &rendered.preset {
        println!("  preset:  {preset}");
    }
    if let Some(profile) = &rendered.profile {
        println!("  profile: {profile}");
    }
    if kind.is_swipe() {
        println!("  then:    swipe to the latest reply and regenerate");
    }

    Ok(())
}

pub fn parse_action(action: &str) -> Result<ActionKind> {
    action.parse().map_err(|_| {
        let known: Vec<String> = ActionKind::iter().map(|k| k.to_string()).collect();
        anyhow!("Unknown action '{action}', expected one of: {}", known.join(", "))
    })
}

pub fn render_action(config: &QuillConfig, kind: ActionKind, input: &str) -> RenderedAction {
    let settings = config.actions.get(kind);
    let vars = TemplateVars::new()
        .with(INPUT_TOKEN, input)
        .with(GUIDE_TOKEN, settings.guide.as_str());

    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

    RenderedAction {
        kind,
        command: settings
            .has_command()
            .then(|| render(&settings.command, &vars)),
        cleanup: settings
            .cleanup_command
            .as_deref()
            .map(str::trim)
            .and_then(non_empty),
        preset: non_empty(settings.preset_name()),
        profile: settings.profile_name().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action_is_case_insensitive() {
        assert_eq!(parse_action("Swipe").unwrap(), ActionKind::Swipe);
        let err = parse_action("regenerate").unwrap_err().to_string();
        assert!(err.contains("impersonate, continue, respond, swipe"));
    }

    #[test]
    fn test_render_continue_with_preset() {
        let mut config = QuillConfig::default();
        config.actions.continue_.preset = " GGSytemPrompt ".to_string();

        let rendered = render_action(&config, ActionKind::Continue, "and then");

        assert_eq!(rendered.command.as_deref(), Some("/continue await=true and then"));
        assert_eq!(rendered.preset.as_deref(), Some("GGSytemPrompt"));
        assert_eq!(rendered.profile, None);
        assert_eq!(rendered.cleanup, None);
    }

    #[test]
    fn test_render_swipe_includes_cleanup() {
        let rendered = render_action(&QuillConfig::default(), ActionKind::Swipe, "rain");

        assert!(rendered.command.unwrap().ends_with("[ rain]"));
        assert_eq!(rendered.cleanup.as_deref(), Some("/flushinject quill_guide"));
    }

    #[test]
    fn test_render_empty_template() {
        let mut config = QuillConfig::default();
        config.actions.impersonate.command.clear();

        assert_eq!(render_action(&config, ActionKind::Impersonate, "x").command, None);
    }
}
