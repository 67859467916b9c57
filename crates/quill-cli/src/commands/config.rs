use anyhow::{Context, Result};
use colored::Colorize;
use quill_infrastructure::ConfigService;

pub fn path(service: &ConfigService) {
    println!("{}", service.config_path().display());
}

pub fn show(service: &ConfigService, json: bool) -> Result<()> {
    let config = service.get_config()?;

    let rendered = if json {
        serde_json::to_string_pretty(&config).context("Failed to serialize config as JSON")?
    } else {
        toml::to_string_pretty(&config).context("Failed to serialize config as TOML")?
    };
    println!("{rendered}");

    Ok(())
}

pub fn init(service: &ConfigService, force: bool) -> Result<()> {
    let path = service.config_path().display();

    if service.init(force)? {
        println!("{}", format!("Wrote default configuration to {path}").green());
    } else {
        println!(
            "{}",
            format!("{path} already exists, use --force to overwrite").yellow()
        );
    }

    Ok(())
}

pub fn validate(service: &ConfigService) -> Result<()> {
    let path = service.config_path().display();

    if !service.config_path().exists() {
        println!(
            "{}",
            format!("{path} does not exist, defaults are in effect").yellow()
        );
        return Ok(());
    }

    service
        .get_config()
        .with_context(|| format!("{path} is invalid"))?;
    println!("{}", format!("{path} is valid").green());

    Ok(())
}
