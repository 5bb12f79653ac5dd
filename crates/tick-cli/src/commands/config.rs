use std::env;

use tick_core::config::{normalize_base_url, API_BASE_ENV_VAR};
use tick_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::cli_config::{default_config_path, resolve_api_config, CliConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_api_base: Option<String>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init { api_base_url } => run_config_init(api_base_url.or(global_api_base)),
        ConfigCommands::Show => run_config_show(global_api_base),
    }
}

pub fn run_config_init(api_base_url: Option<String>) -> Result<(), CliError> {
    let mut config = CliConfig::load().map_err(CliError::Config)?;

    if let Some(url) = normalize_text_option(api_base_url) {
        let normalized = normalize_base_url(&url)?;
        config.api_base_url = Some(normalized);
    }

    let path = config.save().map_err(CliError::Config)?;
    println!("Wrote {}", path.display());
    match config.api_base_url.as_deref() {
        Some(url) => println!("API base URL: {url}"),
        None => println!("API base URL: (default)"),
    }
    Ok(())
}

pub fn run_config_show(global_api_base: Option<String>) -> Result<(), CliError> {
    let path = default_config_path().map_err(CliError::Config)?;
    let config = CliConfig::load_from_path(&path).map_err(CliError::Config)?;
    let resolved = resolve_api_config(global_api_base.clone(), &config)?;

    println!("Config file: {}", path.display());
    println!(
        "API base URL: {} (from {})",
        resolved.base_url(),
        describe_source(global_api_base.as_deref(), &config)
    );
    Ok(())
}

fn describe_source(flag: Option<&str>, config: &CliConfig) -> &'static str {
    let set = |value: Option<&str>| value.is_some_and(|value| !value.trim().is_empty());
    if set(flag) {
        "--api-base"
    } else if set(env::var(API_BASE_ENV_VAR).ok().as_deref()) {
        API_BASE_ENV_VAR
    } else if set(config.api_base_url.as_deref()) {
        "config file"
    } else {
        "default"
    }
}
