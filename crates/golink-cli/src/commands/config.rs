//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use golink_core::Config;

use crate::output::{Output, OutputFormat};

/// Show the effective configuration
pub fn show(config: &Config, config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "links_file": config.links_path(),
                    "host": config.host,
                    "port": config.port,
                    "log_level": config.log_level
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:  {}", config.data_dir.display());
            println!("  host:      {}", config.host);
            println!("  port:      {}", config.port);
            println!("  log_level: {}", config.log_level);
            println!();
            println!("Links file:  {}", config.links_path().display());
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "host" => {
            if value.is_empty() {
                bail!("host must not be empty");
            }
            config.host = value.to_string();
        }
        "port" => {
            config.port = value
                .parse()
                .context("Invalid value for port. Use a number between 1 and 65535.")?;
        }
        "log_level" => {
            config.log_level = value.to_string();
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, host, port, log_level",
                key
            );
        }
    }
    Ok(())
}
