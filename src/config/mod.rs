pub mod types;

use anyhow::{Context, Result};
use config::{Config, File};
use std::path::Path;
pub use types::*;

/// Values that take precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub mode: TransportMode,
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

/// Load configuration from built-in defaults, an optional TOML file and overrides
pub fn load_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<AppConfig> {
    let mut builder = Config::builder()
        .set_default("http.host", "0.0.0.0")?
        .set_default("http.port", 3000i64)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "pretty")?;

    if let Some(path) = path {
        builder = builder.add_source(File::from(path));
    }

    let config = builder
        .set_override_option("tandoor.api_url", overrides.api_url)?
        .set_override_option("tandoor.api_token", overrides.api_token)?
        .set_override_option("http.port", overrides.port.map(i64::from))?
        .set_override_option("logging.level", overrides.log_level)?
        .set_override_option("logging.format", overrides.log_format)?
        .build()
        .with_context(|| match path {
            Some(path) => format!("Failed to load config from: {}", path.display()),
            None => "Failed to build configuration".to_string(),
        })?;

    let mut app_config: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;
    app_config.mode = overrides.mode;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate the loaded configuration
fn validate_config(config: &AppConfig) -> Result<()> {
    let api_url = config.tandoor.api_url.as_deref().unwrap_or_default().trim();
    let api_token = config
        .tandoor
        .api_token
        .as_deref()
        .unwrap_or_default()
        .trim();
    if api_url.is_empty() || api_token.is_empty() {
        anyhow::bail!("TANDOOR_API_URL and TANDOOR_API_TOKEN environment variables must be set");
    }

    let url = reqwest::Url::parse(api_url)
        .with_context(|| format!("Invalid TANDOOR_API_URL '{}'", api_url))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!(
            "Invalid TANDOOR_API_URL '{}': scheme must be http or https",
            api_url
        );
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        anyhow::bail!(
            "Invalid log level '{}'. Valid levels: {}",
            config.logging.level,
            valid_levels.join(", ")
        );
    }

    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        anyhow::bail!(
            "Invalid log format '{}'. Valid formats: {}",
            config.logging.format,
            valid_formats.join(", ")
        );
    }

    Ok(())
}
