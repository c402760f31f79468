use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Persisted CLI settings (`env.json` in the config directory)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub server_url: Option<String>,
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("TRACKER_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("tracker").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_environment_config() -> anyhow::Result<EnvironmentConfig> {
    load_from(&get_config_dir()?.join("env.json"))
}

pub fn save_environment_config(config: &EnvironmentConfig) -> anyhow::Result<()> {
    save_to(&get_config_dir()?.join("env.json"), config)
}

fn load_from(env_file: &PathBuf) -> anyhow::Result<EnvironmentConfig> {
    if !env_file.exists() {
        return Ok(EnvironmentConfig::default());
    }

    let content = fs::read_to_string(env_file)?;
    let config: EnvironmentConfig = serde_json::from_str(&content)?;
    Ok(config)
}

fn save_to(env_file: &PathBuf, config: &EnvironmentConfig) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(env_file, content)?;
    Ok(())
}

/// Where the CLI should talk to: `--server`, then `TRACKER_SERVER_URL`, then the
/// saved config, then the local default.
pub fn resolve_server_url(flag: Option<String>) -> anyhow::Result<String> {
    if let Some(url) = flag {
        return Ok(url);
    }
    if let Ok(url) = std::env::var("TRACKER_SERVER_URL") {
        if !url.is_empty() {
            return Ok(url);
        }
    }
    Ok(load_environment_config()?
        .server_url
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()))
}

/// Accept only absolute http(s) URLs
pub fn validate_server_url(raw: &str) -> anyhow::Result<String> {
    let url = url::Url::parse(raw).map_err(|e| anyhow::anyhow!("invalid server URL '{}': {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(raw.trim_end_matches('/').to_string()),
        other => Err(anyhow::anyhow!("unsupported scheme '{}' in server URL", other)),
    }
}
