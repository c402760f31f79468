use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{self, EnvironmentConfig};
use crate::cli::{utils, OutputFormat};
use crate::client::ApiClient;

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Save the API server URL used by default")]
    SetServer {
        #[arg(help = "Server URL, e.g. http://localhost:3000")]
        url: String,
    },

    #[command(about = "Show the active configuration and server health")]
    Show,
}

pub async fn handle(cmd: ConfigCommands, server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::SetServer { url } => {
            let url = config::validate_server_url(&url)?;
            let mut env = config::load_environment_config()?;
            env.server_url = Some(url.clone());
            config::save_environment_config(&env)?;

            utils::output_success(
                &output_format,
                &format!("Default server set to {}", url),
                Some(json!({ "server_url": url })),
            )
        }
        ConfigCommands::Show => {
            let saved: EnvironmentConfig = config::load_environment_config()?;
            let active = config::resolve_server_url(server)?;
            let client = ApiClient::new(&active)?;

            let health = match client.health().await {
                Ok((status, _)) if status.is_success() => "ok".to_string(),
                Ok((status, _)) => format!("degraded (HTTP {})", status.as_u16()),
                Err(e) => format!("unreachable ({})", e),
            };

            match output_format {
                OutputFormat::Json => utils::output_json(&json!({
                    "config_dir": config::get_config_dir()?,
                    "saved_server_url": saved.server_url,
                    "server_url": active,
                    "health": health,
                })),
                OutputFormat::Text => {
                    println!("Config dir: {}", config::get_config_dir()?.display());
                    println!("Server:     {}", active);
                    println!("Health:     {}", health);
                    Ok(())
                }
            }
        }
    }
}
