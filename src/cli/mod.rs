pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Tracker CLI - page windows and label selections against a Tracker API server")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "API base URL (overrides TRACKER_SERVER_URL and saved config)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Print the page window for a current page and page count")]
    Pages {
        #[arg(help = "Current page (1-based)")]
        current: u32,
        #[arg(help = "Total number of pages")]
        total: u32,
    },

    #[command(about = "Label catalog and issue label selections")]
    Labels {
        #[command(subcommand)]
        cmd: commands::labels::LabelCommands,
    },

    #[command(about = "Issue listings")]
    Issues {
        #[command(subcommand)]
        cmd: commands::issues::IssueCommands,
    },

    #[command(about = "CLI configuration")]
    Config {
        #[command(subcommand)]
        cmd: commands::config::ConfigCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let server = cli.server;

    match cli.command {
        Commands::Pages { current, total } => commands::pages::handle(current, total, output_format),
        Commands::Labels { cmd } => commands::labels::handle(cmd, server, output_format).await,
        Commands::Issues { cmd } => commands::issues::handle(cmd, server, output_format).await,
        Commands::Config { cmd } => commands::config::handle(cmd, server, output_format).await,
    }
}
