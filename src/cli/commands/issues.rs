use clap::Subcommand;

use crate::cli::{config, utils, OutputFormat};
use crate::client::ApiClient;

#[derive(Subcommand)]
pub enum IssueCommands {
    #[command(about = "List a project's issues, one page at a time")]
    List {
        #[arg(help = "Project id")]
        project: i32,
        #[arg(long, help = "Page number (defaults to 1)")]
        page: Option<u32>,
    },
}

pub async fn handle(cmd: IssueCommands, server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(&config::resolve_server_url(server)?)?;

    match cmd {
        IssueCommands::List { project, page } => {
            let listing = client.project_issues(project, page).await?;

            match output_format {
                OutputFormat::Json => utils::output_json(&listing),
                OutputFormat::Text => {
                    if listing.items.is_empty() {
                        println!("Project {} has no issues", project);
                    }
                    for issue in &listing.items {
                        println!(
                            "{:>4}-{:<6} {:<12} {:<12} {}",
                            project, issue.id, issue.status, format!("{:?}", issue.priority), issue.title
                        );
                    }
                    println!(
                        "Page {} of {} ({} issues)",
                        listing.pagination.current_page, listing.pagination.total_pages, listing.total_items
                    );
                    println!("{}", utils::render_window(&listing.pagination));
                    Ok(())
                }
            }
        }
    }
}
