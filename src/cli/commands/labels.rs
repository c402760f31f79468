use clap::Subcommand;
use serde_json::json;

use crate::cli::{config, utils, OutputFormat};
use crate::client::ApiClient;
use crate::labels::{FailurePolicy, Label, LabelAssignmentSync, Resolution};

#[derive(Subcommand)]
pub enum LabelCommands {
    #[command(about = "List the label catalog")]
    List,

    #[command(about = "Show the labels on an issue")]
    Show {
        #[arg(help = "Issue id")]
        issue: i32,
    },

    #[command(about = "Replace an issue's labels; only the difference is sent to the server")]
    Set {
        #[arg(help = "Issue id")]
        issue: i32,
        #[arg(help = "Label ids to keep or add; omit all to clear")]
        label_ids: Vec<i32>,
    },
}

pub async fn handle(cmd: LabelCommands, server: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(&config::resolve_server_url(server)?)?;

    match cmd {
        LabelCommands::List => {
            let labels = client.labels().await?;
            print_labels(&labels, "No labels defined", &output_format)
        }
        LabelCommands::Show { issue } => {
            let labels = client.issue_labels(issue).await?;
            print_labels(&labels, &format!("Issue {} has no labels", issue), &output_format)
        }
        LabelCommands::Set { issue, label_ids } => set_labels(client, issue, &label_ids, &output_format).await,
    }
}

async fn set_labels(client: ApiClient, issue: i32, label_ids: &[i32], output_format: &OutputFormat) -> anyhow::Result<()> {
    let (catalog, current) = futures::try_join!(client.labels(), client.issue_labels(issue))?;
    let selection = select_from_catalog(&catalog, label_ids)?;

    let sync = LabelAssignmentSync::new(issue, current, client).with_policy(FailurePolicy::from_config());
    let outcome = sync.on_change(selection).await;

    let selected = sync.selected();
    let failed: Vec<_> = outcome
        .failures
        .iter()
        .map(|f| json!({ "change": f.change, "error": f.error.to_string() }))
        .collect();

    match output_format {
        OutputFormat::Json => utils::output_json(&json!({
            "success": outcome.is_synced(),
            "issue_id": issue,
            "applied": outcome.applied,
            "failed": failed,
            "resolution": outcome.resolution,
            "labels": selected,
        }))?,
        OutputFormat::Text => {
            for failure in &outcome.failures {
                eprintln!("✗ {:?}: {}", failure.change, failure.error);
            }
            if outcome.applied.is_empty() && outcome.failures.is_empty() {
                println!("Issue {} labels unchanged", issue);
            } else {
                println!("Applied {} change(s) to issue {}", outcome.applied.len(), issue);
            }
            print_labels(&selected, "No labels", output_format)?;
        }
    }

    match outcome.resolution {
        Resolution::Synced => Ok(()),
        Resolution::Reverted => anyhow::bail!("{} label change(s) failed; failed changes reverted", outcome.failures.len()),
        _ => anyhow::bail!("{} label change(s) failed", outcome.failures.len()),
    }
}

/// Resolve ids against the catalog, keeping the requested order
fn select_from_catalog(catalog: &[Label], label_ids: &[i32]) -> anyhow::Result<Vec<Label>> {
    label_ids
        .iter()
        .map(|id| {
            catalog
                .iter()
                .find(|l| l.id == *id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Label {} not found in catalog", id))
        })
        .collect()
}

fn print_labels(labels: &[Label], empty_message: &str, output_format: &OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => utils::output_json(&json!({ "labels": labels })),
        OutputFormat::Text => {
            if labels.is_empty() {
                println!("{}", empty_message);
            }
            for label in labels {
                println!("{:>4}  {:<20} {}", label.id, label.name, label.color);
            }
            Ok(())
        }
    }
}
