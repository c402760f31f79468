use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::pagination::PageLinks;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(fields)) = data {
                if let Some(object) = response.as_object_mut() {
                    object.extend(fields);
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Pretty-print any serializable value as JSON
pub fn output_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line rendering of a page window, e.g. `‹ 1 … 4 [5] 6 … 10 ›`
pub fn render_window(links: &PageLinks) -> String {
    let mut parts = Vec::with_capacity(links.pages.len() + 2);
    parts.push(if links.previous.is_some() { "‹" } else { " " }.to_string());
    for link in &links.pages {
        parts.push(match link.entry.page() {
            Some(page) if link.current => format!("[{}]", page),
            Some(page) => page.to_string(),
            None => "…".to_string(),
        });
    }
    parts.push(if links.next.is_some() { "›" } else { " " }.to_string());
    parts.join(" ").trim().to_string()
}
