use serde_json::json;

use crate::cli::{utils, OutputFormat};
use crate::pagination::{compute_window, PageLinks};

pub fn handle(current: u32, total: u32, output_format: OutputFormat) -> anyhow::Result<()> {
    let links = PageLinks::new(current, total)?;

    match output_format {
        OutputFormat::Json => utils::output_json(&json!({
            "current_page": current,
            "total_pages": total,
            "previous": links.previous,
            "next": links.next,
            "pages": compute_window(current, total)?,
        })),
        OutputFormat::Text => {
            println!("{}", utils::render_window(&links));
            Ok(())
        }
    }
}
