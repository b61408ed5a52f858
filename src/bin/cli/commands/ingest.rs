use anyhow::{Context, Result};
use chrono::Utc;

use folio_lib::outline::{self, HeadingNode};
use folio_lib::records::Document;
use folio_lib::store::RecordStore;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    name: &str,
    content: &str,
    source: Option<String>,
    file_type: Option<String>,
    drop_ids: &[i64],
    format: &OutputFormat,
) -> Result<()> {
    let headings: Vec<HeadingNode> =
        serde_json::from_str(content).context("Headings must be a JSON array of heading objects")?;
    let mut headings = outline::normalize(headings).context("Invalid heading list")?;

    let mut dropped = Vec::new();
    if !drop_ids.is_empty() {
        let removal = outline::cascade_remove(&headings, drop_ids).context("Failed to drop headings")?;
        dropped = removal.removed.into_iter().collect();
        headings = removal.remaining;
    }

    let document = Document {
        name: name.to_string(),
        source_path: source.unwrap_or_default(),
        file_type: file_type.unwrap_or_default(),
        created_at: Utc::now(),
        headings,
        ..Default::default()
    };

    let id = app
        .store
        .add_record(&document)
        .with_context(|| format!("Failed to store document '{}'", name))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": id,
                "name": document.name,
                "headings": document.headings.len(),
                "dropped": dropped,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Stored document #{} '{}' with {} headings",
                id,
                document.name,
                document.headings.len()
            );
            if !dropped.is_empty() {
                let ids: Vec<String> = dropped.iter().map(|id: &i64| format!("#{}", id)).collect();
                println!("Dropped {}: {}", dropped.len(), ids.join(", "));
            }
        }
    }

    Ok(())
}
