use std::path::Path;

use anyhow::{bail, Context, Result};

use folio_lib::transfer::{self, ExportSelection};

use crate::app::App;
use crate::password;
use crate::{OutputFormat, Section};

fn selection(sections: &[Section]) -> ExportSelection {
    if sections.is_empty() {
        return ExportSelection::all();
    }

    ExportSelection {
        documents: sections.contains(&Section::Documents),
        models: sections.contains(&Section::Models),
        prompts: sections.contains(&Section::Prompts),
    }
}

pub fn run_export(app: &App, file: &Path, sections: &[Section]) -> Result<()> {
    let Some(password) = password::prompt("encrypt the export")? else {
        println!("Export cancelled");
        return Ok(());
    };

    let params = app.config.argon2_params();
    let armored = transfer::export_sections(&app.store, selection(sections), &password, &params)
        .context("Export failed")?;

    transfer::write_archive(file, &armored)
        .with_context(|| format!("Failed to write {}", file.display()))?;

    println!("Exported to {}", file.display());
    Ok(())
}

pub fn run_import(app: &App, file: &Path, format: &OutputFormat) -> Result<()> {
    let armored = transfer::read_archive(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    if !folio_lib::encryption::is_encrypted_file(&armored) {
        bail!("{} is not an encrypted export", file.display());
    }

    let Some(password) = password::prompt("decrypt the export")? else {
        println!("Import cancelled");
        return Ok(());
    };

    let report = transfer::import_archive(&app.store, &armored, &password).context("Import failed")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Plain => {
            println!(
                "Export from {} (format {})",
                report.export_time.format("%Y-%m-%d %H:%M:%S UTC"),
                report.version
            );
            for summary in &report.sections {
                println!(
                    "  {}: {} imported, {} renamed, {} failed",
                    summary.section, summary.imported, summary.renamed, summary.failed
                );
                for err in &summary.errors {
                    println!("    ! #{} '{}': {}", err.index, err.name, err.reason);
                }
            }
            for section in &report.ignored_sections {
                println!("  {}: ignored (unknown section)", section);
            }
        }
    }

    Ok(())
}
