use anyhow::{bail, Context, Result};
use serde_json::Value;

use folio_lib::records::{Document, ModelConfig, PortableRecord, PromptItem};
use folio_lib::store::RecordStore;

use crate::app::App;
use crate::{OutputFormat, Section};

/// Parse one record or an array of records
fn parse_records<R: PortableRecord>(content: &str) -> Result<Vec<R>> {
    let value: Value = serde_json::from_str(content).context("Input is not valid JSON")?;

    let records = match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value(item)
                    .with_context(|| format!("Record {} is not a valid {} entry", i, R::SECTION))
            })
            .collect::<Result<Vec<R>>>()?,
        Value::Object(_) => vec![serde_json::from_value(value)
            .with_context(|| format!("Input is not a valid {} entry", R::SECTION))?],
        _ => bail!("Expected a JSON object or array"),
    };

    Ok(records)
}

fn add<R, P>(app: &App, content: &str, format: &OutputFormat, prepare: P) -> Result<()>
where
    R: PortableRecord,
    P: Fn(R) -> Result<R>,
{
    let records = parse_records::<R>(content)?
        .into_iter()
        .map(prepare)
        .collect::<Result<Vec<R>>>()?;

    let mut ids = Vec::with_capacity(records.len());
    for record in &records {
        let id = app
            .store
            .add_record(record)
            .with_context(|| format!("Failed to add '{}'", record.name()))?;
        ids.push(id);
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "ids": ids }))?);
        }
        OutputFormat::Plain => {
            for (record, id) in records.iter().zip(&ids) {
                println!("Added {} #{}: {}", R::SECTION, id, record.name());
            }
        }
    }
    Ok(())
}

pub fn run_add(app: &App, section: Section, content: &str, format: &OutputFormat) -> Result<()> {
    match section {
        Section::Documents => add(app, content, format, |doc: Document| {
            let name = doc.name.clone();
            doc.normalize()
                .with_context(|| format!("Invalid heading list in '{}'", name))
        }),
        Section::Models => add(app, content, format, Ok::<ModelConfig, anyhow::Error>),
        Section::Prompts => add(app, content, format, Ok::<PromptItem, anyhow::Error>),
    }
}

pub fn run_list(app: &App, section: Section, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = match section {
                Section::Documents => serde_json::to_value(app.list::<Document>()?)?,
                Section::Models => serde_json::to_value(app.list::<ModelConfig>()?)?,
                Section::Prompts => serde_json::to_value(app.list::<PromptItem>()?)?,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => match section {
            Section::Documents => {
                let documents = app.list::<Document>()?;
                if documents.is_empty() {
                    println!("(no documents)");
                }
                for doc in &documents {
                    println!(
                        "#{:<4} {} ({} headings, {})",
                        doc.id.unwrap_or_default(),
                        doc.name,
                        doc.headings.len(),
                        if doc.file_type.is_empty() { "-" } else { doc.file_type.as_str() }
                    );
                }
            }
            Section::Models => {
                let models = app.list::<ModelConfig>()?;
                if models.is_empty() {
                    println!("(no model configs)");
                }
                for model in &models {
                    println!(
                        "#{:<4} {} [{}/{}]",
                        model.id.unwrap_or_default(),
                        model.name,
                        model.provider,
                        model.model
                    );
                }
            }
            Section::Prompts => {
                let prompts = app.list::<PromptItem>()?;
                if prompts.is_empty() {
                    println!("(no prompts)");
                }
                for prompt in &prompts {
                    let category = if prompt.category.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", prompt.category)
                    };
                    println!("#{:<4} {}{}", prompt.id.unwrap_or_default(), prompt.title, category);
                }
            }
        },
    }

    Ok(())
}

pub fn run_delete(app: &App, section: Section, id: i64) -> Result<()> {
    let result = match section {
        Section::Documents => app.store.delete_record::<Document>(id),
        Section::Models => app.store.delete_record::<ModelConfig>(id),
        Section::Prompts => app.store.delete_record::<PromptItem>(id),
    };
    result.with_context(|| format!("Failed to delete record #{}", id))?;

    println!("Deleted #{}", id);
    Ok(())
}

pub fn run_count(app: &App, format: &OutputFormat) -> Result<()> {
    let documents = app.count::<Document>()?;
    let models = app.count::<ModelConfig>()?;
    let prompts = app.count::<PromptItem>()?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                Document::SECTION: documents,
                ModelConfig::SECTION: models,
                PromptItem::SECTION: prompts,
                "dataDir": app.data_dir.to_string_lossy(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Documents:     {}", documents);
            println!("Model configs: {}", models);
            println!("Prompts:       {}", prompts);
            println!();
            println!("Data directory: {}", app.data_dir.display());
        }
    }
    Ok(())
}
