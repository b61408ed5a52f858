use std::collections::BTreeSet;

use anyhow::{Context, Result};

use folio_lib::outline::{self, MatchField};

use crate::app::App;
use crate::commands::tree::parent_policy;
use crate::render::terminal::{render_tree, Color, Visibility};
use crate::OutputFormat;

pub fn run(
    app: &App,
    document: &str,
    query: &str,
    case_sensitive: bool,
    infer_levels: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let doc = app.find_document(document)?;
    let tree = doc.tree(parent_policy(infer_levels));

    let mut options = app.config.search_options();
    options.case_sensitive |= case_sensitive;

    let matches = outline::search(&tree, query, &options).context("Search failed")?;
    let expanded = outline::expansion_set(&matches);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "document": doc.name,
                "matches": matches,
                "expanded": expanded,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if matches.is_empty() {
                println!("No headings matching '{}' in {}", query.trim(), doc.name);
                return Ok(());
            }

            for m in &matches {
                let trail: Vec<&str> = m
                    .path
                    .iter()
                    .filter_map(|id| tree.get(*id))
                    .map(|node| node.title.as_str())
                    .chain(std::iter::once(m.title.as_str()))
                    .collect();

                let field = match m.matched {
                    MatchField::Title => "title",
                    MatchField::Content => "content",
                    MatchField::Both => "title+content",
                };

                if use_color {
                    println!(
                        "{}{}{} {}({}){}",
                        Color::BOLD,
                        trail.join(" > "),
                        Color::RESET,
                        Color::GRAY,
                        field,
                        Color::RESET
                    );
                } else {
                    println!("{} ({})", trail.join(" > "), field);
                }

                if let Some(snippet) = &m.snippet {
                    println!("    {}", snippet);
                }
            }

            println!();
            let hits: BTreeSet<_> = matches.iter().map(|m| m.heading_id).collect();
            for line in render_tree(&tree, &Visibility::Expanded(&expanded), &hits, use_color) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
