use std::collections::BTreeSet;

use anyhow::Result;

use folio_lib::outline::ParentPolicy;

use crate::app::App;
use crate::render::terminal::{render_tree, Visibility};
use crate::OutputFormat;

pub(crate) fn parent_policy(infer_levels: bool) -> ParentPolicy {
    if infer_levels {
        ParentPolicy::InferFromLevel
    } else {
        ParentPolicy::Explicit
    }
}

pub fn run(
    app: &App,
    document: &str,
    infer_levels: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let doc = app.find_document(document)?;
    let tree = doc.tree(parent_policy(infer_levels));

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = tree
                .preorder()
                .into_iter()
                .map(|idx| {
                    let node = tree.node(idx);
                    serde_json::json!({
                        "id": node.id,
                        "title": node.title,
                        "level": node.level,
                        "depth": tree.depth(idx),
                        "parentId": tree.parent(idx).map(|p| tree.node(p).id),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", doc.name);
            if tree.is_empty() {
                println!("  (no headings)");
                return Ok(());
            }
            for line in render_tree(&tree, &Visibility::All, &BTreeSet::new(), use_color) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
