use std::collections::BTreeSet;

use folio_lib::outline::{DocumentTree, HeadingId};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

fn paint(text: &str, code: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", code, text, Color::RESET)
    } else {
        text.to_string()
    }
}

fn level_color(level: u32) -> &'static str {
    match level {
        1 => Color::YELLOW,
        2 => Color::MAGENTA,
        3 => Color::BLUE,
        _ => Color::CYAN,
    }
}

/// Which nodes of the tree get printed
pub enum Visibility<'a> {
    All,
    /// Roots, plus the children of expanded nodes
    Expanded(&'a BTreeSet<HeadingId>),
}

/// Render the forest with box-drawing connectors.
///
/// `highlight` nodes are drawn bold.
pub fn render_tree(
    tree: &DocumentTree,
    visibility: &Visibility,
    highlight: &BTreeSet<HeadingId>,
    use_color: bool,
) -> Vec<String> {
    let mut lines = Vec::new();
    let roots = tree.roots();

    for (i, &root) in roots.iter().enumerate() {
        render_node(
            tree,
            root,
            "",
            i + 1 == roots.len(),
            visibility,
            highlight,
            use_color,
            &mut lines,
        );
    }

    lines
}

#[allow(clippy::too_many_arguments)]
fn render_node(
    tree: &DocumentTree,
    idx: usize,
    prefix: &str,
    is_last: bool,
    visibility: &Visibility,
    highlight: &BTreeSet<HeadingId>,
    use_color: bool,
    lines: &mut Vec<String>,
) {
    let node = tree.node(idx);
    let connector = if is_last { "\u{2514}\u{2500}\u{2500} " } else { "\u{251c}\u{2500}\u{2500} " };

    let mut label = paint(&node.title, level_color(node.level), use_color);
    if highlight.contains(&node.id) {
        label = paint(&label, Color::BOLD, use_color);
    }
    let id = paint(&format!("#{}", node.id), Color::GRAY, use_color);
    lines.push(format!("{}{}{} {}", prefix, connector, label, id));

    let children = tree.children(idx);
    let expanded = match visibility {
        Visibility::All => true,
        Visibility::Expanded(open) => open.contains(&node.id),
    };

    if !expanded {
        if !children.is_empty() {
            let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "\u{2502}   " });
            let more = format!("\u{2026} {} hidden", children.len());
            lines.push(format!("{}{}", child_prefix, paint(&more, Color::DIM, use_color)));
        }
        return;
    }

    let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "\u{2502}   " });
    for (i, &child) in children.iter().enumerate() {
        render_node(
            tree,
            child,
            &child_prefix,
            i + 1 == children.len(),
            visibility,
            highlight,
            use_color,
            lines,
        );
    }
}
