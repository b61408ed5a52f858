//! Substring search over a heading forest with path expansion.

use std::collections::BTreeSet;

use serde::Serialize;

use super::errors::SearchError;
use super::models::HeadingId;
use super::tree::DocumentTree;

/// Default snippet width in characters
pub const DEFAULT_SNIPPET_CHARS: usize = 80;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    /// Width of the content excerpt attached to content matches
    pub snippet_chars: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }
}

/// Which part of the heading contained the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Title,
    Content,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub heading_id: HeadingId,
    pub title: String,
    pub level: u32,
    pub matched: MatchField,
    /// Ancestors to expand, root first, excluding the match itself
    pub path: Vec<HeadingId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Find headings whose title or content contains `query`.
///
/// Results follow the forest's pre-order. The query is matched as typed,
/// surrounding whitespace included; a query that is blank is rejected.
pub fn search(
    tree: &DocumentTree,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<SearchMatch>, SearchError> {
    if query.trim().is_empty() {
        return Err(SearchError::InvalidQuery);
    }

    let needle = Folded::new(query, options.case_sensitive).text;
    let mut matches = Vec::new();

    for idx in tree.preorder() {
        let node = tree.node(idx);
        let in_title = Folded::new(&node.title, options.case_sensitive)
            .text
            .contains(&needle);
        let content = Folded::new(&node.content, options.case_sensitive);
        let content_pos = content.text.find(&needle);

        let matched = match (in_title, content_pos.is_some()) {
            (true, true) => MatchField::Both,
            (true, false) => MatchField::Title,
            (false, true) => MatchField::Content,
            (false, false) => continue,
        };

        let snippet = content_pos.map(|pos| {
            excerpt(&node.content, content.original_offset(pos), options.snippet_chars)
        });

        matches.push(SearchMatch {
            heading_id: node.id,
            title: node.title.clone(),
            level: node.level,
            matched,
            path: tree
                .ancestors(idx)
                .into_iter()
                .map(|a| tree.node(a).id)
                .collect(),
            snippet,
        });
    }

    log::debug!("Search for {:?} matched {} heading(s)", query, matches.len());
    Ok(matches)
}

/// Nodes that must be expanded so that every match is visible
pub fn expansion_set(matches: &[SearchMatch]) -> BTreeSet<HeadingId> {
    matches
        .iter()
        .flat_map(|m| m.path.iter().copied())
        .collect()
}

/// Case-folded copy of a text that remembers where each folded char came from.
///
/// Lowercasing can turn one char into several ('\u{130}' folds to two), so
/// offsets in the folded text do not line up with the original.
struct Folded {
    text: String,
    /// Original char index for every folded char
    origins: Vec<usize>,
}

impl Folded {
    fn new(text: &str, case_sensitive: bool) -> Self {
        let mut folded = String::with_capacity(text.len());
        let mut origins = Vec::with_capacity(text.len());

        for (i, c) in text.chars().enumerate() {
            if case_sensitive {
                folded.push(c);
                origins.push(i);
            } else {
                for lower in c.to_lowercase() {
                    folded.push(lower);
                    origins.push(i);
                }
            }
        }

        Self {
            text: folded,
            origins,
        }
    }

    /// Char index in the original text for a byte offset into `text`
    fn original_offset(&self, byte_pos: usize) -> usize {
        let folded_index = self.text[..byte_pos].chars().count();
        self.origins
            .get(folded_index)
            .copied()
            .unwrap_or_else(|| self.origins.last().map_or(0, |&last| last + 1))
    }
}

/// Single-line excerpt of `content` around a character offset
fn excerpt(content: &str, char_offset: usize, width: usize) -> String {
    let chars: Vec<char> = content.chars().collect();
    if width == 0 || chars.is_empty() {
        return String::new();
    }

    let offset = char_offset.min(chars.len().saturating_sub(1));
    let start = offset.saturating_sub(width / 4);
    let end = (start + width).min(chars.len());

    let body: String = chars[start..end]
        .iter()
        .map(|&c| if c.is_whitespace() { ' ' } else { c })
        .collect();

    let mut snippet = String::new();
    if start > 0 {
        snippet.push('\u{2026}');
    }
    snippet.push_str(body.trim());
    if end < chars.len() {
        snippet.push('\u{2026}');
    }
    snippet
}
