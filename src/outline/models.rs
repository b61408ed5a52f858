use serde::{Deserialize, Serialize};

/// Heading identifier, unique within one document
pub type HeadingId = i64;

/// One heading extracted from a source document.
///
/// Documents persist their headings as a flat list sorted by
/// `order_index`; the tree is rebuilt from it on demand.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadingNode {
    pub id: HeadingId,
    /// 1 = top level
    pub level: u32,
    pub title: String,
    pub content: String,
    /// Position in the original extraction order
    pub order_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<HeadingId>,
}

impl HeadingNode {
    pub fn new(id: HeadingId, level: u32, title: impl Into<String>, order_index: u32) -> Self {
        Self {
            id,
            level,
            title: title.into(),
            content: String::new(),
            order_index,
            parent_id: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_parent(mut self, parent_id: HeadingId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}
