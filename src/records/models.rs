use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outline::{self, DocumentTree, HeadingNode, OutlineResult, ParentPolicy};

/// Record identifier assigned by the destination store
pub type RecordId = i64;

/// Connection settings for one AI model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    /// e.g. "openai", "ollama"
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub api_key: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// Reusable prompt template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// An uploaded document and the headings extracted from it.
///
/// `headings` is the persisted flat list; once stored it is treated as
/// an immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub source_path: String,
    /// e.g. "docx", "md"
    pub file_type: String,
    pub created_at: DateTime<Utc>,
    pub headings: Vec<HeadingNode>,
}

impl Document {
    /// Rebuild the outline view of this document
    pub fn tree(&self, policy: ParentPolicy) -> DocumentTree {
        DocumentTree::build_with(&self.headings, policy)
    }

    /// Validate and reorder the heading list before it is stored
    pub fn normalize(mut self) -> OutlineResult<Self> {
        self.headings = outline::normalize(self.headings)?;
        Ok(self)
    }
}
