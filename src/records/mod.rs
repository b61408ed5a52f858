//! Records that can be stored locally and carried in an export.

mod models;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use models::{Document, ModelConfig, PromptItem, RecordId};

/// A record type with its own payload section and a human-readable name
/// that must stay unique (case-insensitively) within its collection.
pub trait PortableRecord: Serialize + DeserializeOwned + Clone {
    /// Section key in the export payload and the store
    const SECTION: &'static str;

    fn id(&self) -> Option<RecordId>;
    fn set_id(&mut self, id: Option<RecordId>);
    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
}

/// Section keys known to this build
pub const SECTIONS: [&str; 3] = [Document::SECTION, ModelConfig::SECTION, PromptItem::SECTION];

impl PortableRecord for ModelConfig {
    const SECTION: &'static str = "models";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: Option<RecordId>) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl PortableRecord for PromptItem {
    const SECTION: &'static str = "promptItems";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: Option<RecordId>) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.title
    }

    fn set_name(&mut self, name: String) {
        self.title = name;
    }
}

impl PortableRecord for Document {
    const SECTION: &'static str = "documents";

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: Option<RecordId>) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}
