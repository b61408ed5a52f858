use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{FormatError, FormatResult};
use crate::records::PortableRecord;

/// Payload format written inside every envelope.
/// Only the major component gates compatibility.
pub const FORMAT_VERSION: &str = "1.0";

/// Major version this build reads
pub const FORMAT_MAJOR: u32 = 1;

/// Decrypted content of an export: a timestamp, a version and any number
/// of named sections, each a JSON array of records.
///
/// Sections are kept as raw JSON until a typed view is requested, so a
/// section this build does not know survives decoding untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub export_time: DateTime<Utc>,
    pub version: String,
    #[serde(flatten)]
    pub sections: BTreeMap<String, Value>,
}

impl ExportPayload {
    pub fn new(export_time: DateTime<Utc>) -> Self {
        Self {
            export_time,
            version: FORMAT_VERSION.to_string(),
            sections: BTreeMap::new(),
        }
    }

    /// Store `records` under their section key, replacing any previous content
    pub fn insert_records<R: PortableRecord>(&mut self, records: &[R]) -> FormatResult<()> {
        let value = serde_json::to_value(records).map_err(|e| FormatError::MalformedSection {
            section: R::SECTION.to_string(),
            message: e.to_string(),
        })?;
        self.sections.insert(R::SECTION.to_string(), value);
        Ok(())
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Typed view of one section. An absent section is an empty list.
    pub fn records<R: PortableRecord>(&self) -> FormatResult<Vec<R>> {
        match self.sections.get(R::SECTION) {
            None => Ok(Vec::new()),
            Some(value) => Vec::<R>::deserialize(value).map_err(|e| FormatError::MalformedSection {
                section: R::SECTION.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Section keys present in the payload that this build does not read
    pub fn unknown_sections(&self, known: &[&str]) -> Vec<String> {
        self.sections
            .keys()
            .filter(|k| !known.contains(&k.as_str()))
            .cloned()
            .collect()
    }
}
