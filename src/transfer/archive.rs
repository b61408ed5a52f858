//! Export and import of whole collections through an encrypted archive.
//!
//! Export: store -> payload -> codec -> envelope -> armored text -> file.
//! Import runs the same chain backwards. Envelope and format errors abort
//! before anything is written; per-record failures are collected.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::codec;
use super::errors::{TransferError, TransferResult};
use super::models::ExportPayload;
use crate::encryption::{self, Argon2Params, CryptoBlob};
use crate::reconcile::{import_records, import_records_with, ImportSummary};
use crate::records::{Document, ModelConfig, PortableRecord, PromptItem, SECTIONS};
use crate::store::RecordStore;

/// Which collections go into an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSelection {
    pub documents: bool,
    pub models: bool,
    pub prompts: bool,
}

impl ExportSelection {
    pub fn all() -> Self {
        Self {
            documents: true,
            models: true,
            prompts: true,
        }
    }

    pub fn none() -> Self {
        Self {
            documents: false,
            models: false,
            prompts: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.documents || self.models || self.prompts)
    }
}

impl Default for ExportSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// What an import did, section by section
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReport {
    pub export_time: DateTime<Utc>,
    pub version: String,
    pub sections: Vec<ImportSummary>,
    pub ignored_sections: Vec<String>,
}

impl TransferReport {
    pub fn imported(&self) -> usize {
        self.sections.iter().map(|s| s.imported).sum()
    }

    pub fn failed(&self) -> usize {
        self.sections.iter().map(|s| s.failed).sum()
    }
}

/// Collect the selected collections from the store
pub fn build_payload<S: RecordStore>(
    store: &S,
    selection: ExportSelection,
) -> TransferResult<ExportPayload> {
    if selection.is_empty() {
        return Err(TransferError::NothingToExport);
    }

    let mut payload = ExportPayload::new(Utc::now());
    if selection.documents {
        payload.insert_records(&store.list_records::<Document>()?)?;
    }
    if selection.models {
        payload.insert_records(&store.list_records::<ModelConfig>()?)?;
    }
    if selection.prompts {
        payload.insert_records(&store.list_records::<PromptItem>()?)?;
    }
    Ok(payload)
}

/// Serialize and encrypt a payload into armored text
pub fn seal_payload(
    payload: &ExportPayload,
    password: &str,
    params: &Argon2Params,
) -> TransferResult<String> {
    let bytes = codec::serialize(payload)?;
    let blob = encryption::encrypt_with_params(&bytes, password, params)?;
    Ok(blob.to_armored())
}

/// Decrypt and decode armored text
pub fn open_payload(armored: &str, password: &str) -> TransferResult<ExportPayload> {
    let blob = CryptoBlob::from_armored(armored)?;
    let bytes = encryption::decrypt(&blob, password)?;
    Ok(codec::deserialize(&bytes)?)
}

/// Export the selected collections as armored text
pub fn export_sections<S: RecordStore>(
    store: &S,
    selection: ExportSelection,
    password: &str,
    params: &Argon2Params,
) -> TransferResult<String> {
    let payload = build_payload(store, selection)?;
    let armored = seal_payload(&payload, password, params)?;

    log::info!(
        "Exported sections {:?} at {}",
        payload.sections.keys().collect::<Vec<_>>(),
        payload.export_time
    );
    Ok(armored)
}

/// Import every known section of an archive into the store.
///
/// All sections are decoded before the first write, so a malformed
/// section leaves the store untouched.
pub fn import_archive<S: RecordStore>(
    store: &S,
    armored: &str,
    password: &str,
) -> TransferResult<TransferReport> {
    let payload = open_payload(armored, password)?;

    let documents: Vec<Document> = payload.records()?;
    let models: Vec<ModelConfig> = payload.records()?;
    let prompts: Vec<PromptItem> = payload.records()?;

    let ignored_sections = payload.unknown_sections(&SECTIONS);
    for section in &ignored_sections {
        log::warn!("Ignoring unknown export section '{}'", section);
    }

    let mut sections = Vec::new();
    if payload.has_section(Document::SECTION) {
        sections.push(import_records_with(store, documents, prepare_document));
    }
    if payload.has_section(ModelConfig::SECTION) {
        sections.push(import_records(store, models));
    }
    if payload.has_section(PromptItem::SECTION) {
        sections.push(import_records(store, prompts));
    }

    let report = TransferReport {
        export_time: payload.export_time,
        version: payload.version,
        sections,
        ignored_sections,
    };

    log::info!(
        "Import finished: {} imported, {} failed",
        report.imported(),
        report.failed()
    );
    Ok(report)
}

/// Imported heading lists get the same checks as freshly parsed ones
fn prepare_document(document: Document) -> Result<Document, String> {
    document.normalize().map_err(|e| e.to_string())
}

/// Write armored text to `path` atomically (write to .tmp then rename)
pub fn write_archive(path: &Path, armored: &str) -> TransferResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    fs::write(tmp_path, armored)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}

pub fn read_archive(path: &Path) -> TransferResult<String> {
    Ok(fs::read_to_string(path)?)
}
