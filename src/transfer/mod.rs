//! Portable export format: versioned payload codec plus the encrypted
//! archive that carries it.

pub mod archive;
pub mod codec;
pub mod errors;
pub mod models;

pub use archive::{
    build_payload, export_sections, import_archive, open_payload, read_archive, seal_payload,
    write_archive, ExportSelection, TransferReport,
};
pub use codec::{deserialize, serialize};
pub use errors::{FormatError, FormatResult, TransferError, TransferResult};
pub use models::{ExportPayload, FORMAT_MAJOR, FORMAT_VERSION};
