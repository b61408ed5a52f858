//! Payload serialization: pure, no I/O.

use serde_json::Value;

use super::errors::{FormatError, FormatResult};
use super::models::{ExportPayload, FORMAT_MAJOR};

/// Encode a payload as pretty JSON.
///
/// Sections are ordered by key, so equal payloads always produce equal bytes.
pub fn serialize(payload: &ExportPayload) -> FormatResult<Vec<u8>> {
    check_version(&payload.version)?;
    serde_json::to_vec_pretty(payload).map_err(|e| FormatError::Malformed(e.to_string()))
}

/// Decode and version-check a payload.
///
/// Any `1.x` version is accepted. Unknown sections and unknown record
/// fields are carried along and ignored by the typed accessors.
pub fn deserialize(bytes: &[u8]) -> FormatResult<ExportPayload> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| FormatError::Malformed(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| FormatError::Malformed("payload is not an object".to_string()))?;

    let version = object
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| FormatError::Malformed("missing version".to_string()))?;
    check_version(version)?;

    serde_json::from_value(value).map_err(|e| FormatError::Malformed(e.to_string()))
}

/// Accept `MAJOR` or `MAJOR.MINOR[...]` with the supported major
fn check_version(version: &str) -> FormatResult<()> {
    let major = version
        .split('.')
        .next()
        .and_then(|m| m.trim().parse::<u32>().ok())
        .ok_or_else(|| FormatError::UnsupportedVersion(version.to_string()))?;

    if major != FORMAT_MAJOR {
        return Err(FormatError::UnsupportedVersion(version.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::HeadingNode;
    use crate::records::{Document, ModelConfig, PromptItem};
    use crate::transfer::models::FORMAT_VERSION;
    use chrono::{TimeZone, Utc};

    fn fixed_payload() -> ExportPayload {
        let time = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let mut payload = ExportPayload::new(time);
        payload
            .insert_records(&[ModelConfig {
                name: "Local".to_string(),
                provider: "ollama".to_string(),
                model: "llama3".to_string(),
                created_at: time,
                ..Default::default()
            }])
            .unwrap();
        payload
            .insert_records(&[Document {
                name: "Guide".to_string(),
                created_at: time,
                headings: vec![
                    HeadingNode::new(1, 1, "Intro", 1).with_content("Welcome"),
                    HeadingNode::new(2, 2, "Setup", 2).with_parent(1),
                ],
                ..Default::default()
            }])
            .unwrap();
        payload
    }

    #[test]
    fn test_round_trip_preserves_sections() {
        let payload = fixed_payload();
        let bytes = serialize(&payload).unwrap();
        let decoded = deserialize(&bytes).unwrap();

        assert_eq!(decoded, payload);
        let docs: Vec<Document> = decoded.records().unwrap();
        assert_eq!(docs[0].headings.len(), 2);
        assert_eq!(docs[0].headings[1].parent_id, Some(1));
    }

    #[test]
    fn test_serialization_is_byte_stable() {
        let a = serialize(&fixed_payload()).unwrap();
        let b = serialize(&fixed_payload()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_payload_shape() {
        let bytes = serialize(&fixed_payload()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], FORMAT_VERSION);
        assert_eq!(value["exportTime"], "2026-01-02T03:04:05Z");
        assert!(value["models"].is_array());
        assert!(value["documents"][0]["headings"][0]["orderIndex"].is_number());
    }

    #[test]
    fn test_absent_section_reads_as_empty() {
        let decoded = deserialize(&serialize(&fixed_payload()).unwrap()).unwrap();
        let prompts: Vec<PromptItem> = decoded.records().unwrap();
        assert!(prompts.is_empty());
    }

    #[test]
    fn test_unknown_sections_and_fields_are_ignored() {
        let json = r#"{
            "exportTime": "2026-01-02T03:04:05Z",
            "version": "1.4",
            "models": [{"name": "Remote", "futureField": {"x": 1}}],
            "workflows": [{"steps": 3}]
        }"#;
        let decoded = deserialize(json.as_bytes()).unwrap();

        let models: Vec<ModelConfig> = decoded.records().unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "Remote");
        assert_eq!(models[0].provider, "");
        assert_eq!(models[0].max_tokens, None);

        assert_eq!(
            decoded.unknown_sections(&crate::records::SECTIONS),
            vec!["workflows".to_string()]
        );
    }

    #[test]
    fn test_malformed_section_does_not_affect_others() {
        let json = r#"{
            "exportTime": "2026-01-02T03:04:05Z",
            "version": "1.0",
            "models": "not a list",
            "promptItems": [{"title": "Summarize", "content": "Summarize: {text}"}]
        }"#;
        let decoded = deserialize(json.as_bytes()).unwrap();

        assert!(matches!(
            decoded.records::<ModelConfig>(),
            Err(FormatError::MalformedSection { .. })
        ));
        let prompts: Vec<PromptItem> = decoded.records().unwrap();
        assert_eq!(prompts[0].title, "Summarize");
    }

    #[test]
    fn test_version_gating() {
        let future = r#"{"exportTime": "2026-01-02T03:04:05Z", "version": "2.0"}"#;
        assert_eq!(
            deserialize(future.as_bytes()),
            Err(FormatError::UnsupportedVersion("2.0".to_string()))
        );

        let garbage = r#"{"exportTime": "2026-01-02T03:04:05Z", "version": "beta"}"#;
        assert!(matches!(
            deserialize(garbage.as_bytes()),
            Err(FormatError::UnsupportedVersion(_))
        ));

        let missing = r#"{"exportTime": "2026-01-02T03:04:05Z"}"#;
        assert!(matches!(deserialize(missing.as_bytes()), Err(FormatError::Malformed(_))));
    }

    #[test]
    fn test_structurally_invalid_payloads() {
        assert!(matches!(deserialize(b"[1, 2]"), Err(FormatError::Malformed(_))));
        assert!(matches!(deserialize(b"{not json"), Err(FormatError::Malformed(_))));
    }
}
