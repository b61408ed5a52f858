//! Fitting imported records into an existing collection.
//!
//! Imported identifiers are never trusted: every record is stored under a
//! fresh id from the destination store. Display names are kept unique
//! case-insensitively by appending `-1`, `-2`, ... on collision.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::records::PortableRecord;
use crate::store::RecordStore;

/// One record that could not be imported
#[derive(Debug, Clone, Error, Serialize)]
#[error("Record {index} ({name}) failed: {reason}")]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationError {
    /// Position of the record in the incoming batch
    pub index: usize,
    pub name: String,
    pub reason: String,
}

/// Outcome of a best-effort batch import
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub section: String,
    pub imported: usize,
    pub failed: usize,
    pub renamed: usize,
    pub errors: Vec<ReconciliationError>,
}

/// Return `name` itself if free, else the first free `name-N` for N = 1, 2, ...
///
/// `taken` holds lowercased names.
pub fn unique_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(&name.to_lowercase()) {
        return name.to_string();
    }

    let mut suffix = 1u32;
    loop {
        let candidate = format!("{}-{}", name, suffix);
        if !taken.contains(&candidate.to_lowercase()) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Prepare incoming records for insertion next to `existing`.
///
/// Ids are cleared and display names ([`PortableRecord::name`]) are made
/// unique. Each chosen name is reserved before the next record is
/// processed so duplicates inside the batch do not collide either.
pub fn reconcile<R: PortableRecord>(incoming: Vec<R>, existing: &[R]) -> Vec<R> {
    let mut taken: HashSet<String> = existing.iter().map(|r| r.name().to_lowercase()).collect();

    incoming
        .into_iter()
        .map(|mut record| {
            record.set_id(None);
            let original = record.name().to_string();
            let chosen = unique_name(&original, &taken);
            if chosen != original {
                log::debug!("Renamed imported {} {:?} to {:?}", R::SECTION, original, chosen);
                record.set_name(chosen.clone());
            }
            taken.insert(chosen.to_lowercase());
            record
        })
        .collect()
}

/// Reconcile `incoming` against what the store already holds and persist
/// each record independently.
///
/// A failing insert is recorded in the summary and the loop moves on.
/// Listing the existing records is the only step whose failure aborts the
/// whole batch, since nothing can be reconciled without it.
pub fn import_records<S, R>(store: &S, incoming: Vec<R>) -> ImportSummary
where
    S: RecordStore,
    R: PortableRecord,
{
    import_records_with(store, incoming, Ok)
}

/// Like [`import_records`], with a per-record `prepare` step run before
/// reconciliation. A record rejected by `prepare` counts as failed and is
/// not stored.
pub fn import_records_with<S, R, P>(store: &S, incoming: Vec<R>, prepare: P) -> ImportSummary
where
    S: RecordStore,
    R: PortableRecord,
    P: Fn(R) -> Result<R, String>,
{
    let total = incoming.len();
    let mut summary = ImportSummary {
        section: R::SECTION.to_string(),
        ..Default::default()
    };

    let existing: Vec<R> = match store.list_records() {
        Ok(records) => records,
        Err(e) => {
            log::warn!("Could not list existing {}: {}", R::SECTION, e);
            summary.failed = total;
            summary.errors = incoming
                .iter()
                .enumerate()
                .map(|(index, record)| ReconciliationError {
                    index,
                    name: record.name().to_string(),
                    reason: e.to_string(),
                })
                .collect();
            return summary;
        }
    };

    let mut positions = Vec::with_capacity(total);
    let mut originals = Vec::with_capacity(total);
    let mut accepted = Vec::with_capacity(total);
    for (index, record) in incoming.into_iter().enumerate() {
        let name = record.name().to_string();
        match prepare(record) {
            Ok(record) => {
                positions.push(index);
                originals.push(record.name().to_string());
                accepted.push(record);
            }
            Err(reason) => {
                log::warn!("Rejected {} {:?}: {}", R::SECTION, name, reason);
                summary.failed += 1;
                summary.errors.push(ReconciliationError { index, name, reason });
            }
        }
    }

    let adjusted = reconcile(accepted, &existing);

    for (slot, record) in adjusted.iter().enumerate() {
        if record.name() != originals[slot] {
            summary.renamed += 1;
        }

        match store.add_record(record) {
            Ok(id) => {
                summary.imported += 1;
                log::debug!("Imported {} {:?} as {}", R::SECTION, record.name(), id);
            }
            Err(e) => {
                log::warn!("Failed to import {} {:?}: {}", R::SECTION, record.name(), e);
                summary.failed += 1;
                summary.errors.push(ReconciliationError {
                    index: positions[slot],
                    name: record.name().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    summary.errors.sort_by_key(|e| e.index);

    log::info!(
        "Imported {} of {} {} ({} renamed, {} failed)",
        summary.imported,
        total,
        R::SECTION,
        summary.renamed,
        summary.failed
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ModelConfig, PromptItem, RecordId};
    use crate::store::{SqliteStore, StoreError, StoreResult};
    use std::cell::RefCell;

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_lowercase()).collect()
    }

    fn prompt(title: &str) -> PromptItem {
        PromptItem {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unique_name_scenario() {
        assert_eq!(unique_name("Alpha", &taken(&["Alpha", "Alpha-1"])), "Alpha-2");
        assert_eq!(unique_name("Beta", &taken(&["Alpha"])), "Beta");
    }

    #[test]
    fn test_unique_name_is_case_insensitive() {
        assert_eq!(unique_name("alpha", &taken(&["ALPHA"])), "alpha-1");
        assert_eq!(unique_name("Alpha", &taken(&["alpha", "ALPHA-1"])), "Alpha-2");
    }

    #[test]
    fn test_reconcile_clears_ids_and_dedupes_within_batch() {
        let existing = vec![prompt("Alpha")];
        let mut a = prompt("Alpha");
        a.id = Some(7);
        let incoming = vec![a, prompt("alpha"), prompt("Gamma"), prompt("Gamma")];

        let adjusted = reconcile(incoming, &existing);
        let titles: Vec<&str> = adjusted.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha-1", "alpha-2", "Gamma", "Gamma-1"]);
        assert!(adjusted.iter().all(|r| r.id.is_none()));

        let mut all: HashSet<String> = existing.iter().map(|r| r.title.to_lowercase()).collect();
        for r in &adjusted {
            assert!(all.insert(r.title.to_lowercase()), "duplicate {}", r.title);
        }
    }

    #[test]
    fn test_reconcile_only_touches_the_display_name() {
        let existing = vec![prompt("Draft")];
        let incoming = vec![PromptItem {
            title: "Draft".to_string(),
            content: "Write a draft of {topic}".to_string(),
            category: "writing".to_string(),
            ..Default::default()
        }];

        let adjusted = reconcile(incoming, &existing);
        assert_eq!(adjusted[0].title, "Draft-1");
        assert_eq!(adjusted[0].content, "Write a draft of {topic}");
        assert_eq!(adjusted[0].category, "writing");
    }

    #[test]
    fn test_import_records_into_sqlite() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.add_record(&prompt("Alpha")).unwrap();
        store.add_record(&prompt("Alpha-1")).unwrap();

        let summary = import_records(&store, vec![prompt("Alpha"), prompt("Delta")]);
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.renamed, 1);
        assert_eq!(summary.failed, 0);

        let titles: Vec<String> = store
            .list_records::<PromptItem>()
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Alpha", "Alpha-1", "Alpha-2", "Delta"]);
    }

    /// Store that rejects records whose name contains "bad"
    struct FlakyStore {
        inner: SqliteStore,
        attempts: RefCell<usize>,
    }

    impl RecordStore for FlakyStore {
        fn add_record<R: PortableRecord>(&self, record: &R) -> StoreResult<RecordId> {
            *self.attempts.borrow_mut() += 1;
            if record.name().contains("bad") {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.add_record(record)
        }

        fn list_records<R: PortableRecord>(&self) -> StoreResult<Vec<R>> {
            self.inner.list_records()
        }

        fn delete_record<R: PortableRecord>(&self, id: RecordId) -> StoreResult<()> {
            self.inner.delete_record::<R>(id)
        }

        fn count_records<R: PortableRecord>(&self) -> StoreResult<usize> {
            self.inner.count_records::<R>()
        }
    }

    #[test]
    fn test_import_continues_after_failure() {
        let store = FlakyStore {
            inner: SqliteStore::open_in_memory().unwrap(),
            attempts: RefCell::new(0),
        };

        let incoming = vec![
            ModelConfig {
                name: "good one".to_string(),
                ..Default::default()
            },
            ModelConfig {
                name: "bad one".to_string(),
                ..Default::default()
            },
            ModelConfig {
                name: "good two".to_string(),
                ..Default::default()
            },
        ];

        let summary = import_records(&store, incoming);
        assert_eq!(*store.attempts.borrow(), 3);
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors[0].index, 1);
        assert_eq!(summary.errors[0].name, "bad one");
        assert!(summary.errors[0].reason.contains("disk full"));
        assert_eq!(store.count_records::<ModelConfig>().unwrap(), 2);
    }

    #[test]
    fn test_prepare_rejections_keep_original_index() {
        let store = SqliteStore::open_in_memory().unwrap();
        let incoming = vec![prompt("Keep"), prompt(""), prompt("Keep")];

        let summary = import_records_with(&store, incoming, |p: PromptItem| {
            if p.title.is_empty() {
                Err("missing title".to_string())
            } else {
                Ok(p)
            }
        });

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.renamed, 1);
        assert_eq!(summary.errors[0].index, 1);
        assert_eq!(summary.errors[0].reason, "missing title");
    }
}
