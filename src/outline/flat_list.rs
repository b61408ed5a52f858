//! Operations on the persisted form of an outline: a flat heading list
//! ordered by `order_index`.
//!
//! Nothing here looks at `parent_id` to decide structure. Descendants are
//! found by scanning forward from a heading while the level stays deeper,
//! which works for lists whose explicit parent links were never filled in.

use std::collections::{BTreeSet, HashSet};

use super::errors::{OutlineError, OutlineResult};
use super::models::{HeadingId, HeadingNode};

/// Result of a cascading removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// Surviving headings, renumbered from 1
    pub remaining: Vec<HeadingNode>,
    /// Every heading that was dropped, selected or reached
    pub removed: BTreeSet<HeadingId>,
}

/// Stable sort by order index
pub fn sort_by_order(headings: &mut [HeadingNode]) {
    headings.sort_by_key(|h| h.order_index);
}

/// Sort and reassign order indices contiguously starting at 1
pub fn renumber(headings: &mut [HeadingNode]) {
    sort_by_order(headings);
    for (i, heading) in headings.iter_mut().enumerate() {
        heading.order_index = i as u32 + 1;
    }
}

/// Validate a heading list coming from a parser or an import and repair
/// what can be repaired.
///
/// Rejected: duplicate ids, level 0, a heading naming itself as parent.
/// Repaired: ordering gaps and ties (stable sort, then renumber from 1).
/// Parent ids that point forward or nowhere are kept as-is; the tree
/// builder turns those headings into roots.
pub fn normalize(mut headings: Vec<HeadingNode>) -> OutlineResult<Vec<HeadingNode>> {
    let mut seen = HashSet::with_capacity(headings.len());
    for heading in &headings {
        if !seen.insert(heading.id) {
            return Err(OutlineError::DuplicateId(heading.id));
        }
        if heading.level == 0 {
            return Err(OutlineError::InvalidLevel {
                id: heading.id,
                level: heading.level,
            });
        }
        if heading.parent_id == Some(heading.id) {
            return Err(OutlineError::SelfParent(heading.id));
        }
    }

    renumber(&mut headings);
    Ok(headings)
}

/// Collect `target` and every heading below it.
///
/// Walks forward in order-index order from the target while the next
/// heading's level is strictly greater than the target's level, and stops
/// at the first heading at the same level or shallower.
pub fn collect_descendants(
    headings: &[HeadingNode],
    target: HeadingId,
) -> OutlineResult<BTreeSet<HeadingId>> {
    let mut ordered: Vec<&HeadingNode> = headings.iter().collect();
    ordered.sort_by_key(|h| h.order_index);

    let start = ordered
        .iter()
        .position(|h| h.id == target)
        .ok_or(OutlineError::NotFound(target))?;

    Ok(scan_subtree(&ordered, start))
}

fn scan_subtree(ordered: &[&HeadingNode], start: usize) -> BTreeSet<HeadingId> {
    let base_level = ordered[start].level;
    let mut found = BTreeSet::new();
    found.insert(ordered[start].id);

    // Every deeper heading reached before the boundary belongs to the
    // target either directly or through one of its own deeper descendants.
    for heading in &ordered[start + 1..] {
        if heading.level <= base_level {
            break;
        }
        found.insert(heading.id);
    }

    found
}

/// Remove the selected headings and everything below each of them.
///
/// The removal set is the union of [`collect_descendants`] over the
/// selection. Survivors are renumbered once, and explicit parent links
/// that pointed at a removed heading are cleared.
pub fn cascade_remove(headings: &[HeadingNode], selected: &[HeadingId]) -> OutlineResult<Removal> {
    let mut ordered: Vec<&HeadingNode> = headings.iter().collect();
    ordered.sort_by_key(|h| h.order_index);

    let mut removed = BTreeSet::new();
    for &id in selected {
        if removed.contains(&id) {
            continue;
        }
        let start = ordered
            .iter()
            .position(|h| h.id == id)
            .ok_or(OutlineError::NotFound(id))?;
        removed.extend(scan_subtree(&ordered, start));
    }

    let mut remaining: Vec<HeadingNode> = ordered
        .into_iter()
        .filter(|h| !removed.contains(&h.id))
        .cloned()
        .collect();

    for heading in &mut remaining {
        if heading.parent_id.is_some_and(|p| removed.contains(&p)) {
            heading.parent_id = None;
        }
    }
    renumber(&mut remaining);

    log::info!(
        "Removed {} heading(s) from {} selected, {} remain",
        removed.len(),
        selected.len(),
        remaining.len()
    );

    Ok(Removal { remaining, removed })
}
