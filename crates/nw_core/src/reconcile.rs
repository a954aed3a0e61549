//! Diffing a freshly fetched notice list against the stored snapshot.
//!
//! Positions matter: the homepage lists notices most recent first, so a notice
//! that moved is reported just like one that changed.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::storage::SnapshotStore;
use crate::types::{ChangeStatus, Notice, ReconcileReport};
use crate::Result;

/// Notices in `new` that count as new or modified relative to `old`.
///
/// * an empty `old` makes every entry of `new` new;
/// * identical lists yield nothing;
/// * otherwise the overlapping prefix is compared position by position and
///   entries appended past the end of `old` are added;
/// * when the list shrank and some surviving position changed, the whole of
///   `new` is reported instead of the mismatched positions alone;
/// * a list that only lost trailing entries yields nothing.
///
/// The result keeps first-seen order and holds each notice once.
pub fn diff_notices(old: &[Notice], new: &[Notice]) -> Vec<Notice> {
    if old.is_empty() {
        return dedup(new.iter());
    }
    if old == new {
        return Vec::new();
    }

    let overlap = old.len().min(new.len());
    let mut changed: Vec<&Notice> = old[..overlap]
        .iter()
        .zip(&new[..overlap])
        .filter(|(before, after)| before != after)
        .map(|(_, after)| after)
        .collect();

    if new.len() > old.len() {
        changed.extend(&new[old.len()..]);
    } else if old.len() > new.len() && !changed.is_empty() {
        debug!(
            "list shrank from {} to {} with changed entries, reporting all",
            old.len(),
            new.len()
        );
        changed = new.iter().collect();
    }

    dedup(changed.into_iter())
}

fn dedup<'a>(notices: impl Iterator<Item = &'a Notice>) -> Vec<Notice> {
    let mut seen = HashSet::new();
    notices
        .filter(|notice| seen.insert(*notice))
        .cloned()
        .collect()
}

/// Loads the previous snapshot, diffs it and writes the new list back.
pub struct Reconciler<'a> {
    store: &'a dyn SnapshotStore,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a dyn SnapshotStore) -> Self {
        Self { store }
    }

    /// Reconcile `new_notices` against the store.
    ///
    /// The snapshot is rewritten on every successful call, including when
    /// nothing changed. Load and store failures are returned as-is.
    pub fn reconcile(&self, new_notices: &[Notice]) -> Result<ReconcileReport> {
        let old_notices = self.store.load()?;
        debug!("loaded {} stored notices", old_notices.len());

        let changed = diff_notices(&old_notices, new_notices);
        let status = if changed.is_empty() {
            ChangeStatus::Unchanged
        } else if old_notices.is_empty() {
            ChangeStatus::FirstRun
        } else {
            ChangeStatus::Changed
        };

        self.store.store(new_notices)?;
        info!(
            "snapshot updated: {} -> {} notices, {} changed",
            old_notices.len(),
            new_notices.len(),
            changed.len()
        );

        Ok(ReconcileReport {
            status,
            changed,
            previous: old_notices.len(),
            current: new_notices.len(),
        })
    }
}
