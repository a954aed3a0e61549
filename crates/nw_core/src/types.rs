use serde::{Deserialize, Serialize};
use std::fmt;

/// A single announcement: title and absolute link on one line.
///
/// Two notices are the same notice only if their text is byte-for-byte equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Notice(String);

impl Notice {
    /// Wraps an already-formatted line as found in a snapshot file.
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    /// Builds a notice from a scraped title and its resolved link.
    ///
    /// Whitespace runs inside the title (including line breaks) collapse to a
    /// single space so the notice always fits on one snapshot line. A blank
    /// title leaves just the link; the result never starts or ends with
    /// whitespace.
    pub fn from_parts(title: &str, link: &str) -> Self {
        let line = title
            .split_whitespace()
            .chain(std::iter::once(link.trim()))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self(line)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Notice {
    fn from(line: &str) -> Self {
        Self::new(line)
    }
}

impl From<String> for Notice {
    fn from(line: String) -> Self {
        Self::new(line)
    }
}

/// Ordered notices, most recent first.
pub type NoticeList = Vec<Notice>;

/// What a snapshot location held when it was probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotState {
    /// No file at the snapshot path.
    Absent,
    /// A file exists but holds only whitespace.
    Empty,
    Present(NoticeList),
}

impl SnapshotState {
    pub fn into_notices(self) -> NoticeList {
        match self {
            SnapshotState::Absent | SnapshotState::Empty => Vec::new(),
            SnapshotState::Present(notices) => notices,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    /// There was no prior snapshot; every fetched notice is new.
    FirstRun,
    Changed,
    Unchanged,
}

/// Outcome of reconciling a fetched list against the stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub status: ChangeStatus,
    /// Deduplicated notices considered new or modified, in first-seen order.
    pub changed: NoticeList,
    /// Number of notices in the snapshot before this run.
    pub previous: usize,
    /// Number of notices written back to the snapshot.
    pub current: usize,
}

impl ReconcileReport {
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }
}
