use crate::types::{Notice, SnapshotState};
use crate::Result;

pub trait SnapshotStore: Send + Sync {
    /// Inspect the snapshot without collapsing "absent" into "empty"
    fn probe(&self) -> Result<SnapshotState>;

    /// Load the stored notices; an absent or blank snapshot is an empty list
    fn load(&self) -> Result<Vec<Notice>> {
        Ok(self.probe()?.into_notices())
    }

    /// Replace the stored notices
    fn store(&self, notices: &[Notice]) -> Result<()>;
}
