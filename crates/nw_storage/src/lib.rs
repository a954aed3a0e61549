use nw_core::config::default_snapshot_path;
use std::path::PathBuf;

pub mod backends;

pub use backends::*;

/// Store at `path`, or at `send_notice/notice.txt` under the working directory.
pub fn open_store(path: Option<PathBuf>) -> FileSnapshotStore {
    FileSnapshotStore::new(path.unwrap_or_else(default_snapshot_path))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::open_store;
    pub use nw_core::SnapshotStore;
}
