pub mod config;
pub mod error;
pub mod reconcile;
pub mod source;
pub mod storage;
pub mod types;

pub use config::FetchConfig;
pub use error::{Error, Result};
pub use reconcile::{diff_notices, Reconciler};
pub use source::{NoticeSource, SourceMetadata};
pub use storage::SnapshotStore;
pub use types::{ChangeStatus, Notice, NoticeList, ReconcileReport, SnapshotState};
