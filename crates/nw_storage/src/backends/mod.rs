pub mod file;

pub use file::FileSnapshotStore;
