pub mod scrapers;
pub mod cli;
pub mod logging;
pub mod manager;

pub use manager::NoticeWatcher;

pub use cli::{WatchArgs, WatchCommands, handle_command};
pub use scrapers::{get_source_factories, SourceFactory};

pub mod prelude {
    pub use super::manager::NoticeWatcher;
    pub use nw_core::{Notice, NoticeSource, ReconcileReport, Result, Error};
}
