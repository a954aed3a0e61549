use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Snapshot at {} is unreadable: {source}", path.display())]
    SnapshotUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write snapshot at {}: {source}", path.display())]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid notice: {0}")]
    InvalidNotice(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Process exit code for a run that aborted with this error.
    ///
    /// `2` for anything that went wrong while fetching or parsing the page,
    /// `3` for snapshot persistence, `1` for the rest.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Http(_) | Error::InvalidUrl(_) | Error::Scraping(_) => 2,
            Error::SnapshotUnreadable { .. } | Error::SnapshotWrite { .. } | Error::InvalidNotice(_) => 3,
            Error::Config(_) | Error::Serialization(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
