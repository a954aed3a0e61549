use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::{Error, Result};

pub const DEFAULT_URL: &str = "https://jw.cdu.edu.cn/";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36 Edg/138.0.0.0";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_SNAPSHOT_PATH: &str = "send_notice/notice.txt";

/// Everything the fetcher needs for one request.
///
/// Built once at startup and handed to the source at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Leading list entries to ignore (the first item is pinned on the homepage)
    pub skip: usize,
    /// Entries kept after skipping
    pub take: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            skip: 1,
            take: 2,
        }
    }
}

impl FetchConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.url).map_err(|e| Error::InvalidUrl(format!("{}: {}", self.url, e)))
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }
        if self.take == 0 {
            return Err(Error::Config("at least one notice must be taken".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(Error::Config("user agent must not be empty".to_string()));
        }
        Ok(())
    }
}

pub fn default_snapshot_path() -> PathBuf {
    PathBuf::from(DEFAULT_SNAPSHOT_PATH)
}
