use async_trait::async_trait;
use crate::config::FetchConfig;
use crate::types::Notice;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMetadata {
    pub name: &'static str,
    pub emoji: &'static str,
    /// Registry group, the first half of a `region/name` source spec
    pub region: &'static str,
    /// Homepage fetched when no URL is configured
    pub default_url: &'static str,
}

#[async_trait]
pub trait NoticeSource: Send + Sync {
    /// Returns the name, region and homepage of the source
    fn source_metadata(&self) -> SourceMetadata;

    /// Returns a list of CLI shorthand names for this source
    fn cli_names(&self) -> Vec<&str> {
        vec![]
    }

    /// Fetches the current announcements, most recent first
    async fn fetch_notices(&self, config: &FetchConfig) -> Result<Vec<Notice>>;
}
