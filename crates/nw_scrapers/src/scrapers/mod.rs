use nw_core::{Error, FetchConfig, NoticeSource, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use tracing::debug;
use url::Url;

pub mod china;

pub use china::CduScraper;

pub type SourceFactory = fn() -> Box<dyn NoticeSource>;

/// Returns a factory for every registered source
pub fn get_source_factories() -> Vec<SourceFactory> {
    china::get_source_factories()
}

/// Builds an HTTP client carrying the configured headers and timeout
pub(crate) fn build_client(config: &FetchConfig) -> Result<reqwest::Client> {
    let user_agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|e| Error::Config(format!("Invalid user agent: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, user_agent);
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"));

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .build()?)
}

/// GETs the configured page and returns its body
pub(crate) async fn fetch_page(config: &FetchConfig) -> Result<String> {
    let url = config.base_url()?;
    let client = build_client(config)?;

    let response = client.get(url.clone()).send().await?;
    debug!("GET {} -> {}", url, response.status());
    let response = response.error_for_status()?;

    Ok(response.text().await?)
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use super::*;

    /// Resolves a possibly relative `href` against the page it was found on
    pub fn resolve_link(base: &Url, href: &str) -> Result<String> {
        base.join(href.trim())
            .map(String::from)
            .map_err(|e| Error::InvalidUrl(format!("{} (relative to {}): {}", href, base, e)))
    }
}
