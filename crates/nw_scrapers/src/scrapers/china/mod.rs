use nw_core::NoticeSource;
use crate::scrapers::SourceFactory;

pub mod cdu;

pub use cdu::CduScraper;

pub(crate) const REGION: &str = "china";

fn cdu() -> Box<dyn NoticeSource> {
    Box::new(CduScraper::new())
}

/// Returns factories for all available Chinese course-office sources
pub fn get_source_factories() -> Vec<SourceFactory> {
    vec![cdu as SourceFactory]
}
