use async_trait::async_trait;
use lazy_static::lazy_static;
use nw_core::{Error, FetchConfig, Notice, NoticeSource, Result, SourceMetadata};
use scraper::{Html, Selector};
use tracing::debug;

use super::REGION;
use crate::scrapers::{fetch_page, utils};

lazy_static! {
    static ref ENTRY_SELECTOR: Selector = Selector::parse("div.s1-r li > a").unwrap();
    static ref TITLE_SELECTOR: Selector = Selector::parse("h3").unwrap();
}

/// Course office (教务处) homepage of Chengdu University.
#[derive(Debug, Clone, Default)]
pub struct CduScraper;

impl CduScraper {
    pub fn new() -> Self {
        Self
    }

    const BASE_URL: &'static str = "https://jw.cdu.edu.cn/";

    /// Extracts notices from the announcement column of the homepage.
    ///
    /// Entries are the links under `div.s1-r` that carry an `h3` title. The
    /// first `config.skip` entries are dropped and the next `config.take` kept.
    pub fn parse_notices(html: &str, config: &FetchConfig) -> Result<Vec<Notice>> {
        let base = config.base_url()?;
        let document = Html::parse_document(html);

        let entries: Vec<(String, String)> = document
            .select(&ENTRY_SELECTOR)
            .filter_map(|link| {
                let title = link.select(&TITLE_SELECTOR).next()?.text().collect::<String>();
                let href = link.value().attr("href")?;
                Some((title, href.to_string()))
            })
            .collect();
        debug!("found {} announcement entries", entries.len());

        let needed = config.skip + config.take;
        if entries.len() < needed {
            return Err(Error::Scraping(format!(
                "Expected at least {} announcement entries on {}, found {}",
                needed,
                base,
                entries.len()
            )));
        }

        entries
            .into_iter()
            .skip(config.skip)
            .take(config.take)
            .map(|(title, href)| {
                let link = utils::resolve_link(&base, &href)?;
                Ok(Notice::from_parts(title.trim(), &link))
            })
            .collect()
    }
}

#[async_trait]
impl NoticeSource for CduScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "成都大学教务处",
            emoji: "🎓",
            region: REGION,
            default_url: Self::BASE_URL,
        }
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["cdu", "jw.cdu"]
    }

    async fn fetch_notices(&self, config: &FetchConfig) -> Result<Vec<Notice>> {
        let html = fetch_page(config).await?;
        Self::parse_notices(&html, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOMEPAGE: &str = r#"
        <html><body>
          <div class="s1-l"><ul><li><a href="news/1.htm"><h3>Campus news</h3></a></li></ul></div>
          <div class="s1-r">
            <ul>
              <li><a href="info/1011/9000.htm"><h3>置顶：教务处工作安排</h3></a></li>
              <li><a href=" info/1011/9102.htm "><h3>
                关于2025-2026学年第一学期期末考试安排的通知
              </h3><span>2025-12-01</span></a></li>
              <li><a href="/info/1011/9101.htm"><h3>关于开展本科教学检查的通知</h3></a></li>
              <li><a href="info/1011/9100.htm"><h3>older notice</h3></a></li>
              <li><a href="more.htm">更多</a></li>
            </ul>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_takes_second_and_third_entries() {
        let notices = CduScraper::parse_notices(HOMEPAGE, &FetchConfig::default()).unwrap();

        assert_eq!(
            notices,
            vec![
                Notice::from("关于2025-2026学年第一学期期末考试安排的通知 https://jw.cdu.edu.cn/info/1011/9102.htm"),
                Notice::from("关于开展本科教学检查的通知 https://jw.cdu.edu.cn/info/1011/9101.htm"),
            ]
        );
    }

    #[test]
    fn test_parse_honours_skip_and_take() {
        let config = FetchConfig { skip: 0, take: 4, ..FetchConfig::default() };
        let notices = CduScraper::parse_notices(HOMEPAGE, &config).unwrap();

        assert_eq!(notices.len(), 4);
        assert_eq!(notices[0].as_str(), "置顶：教务处工作安排 https://jw.cdu.edu.cn/info/1011/9000.htm");
        assert_eq!(notices[3].as_str(), "older notice https://jw.cdu.edu.cn/info/1011/9100.htm");
    }

    #[test]
    fn test_parse_blank_title_keeps_bare_link() {
        let page = r#"
            <div class="s1-r"><ul>
              <li><a href="info/1011/1.htm"><h3>first</h3></a></li>
              <li><a href="info/1011/2.htm"><h3>  </h3></a></li>
              <li><a href="info/1011/3.htm"><h3>third</h3></a></li>
            </ul></div>
        "#;
        let notices = CduScraper::parse_notices(page, &FetchConfig::default()).unwrap();

        assert_eq!(notices[0].as_str(), "https://jw.cdu.edu.cn/info/1011/2.htm");
        assert_eq!(notices[1].as_str(), "third https://jw.cdu.edu.cn/info/1011/3.htm");
    }

    #[test]
    fn test_parse_resolves_against_configured_url() {
        let config = FetchConfig::default().with_url("http://localhost:8080/jw/index.htm");
        let notices = CduScraper::parse_notices(HOMEPAGE, &config).unwrap();

        assert!(notices[0].as_str().ends_with(" http://localhost:8080/jw/info/1011/9102.htm"));
        assert!(notices[1].as_str().ends_with(" http://localhost:8080/info/1011/9101.htm"));
    }

    #[test]
    fn test_parse_fails_when_entries_missing() {
        let html = r#"<div class="s1-r"><ul><li><a href="a.htm"><h3>only one</h3></a></li></ul></div>"#;
        let result = CduScraper::parse_notices(html, &FetchConfig::default());

        match result {
            Err(Error::Scraping(message)) => assert!(message.contains("found 1")),
            other => panic!("expected scraping error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_fails_on_unrelated_page() {
        let result = CduScraper::parse_notices("<html><body>维护中</body></html>", &FetchConfig::default());
        assert!(matches!(result, Err(Error::Scraping(_))));
    }

    #[test]
    fn test_metadata() {
        let scraper = CduScraper::new();
        assert_eq!(scraper.source_metadata().default_url, "https://jw.cdu.edu.cn/");
        assert!(scraper.cli_names().contains(&"cdu"));
    }

    #[tokio::test]
    #[ignore = "requires network access to jw.cdu.edu.cn"]
    async fn test_fetch_live_homepage() {
        let scraper = CduScraper::new();
        let notices = scraper.fetch_notices(&FetchConfig::default()).await.unwrap();
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.as_str().contains("https://jw.cdu.edu.cn/")));
    }
}
