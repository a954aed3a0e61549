use nw_core::{
    ChangeStatus, FetchConfig, Notice, NoticeSource, Reconciler, ReconcileReport, Result, SnapshotState,
    SnapshotStore,
};

use crate::logging::Logger;

/// One source, one snapshot: fetches the homepage and reconciles it.
pub struct NoticeWatcher {
    source: Box<dyn NoticeSource>,
    store: Box<dyn SnapshotStore>,
    config: FetchConfig,
    logger: Logger,
}

impl NoticeWatcher {
    pub fn new(source: Box<dyn NoticeSource>, store: Box<dyn SnapshotStore>, config: FetchConfig) -> Self {
        let meta = source.source_metadata();
        let logger = Logger::new()
            .with_prefix(meta.emoji.to_string())
            .with_prefix(format!("[{}]", meta.name));
        Self {
            source,
            store,
            config,
            logger,
        }
    }

    /// Fetches the current notices without touching the snapshot
    pub async fn fetch(&self) -> Result<Vec<Notice>> {
        self.logger.info(&format!("Fetching {}", self.config.url));
        match self.source.fetch_notices(&self.config).await {
            Ok(notices) => {
                for (i, notice) in notices.iter().enumerate() {
                    self.logger.debug(&format!("notice[{}]: {}", i, notice));
                }
                self.logger.info(&format!("Fetched {} notices", notices.len()));
                Ok(notices)
            }
            Err(e) => {
                self.logger.error(&format!("Fetch failed: {}", e));
                Err(e)
            }
        }
    }

    /// Fetches, reconciles against the snapshot and rewrites it
    pub async fn check(&self) -> Result<ReconcileReport> {
        let notices = self.fetch().await?;
        let report = Reconciler::new(self.store.as_ref()).reconcile(&notices)?;

        match report.status {
            ChangeStatus::FirstRun => self.logger.info(&format!("First run, recorded {} notices", report.current)),
            ChangeStatus::Changed => self.logger.info(&format!("{} notices changed", report.changed.len())),
            ChangeStatus::Unchanged if report.current < report.previous => self.logger.warn(&format!(
                "Notice list shrank from {} to {} entries",
                report.previous, report.current
            )),
            ChangeStatus::Unchanged => self.logger.info("No change"),
        }

        Ok(report)
    }

    /// Reports what the snapshot currently holds
    pub fn snapshot(&self) -> Result<SnapshotState> {
        self.store.probe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nw_core::{Error, SourceMetadata};
    use nw_storage::FileSnapshotStore;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Serves queued fetch results in order.
    struct ScriptedSource {
        pages: Mutex<Vec<Result<Vec<Notice>>>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Result<Vec<Notice>>>) -> Self {
            Self {
                pages: Mutex::new(pages.into_iter().rev().collect()),
            }
        }
    }

    #[async_trait]
    impl NoticeSource for ScriptedSource {
        fn source_metadata(&self) -> SourceMetadata {
            SourceMetadata {
                name: "scripted",
                emoji: "🧪",
                region: "test",
                default_url: "http://localhost/",
            }
        }

        async fn fetch_notices(&self, _config: &FetchConfig) -> Result<Vec<Notice>> {
            self.pages
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(Error::Scraping("no more pages".to_string())))
        }
    }

    fn notices(lines: &[&str]) -> Vec<Notice> {
        lines.iter().map(|l| Notice::from(*l)).collect()
    }

    #[tokio::test]
    async fn test_check_sequence() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("send_notice").join("notice.txt");
        let source = ScriptedSource::new(vec![
            Ok(notices(&["a", "b"])),
            Ok(notices(&["a", "b"])),
            Ok(notices(&["c", "a"])),
        ]);
        let watcher = NoticeWatcher::new(
            Box::new(source),
            Box::new(FileSnapshotStore::new(&path)),
            FetchConfig::default(),
        );

        let first = watcher.check().await.unwrap();
        assert_eq!(first.status, ChangeStatus::FirstRun);
        assert_eq!(first.changed, notices(&["a", "b"]));

        let second = watcher.check().await.unwrap();
        assert_eq!(second.status, ChangeStatus::Unchanged);

        let third = watcher.check().await.unwrap();
        assert_eq!(third.status, ChangeStatus::Changed);
        assert_eq!(third.changed, notices(&["c", "a"]));
        assert_eq!(watcher.snapshot().unwrap(), SnapshotState::Present(notices(&["c", "a"])));
    }

    #[tokio::test]
    async fn test_blank_title_is_stable_across_runs() {
        let temp_dir = tempdir().unwrap();
        let page = vec![
            Notice::from_parts("", "https://jw.cdu.edu.cn/info/1011/2.htm"),
            Notice::from_parts("third", "https://jw.cdu.edu.cn/info/1011/3.htm"),
        ];
        let source = ScriptedSource::new(vec![Ok(page.clone()), Ok(page.clone())]);
        let watcher = NoticeWatcher::new(
            Box::new(source),
            Box::new(FileSnapshotStore::new(temp_dir.path().join("notice.txt"))),
            FetchConfig::default(),
        );

        assert_eq!(watcher.check().await.unwrap().status, ChangeStatus::FirstRun);
        let second = watcher.check().await.unwrap();
        assert_eq!(second.status, ChangeStatus::Unchanged);
        assert!(second.changed.is_empty());
        assert_eq!(watcher.snapshot().unwrap(), SnapshotState::Present(page));
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_snapshot_alone() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("notice.txt");
        std::fs::write(&path, "a\nb").unwrap();
        let source = ScriptedSource::new(vec![Err(Error::Scraping("missing entries".to_string()))]);
        let watcher = NoticeWatcher::new(
            Box::new(source),
            Box::new(FileSnapshotStore::new(&path)),
            FetchConfig::default(),
        );

        let err = watcher.check().await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb");
    }

    #[tokio::test]
    async fn test_fetch_does_not_write() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("notice.txt");
        let source = ScriptedSource::new(vec![Ok(notices(&["a"]))]);
        let watcher = NoticeWatcher::new(
            Box::new(source),
            Box::new(FileSnapshotStore::new(&path)),
            FetchConfig::default(),
        );

        assert_eq!(watcher.fetch().await.unwrap(), notices(&["a"]));
        assert_eq!(watcher.snapshot().unwrap(), SnapshotState::Absent);
    }
}
