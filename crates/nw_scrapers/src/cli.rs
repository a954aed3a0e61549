use clap::{Args, Subcommand};
use nw_core::config::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use nw_core::{ChangeStatus, Error, FetchConfig, Notice, NoticeSource, ReconcileReport, Result, SnapshotState};
use nw_storage::open_store;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::manager::NoticeWatcher;
use crate::scrapers::{get_source_factories, SourceFactory};

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Source to watch, as region/name (e.g. china/cdu) or just the name
    #[arg(long, default_value = "china/cdu")]
    pub source: String,

    /// Page to fetch instead of the source's homepage
    #[arg(long, env = "NW_URL")]
    pub url: Option<String>,

    /// User-Agent header sent with the request
    #[arg(long, env = "NW_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Request timeout in seconds
    #[arg(long, env = "NW_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Snapshot file [default: send_notice/notice.txt]
    #[arg(long, env = "NW_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<WatchCommands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum WatchCommands {
    /// Fetch the homepage, report new or changed notices and update the snapshot
    Check,
    /// Fetch and print the current notices without updating the snapshot
    Fetch,
    /// Print the stored snapshot
    Show,
    /// List available sources
    List,
}

pub async fn handle_command(args: WatchArgs) -> Result<()> {
    match args.command.clone().unwrap_or(WatchCommands::Check) {
        WatchCommands::Check => {
            let (watcher, _) = build_watcher(&args)?;
            let report = watcher.check().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report));
            }
        }
        WatchCommands::Fetch => {
            let (watcher, _) = build_watcher(&args)?;
            let notices = watcher.fetch().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&notices)?);
            } else {
                print!("{}", render_notices(&notices));
            }
        }
        WatchCommands::Show => {
            let (watcher, snapshot_path) = build_watcher(&args)?;
            let state = watcher.snapshot()?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&snapshot_json(&snapshot_path, &state))?);
            } else {
                print!("{}", render_snapshot(&snapshot_path, &state));
            }
        }
        WatchCommands::List => print!("{}", render_sources(&get_source_factories())),
    }
    Ok(())
}

fn build_watcher(args: &WatchArgs) -> Result<(NoticeWatcher, PathBuf)> {
    let source = get_source(&args.source)?;
    let config = fetch_config(args, source.as_ref())?;
    let store = open_store(args.snapshot.clone());
    let snapshot_path = store.path().to_path_buf();
    Ok((NoticeWatcher::new(source, Box::new(store), config), snapshot_path))
}

/// Builds the fetch configuration, falling back to the source's homepage
pub fn fetch_config(args: &WatchArgs, source: &dyn NoticeSource) -> Result<FetchConfig> {
    let url = args
        .url
        .clone()
        .unwrap_or_else(|| source.source_metadata().default_url.to_string());
    let config = FetchConfig::default()
        .with_url(url)
        .with_user_agent(args.user_agent.clone())
        .with_timeout(Duration::from_secs(args.timeout));
    config.validate()?;
    Ok(config)
}

fn parse_source(source: &str) -> (Option<&str>, &str) {
    match source.split_once('/') {
        Some((region, name)) => (Some(region), name),
        None => (None, source),
    }
}

fn get_source(source: &str) -> Result<Box<dyn NoticeSource>> {
    let (region, name) = parse_source(source);
    let name = name.to_lowercase();

    get_source_factories()
        .iter()
        .map(|factory| factory())
        .find(|s| {
            region.map_or(true, |r| s.source_metadata().region == r) && s.cli_names().contains(&name.as_str())
        })
        .ok_or_else(|| Error::Config(format!("Source not found: {}", source)))
}

pub fn render_report(report: &ReconcileReport) -> String {
    match report.status {
        ChangeStatus::FirstRun => format!(
            "First run, recorded {} notices:\n{}",
            report.changed.len(),
            render_notices(&report.changed)
        ),
        ChangeStatus::Changed => format!("New or changed notices:\n{}", render_notices(&report.changed)),
        ChangeStatus::Unchanged => "No change\n".to_string(),
    }
}

fn render_notices(notices: &[Notice]) -> String {
    notices.iter().map(|n| format!("{}\n", n)).collect()
}

fn render_snapshot(path: &Path, state: &SnapshotState) -> String {
    match state {
        SnapshotState::Absent => format!("No snapshot at {}\n", path.display()),
        SnapshotState::Empty => format!("Snapshot at {} is empty\n", path.display()),
        SnapshotState::Present(notices) => render_notices(notices),
    }
}

fn snapshot_json(path: &Path, state: &SnapshotState) -> serde_json::Value {
    let kind = match state {
        SnapshotState::Absent => "absent",
        SnapshotState::Empty => "empty",
        SnapshotState::Present(_) => "present",
    };
    let notices: &[Notice] = match state {
        SnapshotState::Present(notices) => notices,
        _ => &[],
    };
    serde_json::json!({
        "path": path.display().to_string(),
        "state": kind,
        "notices": notices,
    })
}

fn render_sources(factories: &[SourceFactory]) -> String {
    let mut by_region: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for factory in factories {
        let source = factory();
        let meta = source.source_metadata();
        let name = source.cli_names().first().copied().unwrap_or(meta.name).to_string();
        by_region.entry(meta.region).or_default().push(format!(
            "  - {} {} ({}/{}) {}",
            meta.emoji, meta.name, meta.region, name, meta.default_url
        ));
    }

    let mut out = String::from("Available sources:\n");
    for (region, lines) in by_region {
        out.push_str(&format!("{}:\n", region));
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}
