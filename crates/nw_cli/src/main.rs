use clap::Parser;
use nw_scrapers::cli::{handle_command, WatchArgs};
use nw_scrapers::logging::{init_logging, level_from_verbosity, Logger};
use nw_scrapers::prelude::Error;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "nw", author, version, about = "Report new announcements on a course-office homepage", long_about = None)]
pub struct Cli {
    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    #[command(flatten)]
    watch: WatchArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let logger = init_logging(level_from_verbosity(cli.verbose, cli.quiet)).with_prefix("[nw]".to_string());

    if let Ok(cwd) = std::env::current_dir() {
        logger.debug(&format!("working directory: {}", cwd.display()));
    }

    match handle_command(cli.watch).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(abort(&logger, &e)),
    }
}

/// The error is reported once, through the log on stderr.
fn abort(logger: &Logger, e: &Error) -> u8 {
    logger.error(&format!("Run aborted: {}", e));
    e.exit_code()
}
