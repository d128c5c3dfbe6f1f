//! Command-line entry point for the omniscience odds analytics.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use omni_core::Config;
use omni_ingestion::{parse_splits_feed, BlockMode, FeedParser};
use omni_signals::Session;

/// Parse sportsbook odds feeds and score line movement.
#[derive(Parser, Debug)]
#[command(name = "omni")]
#[command(about = "Odds feed parsing, indicators and recommendations")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Block grouping: 5line, 4line or auto. Auto groups in fours while
    /// the 4-line grammar is enabled.
    #[arg(long, global = true, default_value = "5line")]
    mode: BlockMode,

    /// JSON configuration file; unset fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse one odds feed and print the report.
    Parse {
        /// Feed text file.
        feed: PathBuf,
    },

    /// Parse blank-line separated splits blocks.
    Splits {
        /// Splits text file.
        file: PathBuf,
    },

    /// Ingest snapshots in order and recommend on the last one's games.
    Recommend {
        /// Feed snapshots, oldest first.
        #[arg(required = true)]
        snapshots: Vec<PathBuf>,

        /// Minutes between consecutive snapshots.
        #[arg(long, default_value = "5")]
        interval_minutes: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("omni=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Parse { feed } => cmd_parse(&config, &feed, args.mode),
        Command::Splits { file } => cmd_splits(&file),
        Command::Recommend {
            snapshots,
            interval_minutes,
        } => cmd_recommend(config, &snapshots, args.mode, interval_minutes),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse one feed.
fn cmd_parse(config: &Config, feed: &Path, mode: BlockMode) -> anyhow::Result<()> {
    let text = read_text(feed)?;
    let report = FeedParser::new(config.parser.clone()).parse(&text, mode);
    print_json(&report)
}

/// Parse a splits file.
fn cmd_splits(file: &Path) -> anyhow::Result<()> {
    let text = read_text(file)?;
    print_json(&parse_splits_feed(&text, Utc::now()))
}

/// Replay snapshots through one session.
fn cmd_recommend(
    config: Config,
    snapshots: &[PathBuf],
    mode: BlockMode,
    interval_minutes: u32,
) -> anyhow::Result<()> {
    let mut session = Session::new(config).context("invalid configuration")?;

    // The last snapshot is stamped now; earlier ones step back by the interval.
    let step = Duration::minutes(i64::from(interval_minutes));
    let steps_back = i32::try_from(snapshots.len().saturating_sub(1))?;
    let mut ts = Utc::now() - step * steps_back;

    let mut last = None;
    for path in snapshots {
        let text = read_text(path)?;
        let outcome = session.ingest_and_recommend_at(&text, mode, ts);
        info!(
            snapshot = %path.display(),
            games = outcome.report.accepted.len(),
            skipped = outcome.report.skipped.len(),
            "Ingested snapshot"
        );
        last = Some(outcome);
        ts += step;
    }

    let Some(outcome) = last else {
        bail!("no snapshots given");
    };
    print_json(&outcome.recommendations)
}
