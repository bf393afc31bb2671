use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use colored::Colorize;
use otr_diff::compare_snapshots;
use otr_history::{FileHistoryStore, HistoryStore, SnapshotCache};
use otr_projection::{HistoryProjector, RenderOptions};
use otr_types::Document;
use tracing::info;

use crate::cli::*;
use crate::config::TrackerConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = TrackerConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Diff(args) => cmd_diff(args),
        Command::Record(args) => cmd_record(&config, args),
        Command::History(args) => cmd_history(config, args),
    }
}

fn cmd_diff(args: DiffArgs) -> anyhow::Result<()> {
    let old = read_snapshot(&args.old)?;
    let new = read_snapshot(&args.new)?;
    let set = compare_snapshots(&old, &new);
    println!("{}", serde_json::to_string_pretty(&set.changes)?);
    Ok(())
}

fn cmd_record(config: &TrackerConfig, args: RecordArgs) -> anyhow::Result<()> {
    let date = match args.date {
        Some(date) => {
            NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("invalid date {date:?}, expected YYYY-MM-DD"))?;
            date
        }
        None => today(),
    };
    let fresh = read_snapshot(&args.snapshot)?;
    let store = FileHistoryStore::open(config.history_path());
    let cache = SnapshotCache::open(config.snapshot_path());

    match record_snapshot(&store, &cache, fresh, &date)? {
        RecordOutcome::Baseline => println!(
            "{} No previous snapshot; stored baseline in {}",
            "✓".green(),
            cache.path().display()
        ),
        RecordOutcome::Unchanged => println!("No changes."),
        RecordOutcome::Recorded(count) => println!(
            "{} Recorded {} change(s) for {}",
            "✓".green().bold(),
            count.to_string().bold(),
            date.yellow()
        ),
    }
    Ok(())
}

fn cmd_history(mut config: TrackerConfig, args: HistoryArgs) -> anyhow::Result<()> {
    if let Some(path) = &args.policy {
        config.override_policy(path)?;
    }
    let base = config.policy(args.details);
    let verbose = base.verbose || args.all;
    let redact = base.redact || args.share;
    let policy = base.verbose(verbose).redact(redact);

    let store = FileHistoryStore::open(config.history_path());
    let changes = HistoryProjector::from_store(&store, &args.entity, &policy);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
        return Ok(());
    }
    if changes.is_empty() {
        println!("No history for entity {}.", args.entity.bold());
        return Ok(());
    }

    let options = RenderOptions {
        expand_structured: args.details || args.all,
    };
    let today = today();
    println!("{}", "Change History:".bright_blue());
    for change in &changes {
        let line = change.render_line(&options);
        if change.timestamp == today {
            println!("{}", line.bright_blue());
        } else {
            println!("{line}");
        }
    }
    Ok(())
}

/// What a `record` run did.
#[derive(Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// No cached snapshot existed; nothing to compare against.
    Baseline,
    /// The snapshot matched the cached one.
    Unchanged,
    /// A history entry with this many changes was appended.
    Recorded(usize),
}

/// Diff `fresh` against the cached snapshot, append any changes under
/// `date`, then replace the cache.
pub fn record_snapshot(
    store: &dyn HistoryStore,
    cache: &SnapshotCache,
    fresh: Vec<Document>,
    date: &str,
) -> anyhow::Result<RecordOutcome> {
    let outcome = match cache.load() {
        None => RecordOutcome::Baseline,
        Some(previous) => {
            let set = compare_snapshots(&previous, &fresh);
            if set.is_empty() {
                RecordOutcome::Unchanged
            } else {
                let count = set.len();
                info!(
                    changes = count,
                    entities_added = set.entities_added(),
                    entities_removed = set.entities_removed(),
                    "recording changes"
                );
                store
                    .append(date, set.into_records())
                    .context("failed to append history")?;
                RecordOutcome::Recorded(count)
            }
        }
    };

    cache.save(&fresh).context("failed to update snapshot cache")?;
    Ok(outcome)
}

fn read_snapshot(path: &Path) -> anyhow::Result<Vec<Document>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("{} is not a JSON list of entities", path.display()))
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
