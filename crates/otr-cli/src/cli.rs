use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "otr",
    about = "Order tracker: field-level change history for polled order snapshots",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML). The built-in configuration is used otherwise.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the changes between two snapshot files
    Diff(DiffArgs),
    /// Compare a snapshot with the cached one and record the changes
    Record(RecordArgs),
    /// Show the change history of one entity
    History(HistoryArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Older snapshot: a JSON list of entities
    pub old: PathBuf,
    /// Newer snapshot: a JSON list of entities
    pub new: PathBuf,
}

#[derive(Args)]
pub struct RecordArgs {
    /// Freshly fetched snapshot: a JSON list of entities
    pub snapshot: PathBuf,
    /// Entry date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Entity position in the snapshot list
    pub entity: String,
    /// Show every recorded key, untranslated ones included
    #[arg(long)]
    pub all: bool,
    /// Include detail labels and expand structured values
    #[arg(long)]
    pub details: bool,
    /// Hide identifying values such as the VIN
    #[arg(long)]
    pub share: bool,
    /// Print the projected records as JSON
    #[arg(long)]
    pub json: bool,
    /// Display policy file (TOML) replacing the configured policy
    #[arg(long, value_name = "FILE")]
    pub policy: Option<PathBuf>,
}
