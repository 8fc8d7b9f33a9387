//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::models::TimeRange;

#[derive(Parser)]
#[command(name = "promptrank")]
#[command(about = "Leaderboards, tag popularity and growth for a prompt-sharing network")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file to read instead of the configured one
    #[arg(short, long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the leaderboard of owners by upvotes plus bookmarks
    Ranking {
        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one owner's leaderboard position
    Rank {
        /// Owner (user) id
        owner: String,
    },
    /// Show one owner's prompt, upvote and bookmark totals
    Totals {
        /// Owner (user) id
        owner: String,
    },
    /// Show the most used tags
    Tags {
        /// Only count this owner's prompts
        #[arg(short, long)]
        owner: Option<String>,
        /// Maximum number of tags (default from config)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Count new prompts, upvotes and bookmarks in a time window
    Growth {
        /// Only count this owner's prompts and the events on them
        #[arg(short, long)]
        owner: Option<String>,
        /// Window: 7d, 30d or 90d (default from config)
        #[arg(short, long)]
        range: Option<TimeRange>,
    },
    /// Show the full analytics report for an owner
    Analytics {
        /// Owner (user) id
        owner: String,
        /// Growth window: 7d, 30d or 90d
        #[arg(short, long)]
        range: Option<TimeRange>,
    },
    /// Show an owner's newest prompts
    Recent {
        /// Owner (user) id
        owner: String,
        /// Maximum number of prompts (default from config)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Reload the snapshot periodically and reprint an owner's analytics
    Watch {
        /// Owner (user) id
        owner: String,
        /// Seconds between refreshes (default from config)
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Show current configuration
    Config,
}
