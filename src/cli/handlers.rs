//! CLI command handlers
//!
//! This module contains all the command handlers for the PromptRank CLI

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing::info;
use tracing::warn;

use crate::aggregator;
use crate::cli::commands::Commands;
use crate::cli::output::*;
use crate::models::TimeRange;
use crate::PromptRank;
use crate::Result;

/// Leaderboard entries shown next to the analytics report in watch mode
const WATCH_LEADERBOARD_SIZE: usize = 5;

/// Dispatch a parsed command
pub async fn run_command(
    app: &PromptRank,
    command: Commands,
    snapshot_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    match command {
        Commands::Ranking { limit } => handle_ranking_command(app, snapshot_path, limit, json).await,
        Commands::Rank { owner } => handle_rank_command(app, snapshot_path, &owner, json).await,
        Commands::Totals { owner } => handle_totals_command(app, snapshot_path, &owner, json).await,
        Commands::Tags { owner, limit } => {
            handle_tags_command(app, snapshot_path, owner.as_deref(), limit, json).await
        }
        Commands::Growth { owner, range } => {
            handle_growth_command(app, snapshot_path, owner.as_deref(), range, json).await
        }
        Commands::Analytics { owner, range } => {
            handle_analytics_command(app, snapshot_path, &owner, range, json).await
        }
        Commands::Recent { owner, limit } => {
            handle_recent_command(app, snapshot_path, &owner, limit, json).await
        }
        Commands::Watch { owner, interval } => {
            handle_watch_command(app, snapshot_path, &owner, interval, json).await
        }
        Commands::Config => handle_config_command(app, json),
    }
}

/// Handle ranking command
pub async fn handle_ranking_command(
    app: &PromptRank,
    snapshot_path: Option<&Path>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let snapshot = app.load_snapshot(snapshot_path).await?;
    let ranking = app.ranking(&snapshot).await?;
    let shown = &ranking[..limit.unwrap_or(ranking.len()).min(ranking.len())];

    if json {
        print_json(shown)
    } else {
        print_ranking(shown, ranking.len());
        Ok(())
    }
}

/// Handle rank command
pub async fn handle_rank_command(
    app: &PromptRank,
    snapshot_path: Option<&Path>,
    owner: &str,
    json: bool,
) -> Result<()> {
    let snapshot = app.load_snapshot(snapshot_path).await?;
    let rank = aggregator::find_user_rank(&snapshot.items, owner)?;

    if json {
        print_json(&serde_json::json!({ "owner_id": owner, "rank": rank }))
    } else {
        print_rank(owner, rank);
        Ok(())
    }
}

/// Handle totals command
pub async fn handle_totals_command(
    app: &PromptRank,
    snapshot_path: Option<&Path>,
    owner: &str,
    json: bool,
) -> Result<()> {
    let snapshot = app.load_snapshot(snapshot_path).await?;
    let totals = aggregator::compute_user_totals(&snapshot.items, owner)?;

    if json {
        print_json(&totals)
    } else {
        print_totals(owner, &totals);
        Ok(())
    }
}

/// Handle tags command
pub async fn handle_tags_command(
    app: &PromptRank,
    snapshot_path: Option<&Path>,
    owner: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let snapshot = app.load_snapshot(snapshot_path).await?;
    let limit = limit.unwrap_or_else(|| app.config().top_tags_limit());

    let tags = match owner {
        Some(owner) => aggregator::compute_top_tags(&snapshot.items_by_owner(owner), limit)?,
        None => aggregator::compute_top_tags(&snapshot.items, limit)?,
    };

    if json {
        print_json(&tags)
    } else {
        print_tags(owner, &tags);
        Ok(())
    }
}

/// Handle growth command
pub async fn handle_growth_command(
    app: &PromptRank,
    snapshot_path: Option<&Path>,
    owner: Option<&str>,
    range: Option<TimeRange>,
    json: bool,
) -> Result<()> {
    let snapshot = app.load_snapshot(snapshot_path).await?;
    let range = range.unwrap_or_else(|| app.config().default_time_range());

    let delta = match owner {
        Some(owner) => app.analytics(&snapshot, owner, Some(range))?.growth,
        None => aggregator::compute_weekly_delta(
            &snapshot.items,
            &snapshot.events.upvotes,
            &snapshot.events.bookmarks,
            range.cutoff(Utc::now()),
        )?,
    };

    if json {
        print_json(&delta)
    } else {
        print_growth(owner, range, &delta);
        Ok(())
    }
}

/// Handle analytics command
pub async fn handle_analytics_command(
    app: &PromptRank,
    snapshot_path: Option<&Path>,
    owner: &str,
    range: Option<TimeRange>,
    json: bool,
) -> Result<()> {
    let snapshot = app.load_snapshot(snapshot_path).await?;
    let summary = app.analytics(&snapshot, owner, range)?;

    if json {
        print_json(&summary)
    } else {
        print_analytics(&summary);
        Ok(())
    }
}

/// Handle recent command
pub async fn handle_recent_command(
    app: &PromptRank,
    snapshot_path: Option<&Path>,
    owner: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let snapshot = app.load_snapshot(snapshot_path).await?;
    let limit = limit.unwrap_or_else(|| app.config().recent_activity_limit());
    let recent = aggregator::recent_activity(&snapshot.items, owner, limit)?;

    if json {
        print_json(&recent)
    } else {
        print_recent(owner, &recent);
        Ok(())
    }
}

/// Handle watch command
///
/// Reloads the snapshot every interval and recomputes from scratch. A tick
/// that fails to load is reported and skipped; the loop ends on Ctrl-C.
pub async fn handle_watch_command(
    app: &PromptRank,
    snapshot_path: Option<&Path>,
    owner: &str,
    interval_secs: Option<u64>,
    json: bool,
) -> Result<()> {
    let secs = interval_secs.unwrap_or_else(|| app.config().refresh_interval_secs());
    if secs == 0 {
        return Err(crate::PromptRankError::invalid(
            "watch interval must be greater than zero",
        ));
    }

    let mut interval = tokio::time::interval(Duration::from_secs(secs));
    // Overlapping refreshes are coalesced into the next tick
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!("Watching analytics for {} every {}s", owner, secs);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = refresh_once(app, snapshot_path, owner, json).await {
                    warn!("Failed to refresh analytics: {}", e);
                    eprintln!("❌ Failed to load analytics: {e}");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Watch stopped");
                return Ok(());
            }
        }
    }
}

async fn refresh_once(
    app: &PromptRank,
    snapshot_path: Option<&Path>,
    owner: &str,
    json: bool,
) -> Result<()> {
    let snapshot = app.load_snapshot(snapshot_path).await?;
    let summary = app.analytics(&snapshot, owner, None)?;
    let ranking = app.ranking(&snapshot).await?;
    let leaders = &ranking[..WATCH_LEADERBOARD_SIZE.min(ranking.len())];

    if json {
        return print_json(&serde_json::json!({
            "snapshot_version": snapshot.version,
            "analytics": summary,
            "leaderboard": leaders,
        }));
    }

    println!();
    println!(
        "🔄 Snapshot v{} at {}",
        snapshot.version,
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    print_analytics(&summary);
    println!();
    print_ranking(leaders, ranking.len());
    Ok(())
}

/// Handle config command
pub fn handle_config_command(app: &PromptRank, json: bool) -> Result<()> {
    if json {
        print_json(app.config())
    } else {
        print_config(app.config());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::PromptRankError;

    #[tokio::test]
    async fn test_watch_rejects_zero_interval() {
        let app = PromptRank::new(AppConfig::default());
        let result = handle_watch_command(&app, None, "u1", Some(0), false).await;
        assert!(matches!(result, Err(PromptRankError::InvalidInput(_))));
    }
}
