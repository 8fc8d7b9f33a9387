//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `promptrank` CLI

use serde::Serialize;

use crate::models::{
    AnalyticsSummary, RecentActivity, TagFrequency, TimeRange, UserScore, UserTotals, WeeklyDelta,
};
use crate::AppConfig;
use crate::Result;

/// Safely truncate a string at character boundary (not byte boundary)
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print any result as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the leaderboard
pub fn print_ranking(ranking: &[UserScore], total_owners: usize) {
    println!("🏆 Leaderboard ({} of {} owners)", ranking.len(), total_owners);
    println!("===================");
    if ranking.is_empty() {
        println!("  No prompts in snapshot");
        return;
    }
    for (index, score) in ranking.iter().enumerate() {
        println!(
            "  #{:<3} {:<24} score {:>6}  (⬆ {} | 🔖 {})",
            index + 1,
            truncate_str(&score.owner_id, 24),
            score.composite_score,
            score.total_upvotes,
            score.total_bookmarks
        );
    }
}

/// Print an owner's leaderboard position
pub fn print_rank(owner_id: &str, rank: usize) {
    if rank == 0 {
        println!("👤 {owner_id} is not ranked (no prompts)");
    } else {
        println!("👤 {owner_id} is ranked #{rank}");
    }
}

/// Print per-owner totals
pub fn print_totals(owner_id: &str, totals: &UserTotals) {
    println!("📊 Totals for {owner_id}");
    println!("  Prompts:   {}", totals.total_prompts);
    println!("  Upvotes:   {}", totals.total_upvotes);
    println!("  Bookmarks: {}", totals.total_bookmarks);
}

/// Print tag popularity
pub fn print_tags(scope: Option<&str>, tags: &[TagFrequency]) {
    match scope {
        Some(owner) => println!("🏷  Top tags for {owner}"),
        None => println!("🏷  Top tags"),
    }
    if tags.is_empty() {
        println!("  No tags");
        return;
    }
    for tag in tags {
        println!("  {} ({})", tag.tag, tag.count);
    }
}

/// Print growth counts for a window
pub fn print_growth(scope: Option<&str>, range: TimeRange, delta: &WeeklyDelta) {
    match scope {
        Some(owner) => println!("📈 Growth for {owner} (last {range})"),
        None => println!("📈 Growth (last {range})"),
    }
    println!("  New prompts:   +{}", delta.new_item_count);
    println!("  New upvotes:   +{}", delta.new_upvote_event_count);
    println!("  New bookmarks: +{}", delta.new_bookmark_event_count);
}

/// Print recent activity
pub fn print_recent(owner_id: &str, recent: &[RecentActivity]) {
    println!("🕒 Recent prompts by {owner_id}");
    if recent.is_empty() {
        println!("  No prompts yet");
        return;
    }
    for activity in recent {
        println!(
            "  {} | {} | {}",
            activity.created_at.format("%Y-%m-%d %H:%M UTC"),
            activity.id,
            truncate_str(&activity.title, 60)
        );
    }
}

/// Print the analytics report
pub fn print_analytics(summary: &AnalyticsSummary) {
    println!("📊 Analytics for {}", summary.owner_id);
    println!("===================");
    println!();
    print_totals(&summary.owner_id, &summary.totals);
    println!("  Avg upvotes per prompt: {:.1}", summary.average_upvotes);
    println!();

    match &summary.top_performer {
        Some(top) => println!(
            "⭐ Top prompt: {} ({}) ⬆ {} | 🔖 {}",
            truncate_str(&top.title, 50),
            top.id,
            top.upvotes,
            top.bookmarks
        ),
        None => println!("⭐ Top prompt: No prompts yet"),
    }
    println!();

    print_growth(Some(&summary.owner_id), summary.time_range, &summary.growth);
    println!();
    print_tags(Some(&summary.owner_id), &summary.top_tags);
    println!();
    print_rank(&summary.owner_id, summary.rank);
}

/// Print configuration
pub fn print_config(config: &AppConfig) {
    println!("📋 PromptRank Configuration");
    println!("===========================");
    println!();
    println!("📂 Snapshot: {}", config.snapshot_path().display());
    println!();
    println!("📊 Analytics:");
    println!("  Top tags limit: {}", config.top_tags_limit());
    println!("  Recent activity limit: {}", config.recent_activity_limit());
    println!("  Default time range: {}", config.default_time_range());
    println!();
    println!("🔄 Refresh interval: {}s", config.refresh_interval_secs());
    println!(
        "🗄  Cache: ttl {}s, max {} snapshots",
        config.cache.ttl_secs, config.cache.max_entries
    );
    println!();
    println!(
        "📝 Logging: level {}, backtrace {}",
        config.logging.level, config.logging.backtrace
    );
}
