//! Engagement aggregation over a snapshot of content items
//!
//! Every function here is pure: it validates the snapshot it is handed,
//! derives its result from scratch and never mutates the input. Ties in
//! every ordering are broken by first appearance in the input sequence.

use std::collections::HashMap;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::PromptRankError;
use crate::models::{
    AnalyticsSummary, ContentItem, EngagementEvent, EventLog, RecentActivity, TagFrequency,
    TimeRange, TopPerformer, UserScore, UserTotals, WeeklyDelta,
};
use crate::Result;

/// Check every item of a snapshot.
///
/// Rejects empty ids, empty owner ids and tags repeated within one item.
pub fn validate_items(items: &[ContentItem]) -> Result<()> {
    for (index, item) in items.iter().enumerate() {
        if item.id.is_empty() {
            return Err(PromptRankError::invalid(format!(
                "item at position {index} has an empty id"
            )));
        }
        if item.owner_id.is_empty() {
            return Err(PromptRankError::invalid(format!(
                "item {} has no owner id",
                item.id
            )));
        }

        let mut seen = HashSet::with_capacity(item.tags.len());
        for tag in &item.tags {
            if !seen.insert(tag.as_str()) {
                return Err(PromptRankError::invalid(format!(
                    "item {} repeats tag '{}'",
                    item.id, tag
                )));
            }
        }
    }
    Ok(())
}

/// Check an event stream; every event must name the item it targets
pub fn validate_events(kind: &str, events: &[EngagementEvent]) -> Result<()> {
    for (index, event) in events.iter().enumerate() {
        if event.item_id.is_empty() {
            return Err(PromptRankError::invalid(format!(
                "{kind} event at position {index} has no item id"
            )));
        }
    }
    Ok(())
}

fn validate_owner(owner_id: &str) -> Result<()> {
    if owner_id.is_empty() {
        return Err(PromptRankError::invalid("owner id must not be empty"));
    }
    Ok(())
}

fn add_counts(total: u64, value: u64) -> Result<u64> {
    total
        .checked_add(value)
        .ok_or_else(|| PromptRankError::invalid("engagement counters overflow u64"))
}

/// Prompt count and engagement sums for one owner.
///
/// Owner matching is exact. An owner without items gets all zeros.
pub fn compute_user_totals(items: &[ContentItem], owner_id: &str) -> Result<UserTotals> {
    validate_items(items)?;
    validate_owner(owner_id)?;
    totals_for(items, owner_id)
}

fn totals_for(items: &[ContentItem], owner_id: &str) -> Result<UserTotals> {
    let mut totals = UserTotals::default();
    for item in items.iter().filter(|item| item.owner_id == owner_id) {
        totals.total_prompts += 1;
        totals.total_upvotes = add_counts(totals.total_upvotes, item.upvotes)?;
        totals.total_bookmarks = add_counts(totals.total_bookmarks, item.bookmarks)?;
    }
    Ok(totals)
}

/// Leaderboard of owners by composite score, highest first.
///
/// Owners with equal scores keep the order in which they first appear in
/// `items`.
pub fn compute_ranking(items: &[ContentItem]) -> Result<Vec<UserScore>> {
    validate_items(items)?;
    ranking_for(items)
}

fn ranking_for(items: &[ContentItem]) -> Result<Vec<UserScore>> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut scores: Vec<UserScore> = Vec::new();

    for item in items {
        let index = *positions.entry(item.owner_id.as_str()).or_insert_with(|| {
            scores.push(UserScore {
                owner_id: item.owner_id.clone(),
                total_upvotes: 0,
                total_bookmarks: 0,
                composite_score: 0,
            });
            scores.len() - 1
        });

        let score = &mut scores[index];
        score.total_upvotes = add_counts(score.total_upvotes, item.upvotes)?;
        score.total_bookmarks = add_counts(score.total_bookmarks, item.bookmarks)?;
        score.composite_score = add_counts(score.total_upvotes, score.total_bookmarks)?;
    }

    // sort_by is stable, so first-seen order survives among equal scores
    scores.sort_by(|a, b| b.composite_score.cmp(&a.composite_score));

    debug!("Ranked {} owners from {} items", scores.len(), items.len());
    Ok(scores)
}

/// 1-based leaderboard position of `owner_id`, or 0 when the owner has no items
pub fn find_user_rank(items: &[ContentItem], owner_id: &str) -> Result<usize> {
    validate_items(items)?;
    validate_owner(owner_id)?;
    let ranking = ranking_for(items)?;
    Ok(rank_in(&ranking, owner_id))
}

/// Position of `owner_id` in an already computed ranking (0 when absent)
pub fn rank_in(ranking: &[UserScore], owner_id: &str) -> usize {
    ranking
        .iter()
        .position(|score| score.owner_id == owner_id)
        .map_or(0, |index| index + 1)
}

/// Most frequent tags across `items`, at most `limit` entries.
///
/// Tags are compared case-sensitively. Callers pre-filter `items` to scope
/// the count to one owner.
pub fn compute_top_tags(items: &[ContentItem], limit: usize) -> Result<Vec<TagFrequency>> {
    validate_items(items)?;
    Ok(top_tags_for(items.iter(), limit))
}

fn top_tags_for<'a>(
    items: impl Iterator<Item = &'a ContentItem>,
    limit: usize,
) -> Vec<TagFrequency> {
    if limit == 0 {
        return Vec::new();
    }

    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TagFrequency> = Vec::new();

    for tag in items.flat_map(|item| item.tags.iter()) {
        match positions.get(tag.as_str()) {
            Some(&index) => counts[index].count += 1,
            None => {
                positions.insert(tag.as_str(), counts.len());
                counts.push(TagFrequency {
                    tag: tag.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Count item creations, upvotes and bookmarks at or after `cutoff`.
///
/// Streams already narrowed to the window by the data layer are counted as-is.
pub fn compute_weekly_delta(
    items: &[ContentItem],
    upvote_events: &[EngagementEvent],
    bookmark_events: &[EngagementEvent],
    cutoff: DateTime<Utc>,
) -> Result<WeeklyDelta> {
    validate_items(items)?;
    validate_events("upvote", upvote_events)?;
    validate_events("bookmark", bookmark_events)?;

    Ok(WeeklyDelta {
        new_item_count: items.iter().filter(|i| i.created_at >= cutoff).count(),
        new_upvote_event_count: upvote_events
            .iter()
            .filter(|e| e.created_at >= cutoff)
            .count(),
        new_bookmark_event_count: bookmark_events
            .iter()
            .filter(|e| e.created_at >= cutoff)
            .count(),
    })
}

/// Upvotes per prompt, 0.0 when the owner has none
pub fn average_upvotes(totals: &UserTotals) -> f64 {
    if totals.total_prompts == 0 {
        0.0
    } else {
        totals.total_upvotes as f64 / totals.total_prompts as f64
    }
}

/// The owner's item with the highest composite score; earliest wins a tie
pub fn top_performing_item(items: &[ContentItem], owner_id: &str) -> Result<Option<TopPerformer>> {
    validate_items(items)?;
    validate_owner(owner_id)?;
    Ok(top_performer_for(items, owner_id))
}

fn top_performer_for(items: &[ContentItem], owner_id: &str) -> Option<TopPerformer> {
    let mut best: Option<&ContentItem> = None;
    for item in items.iter().filter(|item| item.owner_id == owner_id) {
        match best {
            Some(current) if item.composite_score() <= current.composite_score() => {}
            _ => best = Some(item),
        }
    }

    best.map(|item| TopPerformer {
        id: item.id.clone(),
        title: item.title.clone(),
        upvotes: item.upvotes,
        bookmarks: item.bookmarks,
    })
}

/// The owner's newest items, newest first, at most `limit`
pub fn recent_activity(
    items: &[ContentItem],
    owner_id: &str,
    limit: usize,
) -> Result<Vec<RecentActivity>> {
    validate_items(items)?;
    validate_owner(owner_id)?;

    let mut owned: Vec<&ContentItem> = items
        .iter()
        .filter(|item| item.owner_id == owner_id)
        .collect();
    owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(owned
        .into_iter()
        .take(limit)
        .map(|item| RecentActivity {
            id: item.id.clone(),
            title: item.title.clone(),
            created_at: item.created_at,
        })
        .collect())
}

/// Assemble the analytics page for one owner.
///
/// Totals, top performer, tags and growth are scoped to the owner's items;
/// the rank is global across the whole snapshot. Growth counts only events
/// that target the owner's items.
pub fn build_analytics(
    items: &[ContentItem],
    events: &EventLog,
    owner_id: &str,
    range: TimeRange,
    now: DateTime<Utc>,
    tag_limit: usize,
) -> Result<AnalyticsSummary> {
    validate_items(items)?;
    validate_events("upvote", &events.upvotes)?;
    validate_events("bookmark", &events.bookmarks)?;
    validate_owner(owner_id)?;

    let owned: Vec<&ContentItem> = items
        .iter()
        .filter(|item| item.owner_id == owner_id)
        .collect();
    let owned_ids: HashSet<&str> = owned.iter().copied().map(|item| item.id.as_str()).collect();
    let cutoff = range.cutoff(now);
    let in_window = |event: &&EngagementEvent| {
        event.created_at >= cutoff && owned_ids.contains(event.item_id.as_str())
    };

    let growth = WeeklyDelta {
        new_item_count: owned.iter().filter(|i| i.created_at >= cutoff).count(),
        new_upvote_event_count: events.upvotes.iter().filter(in_window).count(),
        new_bookmark_event_count: events.bookmarks.iter().filter(in_window).count(),
    };

    let totals = totals_for(items, owner_id)?;
    let ranking = ranking_for(items)?;

    let summary = AnalyticsSummary {
        owner_id: owner_id.to_string(),
        totals,
        average_upvotes: average_upvotes(&totals),
        top_performer: top_performer_for(items, owner_id),
        time_range: range,
        growth,
        top_tags: top_tags_for(owned.into_iter(), tag_limit),
        rank: rank_in(&ranking, owner_id),
    };

    debug!(
        "Built analytics for {}: {} prompts, rank {}",
        owner_id, summary.totals.total_prompts, summary.rank
    );
    Ok(summary)
}
