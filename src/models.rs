use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::PromptRankError;

/// A user-submitted prompt with its engagement counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawContentItem")]
pub struct ContentItem {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub upvotes: u64,
    pub bookmarks: u64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    /// Upvotes plus bookmarks
    pub fn composite_score(&self) -> u64 {
        self.upvotes.saturating_add(self.bookmarks)
    }
}

/// Wire shape of a content item as the data store returns it.
///
/// Counters are signed so a negative value is reported with the offending item.
#[derive(Debug, Deserialize)]
struct RawContentItem {
    id: String,
    #[serde(default)]
    owner_id: Option<String>,
    /// Store column name for the owner; either key may be present
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    upvotes: i64,
    #[serde(default)]
    bookmarks: i64,
    #[serde(default)]
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RawContentItem> for ContentItem {
    type Error = String;

    fn try_from(raw: RawContentItem) -> Result<Self, Self::Error> {
        let upvotes = u64::try_from(raw.upvotes)
            .map_err(|_| format!("item {} has negative upvotes: {}", raw.id, raw.upvotes))?;
        let bookmarks = u64::try_from(raw.bookmarks)
            .map_err(|_| format!("item {} has negative bookmarks: {}", raw.id, raw.bookmarks))?;
        let owner_id = match (raw.owner_id, raw.user_id) {
            (Some(owner), Some(user)) if owner != user => {
                return Err(format!(
                    "item {} has conflicting owner_id '{owner}' and user_id '{user}'",
                    raw.id
                ));
            }
            (Some(owner), _) => owner,
            (None, Some(user)) => user,
            // Empty owners are rejected by item validation
            (None, None) => String::new(),
        };

        Ok(Self {
            id: raw.id,
            owner_id,
            title: raw.title,
            upvotes,
            bookmarks,
            tags: raw.tags,
            created_at: raw.created_at,
        })
    }
}

/// A single upvote or bookmark creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementEvent {
    #[serde(alias = "prompt_id")]
    pub item_id: String,
    #[serde(alias = "user_id")]
    pub actor_id: String,
    pub created_at: DateTime<Utc>,
}

/// Upvote and bookmark event streams. Item creations are the items themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    #[serde(default)]
    pub upvotes: Vec<EngagementEvent>,
    #[serde(default)]
    pub bookmarks: Vec<EngagementEvent>,
}

/// Per-owner aggregate used for ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserScore {
    pub owner_id: String,
    pub total_upvotes: u64,
    pub total_bookmarks: u64,
    pub composite_score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFrequency {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTotals {
    pub total_prompts: usize,
    pub total_upvotes: u64,
    pub total_bookmarks: u64,
}

/// Event counts at or after a cutoff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyDelta {
    pub new_item_count: usize,
    pub new_upvote_event_count: usize,
    pub new_bookmark_event_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPerformer {
    pub id: String,
    pub title: String,
    pub upvotes: u64,
    pub bookmarks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Everything the analytics page shows for one owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub owner_id: String,
    pub totals: UserTotals,
    pub average_upvotes: f64,
    pub top_performer: Option<TopPerformer>,
    pub time_range: TimeRange,
    pub growth: WeeklyDelta,
    pub top_tags: Vec<TagFrequency>,
    /// 1-based global rank, 0 when the owner has no items
    pub rank: usize,
}

/// Growth window offered by the analytics page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl TimeRange {
    pub fn days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
        }
    }

    /// Start of the window ending at `now`
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days())
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.days())
    }
}

impl FromStr for TimeRange {
    type Err = PromptRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            "90d" => Ok(Self::Quarter),
            other => Err(PromptRankError::invalid(format!(
                "unknown time range '{other}' (expected 7d, 30d or 90d)"
            ))),
        }
    }
}
