//! File-backed snapshots of the prompt store
//!
//! The hosted data store is not reachable from here; a snapshot is the
//! JSON export of its `prompts_with_stats` rows plus the upvote and
//! bookmark event tables, read once and handed to the aggregator.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::aggregator;
use crate::errors::PromptRankError;
use crate::models::{ContentItem, EventLog};
use crate::Result;

/// A point-in-time, read-only copy of the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Export counter; part of the cache key
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub items: Vec<ContentItem>,
    #[serde(default)]
    pub events: EventLog,
}

impl Snapshot {
    pub fn new(version: u64, items: Vec<ContentItem>, events: EventLog) -> Result<Self> {
        let snapshot = Self {
            version,
            items,
            events,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check items and both event streams
    pub fn validate(&self) -> Result<()> {
        aggregator::validate_items(&self.items)?;
        aggregator::validate_events("upvote", &self.events.upvotes)?;
        aggregator::validate_events("bookmark", &self.events.bookmarks)
    }

    /// Cache key covering every input of the ranking, in order
    pub fn key(&self) -> SnapshotKey {
        let mut hasher = Sha256::new();
        for item in &self.items {
            // Length prefixes keep ("ab","c") and ("a","bc") apart
            hasher.update((item.id.len() as u64).to_le_bytes());
            hasher.update(item.id.as_bytes());
            hasher.update((item.owner_id.len() as u64).to_le_bytes());
            hasher.update(item.owner_id.as_bytes());
            hasher.update(item.upvotes.to_le_bytes());
            hasher.update(item.bookmarks.to_le_bytes());
        }

        SnapshotKey {
            version: self.version,
            digest: hasher.finalize().into(),
        }
    }

    /// Decode and validate a snapshot document
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|e| PromptRankError::invalid(format!("malformed snapshot: {e}")))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Read a snapshot file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let snapshot = Self::from_json(&content)?;

        info!(
            "Loaded snapshot v{} from {}: {} items, {} upvote events, {} bookmark events",
            snapshot.version,
            path.display(),
            snapshot.items.len(),
            snapshot.events.upvotes.len(),
            snapshot.events.bookmarks.len()
        );
        Ok(snapshot)
    }

    /// Items owned by `owner_id`
    pub fn items_by_owner(&self, owner_id: &str) -> Vec<ContentItem> {
        self.items
            .iter()
            .filter(|item| item.owner_id == owner_id)
            .cloned()
            .collect()
    }
}

/// Snapshot identity for caching: export version plus a content digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    pub version: u64,
    pub digest: [u8; 32],
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}@{}", self.version, hex::encode(&self.digest[..6]))
    }
}
