//! PromptRank: engagement aggregation for a prompt-sharing network
//!
//! The [`aggregator`] module is the core: pure functions that turn a
//! snapshot of prompts into per-user totals, leaderboards, tag popularity
//! and growth counts. Everything else loads snapshots, caches rankings
//! and drives the `promptrank` CLI.

pub mod aggregator;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod snapshot;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod errors_tests;

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

pub use config::AppConfig;
pub use errors::*;

use crate::cache::CacheConfig;
use crate::cache::RankingCache;
use crate::models::{AnalyticsSummary, TimeRange, UserScore};
use crate::snapshot::Snapshot;

/// Application handle: configuration plus a shared ranking cache
#[derive(Clone)]
pub struct PromptRank {
    config: AppConfig,
    cache: RankingCache,
}

impl PromptRank {
    pub fn new(config: AppConfig) -> Self {
        let cache = RankingCache::with_config(CacheConfig::from(&config.cache));
        Self { config, cache }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cache(&self) -> &RankingCache {
        &self.cache
    }

    /// Load the snapshot at `path`, or the configured one
    pub async fn load_snapshot(&self, path: Option<&Path>) -> Result<Snapshot> {
        let path = path.unwrap_or_else(|| self.config.snapshot_path());
        Snapshot::load(path).await
    }

    /// Leaderboard for a snapshot, served from cache when its content is unchanged
    pub async fn ranking(&self, snapshot: &Snapshot) -> Result<Arc<Vec<UserScore>>> {
        self.cache.get_or_compute(snapshot).await
    }

    /// Analytics page for `owner_id` as of now
    pub fn analytics(
        &self,
        snapshot: &Snapshot,
        owner_id: &str,
        range: Option<TimeRange>,
    ) -> Result<AnalyticsSummary> {
        aggregator::build_analytics(
            &snapshot.items,
            &snapshot.events,
            owner_id,
            range.unwrap_or_else(|| self.config.default_time_range()),
            Utc::now(),
            self.config.top_tags_limit(),
        )
    }
}
