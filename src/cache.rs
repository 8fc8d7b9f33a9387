//! Ranking cache keyed by snapshot content
//!
//! Rankings are pure functions of the item sequence. The key pairs the
//! export version with a digest of every ranking input, so a reloaded file
//! whose version was not bumped still misses when its items changed.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::debug;
use tracing::warn;

use crate::aggregator;
use crate::config::CacheSettings;
use crate::models::UserScore;
use crate::snapshot::Snapshot;
use crate::snapshot::SnapshotKey;
use crate::Result;

/// Cache entry with TTL support
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    inserted_at: Instant,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            data,
            inserted_at: now,
            expires_at: now + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_entries: 64,
        }
    }
}

impl From<&CacheSettings> for CacheConfig {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            ttl: Duration::from_secs(settings.ttl_secs),
            max_entries: settings.max_entries,
        }
    }
}

/// Cache statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

type Rankings = HashMap<SnapshotKey, CacheEntry<Arc<Vec<UserScore>>>>;

/// In-memory cache of leaderboards, shareable across tasks
#[derive(Clone)]
pub struct RankingCache {
    entries: Arc<RwLock<Rankings>>,
    stats: Arc<RwLock<CacheStats>>,
    config: CacheConfig,
}

impl Default for RankingCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RankingCache {
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(CacheStats::default())),
            config,
        }
    }

    /// Cached ranking for a snapshot key, if present and fresh
    pub async fn get(&self, key: &SnapshotKey) -> Option<Arc<Vec<UserScore>>> {
        let mut entries = self.entries.write().await;

        if let Some(entry) = entries.get(key) {
            if entry.is_expired() {
                entries.remove(key);
                self.stats.write().await.misses += 1;
                debug!("Ranking cache miss (expired) for snapshot {}", key);
                return None;
            }

            self.stats.write().await.hits += 1;
            debug!("Ranking cache hit for snapshot {}", key);
            return Some(Arc::clone(&entry.data));
        }

        self.stats.write().await.misses += 1;
        debug!("Ranking cache miss for snapshot {}", key);
        None
    }

    pub async fn insert(&self, key: SnapshotKey, ranking: Arc<Vec<UserScore>>) {
        if self.config.max_entries == 0 {
            return;
        }

        let mut entries = self.entries.write().await;
        if !entries.contains_key(&key) && entries.len() >= self.config.max_entries {
            self.evict_oldest(&mut entries).await;
        }
        entries.insert(key, CacheEntry::new(ranking, self.config.ttl));
    }

    /// Ranking for `snapshot`, computed at most once per distinct content while fresh
    pub async fn get_or_compute(&self, snapshot: &Snapshot) -> Result<Arc<Vec<UserScore>>> {
        let key = snapshot.key();
        if let Some(ranking) = self.get(&key).await {
            return Ok(ranking);
        }

        let ranking = Arc::new(aggregator::compute_ranking(&snapshot.items)?);
        self.insert(key, Arc::clone(&ranking)).await;
        Ok(ranking)
    }

    pub async fn invalidate(&self, key: &SnapshotKey) {
        self.entries.write().await.remove(key);
        debug!("Invalidated ranking cache for snapshot {}", key);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        *self.stats.read().await
    }

    async fn evict_oldest(&self, entries: &mut Rankings) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted_at)
            .map(|(key, _)| *key);

        if let Some(key) = oldest {
            entries.remove(&key);
            self.stats.write().await.evictions += 1;
            warn!(
                "Ranking cache full ({} entries), evicted snapshot {}",
                self.config.max_entries, key
            );
        }
    }
}
