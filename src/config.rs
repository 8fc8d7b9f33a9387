use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::models::TimeRange;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// JSON export of the prompt store
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_top_tags_limit")]
    pub top_tags_limit: usize,
    #[serde(default = "default_recent_activity_limit")]
    pub recent_activity_limit: usize,
    #[serde(default)]
    pub default_time_range: TimeRange,
}

fn default_top_tags_limit() -> usize {
    5
}

fn default_recent_activity_limit() -> usize {
    3
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_tags_limit: default_top_tags_limit(),
            recent_activity_limit: default_recent_activity_limit(),
            default_time_range: TimeRange::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between recomputations in watch mode
    #[serde(default = "default_refresh_interval")]
    pub interval_secs: u64,
}

fn default_refresh_interval() -> u64 {
    30
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_refresh_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_entries")]
    pub max_entries: usize,
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_cache_entries() -> usize {
    64
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            max_entries: default_cache_entries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub cache: CacheSettings,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default paths.
    ///
    /// Tries `config.toml`, then `config.example.toml`, then built-in defaults.
    pub fn load() -> crate::Result<Self> {
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.refresh.interval_secs == 0 {
            return Err(crate::PromptRankError::Config(
                "refresh.interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(crate::PromptRankError::Config(
                "logging.level must not be empty".to_string(),
            ));
        }
        if self.snapshot.path.as_os_str().is_empty() {
            return Err(crate::PromptRankError::Config(
                "snapshot.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Get snapshot file path
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot.path
    }

    /// Get default number of tags in a top-tags report
    pub fn top_tags_limit(&self) -> usize {
        self.analytics.top_tags_limit
    }

    /// Get default number of entries in a recent-activity report
    pub fn recent_activity_limit(&self) -> usize {
        self.analytics.recent_activity_limit
    }

    /// Get default growth window
    pub fn default_time_range(&self) -> TimeRange {
        self.analytics.default_time_range
    }

    /// Get refresh interval in seconds
    pub fn refresh_interval_secs(&self) -> u64 {
        self.refresh.interval_secs
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
            snapshot: SnapshotConfig {
                path: PathBuf::from("snapshot.json"),
            },
            analytics: AnalyticsConfig::default(),
            refresh: RefreshConfig::default(),
            cache: CacheSettings::default(),
        }
    }
}
