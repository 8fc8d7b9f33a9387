//! Unit tests for configuration module
//!
//! These tests validate configuration parsing, defaults, and validation.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::config::*;
    use crate::models::TimeRange;
    use crate::PromptRankError;

    // ====== Default Value Tests ======

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.top_tags_limit(), 5);
        assert_eq!(config.recent_activity_limit(), 3);
        assert_eq!(config.default_time_range(), TimeRange::Week);
        assert_eq!(config.refresh_interval_secs(), 30);
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.cache.max_entries, 64);
        assert!(config.validate().is_ok());
    }

    // ====== TOML Parsing Tests ======

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let toml_str = r#"
            [logging]
            level = "warn"

            [snapshot]
            path = "/tmp/export.json"
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.backtrace);
        assert_eq!(config.snapshot_path().to_str(), Some("/tmp/export.json"));
        assert_eq!(config.top_tags_limit(), 5);
        assert_eq!(config.refresh_interval_secs(), 30);
    }

    #[test]
    fn test_time_range_parsing() {
        let toml_str = r#"
            [logging]
            level = "info"
            [snapshot]
            path = "s.json"
            [analytics]
            default_time_range = "90d"
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_time_range(), TimeRange::Quarter);

        let bad = toml_str.replace("90d", "1y");
        assert!(toml::from_str::<AppConfig>(&bad).is_err());
    }

    #[test]
    fn test_example_config_parses() {
        let content = include_str!("../config.example.toml");
        let config: AppConfig = toml::from_str(content).unwrap();
        assert!(config.validate().is_ok());
    }

    // ====== Validation Tests ======

    #[test]
    fn test_zero_refresh_interval_rejected() {
        let mut config = AppConfig::default();
        config.refresh.interval_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(PromptRankError::Config(_))
        ));
    }

    #[test]
    fn test_empty_snapshot_path_rejected() {
        let mut config = AppConfig::default();
        config.snapshot.path = std::path::PathBuf::new();
        assert!(config.validate().is_err());
    }

    // ====== File Loading Tests ======

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[logging]\nlevel = \"debug\"\n[snapshot]\npath = \"data.json\"\n[refresh]\ninterval_secs = 10"
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.refresh_interval_secs(), 10);
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml [[[").unwrap();
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(PromptRankError::TomlParsing(_))
        ));
    }

    #[test]
    fn test_from_file_missing() {
        assert!(matches!(
            AppConfig::from_file("/nonexistent/promptrank.toml"),
            Err(PromptRankError::Io(_))
        ));
    }
}
