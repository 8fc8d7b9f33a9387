//! Unit tests for error handling
//!
//! Tests error types, conversions, and error message formatting.

#[cfg(test)]
mod tests {
    use std::io;

    use crate::errors::PromptRankError;

    #[test]
    fn test_invalid_input_display() {
        let error = PromptRankError::InvalidInput("item p1 has no owner id".to_string());
        assert_eq!(error.to_string(), "Invalid input: item p1 has no owner id");
    }

    #[test]
    fn test_config_error() {
        let error = PromptRankError::Config("bad interval".to_string());
        assert!(error.to_string().contains("Configuration"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: PromptRankError = io_err.into();
        assert!(matches!(err, PromptRankError::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let err: PromptRankError = json_err.into();
        assert!(matches!(err, PromptRankError::Serialization(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let toml_err = toml::from_str::<toml::Table>("= broken").unwrap_err();
        let err: PromptRankError = toml_err.into();
        assert!(matches!(err, PromptRankError::TomlParsing(_)));
    }

    #[test]
    fn test_question_mark_propagation() {
        fn parse() -> crate::Result<usize> {
            let value: serde_json::Value = serde_json::from_str("[1")?;
            Ok(value.as_array().map_or(0, Vec::len))
        }
        assert!(parse().is_err());
    }
}
