//! Unit tests for error handling
//!
//! Tests error types, conversions, and error message formatting.

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;

    use crate::errors::QaError;

    // ====== Error Type Tests ======

    #[test]
    fn test_custom_error() {
        let error = QaError::Custom("Test error message".to_string());
        assert_eq!(format!("{error}"), "Test error message");
    }

    #[test]
    fn test_config_error() {
        let error = QaError::ConfigError("Invalid configuration".to_string());
        assert!(matches!(error, QaError::ConfigError(_)));
        assert!(format!("{error}").contains("configuration"));
    }

    #[test]
    fn test_source_not_found_names_path() {
        let error = QaError::SourceNotFound(PathBuf::from("data/standard_answers.csv"));
        let display = format!("{error}");
        assert!(display.contains("data/standard_answers.csv"));
        assert!(display.contains("not found"));
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let error = QaError::DimensionMismatch {
            expected: 3072,
            actual: 768,
        };
        assert_eq!(
            format!("{error}"),
            "Embedding dimension mismatch: expected 3072, got 768"
        );
    }

    // ====== Error Conversion Tests ======

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let qa_err: QaError = io_err.into();
        assert!(matches!(qa_err, QaError::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let qa_err: QaError = json_err.into();
        assert!(matches!(qa_err, QaError::Serialization(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let qa_err: QaError = toml_err.into();
        assert!(matches!(qa_err, QaError::TomlParsing(_)));
    }
}
