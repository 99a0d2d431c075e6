//! Unit tests for configuration module
//!
//! These tests validate configuration parsing, defaults, and validation.

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use crate::config::*;
    use crate::models::AnswerMode;
    use crate::models::ModelSource;

    // ====== Default Value Tests ======

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.api_timeout(), Duration::from_secs(60));
        assert_eq!(config.embedding_model(), "gemini-embedding-001");
        assert_eq!(config.llm_model(), ModelSource::Gemini25Flash);
        assert_eq!(config.answer_mode(), AnswerMode::Generate);
        assert_eq!(config.index.max_workers, 100);
        assert!(config.index_dir().ends_with("saved_index"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.api_key_env, "GOOGLE_API_KEY");
        assert!(config.prompt_template_path.is_none());
    }

    // ====== Parsing Tests ======

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9100

            [qa]
            answer_mode = "placeholder"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.answer_mode(), AnswerMode::Placeholder);
        assert_eq!(config.index.similarity_top_k, 2);
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let parsed: Result<AppConfig, _> = toml::from_str(
            r#"
            [llm]
            model = "gemini-0.1-nano"
            "#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [server]
            api_timeout_secs = 5

            [index]
            index_dir = "/tmp/qa-index"
            "#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_timeout(), Duration::from_secs(5));
        assert_eq!(config.index_dir(), std::path::Path::new("/tmp/qa-index"));
    }

    #[test]
    fn test_load_with_env_reads_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [index]
            similarity_top_k = 4
            chunk_size = 512
            chunk_overlap = 64
            "#
        )
        .unwrap();

        let config = AppConfig::load_with_env(file.path()).unwrap();
        assert_eq!(config.index.similarity_top_k, 4);
        assert_eq!(config.index.chunk_size, 512);
        assert_eq!(config.index.chunk_overlap, 64);
    }

    #[test]
    fn test_environment_overrides_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [server]
            port = 8100

            [qa]
            answer_mode = "generate"
            "#
        )
        .unwrap();

        std::env::set_var("PLAYBOOK_QA__SERVER__PORT", "9911");
        std::env::set_var("PLAYBOOK_QA__QA__ANSWER_MODE", "placeholder");
        let loaded = AppConfig::load_with_env(file.path());
        std::env::remove_var("PLAYBOOK_QA__SERVER__PORT");
        std::env::remove_var("PLAYBOOK_QA__QA__ANSWER_MODE");

        let config = loaded.unwrap();
        assert_eq!(config.server.port, 9911);
        assert_eq!(config.answer_mode(), AnswerMode::Placeholder);
        // Untouched keys keep their defaults
        assert_eq!(config.server.host, "127.0.0.1");
    }

    // ====== Validation Tests ======

    #[test]
    fn test_validate_rejects_overlap_not_smaller_than_chunk() {
        let mut config = AppConfig::default();
        config.index.chunk_size = 100;
        config.index.chunk_overlap = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout_and_top_k() {
        let mut config = AppConfig::default();
        config.server.api_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.index.similarity_top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut config = AppConfig::default();
        config.index.max_workers = 0;
        assert!(config.validate().is_err());
    }
}
