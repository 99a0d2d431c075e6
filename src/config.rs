use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::models::AnswerMode;
use crate::models::ModelSource;

/// Prefix for environment overrides, e.g. `PLAYBOOK_QA__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "PLAYBOOK_QA";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-query deadline in seconds
    pub api_timeout_secs: u64,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            api_timeout_secs: default_api_timeout_secs(),
            enable_cors: true,
        }
    }
}

fn default_api_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Persistence directory of the vector index
    pub index_dir: PathBuf,
    /// CSV of standard answers, required only when no index is persisted
    pub source_csv: PathBuf,
    /// Scratch directory for the embedding cache
    pub cache_dir: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub similarity_top_k: usize,
    pub max_context_length: usize,
    /// Upper bound on concurrent embedding requests during a build
    pub max_workers: usize,
    pub embed_batch_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_dir: PathBuf::from("storage/saved_index"),
            source_csv: PathBuf::from("data/standard_answers.csv"),
            cache_dir: PathBuf::from("storage/cache"),
            chunk_size: 1024,
            chunk_overlap: 128,
            similarity_top_k: 2,
            max_context_length: 4000,
            max_workers: default_max_workers(),
            embed_batch_size: 100,
        }
    }
}

fn default_max_workers() -> usize {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsConfig {
    pub model: String,
    pub endpoint: String,
    pub dimension: usize,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            model: "gemini-embedding-001".to_string(),
            endpoint: default_gemini_endpoint(),
            dimension: 3072,
            api_key_env: default_api_key_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: ModelSource,
    pub endpoint: String,
    pub temperature: f32,
    pub max_tokens: usize,
    pub api_key_env: String,
    /// Optional file overriding the built-in QA prompt template
    pub prompt_template_path: Option<PathBuf>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: ModelSource::default(),
            endpoint: default_gemini_endpoint(),
            temperature: 0.0,
            max_tokens: 2048,
            api_key_env: default_api_key_env(),
            prompt_template_path: None,
        }
    }
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    pub answer_mode: AnswerMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            backtrace: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub index: IndexConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    pub qa: QaConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default file, layered with environment overrides
    pub fn load() -> crate::Result<Self> {
        if Path::new("config.toml").exists() {
            Self::load_with_env("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::load_with_env("config.example.toml")
        } else {
            tracing::warn!("No config file found, using built-in defaults");
            Self::load_with_env("")
        }
    }

    /// Load a TOML file (if it exists) and apply `PLAYBOOK_QA__*` environment overrides
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let mut builder = config::Config::builder();
        if !path.as_os_str().is_empty() {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        let invalid = |msg: &str| Err(crate::QaError::ConfigError(msg.to_string()));

        if self.server.api_timeout_secs == 0 {
            return invalid("server.api_timeout_secs must be greater than zero");
        }
        if self.index.chunk_size == 0 {
            return invalid("index.chunk_size must be greater than zero");
        }
        if self.index.chunk_overlap >= self.index.chunk_size {
            return invalid("index.chunk_overlap must be smaller than index.chunk_size");
        }
        if self.index.similarity_top_k == 0 {
            return invalid("index.similarity_top_k must be greater than zero");
        }
        if self.index.max_workers == 0 || self.index.embed_batch_size == 0 {
            return invalid("index.max_workers and index.embed_batch_size must be greater than zero");
        }
        Ok(())
    }

    /// Get the per-query deadline
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.server.api_timeout_secs)
    }

    /// Get index persistence directory
    pub fn index_dir(&self) -> &Path {
        &self.index.index_dir
    }

    /// Get source CSV path
    pub fn source_csv(&self) -> &Path {
        &self.index.source_csv
    }

    /// Get embedding cache directory
    pub fn cache_dir(&self) -> &Path {
        &self.index.cache_dir
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get generation model
    pub fn llm_model(&self) -> ModelSource {
        self.llm.model
    }

    /// Get the configured answer mode
    pub fn answer_mode(&self) -> AnswerMode {
        self.qa.answer_mode
    }
}
