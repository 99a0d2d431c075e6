//! Index lifecycle: load-or-build at startup, then serve queries

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing::warn;

use super::builder::IndexBuilder;
use super::loader;
use super::storage;
use super::vector::VectorIndex;
use crate::config::AppConfig;
use crate::config::IndexConfig;
use crate::embeddings::CachedEmbedder;
use crate::embeddings::Embedder;
use crate::embeddings::EmbeddingCache;
use crate::embeddings::GeminiEmbeddingClient;
use crate::errors::QaError;
use crate::errors::Result;
use crate::llm::GeminiLlmClient;
use crate::llm::GenerationParams;
use crate::llm::Generator;
use crate::llm::PromptTemplate;
use crate::llm::QaPrompts;
use crate::models::AnswerMode;
use crate::models::ModelSource;
use crate::models::ScoredNode;
use crate::models::PLACEHOLDER_ANSWER;
use crate::rag::ContextAssembler;
use crate::rag::QaResponse;
use crate::rag::QueryEngine;
use crate::rag::Retriever;

/// Where the serving index came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    /// Read from the persistence directory
    Loaded,
    /// Built from the source CSV and persisted
    Built,
}

/// Owns the index for the lifetime of the process and answers queries
pub struct IndexStorage {
    current_model: ModelSource,
    answer_mode: AnswerMode,
    origin: IndexOrigin,
    engine: QueryEngine,
}

impl IndexStorage {
    /// Initialize with the Gemini clients and the on-disk embedding cache
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let client = GeminiEmbeddingClient::from_config(&config.embeddings)?;
        let cache = EmbeddingCache::load(config.cache_dir())?;
        let embedder = Arc::new(CachedEmbedder::new(Arc::new(client), cache));
        let generator = Arc::new(GeminiLlmClient::from_config(&config.llm)?);

        let storage = Self::initialize(config, embedder.clone(), generator).await?;

        if let Err(e) = embedder.persist().await {
            warn!("Failed to save embedding cache: {}", e);
        }
        Ok(storage)
    }

    /// Ensure an index exists, then wire up the query pipeline
    ///
    /// Fails when no index is persisted and the source CSV is missing.
    pub async fn initialize(
        config: &AppConfig,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self> {
        info!("Initializing index ...");
        let (index, origin) = load_or_build(&config.index, embedder.as_ref()).await?;

        if index.meta().embedding_model != embedder.model() {
            warn!(
                "Index was embedded with {} but queries use {}; rebuild with `index build --force`",
                index.meta().embedding_model,
                embedder.model()
            );
        }

        let template = match &config.llm.prompt_template_path {
            Some(path) => PromptTemplate::from_file(path)?,
            None => QaPrompts::text_qa(),
        };

        let engine = QueryEngine::new(
            Retriever::new(Arc::new(index), embedder, config.index.similarity_top_k),
            ContextAssembler::new(config.index.max_context_length),
            template,
            generator,
            GenerationParams::from_config(&config.llm),
        );

        info!(
            "Index ready ({:?}): {} nodes, model {}, answer mode {:?}",
            origin,
            engine.retriever().index().len(),
            config.llm_model(),
            config.answer_mode()
        );

        Ok(Self {
            current_model: config.llm_model(),
            answer_mode: config.answer_mode(),
            origin,
            engine,
        })
    }

    /// Answer a question
    ///
    /// In placeholder mode this returns a fixed string without touching the index.
    pub async fn answer(&self, query_text: &str, cancel: &CancellationToken) -> Result<String> {
        match self.answer_mode {
            AnswerMode::Placeholder => {
                info!("Querying index (placeholder mode)");
                Ok(PLACEHOLDER_ANSWER.to_string())
            }
            AnswerMode::Generate => Ok(self.engine.query(query_text, cancel).await?.answer),
        }
    }

    /// Answer with the supporting passages, regardless of answer mode
    pub async fn query(&self, query_text: &str, cancel: &CancellationToken) -> Result<QaResponse> {
        self.engine.query(query_text, cancel).await
    }

    /// Retrieval only, no generation
    pub async fn retrieve(&self, query_text: &str, cancel: &CancellationToken) -> Result<Vec<ScoredNode>> {
        self.engine.retrieve(query_text, cancel).await
    }

    pub fn index(&self) -> &VectorIndex {
        self.engine.retriever().index()
    }

    pub const fn current_model(&self) -> ModelSource {
        self.current_model
    }

    pub const fn answer_mode(&self) -> AnswerMode {
        self.answer_mode
    }

    pub const fn origin(&self) -> IndexOrigin {
        self.origin
    }
}

/// Load the persisted index if present, otherwise build and persist one
pub async fn load_or_build(
    config: &IndexConfig,
    embedder: &dyn Embedder,
) -> Result<(VectorIndex, IndexOrigin)> {
    if storage::index_exists(&config.index_dir) {
        info!("Loading index from dir: {}", config.index_dir.display());
        let index = storage::load(&config.index_dir)?;
        return Ok((index, IndexOrigin::Loaded));
    }

    info!(
        "No index at {}, building from {}",
        config.index_dir.display(),
        config.source_csv.display()
    );
    let index = build_and_persist(config, embedder).await?;
    Ok((index, IndexOrigin::Built))
}

/// Build from the source CSV and write the result to the persistence directory
pub async fn build_and_persist(config: &IndexConfig, embedder: &dyn Embedder) -> Result<VectorIndex> {
    if !config.source_csv.is_file() {
        return Err(QaError::SourceNotFound(config.source_csv.clone()));
    }

    let documents = loader::load_documents(&config.source_csv)?;
    if documents.is_empty() {
        warn!("Source {} contains no usable rows", config.source_csv.display());
    }

    let index = IndexBuilder::from_config(config)
        .build(&documents, embedder)
        .await?;
    storage::persist(&index, &config.index_dir)?;
    Ok(index)
}
