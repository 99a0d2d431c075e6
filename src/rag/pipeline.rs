//! Complete RAG pipeline: Retrieve -> Assemble -> Generate

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;

use crate::errors::QaError;
use crate::errors::Result;
use crate::llm::GenerationParams;
use crate::llm::Generator;
use crate::llm::PromptTemplate;
use crate::llm::QaPrompts;
use crate::models::ScoredNode;
use crate::rag::ContextAssembler;
use crate::rag::Retriever;

/// Retrieval-augmented answer generation over one index
pub struct QueryEngine {
    retriever: Retriever,
    context_assembler: ContextAssembler,
    template: PromptTemplate,
    generator: Arc<dyn Generator>,
    params: GenerationParams,
}

impl QueryEngine {
    pub fn new(
        retriever: Retriever,
        context_assembler: ContextAssembler,
        template: PromptTemplate,
        generator: Arc<dyn Generator>,
        params: GenerationParams,
    ) -> Self {
        Self {
            retriever,
            context_assembler,
            template,
            generator,
            params,
        }
    }

    /// Retrieve supporting nodes without generating an answer
    pub async fn retrieve(&self, question: &str, cancel: &CancellationToken) -> Result<Vec<ScoredNode>> {
        let query_embedding = checkpoint(cancel, self.retriever.embed_query(question)).await?;
        if cancel.is_cancelled() {
            return Err(QaError::Cancelled);
        }
        self.retriever.search(&query_embedding)
    }

    /// Perform a complete RAG query
    ///
    /// `cancel` is observed at every suspension point; once it fires the
    /// in-flight request is dropped and `QaError::Cancelled` is returned.
    pub async fn query(&self, question: &str, cancel: &CancellationToken) -> Result<QaResponse> {
        info!("Processing QA query: {}", question);

        debug!("Step 1: Retrieving nodes");
        let sources = self.retrieve(question, cancel).await?;

        debug!("Step 2: Assembling context from {} nodes", sources.len());
        let context = self.context_assembler.assemble(&sources);

        debug!("Step 3: Generating answer with {}", self.params.model);
        let prompt = QaPrompts::render_qa(&self.template, &context, question);
        let answer = checkpoint(cancel, self.generator.generate(&prompt, self.params)).await?;

        info!("QA query completed successfully");
        Ok(QaResponse {
            answer,
            sources,
            context,
        })
    }

    pub const fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub const fn params(&self) -> GenerationParams {
        self.params
    }
}

/// Race `fut` against cancellation
async fn checkpoint<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(QaError::Cancelled),
        result = fut => result,
    }
}

/// Answer plus the evidence it was generated from
#[derive(Debug, Clone)]
pub struct QaResponse {
    pub answer: String,
    pub sources: Vec<ScoredNode>,
    pub context: String,
}

impl QaResponse {
    /// Get a formatted string representation
    #[must_use]
    pub fn format(&self) -> String {
        let mut output = format!("Answer:\n{}\n\n", self.answer);
        output.push_str(&format!("Sources ({} passages):\n", self.sources.len()));
        for (idx, source) in self.sources.iter().enumerate() {
            let name = source.node.metadata.get("name").map_or("untitled", String::as_str);
            output.push_str(&format!("  {}. {} (score: {:.3})\n", idx + 1, name, source.score));
        }
        output
    }
}
