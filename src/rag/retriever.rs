//! Retrieval of the nodes most relevant to a query

use std::sync::Arc;

use tracing::debug;

use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::index::VectorIndex;
use crate::models::ScoredNode;

/// Embeds a query and searches the index
pub struct Retriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn Embedder>,
    similarity_top_k: usize,
}

impl Retriever {
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn Embedder>, similarity_top_k: usize) -> Self {
        Self {
            index,
            embedder,
            similarity_top_k,
        }
    }

    /// Embed the query text
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        self.embedder.embed_query(query).await
    }

    /// Search with an already computed query embedding
    pub fn search(&self, query_embedding: &[f32]) -> Result<Vec<ScoredNode>> {
        let results = self.index.top_k(query_embedding, self.similarity_top_k)?;
        debug!(
            "Retrieved {} nodes (top score {:.3})",
            results.len(),
            results.first().map_or(0.0, |r| r.score)
        );
        Ok(results)
    }

    /// Semantic search using vector embeddings
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredNode>> {
        let query_embedding = self.embed_query(query).await?;
        self.search(&query_embedding)
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}
