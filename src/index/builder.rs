//! Building a vector index from source documents

use futures::stream;
use futures::StreamExt;
use futures::TryStreamExt;
use tracing::info;

use super::splitter::SentenceSplitter;
use super::vector::VectorIndex;
use crate::config::IndexConfig;
use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::models::Document;

/// Splits documents and embeds every node
pub struct IndexBuilder {
    splitter: SentenceSplitter,
    batch_size: usize,
    max_workers: usize,
}

impl IndexBuilder {
    pub fn new(splitter: SentenceSplitter, batch_size: usize, max_workers: usize) -> Self {
        Self {
            splitter,
            batch_size: batch_size.max(1),
            max_workers: max_workers.max(1),
        }
    }

    pub fn from_config(config: &IndexConfig) -> Self {
        Self::new(
            SentenceSplitter::new(config.chunk_size, config.chunk_overlap),
            config.embed_batch_size,
            config.max_workers,
        )
    }

    /// Embed all documents, with at most `max_workers` batches in flight
    pub async fn build(&self, documents: &[Document], embedder: &dyn Embedder) -> Result<VectorIndex> {
        let nodes = self.splitter.split_documents(documents);
        let texts: Vec<String> = nodes.iter().map(|n| n.text.clone()).collect();
        let batches: Vec<&[String]> = texts.chunks(self.batch_size).collect();

        info!(
            "Embedding {} nodes from {} documents in {} batches (up to {} concurrent)",
            nodes.len(),
            documents.len(),
            batches.len(),
            self.max_workers
        );

        let embedded: Vec<Vec<Vec<f32>>> = stream::iter(batches)
            .map(|batch| embedder.embed_documents(batch))
            .buffered(self.max_workers)
            .try_collect()
            .await?;
        let embeddings: Vec<Vec<f32>> = embedded.into_iter().flatten().collect();

        VectorIndex::new(embedder.model(), documents.len(), nodes, embeddings)
    }
}
