//! On-disk embedding cache
//!
//! Vectors are keyed by a hash of (model, task, text) so that rebuilding an
//! index over an unchanged corpus does not call the embedding service again.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::Mutex;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::Embedder;
use crate::errors::QaError;
use crate::errors::Result;
use crate::models::content_hash;

const CACHE_FILE: &str = "embeddings.json";

/// Persistent map from text hash to embedding vector
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    path: PathBuf,
    entries: HashMap<String, Vec<f32>>,
    dirty: bool,
}

impl EmbeddingCache {
    /// Load the cache stored under `cache_dir`
    ///
    /// A missing file yields an empty cache. An unreadable one is discarded.
    pub fn load(cache_dir: &Path) -> Result<Self> {
        let path = cache_dir.join(CACHE_FILE);
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Discarding unreadable embedding cache {}: {}", path.display(), e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        debug!("Loaded {} cached embeddings from {}", entries.len(), path.display());
        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    /// Write the cache back to disk if anything changed
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(&self.entries)?;
        std::fs::write(&self.path, content)?;
        self.dirty = false;
        info!("Saved {} cached embeddings to {}", self.entries.len(), self.path.display());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Vec<f32>> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, embedding: Vec<f32>) {
        self.entries.insert(key, embedding);
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Embedder that consults an [`EmbeddingCache`] before delegating
pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    cache: Mutex<EmbeddingCache>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn Embedder>, cache: EmbeddingCache) -> Self {
        Self {
            inner,
            cache: Mutex::new(cache),
        }
    }

    /// Persist newly computed vectors
    pub async fn persist(&self) -> Result<()> {
        self.cache.lock().await.save()
    }

    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    fn key(&self, task: &str, text: &str) -> String {
        content_hash(&[self.inner.model(), task, text])
    }

    async fn cached_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let keys: Vec<String> = texts.iter().map(|t| self.key("document", t)).collect();

        let mut results: Vec<Option<Vec<f32>>> = {
            let cache = self.cache.lock().await;
            keys.iter().map(|k| cache.get(k).cloned()).collect()
        };

        let missing: Vec<usize> = results
            .iter()
            .enumerate()
            .filter_map(|(idx, r)| r.is_none().then_some(idx))
            .collect();

        if !missing.is_empty() {
            debug!(
                "Embedding cache: {} hits, {} misses",
                texts.len() - missing.len(),
                missing.len()
            );
            let to_embed: Vec<String> = missing.iter().map(|&idx| texts[idx].clone()).collect();
            let embedded = self.inner.embed_documents(&to_embed).await?;
            if embedded.len() != to_embed.len() {
                return Err(QaError::EmbeddingError(format!(
                    "Expected {} embeddings, got {}",
                    to_embed.len(),
                    embedded.len()
                )));
            }

            let mut cache = self.cache.lock().await;
            for (idx, embedding) in missing.into_iter().zip(embedded) {
                cache.insert(keys[idx].clone(), embedding.clone());
                results[idx] = Some(embedding);
            }
        }

        Ok(results.into_iter().flatten().collect())
    }
}

impl Embedder for CachedEmbedder {
    fn model(&self) -> &str {
        self.inner.model()
    }

    fn embed_query<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
        // Questions are unbounded; only corpus vectors are cached
        self.inner.embed_query(text)
    }

    fn embed_documents<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
        self.cached_documents(texts).boxed()
    }
}
