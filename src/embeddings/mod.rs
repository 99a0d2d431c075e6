//! Embeddings generation module
//!
//! Text is embedded by an external service. The [`Embedder`] trait is the seam
//! between the index and that service:
//! - [`GeminiEmbeddingClient`] talks to the Gemini embedding API
//! - [`CachedEmbedder`] wraps any embedder with an on-disk cache
//!
//! # Examples
//!
//! ```rust,no_run
//! use playbook_qa::config::AppConfig;
//! use playbook_qa::embeddings::Embedder;
//! use playbook_qa::embeddings::GeminiEmbeddingClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let client = GeminiEmbeddingClient::from_config(&config.embeddings)?;
//!
//!     let embedding = client.embed_query("What is the entry rule?").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;

pub use cache::CachedEmbedder;
pub use cache::EmbeddingCache;
pub use client::GeminiEmbeddingClient;
pub use client::TaskType;
use futures::future::BoxFuture;

use crate::errors::Result;

/// Produces embedding vectors for queries and documents
pub trait Embedder: Send + Sync {
    /// Model identifier, used to key cached vectors
    fn model(&self) -> &str;

    /// Embed a search query
    fn embed_query<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>>;

    /// Embed a batch of document chunks, preserving order
    fn embed_documents<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}
