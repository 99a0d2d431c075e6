//! RAG (Retrieval-Augmented Generation) module
//!
//! Answers questions over the playbook index:
//! - Semantic retrieval using vector embeddings
//! - Context assembly from retrieved passages
//! - LLM-based answer generation
//!
//! # Examples
//!
//! ```rust,no_run
//! use playbook_qa::config::AppConfig;
//! use playbook_qa::index::IndexStorage;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let storage = IndexStorage::from_config(&config).await?;
//!
//!     let answer = storage
//!         .answer("What is the entry rule?", &CancellationToken::new())
//!         .await?;
//!     println!("Answer: {answer}");
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod pipeline;
pub mod retriever;

pub use context::ContextAssembler;
pub use pipeline::QaResponse;
pub use pipeline::QueryEngine;
pub use retriever::Retriever;
