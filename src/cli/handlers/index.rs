//! Index build and inspection handlers

use std::sync::Arc;

use tracing::info;

use crate::cli::output::*;
use crate::embeddings::CachedEmbedder;
use crate::embeddings::EmbeddingCache;
use crate::embeddings::GeminiEmbeddingClient;
use crate::index::build_and_persist;
use crate::index::storage;
use crate::AppConfig;
use crate::Result;

/// Build the index and persist it, unless one exists and `force` is unset
pub async fn handle_index_build(config: &AppConfig, force: bool) -> Result<()> {
    let index_dir = config.index_dir();
    if storage::index_exists(index_dir) && !force {
        print_warning(&format!(
            "Index already exists at {} (use --force to rebuild)",
            index_dir.display()
        ));
        return Ok(());
    }

    print_info(&format!(
        "Building index from {}",
        config.source_csv().display()
    ));

    let client = GeminiEmbeddingClient::from_config(&config.embeddings)?;
    let cache = EmbeddingCache::load(config.cache_dir())?;
    let embedder = CachedEmbedder::new(Arc::new(client), cache);

    let started = std::time::Instant::now();
    let index = build_and_persist(&config.index, &embedder).await?;
    embedder.persist().await?;
    info!("Index build took {:?}", started.elapsed());

    print_success(&format!(
        "Indexed {} documents into {} nodes at {} ({} embeddings cached)",
        index.meta().document_count,
        index.len(),
        index_dir.display(),
        embedder.cached_len().await
    ));
    Ok(())
}

/// Print metadata of the persisted index
pub async fn handle_index_info(config: &AppConfig) -> Result<()> {
    let index_dir = config.index_dir();
    if !storage::index_exists(index_dir) {
        print_warning(&format!("No index found at {}", index_dir.display()));
        return Ok(());
    }

    let index = storage::load(index_dir)?;
    println!("📁 Location: {}", index_dir.display());
    print_index_meta(index.meta());
    Ok(())
}
