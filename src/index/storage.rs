//! Persistence of a [`VectorIndex`] to a directory
//!
//! Layout:
//! - `index_store.json`: [`IndexMeta`]
//! - `vector_store.json`: node id to embedding
//! - `docstore.json`: nodes with text and metadata; its presence marks a
//!   complete index

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use super::vector::IndexMeta;
use super::vector::VectorIndex;
use crate::errors::QaError;
use crate::errors::Result;
use crate::models::Node;

pub const DOCSTORE_FILE: &str = "docstore.json";
pub const VECTOR_STORE_FILE: &str = "vector_store.json";
pub const INDEX_STORE_FILE: &str = "index_store.json";

#[derive(Debug, Serialize, Deserialize)]
struct DocStore {
    nodes: Vec<Node>,
}

#[derive(Debug, Serialize, Deserialize)]
struct VectorStore {
    embedding_dict: HashMap<String, Vec<f32>>,
}

/// Whether a persisted index is present
///
/// Presence only: the directory exists and contains the document-store
/// manifest. Staleness relative to the source CSV is not checked.
pub fn index_exists(dir: &Path) -> bool {
    dir.is_dir() && dir.join(DOCSTORE_FILE).is_file()
}

/// Write the index to `dir`, creating it if needed
pub fn persist(index: &VectorIndex, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;

    // An overwrite must not leave an old marker next to new vectors
    let marker = dir.join(DOCSTORE_FILE);
    if marker.exists() {
        fs::remove_file(&marker)?;
    }

    write_json(&dir.join(INDEX_STORE_FILE), index.meta())?;

    let vector_store = VectorStore {
        embedding_dict: index
            .nodes()
            .iter()
            .zip(index.embeddings())
            .map(|(node, embedding)| (node.id.clone(), embedding.clone()))
            .collect(),
    };
    write_json(&dir.join(VECTOR_STORE_FILE), &vector_store)?;

    // Written last: the docstore is the presence marker
    let doc_store = DocStore {
        nodes: index.nodes().to_vec(),
    };
    write_json(&dir.join(DOCSTORE_FILE), &doc_store)?;

    info!("Persisted index with {} nodes to {}", index.len(), dir.display());
    Ok(())
}

/// Load an index previously written by [`persist`]
pub fn load(dir: &Path) -> Result<VectorIndex> {
    let meta: IndexMeta = read_json(&dir.join(INDEX_STORE_FILE))?;
    let vector_store: VectorStore = read_json(&dir.join(VECTOR_STORE_FILE))?;
    let doc_store: DocStore = read_json(&dir.join(DOCSTORE_FILE))?;

    let embeddings = doc_store
        .nodes
        .iter()
        .map(|node| {
            vector_store.embedding_dict.get(&node.id).cloned().ok_or_else(|| {
                QaError::IndexCorrupted(format!("no embedding stored for node {}", node.id))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let index = VectorIndex::from_parts(meta, doc_store.nodes, embeddings)?;
    info!(
        "Loaded index from {}: {} nodes, model {}, dimension {}",
        dir.display(),
        index.len(),
        index.meta().embedding_model,
        index.meta().dimension
    );
    Ok(index)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string(value)?;
    fs::write(path, content)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        QaError::IndexCorrupted(format!("cannot read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| QaError::IndexCorrupted(format!("cannot parse {}: {e}", path.display())))
}
