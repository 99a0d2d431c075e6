//! In-memory vector index with brute-force cosine search

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::QaError;
use crate::errors::Result;
use crate::models::Node;
use crate::models::ScoredNode;

/// Bumped whenever the persisted layout changes
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Descriptive metadata persisted alongside the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub format_version: u32,
    pub embedding_model: String,
    pub dimension: usize,
    pub document_count: usize,
    pub node_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Searchable collection of embedded nodes
///
/// Immutable once constructed; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    meta: IndexMeta,
    nodes: Vec<Node>,
    embeddings: Vec<Vec<f32>>,
    norms: Vec<f32>,
}

impl VectorIndex {
    /// Assemble an index from nodes and their embeddings (same order)
    pub fn new(
        embedding_model: &str,
        document_count: usize,
        nodes: Vec<Node>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self> {
        let dimension = embeddings.first().map_or(0, Vec::len);
        let meta = IndexMeta {
            format_version: INDEX_FORMAT_VERSION,
            embedding_model: embedding_model.to_string(),
            dimension,
            document_count,
            node_count: nodes.len(),
            created_at: Utc::now(),
        };
        Self::from_parts(meta, nodes, embeddings)
    }

    /// Rebuild an index from persisted parts, validating their consistency
    pub fn from_parts(meta: IndexMeta, nodes: Vec<Node>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if nodes.len() != embeddings.len() {
            return Err(QaError::IndexCorrupted(format!(
                "{} nodes but {} embeddings",
                nodes.len(),
                embeddings.len()
            )));
        }
        if meta.node_count != nodes.len() {
            return Err(QaError::IndexCorrupted(format!(
                "metadata lists {} nodes, found {}",
                meta.node_count,
                nodes.len()
            )));
        }
        if let Some(bad) = embeddings.iter().find(|e| e.len() != meta.dimension) {
            return Err(QaError::DimensionMismatch {
                expected: meta.dimension,
                actual: bad.len(),
            });
        }

        let norms = embeddings.iter().map(|e| l2_norm(e)).collect();
        Ok(Self {
            meta,
            nodes,
            embeddings,
            norms,
        })
    }

    /// The `k` nodes most similar to `query`, best first
    pub fn top_k(&self, query: &[f32], k: usize) -> Result<Vec<ScoredNode>> {
        if self.nodes.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.meta.dimension {
            return Err(QaError::DimensionMismatch {
                expected: self.meta.dimension,
                actual: query.len(),
            });
        }

        let query_norm = l2_norm(query);
        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(idx, (embedding, &norm))| {
                (idx, cosine_similarity(query, embedding, query_norm, norm))
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(idx, score)| ScoredNode {
                node: self.nodes[idx].clone(),
                score,
            })
            .collect())
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity with precomputed norms; zero vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32], a_norm: f32, b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (a_norm * b_norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> Node {
        Node {
            id: id.to_string(),
            document_id: "doc".to_string(),
            text: format!("text of {id}"),
            metadata: Default::default(),
        }
    }

    fn index() -> VectorIndex {
        VectorIndex::new(
            "test-model",
            1,
            vec![node("east"), node("north"), node("northeast")],
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_top_k_orders_by_similarity() {
        let results = index().top_k(&[0.9, 0.1], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].node.id, "east");
        assert_eq!(results[1].node.id, "northeast");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_top_k_larger_than_index() {
        let results = index().top_k(&[0.0, 1.0], 10).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].node.id, "north");
        assert!((results[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let err = index().top_k(&[1.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(
            err,
            QaError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_inconsistent_embeddings_are_rejected() {
        let err = VectorIndex::new(
            "m",
            1,
            vec![node("a"), node("b")],
            vec![vec![1.0, 0.0], vec![1.0]],
        )
        .unwrap_err();
        assert!(matches!(err, QaError::DimensionMismatch { .. }));

        let err = VectorIndex::new("m", 1, vec![node("a")], vec![]).unwrap_err();
        assert!(matches!(err, QaError::IndexCorrupted(_)));
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0], 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let empty = VectorIndex::new("m", 0, vec![], vec![]).unwrap();
        assert!(empty.top_k(&[1.0], 3).unwrap().is_empty());
    }
}
