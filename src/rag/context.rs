//! Context assembly from retrieved nodes

use crate::models::ScoredNode;

/// Metadata keys rendered ahead of a passage, in order
const HEADER_KEYS: [&str; 3] = ["name", "description", "gallery_id"];

/// Assembler for creating context from search results
pub struct ContextAssembler {
    max_context_length: usize,
}

impl ContextAssembler {
    /// Create a new context assembler
    #[must_use]
    pub const fn new(max_context_length: usize) -> Self {
        Self { max_context_length }
    }

    /// Assemble context from search results
    ///
    /// Passages are appended best first until the next one would exceed the
    /// length budget. The first passage is always included, truncated if
    /// necessary, so a non-empty result never yields an empty context.
    #[must_use]
    pub fn assemble(&self, results: &[ScoredNode]) -> String {
        let mut context = String::new();
        let mut total_length = 0;

        for (idx, result) in results.iter().enumerate() {
            let entry = Self::format_node(result);
            let entry_length = entry.chars().count();

            if total_length + entry_length > self.max_context_length {
                if idx == 0 {
                    context = entry.chars().take(self.max_context_length).collect();
                }
                break;
            }

            context.push_str(&entry);
            total_length += entry_length;
        }

        context.trim().to_string()
    }

    fn format_node(result: &ScoredNode) -> String {
        let mut entry = String::new();
        for key in HEADER_KEYS {
            if let Some(value) = result.node.metadata.get(key) {
                entry.push_str(&format!("{key}: {value}\n"));
            }
        }
        entry.push_str(result.node.text.trim());
        entry.push_str("\n\n");
        entry
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(4000) // Default max context length
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::Node;

    fn scored(text: &str, metadata: &[(&str, &str)]) -> ScoredNode {
        ScoredNode {
            node: Node {
                id: text.to_string(),
                document_id: "d".to_string(),
                text: text.to_string(),
                metadata: metadata
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect::<BTreeMap<_, _>>(),
            },
            score: 0.9,
        }
    }

    #[test]
    fn test_metadata_header_precedes_text() {
        let context = ContextAssembler::default().assemble(&[scored(
            "Stop AMA12.",
            &[("name", "Opening Range Breakout"), ("chunk_index", "0")],
        )]);
        assert_eq!(context, "name: Opening Range Breakout\nStop AMA12.");
    }

    #[test]
    fn test_budget_stops_before_overflowing_passage() {
        let assembler = ContextAssembler::new(30);
        let context = assembler.assemble(&[
            scored("first passage.", &[]),
            scored("second passage is far too long to fit.", &[]),
        ]);
        assert_eq!(context, "first passage.");
    }

    #[test]
    fn test_oversized_first_passage_is_truncated() {
        let assembler = ContextAssembler::new(5);
        assert_eq!(assembler.assemble(&[scored("abcdefghij", &[])]), "abcde");
    }

    #[test]
    fn test_empty_results() {
        assert!(ContextAssembler::default().assemble(&[]).is_empty());
    }
}
