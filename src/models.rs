use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::errors::QaError;

/// Generative model backing answer generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelSource {
    #[default]
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
}

impl ModelSource {
    /// Model name as understood by the generation API
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gemini25Flash => "gemini-2.5-flash",
        }
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelSource {
    type Err = QaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini-2.5-flash" => Ok(Self::Gemini25Flash),
            other => Err(QaError::ConfigError(format!("Unknown model source: {other}"))),
        }
    }
}

/// How `IndexStorage::answer` produces its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// Retrieve relevant nodes and generate a grounded answer
    #[default]
    Generate,
    /// Return a fixed placeholder without touching the index
    Placeholder,
}

/// Constant returned in placeholder mode
pub const PLACEHOLDER_ANSWER: &str = "test";

/// One row of the standard-answers CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardAnswer {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub gallery_id: Option<u64>,
}

impl StandardAnswer {
    /// Convert into an indexable document
    pub fn to_document(&self) -> Document {
        let text = format!("Question: {}\nAnswer: {}", self.question.trim(), self.answer.trim());

        let mut metadata = BTreeMap::new();
        metadata.insert("question".to_string(), self.question.trim().to_string());
        if let Some(name) = self.name.as_deref().filter(|s| !s.is_empty()) {
            metadata.insert("name".to_string(), name.to_string());
        }
        if let Some(description) = self.description.as_deref().filter(|s| !s.is_empty()) {
            metadata.insert("description".to_string(), description.to_string());
        }
        if let Some(gallery_id) = self.gallery_id {
            metadata.insert("gallery_id".to_string(), gallery_id.to_string());
        }

        Document::new(text, metadata)
    }
}

/// Source document before splitting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// Create a document whose id is derived from its content
    pub fn new(text: String, metadata: BTreeMap<String, String>) -> Self {
        let id = content_hash(&[text.as_str()]);
        Self { id, text, metadata }
    }
}

/// A chunk of a document; the unit that is embedded and retrieved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub document_id: String,
    pub text: String,
    pub metadata: BTreeMap<String, String>,
}

/// A retrieved node with its similarity to the query
#[derive(Debug, Clone, Serialize)]
pub struct ScoredNode {
    pub node: Node,
    pub score: f32,
}

/// Hex SHA-256 over the given parts, separated by a NUL byte
pub fn content_hash(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            hasher.update([0u8]);
        }
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}
