//! Sentence-aware splitting of documents into nodes

use tracing::debug;

use crate::models::content_hash;
use crate::models::Document;
use crate::models::Node;

/// Packs whole sentences into chunks of at most `chunk_size` characters,
/// carrying up to `chunk_overlap` characters of trailing sentences into the
/// next chunk. Sentences longer than a chunk are cut on character boundaries.
#[derive(Debug, Clone, Copy)]
pub struct SentenceSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SentenceSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    /// Split text into chunks
    pub fn split(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut pieces = Vec::new();
        for sentence in split_sentences(text) {
            if char_len(sentence) > self.chunk_size {
                pieces.extend(self.hard_split(sentence));
            } else {
                pieces.push(sentence.to_string());
            }
        }

        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_len = 0;

        for piece in pieces {
            let len = char_len(&piece);
            if current_len + len > self.chunk_size && !current.is_empty() {
                chunks.push(current.concat().trim().to_string());

                let (carried, carried_len) = self.overlap_tail(&current);
                current = carried;
                current_len = carried_len;

                while current_len + len > self.chunk_size && !current.is_empty() {
                    let dropped = current.remove(0);
                    current_len -= char_len(&dropped);
                }
            }
            current_len += len;
            current.push(piece);
        }
        if !current.is_empty() {
            chunks.push(current.concat().trim().to_string());
        }

        chunks.retain(|c| !c.is_empty());
        chunks
    }

    /// Split every document into nodes with content-derived ids
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Node> {
        let mut nodes = Vec::new();
        for document in documents {
            for (idx, chunk) in self.split(&document.text).into_iter().enumerate() {
                let chunk_index = idx.to_string();
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_index".to_string(), chunk_index.clone());

                nodes.push(Node {
                    id: content_hash(&[&document.id, &chunk_index, &chunk]),
                    document_id: document.id.clone(),
                    text: chunk,
                    metadata,
                });
            }
        }
        debug!("Split {} documents into {} nodes", documents.len(), nodes.len());
        nodes
    }

    /// Trailing sentences of a finished chunk that fit in the overlap budget
    fn overlap_tail(&self, pieces: &[String]) -> (Vec<String>, usize) {
        let mut carried = Vec::new();
        let mut carried_len = 0;
        for piece in pieces.iter().rev() {
            let len = char_len(piece);
            if carried_len + len > self.chunk_overlap {
                break;
            }
            carried_len += len;
            carried.push(piece.clone());
        }
        carried.reverse();
        (carried, carried_len)
    }

    fn hard_split(&self, sentence: &str) -> Vec<String> {
        let chars: Vec<char> = sentence.chars().collect();
        chars
            .chunks(self.chunk_size)
            .map(|c| c.iter().collect())
            .collect()
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split after sentence terminators and newlines, keeping trailing whitespace
/// with the sentence it follows.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let boundary = match ch {
            '\n' => true,
            '.' | '!' | '?' => chars.peek().map_or(true, |(_, next)| next.is_whitespace()),
            _ => false,
        };
        if boundary {
            let mut end = idx + ch.len_utf8();
            while let Some(&(j, c)) = chars.peek() {
                if !c.is_whitespace() {
                    break;
                }
                end = j + c.len_utf8();
                chars.next();
            }
            sentences.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}
