//! Loading the standard-answers CSV

use std::path::Path;

use tracing::info;
use tracing::warn;

use crate::errors::QaError;
use crate::errors::Result;
use crate::models::Document;
use crate::models::StandardAnswer;

/// Read standard answers from a CSV with a header row
///
/// Required columns are `question` and `answer`; `name`, `description` and
/// `gallery_id` are optional. Rows with an empty question or answer are
/// skipped.
pub fn load_standard_answers_from_csv(path: &Path) -> Result<Vec<StandardAnswer>> {
    if !path.is_file() {
        return Err(QaError::SourceNotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut answers = Vec::new();
    for (row, record) in reader.deserialize::<StandardAnswer>().enumerate() {
        let answer = record?;
        if answer.question.is_empty() || answer.answer.is_empty() {
            // +2: one-based, after the header
            warn!("Skipping row {} of {}: empty question or answer", row + 2, path.display());
            continue;
        }
        answers.push(answer);
    }

    info!("Loaded {} standard answers from {}", answers.len(), path.display());
    Ok(answers)
}

/// Load the CSV and convert every row into a document
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    Ok(load_standard_answers_from_csv(path)?
        .iter()
        .map(StandardAnswer::to_document)
        .collect())
}
