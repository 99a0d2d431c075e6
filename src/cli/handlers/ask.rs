//! One-off question handler

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::cli::output::*;
use crate::errors::QaError;
use crate::index::IndexStorage;
use crate::AppConfig;
use crate::Result;

/// Answer a question using the same pipeline as the API, bounded by its timeout
pub async fn handle_ask(config: &AppConfig, question: &str, sources_only: bool) -> Result<()> {
    let storage = IndexStorage::from_config(config).await?;
    let cancel = CancellationToken::new();
    let timeout = config.api_timeout();

    println!("❓ {question}\n");

    if sources_only {
        let sources = tokio::time::timeout(timeout, storage.retrieve(question, &cancel))
            .await
            .map_err(|_| timed_out(timeout))??;
        print_sources(&sources);
        return Ok(());
    }

    let response = tokio::time::timeout(timeout, storage.query(question, &cancel))
        .await
        .map_err(|_| timed_out(timeout))??;
    println!("{}", response.format());
    Ok(())
}

fn timed_out(timeout: Duration) -> QaError {
    QaError::Custom(format!("Question not answered within {}s", timeout.as_secs()))
}
