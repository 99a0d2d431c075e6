//! API server handlers

use std::sync::Arc;

use crate::api::serve_api;
use crate::cli::output::*;
use crate::index::IndexOrigin;
use crate::index::IndexStorage;
use crate::models::AnswerMode;
use crate::AppConfig;
use crate::Result;

pub async fn handle_serve_api(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    placeholder: bool,
) -> Result<()> {
    let mut config = config.clone();
    if placeholder {
        config.qa.answer_mode = AnswerMode::Placeholder;
    }
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    println!("🚀 Starting Playbook QA API Server");
    println!("==================================\n");
    println!("📍 Host: {host}");
    println!("🔌 Port: {port}");
    println!(
        "🌐 CORS: {}",
        if config.server.enable_cors {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!("⏱️  Timeout: {}s", config.server.api_timeout_secs);
    println!("💬 Answer mode: {:?}", config.answer_mode());
    println!();

    let storage = IndexStorage::from_config(&config).await?;
    match storage.origin() {
        IndexOrigin::Loaded => print_info(&format!(
            "Loaded index from {} ({} nodes)",
            config.index_dir().display(),
            storage.index().len()
        )),
        IndexOrigin::Built => print_success(&format!(
            "Built index from {} ({} nodes)",
            config.source_csv().display(),
            storage.index().len()
        )),
    }
    println!();

    serve_api(&config, Arc::new(storage), host, port).await
}
