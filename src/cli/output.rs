//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `playbook-qa` CLI

use crate::index::IndexMeta;
use crate::models::ScoredNode;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// Returns the original string, or its first `max_chars` characters with a
/// "..." suffix.
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print configuration (API keys are never printed, only their presence)
pub fn print_config(config: &AppConfig) {
    println!("📋 Playbook QA Configuration:");
    println!();

    println!("🌐 Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  Timeout: {}s", config.server.api_timeout_secs);
    println!("  CORS: {}", config.server.enable_cors);
    println!();

    println!("📚 Index:");
    println!("  Directory: {}", config.index_dir().display());
    println!("  Source CSV: {}", config.source_csv().display());
    println!("  Cache: {}", config.cache_dir().display());
    println!(
        "  Chunking: {} chars, {} overlap",
        config.index.chunk_size, config.index.chunk_overlap
    );
    println!("  Top-k: {}", config.index.similarity_top_k);
    println!("  Max context: {}", config.index.max_context_length);
    println!(
        "  Build workers: {} (batch {})",
        config.index.max_workers, config.index.embed_batch_size
    );
    println!();

    println!("🧠 Embeddings:");
    println!("  Model: {}", config.embedding_model());
    println!("  Dimension: {}", config.embeddings.dimension);
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!("  Key: {}", key_status(&config.embeddings.api_key_env));
    println!();

    println!("🤖 LLM:");
    println!("  Model: {}", config.llm_model());
    println!("  Endpoint: {}", config.llm.endpoint);
    println!("  Temperature: {}", config.llm.temperature);
    println!("  Max tokens: {}", config.llm.max_tokens);
    if let Some(path) = &config.llm.prompt_template_path {
        println!("  Prompt template: {}", path.display());
    }
    println!("  Key: {}", key_status(&config.llm.api_key_env));
    println!();

    println!("💬 QA:");
    println!("  Answer mode: {:?}", config.answer_mode());
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
}

fn key_status(env_var: &str) -> String {
    match std::env::var(env_var) {
        Ok(value) if !value.is_empty() => format!("${env_var} (set, redacted)"),
        _ => format!("${env_var} (not set)"),
    }
}

/// Print persisted index metadata
pub fn print_index_meta(meta: &IndexMeta) {
    println!("📚 Index:");
    println!("  Format version: {}", meta.format_version);
    println!("  Embedding model: {}", meta.embedding_model);
    println!("  Dimension: {}", meta.dimension);
    println!("  Documents: {}", meta.document_count);
    println!("  Nodes: {}", meta.node_count);
    println!("  Created: {}", meta.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
}

/// Print retrieved passages, best first
pub fn print_sources(sources: &[ScoredNode]) {
    println!("Sources ({} passages):", sources.len());
    for (idx, source) in sources.iter().enumerate() {
        let name = source.node.metadata.get("name").map_or("untitled", String::as_str);
        println!("  {}. {} (score: {:.3})", idx + 1, name, source.score);
        println!("     {}", truncate_str(source.node.text.trim(), 160));
    }
}

pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}
