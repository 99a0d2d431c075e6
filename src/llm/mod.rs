//! Answer generation through an external LLM

pub mod client;
pub mod prompts;

pub use client::GeminiLlmClient;
use futures::future::BoxFuture;
pub use prompts::PromptTemplate;
pub use prompts::QaPrompts;

use crate::config::LlmConfig;
use crate::errors::Result;
use crate::models::ModelSource;

/// Per-call generation settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub model: ModelSource,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl GenerationParams {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Produces a completion for a fully rendered prompt
pub trait Generator: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str, params: GenerationParams) -> BoxFuture<'a, Result<String>>;
}
