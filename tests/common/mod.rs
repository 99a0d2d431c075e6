//! Shared fixtures: in-process embedder and generator plus a temp workspace

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use playbook_qa::embeddings::Embedder;
use playbook_qa::index::IndexStorage;
use playbook_qa::llm::GenerationParams;
use playbook_qa::llm::Generator;
use playbook_qa::models::AnswerMode;
use playbook_qa::AppConfig;
use playbook_qa::QaError;
use playbook_qa::Result;
use tempfile::TempDir;

pub const PLAYBOOK_CSV: &str = "\
name,description,question,answer,gallery_id
Opening Range Breakout,First hour setup,What is the entry rule?,Enter when a bar closes outside the opening range.,101
Trailing Exit,Managing winners,Where do I put the protective stop?,Keep the stop at AMA12 once in profit.,102
";

const AXES: [&str; 2] = ["entry", "stop"];

/// Embeds text onto keyword axes, with a constant bias so nothing is a zero vector
#[derive(Default)]
pub struct KeywordEmbedder {
    pub query_calls: AtomicUsize,
    pub document_calls: AtomicUsize,
}

impl KeywordEmbedder {
    fn vector(text: &str) -> Vec<f32> {
        let text = text.to_lowercase();
        let mut v: Vec<f32> = AXES
            .iter()
            .map(|axis| if text.contains(axis) { 1.0 } else { 0.0 })
            .collect();
        v.push(0.1);
        v
    }

    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }
}

impl Embedder for KeywordEmbedder {
    fn model(&self) -> &str {
        "keyword-test"
    }

    fn embed_query<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        async move { Ok(Self::vector(text)) }.boxed()
    }

    fn embed_documents<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        async move { Ok(texts.iter().map(|t| Self::vector(t)).collect()) }.boxed()
    }
}

/// Returns a canned answer after an optional delay, recording each prompt
pub struct ScriptedGenerator {
    pub answer: Option<String>,
    pub delay: Duration,
    pub started: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            delay: Duration::ZERO,
            started: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::answering("too late")
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            ..Self::answering("")
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Generator for ScriptedGenerator {
    fn generate<'a>(&'a self, prompt: &'a str, _params: GenerationParams) -> BoxFuture<'a, Result<String>> {
        self.started.fetch_add(1, Ordering::SeqCst);
        async move {
            tokio::time::sleep(self.delay).await;
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.answer
                .clone()
                .ok_or_else(|| QaError::LlmError("model unavailable".to_string()))
        }
        .boxed()
    }
}

/// Config rooted in `dir` with the playbook CSV written to it
pub fn workspace_config(dir: &Path, answer_mode: AnswerMode) -> AppConfig {
    let source_csv = dir.join("standard_answers.csv");
    std::fs::write(&source_csv, PLAYBOOK_CSV).unwrap();

    let mut config = AppConfig::default();
    config.index.index_dir = dir.join("saved_index");
    config.index.source_csv = source_csv;
    config.index.cache_dir = dir.join("cache");
    config.index.similarity_top_k = 1;
    config.qa.answer_mode = answer_mode;
    config
}

pub struct TestService {
    pub _dir: TempDir,
    pub storage: Arc<IndexStorage>,
    pub embedder: Arc<KeywordEmbedder>,
    pub generator: Arc<ScriptedGenerator>,
}

/// Build an index in a fresh temp dir and wrap it for serving
pub async fn test_service(answer_mode: AnswerMode, generator: ScriptedGenerator) -> TestService {
    let dir = TempDir::new().unwrap();
    let config = workspace_config(dir.path(), answer_mode);
    let embedder = Arc::new(KeywordEmbedder::default());
    let generator = Arc::new(generator);

    let storage = IndexStorage::initialize(&config, embedder.clone(), generator.clone())
        .await
        .unwrap();

    TestService {
        _dir: dir,
        storage: Arc::new(storage),
        embedder,
        generator,
    }
}
