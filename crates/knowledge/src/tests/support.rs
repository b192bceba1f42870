//! In-process providers with scripted behaviour.

use crate::embeddings::EmbeddingProvider;
use crate::persistence::DocumentPersistence;
use crate::rag::ContextRetriever;
use crate::types::{Document, Metadata, RetrievalResult};
use async_trait::async_trait;
use digibuddy_core::{AppError, AppResult};
use digibuddy_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Embeddings looked up by exact text; unknown or failing texts error.
#[derive(Debug, Default)]
pub struct ScriptedEmbeddings {
    vectors: HashMap<String, Vec<f32>>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl ScriptedEmbeddings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, vector: &[f32]) -> Self {
        self.vectors.insert(text.to_string(), vector.to_vec());
        self
    }

    pub fn failing(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for ScriptedEmbeddings {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-v1"
    }

    fn dimensions(&self) -> usize {
        2
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|text| {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if self.failing.contains(text) {
                    return Err(AppError::Provider("quota exceeded".to_string()));
                }
                self.vectors
                    .get(text)
                    .cloned()
                    .ok_or_else(|| AppError::Provider(format!("no embedding for {:?}", text)))
            })
            .collect()
    }
}

/// Generation client that returns a fixed reply and records prompts.
#[derive(Debug)]
pub struct FakeLlm {
    configured: bool,
    reply: Result<String, String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            configured: true,
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            ..Self::replying("")
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::replying("should never be sent")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    fn provider_name(&self) -> &str {
        "fake"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());

        match &self.reply {
            Ok(text) => Ok(LlmResponse {
                content: text.clone(),
                model: request.model.clone(),
                usage: LlmUsage::default(),
            }),
            Err(message) => Err(AppError::Provider(message.clone())),
        }
    }
}

/// Retriever returning fixed results and recording the requested `top_k`.
#[derive(Debug, Default)]
pub struct StaticRetriever {
    results: Vec<RetrievalResult>,
    requested_top_k: Mutex<Vec<usize>>,
}

impl StaticRetriever {
    pub fn with_sources(sources: &[(&str, &str)]) -> Self {
        let results = sources
            .iter()
            .map(|(source, content)| RetrievalResult {
                content: content.to_string(),
                source: source.to_string(),
                metadata: Metadata::new(),
                similarity: 0.9,
            })
            .collect();
        Self {
            results,
            requested_top_k: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requested_top_k.lock().unwrap().len()
    }

    pub fn requested_top_k(&self) -> Vec<usize> {
        self.requested_top_k.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContextRetriever for StaticRetriever {
    async fn retrieve(&self, _query: &str, top_k: usize) -> AppResult<Vec<RetrievalResult>> {
        self.requested_top_k.lock().unwrap().push(top_k);
        Ok(self.results.iter().take(top_k).cloned().collect())
    }
}

/// Retriever that always fails.
pub struct FailingRetriever;

#[async_trait]
impl ContextRetriever for FailingRetriever {
    async fn retrieve(&self, _query: &str, _top_k: usize) -> AppResult<Vec<RetrievalResult>> {
        Err(AppError::Knowledge("index unavailable".to_string()))
    }
}

/// Persistence whose writes always fail.
#[derive(Debug)]
pub struct ReadOnlyPersistence;

impl DocumentPersistence for ReadOnlyPersistence {
    fn write(&self, _document: &Document) -> AppResult<()> {
        Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only storage",
        )))
    }

    fn list_all(&self) -> AppResult<Vec<Document>> {
        Ok(Vec::new())
    }

    fn remove(&self, _source: &str) -> AppResult<bool> {
        Ok(false)
    }

    fn clear(&self) -> AppResult<usize> {
        Ok(0)
    }
}
