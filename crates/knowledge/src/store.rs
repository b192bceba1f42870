//! In-memory document corpus with brute-force relevance ranking.

use crate::config::RetrievalConfig;
use crate::embeddings::{DocumentKey, EmbeddingCache, EmbeddingProvider};
use crate::persistence::DocumentPersistence;
use crate::similarity::SimilarityMetric;
use crate::types::{Document, Metadata, RetrievalResult};
use digibuddy_core::{AppError, AppResult};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owns the corpus and answers "most relevant documents" queries.
///
/// The corpus is a snapshot of persistence taken by [`load_documents`](Self::load_documents)
/// plus whatever is added through this store. Scoring works on a copy of the
/// corpus, so no lock is held while the embedding provider is called.
#[derive(Debug)]
pub struct DocumentStore {
    persistence: Arc<dyn DocumentPersistence>,
    provider: Arc<dyn EmbeddingProvider>,
    cache: EmbeddingCache,
    documents: RwLock<Vec<Document>>,
    metric: SimilarityMetric,
    relevance_threshold: f32,
}

impl DocumentStore {
    /// Create a store with an empty corpus and default ranking settings.
    pub fn new(
        persistence: Arc<dyn DocumentPersistence>,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        let defaults = RetrievalConfig::default();
        Self {
            persistence,
            provider,
            cache: EmbeddingCache::new(),
            documents: RwLock::new(Vec::new()),
            metric: defaults.metric,
            relevance_threshold: defaults.relevance_threshold,
        }
    }

    pub fn with_retrieval(mut self, retrieval: &RetrievalConfig) -> Self {
        self.metric = retrieval.metric;
        self.relevance_threshold = retrieval.relevance_threshold;
        self
    }

    /// Create a store and load the persisted corpus.
    pub async fn open(
        persistence: Arc<dyn DocumentPersistence>,
        provider: Arc<dyn EmbeddingProvider>,
        retrieval: &RetrievalConfig,
    ) -> AppResult<Self> {
        let store = Self::new(persistence, provider).with_retrieval(retrieval);
        store.load_documents().await?;
        Ok(store)
    }

    /// Persist a document, then append it to the corpus.
    ///
    /// The embedding is not computed here. A document whose source is already
    /// present is appended again; its record on disk is replaced.
    pub async fn add_document(
        &self,
        content: impl Into<String>,
        source: impl Into<String>,
        metadata: Option<Metadata>,
    ) -> AppResult<()> {
        let document = Document::new(content, source, metadata.unwrap_or_default());

        let mut documents = self.documents.write().await;
        let record = document.clone();
        self.with_persistence(move |persistence| persistence.write(&record))
            .await?;

        tracing::info!(
            source = %document.source,
            content_len = document.content.len(),
            "Added document to knowledge base"
        );
        documents.push(document);
        Ok(())
    }

    /// Replace the corpus with every persisted record. Returns the new size.
    pub async fn load_documents(&self) -> AppResult<usize> {
        let loaded = self
            .with_persistence(|persistence| persistence.list_all())
            .await?;
        let count = loaded.len();
        let live: HashSet<DocumentKey> = loaded.iter().map(DocumentKey::for_document).collect();

        *self.documents.write().await = loaded;
        let evicted = self.cache.retain(&live).await;

        tracing::info!(evicted, "Loaded {} documents into knowledge base", count);
        Ok(count)
    }

    /// Rank the corpus against `query` and return at most `top_k` results
    /// scoring strictly above the relevance threshold, best first.
    ///
    /// Never fails: an empty corpus or a failed query embedding yields no
    /// results, and documents whose embedding cannot be computed are skipped.
    pub async fn get_relevant_chunks(&self, query: &str, top_k: usize) -> Vec<RetrievalResult> {
        let documents = self.documents().await;
        if documents.is_empty() {
            tracing::debug!("Knowledge base is empty, skipping retrieval");
            return Vec::new();
        }

        let query_embedding = match self.provider.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::warn!("Failed to embed query, continuing without context: {}", e);
                return Vec::new();
            }
        };

        let mut scored: Vec<(f32, &Document)> = Vec::with_capacity(documents.len());
        for document in &documents {
            if let Some(embedding) = self.embedding_for(document).await {
                let score = self.metric.score(&query_embedding, &embedding);
                if score.is_nan() {
                    tracing::warn!(source = %document.source, "Similarity is NaN, leaving document unscored");
                    continue;
                }
                scored.push((score, document));
            }
        }

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let results: Vec<RetrievalResult> = scored
            .into_iter()
            .filter(|(score, _)| *score > self.relevance_threshold)
            .take(top_k)
            .map(|(score, document)| RetrievalResult::from_document(document, score))
            .collect();

        tracing::debug!(
            candidates = documents.len(),
            returned = results.len(),
            metric = self.metric.as_str(),
            "Ranked knowledge base documents"
        );

        results
    }

    /// Cached embedding for a document, computing it on first use.
    async fn embedding_for(&self, document: &Document) -> Option<Arc<[f32]>> {
        let key = DocumentKey::for_document(document);
        if let Some(embedding) = self.cache.get(&key).await {
            return Some(embedding);
        }

        match self.provider.embed(&document.content).await {
            Ok(embedding) => {
                let embedding: Arc<[f32]> = Arc::from(embedding);
                self.cache.insert(key, Arc::clone(&embedding)).await;
                Some(embedding)
            }
            Err(e) => {
                tracing::warn!(
                    source = %document.source,
                    "Failed to embed document, leaving it unscored: {}",
                    e
                );
                None
            }
        }
    }

    /// Embedding already cached for `document`, if any.
    pub async fn cached_embedding(&self, document: &Document) -> Option<Arc<[f32]>> {
        self.cache.get(&DocumentKey::for_document(document)).await
    }

    /// Delete the record for `source` and every corpus entry carrying it.
    ///
    /// Returns the number of corpus entries removed.
    pub async fn remove_document(&self, source: &str) -> AppResult<usize> {
        let mut documents = self.documents.write().await;
        let owned_source = source.to_string();
        let existed = self
            .with_persistence(move |persistence| persistence.remove(&owned_source))
            .await?;

        let mut removed = Vec::new();
        documents.retain(|document| {
            if document.source == source {
                removed.push(DocumentKey::for_document(document));
                false
            } else {
                true
            }
        });
        drop(documents);

        for key in &removed {
            self.cache.remove(key).await;
        }

        tracing::info!(
            source = %source,
            record_deleted = existed,
            entries_removed = removed.len(),
            "Removed document from knowledge base"
        );
        Ok(removed.len())
    }

    /// Delete every record and empty the corpus and the embedding cache.
    pub async fn clear(&self) -> AppResult<usize> {
        let mut documents = self.documents.write().await;
        let deleted = self
            .with_persistence(|persistence| persistence.clear())
            .await?;
        documents.clear();
        drop(documents);

        self.cache.clear().await;

        tracing::info!("Cleared {} document records from knowledge base", deleted);
        Ok(deleted)
    }

    /// Snapshot of the corpus in insertion order.
    pub async fn documents(&self) -> Vec<Document> {
        self.documents.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    pub fn embedding_provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }

    /// Run a persistence call on the blocking pool.
    async fn with_persistence<T, F>(&self, op: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn DocumentPersistence) -> AppResult<T> + Send + 'static,
    {
        let persistence = Arc::clone(&self.persistence);
        tokio::task::spawn_blocking(move || op(persistence.as_ref()))
            .await
            .map_err(|e| AppError::Knowledge(format!("Persistence task failed: {}", e)))?
    }
}
