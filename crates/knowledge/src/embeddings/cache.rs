//! Process-lifetime cache of document embeddings.

use crate::types::Document;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cache key for a document's embedding.
///
/// Derived from both source and content, so a document re-added under the
/// same source with new text never reuses the old vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey(String);

impl DocumentKey {
    pub fn for_document(document: &Document) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(document.source.as_bytes());
        hasher.update([0u8]);
        hasher.update(document.content.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Embeddings computed on first retrieval, never persisted.
///
/// Two concurrent first lookups may both compute the vector; the result is
/// the same either way and the later insert simply replaces the earlier one.
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    entries: RwLock<HashMap<DocumentKey, Arc<[f32]>>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &DocumentKey) -> Option<Arc<[f32]>> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: DocumentKey, embedding: Arc<[f32]>) {
        self.entries.write().await.insert(key, embedding);
    }

    pub async fn remove(&self, key: &DocumentKey) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Drop every entry whose key is not in `live`. Returns how many were dropped.
    pub async fn retain(&self, live: &HashSet<DocumentKey>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| live.contains(key));
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metadata;

    #[test]
    fn test_key_depends_on_source_and_content() {
        let a = Document::new("rest", "sleep.txt", Metadata::new());
        let same = Document::new("rest", "sleep.txt", Metadata::new());
        let new_content = Document::new("rest well", "sleep.txt", Metadata::new());
        let new_source = Document::new("rest", "naps.txt", Metadata::new());

        assert_eq!(DocumentKey::for_document(&a), DocumentKey::for_document(&same));
        assert_ne!(DocumentKey::for_document(&a), DocumentKey::for_document(&new_content));
        assert_ne!(DocumentKey::for_document(&a), DocumentKey::for_document(&new_source));
        assert_eq!(DocumentKey::for_document(&a).as_str().len(), 64);
    }

    #[test]
    fn test_key_separates_source_from_content() {
        let a = Document::new("bc", "a", Metadata::new());
        let b = Document::new("c", "ab", Metadata::new());
        assert_ne!(DocumentKey::for_document(&a), DocumentKey::for_document(&b));
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = EmbeddingCache::new();
        let key = DocumentKey::for_document(&Document::new("x", "s", Metadata::new()));

        assert!(cache.get(&key).await.is_none());
        cache.insert(key.clone(), Arc::from(vec![1.0, 2.0])).await;
        assert_eq!(cache.get(&key).await.as_deref(), Some(&[1.0, 2.0][..]));

        assert!(cache.remove(&key).await);
        assert!(!cache.remove(&key).await);
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_retain_keeps_only_live_keys() {
        let cache = EmbeddingCache::new();
        let kept = DocumentKey::for_document(&Document::new("calm", "a.txt", Metadata::new()));
        let stale = DocumentKey::for_document(&Document::new("old", "b.txt", Metadata::new()));
        cache.insert(kept.clone(), Arc::from(vec![1.0])).await;
        cache.insert(stale.clone(), Arc::from(vec![2.0])).await;

        let live: HashSet<DocumentKey> = [kept.clone()].into_iter().collect();
        assert_eq!(cache.retain(&live).await, 1);

        assert!(cache.get(&kept).await.is_some());
        assert!(cache.get(&stale).await.is_none());
    }
}
