//! Durable storage for corpus documents.
//!
//! Records hold content, source and metadata only. Embeddings are never written.

use crate::types::Document;
use digibuddy_core::AppResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage backend for documents, injected into the [`DocumentStore`](crate::DocumentStore).
pub trait DocumentPersistence: Send + Sync + std::fmt::Debug {
    /// Write a record, replacing any record stored under the same key.
    fn write(&self, document: &Document) -> AppResult<()>;

    /// Read every stored record in a stable order.
    fn list_all(&self) -> AppResult<Vec<Document>>;

    /// Delete the record holding `source`. Returns whether one was deleted.
    ///
    /// A record stored under the same key for a different source is left alone.
    fn remove(&self, source: &str) -> AppResult<bool>;

    /// Delete every record. Returns how many were deleted.
    fn clear(&self) -> AppResult<usize>;
}

/// One pretty-printed JSON file per document under a directory.
#[derive(Debug, Clone)]
pub struct FsDocumentPersistence {
    dir: PathBuf,
}

impl FsDocumentPersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record that stores `source`.
    pub fn record_path(&self, source: &str) -> PathBuf {
        self.dir.join(format!("{}.json", storage_stem(source)))
    }

    fn record_files(&self) -> Vec<PathBuf> {
        if !self.dir.exists() {
            return Vec::new();
        }

        walkdir::WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect()
    }
}

/// Filesystem-safe file stem for a source name.
///
/// Directory components and the last extension are dropped, then anything
/// outside `[A-Za-z0-9._-]` becomes `_`. Sources sharing a stem share a file.
pub fn storage_stem(source: &str) -> String {
    let stem: String = Path::new(source)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "document".to_string()
    } else {
        stem
    }
}

impl DocumentPersistence for FsDocumentPersistence {
    fn write(&self, document: &Document) -> AppResult<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.record_path(&document.source);
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&path, json)?;

        tracing::debug!(source = %document.source, path = ?path, "Wrote document record");
        Ok(())
    }

    fn list_all(&self) -> AppResult<Vec<Document>> {
        let mut documents = Vec::new();

        for path in self.record_files() {
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Skipping unreadable document record {:?}: {}", path, e);
                    continue;
                }
            };

            match serde_json::from_str::<Document>(&content) {
                Ok(document) => documents.push(document),
                Err(e) => {
                    tracing::warn!("Skipping malformed document record {:?}: {}", path, e);
                }
            }
        }

        Ok(documents)
    }

    fn remove(&self, source: &str) -> AppResult<bool> {
        let path = self.record_path(source);
        if !path.exists() {
            return Ok(false);
        }

        let stored = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str::<Document>(&content).ok());
        match stored {
            Some(document) if document.source == source => {}
            Some(document) => {
                tracing::debug!(
                    source = %source,
                    stored_source = %document.source,
                    "Record file belongs to another source, keeping it"
                );
                return Ok(false);
            }
            None => {
                tracing::warn!("Not removing unreadable document record {:?}", path);
                return Ok(false);
            }
        }

        fs::remove_file(&path)?;
        tracing::debug!(source = %source, path = ?path, "Removed document record");
        Ok(true)
    }

    fn clear(&self) -> AppResult<usize> {
        let files = self.record_files();
        for path in &files {
            fs::remove_file(path)?;
        }
        Ok(files.len())
    }
}
