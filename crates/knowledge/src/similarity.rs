//! Similarity scoring between embedding vectors.

use serde::{Deserialize, Serialize};

/// How a document embedding is scored against the query embedding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// Raw dot product, no normalisation by magnitude.
    #[default]
    Dot,
    /// Cosine similarity in [-1, 1].
    Cosine,
}

impl SimilarityMetric {
    pub fn score(self, query: &[f32], document: &[f32]) -> f32 {
        match self {
            SimilarityMetric::Dot => dot_product(query, document),
            SimilarityMetric::Cosine => cosine_similarity(query, document),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SimilarityMetric::Dot => "dot",
            SimilarityMetric::Cosine => "cosine",
        }
    }
}

/// Dot product over the common prefix of both vectors.
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Cosine similarity; mismatched lengths and zero vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product(a, b) / (norm_a * norm_b)
}
