//! Deterministic hash embedding

use sha2::{Digest, Sha256};

pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 128;

/// Bag-of-tokens embedding: each lowercase whitespace token increments the
/// bucket selected by the first byte of its SHA-256 digest. Vectors are
/// L2-normalised.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIMENSIONS)
    }
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimensions];

        for token in text.to_lowercase().split_whitespace() {
            let digest = Sha256::digest(token.as_bytes());
            let idx = digest[0] as usize % self.dimensions;
            vector[idx] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        let norm = if norm == 0.0 { 1.0 } else { norm };

        vector.iter().map(|v| v / norm).collect()
    }
}

/// Cosine similarity of two equal-length vectors; 0 when either is zero
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_is_normalised() {
        let embedder = HashEmbedder::default();
        let vector = embedder.embed("standard track gauge");

        assert_eq!(vector.len(), 128);
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_embedding_is_deterministic_and_case_insensitive() {
        let embedder = HashEmbedder::new(64);
        assert_eq!(embedder.embed("Rail Gauge"), embedder.embed("rail   gauge"));
    }

    #[test]
    fn test_empty_text_embeds_to_zero() {
        let embedder = HashEmbedder::new(16);
        assert!(embedder.embed("").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_cosine_similarity() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("rail gauge");

        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-5);
        assert_eq!(cosine_similarity(&a, &vec![0.0; a.len()]), 0.0);
    }
}
