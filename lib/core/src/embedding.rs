//! Embedding layout: native provider length vs. persisted storage length.
//!
//! Providers emit vectors of `native_dim` entries. Storage keeps every
//! vector at `storage_dim >= native_dim`, zero-padding the tail. All
//! similarity math happens on native-length slices.

use crate::{Error, Result};

/// Provider output length for all-MiniLM-L6-v2
pub const DEFAULT_NATIVE_DIM: usize = 384;

/// Persisted column width
pub const DEFAULT_STORAGE_DIM: usize = 1536;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddingLayout {
    native_dim: usize,
    storage_dim: usize,
}

impl Default for EmbeddingLayout {
    fn default() -> Self {
        Self {
            native_dim: DEFAULT_NATIVE_DIM,
            storage_dim: DEFAULT_STORAGE_DIM,
        }
    }
}

impl EmbeddingLayout {
    pub fn new(native_dim: usize, storage_dim: usize) -> Result<Self> {
        if native_dim == 0 {
            return Err(Error::InvalidConfig("native_dim must be positive".into()));
        }
        if storage_dim < native_dim {
            return Err(Error::InvalidConfig(format!(
                "storage_dim ({}) must be at least native_dim ({})",
                storage_dim, native_dim
            )));
        }
        Ok(Self { native_dim, storage_dim })
    }

    #[inline]
    #[must_use]
    pub fn native_dim(&self) -> usize {
        self.native_dim
    }

    #[inline]
    #[must_use]
    pub fn storage_dim(&self) -> usize {
        self.storage_dim
    }

    /// Zero-pad a native vector up to storage length.
    pub fn pad_to_storage(&self, vector: &[f32]) -> Result<Vec<f32>> {
        if vector.len() != self.native_dim {
            return Err(Error::DimensionMismatch {
                expected: self.native_dim,
                actual: vector.len(),
            });
        }
        let mut padded = Vec::with_capacity(self.storage_dim);
        padded.extend_from_slice(vector);
        padded.resize(self.storage_dim, 0.0);
        Ok(padded)
    }

    /// Slice a persisted vector down to its information-bearing prefix.
    pub fn extract_native<'a>(&self, vector: &'a [f32]) -> Result<&'a [f32]> {
        if vector.len() != self.storage_dim {
            return Err(Error::DimensionMismatch {
                expected: self.storage_dim,
                actual: vector.len(),
            });
        }
        Ok(&vector[..self.native_dim])
    }

    /// Deterministic stand-in for text that cleans down to nothing
    #[inline]
    #[must_use]
    pub fn zero_native(&self) -> Vec<f32> {
        vec![0.0; self.native_dim]
    }
}

/// Normalize text before it reaches the embedding provider.
///
/// Lowercases, treats punctuation as a separator and collapses runs of
/// whitespace. Identical research interests written with different
/// separators therefore embed identically.
pub fn clean_text(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
