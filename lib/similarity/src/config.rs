//! Matcher configuration and per-call options

use scholarlink_core::graph::DEFAULT_MAX_CONNECTIONS;
use scholarlink_core::{
    EmbeddingLayout, Error, RecordFilter, Result, DEFAULT_NATIVE_DIM, DEFAULT_STORAGE_DIM,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_PROBE_PHRASE: &str = "research interests similarity probe";
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_MAX_RESULTS: usize = 10;
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.1;

/// Process-wide matcher settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Provider output length
    pub native_dim: usize,
    /// Persisted embedding length
    pub storage_dim: usize,
    /// Text embedded to check the provider works before a dense ranking
    pub probe_phrase: String,
    pub provider_timeout_ms: u64,
    pub default_max_connections: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            native_dim: DEFAULT_NATIVE_DIM,
            storage_dim: DEFAULT_STORAGE_DIM,
            probe_phrase: DEFAULT_PROBE_PHRASE.to_string(),
            provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
            default_max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> Result<()> {
        self.layout()?;
        if self.provider_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "provider_timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn layout(&self) -> Result<EmbeddingLayout> {
        EmbeddingLayout::new(self.native_dim, self.storage_dim)
    }

    #[inline]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }
}

/// Options for a single ranking call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub max_results: usize,
    pub min_similarity: f32,
    pub school_filter: Option<String>,
    pub department_filter: Option<String>,
    /// Try the embedding provider before falling back to TF-IDF
    pub prefer_dense: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            school_filter: None,
            department_filter: None,
            prefer_dense: true,
        }
    }
}

impl MatchOptions {
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    pub fn with_school(mut self, school: impl Into<String>) -> Self {
        self.school_filter = Some(school.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department_filter = Some(department.into());
        self
    }

    pub fn lexical_only(mut self) -> Self {
        self.prefer_dense = false;
        self
    }

    pub fn filter(&self) -> RecordFilter {
        RecordFilter::new(self.school_filter.clone(), self.department_filter.clone())
    }
}
