//! # scholarlink
//!
//! Research-interest matching for faculty directories.
//!
//! scholarlink ranks researchers by how close their declared interests are
//! to a colleague's or to a free-text query. Dense embeddings are used when
//! a provider is available; otherwise ranking falls back to TF-IDF, and the
//! response records which path served it. It also builds capped similarity
//! graphs with department clusters and keyword-frequency topic summaries.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! scholarlink --data faculty.json match-query "protein folding"
//! scholarlink --data faculty.json graph --threshold 0.4
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use scholarlink::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = MemoryStore::load_snapshot("faculty.json")?;
//! let config = MatcherConfig::default();
//! let provider = HashingProvider::new(config.native_dim);
//! let matcher = Matcher::new(Arc::new(store), Arc::new(ReadyLoader(Arc::new(provider))), config)?;
//!
//! let response = matcher
//!     .match_by_record(&FacultyId::Integer(42), &MatchOptions::default())
//!     .await?;
//! for result in &response.results {
//!     println!("{} {:.3} ({})", result.name, result.score, response.provenance);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - `scholarlink-core` - Records, tokenizer, TF-IDF, embedding layout, graph and topics
//! - `scholarlink-storage` - Storage trait, in-memory store, JSON snapshots
//! - `scholarlink-similarity` - Provider handle and the dense/lexical matcher

// Re-export core types
pub use scholarlink_core::{
    analyze_topics, clean_text, cosine_similarity, label_cluster, tokenize, Cluster, Edge,
    EmbeddingLayout, Error, FacultyId, FacultyRecord, Graph, GraphBuilder, Node, RecordFilter,
    Result, TfIdfModel, Topic, TopicReport,
};

// Re-export storage
pub use scholarlink_storage::{FacultyStore, MemoryStore};

// Re-export matching
pub use scholarlink_similarity::{
    EmbeddingProvider, HashingProvider, MatchOptions, MatchResponse, Matcher, MatcherConfig,
    Provenance, ProviderHandle, ProviderLoader, ReadyLoader, SimilarityResult,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        EmbeddingProvider, Error, FacultyId, FacultyRecord, FacultyStore, Graph, HashingProvider,
        MatchOptions, MatchResponse, Matcher, MatcherConfig, MemoryStore, Provenance,
        ProviderLoader, ReadyLoader, RecordFilter, Result,
    };
}
