//! # scholarlink Similarity
//!
//! Ranks researchers against a stored faculty record or free text.
//!
//! A [`Matcher`] first tries dense embeddings from an [`EmbeddingProvider`]
//! and silently falls back to TF-IDF when the provider cannot be loaded,
//! times out, or produces nothing usable. Every [`MatchResponse`] says which
//! path produced it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use scholarlink_similarity::{HashingProvider, MatchOptions, Matcher, MatcherConfig, ReadyLoader};
//! use scholarlink_storage::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn run() -> scholarlink_core::Result<()> {
//! let store = MemoryStore::load_snapshot("faculty.json").expect("snapshot");
//! let config = MatcherConfig::default();
//! let loader = ReadyLoader(Arc::new(HashingProvider::new(config.native_dim)));
//! let matcher = Matcher::new(Arc::new(store), Arc::new(loader), config)?;
//!
//! let response = matcher
//!     .match_by_query("protein folding", &MatchOptions::default())
//!     .await?;
//! println!("{} results via {}", response.results.len(), response.provenance);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dense;
pub mod lexical;
pub mod matcher;
pub mod provider;
pub mod result;

pub use config::{MatchOptions, MatcherConfig};
pub use lexical::{rank_lexical, rank_lexical_for_record};
pub use matcher::{FallbackReason, Matcher, Route};
pub use provider::{EmbeddingProvider, HashingProvider, ProviderHandle, ProviderLoader, ReadyLoader};
pub use result::{MatchResponse, Provenance, SimilarityResult};
