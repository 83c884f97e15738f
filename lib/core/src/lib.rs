//! # scholarlink Core
//!
//! Core library for the scholarlink research-interest matcher.
//!
//! This crate provides the pure building blocks; nothing here performs I/O:
//!
//! - [`FacultyRecord`] - A researcher with optional persisted embedding
//! - [`tokenize`] / [`TfIdfModel`] - Lexical representation of keyword text
//! - [`cosine_similarity`] - Similarity primitive shared by both ranking paths
//! - [`EmbeddingLayout`] - Native vs. storage dimensionality of embeddings
//! - [`GraphBuilder`] - Capped pairwise-similarity graph with department clusters
//! - [`analyze_topics`] - Keyword-frequency topic summary
//!
//! ## Example
//!
//! ```rust
//! use scholarlink_core::{cosine_similarity, tokenize, EmbeddingLayout, TfIdfModel};
//!
//! let corpus = vec![
//!     tokenize("machine learning, neural networks"),
//!     tokenize("cooking, recipes"),
//! ];
//! let model = TfIdfModel::fit(&corpus);
//! let a = model.vectorize(&corpus[0]);
//! let b = model.vectorize(&corpus[1]);
//! assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
//!
//! let layout = EmbeddingLayout::new(3, 6).unwrap();
//! let stored = layout.pad_to_storage(&[0.1, 0.2, 0.3]).unwrap();
//! assert_eq!(layout.extract_native(&stored).unwrap(), &[0.1, 0.2, 0.3]);
//! ```

pub mod cluster;
pub mod embedding;
pub mod error;
pub mod graph;
pub mod record;
pub mod tfidf;
pub mod tokenizer;
pub mod topics;
pub mod vector;

pub use cluster::label_cluster;
pub use embedding::{clean_text, EmbeddingLayout, DEFAULT_NATIVE_DIM, DEFAULT_STORAGE_DIM};
pub use error::{Error, Result};
pub use graph::{Cluster, Edge, Graph, GraphBuilder, Node};
pub use record::{FacultyId, FacultyRecord, RecordFilter};
pub use tfidf::{inverse_document_frequency, term_frequency, TfIdfModel};
pub use tokenizer::tokenize;
pub use topics::{analyze_topics, Topic, TopicMember, TopicReport};
pub use vector::cosine_similarity;
