//! Embedding-based ranking over persisted vectors.

use crate::result::{top_results, SimilarityResult};
use scholarlink_core::{cosine_similarity, EmbeddingLayout, FacultyRecord};
use tracing::warn;

/// Rank candidates by cosine similarity to a native-length query vector.
///
/// Candidates without an embedding, or whose stored vector has the wrong
/// length, are skipped. Returns `None` when no candidate is usable.
pub fn rank_dense(
    layout: &EmbeddingLayout,
    query: &[f32],
    candidates: &[FacultyRecord],
    min_similarity: f32,
    max_results: usize,
) -> Option<Vec<SimilarityResult>> {
    let mut scored = Vec::with_capacity(candidates.len());
    for record in candidates {
        let Some(stored) = record.embedding.as_deref() else {
            continue;
        };
        let native = match layout.extract_native(stored) {
            Ok(native) => native,
            Err(e) => {
                warn!("Skipping faculty {}: {}", record.id, e);
                continue;
            }
        };
        match cosine_similarity(query, native) {
            Ok(score) => scored.push((record, score)),
            Err(e) => warn!("Skipping faculty {}: {}", record.id, e),
        }
    }

    if scored.is_empty() {
        return None;
    }
    Some(top_results(scored, min_similarity, max_results))
}
