//! TF-IDF ranking over a per-request corpus.

use crate::result::{top_results, SimilarityResult};
use scholarlink_core::{cosine_similarity, tokenize, FacultyRecord, TfIdfModel};

fn record_tokens(record: &FacultyRecord) -> Vec<String> {
    record.research_text().map(tokenize).unwrap_or_default()
}

/// Rank `candidates` against free text.
///
/// The query is the first document of the corpus, so its terms count
/// towards IDF. Callers ranking against a stored record pass that record's
/// keywords here and leave it out of `candidates`.
pub fn rank_lexical(
    query: &str,
    candidates: &[FacultyRecord],
    min_similarity: f32,
    max_results: usize,
) -> Vec<SimilarityResult> {
    let mut corpus = Vec::with_capacity(candidates.len() + 1);
    corpus.push(tokenize(query));
    corpus.extend(candidates.iter().map(record_tokens));

    let model = TfIdfModel::fit(&corpus);
    if model.is_empty() {
        return Vec::new();
    }

    let query_vector = model.vectorize(&corpus[0]);
    let scored = candidates
        .iter()
        .zip(&corpus[1..])
        .map(|(record, tokens)| {
            let candidate_vector = model.vectorize(tokens);
            let score = cosine_similarity(&query_vector, &candidate_vector).unwrap_or(0.0);
            (record, score)
        })
        .collect();

    top_results(scored, min_similarity, max_results)
}

/// Lexical ranking for a stored record; the target joins the IDF basis
/// but is never returned.
pub fn rank_lexical_for_record(
    target: &FacultyRecord,
    candidates: &[FacultyRecord],
    min_similarity: f32,
    max_results: usize,
) -> Vec<SimilarityResult> {
    let pool: Vec<FacultyRecord> = candidates
        .iter()
        .filter(|r| r.id != target.id)
        .cloned()
        .collect();
    rank_lexical(
        target.research_text().unwrap_or(""),
        &pool,
        min_similarity,
        max_results,
    )
}
