use ordered_float::OrderedFloat;
use scholarlink_core::{FacultyId, FacultyRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Which ranking path produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Dense,
    Lexical,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Dense => write!(f, "dense"),
            Provenance::Lexical => write!(f, "lexical"),
        }
    }
}

/// A ranked candidate with its display fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub id: FacultyId,
    pub name: String,
    pub title: String,
    pub school: String,
    pub department: String,
    pub keywords: String,
    pub score: f32,
}

impl SimilarityResult {
    pub fn from_record(record: &FacultyRecord, score: f32) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            title: record.title.clone(),
            school: record.school.clone(),
            department: record.department.clone(),
            keywords: record.keywords.clone(),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub provenance: Provenance,
    pub results: Vec<SimilarityResult>,
}

impl MatchResponse {
    pub fn new(provenance: Provenance, results: Vec<SimilarityResult>) -> Self {
        Self { provenance, results }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Drop scores below `min_similarity`, stable-sort the rest descending and
/// keep the first `max_results`.
pub(crate) fn top_results(
    scored: Vec<(&FacultyRecord, f32)>,
    min_similarity: f32,
    max_results: usize,
) -> Vec<SimilarityResult> {
    let mut kept: Vec<(&FacultyRecord, f32)> = scored
        .into_iter()
        .filter(|(_, score)| *score >= min_similarity)
        .collect();
    kept.sort_by_key(|&(_, score)| Reverse(OrderedFloat(score)));
    kept.truncate(max_results);
    kept.into_iter()
        .map(|(record, score)| SimilarityResult::from_record(record, score))
        .collect()
}
