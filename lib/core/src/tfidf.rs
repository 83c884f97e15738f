//! TF-IDF vectorizer over a per-request corpus.
//!
//! The vocabulary is kept in a `BTreeMap` so vector positions follow the
//! lexicographic order of terms and two fits over the same corpus always
//! produce identical vectors.

use ahash::{AHashMap, AHashSet};
use std::collections::BTreeMap;

/// Term frequency: occurrences of a term divided by the document length.
pub fn term_frequency(doc: &[String]) -> AHashMap<&str, f32> {
    let mut counts: AHashMap<&str, u32> = AHashMap::new();
    for token in doc {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }

    let len = doc.len() as f32;
    counts
        .into_iter()
        .map(|(term, count)| (term, count as f32 / len))
        .collect()
}

/// Inverse document frequency, `ln(total_docs / docs_containing_term)`,
/// for every term observed in the corpus.
pub fn inverse_document_frequency(corpus: &[Vec<String>]) -> BTreeMap<String, f32> {
    let mut doc_freqs: BTreeMap<String, u32> = BTreeMap::new();
    for doc in corpus {
        let unique: AHashSet<&str> = doc.iter().map(String::as_str).collect();
        for term in unique {
            *doc_freqs.entry(term.to_string()).or_insert(0) += 1;
        }
    }

    let total_docs = corpus.len() as f32;
    doc_freqs
        .into_iter()
        .map(|(term, df)| {
            let idf = (total_docs / df as f32).ln();
            (term, idf)
        })
        .collect()
}

/// A fitted TF-IDF model
#[derive(Debug, Clone, Default)]
pub struct TfIdfModel {
    idf: BTreeMap<String, f32>,
}

impl TfIdfModel {
    pub fn fit(corpus: &[Vec<String>]) -> Self {
        Self {
            idf: inverse_document_frequency(corpus),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.idf.keys().map(String::as_str)
    }

    /// IDF weight of a term; out-of-vocabulary terms weigh nothing.
    #[inline]
    pub fn idf(&self, term: &str) -> f32 {
        self.idf.get(term).copied().unwrap_or(0.0)
    }

    /// Dense TF-IDF vector over the sorted vocabulary. Tokens outside the
    /// vocabulary are ignored.
    pub fn vectorize(&self, doc: &[String]) -> Vec<f32> {
        if doc.is_empty() {
            return vec![0.0; self.idf.len()];
        }

        let tf = term_frequency(doc);
        self.idf
            .iter()
            .map(|(term, idf)| tf.get(term.as_str()).copied().unwrap_or(0.0) * idf)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn docs(texts: &[&str]) -> Vec<Vec<String>> {
        texts.iter().map(|t| tokenize(t)).collect()
    }

    #[test]
    fn test_term_frequency() {
        let doc = tokenize("robotics robotics vision");
        let tf = term_frequency(&doc);
        assert!((tf["robotics"] - 2.0 / 3.0).abs() < 1e-6);
        assert!((tf["vision"] - 1.0 / 3.0).abs() < 1e-6);
        assert!(term_frequency(&[]).is_empty());
    }

    #[test]
    fn test_idf_values() {
        let corpus = docs(&["robotics vision", "robotics control", "ecology"]);
        let idf = inverse_document_frequency(&corpus);
        assert!((idf["robotics"] - (3.0f32 / 2.0).ln()).abs() < 1e-6);
        assert!((idf["ecology"] - 3.0f32.ln()).abs() < 1e-6);
        assert!(!idf.contains_key("chemistry"));
    }

    #[test]
    fn test_idf_non_increasing_in_document_count() {
        // "shared" appears in 1, 2, 3, 4 of the 4 documents across corpora
        let mut previous = f32::INFINITY;
        for containing in 1..=4 {
            let corpus: Vec<Vec<String>> = (0..4)
                .map(|i| {
                    if i < containing {
                        tokenize(&format!("shared filler{}", i))
                    } else {
                        tokenize(&format!("filler{}", i))
                    }
                })
                .collect();
            let idf = inverse_document_frequency(&corpus)["shared"];
            assert!(idf <= previous, "idf rose from {} to {}", previous, idf);
            previous = idf;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn test_vectorize_sorted_vocabulary() {
        let corpus = docs(&["zoology botany", "botany", "anatomy"]);
        let model = TfIdfModel::fit(&corpus);

        let vocab: Vec<&str> = model.vocabulary().collect();
        assert_eq!(vocab, vec!["anatomy", "botany", "zoology"]);

        let v = model.vectorize(&tokenize("zoology botany"));
        assert_eq!(v.len(), 3);
        assert_eq!(v[0], 0.0);
        assert!((v[1] - 0.5 * (3.0f32 / 2.0).ln()).abs() < 1e-6);
        assert!((v[2] - 0.5 * 3.0f32.ln()).abs() < 1e-6);
    }

    #[test]
    fn test_vectorize_ignores_out_of_vocabulary() {
        let model = TfIdfModel::fit(&docs(&["genomics", "proteomics"]));
        let v = model.vectorize(&tokenize("astronomy cosmology"));
        assert_eq!(v, vec![0.0, 0.0]);
        assert_eq!(model.idf("astronomy"), 0.0);
    }

    #[test]
    fn test_empty_corpus() {
        let model = TfIdfModel::fit(&[]);
        assert!(model.is_empty());
        assert!(model.vectorize(&tokenize("anything")).is_empty());
    }
}
