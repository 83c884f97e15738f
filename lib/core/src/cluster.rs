//! Keyword-frequency labels for clusters.

use crate::tokenizer::tokenize;
use ahash::AHashMap;
use std::cmp::Reverse;

/// Words too common across research profiles to name a cluster
pub const GENERIC_WORDS: &[&str] = &[
    "research", "study", "studies", "analysis", "using", "based", "approach", "approaches",
    "method", "methods", "application", "applications", "development", "interests", "interest",
    "including", "various", "related", "areas", "area", "field", "fields", "work", "topics",
    "general", "current", "professor", "science", "sciences",
];

/// Share of the cluster the top keyword must reach to be paired
pub const MIN_COVERAGE: f32 = 0.2;

/// How close the runner-up must be to the top keyword to be paired
pub const SECOND_RATIO: f32 = 0.7;

/// Count non-generic tokens, most frequent first, ties alphabetical
pub fn keyword_counts<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: AHashMap<String, usize> = AHashMap::new();
    for text in texts {
        for token in tokenize(text) {
            if GENERIC_WORDS.contains(&token.as_str()) {
                continue;
            }
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| (Reverse(a.1), &a.0).cmp(&(Reverse(b.1), &b.0)));
    ranked
}

/// Label a cluster from its members' keyword text.
///
/// Two keywords are joined ("Top & Second") when the top one covers at
/// least [`MIN_COVERAGE`] of the members and the runner-up reaches
/// [`SECOND_RATIO`] of its count. Otherwise the most frequent keyword is
/// used alone, and a cluster with no usable keywords gets a numbered name.
pub fn label_cluster<'a>(
    keyword_texts: impl IntoIterator<Item = &'a str>,
    member_count: usize,
    cluster_id: usize,
) -> String {
    let ranked = keyword_counts(keyword_texts);
    let Some((top, top_count)) = ranked.first() else {
        return format!("Research Cluster {}", cluster_id + 1);
    };

    let covers = *top_count as f32 >= MIN_COVERAGE * member_count as f32;
    if covers {
        if let Some((second, second_count)) = ranked.get(1) {
            if *second_count as f32 >= SECOND_RATIO * *top_count as f32 {
                return format!("{} & {}", capitalize(top), capitalize(second));
            }
        }
    }

    capitalize(top)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
