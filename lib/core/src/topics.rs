//! Keyword-frequency topic summary over a set of faculty records.

use crate::record::{FacultyId, FacultyRecord};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Words ignored when ranking topics
pub const TOPIC_STOP_WORDS: &[&str] = &[
    "and", "the", "for", "with", "from", "that", "this", "are", "was", "were", "been", "have",
    "has", "had", "will", "would", "could", "should", "may", "can", "research", "study",
    "analysis", "using", "based", "approach",
];

/// Associated faculty listed per topic
pub const MAX_ASSOCIATED: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicMember {
    pub id: FacultyId,
    pub name: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub topic_id: usize,
    pub keyword: String,
    pub frequency: usize,
    pub faculty_count: usize,
    pub associated_faculty: Vec<TopicMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicReport {
    pub topics: Vec<Topic>,
    pub total_keywords: usize,
    pub unique_keywords: usize,
    /// Records that declare any research text
    pub coverage: usize,
}

/// Runs of lowercase ASCII letters, at least three long, that are not
/// glued to digits or underscores
fn keyword_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.len() >= 3 && w.bytes().all(|b| b.is_ascii_lowercase()))
}

pub fn analyze_topics(records: &[FacultyRecord], num_topics: usize) -> TopicReport {
    let lowered: Vec<String> = records.iter().map(|r| r.keywords.to_lowercase()).collect();

    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    let mut total_keywords = 0;
    for text in &lowered {
        for word in keyword_words(text) {
            *counts.entry(word).or_insert(0) += 1;
            total_keywords += 1;
        }
    }
    let unique_keywords = counts.len();

    let mut ranked: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|(word, _)| word.len() > 3 && !TOPIC_STOP_WORDS.contains(word))
        .collect();
    ranked.sort_by_key(|&(word, count)| (Reverse(count), word));
    ranked.truncate(num_topics);

    let topics = ranked
        .into_iter()
        .enumerate()
        .map(|(topic_id, (keyword, frequency))| {
            let associated: Vec<&FacultyRecord> = records
                .iter()
                .zip(&lowered)
                .filter(|(_, text)| text.contains(keyword))
                .map(|(record, _)| record)
                .collect();

            Topic {
                topic_id,
                keyword: keyword.to_string(),
                frequency,
                faculty_count: associated.len(),
                associated_faculty: associated
                    .into_iter()
                    .take(MAX_ASSOCIATED)
                    .map(|r| TopicMember {
                        id: r.id.clone(),
                        name: r.name.clone(),
                        department: if r.department.is_empty() {
                            "Unknown".to_string()
                        } else {
                            r.department.clone()
                        },
                    })
                    .collect(),
            }
        })
        .collect();

    let coverage = records.iter().filter(|r| r.research_text().is_some()).count();

    TopicReport {
        topics,
        total_keywords,
        unique_keywords,
        coverage,
    }
}
