//! Keyword tokenizer used by the lexical path and cluster labeling.

/// English function words dropped before counting terms
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "day", "get", "has", "him", "his", "how", "its", "may", "new", "now",
    "old", "see", "two", "who", "did", "she", "use", "way", "many", "then", "them", "these",
    "they", "this", "that", "with", "have", "from", "were", "been", "their", "said", "each",
    "which", "will", "would", "there", "what", "about", "when", "into", "than", "also", "more",
    "some", "such", "only", "other", "over", "very", "your", "could", "should", "where",
    "while", "within", "without", "upon", "onto", "both", "those", "through", "among",
];

#[inline]
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Tokenize text for lexical scoring.
///
/// Lowercases, turns every non-word character into a separator, and drops
/// tokens of two characters or fewer as well as stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|s| s.chars().count() > 2)
        .filter(|s| !is_stop_word(s))
        .map(str::to_string)
        .collect()
}
