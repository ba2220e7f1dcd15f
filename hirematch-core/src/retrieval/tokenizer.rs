//! Lexical preprocessing for sparse search.
//!
//! Punctuation is deleted in place rather than treated as a separator, so
//! `"Data-Scientists"` becomes the single token `datascientists` and `"C++"`
//! becomes `c`. Whitespace is the only separator.

use std::collections::HashSet;
use std::sync::LazyLock;

/// English stop words. Contractions appear without their apostrophe since
/// punctuation is gone by the time tokens are checked.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
        "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
        "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
        "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
        "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
        "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
        "for", "with", "about", "against", "between", "into", "through", "during", "before",
        "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
        "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
        "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
        "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
        "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
        "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
    ]
    .into_iter()
    .collect()
});

/// Returns `true` if `word` (already lower-cased) is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Normalizes text into BM25 tokens.
///
/// Lower-cases, deletes punctuation, splits on whitespace, keeps purely
/// alphanumeric tokens and drops stop words. Empty input yields no tokens.
pub fn normalize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().all(char::is_alphanumeric))
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Splits text into lower-cased runs of word characters.
///
/// Unlike [`normalize`], punctuation separates words and stop words are kept.
/// Used for skill and title comparisons.
pub fn word_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_stop_words() {
        let tokens = normalize("C++ Engineers, and Data-Scientists!");
        assert_eq!(tokens, vec!["c", "engineers", "datascientists"]);
    }

    #[test]
    fn test_normalize_empty_input() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \n\t").is_empty());
        assert!(normalize("!!! ... ---").is_empty());
    }

    #[test]
    fn test_normalize_only_stop_words() {
        assert!(normalize("The and of it").is_empty());
    }

    #[test]
    fn test_normalize_drops_underscored_tokens() {
        assert_eq!(normalize("snake_case rust"), vec!["rust"]);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let text = "Senior Rust Engineer - distributed systems, Kafka & gRPC";
        assert_eq!(normalize(text), normalize(text));
        assert_eq!(
            normalize(text),
            vec!["senior", "rust", "engineer", "distributed", "systems", "kafka", "grpc"]
        );
    }

    #[test]
    fn test_word_tokens_split_on_punctuation() {
        assert_eq!(
            word_tokens("Python, PyTorch/CUDA and k8s"),
            vec!["python", "pytorch", "cuda", "and", "k8s"]
        );
    }
}
