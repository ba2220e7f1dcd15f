//! Fuzzy title comparison.

use crate::retrieval::tokenizer::word_tokens;
use std::collections::BTreeSet;
use strsim::normalized_levenshtein;

/// Token-set similarity in `[0, 1]`.
///
/// Both strings are reduced to sorted sets of lower-cased words. The shared
/// words are compared against each side's full set and the two full sets
/// against each other; the best of those comparisons wins. A title whose
/// words are all contained in the other therefore scores 1.0 regardless of
/// word order or extra words. Either side being empty scores 0.0.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let left: BTreeSet<String> = word_tokens(a).into_iter().collect();
    let right: BTreeSet<String> = word_tokens(b).into_iter().collect();
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = join(left.intersection(&right));
    let left_full = join_parts(&shared, &join(left.difference(&right)));
    let right_full = join_parts(&shared, &join(right.difference(&left)));

    let mut best = normalized_levenshtein(&left_full, &right_full);
    if !shared.is_empty() {
        best = best
            .max(normalized_levenshtein(&shared, &left_full))
            .max(normalized_levenshtein(&shared, &right_full));
    }
    best
}

fn join<'a>(words: impl Iterator<Item = &'a String>) -> String {
    words.map(String::as_str).collect::<Vec<_>>().join(" ")
}

fn join_parts(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_titles() {
        assert_eq!(token_set_ratio("Backend Engineer", "backend engineer"), 1.0);
    }

    #[test]
    fn test_word_order_ignored() {
        assert_eq!(token_set_ratio("Engineer, Backend", "Backend Engineer"), 1.0);
    }

    #[test]
    fn test_subset_scores_full() {
        assert_eq!(
            token_set_ratio("Backend Engineer", "Senior Backend Engineer II"),
            1.0
        );
    }

    #[test]
    fn test_partial_overlap_in_between() {
        let score = token_set_ratio("Backend Engineer", "Frontend Engineer");
        assert!(score > 0.3 && score < 1.0, "{score}");
    }

    #[test]
    fn test_unrelated_titles_score_low() {
        assert!(token_set_ratio("Pastry Chef", "Machine Learning Engineer") < 0.5);
    }

    #[test]
    fn test_empty_titles() {
        assert_eq!(token_set_ratio("", "Engineer"), 0.0);
        assert_eq!(token_set_ratio("Engineer", "  "), 0.0);
    }
}
