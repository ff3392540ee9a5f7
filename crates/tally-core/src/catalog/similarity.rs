//! Order-independent token-set similarity.
//!
//! Scores are in `0.0..=100.0`. Two strings whose word sets overlap, where one
//! set contains the other, score 100. Otherwise the score is the best of three
//! normalized indel similarities: the sorted intersection against each side
//! (intersection plus that side's extra words), and the two sides against
//! each other.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;

/// Lowercase, replace every non-alphanumeric character with a space, and trim.
pub fn default_process(text: &str) -> String {
    let mut processed = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            processed.extend(c.to_lowercase());
        } else {
            processed.push(' ');
        }
    }
    processed.trim().to_string()
}

/// Token-set similarity of two strings, compared as given.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect = intersection.join(" ");
    let sect_ab = join_words(&sect, &diff_ab.join(" "));
    let sect_ba = join_words(&sect, &diff_ba.join(" "));

    let score = ratio(&sect_ab, &sect_ba);
    if sect.is_empty() {
        return score;
    }

    score.max(ratio(&sect, &sect_ab)).max(ratio(&sect, &sect_ba))
}

/// Normalized indel similarity scaled to `0.0..=100.0`.
pub fn ratio(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars()) * 100.0
}

fn join_words(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(a: &str, b: &str) -> f64 {
        token_set_ratio(&default_process(a), &default_process(b))
    }

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_default_process() {
        assert_eq!(default_process("  Tito's  Handmade-Vodka! "), "tito s  handmade vodka");
        assert_eq!(default_process("***"), "");
    }

    #[test]
    fn test_subset_scores_100() {
        approx(processed("Widget A", "Widget A 750ml"), 100.0);
        approx(processed("vodka grey goose", "Grey Goose Vodka"), 100.0);
    }

    #[test]
    fn test_partial_overlap() {
        approx(processed("Kettle One Vodka", "Ketel One Vodka"), 90.3225806451613);
        approx(processed("Bulleit Bourbon", "Bulleit Rye"), 77.77777777777777);
        approx(processed("Widget B", "Gadget Z"), 50.0);
    }

    #[test]
    fn test_exact_boundaries() {
        approx(
            processed("grey goose citron large", "grey goose citron bottle pack"),
            85.0,
        );
        approx(
            processed("grey goose citron ten magnums", "grey goose citron ten bottle pack"),
            84.0,
        );
    }

    #[test]
    fn test_empty_and_disjoint() {
        approx(token_set_ratio("", "widget"), 0.0);
        approx(token_set_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_case_sensitive_without_processing() {
        assert!(token_set_ratio("WIDGET A", "widget a") < 100.0);
    }

    #[test]
    fn test_ratio() {
        approx(ratio("kitten", "sitting"), 100.0 - 100.0 * 5.0 / 13.0);
        approx(ratio("same", "same"), 100.0);
    }
}
