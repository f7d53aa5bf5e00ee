//! Edit-distance scoring
//!
//! Similarity is `(1 - levenshtein / max_len) * 100`, where both the distance
//! and the lengths count Unicode scalar values. No case folding or other
//! normalization happens here.

use strsim::levenshtein;

/// Levenshtein distance (single-char insert / delete / substitute)
pub fn edit_distance(a: &str, b: &str) -> usize {
    levenshtein(a, b)
}

/// Similarity percentage in `0.0..=100.0`, unrounded.
///
/// Returns `None` when both strings are empty.
pub fn similarity(a: &str, b: &str) -> Option<f64> {
    let max_len = a.chars().count().max(b.chars().count());
    similarity_with_len(a, b, max_len)
}

pub(crate) fn similarity_with_len(a: &str, b: &str, max_len: usize) -> Option<f64> {
    if max_len == 0 {
        return None;
    }
    let distance = edit_distance(a, b);
    Some((1.0 - distance as f64 / max_len as f64) * 100.0)
}

/// Upper bound on similarity from lengths alone.
///
/// The edit distance is never smaller than the length difference, so no
/// pair can score above this. Used to skip pairs before running Levenshtein.
pub fn similarity_upper_bound(len_a: usize, len_b: usize) -> Option<f64> {
    let max_len = len_a.max(len_b);
    if max_len == 0 {
        return None;
    }
    let diff = len_a.abs_diff(len_b);
    Some((1.0 - diff as f64 / max_len as f64) * 100.0)
}

/// Round half away from zero to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("same", "same"), 0);
    }

    #[test]
    fn test_similarity_kitten_sitting() {
        let score = similarity("kitten", "sitting").unwrap();
        assert!((score - 57.142857).abs() < 1e-4);
        assert_eq!(round2(score), 57.14);
    }

    #[test]
    fn test_similarity_identity_and_disjoint() {
        assert_eq!(similarity("1 Main St", "1 Main St"), Some(100.0));
        assert_eq!(similarity("abc", "xyz"), Some(0.0));
        assert_eq!(similarity("", ""), None);
        assert_eq!(similarity("", "abcd"), Some(0.0));
    }

    #[test]
    fn test_similarity_is_case_sensitive() {
        let score = similarity("MAIN", "main").unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_similarity_counts_chars_not_bytes() {
        // Two edits over seven characters
        assert_eq!(similarity("Straße", "Strasse").map(round2), Some(71.43));
        assert_eq!(similarity("é", "e"), Some(0.0));
    }

    #[test]
    fn test_upper_bound_never_below_actual() {
        let pairs = [
            ("kitten", "sitting"),
            ("1 Main St", "1 Main Street"),
            ("a", "abcdefgh"),
            ("Oak", "Oak"),
        ];
        for (a, b) in pairs {
            let bound = similarity_upper_bound(a.chars().count(), b.chars().count()).unwrap();
            let actual = similarity(a, b).unwrap();
            assert!(bound >= actual, "{} vs {}: {} < {}", a, b, bound, actual);
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(57.142857), 57.14);
        assert_eq!(round2(66.666666), 66.67);
        assert_eq!(round2(100.0), 100.0);
    }
}
