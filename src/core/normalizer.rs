//! Address Normalization
//!
//! Turns a raw input line into the canonical form stored for matching.
//! Matching stays case- and punctuation-sensitive, so the only change made
//! here is trimming surrounding whitespace.

/// Normalize a raw line into an address.
///
/// Returns `None` for lines that are empty once trimmed; those are never stored.
pub fn normalize(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize("  1 Main St \r\n"), Some("1 Main St".to_string()));
        assert_eq!(normalize("\t2 Oak Ave"), Some("2 Oak Ave".to_string()));
    }

    #[test]
    fn test_normalize_drops_blank_lines() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize("\t\r\n"), None);
    }

    #[test]
    fn test_normalize_keeps_case_and_punctuation() {
        assert_eq!(normalize(" 1 MAIN St., Apt #4 "), Some("1 MAIN St., Apt #4".to_string()));
        // Inner whitespace is part of the address
        assert_eq!(normalize("1  Main   St"), Some("1  Main   St".to_string()));
    }

    #[test]
    fn test_normalize_idempotent() {
        let inputs = ["", " ", " a ", "1 Main St", "\u{00a0}Straße 5\u{00a0}", "x\n"];
        for input in inputs {
            let once = normalize(input);
            let twice = once.as_deref().and_then(normalize);
            assert_eq!(once, twice, "normalize not idempotent for {:?}", input);
        }
    }
}
