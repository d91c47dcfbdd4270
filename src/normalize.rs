//! Text canonicalization for suggestion matching.
//!
//! Every equality and containment check in the typeahead goes through
//! [`normalize`], so "Café", " cafe " and "CAFE" all compare equal.
//!
//! ```rust
//! use bubbletea_typeahead::normalize::normalize;
//!
//! assert_eq!(normalize("  Café "), "cafe");
//! assert_eq!(normalize("café"), normalize("cafe"));
//! ```

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalizes `text` for comparison.
///
/// Lower-cases, decomposes to NFD and drops combining marks, then trims
/// surrounding whitespace. The function is total and idempotent.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    folded.trim().to_string()
}

/// Returns true when the normalized `haystack` contains `query`.
///
/// `query` must already be normalized.
pub fn contains_normalized(haystack: &str, query: &str) -> bool {
    query.is_empty() || normalize(haystack).contains(query)
}

/// Compares two strings after normalization.
pub fn eq_normalized(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_diacritics() {
        assert_eq!(normalize("café"), "cafe");
        assert_eq!(normalize("Ångström"), "angstrom");
        assert_eq!(normalize("naïve"), "naive");
    }

    #[test]
    fn test_lowercases_and_trims() {
        assert_eq!(normalize("  Banana\t"), "banana");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_precomposed_and_decomposed_agree() {
        // U+00E9 vs "e" + U+0301
        assert_eq!(normalize("\u{e9}"), normalize("e\u{301}"));
    }

    #[test]
    fn test_idempotent_on_samples() {
        for s in ["Crème Brûlée", "  ÉCOLE ", "straße", "plain"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_contains_normalized() {
        assert!(contains_normalized("Crème Brûlée", "brul"));
        assert!(contains_normalized("anything", ""));
        assert!(!contains_normalized("Apple", "ban"));
    }

    #[test]
    fn test_eq_normalized() {
        assert!(eq_normalized("Café", " cafe"));
        assert!(!eq_normalized("Cafe", "Cafes"));
    }
}
