//! String normalization and tokenization.
//!
//! Comparisons are ASCII-only: lowercasing does not fold non-ASCII case and
//! any non-ASCII-alphanumeric character acts as a part separator.

/// Normalizes a string for equality comparison: surrounding whitespace is
/// trimmed and ASCII letters are lowercased.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Splits a string into its alphanumeric parts, discarding empty runs.
///
/// Operates on the input as given; callers that want case-insensitive parts
/// use [`normalized_parts`].
pub fn extract_parts(raw: &str) -> Vec<&str> {
    raw.split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect()
}

/// The alphanumeric parts of the normalized form of a string.
pub fn normalized_parts(raw: &str) -> Vec<String> {
    let normalized = normalize(raw);
    extract_parts(&normalized)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Whether two strings match token for token, case-insensitively and
/// ignoring separators: `parts_match("east_ATLANTA", " East Atlanta")` is
/// true. Part counts and positions must line up exactly.
pub fn parts_match(s1: &str, s2: &str) -> bool {
    normalized_parts(s1) == normalized_parts(s2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_alphanumeric_runs() {
        assert_eq!(extract_parts("East Atlanta"), vec!["East", "Atlanta"]);
        assert_eq!(extract_parts("east_ATLANTA--7"), vec!["east", "ATLANTA", "7"]);
        assert_eq!(extract_parts("  ,;!  "), Vec::<&str>::new());
        assert_eq!(extract_parts(""), Vec::<&str>::new());
    }

    #[test]
    fn parts_match_ignores_case_and_separators() {
        assert!(parts_match("east_ATLANTA", " East Atlanta"));
        assert!(parts_match("Ward 1", "ward-1"));
        assert!(!parts_match("East Atlanta", "East Atlanta Heights"));
        assert!(!parts_match("Ward 1", "WARD1"));
    }
}
