//! Pure text-matching helpers shared by the page abstractions.
//!
//! Factored out of the page objects so selection behavior can be tested
//! without a browser: suggestion matching is a fixed, ordered tier chain
//! and result matching is an all-keywords containment check.

/// Case-insensitive containment check.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// True iff `items` is non-empty and every entry contains `term`
/// case-insensitively.
pub fn all_contain<S: AsRef<str>>(items: &[S], term: &str) -> bool {
    !items.is_empty() && items.iter().all(|item| contains_ci(item.as_ref(), term))
}

/// Which matching tier selected a suggestion.
///
/// The `Substring` tier is the permissive last resort; its click is forced
/// because partially obscured entries still need to be selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Trimmed text equals the wanted string
    Exact,
    /// Trimmed text equals the lowercased wanted string
    Lower,
    /// Trimmed text equals the uppercased wanted string
    Upper,
    /// Trimmed text contains the wanted string, case-insensitively
    Substring,
}

/// Find the suggestion to select for `wanted`, trying tiers in order.
///
/// Returns the index of the first entry matched by the winning tier, so
/// repeated calls over a stable list pick the same entry.
pub fn match_suggestion<S: AsRef<str>>(items: &[S], wanted: &str) -> Option<(usize, MatchTier)> {
    let lower = wanted.to_lowercase();
    let upper = wanted.to_uppercase();

    let tiers: [(&str, MatchTier); 3] =
        [(wanted, MatchTier::Exact), (&lower, MatchTier::Lower), (&upper, MatchTier::Upper)];

    for (text, tier) in tiers {
        if let Some(idx) = items.iter().position(|item| item.as_ref().trim() == text) {
            return Some((idx, tier));
        }
    }

    items
        .iter()
        .position(|item| contains_ci(item.as_ref(), wanted))
        .map(|idx| (idx, MatchTier::Substring))
}

/// True iff `title` contains every keyword case-insensitively.
pub fn title_matches<S: AsRef<str>>(title: &str, keywords: &[S]) -> bool {
    !keywords.is_empty() && keywords.iter().all(|kw| contains_ci(title, kw.as_ref()))
}

/// Index of the first title matching every keyword.
pub fn first_matching_index<S: AsRef<str>, K: AsRef<str>>(titles: &[S], keywords: &[K]) -> Option<usize> {
    titles.iter().position(|title| title_matches(title.as_ref(), keywords))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci("iPhone 13 128GB Blue", "iphone 13"));
        assert!(contains_ci("IPHONE 13", "iPhone 13"));
        assert!(!contains_ci("Galaxy S23", "iphone"));
    }

    #[test]
    fn test_all_contain_every_entry_matches() {
        let suggestions = vec!["iPhone 13 128GB Blue", "iPhone 13 256GB Red"];
        assert!(all_contain(&suggestions, "iPhone 13"));
        assert!(all_contain(&suggestions, "IPHONE 13"));
    }

    #[test]
    fn test_all_contain_one_entry_misses() {
        let suggestions = vec!["iPhone 13 128GB Blue", "iPad Air"];
        assert!(!all_contain(&suggestions, "iPhone 13"));
    }

    #[test]
    fn test_all_contain_empty_is_false() {
        let suggestions: Vec<&str> = vec![];
        assert!(!all_contain(&suggestions, "anything"));
    }

    #[test]
    fn test_match_suggestion_exact_wins() {
        let items = vec!["iphone 13 128gb", "iPhone 13 128GB", "case for iPhone 13 128GB"];
        assert_eq!(match_suggestion(&items, "iPhone 13 128GB"), Some((1, MatchTier::Exact)));
    }

    #[test]
    fn test_match_suggestion_exact_beats_earlier_substring() {
        // An exact match later in the list wins over an earlier substring match.
        let items = vec!["case for iPhone 13 128GB", "iPhone 13 128GB"];
        assert_eq!(match_suggestion(&items, "iPhone 13 128GB"), Some((1, MatchTier::Exact)));
    }

    #[test]
    fn test_match_suggestion_lowercase_tier() {
        let items = vec!["iphone 13 128gb"];
        assert_eq!(match_suggestion(&items, "iPhone 13 128GB"), Some((0, MatchTier::Lower)));
    }

    #[test]
    fn test_match_suggestion_uppercase_tier() {
        let items = vec!["IPHONE 13 128GB"];
        assert_eq!(match_suggestion(&items, "iPhone 13 128GB"), Some((0, MatchTier::Upper)));
    }

    #[test]
    fn test_match_suggestion_substring_tier() {
        let items = vec!["apple iphone 13 128gb blue"];
        assert_eq!(match_suggestion(&items, "iPhone 13 128GB"), Some((0, MatchTier::Substring)));
    }

    #[test]
    fn test_match_suggestion_trims_entries() {
        let items = vec!["  iPhone 13 128GB  "];
        assert_eq!(match_suggestion(&items, "iPhone 13 128GB"), Some((0, MatchTier::Exact)));
    }

    #[test]
    fn test_match_suggestion_no_match() {
        let items = vec!["galaxy s23", "pixel 8"];
        assert_eq!(match_suggestion(&items, "iPhone 13"), None);
    }

    #[test]
    fn test_match_suggestion_is_deterministic() {
        let items = vec!["iPhone 13 256GB", "iPhone 13 128GB", "iPhone 13 128GB"];
        let first = match_suggestion(&items, "iPhone 13 128GB");
        let second = match_suggestion(&items, "iPhone 13 128GB");
        assert_eq!(first, second);
        assert_eq!(first, Some((1, MatchTier::Exact)));
    }

    #[test]
    fn test_title_matches_all_keywords() {
        assert!(title_matches("iPhone 13 (128GB) - Blue", &["iphone 13", "128"]));
        assert!(!title_matches("Case for iPhone 13", &["iphone 13", "128"]));
        assert!(!title_matches("anything", &[] as &[&str]));
    }

    #[test]
    fn test_first_matching_index_result_scenario() {
        let titles = vec!["Case for iPhone 13", "iPhone 13 (128GB) - Blue", "iPhone 13 256GB"];
        assert_eq!(first_matching_index(&titles, &["iphone 13", "128"]), Some(1));
    }

    #[test]
    fn test_first_matching_index_no_match() {
        let titles = vec!["Case for iPhone 13", "iPhone 13 256GB"];
        assert_eq!(first_matching_index(&titles, &["iphone 13", "128gb pro max"]), None);
    }
}
