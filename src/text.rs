//! String helpers shared by the scoring, cleaning and pagination code.

/// Inclusive-exclusive code point ranges of Chinese, Japanese and Korean
/// scripts that get a score multiplier.
const CJK_RANGES: [(u32, u32); 9] = [
    (11904, 12031),
    (12352, 12543),
    (12736, 19903),
    (19968, 40959),
    (44032, 55215),
    (63744, 64255),
    (65072, 65103),
    (131_072, 173_791),
    (194_560, 195_103),
];

/// Whether `c` belongs to a script whose text is denser than Latin text.
#[must_use]
pub fn is_cjk(c: char) -> bool {
    let code = u32::from(c);
    CJK_RANGES.iter().any(|&(start, end)| code > start && code < end)
}

/// The last run of ASCII digits in `s`, parsed.
///
/// Runs too long for a `u64` are ignored like any other unparseable input.
#[must_use]
pub fn last_integer(s: &str) -> Option<u64> {
    s.split(|c: char| !c.is_ascii_digit())
        .rfind(|run| !run.is_empty())
        .and_then(|run| run.parse().ok())
}

/// `s` with every whitespace character removed.
#[must_use]
pub fn remove_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Number of characters once whitespace is removed.
#[must_use]
pub fn non_whitespace_len(s: &str) -> usize {
    s.chars().filter(|c| !c.is_whitespace()).count()
}

/// Collapse whitespace runs into single spaces.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Edit distance between `a` and `b`, counted in characters.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Similarity in `[0, 1]`: one minus the edit distance over the longer length.
///
/// Two empty strings have similarity 0.
#[must_use]
pub fn string_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    (longest - levenshtein(a, b)) as f64 / longest as f64
}

/// Whether `text` contains fewer than `limit` commas.
#[must_use]
pub fn comma_count_is_less_than(text: &str, limit: usize) -> bool {
    text.matches(',').take(limit).count() < limit
}

/// First `max` characters of `s`.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_integer_finds_trailing_run() {
        assert_eq!(last_integer("story-2"), Some(2));
        assert_eq!(last_integer("page12of30"), Some(30));
        assert_eq!(last_integer("a1b"), Some(1));
        assert_eq!(last_integer("none"), None);
        assert_eq!(last_integer(""), None);
    }

    #[test]
    fn similarity() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(string_similarity("", ""), 0.0);
        assert_eq!(string_similarity("abcd", "abcd"), 1.0);
        assert!((string_similarity("/news/story-2", "/news/story-3") - 12.0 / 13.0).abs() < 1e-9);
    }

    #[test]
    fn cjk_detection() {
        assert!(is_cjk('中'));
        assert!(is_cjk('の'));
        assert!(is_cjk('한'));
        assert!(!is_cjk('a'));
        assert!(!is_cjk('é'));
    }

    #[test]
    fn whitespace_helpers() {
        assert_eq!(remove_whitespace(" a b\n\tc "), "abc");
        assert_eq!(non_whitespace_len(" a b "), 2);
        assert_eq!(collapse_whitespace("a \n\n b   c"), "a b c");
    }

    #[test]
    fn comma_limits() {
        assert!(comma_count_is_less_than("a, b, c", 3));
        assert!(!comma_count_is_less_than("a, b, c, d", 3));
        assert!(comma_count_is_less_than("", 1));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
