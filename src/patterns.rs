//! Compiled regex patterns used by the scoring, cleaning and pagination code.
//!
//! All patterns are compiled once on first use using `LazyLock`. They are
//! immutable, so sharing them between sessions is safe.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Candidate Scoring Patterns
// =============================================================================

/// Matches id/class values naming an article container.
///
/// Only whole whitespace-delimited tokens count, so `post` matches
/// `"post featured"` but not `"postscript"`.
pub static ARTICLE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:post|hentry|entry-?(?:content|text|body)?|article-?(?:content|text|body)?)(?:\s|$)")
        .expect("ARTICLE_CLASS regex")
});

/// Matches id/class values naming comment or metadata areas.
pub static COMMENT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"comment|meta|footer|footnote").expect("COMMENT_CLASS regex")
});

// =============================================================================
// Cleaning Patterns
// =============================================================================

/// Attribute names stripped from every cleaned element.
pub static ATTRIBUTES_TO_REMOVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^on|^id$|^class$|^style$").expect("ATTRIBUTES_TO_REMOVE regex")
});

/// Matches class/id names that vouch for an element during pruning.
pub static POSITIVE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|page|pagination|post|text")
        .expect("POSITIVE_CLASS regex")
});

/// Matches class/id names that condemn an element during pruning.
pub static NEGATIVE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)breadcrumb|combx|comment|contact|disqus|foot|footer|footnote|link|media|meta|mod-conversations|promo|related|scroll|share|shoutbox|sidebar|social|sponsor|tags|toolbox|widget",
    )
    .expect("NEGATIVE_CLASS regex")
});

/// Plug-in hosts whose embeds survive cleaning.
pub static PLUGINS_TO_KEEP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"youtube|vimeo|dailymotion").expect("PLUGINS_TO_KEEP regex")
});

// =============================================================================
// Title and Leading Image Patterns
// =============================================================================

/// Class/id names that mark a header as a headline.
pub static HEADER_BONUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)header|title|headline").expect("HEADER_BONUS regex")
});

/// Image attribute names kept on the adoptable leading image.
pub static LEADING_IMAGE_ATTRIBUTE_TO_KEEP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"src|alt").expect("LEADING_IMAGE_ATTRIBUTE_TO_KEEP regex")
});

/// Class names of photo credit blocks.
pub static LEADING_IMAGE_CREDIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"credit").expect("LEADING_IMAGE_CREDIT regex"));

/// Class names of photo caption blocks.
pub static LEADING_IMAGE_CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"caption").expect("LEADING_IMAGE_CAPTION regex"));

// =============================================================================
// Pagination Patterns
// =============================================================================

/// A date embedded in a URL path, delimited by non-digits on both sides.
pub static LINK_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\D(?:\d\d(?:\d\d)?[\-/](?:10|11|12|0?[1-9])[\-/](?:30|31|[12][0-9]|0?[1-9])|\d\d(?:\d\d)?/(?:10|11|12|0[1-9])|(?:10|11|12|0?[1-9])\-(?:30|31|[12][0-9]|0?[1-9])\-\d\d(?:\d\d)?|(?:30|31|[12][0-9]|0?[1-9])\-(?:10|11|12|0?[1-9])\-\d\d(?:\d\d)?)\D",
    )
    .expect("LINK_DATE regex")
});

/// Query keys that carry a page number.
pub static LINK_PAGE_PARAMETER_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(page|^p$|^pg$)").expect("LINK_PAGE_PARAMETER_KEY regex")
});

/// Query keys that never lead to a next page.
pub static LINK_BAD_PARAMETER_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"feed").expect("LINK_BAD_PARAMETER_KEY regex"));

/// `/…page…/N` style URLs.
pub static LINK_PAGE_SLASH_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/.*page.*/\d+").expect("LINK_PAGE_SLASH_NUMBER regex")
});

/// URLs ending in a numeric path component.
pub static LINK_SLASH_DIGIT_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+/?$").expect("LINK_SLASH_DIGIT_END regex"));

/// Archive listings, which look paginated but are not article pages.
pub static LINK_ARCHIVE_SLASH_DIGIT_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"archives?/\d+/?$").expect("LINK_ARCHIVE_SLASH_DIGIT_END regex")
});

/// Link text cues.
pub static LINK_NEXT_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)next").expect("LINK_NEXT_TEXT regex"));
pub static LINK_PAGE_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)page").expect("LINK_PAGE_TEXT regex"));
pub static LINK_CONTINUE_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)continue").expect("LINK_CONTINUE_TEXT regex"));

// =============================================================================
// Generator Patterns
// =============================================================================

pub static MEDIAWIKI_GENERATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^MediaWiki ").expect("MEDIAWIKI_GENERATOR regex"));

pub static WORDPRESS_GENERATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^WordPress").expect("WORDPRESS_GENERATOR regex"));

// =============================================================================
// CSS-like Selectors
// =============================================================================

/// Ids whose subtrees hold comments rather than article text.
pub const COMMENT_CONTAINER_IDS: [&str; 2] = ["disqus_thread", "comments"];

/// Class holding user comments.
pub const COMMENT_CONTAINER_CLASS: &str = "userComments";

/// Ids and classes that identify a headline outside the `h1`-`h5` tags.
pub const HEADLINE_CLASSES: [&str; 3] = ["headline", "article_title", "inside-head"];
pub const HEADLINE_IDS: [&str; 1] = ["hn-headline"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_class_matches_whole_tokens() {
        assert!(ARTICLE_CLASS.is_match("post"));
        assert!(ARTICLE_CLASS.is_match("featured post"));
        assert!(ARTICLE_CLASS.is_match("entry-content large"));
        assert!(ARTICLE_CLASS.is_match("article"));
        assert!(!ARTICLE_CLASS.is_match("postscript"));
        assert!(!ARTICLE_CLASS.is_match("sidebar"));
    }

    #[test]
    fn comment_class_is_case_sensitive() {
        assert!(COMMENT_CLASS.is_match("comment-list"));
        assert!(COMMENT_CLASS.is_match("post-meta"));
        assert!(!COMMENT_CLASS.is_match("Comments"));
    }

    #[test]
    fn link_date_matches_dated_paths() {
        let m = LINK_DATE.find("/2015/03/12/story").map(|m| m.as_str());
        assert_eq!(m, Some("/2015/03/12/"));
        assert!(LINK_DATE.find("/news/story-2").is_none());
    }

    #[test]
    fn archive_links_detected() {
        assert!(LINK_ARCHIVE_SLASH_DIGIT_END.is_match("http://a.com/archives/12"));
        assert!(LINK_ARCHIVE_SLASH_DIGIT_END.is_match("http://a.com/archive/3/"));
        assert!(!LINK_ARCHIVE_SLASH_DIGIT_END.is_match("http://a.com/story/3"));
    }
}
