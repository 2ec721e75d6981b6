//! Tag categories used by the detection and cleaning heuristics.
//!
//! Each category is a closed set of lowercase tag names. Lookups go through
//! [`TagSet::contains`] so call sites read as the rule they implement.

/// Named categories of element tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSet {
    /// Never candidates themselves.
    CandidateIgnored,
    /// Elements inside these (or being one) are never candidates.
    CandidateIgnoredDescendants,
    /// Ancestors that hide embedded content and forms from the candidate scan.
    EmbeddedContent,
    /// Text whose parent is one of these does not count towards a score.
    UnusableTextParent,
    /// Grandchildren whose text still counts as the candidate's own text.
    InlineTextGrandchild,
    /// Children allowed in a short extra article block.
    InlineTextContainer,
    /// Removed by the cleaner without further inspection.
    AlwaysPruned,
    /// Queued by the cleaner for a content-quality check.
    PruneCandidate,
    /// Tags whose default style already renders italic.
    AffectsFontStyle,
    /// Tags whose default style already renders bold.
    AffectsFontWeight,
    /// Skipped when counting sibling indices of a route.
    RouteIgnored,
    /// Section headings.
    Header,
    /// Elements whose presence in a list means it is not plain prose.
    ProhibitedInProseList,
    /// Content a `div` must lack to collapse into a paragraph.
    DivContent,
}

impl TagSet {
    /// Tags in this category.
    #[must_use]
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            Self::CandidateIgnored => &[
                "a", "body", "embed", "form", "html", "iframe", "object", "option", "script",
                "style", "svg",
            ],
            Self::CandidateIgnoredDescendants => &["dd", "dt", "li", "ol", "ul"],
            Self::EmbeddedContent => {
                &["a", "embed", "form", "iframe", "object", "option", "script", "style", "svg"]
            }
            Self::UnusableTextParent => &[
                "a", "dd", "dt", "noscript", "ol", "option", "pre", "script", "style", "td", "ul",
            ],
            Self::InlineTextGrandchild => &["a", "li", "span", "em", "i", "strong", "b", "font"],
            Self::InlineTextContainer => &["a", "b", "strong", "i", "em", "u", "span"],
            Self::AlwaysPruned => &["form", "iframe", "script", "style", "link"],
            Self::PruneCandidate => &["div", "table", "object", "ul", "canvas"],
            Self::AffectsFontStyle => &["i", "em"],
            Self::AffectsFontWeight => &["b", "strong", "h1", "h2", "h3", "h4", "h5", "h6"],
            Self::RouteIgnored => &["script", "link", "style"],
            Self::Header => &["h1", "h2", "h3", "h4", "h5", "h6"],
            Self::ProhibitedInProseList => {
                &["a", "div", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "table"]
            }
            Self::DivContent => {
                &["a", "blockquote", "dl", "div", "img", "ol", "p", "pre", "table", "ul"]
            }
        }
    }

    /// Whether `tag` (lowercase) belongs to this category.
    #[must_use]
    pub fn contains(self, tag: &str) -> bool {
        self.tags().contains(&tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        assert!(TagSet::CandidateIgnored.contains("svg"));
        assert!(!TagSet::CandidateIgnored.contains("div"));
        assert!(TagSet::CandidateIgnoredDescendants.contains("li"));
        assert!(TagSet::UnusableTextParent.contains("td"));
        assert!(!TagSet::UnusableTextParent.contains("p"));
        assert!(TagSet::Header.contains("h6"));
    }

    #[test]
    fn test_embedded_content_excludes_page_structure() {
        for tag in ["body", "html"] {
            assert!(TagSet::CandidateIgnored.contains(tag));
            assert!(!TagSet::EmbeddedContent.contains(tag));
        }
        assert!(TagSet::EmbeddedContent.contains("form"));
    }
}
