//! Result types for reader output.
//!
//! These are the values a caller keeps after a finder session ends: the
//! cleaned article with its title and pagination link, and the short summary
//! used for reading list entries.

use serde::{Deserialize, Serialize};

use crate::extractor::RouteStep;

/// Everything a reader view shows for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedArticle {
    /// Cleaned article markup, leading image first.
    pub html: String,

    /// Article title, or the document title when no headline was found.
    pub title: String,

    /// Rendered text of the cleaned article, without the leading image.
    pub text_content: String,

    /// Absolute URL of the next page of a multi-page article.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_url: Option<String>,

    /// Whether the article text runs left to right.
    pub is_ltr: bool,

    /// Route to the article element, for the next visit to the same page.
    pub route: Vec<RouteStep>,
}

/// Summary of a page for a reading list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingListInfo {
    /// At most 140 characters.
    pub title: String,

    /// Start of the article text (or of the page text), whitespace collapsed.
    pub preview_text: String,

    pub is_reader_available: bool,
}
