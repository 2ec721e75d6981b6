//! # article-finder
//!
//! Reader-mode article detection for rendered web pages.
//!
//! Given a snapshot of a laid-out page (element tree plus the box and
//! computed style of every element), this library finds the element holding
//! the main article, its title and leading image, and the link to its next
//! page, and produces a cleaned copy of the article suitable for a reader
//! view.
//!
//! ## Quick Start
//!
//! ```rust
//! use article_finder::{annotated, ArticleFinder, Options};
//!
//! let html = r#"<html><head><title>Hello</title></head>
//! <body data-rect="0,0,1000,800"><p data-rect="0,0,1000,20">Short page.</p></body></html>"#;
//!
//! let doc = annotated::parse(html, Some("https://example.com/hello"))?;
//! let mut finder = ArticleFinder::new(&doc, Options::default());
//! if finder.is_reader_mode_available() {
//!     println!("{}", finder.adoptable_article_html(false).unwrap_or_default());
//! }
//! assert_eq!(finder.article_title(), "Hello");
//! # Ok::<(), article_finder::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Geometry-aware scoring**: Candidates are scored by prose volume and
//!   normalised by on-screen area
//! - **Index page rejection**: Teaser feeds, rule-separated excerpts and
//!   linked-header lists are not mistaken for articles
//! - **Cleaning**: Navigation, share bars, hidden and link-heavy blocks are
//!   pruned from a copy of the article
//! - **Pagination**: The next page of a multi-page article is found by URL
//!   diffing
//! - **Configurable**: Every tuned threshold is an [`Options`] field

mod error;
mod options;
mod patterns;
mod result;

/// Document tree (`dom_query`) with per-element layout.
pub mod dom;

/// Boxes, computed style and CSS declaration parsing.
pub mod layout;

/// Loader for HTML snapshots carrying layout annotations.
pub mod annotated;

/// Per-session cache of element rectangles.
pub mod geometry;

/// String helpers shared by the heuristics.
pub mod text;

/// Article detection, cleaning, titles and pagination.
pub mod extractor;

/// URL utilities for href resolution and path comparison.
pub mod url_utils;

/// Link density testing for boilerplate detection.
pub mod link_density;

/// Sources of document snapshots.
pub mod provider;

// Public API - re-exports
pub use dom::{Document, NodeId};
pub use error::{Error, Result};
pub use extractor::{ArticleFinder, RouteStep};
pub use options::Options;
pub use provider::{AnnotatedSnapshots, DocumentProvider};
pub use result::{ExtractedArticle, ReadingListInfo};

/// Loads the page at `url` and returns the markup of its cleaned article.
///
/// The article search is forced, so a page that only holds look-alike
/// teasers still yields its best candidate.
///
/// # Errors
///
/// - [`Error::InvalidUrl`] when `url` is empty
/// - [`Error::Document`] when the provider cannot produce a snapshot
/// - [`Error::NoArticle`] when the page has no article
///
/// # Example
///
/// ```rust
/// use article_finder::{extract_article_html, AnnotatedSnapshots, Error, Options};
///
/// let snapshots = AnnotatedSnapshots::new();
/// let err = extract_article_html(&snapshots, "", &Options::default()).unwrap_err();
/// assert!(matches!(err, Error::InvalidUrl(_)));
/// ```
pub fn extract_article_html<P>(provider: &P, url: &str, options: &Options) -> Result<String>
where
    P: DocumentProvider + ?Sized,
{
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::InvalidUrl(url.to_string()));
    }

    let doc = provider.document(url).map_err(|e| match e {
        Error::Document(_) => e,
        other => Error::Document(other.to_string()),
    })?;

    let mut finder = ArticleFinder::new(&doc, options.clone());
    let html = finder.adoptable_article_html(true);
    tracing::debug!(url, found = html.is_some(), "extracted article");
    html.ok_or(Error::NoArticle)
}

/// Runs a full reader session over `doc`.
///
/// Returns `None` when reader mode is not available for the document.
#[must_use]
pub fn extract(doc: &Document, options: &Options) -> Option<ExtractedArticle> {
    let mut finder = ArticleFinder::new(doc, options.clone());
    if !finder.is_reader_mode_available() {
        return None;
    }
    finder.prepare_to_transition_to_reader()
}
