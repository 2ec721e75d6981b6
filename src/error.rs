//! Error types for article-finder.
//!
//! Most of the engine reports "nothing found" through `Option`. These errors
//! are what a caller of the URL-in, markup-out boundary gets back.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target URL was missing, empty or unparseable.
    #[error("bad url: {0}")]
    InvalidUrl(String),

    /// The document provider could not produce a snapshot.
    #[error("error parsing document: {0}")]
    Document(String),

    /// A snapshot could not be built from the supplied markup.
    #[error("HTML parsing failed: {0}")]
    ParseError(String),

    /// No article was found in the document.
    #[error("not able to find article")]
    NoArticle,
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
