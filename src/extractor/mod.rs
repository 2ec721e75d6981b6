//! Article detection and cleaning.
//!
//! # Module Structure
//!
//! - `tags`: Tag categories used by the heuristics
//! - `state`: Memoized search outcomes of a finder session
//! - `candidate`: Scoring of one element as an article hypothesis
//! - `collector`: Whole-document candidate scan
//! - `route`: Structural route to a previously found article
//! - `title`: Title, title element and leading image detection
//! - `cleaner`: Pruning of a copy of the chosen subtree
//! - `pagination`: Next-page link scoring
//! - `finder`: The session tying everything together
//!
//! # Usage
//!
//! ```rust
//! use article_finder::{annotated, ArticleFinder, Options};
//!
//! let doc = annotated::parse("<html><body></body></html>", None)?;
//! let mut finder = ArticleFinder::new(&doc, Options::default());
//! assert!(finder.article_node(false).is_none());
//! # Ok::<(), article_finder::Error>(())
//! ```

pub mod candidate;
pub mod cleaner;
pub mod collector;
pub mod finder;
pub mod pagination;
pub mod route;
pub mod state;
pub mod tags;
pub mod title;

pub use candidate::CandidateElement;
pub use cleaner::TreeCleaner;
pub use collector::find_candidate_elements;
pub use finder::ArticleFinder;
pub use route::RouteStep;
pub use state::SearchState;
pub use tags::TagSet;

use crate::dom::{Document, NodeId};
use crate::geometry::GeometryCache;
use crate::layout::Rect;
use crate::Options;

/// Shared read-only inputs of every heuristic.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub doc: &'a Document,
    pub geometry: &'a GeometryCache,
    pub options: &'a Options,
}

impl<'a> Context<'a> {
    #[must_use]
    pub fn new(doc: &'a Document, geometry: &'a GeometryCache, options: &'a Options) -> Self {
        Self { doc, geometry, options }
    }

    /// Cached bounding rectangle of `id`.
    #[must_use]
    pub fn rect(&self, id: NodeId) -> Rect {
        self.geometry.rect(self.doc, id)
    }
}
