//! Where documents come from.
//!
//! The finder works on a rendered snapshot. Producing one (loading the page,
//! running layout, dumping geometry) is the job of a [`DocumentProvider`].
//! Snapshots saved as annotated HTML can be served with
//! [`AnnotatedSnapshots`]; any closure taking a URL works too.

use std::collections::HashMap;

use crate::dom::Document;
use crate::{annotated, Error, Result};

/// Loads the rendered snapshot of a page.
pub trait DocumentProvider {
    /// Snapshot of the page at `url`.
    ///
    /// Failures are reported as [`Error::Document`].
    fn document(&self, url: &str) -> Result<Document>;
}

impl<F> DocumentProvider for F
where
    F: Fn(&str) -> Result<Document>,
{
    fn document(&self, url: &str) -> Result<Document> {
        self(url)
    }
}

/// Annotated HTML snapshots kept in memory, keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct AnnotatedSnapshots {
    pages: HashMap<String, String>,
}

impl AnnotatedSnapshots {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the annotated markup served for `url`.
    pub fn insert(&mut self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.insert(url.into(), html.into());
    }
}

impl DocumentProvider for AnnotatedSnapshots {
    fn document(&self, url: &str) -> Result<Document> {
        let html = self
            .pages
            .get(url)
            .ok_or_else(|| Error::Document(format!("no snapshot for {url}")))?;
        annotated::parse(html, Some(url)).map_err(|e| match e {
            Error::Document(_) => e,
            other => Error::Document(other.to_string()),
        })
    }
}
