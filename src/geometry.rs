//! Memoized bounding rectangles.
//!
//! Scoring asks for the same element boxes many times over. The cache is owned
//! by one finder session and is cleared whenever that session re-runs a forced
//! search, since layout may have changed in between.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::dom::{Document, NodeId};
use crate::layout::Rect;

/// Per-session cache of element bounding rectangles.
#[derive(Debug, Default)]
pub struct GeometryCache {
    rects: RefCell<HashMap<NodeId, Rect>>,
}

impl GeometryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounding rectangle of `id`, computed once per cache lifetime.
    #[must_use]
    pub fn rect(&self, doc: &Document, id: NodeId) -> Rect {
        if let Some(rect) = self.rects.borrow().get(&id) {
            return *rect;
        }
        let rect = doc.bounding_rect(id);
        self.rects.borrow_mut().insert(id, rect);
        rect
    }

    /// Drop every cached rectangle.
    pub fn clear(&self) {
        self.rects.borrow_mut().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    #[test]
    fn caches_until_cleared() {
        let mut doc = Document::default();
        let div = doc.create_element("div");
        let root = doc.root();
        doc.append_child(root, div);
        doc.set_layout(
            div,
            Layout { rect: Some(Rect::new(0.0, 0.0, 10.0, 10.0)), ..Layout::default() },
        );

        let cache = GeometryCache::new();
        assert_eq!(cache.rect(&doc, div).width, 10.0);

        doc.set_layout(
            div,
            Layout { rect: Some(Rect::new(0.0, 0.0, 20.0, 10.0)), ..Layout::default() },
        );
        assert_eq!(cache.rect(&doc, div).width, 10.0);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.rect(&doc, div).width, 20.0);
    }
}
