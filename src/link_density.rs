//! Link density
//!
//! Sections whose text is mostly link text are usually navigation or
//! boilerplate. The cleaner uses the density to decide whether a queued
//! container survives.

use crate::dom::{Document, NodeId};
use crate::text::non_whitespace_len;

/// Portion of an element's non-whitespace text that sits inside `a` elements.
///
/// Returns 0 for elements without text.
#[must_use]
pub fn calculate_link_density(doc: &Document, element: NodeId) -> f64 {
    let text_length = non_whitespace_len(&doc.text_content(element));
    if text_length == 0 {
        return 0.0;
    }

    // Nested anchors are counted once per anchor, as the browser would.
    let link_length: usize = doc
        .elements_by_tags(element, &["a"])
        .into_iter()
        .map(|link| non_whitespace_len(&doc.text_content(link)))
        .sum();

    link_length as f64 / text_length as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph_with_link(text: &str, link: &str) -> (Document, NodeId) {
        let mut doc = Document::default();
        let root = doc.root();
        let p = doc.create_element("p");
        doc.append_child(root, p);
        let t = doc.create_text(text);
        doc.append_child(p, t);
        let a = doc.create_element("a");
        doc.append_child(p, a);
        let lt = doc.create_text(link);
        doc.append_child(a, lt);
        (doc, p)
    }

    #[test]
    fn test_link_density_ratio() {
        let (doc, p) = paragraph_with_link("abcdef ", "ghij");
        assert!((calculate_link_density(&doc, p) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_link_density_all_links() {
        let (doc, p) = paragraph_with_link("", "home");
        assert!((calculate_link_density(&doc, p) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_link_density_empty() {
        let (doc, p) = paragraph_with_link("  ", " ");
        assert_eq!(calculate_link_density(&doc, p), 0.0);
    }
}
