//! Whole-document candidate scan.

use std::collections::HashMap;
use std::time::Instant;

use super::candidate::CandidateElement;
use super::tags::TagSet;
use super::Context;
use crate::dom::{Document, NodeId};

/// Whether `element` can never be a candidate because of its own tag or
/// where it sits in the tree.
#[must_use]
pub fn should_ignore_element(doc: &Document, element: NodeId) -> bool {
    let tag = doc.tag_name(element);
    if TagSet::CandidateIgnored.contains(&tag) {
        return true;
    }
    if TagSet::CandidateIgnoredDescendants.contains(&tag) {
        return true;
    }
    doc.ancestors(element).any(|a| {
        let tag = doc.tag_name(a);
        TagSet::CandidateIgnoredDescendants.contains(&tag) || TagSet::EmbeddedContent.contains(&tag)
    })
}

/// Score every viable element of the document.
///
/// Block quotes whose parent is also a candidate lend their text to the
/// parent. When the scan outlives `Options::scan_budget_ms` it gives up and
/// returns no candidates.
#[must_use]
pub fn find_candidate_elements(ctx: &Context<'_>) -> Vec<CandidateElement> {
    let doc = ctx.doc;
    let budget = ctx.options.scan_budget();
    let started = Instant::now();

    let mut candidates = Vec::new();
    for element in doc.descendant_elements(doc.root()) {
        if started.elapsed() >= budget {
            tracing::warn!(
                budget_ms = ctx.options.scan_budget_ms,
                scanned = candidates.len(),
                "aborting candidate detection due to timeout"
            );
            return Vec::new();
        }
        if should_ignore_element(doc, element) {
            continue;
        }
        if let Some(candidate) = CandidateElement::candidate_if_viable(ctx, element, false) {
            candidates.push(candidate);
        }
    }

    merge_block_quotes(doc, &mut candidates);
    tracing::debug!(count = candidates.len(), "collected article candidates");
    candidates
}

fn merge_block_quotes(doc: &Document, candidates: &mut [CandidateElement]) {
    let index_of: HashMap<NodeId, usize> =
        candidates.iter().enumerate().map(|(i, c)| (c.element(), i)).collect();

    for quote in 0..candidates.len() {
        let element = candidates[quote].element();
        if doc.tag_name(element) != "blockquote" {
            continue;
        }
        let Some(&parent) = doc.parent_element(element).and_then(|p| index_of.get(&p)) else {
            continue;
        };
        let quoted = candidates[quote].text_nodes().to_vec();
        candidates[parent].add_text_nodes(doc, &quoted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotated;
    use crate::geometry::GeometryCache;
    use crate::Options;

    const PROSE: &str = "Long enough prose to count towards the score of the candidate it belongs to.";

    fn page() -> String {
        format!(
            r#"<html><body data-rect="0,0,1000,3000">
            <div id="main" data-rect="0,0,800,1000">
                <p data-rect="0,0,800,100">{PROSE}</p>
                <blockquote id="quote" data-rect="0,100,800,400">
                    <p data-rect="0,100,800,100">{PROSE} Quoted.</p>
                    <div data-rect="0,200,800,100"><p data-rect="0,200,800,100">{PROSE} Nested.</p></div>
                </blockquote>
            </div>
            <ul data-rect="0,1000,800,600"><li data-rect="0,1000,800,600"><div id="in-list" data-rect="0,1000,800,600"></div></li></ul>
            <a href="/x" data-rect="0,1600,800,600"><div id="in-link" data-rect="0,1600,800,600"></div></a>
            <form data-rect="0,2200,800,600"><div id="in-form" data-rect="0,2200,800,600"></div></form>
            </body></html>"#
        )
    }

    #[test]
    fn test_ignored_elements() {
        let doc = annotated::parse(&page(), None).unwrap();
        assert!(should_ignore_element(&doc, doc.body().unwrap()));
        assert!(should_ignore_element(&doc, doc.element_by_id("in-list").unwrap()));
        assert!(should_ignore_element(&doc, doc.element_by_id("in-link").unwrap()));
        assert!(should_ignore_element(&doc, doc.element_by_id("in-form").unwrap()));
        assert!(!should_ignore_element(&doc, doc.element_by_id("main").unwrap()));
    }

    #[test]
    fn test_block_quote_text_merges_into_parent() {
        let doc = annotated::parse(&page(), None).unwrap();
        let geometry = GeometryCache::new();
        let options = Options::default();
        let ctx = Context::new(&doc, &geometry, &options);

        let candidates = find_candidate_elements(&ctx);
        let ids: Vec<String> = candidates.iter().map(|c| doc.id_attr(c.element())).collect();
        assert_eq!(ids, vec!["main", "quote"]);

        let main = &candidates[0];
        let quote = &candidates[1];
        // The nested paragraph is only reachable through the quote.
        assert_eq!(quote.text_nodes().len(), 2);
        assert_eq!(main.text_nodes().len(), 3);
        assert!(main.raw_score() > quote.raw_score());
    }

    #[test]
    fn test_zero_budget_yields_nothing() {
        let doc = annotated::parse(&page(), None).unwrap();
        let geometry = GeometryCache::new();
        let options = Options { scan_budget_ms: 0, ..Options::default() };
        let ctx = Context::new(&doc, &geometry, &options);

        assert!(find_candidate_elements(&ctx).is_empty());
    }
}
