//! Structural routes to an article.
//!
//! A route records, for the article and each of its ancestors, the tag, id,
//! significant class and position among siblings. A caller can store the
//! route of a page it already processed and hand it back on the next visit:
//! replaying it is much cheaper than a full scan when the layout is stable.

use serde::{Deserialize, Serialize};

use super::candidate::CandidateElement;
use super::tags::TagSet;
use super::Context;
use crate::dom::{Document, NodeId};

/// Class names that describe presentation rather than structure.
const STYLISTIC_CLASS_NAMES: [&str; 5] = ["justfy", "justify", "left", "right", "small"];

/// One element on the way from the document root to the article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// 1-based position among element siblings, not counting ignored ones.
    pub index: usize,
}

fn class_name_is_significant(class_name: &str) -> bool {
    !class_name.is_empty()
        && !STYLISTIC_CLASS_NAMES.contains(&class_name.to_ascii_lowercase().as_str())
}

/// Siblings that do not count towards a step's index: script-like elements
/// and collapsed table rows.
#[must_use]
pub fn should_ignore_in_route(doc: &Document, element: NodeId) -> bool {
    let tag = doc.tag_name(element);
    if TagSet::RouteIgnored.contains(&tag) {
        return true;
    }
    tag == "tr" && doc.bounding_rect(element).height == 0.0
}

/// Route from the document element down to `element`.
#[must_use]
pub fn route_to(doc: &Document, element: NodeId) -> Vec<RouteStep> {
    let mut route: Vec<RouteStep> = std::iter::once(element)
        .chain(doc.ancestors(element))
        .map(|node| {
            let id = doc.id_attr(node);
            let class_name = doc.class_name(node);
            let mut index = 1;
            let mut sibling = doc.previous_element_sibling(node);
            while let Some(s) = sibling {
                if !should_ignore_in_route(doc, s) {
                    index += 1;
                }
                sibling = doc.previous_element_sibling(s);
            }
            RouteStep {
                tag_name: doc.tag_name(node),
                id: (!id.is_empty()).then_some(id),
                class_name: class_name_is_significant(&class_name).then_some(class_name),
                index,
            }
        })
        .collect();
    route.reverse();
    route
}

/// Replay `route` against the document.
///
/// Starts from the deepest step whose id still exists, then follows tag,
/// index and class of each remaining step. Any mismatch, or an invisible
/// destination, yields `None`.
#[must_use]
pub fn find_suggested_candidate(ctx: &Context<'_>, route: &[RouteStep]) -> Option<CandidateElement> {
    let doc = ctx.doc;
    if route.is_empty() {
        return None;
    }

    let anchored = route.iter().enumerate().rev().find_map(|(i, step)| {
        let id = step.id.as_deref()?;
        doc.element_by_id(id).map(|node| (i + 1, node))
    });
    let (mut next_step, mut node) = anchored.unwrap_or((0, doc.root()));

    while next_step < route.len() {
        let step = &route[next_step];
        let mut child = if node == doc.root() {
            doc.document_element()
        } else {
            doc.first_element_child(node)
        };
        let mut position = 1;
        while let Some(c) = child {
            if position >= step.index {
                break;
            }
            if !should_ignore_in_route(doc, c) {
                position += 1;
            }
            child = doc.next_element_sibling(c);
        }

        let child = child?;
        if !doc.tag_name(child).eq_ignore_ascii_case(&step.tag_name) {
            return None;
        }
        if let Some(class_name) = &step.class_name {
            if doc.class_name(child) != *class_name {
                return None;
            }
        }
        node = child;
        next_step += 1;
    }

    if !doc.is_visible(node) {
        tracing::debug!(?node, "suggested route leads to an invisible element");
        return None;
    }
    Some(CandidateElement::new(ctx, node))
}
