//! Title, leading image and content text style detection.

use std::collections::HashMap;

use super::candidate::{usable_text_nodes, BASE_FONT_SIZE};
use super::tags::TagSet;
use super::Context;
use crate::dom::{Document, NodeId};
use crate::layout::{ComputedStyle, Rect};
use crate::patterns::{
    HEADER_BONUS, HEADLINE_CLASSES, HEADLINE_IDS, LEADING_IMAGE_ATTRIBUTE_TO_KEEP,
    LEADING_IMAGE_CAPTION, LEADING_IMAGE_CREDIT,
};

const HEADER_MAXIMUM_DISTANCE: f64 = 500.0;
const HEADER_MINIMUM_TEXT_LENGTH: usize = 8;
const HEADER_MINIMUM_FONT_SIZE: f64 = 12.0;
const HEADER_FONT_SIZE_BONUS_MINIMUM_RATIO: f64 = 1.1;
const HEADER_FONT_SIZE_BONUS_MULTIPLIER: f64 = 1.25;
const HEADER_REGEX_BONUS_MULTIPLIER: f64 = 1.5;
const HEADER_CONTENT_BONUS_MULTIPLIER: f64 = 1.5;
const HEADER_MAXIMUM_DOM_DISTANCE: usize = 9;
const HEADER_MINIMUM_FONT_SIZE_DIFFERENCE: f64 = 1.5;
const TITLE_DEPTH_SCORE_MULTIPLIER: f64 = 0.1;

const LEADING_IMAGE_MAXIMUM_CONTAINER_CHILDREN: usize = 5;
const LEADING_IMAGE_MINIMUM_ABSOLUTE_WIDTH: f64 = 600.0;

/// A scored headline.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleCandidate {
    pub element: NodeId,
    pub text: String,
    pub score: f64,
}

/// Where the title is expected: the article's horizontal extent and its top.
///
/// `adjusted_top` is the top of the leading image when there is one, since
/// headlines usually sit above the photo.
#[derive(Debug, Clone, Copy)]
pub struct TitleAnchor {
    pub rect: Rect,
    pub adjusted_top: f64,
}

fn is_headline_candidate(doc: &Document, element: NodeId) -> bool {
    let tag = doc.tag_name(element);
    (TagSet::Header.contains(&tag) && tag != "h6")
        || HEADLINE_IDS.contains(&doc.id_attr(element).as_str())
        || HEADLINE_CLASSES.iter().any(|c| doc.has_class(element, c))
}

fn is_prefix_or_suffix(header_text: &str, document_title: &str) -> bool {
    !header_text.is_empty()
        && (document_title.starts_with(header_text) || document_title.ends_with(header_text))
}

/// Pick the headline closest to the top of the article.
///
/// Headers are scored by distance from the article's top centre, then
/// boosted for depth, font size, headline-like class names and agreement
/// with the document title. A winner far from the article in the tree must
/// be set in a clearly larger font than the body text.
#[must_use]
pub fn find_title_element(
    ctx: &Context<'_>,
    article: NodeId,
    anchor: TitleAnchor,
    content_font_size: f64,
) -> Option<TitleCandidate> {
    let doc = ctx.doc;
    let document_title = doc.title();
    let article_center_x = anchor.rect.center_x();

    let mut best: Option<TitleCandidate> = None;
    for header in doc.descendant_elements(doc.root()) {
        if !is_headline_candidate(doc, header) {
            continue;
        }
        let rect = ctx.rect(header);
        let delta_x = rect.center_x() - article_center_x;
        let delta_y = rect.center_y() - anchor.adjusted_top;
        let distance = delta_x.hypot(delta_y);
        if distance > HEADER_MAXIMUM_DISTANCE {
            continue;
        }
        if rect.center_x() < anchor.rect.left || rect.center_x() > anchor.rect.right() {
            continue;
        }
        let font_size = doc.style(header).font_size;
        if font_size < HEADER_MINIMUM_FONT_SIZE {
            continue;
        }

        let mut score = (HEADER_MAXIMUM_DISTANCE - distance).max(0.0);
        let text = doc.inner_text(header);
        if is_prefix_or_suffix(&text, &document_title) {
            score *= HEADER_CONTENT_BONUS_MULTIPLIER;
        } else if text.chars().count() < HEADER_MINIMUM_TEXT_LENGTH {
            continue;
        }

        score *= 1.0 + TITLE_DEPTH_SCORE_MULTIPLIER * (doc.depth(header) + 1) as f64;
        score *= font_size / BASE_FONT_SIZE;
        if font_size.trunc() > content_font_size.trunc() * HEADER_FONT_SIZE_BONUS_MINIMUM_RATIO {
            score *= HEADER_FONT_SIZE_BONUS_MULTIPLIER;
        }
        if HEADER_BONUS.is_match(&doc.class_name(header))
            || HEADER_BONUS.is_match(&doc.id_attr(header))
        {
            score *= HEADER_REGEX_BONUS_MULTIPLIER;
        }

        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(TitleCandidate { element: header, text, score });
        }
    }

    let best = best?;
    if dom_distance(doc, best.element, article, HEADER_MAXIMUM_DOM_DISTANCE + 1)
        > HEADER_MAXIMUM_DOM_DISTANCE
        && doc.style(best.element).font_size.trunc()
            < HEADER_MINIMUM_FONT_SIZE_DIFFERENCE * content_font_size.trunc()
    {
        tracing::debug!(header = ?best.element, "dropping distant headline set in body-sized type");
        return None;
    }
    tracing::debug!(header = ?best.element, score = best.score, "picked article title");
    Some(best)
}

/// Number of tree edges between `a` and `b`, capped at `limit`.
#[must_use]
pub fn dom_distance(doc: &Document, a: NodeId, b: NodeId, limit: usize) -> usize {
    let a_chain: HashMap<NodeId, usize> = std::iter::successors(Some(a), |&n| doc.parent(n))
        .enumerate()
        .map(|(steps, node)| (node, steps))
        .collect();

    for (b_steps, node) in std::iter::successors(Some(b), |&n| doc.parent(n)).enumerate() {
        if b_steps >= limit {
            return limit;
        }
        if let Some(&a_steps) = a_chain.get(&node) {
            return (a_steps + b_steps).min(limit);
        }
    }
    limit
}

/// First large image shortly before the article.
///
/// Looks at the first `img` under each of the article's nearest ancestors.
/// The image must precede the article (and the extra article, if any)
/// without being inside it.
#[must_use]
pub fn find_leading_image(
    ctx: &Context<'_>,
    article: NodeId,
    extra_article: Option<NodeId>,
    article_width: f64,
) -> Option<NodeId> {
    let doc = ctx.doc;
    let opts = ctx.options;
    let outside_before = |block: NodeId, image: NodeId| {
        doc.precedes(image, block) && !doc.contains(block, image)
    };

    let mut scope = article;
    for _ in 0..opts.leading_image_ancestor_count {
        let Some(parent) = doc.parent(scope) else {
            break;
        };
        scope = parent;
        let Some(image) = doc.first_by_tag(scope, "img") else {
            continue;
        };
        let rect = ctx.rect(image);
        if rect.height < opts.leading_image_min_height
            || rect.width < article_width * opts.leading_image_min_width_ratio
        {
            continue;
        }
        if !outside_before(article, image) {
            continue;
        }
        if extra_article.is_some_and(|extra| !outside_before(extra, image)) {
            continue;
        }
        return Some(image);
    }
    None
}

/// Build the `div.leading-image` block for `image` inside `out`.
///
/// Only images at least as wide as the article qualify. Credit and caption
/// blocks are taken from a small `div` wrapping the image. The returned
/// node is detached.
pub fn build_leading_image(
    ctx: &Context<'_>,
    image: NodeId,
    article: NodeId,
    out: &mut Document,
) -> Option<NodeId> {
    let doc = ctx.doc;
    let image_width = ctx.rect(image).width;
    if image_width < ctx.rect(article).width {
        return None;
    }

    let mut credit = None;
    let mut caption = None;
    if let Some(container) = doc.parent_element(image) {
        let children = doc.child_element_count(container);
        if doc.tag_name(container) == "div"
            && children > 1
            && children < LEADING_IMAGE_MAXIMUM_CONTAINER_CHILDREN
        {
            for text in doc.elements_by_tags(container, &["p", "div"]) {
                let class_name = doc.class_name(text);
                if LEADING_IMAGE_CREDIT.is_match(&class_name) {
                    credit = Some(text);
                } else if LEADING_IMAGE_CAPTION.is_match(&class_name) {
                    caption = Some(text);
                }
            }
        }
    }

    let copy = out.create_element("img");
    for (name, value) in doc.attrs(image) {
        if LEADING_IMAGE_ATTRIBUTE_TO_KEEP.is_match(&name) {
            out.set_attr(copy, &name, &value);
        }
    }
    if image_width >= LEADING_IMAGE_MINIMUM_ABSOLUTE_WIDTH {
        out.set_attr(copy, "class", "full-width");
    }
    if let Some(layout) = doc.layout(image) {
        out.set_layout(copy, layout.clone());
    }

    let container = out.create_element("div");
    out.set_attr(container, "class", "leading-image");
    out.append_child(container, copy);
    for (source, class_name) in [(credit, "credit"), (caption, "caption")] {
        let Some(source) = source else {
            continue;
        };
        let block = out.create_element("div");
        out.set_attr(block, "class", class_name);
        for child in doc.children(source) {
            let child_copy = out.import_subtree(doc, child);
            out.append_child(block, child_copy);
        }
        out.append_child(container, block);
    }
    Some(container)
}

/// The style most of the element's usable text is set in.
///
/// Text is grouped by font family and size of its parent and weighed by
/// length. Returns `None` when the element has no usable text.
#[must_use]
pub fn content_text_style(doc: &Document, element: NodeId) -> Option<ComputedStyle> {
    let mut weights: HashMap<(String, u64), (usize, NodeId)> = HashMap::new();
    let mut order: Vec<(String, u64)> = Vec::new();
    for text in usable_text_nodes(doc, element) {
        let Some(parent) = doc.parent(text) else {
            continue;
        };
        let style = doc.style(parent);
        let key = (style.font_family.clone(), style.font_size.to_bits());
        let length = doc.text(text).map_or(0, |t| t.trim().chars().count());
        let entry = weights.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (0, parent)
        });
        entry.0 += length;
    }

    let mut best: Option<(usize, NodeId)> = None;
    for key in &order {
        let Some(&(weight, parent)) = weights.get(key) else {
            continue;
        };
        if best.is_none_or(|(w, _)| weight > w) {
            best = Some((weight, parent));
        }
    }
    best.map(|(_, parent)| doc.style(parent).clone())
}
