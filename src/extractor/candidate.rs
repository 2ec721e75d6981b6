//! Candidate scoring.
//!
//! A `CandidateElement` is one element considered as the article container.
//! Its score grows with the amount of prose directly under it, is boosted or
//! penalised by article-like and comment-like class names up the ancestor
//! chain, and is normalised by area when checking that the element is dense
//! enough to be the article.

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};

use super::tags::TagSet;
use super::Context;
use crate::dom::{Document, NodeId};
use crate::patterns::{ARTICLE_CLASS, COMMENT_CLASS, COMMENT_CONTAINER_CLASS, COMMENT_CONTAINER_IDS};
use crate::text::is_cjk;

/// Font size every other size is compared against.
pub const BASE_FONT_SIZE: f64 = 16.0;

/// `line-height: normal` as a multiple of the font size.
pub const BASE_LINE_HEIGHT_RATIO: f64 = 1.125;

const TEXT_NODE_MINIMUM_LENGTH: usize = 20;
const TEXT_NODE_LENGTH_POWER: f64 = 1.25;
const TEXT_DEPTH_PENALTY: f64 = 0.1;
const ARTICLE_MATCH_BONUS: f64 = 0.5;
const COMMENT_MATCH_PENALTY: f64 = 0.5;
const LANGUAGE_SAMPLE_LENGTH: usize = 10;
const HORIZONTAL_RULE_MIN_WIDTH_RATIO: f64 = 0.7;
const HEADER_LINK_COUNT_THRESHOLD: usize = 2;

/// An element scored as a possible article container.
#[derive(Debug, Clone)]
pub struct CandidateElement {
    element: NodeId,
    text_nodes: Vec<NodeId>,
    raw_score: f64,
    regex_bonus_multiplier: f64,
    language_score_multiplier: OnceCell<f64>,
    depth: OnceCell<usize>,
    is_prepended: bool,
}

impl CandidateElement {
    /// Score `element` unconditionally.
    #[must_use]
    pub fn new(ctx: &Context<'_>, element: NodeId) -> Self {
        let text_nodes = usable_text_nodes(ctx.doc, element);
        let raw_score = raw_score(ctx.doc, element, &text_nodes);
        Self {
            element,
            text_nodes,
            raw_score,
            regex_bonus_multiplier: regex_bonus_multiplier(ctx.doc, element),
            language_score_multiplier: OnceCell::new(),
            depth: OnceCell::new(),
            is_prepended: false,
        }
    }

    /// Score `element` if it is large enough and high enough on the page to
    /// hold an article.
    ///
    /// `for_similar_class_check` bypasses every size filter; it is used to
    /// score look-alike elements for comparison only.
    #[must_use]
    pub fn candidate_if_viable(
        ctx: &Context<'_>,
        element: NodeId,
        for_similar_class_check: bool,
    ) -> Option<Self> {
        if for_similar_class_check {
            return Some(Self::new(ctx, element));
        }

        let opts = ctx.options;
        let rect = ctx.rect(element);
        if rect.width < opts.candidate_min_width || rect.height < opts.candidate_min_height {
            return None;
        }
        if rect.area() < opts.candidate_min_area {
            return None;
        }
        if rect.top > opts.candidate_max_top {
            return None;
        }
        if adjusted_height(ctx, element) < opts.candidate_min_height {
            return None;
        }
        Some(Self::new(ctx, element))
    }

    /// Score `element` as a block to prepend or append to `article`.
    #[must_use]
    pub fn extra_candidate_if_viable(
        ctx: &Context<'_>,
        element: NodeId,
        article: &CandidateElement,
        is_prepended: bool,
    ) -> Option<Self> {
        let opts = ctx.options;
        let doc = ctx.doc;
        let rect = ctx.rect(element);
        let article_rect = ctx.rect(article.element);

        let minimum_height =
            if is_prepended { opts.prepended_min_height } else { opts.appended_min_height };
        if rect.height < minimum_height && doc.child_element_count(element) > 0 {
            let all_inline = doc
                .descendant_elements(element)
                .into_iter()
                .all(|d| TagSet::InlineTextContainer.contains(&doc.tag_name(d)));
            if !all_inline {
                return None;
            }
        }

        if is_prepended {
            if rect.bottom() > article_rect.top {
                return None;
            }
        } else {
            if rect.top < article_rect.bottom() {
                return None;
            }
            if rect.top - article_rect.bottom() > opts.appended_max_distance {
                return None;
            }
        }

        let max_delta = 0.1 * article_rect.width;
        if (rect.left - article_rect.left).abs() > max_delta
            || (rect.right() - article_rect.right()).abs() > max_delta
        {
            return None;
        }

        let mut candidate = Self::new(ctx, element);
        candidate.is_prepended = is_prepended;
        Some(candidate)
    }

    #[must_use]
    pub fn element(&self) -> NodeId {
        self.element
    }

    #[must_use]
    pub fn text_nodes(&self) -> &[NodeId] {
        &self.text_nodes
    }

    #[must_use]
    pub fn raw_score(&self) -> f64 {
        self.raw_score
    }

    #[must_use]
    pub fn regex_bonus_multiplier(&self) -> f64 {
        self.regex_bonus_multiplier
    }

    #[must_use]
    pub fn is_prepended(&self) -> bool {
        self.is_prepended
    }

    /// Element depth in the document, computed once.
    #[must_use]
    pub fn depth(&self, doc: &Document) -> usize {
        *self.depth.get_or_init(|| doc.depth(self.element))
    }

    /// Raw score adjusted by class and id names.
    #[must_use]
    pub fn basic_score(&self) -> f64 {
        self.raw_score * self.regex_bonus_multiplier
    }

    /// Basic score adjusted for the script of the text.
    #[must_use]
    pub fn final_score(&self, ctx: &Context<'_>) -> f64 {
        self.basic_score() * self.language_score_multiplier(ctx)
    }

    /// Multiplier for text led by Chinese, Japanese or Korean characters.
    ///
    /// Looks at up to ten characters of the trimmed first text node; when at
    /// least half of them are CJK the configured multiplier applies.
    pub fn language_score_multiplier(&self, ctx: &Context<'_>) -> f64 {
        *self.language_score_multiplier.get_or_init(|| {
            let Some(first) = self.text_nodes.first().and_then(|&t| ctx.doc.text(t)) else {
                return 1.0;
            };
            let sample: Vec<char> = first.trim().chars().take(LANGUAGE_SAMPLE_LENGTH).collect();
            let cjk = sample.iter().filter(|&&c| is_cjk(c)).count();
            if cjk as f64 >= sample.len() as f64 / 2.0 {
                ctx.options.cjk_score_multiplier
            } else {
                1.0
            }
        })
    }

    /// Merge `other_text_nodes` into this candidate and rescore.
    ///
    /// Nodes already counted are skipped, so merging never duplicates text.
    pub fn add_text_nodes(&mut self, doc: &Document, other_text_nodes: &[NodeId]) {
        let counted: HashSet<NodeId> = self.text_nodes.iter().copied().collect();
        self.text_nodes
            .extend(other_text_nodes.iter().copied().filter(|t| !counted.contains(t)));
        self.raw_score = raw_score(doc, self.element, &self.text_nodes);
    }

    /// Merge the text of another candidate, typically a block quote inside
    /// this one.
    pub fn add_text_nodes_from_candidate(&mut self, doc: &Document, other: &CandidateElement) {
        self.add_text_nodes(doc, &other.text_nodes);
    }

    /// Score per unit of visible area, scaled by font size and script.
    #[must_use]
    pub fn score_density(&self, ctx: &Context<'_>) -> f64 {
        let doc = ctx.doc;
        let opts = ctx.options;
        let rect = ctx.rect(self.element);
        let article_area = rect.area();

        let mut ignored_area = doc
            .descendant_elements(self.element)
            .into_iter()
            .find(|&e| {
                COMMENT_CONTAINER_IDS.contains(&doc.id_attr(e).as_str())
                    || doc.has_class(e, COMMENT_CONTAINER_CLASS)
            })
            .map_or(0.0, |e| doc.client_size(e).area());

        let maximum_image_area = article_area * opts.content_image_max_area_ratio;
        let image_minimum_width = rect.width * opts.content_image_min_width_ratio;
        for image in doc.elements_by_tags(self.element, &["img"]) {
            let image_rect = ctx.rect(image);
            if image_rect.width >= image_minimum_width
                && image_rect.height > opts.content_image_min_height
                && image_rect.area() < maximum_image_area
            {
                ignored_area += image_rect.area();
            }
        }

        let area = article_area - ignored_area;
        if area <= 0.0 {
            return 0.0;
        }

        let parents: Vec<NodeId> =
            self.text_nodes.iter().filter_map(|&t| doc.parent(t)).collect();
        let average_font_size = if parents.is_empty() {
            BASE_FONT_SIZE
        } else {
            parents.iter().map(|&p| doc.style(p).font_size).sum::<f64>() / parents.len() as f64
        };

        (self.basic_score() / area * 1000.0)
            * (average_font_size / BASE_FONT_SIZE)
            * self.language_score_multiplier(ctx)
    }

    #[must_use]
    pub fn should_disqualify_due_to_score_density(&self, ctx: &Context<'_>) -> bool {
        self.score_density(ctx) < ctx.options.minimum_score_density
    }

    /// Many full-width rules close together mean a list of excerpts.
    #[must_use]
    pub fn should_disqualify_due_to_horizontal_rule_density(&self, ctx: &Context<'_>) -> bool {
        let doc = ctx.doc;
        let rect = ctx.rect(self.element);
        let minimum_width = rect.width * HORIZONTAL_RULE_MIN_WIDTH_RATIO;
        let counted = doc
            .elements_by_tags(self.element, &["hr"])
            .into_iter()
            .filter(|&hr| doc.client_size(hr).width > minimum_width)
            .count();

        counted > 0 && rect.height / (counted as f64) < ctx.options.min_hr_spacing
    }

    /// Many linked headings close together mean an index page.
    #[must_use]
    pub fn should_disqualify_due_to_header_density(&self, ctx: &Context<'_>) -> bool {
        let doc = ctx.doc;
        let headers = linked_headers(doc, self.element);
        if headers.len() <= HEADER_LINK_COUNT_THRESHOLD {
            return false;
        }

        let rect = ctx.rect(self.element);
        let ignore_distance = rect.height * ctx.options.header_check_margin;
        let counted = headers
            .into_iter()
            .filter(|&h| {
                let header_rect = ctx.rect(h);
                header_rect.top - rect.top > ignore_distance
                    && rect.bottom() - header_rect.bottom() > ignore_distance
            })
            .count();

        // No header in the middle band divides to infinity and keeps the candidate.
        rect.height / (counted as f64) < ctx.options.min_header_spacing
    }

    /// Whether this candidate is one of several structurally identical blocks,
    /// such as a feed of teasers, rather than a unique article.
    #[must_use]
    pub fn should_disqualify_due_to_similar_elements(
        &self,
        ctx: &Context<'_>,
        candidates: &[CandidateElement],
    ) -> bool {
        let doc = ctx.doc;

        let mut base = self.element;
        let mut class = doc.class_name(base);
        for _ in 0..2 {
            if !class.is_empty() {
                break;
            }
            let Some(parent) = doc.parent_element(base) else {
                break;
            };
            base = parent;
            class = doc.class_name(base);
        }
        let classes: Vec<&str> = class.split_ascii_whitespace().collect();
        if classes.is_empty() {
            return false;
        }

        let by_element: HashMap<NodeId, &CandidateElement> =
            candidates.iter().map(|c| (c.element, c)).collect();
        let own_score = self.basic_score();
        let own_top = ctx.rect(self.element).top;
        let mut skipped_possible_prepend = false;

        for other in doc.elements_with_classes(&classes) {
            if other == base
                || doc.parent_element(other) == Some(base)
                || doc.parent_element(base) == Some(other)
            {
                continue;
            }
            if !doc.is_visible(other) {
                continue;
            }

            let other_score = match by_element.get(&other) {
                Some(candidate) => candidate.basic_score(),
                None => CandidateElement::new(ctx, other).basic_score(),
            };
            if other_score * ctx.options.minimum_advantage <= own_score {
                continue;
            }

            if !skipped_possible_prepend && ctx.rect(other).bottom() < own_top {
                skipped_possible_prepend = true;
                continue;
            }

            let similar = has_similar_structure(ctx, base, other);
            tracing::debug!(
                element = ?self.element,
                look_alike = ?other,
                similar,
                "compared candidate with look-alike element"
            );
            return similar;
        }
        false
    }
}

/// Height of `element` minus forms and navigation-like lists spanning most of
/// its width.
#[must_use]
pub fn adjusted_height(ctx: &Context<'_>, element: NodeId) -> f64 {
    let doc = ctx.doc;
    let opts = ctx.options;
    let rect = ctx.rect(element);
    let indicator_width = rect.width * opts.indicator_width_portion;
    let mut height = rect.height;

    for form in doc.elements_by_tags(element, &["form"]) {
        let form_rect = ctx.rect(form);
        if form_rect.width > indicator_width {
            height -= form_rect.height;
        }
    }

    let mut last_subtracted: Option<NodeId> = None;
    for list in doc.elements_by_tags(element, &["ol", "ul"]) {
        if last_subtracted.is_some_and(|l| l != list && doc.contains(l, list)) {
            continue;
        }
        let items = doc.elements_by_tags(list, &["li"]);
        let list_rect = ctx.rect(list);
        let Some(&first_item) = items.first() else {
            height -= list_rect.height;
            continue;
        };

        let average_item_height = list_rect.height / items.len() as f64;
        let line_height = doc.style(first_item).resolved_line_height(BASE_LINE_HEIGHT_RATIO);
        if list_rect.width > indicator_width
            && average_item_height / line_height < opts.min_list_item_line_count
        {
            height -= list_rect.height;
            last_subtracted = Some(list);
        }
    }
    height
}

/// Text nodes that count towards the score of `element`, in document order.
///
/// Counted are the element's own text, text of its children, text of
/// grandchildren that are inline text tags, text of grandchildren inside a
/// child block quote, and text of paragraphs inside a child `div` holding
/// only paragraphs.
#[must_use]
pub fn usable_text_nodes(doc: &Document, element: NodeId) -> Vec<NodeId> {
    let mut nodes = Vec::new();
    let consider = |text: NodeId, nodes: &mut Vec<NodeId>| {
        let Some(parent) = doc.parent(text) else {
            return;
        };
        if TagSet::UnusableTextParent.contains(&doc.tag_name(parent)) {
            return;
        }
        if doc.text(text).is_some_and(|t| t.trim().is_empty()) {
            return;
        }
        nodes.push(text);
    };

    for child in doc.children(element) {
        if doc.is_text(child) {
            consider(child, &mut nodes);
            continue;
        }
        if !doc.is_element(child) {
            continue;
        }
        let child_tag = doc.tag_name(child);
        let paragraph_div = child_tag == "div"
            && doc.element_children(child).all(|g| doc.tag_name(g) == "p");

        for grandchild in doc.children(child) {
            if doc.is_text(grandchild) {
                consider(grandchild, &mut nodes);
                continue;
            }
            let grandchild_tag = doc.tag_name(grandchild);
            let counts = TagSet::InlineTextGrandchild.contains(&grandchild_tag)
                || child_tag == "blockquote"
                || (paragraph_div && grandchild_tag == "p");
            if !counts {
                continue;
            }
            for text in doc.children(grandchild) {
                if doc.is_text(text) {
                    consider(text, &mut nodes);
                }
            }
        }
    }
    nodes
}

fn raw_score(doc: &Document, element: NodeId, text_nodes: &[NodeId]) -> f64 {
    text_nodes.iter().map(|&t| raw_score_for_text_node(doc, element, t)).sum()
}

fn raw_score_for_text_node(doc: &Document, element: NodeId, text: NodeId) -> f64 {
    let length = doc.text(text).map_or(0, |t| t.chars().count());
    if length < TEXT_NODE_MINIMUM_LENGTH {
        return 0.0;
    }
    let Some(parent) = doc.parent(text) else {
        return 0.0;
    };
    if !doc.is_visible(parent) {
        return 0.0;
    }

    let levels = std::iter::successors(Some(parent), |&n| doc.parent(n))
        .take_while(|&n| n != element)
        .count();
    let multiplier = (1.0 - TEXT_DEPTH_PENALTY * levels as f64).max(0.0);
    (length as f64 * multiplier).powf(TEXT_NODE_LENGTH_POWER)
}

fn regex_bonus_multiplier(doc: &Document, element: NodeId) -> f64 {
    let mut multiplier = 1.0;
    for node in std::iter::once(element).chain(doc.ancestors(element)) {
        for value in [doc.id_attr(node), doc.class_name(node)] {
            if value.is_empty() {
                continue;
            }
            if ARTICLE_CLASS.is_match(&value) {
                multiplier += ARTICLE_MATCH_BONUS;
            }
            if COMMENT_CLASS.is_match(&value) {
                multiplier -= COMMENT_MATCH_PENALTY;
            }
        }
    }
    multiplier
}

/// Headings that are children or grandchildren of `element` and contain a link.
fn linked_headers(doc: &Document, element: NodeId) -> Vec<NodeId> {
    let is_linked_header = |h: NodeId| {
        TagSet::Header.contains(&doc.tag_name(h))
            && doc.element_children(h).any(|c| doc.tag_name(c) == "a")
    };
    let mut headers = Vec::new();
    for child in doc.element_children(element) {
        if is_linked_header(child) {
            headers.push(child);
        }
        headers.extend(doc.element_children(child).filter(|&g| is_linked_header(g)));
    }
    headers
}

/// Compare the block structure of `base` and a look-alike `other`.
fn has_similar_structure(ctx: &Context<'_>, mut base: NodeId, mut other: NodeId) -> bool {
    let doc = ctx.doc;

    let same_sibling_class = |a: Option<NodeId>, b: Option<NodeId>| match (a, b) {
        (Some(a), Some(b)) => doc.class_name(a) == doc.class_name(b),
        _ => false,
    };
    if same_sibling_class(doc.previous_element_sibling(other), doc.previous_element_sibling(base)) {
        return true;
    }
    if same_sibling_class(doc.next_element_sibling(other), doc.next_element_sibling(base)) {
        return true;
    }

    if doc.depth(other) == doc.depth(base) {
        while let (Some(other_parent), Some(base_parent)) =
            (doc.parent_element(other), doc.parent_element(base))
        {
            if other_parent == base_parent {
                break;
            }
            other = other_parent;
            base = base_parent;
        }
    }

    while doc.child_element_count(base) <= 1 {
        let (Some(base_child), Some(other_child)) =
            (doc.first_element_child(base), doc.first_element_child(other))
        else {
            return false;
        };
        if doc.child_element_count(other) > 1 {
            return false;
        }
        if doc.tag_name(base_child) != doc.tag_name(other_child) {
            return false;
        }
        base = base_child;
        other = other_child;
    }
    if doc.child_element_count(other) <= 1 {
        return false;
    }

    let (Some(header), Some(footer), Some(base_header), Some(base_footer)) = (
        doc.first_element_child(other),
        doc.last_element_child(other),
        doc.first_element_child(base),
        doc.last_element_child(base),
    ) else {
        return false;
    };
    if doc.tag_name(header) != doc.tag_name(base_header)
        || doc.tag_name(footer) != doc.tag_name(base_footer)
    {
        return false;
    }

    let header_class = doc.class_name(header);
    let base_header_class = doc.class_name(base_header);
    // Both sides of the footer comparison read the look-alike's footer class.
    let footer_class = doc.class_name(footer);
    let acceptable = if footer_class == base_header_class { 2 } else { 1 };
    let occurrences = |class: &str| {
        let tokens: Vec<&str> = class.split_ascii_whitespace().collect();
        doc.descendant_elements(base)
            .into_iter()
            .filter(|&e| tokens.iter().all(|t| doc.has_class(e, t)))
            .count()
    };

    if !header_class.is_empty() || !base_header_class.is_empty() {
        if header_class.is_empty() || base_header_class.is_empty() {
            return false;
        }
        if header_class == base_header_class && occurrences(&base_header_class) <= acceptable {
            return true;
        }
    }
    if !footer_class.is_empty() && occurrences(&footer_class) <= acceptable {
        return true;
    }

    let base_header_height = doc.client_size(base_header).height;
    let base_footer_height = doc.client_size(base_footer).height;
    let header_height = doc.client_size(header).height;
    let footer_height = doc.client_size(footer).height;
    if base_header_height == 0.0 || header_height == 0.0 {
        return false;
    }
    if base_footer_height == 0.0 || footer_height == 0.0 {
        return false;
    }
    base_header_height == header_height || base_footer_height == footer_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotated;
    use crate::geometry::GeometryCache;
    use crate::Options;

    const PROSE: &str = "Reader views keep the prose and drop everything that competes with it for attention, \
        which is why the scoring favours long runs of text that sit close to the element under test.";

    fn with_ctx<R>(html: &str, f: impl FnOnce(&Context<'_>) -> R) -> R {
        let doc = annotated::parse(html, None).unwrap();
        let geometry = GeometryCache::new();
        let options = Options::default();
        let ctx = Context::new(&doc, &geometry, &options);
        f(&ctx)
    }

    #[test]
    fn test_usable_text_nodes_follow_structure() {
        let html = r#"<html><body><div id="c">own text
            <p>child <em>inline</em> <u>skipped</u></p>
            <blockquote><p>quoted</p></blockquote>
            <div><p>para one</p><p>para two</p></div>
            <div><p>not all</p><span>paragraphs</span></div>
            <ul><li>list</li></ul>
            <p><a href="/x">link</a></p>
        </div></body></html>"#;
        with_ctx(html, |ctx| {
            let doc = ctx.doc;
            let c = doc.element_by_id("c").unwrap();
            let texts: Vec<String> = usable_text_nodes(doc, c)
                .into_iter()
                .map(|t| doc.text(t).unwrap().trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            assert_eq!(
                texts,
                vec![
                    "own text",
                    "child",
                    "inline",
                    "quoted",
                    "para one",
                    "para two",
                    "paragraphs",
                    "list"
                ]
            );
        });
    }

    #[test]
    fn test_raw_score_depth_multiplier() {
        let html = format!(
            r#"<html><body data-rect="0,0,800,2000"><div id="c" data-rect="0,0,800,600">
                <p data-rect="0,0,800,100">{PROSE}</p></div></body></html>"#
        );
        with_ctx(&html, |ctx| {
            let c = ctx.doc.element_by_id("c").unwrap();
            let candidate = CandidateElement::new(ctx, c);
            let length = PROSE.chars().count() as f64;
            let expected = (length * 0.9).powf(1.25);
            assert!((candidate.raw_score() - expected).abs() < 1e-6);
            assert_eq!(candidate.regex_bonus_multiplier(), 1.0);
            assert_eq!(candidate.language_score_multiplier(ctx), 1.0);
        });
    }

    #[test]
    fn test_invisible_parent_scores_zero() {
        let html = format!(
            r#"<html><body><div id="c" data-rect="0,0,800,600">
                <p data-rect="0,0,800,100" data-style="visibility: hidden">{PROSE}</p></div></body></html>"#
        );
        with_ctx(&html, |ctx| {
            let c = ctx.doc.element_by_id("c").unwrap();
            assert_eq!(CandidateElement::new(ctx, c).raw_score(), 0.0);
        });
    }

    #[test]
    fn test_regex_bonus_walks_ancestors() {
        let html = r#"<html><body><div class="entry-content"><div id="c" class="post-meta"></div></div></body></html>"#;
        with_ctx(html, |ctx| {
            let c = ctx.doc.element_by_id("c").unwrap();
            // "entry-content" +0.5, "post-meta" matches meta -0.5 but not the whole-token post.
            assert!((CandidateElement::new(ctx, c).regex_bonus_multiplier() - 1.0).abs() < 1e-9);
        });

        let html = r#"<html><body><div class="post"><div id="comments"></div></div></body></html>"#;
        with_ctx(html, |ctx| {
            let c = ctx.doc.element_by_id("comments").unwrap();
            assert!((CandidateElement::new(ctx, c).regex_bonus_multiplier() - 1.0).abs() < 1e-9);
        });
    }

    #[test]
    fn test_threshold_boundaries() {
        // 280 x 607 passes every limit exactly at the minimum width.
        let html = r#"<html><body>
            <div id="exact" data-rect="0,1300,280,607.15"></div>
            <div id="narrow" data-rect="0,0,279.9,700"></div>
            <div id="short" data-rect="0,0,600,294.9"></div>
            <div id="small" data-rect="0,0,300,566"></div>
            <div id="low" data-rect="0,1300.5,600,600"></div>
        </body></html>"#;
        with_ctx(html, |ctx| {
            let doc = ctx.doc;
            let viable = |id: &str| {
                CandidateElement::candidate_if_viable(ctx, doc.element_by_id(id).unwrap(), false)
                    .is_some()
            };
            assert!(viable("exact"));
            assert!(!viable("narrow"));
            assert!(!viable("short"));
            assert!(!viable("small"));
            assert!(!viable("low"));

            let small = doc.element_by_id("small").unwrap();
            assert!(CandidateElement::candidate_if_viable(ctx, small, true).is_some());
        });
    }

    #[test]
    fn test_adjusted_height_subtracts_navigation() {
        let html = r#"<html><body><div id="c" data-rect="0,0,600,500">
            <form data-rect="0,0,400,100"></form>
            <ul data-rect="0,100,500,60">
                <li data-rect="0,100,500,20" data-style="line-height: 20px">a</li>
                <li data-rect="0,120,500,20">b</li>
                <li data-rect="0,140,500,20">c</li>
            </ul>
            <ol data-rect="0,200,100,0"></ol>
        </div></body></html>"#;
        with_ctx(html, |ctx| {
            let c = ctx.doc.element_by_id("c").unwrap();
            assert_eq!(adjusted_height(ctx, c), 500.0 - 100.0 - 60.0);
        });
    }

    #[test]
    fn test_cjk_multiplier() {
        let html = r#"<html><body><div id="c"><p>这是一个很长的中文句子，用来测试语言乘数是否生效。</p></div></body></html>"#;
        with_ctx(html, |ctx| {
            let c = ctx.doc.element_by_id("c").unwrap();
            assert_eq!(CandidateElement::new(ctx, c).language_score_multiplier(ctx), 3.0);
        });
    }

    #[test]
    fn test_text_three_levels_down_is_not_usable() {
        let html = format!(
            r#"<html><body><div id="c" data-rect="0,0,800,600">
                <div data-rect="0,0,800,300"><div data-rect="0,0,800,300">
                <p data-rect="0,0,800,100">{PROSE}</p></div></div></div></body></html>"#
        );
        with_ctx(&html, |ctx| {
            let c = ctx.doc.element_by_id("c").unwrap();
            let candidate = CandidateElement::new(ctx, c);
            // Text three levels below the candidate is not usable at all.
            assert_eq!(candidate.raw_score(), 0.0);
            assert_eq!(candidate.score_density(ctx), 0.0);
        });
    }

    #[test]
    fn test_merging_never_duplicates() {
        let html = format!(
            r#"<html><body><div id="c" data-rect="0,0,800,600">
                <blockquote id="q" data-rect="0,0,800,300"><p data-rect="0,0,800,100">{PROSE}</p></blockquote>
                <p data-rect="0,300,800,100">{PROSE}</p></div></body></html>"#
        );
        with_ctx(&html, |ctx| {
            let doc = ctx.doc;
            let mut parent = CandidateElement::new(ctx, doc.element_by_id("c").unwrap());
            let quote = CandidateElement::new(ctx, doc.element_by_id("q").unwrap());
            assert_eq!(parent.text_nodes().len(), 2);

            parent.add_text_nodes_from_candidate(doc, &quote);
            parent.add_text_nodes_from_candidate(doc, &quote);
            assert_eq!(parent.text_nodes().len(), 2);
        });
    }

    #[test]
    fn test_horizontal_rule_density() {
        let html = r#"<html><body><div id="c" data-rect="0,0,600,900">
            <hr data-rect="0,100,600,2" data-client="600,0">
            <hr data-rect="0,400,600,2" data-client="600,0">
            <hr data-rect="0,700,300,2" data-client="300,0">
        </div></body></html>"#;
        with_ctx(html, |ctx| {
            let c = CandidateElement::new(ctx, ctx.doc.element_by_id("c").unwrap());
            // 900 / 2 = 450 between the full-width rules.
            assert!(!c.should_disqualify_due_to_horizontal_rule_density(ctx));
        });

        let html = r#"<html><body><div id="c" data-rect="0,0,600,700">
            <hr data-client="600,0"><hr data-client="600,0">
        </div></body></html>"#;
        with_ctx(html, |ctx| {
            let c = CandidateElement::new(ctx, ctx.doc.element_by_id("c").unwrap());
            assert!(c.should_disqualify_due_to_horizontal_rule_density(ctx));
        });
    }

    #[test]
    fn test_header_density() {
        let header = |top: u32| {
            format!(r#"<h2 data-rect="0,{top},600,30"><a href="/x">Story</a></h2>"#)
        };
        let html = format!(
            r#"<html><body><div id="c" data-rect="0,0,600,1000">{}{}{}{}</div></body></html>"#,
            header(200),
            header(400),
            header(600),
            header(20),
        );
        with_ctx(&html, |ctx| {
            let c = CandidateElement::new(ctx, ctx.doc.element_by_id("c").unwrap());
            // Three headers in the middle band: 1000 / 3 < 400.
            assert!(c.should_disqualify_due_to_header_density(ctx));
        });
    }
}
