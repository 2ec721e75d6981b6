//! Article cleaning.
//!
//! The cleaner copies the chosen subtree into an output document and prunes
//! the copy while walking the original in step with it, so every decision
//! can consult the original's layout. Three passes run in order:
//!
//! 1. A pre-order walk that drops obviously unwanted nodes, rewrites markup
//!    (content-free `div`s become `p`, script anchors become `span`s), marks
//!    floats and images, and queues containers for a quality check.
//! 2. A bottom-up pass over the queued containers using content heuristics
//!    such as link density, image and list item counts.
//! 3. A check of marked floats that lost what made them worth keeping.

use std::collections::HashMap;

use super::tags::TagSet;
use super::Context;
use crate::dom::{Document, NodeId};
use crate::layout::{FontStyle, FONT_WEIGHT_NORMAL};
use crate::link_density::calculate_link_density;
use crate::patterns::{
    ATTRIBUTES_TO_REMOVE, MEDIAWIKI_GENERATOR, NEGATIVE_CLASS, PLUGINS_TO_KEEP, POSITIVE_CLASS,
};
use crate::text::{comma_count_is_less_than, levenshtein, non_whitespace_len};

const MAXIMUM_FLOATING_CONTENT_RATIO: f64 = 0.8;
const ANCHOR_IMAGE_MINIMUM_SIZE: f64 = 100.0;
const MAX_INPUT_TO_PARAGRAPH_RATIO: f64 = 0.33;
const MAX_POSITIVE_WEIGHT_LINK_DENSITY: f64 = 0.5;
const MAX_STANDARD_LINK_DENSITY: f64 = 0.2;
const MINIMUM_TEXT_LENGTH: usize = 25;
const MINIMUM_AVERAGE_IMAGE_AREA: f64 = 200.0 * 200.0;
const MINIMUM_COMMA_COUNT: usize = 10;
const TABLE_TEXT_RETENTION_RATIO: f64 = 0.5;

/// Classes the cleaner itself puts on output elements.
pub const MARKER_CLASSES: [&str; 11] = [
    "float",
    "full-width",
    "left",
    "right",
    "reader-image-tiny",
    "reader-image-large",
    "converted-anchor",
    "converted-image-anchor",
    "leading-image",
    "credit",
    "caption",
];

/// Style runs inherited from an ancestor that already set them.
#[derive(Debug, Clone, Copy, Default)]
struct Runs {
    in_float: bool,
    in_table: bool,
    in_font_style: bool,
    in_font_weight: bool,
}

/// Links between the original subtree and its copy.
#[derive(Debug, Default)]
struct Correspondence {
    clone_of: HashMap<NodeId, NodeId>,
    original_of: HashMap<NodeId, NodeId>,
}

impl Correspondence {
    fn build(doc: &Document, original: NodeId, out: &Document, clone: NodeId) -> Self {
        let mut links = Self::default();
        let pairs = std::iter::once((original, clone))
            .chain(doc.descendants(original).into_iter().zip(out.descendants(clone)));
        for (from, to) in pairs {
            if doc.is_element(from) {
                links.clone_of.insert(from, to);
                links.original_of.insert(to, from);
            }
        }
        links
    }

    fn relink(&mut self, original: NodeId, clone: NodeId) {
        self.clone_of.insert(original, clone);
        self.original_of.insert(clone, original);
    }
}

/// Prunes copies of article subtrees.
pub struct TreeCleaner<'a> {
    ctx: Context<'a>,
    title: &'a str,
    title_element: Option<NodeId>,
    is_media_wiki: bool,
}

impl<'a> TreeCleaner<'a> {
    /// `title` and `title_element` are the detected article title; the
    /// title element and headers repeating the title are dropped from the
    /// output.
    #[must_use]
    pub fn new(ctx: Context<'a>, title: &'a str, title_element: Option<NodeId>) -> Self {
        let is_media_wiki = ctx.doc.generator().is_some_and(|g| MEDIAWIKI_GENERATOR.is_match(&g));
        Self { ctx, title, title_element, is_media_wiki }
    }

    /// Clean a copy of `original` into a new document.
    ///
    /// The copy is attached under the new document's root.
    #[must_use]
    pub fn clean(&self, original: NodeId, allowed_to_return_none: bool) -> Option<(Document, NodeId)> {
        let mut out = Document::new(self.ctx.doc.url().cloned());
        let cleaned = self.clean_into(original, &mut out, allowed_to_return_none)?;
        let root = out.root();
        out.append_child(root, cleaned);
        Some((out, cleaned))
    }

    /// Clean a copy of `original` into `out`, returning the detached copy.
    ///
    /// With `allowed_to_return_none`, a copy left without text (or whose
    /// root itself is pruned) yields `None`.
    pub fn clean_into(
        &self,
        original: NodeId,
        out: &mut Document,
        allowed_to_return_none: bool,
    ) -> Option<NodeId> {
        let doc = self.ctx.doc;
        let root = out.import_subtree(doc, original);
        let mut links = Correspondence::build(doc, original, out, root);

        let (queued, pruned) = self.walk(original, root, out, &mut links, allowed_to_return_none)?;

        let mut pruned_containers = 0;
        for &clone in queued.iter().rev() {
            if out.parent(clone).is_none() {
                continue;
            }
            let original = links.original_of.get(&clone).copied();
            if self.should_prune_element(out, clone, original, &links) {
                out.remove(clone);
                pruned_containers += 1;
            }
        }

        let pruned_floats = self.prune_floats(out, root, &links);

        tracing::debug!(
            pruned,
            pruned_containers,
            pruned_floats,
            "cleaned article subtree"
        );

        if allowed_to_return_none && non_whitespace_len(&out.inner_text(root)) == 0 {
            return None;
        }
        Some(root)
    }

    /// First pass. Returns the queued containers and the number of nodes
    /// dropped, or `None` when the root itself is dropped and that is allowed.
    fn walk(
        &self,
        original_root: NodeId,
        root: NodeId,
        out: &mut Document,
        links: &mut Correspondence,
        allowed_to_return_none: bool,
    ) -> Option<(Vec<NodeId>, usize)> {
        let doc = self.ctx.doc;
        let article_rect = self.ctx.rect(original_root);
        let most_of_article_is_float = self.most_of_article_is_float(original_root);

        let mut queued = Vec::new();
        let mut pruned = 0;
        let mut stack = vec![(original_root, Runs::default())];
        while let Some((original, mut runs)) = stack.pop() {
            let Some(&clone) = links.clone_of.get(&original) else {
                continue;
            };
            let keep = self.visit(
                original,
                clone,
                original_root,
                article_rect.width,
                most_of_article_is_float,
                &mut runs,
                out,
                links,
                &mut queued,
            );
            if keep {
                let children: Vec<NodeId> = doc.element_children(original).collect();
                stack.extend(children.into_iter().rev().map(|child| (child, runs)));
                continue;
            }

            let clone = links.clone_of.get(&original).copied().unwrap_or(clone);
            if out.parent_element(clone).is_some() {
                out.remove(clone);
                pruned += 1;
            } else if clone == root && allowed_to_return_none {
                return None;
            }
        }
        Some((queued, pruned))
    }

    fn most_of_article_is_float(&self, article: NodeId) -> bool {
        let doc = self.ctx.doc;
        let article_area = self.ctx.rect(article).area();
        if article_area <= 0.0 {
            return false;
        }
        let floating_area: f64 = doc
            .element_children(article)
            .filter(|&child| doc.style(child).is_floating())
            .map(|child| self.ctx.rect(child).area())
            .sum();
        floating_area / article_area > MAXIMUM_FLOATING_CONTENT_RATIO
    }

    /// Handle one node of the first pass. Returns `false` when it is pruned.
    #[allow(clippy::too_many_arguments, clippy::too_many_lines)]
    fn visit(
        &self,
        original: NodeId,
        mut clone: NodeId,
        original_root: NodeId,
        article_width: f64,
        most_of_article_is_float: bool,
        runs: &mut Runs,
        out: &mut Document,
        links: &mut Correspondence,
        queued: &mut Vec<NodeId>,
    ) -> bool {
        let doc = self.ctx.doc;
        let opts = self.ctx.options;
        let mut tag = out.tag_name(clone);

        if TagSet::AlwaysPruned.contains(&tag) || self.title_element == Some(original) {
            return false;
        }
        if (tag == "h1" || tag == "h2") && self.repeats_title(original, original_root) {
            return false;
        }
        if self.is_media_wiki && doc.class_name(original) == "editsection" {
            return false;
        }

        let style = doc.style(original);
        let has_parent = out.parent_element(clone).is_some();

        if tag == "div" && has_parent {
            let in_float = runs.in_float || style.is_floating();
            let has_content = doc
                .descendant_elements(original)
                .into_iter()
                .any(|d| TagSet::DivContent.contains(&doc.tag_name(d)));
            if !in_float && !has_content {
                clone = replace_with(out, clone, "p");
                links.relink(original, clone);
                tag = "p".to_string();
            }
        }

        if has_parent && TagSet::PruneCandidate.contains(&tag) {
            queued.push(clone);
        }

        if !style.is_shown() {
            return false;
        }
        let mut float_root = false;
        if original != original_root
            && tag != "img"
            && !runs.in_float
            && style.is_floating()
            && !most_of_article_is_float
            && (self.ctx.rect(original).height >= opts.float_min_height
                || doc.child_element_count(original) > 1)
        {
            runs.in_float = true;
            float_root = true;
        }

        strip_attributes(out, clone);

        if !runs.in_font_style && style.font_style != FontStyle::Normal {
            if !TagSet::AffectsFontStyle.contains(&tag) {
                out.push_style(clone, "font-style", style.font_style.as_str());
            }
            runs.in_font_style = true;
        }
        if !runs.in_font_weight && style.font_weight != FONT_WEIGHT_NORMAL {
            if !TagSet::AffectsFontWeight.contains(&tag) {
                out.push_style(clone, "font-weight", &style.font_weight.to_string());
            }
            runs.in_font_weight = true;
        }

        if runs.in_float {
            let rect = self.ctx.rect(original);
            if float_root {
                let class_name = if rect.width == article_width {
                    "float full-width".to_string()
                } else {
                    format!("float {}", style.float.as_str())
                };
                out.set_attr(clone, "class", &class_name);
            }
            match &style.declared_width {
                Some(width) => out.push_style(clone, "width", width),
                None if float_root => out.push_style(clone, "width", &format!("{}px", rect.width)),
                None => {}
            }
        }

        match tag.as_str() {
            "table" => runs.in_table = true,
            "img" => {
                for name in ["border", "hspace", "vspace", "align"] {
                    out.remove_attr(clone, name);
                }
                if runs.in_float {
                    out.push_style(clone, "float", style.float.as_str());
                } else {
                    let rect = self.ctx.rect(original);
                    if rect.width < opts.image_size_tiny && rect.height < opts.image_size_tiny {
                        out.set_attr(clone, "class", "reader-image-tiny");
                    } else if rect.width / article_width > opts.image_width_to_parent_ratio {
                        out.set_attr(clone, "class", "reader-image-large");
                    }
                }
            }
            "font" => {
                for name in ["size", "face", "color"] {
                    out.remove_attr(clone, name);
                }
            }
            "a" if has_parent => {
                let href = out.attr(clone, "href").unwrap_or_default();
                if href.starts_with('#') || href.starts_with("javascript:") {
                    if !runs.in_table && is_lone_textless_anchor(out, clone) {
                        return false;
                    }
                    let class_name = converted_anchor_class(out, clone);
                    clone = replace_with(out, clone, "span");
                    out.set_attr(clone, "class", class_name);
                    links.relink(original, clone);
                }
            }
            _ => {}
        }
        true
    }

    /// An `h1`/`h2` near the article top that restates the title.
    fn repeats_title(&self, header: NodeId, article: NodeId) -> bool {
        let opts = self.ctx.options;
        let distance = self.ctx.rect(header).top - self.ctx.rect(article).top;
        if distance >= opts.header_min_distance_from_article_top {
            return false;
        }
        let header_text = self.ctx.doc.inner_text(header);
        let max_distance = header_text.chars().count() as f64 * opts.header_levenshtein_ratio;
        levenshtein(self.title, &header_text) as f64 <= max_distance
    }

    /// Content heuristics for a queued container of the output.
    fn should_prune_element(
        &self,
        out: &Document,
        element: NodeId,
        original: Option<NodeId>,
        links: &Correspondence,
    ) -> bool {
        let doc = self.ctx.doc;
        let Some(parent) = out.parent_element(element) else {
            return false;
        };
        let tag = out.tag_name(element);

        if !matches!(tag.as_str(), "object" | "embed" | "canvas") {
            let has_content = out.children(element).into_iter().any(|child| {
                out.is_element(child) || out.text(child).is_some_and(|t| !t.trim().is_empty())
            });
            if !has_content {
                return true;
            }
        }
        if tag == "canvas" {
            return out.tag_name(parent) == "cufon";
        }

        let class_id_weight = original.map_or(0, |o| class_id_weight(doc, o));
        if class_id_weight < 0 {
            return true;
        }

        if tag == "ul" {
            return original.is_some_and(|o| {
                doc.first_by_tag(o, "iframe").is_some() && doc.first_by_tag(o, "script").is_some()
            });
        }
        if tag == "object" {
            let embeds_known_plugin = out
                .elements_by_tags(element, &["embed"])
                .into_iter()
                .filter_map(|embed| out.attr(embed, "src"))
                .next()
                .is_some_and(|src| PLUGINS_TO_KEEP.is_match(&src));
            let data_is_known_plugin =
                out.attr(element, "data").is_some_and(|data| PLUGINS_TO_KEEP.is_match(&data));
            return !(embeds_known_plugin || data_is_known_plugin);
        }

        if out.child_element_count(element) == 1 {
            if let Some(child) = out.first_element_child(element) {
                if out.tag_name(child) == "a" {
                    return false;
                }
                if out.tag_name(child) == "span"
                    && out.class_name(child) == "converted-anchor"
                    && out.ancestors(child).any(|a| out.tag_name(a) == "table")
                {
                    return false;
                }
            }
        }

        let images = out.elements_by_tags(element, &["img"]);
        let image_count = images.len();
        if image_count > 0 {
            let n = image_count as f64;
            let average_area: f64 = images
                .iter()
                .filter_map(|image| links.original_of.get(image).copied())
                .filter(|&original| doc.is_visible(original))
                .map(|original| {
                    let rect = self.ctx.rect(original);
                    (rect.width / n) * (rect.height / n)
                })
                .sum();
            if average_area > MINIMUM_AVERAGE_IMAGE_AREA {
                return false;
            }
        }

        let text = out.text_content(element);
        if !comma_count_is_less_than(&text, MINIMUM_COMMA_COUNT) {
            return false;
        }

        let paragraphs = out.elements_by_tags(element, &["p"]).len()
            + out.elements_by_tags(element, &["br"]).len() / 2;
        if image_count > paragraphs {
            return true;
        }
        if out.elements_by_tags(element, &["li"]).len() > paragraphs {
            return true;
        }
        let inputs = out.elements_by_tags(element, &["input"]).len();
        if inputs as f64 / paragraphs as f64 > MAX_INPUT_TO_PARAGRAPH_RATIO {
            return true;
        }
        if text.chars().count() < MINIMUM_TEXT_LENGTH && image_count != 1 {
            return true;
        }
        if out.first_by_tag(element, "embed").is_some() {
            return true;
        }

        let link_density = calculate_link_density(out, element);
        let max_density = if class_id_weight >= 1 {
            MAX_POSITIVE_WEIGHT_LINK_DENSITY
        } else {
            MAX_STANDARD_LINK_DENSITY
        };
        if link_density > max_density {
            return true;
        }

        if tag == "table" {
            if let Some(original) = original {
                let kept = non_whitespace_len(&out.inner_text(element)) as f64;
                let before = non_whitespace_len(&doc.inner_text(original)) as f64;
                if kept <= before * TABLE_TEXT_RETENTION_RATIO {
                    return true;
                }
            }
        }
        false
    }

    /// Third pass. Returns the number of floats removed.
    fn prune_floats(&self, out: &mut Document, root: NodeId, links: &Correspondence) -> usize {
        let doc = self.ctx.doc;
        let floats: Vec<NodeId> = out
            .descendant_elements(root)
            .into_iter()
            .filter(|&e| out.has_class(e, "float"))
            .collect();

        let mut removed = 0;
        for float in floats {
            if out.parent(float).is_none() {
                continue;
            }
            let descendants = out.descendant_elements(float);
            let anchors = descendants
                .iter()
                .filter(|&&d| {
                    out.tag_name(d) == "a"
                        || (out.tag_name(d) == "span" && out.has_class(d, "converted-image-anchor"))
                })
                .count();
            let converted = descendants
                .iter()
                .filter(|&&d| out.tag_name(d) == "span" && out.has_class(d, "converted-anchor"))
                .count();
            let mut prune = converted > anchors;

            if let (false, Some(&original)) = (prune, links.original_of.get(&float)) {
                let plugins_now = out.elements_by_tags(float, &["embed", "object"]).len();
                let plugins_before = doc.elements_by_tags(original, &["embed", "object"]).len();
                prune = plugins_now == 0 && plugins_before > 0;

                if !prune {
                    let visible_images = doc
                        .elements_by_tags(original, &["img"])
                        .into_iter()
                        .filter(|&image| doc.is_visible(image))
                        .take(2)
                        .count();
                    prune = visible_images == 1 && out.first_by_tag(float, "img").is_none();
                }
            }

            if prune {
                out.remove(float);
                removed += 1;
            }
        }
        removed
    }
}

/// Replace `clone` by a new `tag` element holding its children and layout.
fn replace_with(out: &mut Document, clone: NodeId, tag: &str) -> NodeId {
    let replacement = out.create_element(tag);
    if let Some(layout) = out.layout(clone).cloned() {
        out.set_layout(replacement, layout);
    }
    out.move_children(clone, replacement);
    out.replace(clone, replacement);
    replacement
}

/// Drop event handlers, ids, classes and styles. Classes made only of the
/// cleaner's own markers stay, so cleaning cleaned markup changes nothing.
fn strip_attributes(out: &mut Document, clone: NodeId) {
    out.retain_attrs(clone, |name, value| {
        if name == "class" && is_marker_class(value) {
            return true;
        }
        !ATTRIBUTES_TO_REMOVE.is_match(name)
    });
}

fn is_marker_class(value: &str) -> bool {
    let mut tokens = value.split_ascii_whitespace().peekable();
    tokens.peek().is_some() && tokens.all(|token| MARKER_CLASSES.contains(&token))
}

/// A script anchor that is the only element of a parent without text.
fn is_lone_textless_anchor(out: &Document, anchor: NodeId) -> bool {
    let Some(parent) = out.parent_element(anchor) else {
        return false;
    };
    out.child_element_count(anchor) == 0
        && out.child_element_count(parent) == 1
        && !out.children(parent).into_iter().any(|c| out.is_text(c))
}

fn converted_anchor_class(out: &Document, anchor: NodeId) -> &'static str {
    if out.child_element_count(anchor) == 1 {
        if let Some(image) = out.first_element_child(anchor).filter(|&c| out.tag_name(c) == "img") {
            let rect = out.bounding_rect(image);
            if rect.width > ANCHOR_IMAGE_MINIMUM_SIZE && rect.height > ANCHOR_IMAGE_MINIMUM_SIZE {
                return "converted-image-anchor";
            }
        }
    }
    "converted-anchor"
}

/// +1 per positive and -1 per negative match of class and id.
fn class_id_weight(doc: &Document, element: NodeId) -> i32 {
    let mut weight = 0;
    for value in [doc.class_name(element), doc.id_attr(element)] {
        if POSITIVE_CLASS.is_match(&value) {
            weight += 1;
        }
        if NEGATIVE_CLASS.is_match(&value) {
            weight -= 1;
        }
    }
    weight
}
