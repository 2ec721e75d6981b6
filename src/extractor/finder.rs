//! The article finder session.
//!
//! An `ArticleFinder` answers every question about one document: where the
//! article is, what it is called, what cleaned markup represents it, and
//! where its next page lives. Each answer is computed on first use and
//! remembered; a forced article search starts over.

use url::Url;

use super::candidate::{usable_text_nodes, CandidateElement, BASE_FONT_SIZE};
use super::cleaner::TreeCleaner;
use super::collector::{find_candidate_elements, should_ignore_element};
use super::pagination::PaginationScorer;
use super::route::{find_suggested_candidate, route_to, RouteStep};
use super::state::{Cached, SearchState};
use super::tags::TagSet;
use super::title::{
    build_leading_image, content_text_style, find_leading_image, find_title_element, TitleAnchor,
};
use super::Context;
use crate::dom::{Document, NodeId};
use crate::geometry::GeometryCache;
use crate::layout::{ComputedStyle, Direction, Rect};
use crate::patterns::{MEDIAWIKI_GENERATOR, WORDPRESS_GENERATOR};
use crate::result::{ExtractedArticle, ReadingListInfo};
use crate::text::{collapse_whitespace, truncate_chars};
use crate::url_utils::date_prefix;
use crate::Options;

const EXTRA_ARTICLE_SCOPE_COUNT: usize = 3;
const READER_TITLE_MAX_LENGTH: usize = 140;
const READER_PREVIEW_TEXT_MAX_LENGTH: usize = 140;

#[derive(Debug, Clone)]
struct ArticleTitle {
    text: String,
    element: Option<NodeId>,
}

/// A reader session over one rendered document.
pub struct ArticleFinder<'a> {
    doc: &'a Document,
    options: Options,
    geometry: GeometryCache,
    article: SearchState<CandidateElement>,
    extra_article: SearchState<CandidateElement>,
    leading_image: SearchState<NodeId>,
    title: Cached<ArticleTitle>,
    content_text_style: Cached<ComputedStyle>,
    article_is_ltr: Cached<bool>,
    adoptable_article: SearchState<(Document, NodeId)>,
    article_text_content: Option<String>,
    next_page_url: SearchState<Url>,
    page_number: u64,
    date_prefix: Option<String>,
    suggested_route: Option<Vec<RouteStep>>,
}

impl<'a> ArticleFinder<'a> {
    #[must_use]
    pub fn new(doc: &'a Document, options: Options) -> Self {
        Self {
            doc,
            options,
            geometry: GeometryCache::new(),
            article: SearchState::Unsearched,
            extra_article: SearchState::Unsearched,
            leading_image: SearchState::Unsearched,
            title: Cached::default(),
            content_text_style: Cached::default(),
            article_is_ltr: Cached::default(),
            adoptable_article: SearchState::Unsearched,
            article_text_content: None,
            next_page_url: SearchState::Unsearched,
            page_number: 1,
            date_prefix: None,
            suggested_route: None,
        }
    }

    /// Try `route` (from [`ArticleFinder::route_to_article_node`] on an
    /// earlier visit) before scanning the document.
    #[must_use]
    pub fn with_suggested_route(mut self, route: Vec<RouteStep>) -> Self {
        self.suggested_route = Some(route);
        self
    }

    /// Which page of a multi-page article this document is. Defaults to 1.
    pub fn set_page_number(&mut self, page_number: u64) {
        self.page_number = page_number;
        self.next_page_url.reset();
    }

    #[must_use]
    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    fn ctx(&self) -> Context<'_> {
        Context::new(self.doc, &self.geometry, &self.options)
    }

    fn reset(&mut self) {
        self.geometry.clear();
        self.extra_article.reset();
        self.leading_image.reset();
        self.title.clear();
        self.content_text_style.clear();
        self.article_is_ltr.clear();
        self.adoptable_article.reset();
        self.article_text_content = None;
        self.next_page_url.reset();
    }

    // === Article ===

    /// The article element.
    ///
    /// `force` searches again from scratch and skips the checks that reject
    /// index pages, so some element is returned whenever any candidate exists.
    pub fn article_node(&mut self, force: bool) -> Option<NodeId> {
        if force || !self.article.is_searched() {
            if force {
                self.reset();
            }
            let found = self.find_article(force);
            tracing::debug!(
                article = ?found.as_ref().map(CandidateElement::element),
                force,
                "article search finished"
            );
            self.article = SearchState::Searched(found);
        }
        self.article.found().map(CandidateElement::element)
    }

    /// Whether the document has an article worth showing in reader mode.
    pub fn is_reader_mode_available(&mut self) -> bool {
        self.article_node(false).is_some()
    }

    fn find_article(&self, force: bool) -> Option<CandidateElement> {
        let ctx = self.ctx();
        let doc = self.doc;

        let suggested = self
            .suggested_route
            .as_deref()
            .and_then(|route| find_suggested_candidate(&ctx, route));
        let candidates = find_candidate_elements(&ctx);
        if candidates.is_empty() {
            tracing::debug!(from_route = suggested.is_some(), "no candidates in document");
            return suggested;
        }

        let success_score = self.options.route_success_score;
        if let (Some(route_candidate), Some(threshold)) = (&suggested, success_score) {
            if route_candidate.basic_score() >= threshold {
                tracing::debug!("suggested route is good enough");
                return suggested;
            }
        }

        if let Some(article_tag) = article_tag_candidate(&ctx) {
            tracing::debug!(element = ?article_tag.element(), "using the only article element");
            return Some(article_tag);
        }

        let mut best_index = 0;
        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.basic_score() > candidates[best_index].basic_score() {
                best_index = i;
            }
        }
        let winner = candidates[best_index].element();
        if doc.tag_name(winner) == "blockquote" {
            let parent = doc.parent(winner);
            if let Some(i) = candidates.iter().position(|c| Some(c.element()) == parent) {
                best_index = i;
            }
        }
        let mut best = candidates[best_index].clone();

        if let (Some(_), Some(threshold)) = (&suggested, success_score) {
            if best.final_score(&ctx) < threshold {
                return suggested;
            }
        }

        if best.should_disqualify_due_to_score_density(&ctx) {
            for list in doc.elements_by_tags(best.element(), &["ul"]) {
                let has_prohibited = doc
                    .descendant_elements(list)
                    .into_iter()
                    .any(|d| TagSet::ProhibitedInProseList.contains(&doc.tag_name(d)));
                if has_prohibited {
                    continue;
                }
                let text_nodes = usable_text_nodes(doc, list);
                if !text_nodes.is_empty() {
                    best.add_text_nodes(doc, &text_nodes);
                }
            }
            if !force && best.should_disqualify_due_to_score_density(&ctx) {
                tracing::debug!(element = ?best.element(), "disqualified: score density");
                return None;
            }
        }

        if !force {
            if best.should_disqualify_due_to_horizontal_rule_density(&ctx) {
                tracing::debug!(element = ?best.element(), "disqualified: horizontal rule density");
                return None;
            }
            if best.should_disqualify_due_to_header_density(&ctx) {
                tracing::debug!(element = ?best.element(), "disqualified: header density");
                return None;
            }
            if best.should_disqualify_due_to_similar_elements(&ctx, &candidates) {
                tracing::debug!(element = ?best.element(), "disqualified: similar elements");
                return None;
            }
        }
        Some(best)
    }

    // === Extra article ===

    /// A block next to the article that continues it, if any.
    pub fn extra_article_node(&mut self) -> Option<NodeId> {
        self.article_node(false);
        if !self.extra_article.is_searched() {
            let style = self.content_text_style();
            let found = match (self.article.found(), style) {
                (Some(article), Some(style)) => self.find_extra_article(article, &style),
                _ => None,
            };
            tracing::debug!(
                extra = ?found.as_ref().map(CandidateElement::element),
                prepended = found.as_ref().is_some_and(CandidateElement::is_prepended),
                "extra article search finished"
            );
            self.extra_article = SearchState::Searched(found);
        }
        self.extra_article.found().map(CandidateElement::element)
    }

    fn find_extra_article(
        &self,
        article: &CandidateElement,
        content_style: &ComputedStyle,
    ) -> Option<CandidateElement> {
        let ctx = self.ctx();
        let doc = self.doc;
        let article_width = ctx.rect(article.element()).width;

        let mut scope = Some(article.element());
        for _ in 0..EXTRA_ARTICLE_SCOPE_COUNT {
            let Some(current) = scope else {
                break;
            };
            scope = doc.parent(current);

            let mut candidates = extra_article_candidates(&ctx, article, current);
            candidates.sort_by(|a, b| {
                b.basic_score()
                    .total_cmp(&a.basic_score())
                    .then_with(|| b.depth(doc).cmp(&a.depth(doc)))
            });

            for candidate in candidates {
                if candidate.basic_score() == 0.0 {
                    break;
                }
                if candidate.should_disqualify_due_to_score_density(&ctx)
                    || candidate.should_disqualify_due_to_horizontal_rule_density(&ctx)
                    || candidate.should_disqualify_due_to_header_density(&ctx)
                {
                    continue;
                }
                let rect = ctx.rect(candidate.element());
                if rect.height < self.options.prepended_min_height && rect.width != article_width {
                    continue;
                }
                let Some(style) = content_text_style(doc, candidate.element()) else {
                    continue;
                };
                if style.font_family != content_style.font_family
                    || style.font_size != content_style.font_size
                {
                    continue;
                }
                return Some(candidate);
            }
        }
        None
    }

    fn extra_article_is_prepended(&self) -> bool {
        self.extra_article.found().is_some_and(CandidateElement::is_prepended)
    }

    // === Title and leading image ===

    /// The rectangle the title and leading image are measured against: the
    /// prepended extra article when there is one, else the article.
    fn title_anchor_rect(&mut self, article: NodeId) -> Rect {
        let extra = self.extra_article_node();
        let anchor = match extra {
            Some(extra) if self.extra_article_is_prepended() => extra,
            _ => article,
        };
        self.ctx().rect(anchor)
    }

    /// A large image just above the article.
    pub fn leading_image_node(&mut self) -> Option<NodeId> {
        if !self.leading_image.is_searched() {
            let found = match self.article_node(false) {
                Some(article) => {
                    let width = self.title_anchor_rect(article).width;
                    let extra = self.extra_article_node();
                    find_leading_image(&self.ctx(), article, extra, width)
                }
                None => None,
            };
            self.leading_image = SearchState::Searched(found);
        }
        self.leading_image.found().copied()
    }

    /// The leading image as a standalone `div.leading-image` block.
    pub fn adoptable_leading_image(&mut self) -> Option<(Document, NodeId)> {
        let article = self.article_node(false)?;
        let image = self.leading_image_node()?;
        let mut out = Document::new(self.doc.url().cloned());
        let block = build_leading_image(&self.ctx(), image, article, &mut out)?;
        let root = out.root();
        out.append_child(root, block);
        Some((out, block))
    }

    /// The article's title, falling back to the document title.
    pub fn article_title(&mut self) -> String {
        if let Some(title) = self.title.get() {
            return title.text.clone();
        }

        let found = match self.article_node(false) {
            Some(article) => {
                let rect = self.title_anchor_rect(article);
                let adjusted_top = match self.leading_image_node() {
                    Some(image) => self.ctx().rect(image).top,
                    None => rect.top,
                };
                let content_font_size =
                    self.content_text_style().map_or(BASE_FONT_SIZE, |s| s.font_size);
                find_title_element(
                    &self.ctx(),
                    article,
                    TitleAnchor { rect, adjusted_top },
                    content_font_size,
                )
            }
            None => None,
        };

        let element = found.as_ref().map(|t| t.element);
        let mut text = found.map(|t| t.text.trim().to_string()).unwrap_or_default();
        if text.is_empty() {
            text = self.doc.title();
        }
        self.title.set(ArticleTitle { text, element }).text.clone()
    }

    /// The header element the title was taken from.
    pub fn article_title_element(&mut self) -> Option<NodeId> {
        self.article_title();
        self.title.get().and_then(|t| t.element)
    }

    /// The style most of the article's text is set in.
    pub fn content_text_style(&mut self) -> Option<ComputedStyle> {
        let article = self.article_node(false)?;
        if self.content_text_style.get().is_none() {
            let style = content_text_style(self.doc, article)
                .unwrap_or_else(|| self.doc.style(article).clone());
            self.content_text_style.set(style);
        }
        self.content_text_style.get().cloned()
    }

    /// Whether the article reads left to right. True without an article.
    pub fn article_is_ltr(&mut self) -> bool {
        if let Some(&ltr) = self.article_is_ltr.get() {
            return ltr;
        }
        let ltr = self
            .article_node(false)
            .is_none_or(|article| self.doc.style(article).direction == Direction::Ltr);
        *self.article_is_ltr.set(ltr)
    }

    // === Cleaned output ===

    /// A cleaned copy of the article, with the extra article merged in and
    /// the leading image on top.
    ///
    /// Built once; every call returns a fresh copy. `force` repeats the
    /// article search first.
    pub fn adoptable_article(&mut self, force: bool) -> Option<(Document, NodeId)> {
        self.ensure_adoptable_article(force);
        self.adoptable_article.found().map(|(doc, root)| (doc.clone(), *root))
    }

    /// Markup of [`ArticleFinder::adoptable_article`].
    pub fn adoptable_article_html(&mut self, force: bool) -> Option<String> {
        self.ensure_adoptable_article(force);
        self.adoptable_article.found().map(|(doc, root)| doc.outer_html(*root))
    }

    /// Rendered text of the cleaned article without the leading image.
    pub fn article_text_content(&mut self) -> Option<String> {
        self.ensure_adoptable_article(false);
        self.article_text_content.clone()
    }

    fn ensure_adoptable_article(&mut self, force: bool) {
        if force {
            self.article_node(true);
        }
        if !self.adoptable_article.is_searched() {
            let built = self.build_adoptable_article();
            self.adoptable_article = SearchState::Searched(built);
        }
    }

    fn build_adoptable_article(&mut self) -> Option<(Document, NodeId)> {
        let article = self.article_node(false)?;
        let title = self.article_title();
        let title_element = self.article_title_element();
        let extra = self.extra_article_node();
        let prepend_extra = self.extra_article_is_prepended();
        let leading_image = self.leading_image_node();

        let ctx = self.ctx();
        let cleaner = TreeCleaner::new(ctx, &title, title_element);
        let (mut out, root) = cleaner.clean(article, false)?;

        if let Some(extra) = extra {
            if let Some(cleaned) = cleaner.clean_into(extra, &mut out, true) {
                if prepend_extra {
                    let first = out.children(root).first().copied();
                    out.insert_before(root, cleaned, first);
                } else {
                    out.append_child(root, cleaned);
                }
            }
        }
        let text_content = out.inner_text(root);

        if let Some(image) = leading_image {
            if let Some(block) = build_leading_image(&ctx, image, article, &mut out) {
                let first = out.children(root).first().copied();
                out.insert_before(root, block, first);
            }
        }

        tracing::debug!(
            article = ?article,
            extra = ?extra,
            leading_image = ?leading_image,
            "built adoptable article"
        );
        self.article_text_content = Some(text_content);
        Some((out, root))
    }

    // === Pagination ===

    /// URL of the article's next page.
    pub fn next_page_url(&mut self) -> Option<Url> {
        if !self.next_page_url.is_searched() {
            let found = self.find_next_page_url();
            self.next_page_url = SearchState::Searched(found);
        }
        self.next_page_url.found().cloned()
    }

    fn find_next_page_url(&mut self) -> Option<Url> {
        let article = self.article_node(false)?;
        if self.is_media_wiki_page() {
            return None;
        }
        let doc = self.doc;
        let reference = doc.url()?;
        if self.page_number <= 2 && self.date_prefix.is_none() {
            self.date_prefix = date_prefix(reference.path());
        }

        let scorer = PaginationScorer::new(
            self.ctx(),
            article,
            reference,
            self.page_number,
            self.date_prefix.as_deref(),
            self.is_word_press_site(),
        );
        scorer.next_page_url()
    }

    // === Route ===

    /// Structural route to the article, for [`ArticleFinder::with_suggested_route`].
    pub fn route_to_article_node(&mut self) -> Option<Vec<RouteStep>> {
        let article = self.article_node(false)?;
        Some(route_to(self.doc, article))
    }

    // === Document facts ===

    #[must_use]
    pub fn is_media_wiki_page(&self) -> bool {
        self.doc.generator().is_some_and(|g| MEDIAWIKI_GENERATOR.is_match(&g))
    }

    #[must_use]
    pub fn is_word_press_site(&self) -> bool {
        self.doc.generator().is_some_and(|g| WORDPRESS_GENERATOR.is_match(&g))
    }

    // === Summaries ===

    /// Title and preview text for a reading list entry.
    pub fn reading_list_item_information(&mut self) -> ReadingListInfo {
        self.ensure_adoptable_article(false);
        let is_reader_available = self.adoptable_article.found().is_some();

        let (mut title, preview) = if is_reader_available {
            (self.article_title(), self.article_text_content.clone().unwrap_or_default())
        } else {
            let body_text = self.doc.body().map(|b| self.doc.inner_text(b)).unwrap_or_default();
            (self.doc.title(), body_text)
        };
        if title.is_empty() {
            title = self.doc.url().map(ToString::to_string).unwrap_or_default();
        }

        ReadingListInfo {
            title: truncate_chars(title.trim(), READER_TITLE_MAX_LENGTH).to_string(),
            preview_text: collapse_whitespace(truncate_chars(
                preview.trim(),
                READER_PREVIEW_TEXT_MAX_LENGTH,
            )),
            is_reader_available,
        }
    }

    /// Everything a reader view needs, computed the way a transition to
    /// reader mode does: a fresh forced search with cleared geometry.
    pub fn prepare_to_transition_to_reader(&mut self) -> Option<ExtractedArticle> {
        self.geometry.clear();
        self.ensure_adoptable_article(true);
        let next_page_url = self.next_page_url();
        let is_ltr = self.article_is_ltr();

        let html = self.adoptable_article.found().map(|(doc, root)| doc.outer_html(*root))?;
        Some(ExtractedArticle {
            html,
            title: self.article_title(),
            text_content: self.article_text_content.clone().unwrap_or_default(),
            next_page_url: next_page_url.map(String::from),
            is_ltr,
            route: self.route_to_article_node().unwrap_or_default(),
        })
    }
}

/// The document's only `article` element, when it is viable.
fn article_tag_candidate(ctx: &Context<'_>) -> Option<CandidateElement> {
    let doc = ctx.doc;
    let articles = doc.elements_by_tags(doc.root(), &["article"]);
    match articles.as_slice() {
        [only] => CandidateElement::candidate_if_viable(ctx, *only, false),
        _ => None,
    }
}

/// Extra article candidates around `scope`: elements in preceding siblings
/// would be prepended, elements in following siblings appended.
fn extra_article_candidates(
    ctx: &Context<'_>,
    article: &CandidateElement,
    scope: NodeId,
) -> Vec<CandidateElement> {
    let doc = ctx.doc;
    let Some(parent) = doc.parent(scope) else {
        return Vec::new();
    };
    let siblings: Vec<NodeId> = doc.element_children(parent).collect();
    let Some(position) = siblings.iter().position(|&s| s == scope) else {
        return Vec::new();
    };

    let mut candidates = Vec::new();
    for (range, is_prepended) in [(&siblings[..position], true), (&siblings[position + 1..], false)] {
        for &sibling in range {
            for element in std::iter::once(sibling).chain(doc.descendant_elements(sibling)) {
                if should_ignore_element(doc, element) {
                    continue;
                }
                if let Some(candidate) =
                    CandidateElement::extra_candidate_if_viable(ctx, element, article, is_prepended)
                {
                    candidates.push(candidate);
                }
            }
        }
    }
    candidates
}
