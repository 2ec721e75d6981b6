//! Next-page link detection.
//!
//! Links near the bottom of the article are compared with the document URL
//! component by component. A link whose URL differs from the current one
//! only by an ordinal one greater than the current page (`story-2` to
//! `story-3`, `?page=2` to `?page=3`) is a next-page candidate; cues in the
//! URL and link text add to its score.

use url::Url;

use super::Context;
use crate::dom::{Document, NodeId};
use crate::layout::Display;
use crate::patterns::{
    COMMENT_CONTAINER_CLASS, COMMENT_CONTAINER_IDS, LINK_ARCHIVE_SLASH_DIGIT_END,
    LINK_BAD_PARAMETER_KEY, LINK_CONTINUE_TEXT, LINK_NEXT_TEXT, LINK_PAGE_PARAMETER_KEY,
    LINK_PAGE_SLASH_NUMBER, LINK_PAGE_TEXT, LINK_SLASH_DIGIT_END,
};
use crate::text::{last_integer, string_similarity};
use crate::url_utils::{host_with_port, parameters_from_search, path_components, resolve_href, search};

const LINK_MATCH_WEIGHT: f64 = 200.0;
const LINK_MISMATCH_VALUE_BASE: f64 = 2.0;
const LINK_NEXT_ORDINAL_VALUE_BASE: f64 = 3.0;
const LINK_VERTICAL_DISTANCE_WEIGHT: f64 = 150.0;
const LINK_URL_SEMANTIC_MATCH_BONUS: f64 = 100.0;
const LINK_LIST_ITEM_BONUS: f64 = 5.0;
const LINK_NEXT_MATCH_BONUS: f64 = 15.0;
const LINK_PAGE_MATCH_BONUS: f64 = 10.0;
const LINK_CONTINUE_MATCH_BONUS: f64 = 15.0;

/// Ordinals at or above this are not exact in a double and fall back to the
/// page number.
const MAXIMUM_EXACT_INTEGRAL_VALUE: u64 = 1 << 53;

/// Whether `link` continues `reference` by one.
///
/// A link extending the reference is compared against `page_number`. When
/// both carry the same number, the link text must name the next page.
#[must_use]
pub fn is_next_ordinal(reference: &str, link: &str, link_text: &str, page_number: u64) -> bool {
    let (reference, link) = match link.strip_prefix(reference) {
        Some(rest) => ("", rest),
        None => (reference, link),
    };
    let Some(link_ordinal) = last_integer(link) else {
        return false;
    };
    let reference_ordinal = Some(reference)
        .filter(|r| !r.is_empty())
        .and_then(last_integer)
        .filter(|&n| n < MAXIMUM_EXACT_INTEGRAL_VALUE)
        .unwrap_or(page_number);

    reference_ordinal.checked_add(1).is_some_and(|next| {
        if link_ordinal == reference_ordinal {
            last_integer(link_text) == Some(next)
        } else {
            link_ordinal == next
        }
    })
}

/// Drop the common suffix of two path components.
fn strip_common_suffix<'s>(link: &'s str, reference: &'s str) -> (&'s str, &'s str) {
    let common = link
        .chars()
        .rev()
        .zip(reference.chars().rev())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a.len_utf8())
        .sum::<usize>();
    (&link[..link.len() - common], &reference[..reference.len() - common])
}

/// Scope searched for next-page links.
///
/// The article (its parent when the article is inline), widened to the
/// first ancestor reaching well below the article's bottom.
#[must_use]
pub fn search_scope(ctx: &Context<'_>, article: NodeId) -> NodeId {
    let doc = ctx.doc;
    let mut scope = article;
    if doc.style(scope).display == Display::Inline {
        if let Some(parent) = doc.parent(scope) {
            scope = parent;
        }
    }

    let minimum_bottom = ctx.rect(scope).bottom() + ctx.options.link_max_vertical_distance;
    let mut possible = scope;
    while doc.is_element(possible) && ctx.rect(possible).bottom() <= minimum_bottom {
        match doc.parent(possible) {
            Some(parent) => possible = parent,
            None => break,
        }
    }
    if possible != scope && (possible == doc.root() || doc.is_element(possible)) {
        scope = possible;
    }
    scope
}

/// Anchors under `scope` whose parent is not a comment container.
#[must_use]
pub fn link_candidates(doc: &Document, scope: NodeId) -> Vec<NodeId> {
    doc.elements_by_tags(scope, &["a"])
        .into_iter()
        .filter(|&link| {
            doc.parent_element(link).is_some_and(|parent| {
                !COMMENT_CONTAINER_IDS.contains(&doc.id_attr(parent).as_str())
                    && doc.class_name(parent) != COMMENT_CONTAINER_CLASS
            })
        })
        .collect()
}

/// Scores next-page link candidates of one article.
pub struct PaginationScorer<'a> {
    ctx: Context<'a>,
    article: NodeId,
    reference: &'a Url,
    page_number: u64,
    date_prefix: Option<&'a str>,
    is_word_press: bool,
}

impl<'a> PaginationScorer<'a> {
    /// `date_prefix` is the dated part of the document path shared by every
    /// page of the article, when there is one.
    #[must_use]
    pub fn new(
        ctx: Context<'a>,
        article: NodeId,
        reference: &'a Url,
        page_number: u64,
        date_prefix: Option<&'a str>,
        is_word_press: bool,
    ) -> Self {
        Self { ctx, article, reference, page_number, date_prefix, is_word_press }
    }

    /// URL of the best-scoring link, if any scores above zero.
    #[must_use]
    pub fn next_page_url(&self) -> Option<Url> {
        let doc = self.ctx.doc;
        let scope = search_scope(&self.ctx, self.article);

        let mut best: Option<(Url, f64)> = None;
        for link in link_candidates(doc, scope) {
            let Some((url, score)) = self.score_link(link) else {
                continue;
            };
            if score > best.as_ref().map_or(0.0, |(_, s)| *s) {
                best = Some((url, score));
            }
        }
        if let Some((url, score)) = &best {
            tracing::debug!(url = %url, score, "picked next page link");
        }
        best.map(|(url, _)| url)
    }

    /// Score of `link` as the next page; zero when it cannot be.
    #[must_use]
    pub fn score(&self, link: NodeId) -> f64 {
        self.score_link(link).map_or(0.0, |(_, score)| score)
    }

    #[allow(clippy::too_many_lines)]
    fn score_link(&self, link: NodeId) -> Option<(Url, f64)> {
        let doc = self.ctx.doc;
        let opts = self.ctx.options;
        let reference = self.reference;

        let url = resolve_href(&doc.attr(link, "href")?, Some(reference))?;
        if host_with_port(&url) != host_with_port(reference) {
            return None;
        }
        if url.path() == reference.path() && search(&url) == search(reference) {
            return None;
        }
        if url.fragment().is_some() {
            return None;
        }
        if !doc.is_visible(link) {
            return None;
        }

        let link_rect = self.ctx.rect(link);
        let article_rect = self.ctx.rect(self.article);
        if link_rect.top < article_rect.top {
            return None;
        }
        let vertical_distance = (article_rect.top - link_rect.bottom())
            .max(link_rect.top - article_rect.bottom())
            .max(0.0);
        if vertical_distance > opts.link_max_vertical_distance {
            return None;
        }
        let horizontal_distance = (article_rect.left - link_rect.right())
            .max(link_rect.left - article_rect.right())
            .max(0.0);
        if horizontal_distance > 0.0 {
            return None;
        }

        let mut reference_path = reference.path();
        let mut link_path = url.path();
        if let Some(prefix) = self.date_prefix {
            if !link_path.contains(prefix) {
                return None;
            }
            reference_path = reference_path.get(prefix.len()..).unwrap_or("");
            link_path = link_path.get(prefix.len()..).unwrap_or("");
        }

        let (link_components, _) = path_components(link_path);
        let (reference_components, link_ends_with_slash) = path_components(reference_path);
        if link_components.len() < reference_components.len() {
            return None;
        }

        let link_text = doc.text_content(link);
        let mut mismatch_count = 0_i32;
        let mut next_ordinal_value = 0.0_f64;
        for (i, &link_component) in link_components.iter().enumerate() {
            let reference_component = reference_components.get(i).copied().unwrap_or("");
            if reference_component == link_component {
                continue;
            }
            if i + 2 < reference_components.len() {
                return None;
            }
            let (link_component, reference_component) =
                if link_component.len() >= reference_component.len() {
                    strip_common_suffix(link_component, reference_component)
                } else {
                    (link_component, reference_component)
                };
            if is_next_ordinal(reference_component, link_component, &link_text, self.page_number) {
                let exponent = i as i32 - link_components.len() as i32 + 1;
                next_ordinal_value = LINK_NEXT_ORDINAL_VALUE_BASE.powi(exponent);
            } else {
                mismatch_count += 1;
            }
            if mismatch_count > 1 {
                return None;
            }
        }

        let mut semantic_bonus = false;
        let link_search = search(&url);
        if !link_search.is_empty() {
            let reference_parameters = parameters_from_search(&search(reference));
            for (key, link_value) in parameters_from_search(&link_search) {
                let reference_value = reference_parameters
                    .iter()
                    .find(|(k, _)| *k == key)
                    .and_then(|(_, v)| v.clone());
                if reference_value == link_value {
                    continue;
                }
                let reference_value = reference_value.unwrap_or_default();
                let link_value = link_value.unwrap_or_default();
                if link_value.len() < reference_value.len() {
                    mismatch_count += 1;
                } else if is_next_ordinal(&reference_value, &link_value, &link_text, self.page_number) {
                    if LINK_PAGE_PARAMETER_KEY.is_match(&key) {
                        if reference_path.to_lowercase() != link_path.to_lowercase() {
                            return None;
                        }
                        if self.is_word_press && link_ends_with_slash {
                            return None;
                        }
                        semantic_bonus = true;
                    } else if LINK_BAD_PARAMETER_KEY.is_match(&key) {
                        return None;
                    }
                    next_ordinal_value = next_ordinal_value.max(1.0 / LINK_NEXT_ORDINAL_VALUE_BASE);
                } else {
                    mismatch_count += 1;
                }
            }
        }

        if next_ordinal_value == 0.0 {
            return None;
        }
        let href = url.as_str();
        if LINK_PAGE_SLASH_NUMBER.is_match(href) || LINK_SLASH_DIGIT_END.is_match(href) {
            semantic_bonus = true;
        }
        if !semantic_bonus
            && link_components.len() == reference_components.len()
            && string_similarity(reference_path, link_path) < opts.link_min_url_similarity
        {
            return None;
        }
        if LINK_ARCHIVE_SLASH_DIGIT_END.is_match(href) {
            return None;
        }

        let mut score = LINK_MATCH_WEIGHT
            * (LINK_MISMATCH_VALUE_BASE.powi(-mismatch_count) + next_ordinal_value)
            - LINK_VERTICAL_DISTANCE_WEIGHT * vertical_distance / opts.link_max_vertical_distance;
        if semantic_bonus {
            score += LINK_URL_SEMANTIC_MATCH_BONUS;
        }
        if doc.parent_element(link).is_some_and(|p| doc.tag_name(p) == "li") {
            score += LINK_LIST_ITEM_BONUS;
        }
        let text = doc.inner_text(link);
        if LINK_NEXT_TEXT.is_match(&text) {
            score += LINK_NEXT_MATCH_BONUS;
        }
        if LINK_PAGE_TEXT.is_match(&text) {
            score += LINK_PAGE_MATCH_BONUS;
        }
        if LINK_CONTINUE_TEXT.is_match(&text) {
            score += LINK_CONTINUE_MATCH_BONUS;
        }
        Some((url, score))
    }
}
