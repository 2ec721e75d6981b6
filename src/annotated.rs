//! Annotated snapshot loader.
//!
//! Builds a [`Document`] from HTML whose elements carry the layout a headless
//! renderer computed for them:
//!
//! - `data-rect="left,top,width,height"`: border box in document coordinates
//! - `data-client="width,height"`: client area
//! - `data-style="float: left; font-size: 18px"`: computed style declarations
//!
//! Inherited properties flow from parent to child. An element without
//! `data-rect` gets the union of its descendants' boxes. The annotation
//! attributes are removed from the parsed tree, which the returned
//! [`Document`] keeps as is.

use url::Url;

use crate::dom::{Document, NodeId};
use crate::layout::{ClientSize, ComputedStyle, Layout, Rect};
use crate::{Error, Result};

const RECT_ATTR: &str = "data-rect";
const CLIENT_ATTR: &str = "data-client";
const STYLE_ATTR: &str = "data-style";

/// Parse an annotated snapshot.
///
/// `url` is the address the snapshot was taken from; relative links and
/// pagination are resolved against it.
///
/// # Example
///
/// ```rust
/// use article_finder::annotated;
///
/// let doc = annotated::parse(
///     r#"<html><body data-rect="0,0,800,600"><p data-rect="10,10,300,20">Hi</p></body></html>"#,
///     Some("https://example.com/a"),
/// ).unwrap();
/// let body = doc.body().unwrap();
/// assert_eq!(doc.bounding_rect(body).width, 800.0);
/// ```
pub fn parse(html: &str, url: Option<&str>) -> Result<Document> {
    let url = match url {
        Some(raw) => Some(Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?),
        None => None,
    };

    let source = dom_query::Document::from(html);
    let Some(html_node) = source.root().first_element_child().map(|n| n.id) else {
        return Err(Error::ParseError("document has no html element".to_string()));
    };

    let mut doc = Document::from_dom(source, url);
    let mut declared_rects: Vec<(NodeId, Option<Rect>)> = Vec::new();
    let mut stray: Vec<NodeId> = Vec::new();

    let mut stack: Vec<(NodeId, Option<ComputedStyle>)> = vec![(html_node, None)];
    while let Some((id, parent_style)) = stack.pop() {
        let mut style = ComputedStyle::for_tag(&doc.tag_name(id), parent_style.as_ref());
        let rect = doc.attr(id, RECT_ATTR).and_then(|v| parse_rect(&v));
        let client = doc.attr(id, CLIENT_ATTR).and_then(|v| parse_client(&v));
        if let Some(inline) = doc.attr(id, "style") {
            style.apply_declarations(&inline);
        }
        if let Some(computed) = doc.attr(id, STYLE_ATTR) {
            style.apply_declarations(&computed);
        }
        for name in [RECT_ATTR, CLIENT_ATTR, STYLE_ATTR] {
            doc.remove_attr(id, name);
        }

        declared_rects.push((id, rect));
        doc.set_layout(id, Layout { rect, client, style: style.clone() });

        for child in doc.children(id).into_iter().rev() {
            if doc.is_element(child) {
                stack.push((child, Some(style.clone())));
            } else if !doc.is_text(child) {
                stray.push(child);
            }
        }
    }

    // Comments and processing instructions carry nothing a reader shows.
    for node in stray {
        doc.remove(node);
    }

    // Children were pushed after their parents, so walking backwards sees
    // every subtree before its root.
    for &(id, declared) in declared_rects.iter().rev() {
        if declared.is_some() {
            continue;
        }
        let union = doc
            .element_children(id)
            .map(|c| doc.bounding_rect(c))
            .fold(Rect::default(), |acc, r| acc.union(&r));
        let mut layout = doc.layout(id).cloned().unwrap_or_default();
        layout.rect = Some(union);
        doc.set_layout(id, layout);
    }

    tracing::debug!(elements = declared_rects.len(), "loaded annotated snapshot");
    Ok(doc)
}

fn parse_numbers(value: &str) -> Vec<f64> {
    value
        .split([',', ' '])
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.trim_end_matches("px").parse().ok())
        .collect()
}

fn parse_rect(value: &str) -> Option<Rect> {
    match parse_numbers(value)[..] {
        [left, top, width, height] => Some(Rect::new(left, top, width, height)),
        _ => None,
    }
}

fn parse_client(value: &str) -> Option<ClientSize> {
    match parse_numbers(value)[..] {
        [width, height] => Some(ClientSize { width, height }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Float;

    #[test]
    fn reads_annotations_and_strips_them() {
        let doc = parse(
            r#"<html><body data-rect="0,0,1000,2000" data-style="font-size: 18px">
                <div id="main" data-rect="100,50,600,800" data-client="580,780" data-style="float: left">
                    <p data-rect="100,50,600,40">Text</p>
                </div>
            </body></html>"#,
            Some("https://example.com/story"),
        )
        .unwrap();

        let main = doc.element_by_id("main").unwrap();
        assert_eq!(doc.bounding_rect(main), Rect::new(100.0, 50.0, 600.0, 800.0));
        assert_eq!(doc.client_size(main).height, 780.0);
        assert_eq!(doc.style(main).float, Float::Left);
        assert_eq!(doc.style(main).font_size, 18.0);
        assert!(doc.attr(main, "data-rect").is_none());
        assert!(doc.attr(main, "data-style").is_none());
        assert_eq!(doc.url().map(Url::as_str), Some("https://example.com/story"));
    }

    #[test]
    fn missing_rect_is_union_of_children() {
        let doc = parse(
            r#"<html><body><section id="s">
                <p data-rect="10,10,100,20">a</p>
                <p data-rect="10,40,200,20">b</p>
            </section><span id="empty">x</span></body></html>"#,
            None,
        )
        .unwrap();

        let section = doc.element_by_id("s").unwrap();
        assert_eq!(doc.bounding_rect(section), Rect::new(10.0, 10.0, 200.0, 50.0));
        let empty = doc.element_by_id("empty").unwrap();
        assert!(!doc.is_visible(empty));
    }

    #[test]
    fn comments_are_dropped_and_markup_kept() {
        let doc = parse(
            r#"<html><body data-rect="0,0,800,600"><div id="d" data-rect="0,0,800,100"><!-- ad slot --><p class="lede">A &amp; B</p></div></body></html>"#,
            None,
        )
        .unwrap();

        let div = doc.element_by_id("d").unwrap();
        assert_eq!(doc.outer_html(div), r#"<div id="d"><p class="lede">A &amp; B</p></div>"#);
    }

    #[test]
    fn bad_url_is_rejected() {
        let err = parse("<html></html>", Some("not a url")).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
