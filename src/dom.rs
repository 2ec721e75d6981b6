//! Document model
//!
//! A rendered page is a `dom_query` tree plus the `Layout` a renderer
//! computed for each element. Layouts live in a side table keyed by
//! `dom_query::NodeId`, so the engine can keep its own tables keyed the same
//! way instead of tagging nodes with transient flags.
//!
//! Source documents are read-only to the engine. Cleaning happens on a copy
//! produced by [`Document::clone_subtree`].

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;

use dom_query::{NodeData, NodeRef, Tree};
use url::Url;

use crate::layout::{ClientSize, ComputedStyle, Layout, Rect};

pub use dom_query::NodeId;

static DEFAULT_STYLE: ComputedStyle = ComputedStyle::INITIAL;

/// Namespace of elements the parser produces. Elements created outside the
/// parser get it too, so the serializer treats void and raw text tags alike.
const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A rendered document snapshot.
#[derive(Clone)]
pub struct Document {
    dom: dom_query::Document,
    layouts: HashMap<NodeId, Layout>,
    url: Option<Url>,
    /// Pre-order position of every attached node, rebuilt after mutation.
    order: OnceCell<HashMap<NodeId, usize>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("layouts", &self.layouts.len())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Document {
    /// Create an empty document with only a root node.
    #[must_use]
    pub fn new(url: Option<Url>) -> Self {
        Self::from_dom(dom_query::Document::default(), url)
    }

    /// Wrap a parsed tree. Layouts are added with [`Document::set_layout`].
    #[must_use]
    pub fn from_dom(dom: dom_query::Document, url: Option<Url>) -> Self {
        Self { dom, layouts: HashMap::new(), url, order: OnceCell::new() }
    }

    fn tree(&self) -> &Tree {
        &self.dom.tree
    }

    #[inline]
    fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef::new(id, &self.dom.tree)
    }

    /// The document node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.tree().root_id()
    }

    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn set_url(&mut self, url: Option<Url>) {
        self.url = url;
    }

    // === Construction and mutation ===

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let node = self.tree().new_element(&tag.to_ascii_lowercase());
        node.update(|n| {
            if let NodeData::Element(element) = &mut n.data {
                element.name.ns = HTML_NAMESPACE.into();
            }
        });
        node.id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.tree().new_text(text).id
    }

    /// Detach `id` from its parent. The node and its subtree stay valid.
    pub fn remove(&mut self, id: NodeId) {
        self.tree().remove_from_parent(&id);
        self.order.take();
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.tree().append_child_of(&parent, &child);
        self.order.take();
    }

    /// Insert `child` before `reference`, or append when `reference` is `None`
    /// or not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        match reference.filter(|&r| self.parent(r) == Some(parent)) {
            Some(reference) => self.tree().insert_before_of(&reference, &child),
            None => self.tree().append_child_of(&parent, &child),
        }
        self.order.take();
    }

    /// Put `replacement` where `old` is. `old` ends up detached.
    pub fn replace(&mut self, old: NodeId, replacement: NodeId) {
        if self.parent(old).is_none() {
            return;
        }
        self.node(old).replace_with(&replacement);
        self.order.take();
    }

    /// Move every child of `from` to the end of `to`.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        for child in self.children(from) {
            self.tree().append_child_of(&to, &child);
        }
        self.order.take();
    }

    pub fn set_layout(&mut self, id: NodeId, layout: Layout) {
        self.layouts.insert(id, layout);
    }

    // === Node information ===

    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.node(id).is_element()
    }

    #[must_use]
    pub fn is_text(&self, id: NodeId) -> bool {
        self.node(id).is_text()
    }

    #[must_use]
    pub fn is_comment(&self, id: NodeId) -> bool {
        self.node(id).is_comment()
    }

    /// Lowercase tag name, empty for non-elements.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> String {
        self.tree()
            .get_name(&id)
            .map(|name| name.local.to_ascii_lowercase().to_string())
            .unwrap_or_default()
    }

    /// Text of a text node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<String> {
        self.node(id)
            .query(|n| match &n.data {
                NodeData::Text { contents } => Some(contents.to_string()),
                _ => None,
            })
            .flatten()
    }

    // === Attributes ===

    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<String> {
        self.node(id).attr(name).map(|v| v.to_string())
    }

    #[must_use]
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.node(id).has_attr(name)
    }

    /// Name and value of every attribute, in source order.
    #[must_use]
    pub fn attrs(&self, id: NodeId) -> Vec<(String, String)> {
        self.node(id)
            .attrs()
            .iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect()
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        self.node(id).set_attr(name, value);
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        self.node(id).remove_attr(name);
    }

    /// Keep only attributes for which `keep(name, value)` holds.
    pub fn retain_attrs(&mut self, id: NodeId, mut keep: impl FnMut(&str, &str) -> bool) {
        self.node(id).update(|n| {
            if let NodeData::Element(element) = &mut n.data {
                element.attrs.retain(|attr| keep(&attr.name.local, &attr.value));
            }
        });
    }

    /// The `id` attribute, empty when absent.
    #[must_use]
    pub fn id_attr(&self, id: NodeId) -> String {
        self.node(id).id_attr().map(|v| v.to_string()).unwrap_or_default()
    }

    /// The `class` attribute, empty when absent.
    #[must_use]
    pub fn class_name(&self, id: NodeId) -> String {
        self.node(id).class().map(|v| v.to_string()).unwrap_or_default()
    }

    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).has_class(class)
    }

    /// Append a style declaration to the element's `style` attribute.
    pub fn push_style(&mut self, id: NodeId, property: &str, value: &str) {
        let mut style = self.attr(id, "style").unwrap_or_default().trim().to_string();
        if !style.is_empty() && !style.ends_with(';') {
            style.push(';');
        }
        if !style.is_empty() {
            style.push(' ');
        }
        let _ = write!(style, "{property}: {value};");
        self.set_attr(id, "style", &style);
    }

    // === Layout ===

    #[must_use]
    pub fn layout(&self, id: NodeId) -> Option<&Layout> {
        self.layouts.get(&id)
    }

    /// Computed style, or initial values for nodes without layout.
    #[must_use]
    pub fn style(&self, id: NodeId) -> &ComputedStyle {
        self.layouts.get(&id).map_or(&DEFAULT_STYLE, |l| &l.style)
    }

    /// Bounding rectangle as reported by the renderer; zero when unknown.
    ///
    /// Prefer `GeometryCache::rect` in scoring code.
    #[must_use]
    pub fn bounding_rect(&self, id: NodeId) -> Rect {
        self.layouts.get(&id).and_then(|l| l.rect).unwrap_or_default()
    }

    #[must_use]
    pub fn client_size(&self, id: NodeId) -> ClientSize {
        self.layouts.get(&id).and_then(|l| l.client).unwrap_or_default()
    }

    /// Shown by its style and rendered with a non-empty box.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.is_element(id) && self.style(id).is_shown() && !self.bounding_rect(id).is_empty()
    }

    // === Navigation ===

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree().parent_of(&id).map(|n| n.id)
    }

    /// Parent if it is an element.
    #[must_use]
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree().child_ids_of(&id)
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).into_iter().filter(move |&c| self.is_element(c))
    }

    #[must_use]
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_element_child().map(|n| n.id)
    }

    #[must_use]
    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).last()
    }

    #[must_use]
    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.element_children(id).count()
    }

    #[must_use]
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_element_sibling().map(|n| n.id)
    }

    #[must_use]
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_element_sibling().map(|n| n.id)
    }

    /// Element ancestors from the parent upwards.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent_element(id), move |&n| self.parent_element(n))
    }

    /// Number of element ancestors.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        std::iter::successors(Some(node), |&n| self.parent(n)).any(|n| n == ancestor)
    }

    /// All nodes below `id` in pre-order, excluding `id`.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.tree().descendant_ids_of_it(&id).collect()
    }

    /// Element descendants of `id` in document order.
    #[must_use]
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id).into_iter().filter(|&n| self.is_element(n)).collect()
    }

    /// Element descendants of `scope` whose tag is one of `tags`.
    #[must_use]
    pub fn elements_by_tags(&self, scope: NodeId, tags: &[&str]) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| tags.contains(&self.tag_name(n).as_str()))
            .collect()
    }

    /// First element descendant of `scope` with tag `tag`.
    #[must_use]
    pub fn first_by_tag(&self, scope: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(scope).into_iter().find(|&n| self.tag_name(n) == tag)
    }

    /// First element in the document with the given `id` attribute.
    #[must_use]
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&n| self.is_element(n) && self.id_attr(n) == value)
    }

    /// Elements of the document carrying every one of `classes`.
    #[must_use]
    pub fn elements_with_classes(&self, classes: &[&str]) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&n| self.is_element(n) && classes.iter().all(|c| self.has_class(n, c)))
            .collect()
    }

    /// The `html` element.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.first_element_child(self.root())
    }

    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.tree().body().map(|n| n.id)
    }

    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.tree().head().map(|n| n.id)
    }

    /// Trimmed text of the first `title` element.
    #[must_use]
    pub fn title(&self) -> String {
        self.first_by_tag(self.root(), "title")
            .map(|t| self.text_content(t).trim().to_string())
            .unwrap_or_default()
    }

    /// Content of `<meta name="generator">`.
    #[must_use]
    pub fn generator(&self) -> Option<String> {
        self.elements_by_tags(self.root(), &["meta"]).into_iter().find_map(|meta| {
            self.attr(meta, "name")
                .is_some_and(|v| v.eq_ignore_ascii_case("generator"))
                .then(|| self.attr(meta, "content"))
                .flatten()
        })
    }

    // === Document order ===

    fn order(&self) -> &HashMap<NodeId, usize> {
        self.order.get_or_init(|| {
            std::iter::once(self.root())
                .chain(self.descendants(self.root()))
                .enumerate()
                .map(|(position, node)| (node, position))
                .collect()
        })
    }

    /// Whether `a` comes before `b` in document order. Detached nodes sort last.
    #[must_use]
    pub fn precedes(&self, a: NodeId, b: NodeId) -> bool {
        let order = self.order();
        let position = |n: NodeId| order.get(&n).copied().unwrap_or(usize::MAX);
        position(a) < position(b)
    }

    // === Text ===

    /// Concatenation of all descendant text.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.node(id).text().to_string()
    }

    /// Rendered text: hidden subtrees are skipped and block boxes break lines.
    ///
    /// Nodes without layout fall back to their tag's default display.
    #[must_use]
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_inner_text(id, &mut out);
        out.trim().to_string()
    }

    fn collect_inner_text(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.text(id) {
            out.push_str(&text);
            return;
        }
        if !self.is_element(id) {
            if id == self.root() {
                for child in self.children(id) {
                    self.collect_inner_text(child, out);
                }
            }
            return;
        }

        let tag = self.tag_name(id);
        let style = match self.layout(id) {
            Some(layout) => layout.style.clone(),
            None => ComputedStyle::for_tag(&tag, None),
        };
        if !style.is_shown() {
            return;
        }
        if tag == "br" {
            out.push('\n');
            return;
        }
        let block = style.display.is_block_level();
        if block && !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        for child in self.children(id) {
            self.collect_inner_text(child, out);
        }
        if block && !out.ends_with('\n') {
            out.push('\n');
        }
    }

    // === Copying ===

    /// Deep copy `id` from `source` into this document, detached.
    ///
    /// Layouts are copied with the nodes.
    pub fn import_subtree(&mut self, source: &Document, id: NodeId) -> NodeId {
        let copy = self.import_node(source, id);
        let mut stack: Vec<(NodeId, NodeId)> = vec![(id, copy)];
        while let Some((from, to)) = stack.pop() {
            for child in source.children(from) {
                let child_copy = self.import_node(source, child);
                self.tree().append_child_of(&to, &child_copy);
                stack.push((child, child_copy));
            }
        }
        self.order.take();
        copy
    }

    fn import_node(&mut self, source: &Document, id: NodeId) -> NodeId {
        let data = source.node(id).query_or(NodeData::Fragment, |n| {
            let mut data = n.data.clone();
            if let NodeData::Element(element) = &mut data {
                element.template_contents = None;
            }
            data
        });
        let copy = self.tree().create_node(data);
        if let Some(layout) = source.layout(id) {
            self.layouts.insert(copy, layout.clone());
        }
        copy
    }

    /// Copy the subtree at `id` into a new document, returning it and the
    /// copied root (attached under the new document node).
    #[must_use]
    pub fn clone_subtree(&self, id: NodeId) -> (Document, NodeId) {
        let mut doc = Document::new(self.url.clone());
        let copy = doc.import_subtree(self, id);
        let root = doc.root();
        doc.append_child(root, copy);
        (doc, copy)
    }

    // === Serialization ===

    /// Markup of the node including itself.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        self.node(id).try_html().map(|html| html.to_string()).unwrap_or_default()
    }

    /// Markup of the node's children.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        self.node(id).try_inner_html().map(|html| html.to_string()).unwrap_or_default()
    }
}
