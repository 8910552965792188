// ── Host element tree ──
//
// A minimal element tree standing in for the page's DOM. The embedding
// page builds the scaffold with it; the shell augments it in place and
// serializes it through maud's `Render`.

use std::collections::BTreeMap;

use maud::{Markup, PreEscaped, Render};

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Escaped on output.
    Text(String),
    /// Already-rendered markup, inserted verbatim.
    Markup(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Markup> for Node {
    fn from(markup: Markup) -> Self {
        Self::Markup(markup.into_string())
    }
}

/// An element with a tag, attributes, an ordered class list and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    // ── Builders ─────────────────────────────────────────────────────

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.with_child(Node::Text(text.to_owned()))
    }

    // ── Tag / classes / attributes ───────────────────────────────────

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Flip `class`; returns whether it is present afterwards.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.classes.push(class.to_owned());
            true
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.insert(name.to_owned(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove(name)
    }

    /// Set or clear a presence-only attribute.
    pub fn set_flag(&mut self, name: &str, on: bool) {
        if on {
            self.set_attr(name, "");
        } else {
            self.remove_attr(name);
        }
    }

    // ── Children ─────────────────────────────────────────────────────

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn set_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    /// Direct element children, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Mutable access to the first direct element child matching `pred`.
    pub fn child_mut(&mut self, pred: impl Fn(&Element) -> bool) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|n| match n {
            Node::Element(e) if pred(e) => Some(e),
            _ => None,
        })
    }

    /// Index (into `children()`) of the first direct element child matching `pred`.
    pub fn position(&self, pred: impl Fn(&Element) -> bool) -> Option<usize> {
        self.children
            .iter()
            .position(|n| matches!(n, Node::Element(e) if pred(e)))
    }

    /// Insert before the first element child (text before it is kept in
    /// front, like `insertBefore(x, firstElementChild)`).
    pub fn prepend_element(&mut self, child: Element) {
        let idx = self.position(|_| true).unwrap_or(self.children.len());
        self.children.insert(idx, Node::Element(child));
    }

    pub fn insert(&mut self, index: usize, child: impl Into<Node>) {
        let index = index.min(self.children.len());
        self.children.insert(index, child.into());
    }

    pub fn append(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// First descendant (depth-first, pre-order, excluding `self`) matching `pred`.
    pub fn find(&self, pred: &impl Fn(&Element) -> bool) -> Option<&Element> {
        for child in self.child_elements() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find(pred) {
                return Some(found);
            }
        }
        None
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut(&mut self, pred: &impl Fn(&Element) -> bool) -> Option<&mut Element> {
        for node in &mut self.children {
            let Node::Element(child) = node else { continue };
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_mut(pred) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            Node::Element(e) => collect_text(e, out),
            Node::Text(t) => out.push_str(t),
            Node::Markup(_) => {}
        }
    }
}

impl Render for Element {
    fn render_to(&self, buffer: &mut String) {
        buffer.push('<');
        buffer.push_str(&self.tag);
        if !self.classes.is_empty() {
            buffer.push_str(" class=\"");
            self.classes.join(" ").as_str().render_to(buffer);
            buffer.push('"');
        }
        for (name, value) in &self.attrs {
            buffer.push(' ');
            buffer.push_str(name);
            if !value.is_empty() {
                buffer.push_str("=\"");
                value.as_str().render_to(buffer);
                buffer.push('"');
            }
        }
        buffer.push('>');
        for child in &self.children {
            child.render_to(buffer);
        }
        buffer.push_str("</");
        buffer.push_str(&self.tag);
        buffer.push('>');
    }
}

impl Render for Node {
    fn render_to(&self, buffer: &mut String) {
        match self {
            Node::Element(e) => e.render_to(buffer),
            Node::Text(t) => t.as_str().render_to(buffer),
            Node::Markup(m) => PreEscaped(m.as_str()).render_to(buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Element {
        Element::new("app-shell").with_child(
            Element::new("header")
                .with_child(Element::new("h1").with_text("Swarming"))
                .with_child(
                    Element::new("aside")
                        .with_class("hideable")
                        .with_child(Element::new("a").with_attr("href", "/bots").with_text("Bots")),
                ),
        )
    }

    #[test]
    fn renders_escaped_markup() {
        let el = Element::new("div")
            .with_class("a")
            .with_class("b")
            .with_attr("title", "x < \"y\"")
            .with_attr("hidden", "")
            .with_text("1 & 2");
        assert_eq!(
            el.render().into_string(),
            r#"<div class="a b" hidden title="x &lt; &quot;y&quot;">1 &amp; 2</div>"#
        );
    }

    #[test]
    fn markup_nodes_are_not_escaped() {
        let el = Element::new("div").with_child(Node::Markup("<b>hi</b>".into()));
        assert_eq!(el.render().into_string(), "<div><b>hi</b></div>");
    }

    #[test]
    fn find_walks_descendants() {
        let root = sample();
        let aside = root.find(&|e: &Element| e.tag() == "aside").expect("aside");
        assert!(aside.has_class("hideable"));
        assert_eq!(root.find(&|e: &Element| e.tag() == "a").map(Element::text).as_deref(), Some("Bots"));
        assert!(root.find(&|e: &Element| e.tag() == "footer").is_none());
    }

    #[test]
    fn child_mut_skips_descendants() {
        let mut root = Element::new("div")
            .with_child(Element::new("nav").with_child(Element::new("header").with_class("inner")))
            .with_child(Element::new("header").with_class("outer"));
        let header = root.child_mut(|e| e.tag() == "header").expect("header");
        assert!(header.has_class("outer"));
        assert!(root.child_mut(|e| e.tag() == "footer").is_none());
    }

    #[test]
    fn toggle_class_flips() {
        let mut el = Element::new("aside");
        assert!(el.toggle_class("shown"));
        assert!(el.has_class("shown"));
        assert!(!el.toggle_class("shown"));
        assert!(el.classes().is_empty());
    }

    #[test]
    fn prepend_element_goes_before_first_element() {
        let mut header = Element::new("header")
            .with_text("  ")
            .with_child(Element::new("h1"));
        header.prepend_element(Element::new("button"));
        let tags: Vec<&str> = header.child_elements().map(Element::tag).collect();
        assert_eq!(tags, ["button", "h1"]);
        assert!(matches!(header.children()[0], Node::Text(_)));
    }
}
