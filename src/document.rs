//! Typed traversal over an HTML document parsed with html5ever.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::ExtractError;

/// A parsed HTML document.
pub struct Document {
    dom: RcDom,
}

impl Document {
    /// Parse an HTML string into a document tree.
    pub fn parse(html: &str) -> Result<Self, ExtractError> {
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(ExtractError::Parse)?;
        Ok(Self { dom })
    }

    /// First element, in document order, whose `id` attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<Element> {
        elements(Descendants::of(&self.dom.document))
            .find(|el| el.attr("id").as_deref() == Some(id))
    }
}

/// An element node of a [`Document`].
#[derive(Clone)]
pub struct Element {
    handle: Handle,
}

impl Element {
    fn from_handle(handle: Handle) -> Option<Self> {
        matches!(handle.data, NodeData::Element { .. }).then_some(Self { handle })
    }

    /// Local tag name, e.g. `dl`.
    pub fn tag(&self) -> &str {
        match &self.handle.data {
            NodeData::Element { name, .. } => &*name.local,
            _ => "",
        }
    }

    /// Value of the attribute named `name`, if present.
    pub fn attr(&self, name: &str) -> Option<String> {
        let NodeData::Element { attrs, .. } = &self.handle.data else {
            return None;
        };
        attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string())
    }

    /// Whether `class` is one of the whitespace-separated entries of the `class` attribute.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Concatenated text of every text node below this element.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in Descendants::of(&self.handle) {
            if let NodeData::Text { contents } = &node.data {
                out.push_str(&contents.borrow());
            }
        }
        out
    }

    /// Elements below this one, in document order.
    pub fn descendants(&self) -> impl Iterator<Item = Element> {
        elements(Descendants::of(&self.handle))
    }

    /// First descendant with the given tag name carrying `class`.
    pub fn find(&self, tag: &str, class: &str) -> Option<Element> {
        self.descendants()
            .find(|el| el.tag() == tag && el.has_class(class))
    }
}

fn elements(nodes: Descendants) -> impl Iterator<Item = Element> {
    nodes.filter_map(Element::from_handle)
}

/// Pre-order walk over every node strictly below a root.
struct Descendants {
    stack: Vec<Handle>,
}

impl Descendants {
    fn of(root: &Handle) -> Self {
        let stack = root.children.borrow().iter().rev().cloned().collect();
        Self { stack }
    }
}

impl Iterator for Descendants {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children.borrow().iter().rev().cloned());
        Some(node)
    }
}
