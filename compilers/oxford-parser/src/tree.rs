use crate::markup::{is_void, tokenize};
use crate::token::{RawToken, Span};

/// Open elements past this depth are kept as empty nodes and their content
/// goes to the deepest open element, which bounds every recursive walk.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(ElementNode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl ElementNode {
    fn new(name: String, attributes: Vec<(String, String)>) -> Self {
        Self {
            name,
            attributes,
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// First descendant (depth-first, document order) matching `pred`.
    pub fn find<'n>(&'n self, pred: &dyn Fn(&ElementNode) -> bool) -> Option<&'n ElementNode> {
        find_element(&self.children, pred)
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(s) => out.push_str(s),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

/// First element in `nodes` or their descendants matching `pred`.
pub fn find_element<'n>(
    nodes: &'n [Node],
    pred: &dyn Fn(&ElementNode) -> bool,
) -> Option<&'n ElementNode> {
    for node in nodes {
        if let Node::Element(el) = node {
            if pred(el) {
                return Some(el);
            }
            if let Some(found) = find_element(&el.children, pred) {
                return Some(found);
            }
        }
    }
    None
}

fn push_node(parent: &mut Vec<Node>, node: Node) {
    // Adjacent text runs (e.g. around a stray '<') become one node.
    if let Node::Text(text) = &node {
        if let Some(Node::Text(prev)) = parent.last_mut() {
            prev.push_str(text);
            return;
        }
    }
    parent.push(node);
}

struct TreeBuilder {
    roots: Vec<Node>,
    open: Vec<ElementNode>,
}

impl TreeBuilder {
    fn current(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(el) => &mut el.children,
            None => &mut self.roots,
        }
    }

    fn close_top(&mut self) {
        if let Some(el) = self.open.pop() {
            push_node(self.current(), Node::Element(el));
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.open.is_empty() {
            self.close_top();
        }
        self.roots
    }
}

/// Builds an element tree from lexer output.
///
/// An end tag closes the nearest open element with the same name and
/// everything opened inside it. Unmatched end tags are ignored and elements
/// left open at the end are closed. Nesting is capped at [`MAX_DEPTH`].
pub fn build<'a>(tokens: impl IntoIterator<Item = (Span, RawToken<'a>)>) -> Vec<Node> {
    let mut builder = TreeBuilder {
        roots: Vec::new(),
        open: Vec::new(),
    };

    for (_span, token) in tokens {
        match token {
            RawToken::Text(text) => push_node(builder.current(), Node::Text(text.into_owned())),
            RawToken::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let attributes = attributes
                    .into_iter()
                    .map(|a| (a.name, a.value.into_owned()))
                    .collect();
                let el = ElementNode::new(name, attributes);
                if self_closing || is_void(&el.name) || builder.open.len() >= MAX_DEPTH {
                    push_node(builder.current(), Node::Element(el));
                } else {
                    builder.open.push(el);
                }
            }
            RawToken::EndTag(name) => {
                if let Some(pos) = builder.open.iter().rposition(|el| el.name == name) {
                    while builder.open.len() > pos {
                        builder.close_top();
                    }
                }
            }
        }
    }

    builder.finish()
}

/// Tokenizes and builds in one step.
pub fn parse_fragment(fragment: &str) -> Vec<Node> {
    build(tokenize(fragment))
}
