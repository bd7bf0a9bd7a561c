use serde::{Deserialize, Serialize};

/// A node of Yomitan structured content: bare text or an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentNode {
    Text(String),
    Element(Element),
}

impl ContentNode {
    pub fn text(value: impl Into<String>) -> Self {
        ContentNode::Text(value.into())
    }

    /// Concatenated text of this node and its descendants.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            ContentNode::Text(s) => out.push_str(s),
            ContentNode::Element(el) => el.collect_text(out),
        }
    }
}

impl From<Element> for ContentNode {
    fn from(el: Element) -> Self {
        ContentNode::Element(el)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTag {
    Div,
    Span,
    A,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: ContentTag,
    pub content: Vec<ContentNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ContentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ContentData>,
}

impl Element {
    /// An element with no children serializes its content as `[""]`.
    pub fn new(tag: ContentTag, content: Vec<ContentNode>) -> Self {
        let content = if content.is_empty() {
            vec![ContentNode::text("")]
        } else {
            content
        };
        Self {
            tag,
            content,
            href: None,
            style: None,
            data: None,
        }
    }

    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        self.content.iter().for_each(|c| c.collect_text(out));
    }

    pub fn with_style(mut self, style: ContentStyle) -> Self {
        self.style = (!style.is_empty()).then_some(style);
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.data = Some(ContentData {
            class: class.into(),
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration_line: Option<TextDecorationLine>,
}

impl ContentStyle {
    pub fn is_empty(&self) -> bool {
        *self == ContentStyle::default()
    }

    pub fn italic() -> Self {
        Self {
            font_style: Some(FontStyle::Italic),
            ..Self::default()
        }
    }

    pub fn bold() -> Self {
        Self {
            font_weight: Some(FontWeight::Bold),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecorationLine {
    Underline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentData {
    pub class: String,
}
