use oxford_protocol::{
    ContentNode, ContentStyle, ContentTag, Element, FontStyle, FontWeight, TextDecorationLine,
};

use crate::tree::{ElementNode, Node};

/// Maps an inline CSS declaration list onto the style keys structured
/// content supports. Everything else is dropped.
pub fn convert_style(style: &str) -> ContentStyle {
    let mut out = ContentStyle::default();

    for declaration in style.split(';') {
        let Some((key, value)) = declaration.trim().split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        match (key, value) {
            ("color", _) => out.color = Some(value.to_string()),
            ("margin-left", _) => out.margin_left = Some(value.to_string()),
            ("font-style", "italic") => out.font_style = Some(FontStyle::Italic),
            ("font-weight", "bold") => out.font_weight = Some(FontWeight::Bold),
            ("text-decoration", "underline") => {
                out.text_decoration_line = Some(TextDecorationLine::Underline)
            }
            _ => {}
        }
    }

    out
}

/// Internal cross-references become dictionary searches.
pub fn convert_href(href: &str) -> String {
    if href.starts_with("http:") || href.starts_with("https:") || href.starts_with('?') {
        href.to_string()
    } else {
        format!("?query={href}&wildcards=off")
    }
}

fn convert_element(el: &ElementNode) -> Element {
    let href = el.attr("href").filter(|h| !h.is_empty());

    let tag = match (el.name.as_str(), href) {
        ("div", _) => ContentTag::Div,
        ("a", Some(_)) => ContentTag::A,
        _ => ContentTag::Span,
    };

    let content = el.children.iter().filter_map(convert_node).collect();
    let mut out = Element::new(tag, content);

    if tag == ContentTag::A {
        out.href = href.map(convert_href);
    }

    let mut style = convert_style(el.attr("style").unwrap_or_default());
    match el.name.as_str() {
        "i" => {
            style.font_style.get_or_insert(FontStyle::Italic);
        }
        "b" => {
            style.font_weight.get_or_insert(FontWeight::Bold);
        }
        "u" => {
            style
                .text_decoration_line
                .get_or_insert(TextDecorationLine::Underline);
        }
        _ => {}
    }
    out = out.with_style(style);

    let class = el
        .attr("class")
        .map(|c| c.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|c| !c.is_empty());
    if let Some(class) = class {
        out = out.with_class(class);
    }

    out
}

fn convert_node(node: &Node) -> Option<ContentNode> {
    match node {
        Node::Text(text) if text.is_empty() => None,
        Node::Text(text) => Some(ContentNode::text(text.clone())),
        Node::Element(el) => Some(convert_element(el).into()),
    }
}

/// Converts a parsed fragment into structured content wrapped in a root `div`.
pub fn to_structured(nodes: &[Node]) -> ContentNode {
    let content = nodes.iter().filter_map(convert_node).collect();
    Element::new(ContentTag::Div, content).into()
}

/// Walks every element of a structured-content tree in document order.
pub fn walk_elements<'c>(node: &'c ContentNode, visit: &mut dyn FnMut(&'c Element)) {
    if let ContentNode::Element(el) = node {
        visit(el);
        for child in &el.content {
            walk_elements(child, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse_fragment;
    use serde_json::json;

    fn convert(html: &str) -> serde_json::Value {
        serde_json::to_value(to_structured(&parse_fragment(html))).unwrap()
    }

    #[test]
    fn test_style_conversion() {
        let style = convert_style("color: #555; margin-left:2em;font-style:italic; font-size: 90%; bogus");
        assert_eq!(style.color.as_deref(), Some("#555"));
        assert_eq!(style.margin_left.as_deref(), Some("2em"));
        assert_eq!(style.font_style, Some(FontStyle::Italic));
        assert_eq!(style.font_weight, None);

        assert!(convert_style("font-weight: normal").is_empty());
        assert!(convert_style("").is_empty());
    }

    #[test]
    fn test_href_rewrite() {
        assert_eq!(convert_href("дом"), "?query=дом&wildcards=off");
        assert_eq!(convert_href("https://example.org"), "https://example.org");
        assert_eq!(convert_href("?query=x"), "?query=x");
    }

    #[test]
    fn test_fragment_is_wrapped_in_div() {
        assert_eq!(
            convert("text <b>bold</b>"),
            json!({
                "tag": "div",
                "content": [
                    "text ",
                    {"tag": "span", "content": ["bold"], "style": {"fontWeight": "bold"}}
                ]
            })
        );
    }

    #[test]
    fn test_links_and_classes() {
        assert_eq!(
            convert(r#"<a href="кот" class=" ref  x">кот</a><a>plain</a>"#),
            json!({
                "tag": "div",
                "content": [
                    {"tag": "a", "content": ["кот"], "href": "?query=кот&wildcards=off", "data": {"class": "ref x"}},
                    {"tag": "span", "content": ["plain"]}
                ]
            })
        );
    }

    #[test]
    fn test_markup_defaults_do_not_override_explicit_style() {
        let value = convert(r#"<i style="color:red">x</i><u></u>"#);
        assert_eq!(
            value["content"][0],
            json!({"tag": "span", "content": ["x"], "style": {"color": "red", "fontStyle": "italic"}})
        );
        assert_eq!(
            value["content"][1],
            json!({"tag": "span", "content": [""], "style": {"textDecorationLine": "underline"}})
        );
    }

    #[test]
    fn test_void_elements_become_empty_spans() {
        let value = convert("a<br>b");
        assert_eq!(value["content"][1], json!({"tag": "span", "content": [""]}));
    }

    #[test]
    fn test_walk_elements_visits_in_order() {
        let content = to_structured(&parse_fragment("<div><i>a</i></div><b>b</b>"));
        let mut tags = Vec::new();
        walk_elements(&content, &mut |el| tags.push(el.content.len()));
        assert_eq!(tags, vec![2, 1, 1, 1]);
    }
}
