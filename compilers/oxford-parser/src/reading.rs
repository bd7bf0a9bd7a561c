use crate::tree::{find_element, ElementNode, Node};

/// Combining acute accent (U+0301) used to mark stress.
pub const STRESS_MARK: char = '\u{0301}';

/// Marks the headword line in the Oxford export.
pub const READING_MARKER: char = '◉';

const VOWELS: &str = "аеиоуыэюяАЕИОУЫЭЮЯ";

fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

fn is_reading_span(el: &ElementNode) -> bool {
    el.name == "span"
        && el
            .attr("style")
            .map(|style| style.replace(' ', "").contains("color:dimgray"))
            .unwrap_or(false)
}

/// The export underlines the stressed vowel; a lone vowel gains a stress mark.
fn stress(underlined: &str) -> String {
    let mut chars = underlined.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if is_vowel(c) => format!("{c}{STRESS_MARK}"),
        _ => underlined.to_string(),
    }
}

/// Extracts the stressed reading from the headword line.
///
/// The first `div` must contain [`READING_MARKER`]; the reading is the first
/// dim-gray `span` inside it, with `|` syllable breaks and optional-affix
/// parentheses dropped and everything after the first `,` or `;` cut off.
/// Words with a single vowel carry no stress mark.
pub fn extract_reading(nodes: &[Node]) -> Option<String> {
    let first_div = find_element(nodes, &|el| el.name == "div")?;
    if !first_div.text().contains(READING_MARKER) {
        return None;
    }

    let span = first_div.find(&is_reading_span)?;

    let mut raw = String::new();
    for child in &span.children {
        match child {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if el.name == "u" => raw.push_str(&stress(&el.text())),
            Node::Element(_) => {}
        }
    }

    // возвраща|ть(ся), ю(сь) -> возвращаться
    let raw: String = raw.chars().filter(|&c| !matches!(c, '|' | '(' | ')')).collect();

    let base = raw
        .split(|c: char| matches!(c, ',' | ';' | '('))
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() {
        return None;
    }

    let vowel_count = base.chars().filter(|&c| is_vowel(c)).count();
    if vowel_count == 1 {
        return Some(base.chars().filter(|&c| c != STRESS_MARK).collect());
    }

    Some(base.to_string())
}
