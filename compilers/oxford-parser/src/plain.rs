use nom::{
    bytes::complete::take_until,
    character::complete::char,
    combinator::recognize,
    sequence::delimited,
    IResult,
};
use oxford_protocol::{
    ContentNode, ContentStyle, ContentTag, Element, Example, Government, PartOfSpeech,
};

use crate::annotation::{detect_part_of_speech, find_government, split_example};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sense {
    Gloss(String),
    Example(Example),
}

/// A definition body written without markup, e.g.
/// `pf. (что-л., о чём-л.) рассказать историю — to tell a story; to narrate`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainBody {
    /// The label as written and the word class it implies.
    pub part_of_speech: Option<(String, PartOfSpeech)>,
    /// Parenthesised government group, verbatim.
    pub grammar: Option<String>,
    pub government: Vec<Government>,
    pub senses: Vec<Sense>,
}

fn grammar_group(input: &str) -> IResult<&str, &str> {
    recognize(delimited(char('('), take_until(")"), char(')')))(input)
}

pub fn parse_body(body: &str) -> PlainBody {
    let mut parsed = PlainBody::default();
    let mut rest = body.trim();

    if let Some((label, tail)) = rest.split_once(char::is_whitespace) {
        if let Some(pos) = detect_part_of_speech(label) {
            parsed.part_of_speech = Some((label.to_string(), pos));
            rest = tail.trim_start();
        }
    } else if let Some(pos) = detect_part_of_speech(rest) {
        parsed.part_of_speech = Some((rest.to_string(), pos));
        rest = "";
    }

    // A leading group only counts as grammar when it names a governed case.
    if let Ok((tail, group)) = grammar_group(rest) {
        let government = find_government(group);
        if !government.is_empty() {
            parsed.grammar = Some(group.to_string());
            parsed.government = government;
            rest = tail.trim_start();
        }
    }

    parsed.senses = rest
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match split_example(s) {
            Some(example) => Sense::Example(example),
            None => Sense::Gloss(s.to_string()),
        })
        .collect();

    parsed
}

impl PlainBody {
    pub fn is_empty(&self) -> bool {
        self.part_of_speech.is_none() && self.grammar.is_none() && self.senses.is_empty()
    }

    pub fn examples(&self) -> Vec<Example> {
        self.senses
            .iter()
            .filter_map(|s| match s {
                Sense::Example(example) => Some(example.clone()),
                Sense::Gloss(_) => None,
            })
            .collect()
    }

    pub fn to_content(&self) -> ContentNode {
        let mut content = Vec::new();

        let labels = [
            self.part_of_speech.as_ref().map(|(label, _)| (label.as_str(), "pos")),
            self.grammar.as_deref().map(|grammar| (grammar, "gram")),
        ];
        for (text, class) in labels.into_iter().flatten() {
            let span = Element::new(ContentTag::Span, vec![ContentNode::text(text)])
                .with_style(ContentStyle::italic())
                .with_class(class);
            content.push(span.into());
            content.push(ContentNode::text(" "));
        }

        for sense in &self.senses {
            let div = match sense {
                Sense::Gloss(text) => {
                    Element::new(ContentTag::Div, vec![ContentNode::text(text.as_str())])
                        .with_class("gloss")
                }
                Sense::Example(example) => {
                    let source = Element::new(
                        ContentTag::Span,
                        vec![ContentNode::text(example.source.as_str())],
                    )
                    .with_style(ContentStyle::bold());
                    let translation = Element::new(
                        ContentTag::Span,
                        vec![ContentNode::text(example.translation.as_str())],
                    );
                    Element::new(
                        ContentTag::Div,
                        vec![source.into(), ContentNode::text(" — "), translation.into()],
                    )
                    .with_class("example")
                }
            };
            content.push(div.into());
        }

        Element::new(ContentTag::Div, content).into()
    }
}
