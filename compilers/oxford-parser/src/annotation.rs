//! Detectors for the grammatical annotations the Oxford dictionary prints
//! inside a definition: part-of-speech labels, case government and
//! example sentences.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0, multispace1, one_of},
    combinator::{consumed, map, opt, recognize, verify},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use oxford_protocol::{
    Case, CaseSet, ContentNode, ContentTag, Example, FontStyle, Government, PartOfSpeech,
};

use crate::content::walk_elements;

/// Prepositions that may introduce a governed placeholder (`о чём-л.`).
const PREPOSITIONS: &[&str] = &[
    "без", "в", "во", "для", "до", "за", "из", "к", "ко", "между", "на", "над", "о", "об", "обо",
    "от", "перед", "по", "под", "при", "про", "с", "со", "у", "через",
];

/// Separators between a phrase and its translation.
const EXAMPLE_SEPARATORS: &[&str] = &[" — ", " – "];

pub fn is_cyrillic(c: char) -> bool {
    matches!(c, '\u{0400}'..='\u{04FF}')
}

pub fn detect_part_of_speech(label: &str) -> Option<PartOfSpeech> {
    label.parse().ok()
}

/// The first italic element whose whole text is a part-of-speech label.
pub fn part_of_speech_in(content: &ContentNode) -> Option<PartOfSpeech> {
    let mut found = None;
    walk_elements(content, &mut |el| {
        if found.is_some() {
            return;
        }
        let italic = el
            .style
            .as_ref()
            .map(|s| s.font_style == Some(FontStyle::Italic))
            .unwrap_or(false);
        if italic {
            found = detect_part_of_speech(&el.plain_text());
        }
    });
    found
}

fn placeholder_cases(pronoun: &str) -> CaseSet {
    match pronoun {
        "кого" => CaseSet::GENITIVE | CaseSet::ACCUSATIVE,
        "что" => CaseSet::ACCUSATIVE,
        "чего" => CaseSet::GENITIVE,
        "кому" | "чему" => CaseSet::DATIVE,
        "кем" | "чем" => CaseSet::INSTRUMENTAL,
        "ком" | "чём" => CaseSet::PREPOSITIONAL,
        _ => CaseSet::empty(),
    }
}

/// `что-л.`, `кому-либо`, `чём-нибудь`
fn placeholder(input: &str) -> IResult<&str, CaseSet> {
    let (input, pronoun) = alt((
        tag("кого"),
        tag("кому"),
        tag("кем"),
        tag("ком"),
        tag("чего"),
        tag("чему"),
        tag("чем"),
        tag("чём"),
        tag("что"),
    ))(input)?;
    let (input, _) = alt((tag("-либо"), tag("-нибудь"), tag("-л.")))(input)?;
    Ok((input, placeholder_cases(pronoun)))
}

fn preposition(input: &str) -> IResult<&str, &str> {
    verify(take_while1(is_cyrillic), |word: &str| {
        PREPOSITIONS.contains(&word.to_lowercase().as_str())
    })(input)
}

fn russian_government(input: &str) -> IResult<&str, (Option<&str>, CaseSet)> {
    pair(opt(terminated(preposition, multispace1)), placeholder)(input)
}

/// `(+ g.)`, `(+ a. or d.)`, `(+ i./p.)`
fn english_government(input: &str) -> IResult<&str, CaseSet> {
    let case = map(terminated(one_of("ngdaipNGDAIP"), char('.')), |c: char| {
        Case::from_oxford_abbreviation(c)
            .map(Case::flag)
            .unwrap_or(CaseSet::empty())
    });
    let separator = alt((
        recognize(tuple((multispace1, tag("or"), multispace1))),
        recognize(pair(one_of(",/"), multispace0)),
    ));

    map(
        delimited(
            pair(char('('), preceded(multispace0, pair(char('+'), multispace0))),
            separated_list1(separator, case),
            pair(multispace0, char(')')),
        ),
        |cases| cases.into_iter().fold(CaseSet::empty(), |acc, c| acc | c),
    )(input)
}

fn english_marker(input: &str) -> IResult<&str, Government> {
    map(consumed(english_government), |(text, cases)| Government {
        preposition: None,
        cases,
        text: text.to_string(),
    })(input)
}

fn russian_marker(input: &str) -> IResult<&str, Government> {
    map(
        consumed(russian_government),
        |(text, (preposition, cases)): (&str, (Option<&str>, CaseSet))| Government {
            preposition: preposition.map(str::to_string),
            cases,
            text: text.to_string(),
        },
    )(input)
}

/// Finds every case-government marker in `text`, in order of appearance.
///
/// Russian placeholders are only recognised at the start of a word, so
/// `нечто-л.` is not mistaken for `что-л.`.
pub fn find_government(text: &str) -> Vec<Government> {
    let mut found = Vec::new();
    let mut input = text;
    let mut prev: Option<char> = None;

    while let Some(c) = input.chars().next() {
        let at_word_start = !prev.map(|p| p.is_alphanumeric() || p == '-').unwrap_or(false);
        let marker = if at_word_start {
            alt((english_marker, russian_marker))(input)
        } else {
            english_marker(input)
        };
        if let Ok((next_input, government)) = marker {
            prev = government.text.chars().last();
            found.push(government);
            input = next_input;
            continue;
        }
        prev = Some(c);
        input = &input[c.len_utf8()..];
    }

    found
}

/// Splits `рассказать историю — to tell a story` into an [`Example`].
///
/// The source side must be Cyrillic and the translation side must not be,
/// otherwise the dash belongs to ordinary gloss text.
pub fn split_example(segment: &str) -> Option<Example> {
    let (source, translation) = EXAMPLE_SEPARATORS
        .iter()
        .find_map(|sep| segment.split_once(sep))?;
    let (source, translation) = (source.trim(), translation.trim());

    if source.is_empty() || translation.is_empty() {
        return None;
    }
    if !source.chars().any(is_cyrillic) || translation.chars().any(is_cyrillic) {
        return None;
    }

    Some(Example {
        source: source.to_string(),
        translation: translation.to_string(),
    })
}

fn push_lines(node: &ContentNode, lines: &mut Vec<String>) {
    match node {
        ContentNode::Text(text) => {
            if let Some(line) = lines.last_mut() {
                line.push_str(text);
            }
        }
        ContentNode::Element(el) => {
            let block = el.tag == ContentTag::Div;
            if block {
                lines.push(String::new());
            }
            for child in &el.content {
                push_lines(child, lines);
            }
            if block {
                lines.push(String::new());
            }
        }
    }
}

/// Visible text split at every `div` boundary, however deeply the `div` is
/// nested. Blank lines are dropped.
pub fn block_lines(content: &ContentNode) -> Vec<String> {
    let mut lines = vec![String::new()];
    push_lines(content, &mut lines);
    lines.retain(|line| !line.trim().is_empty());
    lines
}

/// Case-government markers, searched line by line so a marker at the start
/// of a block is not glued to the previous block's last word.
pub fn government_in(content: &ContentNode) -> Vec<Government> {
    block_lines(content)
        .iter()
        .flat_map(|line| find_government(line))
        .collect()
}

/// Examples found in the block-level lines of a structured-content tree.
pub fn examples_in(content: &ContentNode) -> Vec<Example> {
    block_lines(content)
        .iter()
        .flat_map(|line| line.split(';'))
        .filter_map(split_example)
        .collect()
}
