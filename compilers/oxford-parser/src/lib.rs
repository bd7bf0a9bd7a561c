//! Parsing of the Oxford Russian–English export.
//!
//! The extraction tool writes one entry per line: the headword followed by
//! either an HTML fragment or plain text. Everything that depends on that
//! layout lives in this crate; [`parse_entry`] is the only entry point the
//! converter needs.

pub mod annotation;
pub mod content;
pub mod entry;
pub mod error;
pub mod markup;
pub mod plain;
pub mod reading;
pub mod token;
pub mod tree;

use oxford_protocol::{ContentNode, Example, Government, PartOfSpeech};

use crate::entry::{split_entry, BodyFormat};
pub use crate::error::EntryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub headword: String,
    pub reading: Option<String>,
    pub part_of_speech: Option<PartOfSpeech>,
    pub government: Vec<Government>,
    pub examples: Vec<Example>,
    /// The full definition, annotations included
    pub content: ContentNode,
    pub format: BodyFormat,
}

/// Primary entry point: export line -> structured entry
pub fn parse_entry(line: &str) -> Result<ParsedEntry, EntryError> {
    let raw = split_entry(line)?;

    let entry = match raw.format {
        BodyFormat::Markup => {
            let nodes = tree::parse_fragment(&raw.body);
            let content = content::to_structured(&nodes);
            if content.plain_text().trim().is_empty() {
                return Err(EntryError::EmptyBody(raw.headword));
            }

            ParsedEntry {
                reading: reading::extract_reading(&nodes),
                part_of_speech: annotation::part_of_speech_in(&content),
                government: annotation::government_in(&content),
                examples: annotation::examples_in(&content),
                content,
                headword: raw.headword,
                format: raw.format,
            }
        }
        BodyFormat::Plain => {
            let body = plain::parse_body(&raw.body);
            if body.is_empty() {
                return Err(EntryError::EmptyBody(raw.headword));
            }

            ParsedEntry {
                reading: None,
                part_of_speech: body.part_of_speech.as_ref().map(|(_, pos)| *pos),
                examples: body.examples(),
                content: body.to_content(),
                government: body.government,
                headword: raw.headword,
                format: raw.format,
            }
        }
    };

    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const OXFORD_LINE: &str = concat!(
        r#"рассказать<div style="margin-left:0em">◉ <span style="color:dimgray">расска|з<u>а</u>ть</span> "#,
        r#"<i>pf.</i> of <a href="рассказывать">рассказывать</a></div>"#,
        r#"<div style="margin-left:1em">(+ a.) to tell; о чём-л. to tell about</div>"#,
        r#"<div style="margin-left:2em"><b>рассказать историю</b> — to tell a story</div>\n"#,
    );

    #[test]
    fn test_markup_entry() {
        let entry = parse_entry(OXFORD_LINE).unwrap();

        assert_eq!(entry.headword, "рассказать");
        assert_eq!(entry.reading.as_deref(), Some("рассказа\u{301}ть"));
        assert_eq!(entry.part_of_speech, Some(PartOfSpeech::Verb));
        assert_eq!(entry.format, BodyFormat::Markup);

        let markers: Vec<&str> = entry.government.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(markers, vec!["(+ a.)", "о чём-л."]);

        assert_eq!(entry.examples.len(), 1);
        assert_eq!(entry.examples[0].translation, "to tell a story");

        let text = entry.content.plain_text();
        assert!(text.contains("о чём-л. to tell about"));
    }

    #[test]
    fn test_plain_entry_keeps_annotations_in_gloss() {
        let entry =
            parse_entry("рассказать — (что-л., о чём-л.) рассказать историю — to tell a story").unwrap();

        assert_eq!(entry.headword, "рассказать");
        assert_eq!(entry.reading, None);
        assert_eq!(entry.format, BodyFormat::Plain);
        assert_eq!(entry.government.len(), 2);

        let json = serde_json::to_string(&entry.content).unwrap();
        assert!(json.contains("что-л., о чём-л."));
        assert!(json.contains("рассказать историю"));
        assert!(json.contains("to tell a story"));
    }

    #[test]
    fn test_empty_bodies_are_rejected() {
        assert_eq!(
            parse_entry("дом<div> </div>"),
            Err(EntryError::EmptyBody("дом".to_string()))
        );
        assert_eq!(parse_entry(""), Err(EntryError::EmptyLine));
    }

    #[test]
    fn test_government_in_second_block() {
        let entry =
            parse_entry("бояться<div><i>impf.</i> бояться</div><div>кого-л. to fear</div>").unwrap();
        assert_eq!(entry.government.len(), 1);
        assert_eq!(entry.government[0].text, "кого-л.");
        assert_eq!(
            entry.government[0].cases,
            oxford_protocol::CaseSet::GENITIVE | oxford_protocol::CaseSet::ACCUSATIVE
        );
    }

    #[test]
    fn test_deeply_nested_markup() {
        let line = format!("дом{}house", "<div><span>".repeat(20_000));
        let entry = parse_entry(&line).unwrap();
        assert!(serde_json::to_string(&entry.content).unwrap().contains("house"));
    }

    proptest! {
        #[test]
        fn test_never_panics(line in "\\PC{0,200}") {
            let _ = parse_entry(&line);
        }

        #[test]
        fn test_never_panics_on_markup_soup(line in "[а-я ]{1,8}[<>/=\"'&;#a-z0-9 —()+.\\-]{0,120}") {
            if let Ok(entry) = parse_entry(&line) {
                prop_assert!(!entry.headword.is_empty());
                prop_assert!(serde_json::to_string(&entry.content).is_ok());
            }
        }
    }
}
