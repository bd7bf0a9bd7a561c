use serde::ser::{Serialize, SerializeTuple, Serializer};

use crate::content::ContentNode;
use crate::ids::SequenceId;

/// One entry of the `definitions` column.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Definition {
    StructuredContent { content: ContentNode },
}

/// A row of a term bank (schema v3).
///
/// Serialized as a fixed eight-element array:
/// `[term, reading, definitionTags, rules, score, definitions, sequence, termTags]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRecord {
    pub term: String,
    /// Empty when the reading equals the term or cannot be derived.
    pub reading: String,
    pub definition_tags: String,
    pub rules: String,
    pub score: i64,
    pub definitions: Vec<Definition>,
    pub sequence: SequenceId,
    pub term_tags: String,
}

impl TermRecord {
    pub const FIELD_COUNT: usize = 8;

    pub fn new(term: impl Into<String>, sequence: SequenceId, content: ContentNode) -> Self {
        Self {
            term: term.into(),
            reading: String::new(),
            definition_tags: String::new(),
            rules: String::new(),
            score: 0,
            definitions: vec![Definition::StructuredContent { content }],
            sequence,
            term_tags: String::new(),
        }
    }
}

impl Serialize for TermRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_tuple(Self::FIELD_COUNT)?;
        row.serialize_element(&self.term)?;
        row.serialize_element(&self.reading)?;
        row.serialize_element(&self.definition_tags)?;
        row.serialize_element(&self.rules)?;
        row.serialize_element(&self.score)?;
        row.serialize_element(&self.definitions)?;
        row.serialize_element(&self.sequence)?;
        row.serialize_element(&self.term_tags)?;
        row.end()
    }
}
