use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Lowercased attribute name
    pub name: String,
    /// Value with character references decoded; empty for bare attributes
    pub value: Cow<'a, str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawToken<'a> {
    /// `<name attr="value">` or `<name/>`
    StartTag {
        name: String,
        attributes: Vec<Attribute<'a>>,
        self_closing: bool,
    },
    /// `</name>`
    EndTag(String),
    /// Character data between tags
    Text(Cow<'a, str>),
}
