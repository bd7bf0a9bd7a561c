use thiserror::Error;

/// Why a line of the export could not become an entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("line is empty")]
    EmptyLine,
    #[error("no definition body after `{0}`")]
    MissingBody(String),
    #[error("definition has no headword")]
    EmptyHeadword,
    #[error("`{0}` has an empty definition")]
    EmptyBody(String),
}

impl EntryError {
    /// The headword involved, when one could be read.
    pub fn headword(&self) -> Option<&str> {
        match self {
            EntryError::MissingBody(h) | EntryError::EmptyBody(h) => Some(h),
            EntryError::EmptyLine | EntryError::EmptyHeadword => None,
        }
    }
}
