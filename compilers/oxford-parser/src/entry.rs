use crate::error::EntryError;

/// Separates headword and body in lines that carry no markup.
pub const PLAIN_SEPARATOR: &str = " — ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// HTML fragment starting at the first `<`
    Markup,
    /// Free text after ` — `
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub headword: String,
    pub body: String,
    pub format: BodyFormat,
}

/// Splits one export line into headword and definition body.
///
/// Literal `\n` escapes left by the extraction tool are removed first.
pub fn split_entry(line: &str) -> Result<RawEntry, EntryError> {
    let line = line.replace("\\n", "");
    let line = line.trim();
    if line.is_empty() {
        return Err(EntryError::EmptyLine);
    }

    let (headword, body, format) = if let Some(pos) = line.find('<') {
        (&line[..pos], &line[pos..], BodyFormat::Markup)
    } else if let Some((headword, body)) = line.split_once(PLAIN_SEPARATOR) {
        (headword, body, BodyFormat::Plain)
    } else {
        return Err(EntryError::MissingBody(line.to_string()));
    };

    let headword = headword.trim();
    let body = body.trim();
    if headword.is_empty() {
        return Err(EntryError::EmptyHeadword);
    }
    if body.is_empty() {
        return Err(EntryError::EmptyBody(headword.to_string()));
    }

    Ok(RawEntry {
        headword: headword.to_string(),
        body: body.to_string(),
        format,
    })
}
