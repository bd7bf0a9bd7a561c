use std::borrow::Cow;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{alphanumeric1, char, digit1, hex_digit1, multispace0, one_of},
    combinator::{map, map_opt, map_res, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::token::{Attribute, RawToken, Span};

/// Elements that never have children, whether or not they are written `<br/>`.
pub const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "wbr", "meta", "link", "input"];

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

fn tag_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic()),
        take_while(is_name_char),
    ))(input)
}

fn attribute_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
        take_while1(|c: char| !c.is_whitespace() && !matches!(c, '>' | '<' | '"' | '\'' | '=' | '`')),
    ))(input)
}

fn attribute(input: &str) -> IResult<&str, Attribute<'_>> {
    let (input, name) =
        take_while1(|c: char| !c.is_whitespace() && !matches!(c, '>' | '<' | '/' | '=' | '"' | '\''))(input)?;
    let (input, value) = opt(preceded(
        tuple((multispace0, char('='), multispace0)),
        attribute_value,
    ))(input)?;

    Ok((
        input,
        Attribute {
            name: name.to_ascii_lowercase(),
            value: decode_entities(value.unwrap_or("")),
        },
    ))
}

fn start_tag(input: &str) -> IResult<&str, RawToken<'_>> {
    let (input, _) = char('<')(input)?;
    let (input, name) = tag_name(input)?;
    let (input, attributes) = many0(preceded(multispace0, attribute))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, slash) = opt(char('/'))(input)?;
    let (input, _) = char('>')(input)?;

    Ok((
        input,
        RawToken::StartTag {
            name: name.to_ascii_lowercase(),
            attributes,
            self_closing: slash.is_some(),
        },
    ))
}

fn end_tag(input: &str) -> IResult<&str, RawToken<'_>> {
    map(
        delimited(tag("</"), tag_name, pair(multispace0, char('>'))),
        |name: &str| RawToken::EndTag(name.to_ascii_lowercase()),
    )(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("<!--"), take_until("-->"), tag("-->"))(input)
}

/// `<!DOCTYPE ...>` and `<?xml ...?>`
fn declaration(input: &str) -> IResult<&str, &str> {
    delimited(
        pair(char('<'), one_of("!?")),
        take_while(|c: char| c != '>'),
        char('>'),
    )(input)
}

fn text(input: &str) -> IResult<&str, RawToken<'_>> {
    map(take_while1(|c: char| c != '<'), |s: &str| {
        RawToken::Text(decode_entities(s))
    })(input)
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "shy" => '\u{00AD}',
        "ndash" => '–',
        "mdash" => '—',
        "hellip" => '…',
        "laquo" => '«',
        "raquo" => '»',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "middot" => '·',
        "acute" => '´',
        _ => return None,
    };
    Some(c)
}

fn numeric_reference(input: &str) -> IResult<&str, char> {
    map_opt(
        preceded(
            char('#'),
            alt((
                preceded(
                    one_of("xX"),
                    map_res(hex_digit1, |h: &str| u32::from_str_radix(h, 16)),
                ),
                map_res(digit1, |d: &str| d.parse::<u32>()),
            )),
        ),
        char::from_u32,
    )(input)
}

fn character_reference(input: &str) -> IResult<&str, char> {
    delimited(
        char('&'),
        alt((numeric_reference, map_opt(alphanumeric1, named_entity))),
        char(';'),
    )(input)
}

/// Decodes `&amp;`, `&#769;`, `&#x301;` and the other references in
/// [`named_entity`]. Unknown references are kept literally.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match character_reference(rest) {
            Ok((next, c)) => {
                out.push(c);
                rest = next;
            }
            Err(_) => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Splits an HTML fragment into tags and text.
///
/// Never fails: a `<` that does not open a tag, comment or declaration is
/// returned as text. Comments and declarations are dropped.
pub fn tokenize(original_input: &str) -> Vec<(Span, RawToken<'_>)> {
    let mut input = original_input;
    let mut result = Vec::new();

    while !input.is_empty() {
        let start = original_input.len() - input.len();

        let parse_res: IResult<&str, Option<RawToken>> = alt((
            map(comment, |_| None),
            map(end_tag, Some),
            map(start_tag, Some),
            map(declaration, |_| None),
            map(text, Some),
        ))(input);

        match parse_res {
            Ok((next_input, token)) => {
                let end = original_input.len() - next_input.len();
                if let Some(token) = token {
                    result.push((Span::new(start, end), token));
                }
                input = next_input;
            }
            Err(_) => {
                // Only a stray '<' gets here; `text` accepts everything else.
                let (lt, next_input) = input.split_at(1);
                result.push((Span::new(start, start + 1), RawToken::Text(Cow::Borrowed(lt))));
                input = next_input;
            }
        }
    }

    result
}

/// Attributes are looked up by lowercased name; the first occurrence wins.
pub fn find_attribute<'t>(attributes: &'t [Attribute<'_>], name: &str) -> Option<&'t str> {
    attributes
        .iter()
        .find(|a| a.name == name)
        .map(|a| a.value.as_ref())
}

pub(crate) fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}
