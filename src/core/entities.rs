//! XML Escape Codec
//!
//! Converts between raw text and XML-safe text using exactly five entities:
//! `&amp;` `&quot;` `&apos;` `&lt;` `&gt;`. No numeric references, no DTD
//! entities. Also strips comments and processing instructions ahead of parsing.
//!
//! Uses Cow so text that needs no change is returned borrowed.

use memchr::memchr;
use memchr::memmem;
use std::borrow::Cow;

/// The five substitutions, in escaping order (`&` first)
const ESCAPES: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('"', "&quot;"),
    ('\'', "&apos;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
];

/// Escape text for XML output (text content and attribute values)
///
/// A single left-to-right pass, equivalent to applying the substitutions in
/// order with `&` first, so no entity introduced here is escaped twice.
pub fn encode_text(input: &str) -> Cow<'_, str> {
    // Fast path: check if any escaping needed
    if !input
        .bytes()
        .any(|b| matches!(b, b'<' | b'>' | b'&' | b'"' | b'\''))
    {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match ESCAPES.iter().find(|(raw, _)| *raw == c) {
            Some((_, entity)) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Undo `encode_text`
///
/// Only the five entities are recognised; anything else after `&` is kept
/// verbatim. Decoding is single pass, so `&amp;lt;` becomes `&lt;` and not `<`.
pub fn decode_text(input: &str) -> Cow<'_, str> {
    // Fast path: check if there are any entities using SIMD
    if memchr(b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

fn decode_entities(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut pos = 0;

    while let Some(offset) = memchr(b'&', &bytes[pos..]) {
        let amp = pos + offset;
        result.push_str(&input[pos..amp]);

        match decode_entity(&input[amp..]) {
            Some((c, consumed)) => {
                result.push(c);
                pos = amp + consumed;
            }
            None => {
                // Unknown entity or bare ampersand, keep as-is
                result.push('&');
                pos = amp + 1;
            }
        }
    }
    result.push_str(&input[pos..]);
    result
}

/// Match one of the five entities at the start of `rest`, returning the
/// character and the number of bytes it spans
#[inline]
fn decode_entity(rest: &str) -> Option<(char, usize)> {
    ESCAPES
        .iter()
        .rev()
        .find(|(_, entity)| rest.starts_with(entity))
        .map(|(raw, entity)| (*raw, entity.len()))
}

/// Remove `<!-- ... -->` comments, then `<? ... ?>` directives
///
/// Each run ends at the first terminator after its opener (shortest match,
/// spanning newlines). An opener without a terminator is left in place; the
/// parser reports it later if it breaks the document.
pub fn strip_comments_and_directives(input: &str) -> Cow<'_, str> {
    match strip_runs(input, "<!--", "-->") {
        Cow::Borrowed(s) => strip_runs(s, "<?", "?>"),
        Cow::Owned(s) => Cow::Owned(strip_runs(&s, "<?", "?>").into_owned()),
    }
}

fn strip_runs<'a>(input: &'a str, open: &str, close: &str) -> Cow<'a, str> {
    let opener = memmem::Finder::new(open);
    let closer = memmem::Finder::new(close);
    let bytes = input.as_bytes();

    let Some(first) = opener.find(bytes) else {
        return Cow::Borrowed(input);
    };

    let mut result = String::with_capacity(input.len());
    let mut pos = 0;
    let mut start = first;

    loop {
        // The terminator must follow the whole opener: "<!-->" is not a comment
        let body = start + open.len();
        let Some(end) = closer.find(&bytes[body..]) else {
            break;
        };
        result.push_str(&input[pos..start]);
        pos = body + end + close.len();

        match opener.find(&bytes[pos..]) {
            Some(next) => start = pos + next,
            None => break,
        }
    }

    result.push_str(&input[pos..]);
    Cow::Owned(result)
}
