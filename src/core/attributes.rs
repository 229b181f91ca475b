//! Tag Header Parsing
//!
//! Turns an opening tag such as `<name a=1 b="two words" c='3' d/>` into a
//! bare `Node` (name and attributes, no content).

use super::entities::decode_text;
use crate::dom::Node;
use crate::error::ParseError;

/// Split a tag body on whitespace, except whitespace inside a quoted span
///
/// A span opened by `"` ends at the next `"` and one opened by `'` at the
/// next `'`. Quote characters are dropped from the tokens, so
/// `x="1 2"` yields the token `x=1 2`. Empty tokens are never produced.
///
/// # Errors
///
/// Returns `Malformed` if a quoted span is never closed.
pub fn split_tag_tokens(body: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in body.chars() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }

    if quote.is_some() {
        return Err(ParseError::malformed("unterminated quote in tag", body));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Build a bare `Node` from an opening tag
///
/// The `<`, an optional trailing `/` and the `>` are stripped. The first token
/// is the tag name; each later token is an attribute, split on its first `=`.
/// A token without `=` is a valueless attribute; otherwise the value is
/// unescaped (so `x=""` is an empty value, not a missing one).
///
/// # Errors
///
/// `Malformed` for an empty tag, a closing tag or an unterminated quote;
/// `InvalidName` if the tag or an attribute name is not a valid name.
pub fn parse_tag_header(tag: &str) -> Result<Node, ParseError> {
    let body = tag.strip_prefix('<').unwrap_or(tag);
    let body = body.strip_suffix('>').unwrap_or(body);
    let body = body.strip_suffix('/').unwrap_or(body);

    if body.starts_with('/') {
        return Err(ParseError::malformed("unexpected closing tag", tag));
    }

    let mut tokens = split_tag_tokens(body)?.into_iter();
    let Some(name) = tokens.next() else {
        return Err(ParseError::malformed("empty tag", tag));
    };

    let node = Node::new(name)?;
    for token in tokens {
        match token.split_once('=') {
            Some((attr_name, value)) => {
                node.insert_attribute(attr_name, Some(decode_text(value).into_owned()))?
            }
            None => node.insert_attribute(&token, None)?,
        }
    }

    log::trace!("parsed tag header {tag:?}");
    Ok(node)
}
