//! Recursive-descent document parser
//!
//! One left-to-right scan per nesting level:
//! 1. comments and `<? ?>` directives are removed from the whole document
//! 2. text between tags is trimmed, unescaped and kept if non-empty
//! 3. each opening tag becomes a `Node`; unless it self-closes, the text up
//!    to its matching closing tag is parsed into it recursively
//!
//! Nothing is recovered: the first structural problem aborts the parse.
//! Recursion depth equals element nesting and is capped at `MAX_DEPTH`.

use super::attributes::parse_tag_header;
use super::entities::{decode_text, strip_comments_and_directives};
use super::scanner::Scanner;
use crate::dom::{Document, Node};
use crate::error::ParseError;

/// Deepest element nesting accepted by the parser
pub const MAX_DEPTH: usize = 256;

/// Parse a complete document
///
/// # Errors
///
/// `Malformed` for unmatched `<`/`>`, a missing or stray closing tag, an
/// unterminated quote or nesting deeper than `MAX_DEPTH`; `InvalidName` for
/// an unusable tag or attribute name.
pub fn parse_document(text: &str) -> Result<Document, ParseError> {
    let cleaned = strip_comments_and_directives(text);
    let document = Document::new();

    if let Err(err) = parse_content(&document, &cleaned, 0) {
        log::debug!("parse aborted: {err}");
        return Err(err);
    }

    log::debug!(
        "parsed document of {} bytes into {} top-level items",
        text.len(),
        document.child_count()
    );
    Ok(document)
}

/// Parse `segment` (the text between an element's tags) into `owner`
///
/// `depth` is the nesting level of `owner` (0 for the document root).
pub fn parse_content(owner: &Node, segment: &str, depth: usize) -> Result<(), ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::malformed("nesting too deep", segment));
    }

    let mut scanner = Scanner::new(segment);
    let mut text_start = 0;

    while !scanner.is_eof() {
        let Some(tag_start) = scanner.find_tag_start() else {
            // No more tags: what is left is trailing text
            append_text(owner, scanner.tail(text_start));
            return Ok(());
        };
        append_text(owner, scanner.slice(text_start, tag_start));

        let Some(tag_end) = scanner.find_tag_end(tag_start) else {
            return Err(ParseError::malformed("< and > mismatch", scanner.tail(tag_start)));
        };
        let header = scanner.slice(tag_start, tag_end + 1);
        let node = parse_tag_header(header)?;

        if header.ends_with("/>") {
            owner.append_child(node);
            text_start = tag_end + 1;
        } else {
            let name = node.name();
            let body_start = tag_end + 1;
            let Some(close_start) = scanner.find_closing_tag(&name, body_start) else {
                return Err(ParseError::malformed(
                    "no closing tag",
                    scanner.tail(tag_start),
                ));
            };

            parse_content(&node, scanner.slice(body_start, close_start), depth + 1)?;
            owner.append_child(node);

            let Some(close_end) = scanner.find_tag_end(close_start) else {
                return Err(ParseError::malformed("< and > mismatch", scanner.tail(close_start)));
            };
            text_start = close_end + 1;
        }
        scanner.set_position(text_start);
    }

    Ok(())
}

/// Keep a text run if anything is left after trimming
fn append_text(owner: &Node, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        owner.append_text(decode_text(trimmed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Attribute, Content};
    use crate::error::NameKind;

    fn element(item: &Content) -> &Node {
        item.as_element().expect("expected an element")
    }

    #[test]
    fn test_parse_simple() {
        let doc = parse_document("<root>hello</root>").unwrap();
        assert_eq!(doc.child_count(), 1);
        let root = doc.element_children().remove(0);
        assert_eq!(root.name(), "root");
        assert_eq!(root.text_children(), vec!["hello"]);
    }

    #[test]
    fn test_self_closing_equivalence() {
        for input in ["<a/>", "<a></a>", "<a>   \n </a>", "<a />"] {
            let doc = parse_document(input).unwrap();
            let a = doc.element_children().remove(0);
            assert_eq!(a.name(), "a", "input {input:?}");
            assert!(a.is_empty(), "input {input:?}");
        }
    }

    #[test]
    fn test_attribute_tokenization() {
        let doc = parse_document("<a x=\"1 2\" y='3' z>body</a>").unwrap();
        let a = doc.element_children().remove(0);
        assert_eq!(
            a.attributes(),
            vec![
                Attribute { name: "x".into(), value: Some("1 2".into()) },
                Attribute { name: "y".into(), value: Some("3".into()) },
                Attribute { name: "z".into(), value: None },
            ]
        );
    }

    #[test]
    fn test_mixed_content_order() {
        let doc = parse_document("<p>Greetings <b>friend</b>, welcome <i>home</i> now</p>").unwrap();
        let p = doc.element_children().remove(0);
        let items = p.children();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].as_text(), Some("Greetings"));
        assert_eq!(element(&items[1]).name(), "b");
        assert_eq!(items[2].as_text(), Some(", welcome"));
        assert_eq!(element(&items[3]).name(), "i");
        assert_eq!(items[4].as_text(), Some("now"));
        assert_eq!(p.all_text(), "Greetingsfriend, welcomehomenow");
    }

    #[test]
    fn test_text_unescaped_and_trimmed() {
        let doc = parse_document("  <t>  a &lt; b &amp;&amp; c &gt; d  </t>  ").unwrap();
        let t = doc.element_children().remove(0);
        assert_eq!(t.text_children(), vec!["a < b && c > d"]);
    }

    #[test]
    fn test_unicode_whitespace_trimmed() {
        // U+00A0 counts as whitespace around text runs
        let doc = parse_document("<t>\u{a0}a b\u{a0}</t>").unwrap();
        let t = doc.element_children().remove(0);
        assert_eq!(t.text_children(), vec!["a b"]);
    }

    #[test]
    fn test_top_level_text() {
        let doc = parse_document("lead <a/> tail &amp; end").unwrap();
        let items = doc.children();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_text(), Some("lead"));
        assert_eq!(items[2].as_text(), Some("tail & end"));
    }

    #[test]
    fn test_empty_documents() {
        assert_eq!(parse_document("").unwrap().child_count(), 0);
        assert_eq!(parse_document(" \n\t ").unwrap().child_count(), 0);
        assert_eq!(parse_document("<!-- only a comment -->").unwrap().child_count(), 0);
    }

    #[test]
    fn test_comments_and_declaration_removed() {
        let input = "<?xml version=\"1.0\"?>\n<!-- c --><r><!-- <x> -->v</r>";
        let doc = parse_document(input).unwrap();
        let r = doc.element_children().remove(0);
        assert_eq!(r.children(), vec![Content::Text("v".to_string())]);
    }

    #[test]
    fn test_nested_same_name() {
        let doc = parse_document("<div><div>inner</div><div/>after</div>").unwrap();
        let outer = doc.element_children().remove(0);
        assert_eq!(outer.child_count(), 3);
        assert_eq!(outer.element_children()[0].all_text(), "inner");
        assert_eq!(outer.all_text(), "innerafter");
    }

    #[test]
    fn test_prefix_named_sibling() {
        let doc = parse_document("<a><ab>x</ab>y</a>").unwrap();
        let a = doc.element_children().remove(0);
        assert_eq!(a.element_children()[0].name(), "ab");
        assert_eq!(a.text_children(), vec!["y"]);
    }

    #[test]
    fn test_malformed_mismatched_close() {
        let err = parse_document("<a><b></a>").unwrap_err();
        assert!(err.is_malformed(), "{err:?}");
    }

    #[test]
    fn test_malformed_unterminated_tag() {
        let err = parse_document("<a").unwrap_err();
        assert_eq!(
            err,
            ParseError::Malformed {
                reason: "< and > mismatch",
                fragment: "<a".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_cases() {
        for input in [
            "<a>",
            "<a>text",
            "</a>",
            "<a></a",
            "<>",
            "<a x='1>x</a>",
            "text <",
            "<a><!-- open</a>",
        ] {
            let err = parse_document(input).unwrap_err();
            assert!(err.is_malformed(), "input {input:?} gave {err:?}");
        }
    }

    #[test]
    fn test_invalid_name_surfaces() {
        match parse_document("<a b&c=1/>").unwrap_err() {
            ParseError::InvalidName(err) => {
                assert_eq!(err.kind, NameKind::Attribute);
                assert_eq!(err.name, "b&c");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_depth_limit() {
        let ok = "<d>".repeat(MAX_DEPTH) + &"</d>".repeat(MAX_DEPTH);
        assert!(parse_document(&ok).is_ok());

        let deep = "<d>".repeat(MAX_DEPTH + 1) + &"</d>".repeat(MAX_DEPTH + 1);
        match parse_document(&deep).unwrap_err() {
            ParseError::Malformed { reason, .. } => assert_eq!(reason, "nesting too deep"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_content_into_existing_node() {
        let owner = Node::new("list").unwrap();
        parse_content(&owner, "<li>1</li><li>2</li>", 0).unwrap();
        assert_eq!(owner.elements_by_name("LI").len(), 2);
    }
}
