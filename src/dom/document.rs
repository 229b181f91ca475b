//! XML Document - the unnamed top of a tree
//!
//! A `Document` is an ordinary `Node` with a reserved name. Its children are
//! the top-level text runs and elements; the root name itself is never
//! written out.

use std::fmt;
use std::io::Read;
use std::ops::Deref;
use std::str::FromStr;

use super::node::Node;
use crate::config;
use crate::core::encoding::decode_to_string;
use crate::core::parser::parse_document;
use crate::error::{ParseError, ReadError};
use crate::reader::buffered::read_document;
use crate::writer;

/// Name of the document root node; not a valid tag name, so no parsed or
/// user-built element can ever carry it
pub const ROOT_NAME: &str = "/";

/// A parsed (or programmatically built) document
#[derive(Clone, PartialEq)]
pub struct Document {
    root: Node,
}

impl Document {
    /// An empty document
    pub fn new() -> Self {
        Document {
            root: Node::with_name_unchecked(ROOT_NAME.to_string()),
        }
    }

    /// Parse a document from text
    ///
    /// # Errors
    ///
    /// See [`parse_document`].
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse_document(text)
    }

    /// Drain a reader into memory, then parse it
    ///
    /// The input may be UTF-8 (with or without BOM) or UTF-16 with a BOM.
    ///
    /// # Errors
    ///
    /// `ReadError::Io` if reading fails, `ReadError::Encoding` if the bytes
    /// cannot be decoded, `ReadError::Parse` if the text is not well formed.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReadError> {
        let text = read_document(reader)?;
        Ok(parse_document(&text)?)
    }

    /// Decode raw bytes, then parse them
    ///
    /// # Errors
    ///
    /// `ReadError::Encoding` or `ReadError::Parse`.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ReadError> {
        let text = decode_to_string(bytes)?;
        Ok(parse_document(&text)?)
    }

    /// The root node
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Give up the document wrapper and keep the root node
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Serialize with the process-wide line terminator
    pub fn to_xml(&self) -> String {
        self.to_xml_with(&config::formatter().line_terminator())
    }

    /// Serialize with an explicit line terminator
    pub fn to_xml_with(&self, line_terminator: &str) -> String {
        writer::document_to_string(self, line_terminator)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Document {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.root
    }
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_document(text)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("content", &self.root.children())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{is_valid_name, Content};
    use pretty_assertions::assert_eq;
    use std::io::{self, Cursor};

    #[test]
    fn test_root_name_is_reserved() {
        assert!(!is_valid_name(ROOT_NAME));
        assert!(Node::new(ROOT_NAME).is_err());
        assert_eq!(Document::new().name(), ROOT_NAME);
    }

    #[test]
    fn test_to_xml_never_writes_root() {
        let doc: Document = "<a><b>x</b></a>".parse().unwrap();
        assert_eq!(
            doc.to_xml_with("\n"),
            "<a>\n\t<b>\n\t\tx\n\t</b>\n\n</a>\n\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let doc = Document::new();
        doc.append_text("intro & more");
        let root = doc.append_child(Node::new("library").unwrap());
        root.set_attribute("name", "City \"Central\"").unwrap();
        root.set_bare_attribute("open").unwrap();
        let book = root.append_child(Node::new("book").unwrap());
        book.set_attribute("id", "b1").unwrap();
        book.set_attribute("note", "").unwrap();
        book.append_text("Tom's <first> book");
        book.append_child(Node::new("br").unwrap());
        book.append_text("second line");
        root.append_child(Node::new("shelf").unwrap());

        for terminator in ["\n", "\r\n"] {
            let text = doc.to_xml_with(terminator);
            let reparsed = Document::parse(&text).unwrap();
            assert_eq!(reparsed, doc, "terminator {terminator:?}");
        }
    }

    #[test]
    fn test_reparse_is_stable() {
        let input = "<r a='1'>t<c x=\"y z\"/>u</r>";
        let once = Document::parse(input).unwrap().to_xml_with("\n");
        let twice = Document::parse(&once).unwrap().to_xml_with("\n");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_from_reader() {
        let doc = Document::from_reader(Cursor::new(b"<a>1</a><b/>".to_vec())).unwrap();
        assert_eq!(doc.child_count(), 2);
    }

    #[test]
    fn test_from_reader_io_error() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            }
        }
        assert!(matches!(Document::from_reader(Failing), Err(ReadError::Io(_))));
    }

    #[test]
    fn test_from_reader_parse_error() {
        let err = Document::from_reader(Cursor::new(b"<a>".to_vec())).unwrap_err();
        assert!(matches!(err, ReadError::Parse(ParseError::Malformed { .. })));
    }

    #[test]
    fn test_from_bytes_utf16() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<é>ü</é>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let doc = Document::from_bytes(bytes).unwrap();
        let e = doc.element_children().remove(0);
        assert_eq!(e.name(), "é");
        assert_eq!(e.all_text(), "ü");
    }

    #[test]
    fn test_from_bytes_invalid_utf8() {
        let err = Document::from_bytes(vec![b'<', b'a', 0xC3, b'>']).unwrap_err();
        assert!(matches!(err, ReadError::Encoding { .. }));
    }

    #[test]
    fn test_clone_is_deep() {
        let doc = Document::parse("<a><b/></a>").unwrap();
        let copy = doc.clone();
        copy.element_children()[0].append_text("x");
        assert_eq!(doc.element_children()[0].child_count(), 1);
        assert_eq!(copy.element_children()[0].child_count(), 2);
    }

    #[test]
    fn test_into_root() {
        let root = Document::parse("t").unwrap().into_root();
        assert_eq!(root.children(), vec![Content::Text("t".to_string())]);
    }
}
