//! SyncXml - a small, thread-safe XML tree
//!
//! - `core`: escaping, scanning, tag headers and the document parser
//! - `dom`: the shared `Node` tree and its `Document` root
//! - `reader`: stream input
//! - `writer`: indented serialization
//! - `config`: the process-wide line terminator
//!
//! Every `Node` guards its own name, attributes and content, so one tree can
//! be read and mutated from many threads at once. Children are shared
//! `Arc<Node>` handles that are only ever created by appending an owned node,
//! which keeps the structure a tree.
//!
//! With the `nif` feature the crate also builds as an Elixir NIF.

pub mod config;
pub mod core;
pub mod dom;
pub mod error;
pub mod reader;
pub mod writer;

#[cfg(feature = "nif")]
mod nif;
#[cfg(feature = "nif")]
mod resource;
#[cfg(feature = "nif")]
mod term;

pub use config::{formatter, Formatter};
pub use dom::{Attribute, Content, Document, MatchCase, Node};
pub use error::{InvalidNameError, NameKind, ParseError, ReadError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(all(feature = "nif", feature = "mimalloc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_display_from_str_round_trip() {
        let _guard = config::global_test_lock();
        let doc: Document = "<?xml version=\"1.0\"?>\n<!-- catalog -->\n\
            <catalog><item id='1' sale>Tea &amp; biscuits</item><item id=\"2\"/></catalog>"
            .parse()
            .unwrap();

        let text = doc.to_string();
        let reparsed: Document = text.parse().unwrap();
        assert_eq!(reparsed, doc);
        assert_eq!(reparsed.to_string(), text);

        let items = reparsed.elements_by_name("ITEM");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].attribute("id").as_deref(), Some("1"));
        assert!(items[0].has_attribute("sale"));
        assert_eq!(items[0].attribute("sale"), None);
        assert_eq!(reparsed.all_text(), "Tea & biscuits");
    }

    #[test]
    fn test_concurrent_build_and_serialize() {
        let doc = Document::new();
        let list = doc.append_child(Node::new("list").unwrap());

        thread::scope(|s| {
            for t in 0..4 {
                let list = Arc::clone(&list);
                s.spawn(move || {
                    for i in 0..50 {
                        let item = list.append_child(Node::new("item").unwrap());
                        item.set_attribute("n", format!("{t}-{i}")).unwrap();
                        item.append_text("x");
                    }
                });
            }
            s.spawn(|| {
                for _ in 0..20 {
                    // Any snapshot must be well formed
                    let text = doc.to_xml_with("\n");
                    Document::parse(&text).unwrap();
                }
            });
        });

        assert_eq!(list.child_count(), 200);
        let reparsed = Document::parse(&doc.to_xml_with("\n")).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_concurrent_terminator_reads() {
        let _guard = config::global_test_lock();
        let node = Node::new("a").unwrap();
        node.append_text("b");
        let expected = node.to_xml_with(0, config::default_line_terminator());

        thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..100 {
                    formatter().set_line_terminator(config::default_line_terminator());
                }
            });
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        assert_eq!(node.to_xml(), expected);
                    }
                });
            }
        });
    }

    #[test]
    fn test_global_terminator_applies_to_later_output() {
        let _guard = config::global_test_lock();
        let doc = Document::parse("<a>x</a>t").unwrap();
        let a = doc.element_children().remove(0);

        formatter().set_line_terminator("\r\n");
        let node_xml = a.to_xml();
        let node_display = a.to_string();
        let doc_xml = doc.to_xml();
        let doc_display = doc.to_string();
        formatter().reset();

        assert_eq!(node_xml, "<a>\r\n\tx\r\n</a>\r\n");
        assert_eq!(node_display, node_xml);
        assert_eq!(doc_xml, "<a>\r\n\tx\r\n</a>\r\n\nt\n");
        assert_eq!(doc_display, doc_xml);
        assert_eq!(a.to_xml(), a.to_xml_with(0, config::default_line_terminator()));
    }

    #[test]
    fn test_stream_and_text_agree() {
        let input = "<r><a k=\"v\">1</a>2</r>";
        let from_text = Document::parse(input).unwrap();
        let from_stream = Document::from_reader(input.as_bytes()).unwrap();
        assert_eq!(from_stream, from_text);
    }
}
