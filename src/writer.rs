//! XML serialization
//!
//! Writes a node and its subtree as indented XML text:
//! - one `INDENT` per nesting level
//! - attributes as ` name` or ` name="escaped"`
//! - empty elements self-close (`<a/>`)
//! - every content item is followed by the line terminator
//!
//! Uses an explicit stack instead of recursion so arbitrarily deep trees do
//! not overflow the call stack.

use crate::config::INDENT;
use crate::core::entities::encode_text;
use crate::dom::{Content, Document, Node};

/// Pending work on the serialization stack
enum Step {
    /// A content item at the given depth, followed by a line terminator
    Item(Content, usize),
    /// Line terminator after an element item, once its subtree is written
    Terminator,
    /// Closing tag of an element
    Close(String, usize),
}

/// Serialize `node` at `depth` indent levels
pub fn node_to_string(node: &Node, depth: usize, line_terminator: &str) -> String {
    let mut out = String::with_capacity(256);
    write_node(&mut out, node, depth, line_terminator);
    out
}

/// Serialize a whole document: each top-level item followed by `"\n"`, no
/// wrapping root tag
///
/// `line_terminator` applies inside elements only; the separator between
/// top-level items is always `"\n"`.
pub fn document_to_string(document: &Document, line_terminator: &str) -> String {
    let mut out = String::with_capacity(1024);
    for item in document.children() {
        match item {
            Content::Element(element) => write_node(&mut out, &element, 0, line_terminator),
            Content::Text(text) => out.push_str(&encode_text(&text)),
        }
        out.push('\n');
    }
    out
}

/// Append the serialization of `node` to `out`
pub fn write_node(out: &mut String, node: &Node, depth: usize, line_terminator: &str) {
    let mut stack: Vec<Step> = Vec::with_capacity(64);
    open_element(out, node, depth, line_terminator, &mut stack);

    while let Some(step) = stack.pop() {
        match step {
            Step::Item(Content::Element(element), depth) => {
                // Pushed first so it runs after the child's closing tag
                stack.push(Step::Terminator);
                open_element(out, &element, depth, line_terminator, &mut stack);
            }
            Step::Item(Content::Text(text), depth) => {
                indent(out, depth);
                out.push_str(&encode_text(&text));
                out.push_str(line_terminator);
            }
            Step::Terminator => out.push_str(line_terminator),
            Step::Close(name, depth) => {
                indent(out, depth);
                out.push_str("</");
                out.push_str(&name);
                out.push('>');
                out.push_str(line_terminator);
            }
        }
    }
}

/// Write the opening tag; for a non-empty element, schedule its content and
/// closing tag
fn open_element(out: &mut String, node: &Node, depth: usize, line_terminator: &str, stack: &mut Vec<Step>) {
    let name = node.name();
    indent(out, depth);
    out.push('<');
    out.push_str(&name);

    for attr in node.attributes() {
        out.push(' ');
        out.push_str(&attr.name);
        if let Some(value) = attr.value {
            out.push_str("=\"");
            out.push_str(&encode_text(&value));
            out.push('"');
        }
    }

    let children = node.children();
    if children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    out.push_str(line_terminator);
    stack.push(Step::Close(name, depth));
    // Reverse so the first child is popped first
    for item in children.into_iter().rev() {
        stack.push(Step::Item(item, depth + 1));
    }
}

#[inline]
fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
