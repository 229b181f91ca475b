//! Elixir Term Conversion Utilities
//!
//! Converts tree content to Elixir terms:
//! - element: `{:element, name, [{attr, value | nil}], children}`
//! - text: a binary

use std::sync::Arc;

use rustler::{Encoder, Env, NewBinary, Term};

use crate::dom::{Content, Node};

rustler::atoms! {
    ok,
    error,
    element,
}

/// Convert an element and its subtree to an Elixir term
pub fn node_to_term<'a>(env: Env<'a>, node: &Node) -> Term<'a> {
    let name_term = str_to_binary(env, &node.name());

    // Build lists back to front with list_prepend
    let mut attrs = Term::list_new_empty(env);
    for attr in node.attributes().iter().rev() {
        let value = match &attr.value {
            Some(value) => str_to_binary(env, value),
            None => rustler::types::atom::nil().encode(env),
        };
        attrs = attrs.list_prepend((str_to_binary(env, &attr.name), value).encode(env));
    }

    let children = content_to_term(env, &node.children());
    (element(), name_term, attrs, children).encode(env)
}

/// Convert a content sequence to a list term
pub fn content_to_term<'a>(env: Env<'a>, items: &[Content]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for item in items.iter().rev() {
        let term = match item {
            Content::Text(text) => str_to_binary(env, text),
            Content::Element(child) => node_to_term(env, child),
        };
        list = list.list_prepend(term);
    }
    list
}

/// Convert a list of elements to a list term
pub fn nodes_to_term<'a>(env: Env<'a>, nodes: &[Arc<Node>]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for node in nodes.iter().rev() {
        list = list.list_prepend(node_to_term(env, node));
    }
    list
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
