//! Elixir NIF surface
//!
//! Documents live in Rust behind a `ResourceArc`; callers get terms back only
//! for the parts they ask for.

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

use crate::config;
use crate::core::entities::{decode_text, encode_text, strip_comments_and_directives};
use crate::dom::{Document, MatchCase};
use crate::resource::{DocumentRef, DocumentResource};
use crate::term::{self, node_to_term, nodes_to_term, str_to_binary};

/// Parse a document (returns {:ok, doc} or {:error, reason})
#[rustler::nif(schedule = "DirtyCpu")]
fn parse<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    match Document::from_bytes(input.as_slice().to_vec()) {
        Ok(doc) => {
            let arc = ResourceArc::new(DocumentResource::new(doc));
            Ok((term::ok(), arc).encode(env))
        }
        Err(e) => Ok((term::error(), e.to_string()).encode(env)),
    }
}

/// Serialize a document with the process-wide line terminator
#[rustler::nif(schedule = "DirtyCpu")]
fn to_xml<'a>(env: Env<'a>, doc_ref: DocumentRef) -> NifResult<Term<'a>> {
    Ok(str_to_binary(env, &doc_ref.doc.to_xml()))
}

/// Get the first top-level element of a document, or nil
#[rustler::nif]
fn get_root<'a>(env: Env<'a>, doc_ref: DocumentRef) -> NifResult<Term<'a>> {
    match doc_ref.doc.element_children().first() {
        Some(root) => Ok(node_to_term(env, root)),
        None => Ok(rustler::types::atom::nil().encode(env)),
    }
}

/// All descendant elements named `name`, in document order
#[rustler::nif]
fn find_elements<'a>(
    env: Env<'a>,
    doc_ref: DocumentRef,
    name: &str,
    case_sensitive: bool,
) -> NifResult<Term<'a>> {
    let case = if case_sensitive {
        MatchCase::Sensitive
    } else {
        MatchCase::Insensitive
    };
    let found = doc_ref.doc.elements_by_tag_name(name, case);
    Ok(nodes_to_term(env, &found))
}

/// Concatenated text of a whole document
#[rustler::nif]
fn all_text<'a>(env: Env<'a>, doc_ref: DocumentRef) -> NifResult<Term<'a>> {
    Ok(str_to_binary(env, &doc_ref.doc.all_text()))
}

#[rustler::nif]
fn escape<'a>(env: Env<'a>, text: &str) -> NifResult<Term<'a>> {
    Ok(str_to_binary(env, &encode_text(text)))
}

#[rustler::nif]
fn unescape<'a>(env: Env<'a>, text: &str) -> NifResult<Term<'a>> {
    Ok(str_to_binary(env, &decode_text(text)))
}

#[rustler::nif]
fn strip_comments<'a>(env: Env<'a>, text: &str) -> NifResult<Term<'a>> {
    Ok(str_to_binary(env, &strip_comments_and_directives(text)))
}

#[rustler::nif]
fn line_terminator<'a>(env: Env<'a>) -> NifResult<Term<'a>> {
    Ok(str_to_binary(env, &config::formatter().line_terminator()))
}

#[rustler::nif]
fn set_line_terminator<'a>(env: Env<'a>, terminator: &str) -> NifResult<Term<'a>> {
    config::formatter().set_line_terminator(terminator);
    Ok(term::ok().encode(env))
}

rustler::init!("Elixir.SyncXml.Native");
