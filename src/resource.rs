//! ResourceArc Wrappers
//!
//! Parsed documents handed to the BEAM as opaque references.

use crate::dom::Document;
use rustler::ResourceArc;

/// Wrapper for a parsed `Document` that can be stored in a ResourceArc
///
/// The tree locks its own nodes, so the resource needs no extra mutex.
pub struct DocumentResource {
    pub doc: Document,
}

impl DocumentResource {
    pub fn new(doc: Document) -> Self {
        DocumentResource { doc }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for DocumentResource {}

/// Type alias for document ResourceArc
pub type DocumentRef = ResourceArc<DocumentResource>;
