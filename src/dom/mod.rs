//! DOM Module - shared, lock-protected XML tree
//!
//! - `Node`: an element with a name, ordered attributes and ordered content
//! - `Content`: a text run or a shared child element
//! - `Document`: the unnamed root that holds top-level content

pub mod document;
pub mod node;

pub use document::{Document, ROOT_NAME};
pub use node::{is_valid_name, Attribute, Content, MatchCase, Node};
