//! Core XML parsing primitives
//!
//! - Scanner: delimiter detection using memchr
//! - Entities: escaping and unescaping with Cow (zero-copy when possible)
//! - Attributes: tag header tokenizing and attribute extraction
//! - Encoding: BOM detection and conversion to UTF-8
//! - Parser: recursive-descent document parser

pub mod attributes;
pub mod encoding;
pub mod entities;
pub mod parser;
pub mod scanner;
