//! XML Node representation
//!
//! A `Node` is a named element with attributes and ordered content. Each of
//! its three parts sits behind its own `RwLock`, so a node can be read and
//! mutated from many threads at once: writers on the same collection are
//! serialized, unrelated nodes never block each other.
//!
//! Children are held as `Arc<Node>` handles so a caller can keep working on
//! a child it fetched while the parent keeps owning it. Children only enter
//! a tree by value (`append_child` takes a `Node`), which keeps the structure
//! a tree: a node can never become its own descendant.

use std::fmt;
use std::ptr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config;
use crate::error::{InvalidNameError, NameKind};
use crate::writer;

/// A single attribute; `value` is `None` for a valueless attribute such as
/// `disabled` in `<input disabled>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

/// One item of a node's content
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// A run of raw (unescaped) text
    Text(String),
    /// A child element
    Element(Arc<Node>),
}

impl Content {
    /// Get the text, if this is a text run
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            Content::Element(_) => None,
        }
    }

    /// Get the element handle, if this is an element
    pub fn as_element(&self) -> Option<&Arc<Node>> {
        match self {
            Content::Element(node) => Some(node),
            Content::Text(_) => None,
        }
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Content::Text(_))
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, Content::Element(_))
    }

    /// Identity check used for removal: text compares by value, elements by
    /// handle (two equal-looking elements are still different children)
    pub fn is_same(&self, other: &Content) -> bool {
        match (self, other) {
            (Content::Text(a), Content::Text(b)) => a == b,
            (Content::Element(a), Content::Element(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Case handling for tag-name searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchCase {
    /// Names must be identical
    #[default]
    Sensitive,
    /// Names compare equal after Unicode lowercasing
    Insensitive,
}

impl MatchCase {
    fn matches(self, candidate: &str, wanted: &str) -> bool {
        match self {
            MatchCase::Sensitive => candidate == wanted,
            MatchCase::Insensitive => candidate
                .chars()
                .flat_map(char::to_lowercase)
                .eq(wanted.chars().flat_map(char::to_lowercase)),
        }
    }
}

/// Check a tag or attribute name: non-empty, no whitespace, none of `< > ' " & /`
///
/// `=` is allowed, but an attribute name containing it does not survive a
/// round trip: `x=y="1"` reads back as attribute `x` with value `y=1`.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '\'' | '"' | '&' | '/'))
}

fn check_name(kind: NameKind, name: &str) -> Result<(), InvalidNameError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(InvalidNameError::new(kind, name))
    }
}

#[inline]
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

#[inline]
fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// An XML element
pub struct Node {
    name: RwLock<String>,
    attributes: RwLock<Vec<Attribute>>,
    content: RwLock<Vec<Content>>,
}

impl Node {
    /// Create an empty element
    ///
    /// # Errors
    ///
    /// Returns `InvalidNameError` if `name` is not a valid tag name.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidNameError> {
        let name = name.into();
        check_name(NameKind::Element, &name)?;
        Ok(Node::with_name_unchecked(name))
    }

    /// Create a node without validating its name (document root only)
    pub(crate) fn with_name_unchecked(name: String) -> Self {
        Node {
            name: RwLock::new(name),
            attributes: RwLock::new(Vec::new()),
            content: RwLock::new(Vec::new()),
        }
    }

    /// Tag name
    pub fn name(&self) -> String {
        read(&self.name).clone()
    }

    /// Rename this element
    ///
    /// # Errors
    ///
    /// Returns `InvalidNameError` if `name` is not a valid tag name.
    pub fn set_name(&self, name: impl Into<String>) -> Result<(), InvalidNameError> {
        let name = name.into();
        check_name(NameKind::Element, &name)?;
        *write(&self.name) = name;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Value of an attribute; `None` if it is absent or has no value
    pub fn attribute(&self, name: &str) -> Option<String> {
        read(&self.attributes)
            .iter()
            .find(|attr| attr.name == name)
            .and_then(|attr| attr.value.clone())
    }

    /// The full attribute entry, distinguishing "absent" from "no value"
    pub fn attribute_entry(&self, name: &str) -> Option<Attribute> {
        read(&self.attributes)
            .iter()
            .find(|attr| attr.name == name)
            .cloned()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        read(&self.attributes).iter().any(|attr| attr.name == name)
    }

    /// Set an attribute, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns `InvalidNameError` if `name` is not a valid attribute name.
    pub fn set_attribute(&self, name: &str, value: impl Into<String>) -> Result<(), InvalidNameError> {
        self.insert_attribute(name, Some(value.into()))
    }

    /// Set a valueless attribute (serialized as just its name)
    ///
    /// # Errors
    ///
    /// Returns `InvalidNameError` if `name` is not a valid attribute name.
    pub fn set_bare_attribute(&self, name: &str) -> Result<(), InvalidNameError> {
        self.insert_attribute(name, None)
    }

    /// Set or create an attribute; an existing attribute keeps its position
    pub(crate) fn insert_attribute(&self, name: &str, value: Option<String>) -> Result<(), InvalidNameError> {
        check_name(NameKind::Attribute, name)?;
        let mut attributes = write(&self.attributes);
        match attributes.iter_mut().find(|attr| attr.name == name) {
            Some(existing) => existing.value = value,
            None => attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
        Ok(())
    }

    /// Remove an attribute, returning it if it was present
    pub fn remove_attribute(&self, name: &str) -> Option<Attribute> {
        let mut attributes = write(&self.attributes);
        let index = attributes.iter().position(|attr| attr.name == name)?;
        Some(attributes.remove(index))
    }

    pub fn clear_attributes(&self) {
        write(&self.attributes).clear();
    }

    /// Snapshot of attribute names, in stored order
    pub fn attribute_names(&self) -> Vec<String> {
        read(&self.attributes)
            .iter()
            .map(|attr| attr.name.clone())
            .collect()
    }

    /// Snapshot of all attributes, in stored order
    pub fn attributes(&self) -> Vec<Attribute> {
        read(&self.attributes).clone()
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Append a run of raw text
    pub fn append_text(&self, text: impl Into<String>) {
        write(&self.content).push(Content::Text(text.into()));
    }

    /// Append a child element, returning a handle to it
    pub fn append_child(&self, child: Node) -> Arc<Node> {
        let child = Arc::new(child);
        write(&self.content).push(Content::Element(Arc::clone(&child)));
        child
    }

    /// Number of content items (text runs and elements)
    pub fn child_count(&self) -> usize {
        read(&self.content).len()
    }

    /// An element with no content serializes as self-closing
    pub fn is_empty(&self) -> bool {
        read(&self.content).is_empty()
    }

    /// Content item at `index`
    pub fn child(&self, index: usize) -> Option<Content> {
        read(&self.content).get(index).cloned()
    }

    /// Snapshot of all content items, in order
    pub fn children(&self) -> Vec<Content> {
        read(&self.content).clone()
    }

    /// Direct text children, in order
    pub fn text_children(&self) -> Vec<String> {
        read(&self.content)
            .iter()
            .filter_map(|item| item.as_text().map(str::to_string))
            .collect()
    }

    /// Direct element children, in order
    pub fn element_children(&self) -> Vec<Arc<Node>> {
        read(&self.content)
            .iter()
            .filter_map(|item| item.as_element().cloned())
            .collect()
    }

    /// Remove the content item at `index`, returning it
    pub fn remove_child_at(&self, index: usize) -> Option<Content> {
        let mut content = write(&self.content);
        (index < content.len()).then(|| content.remove(index))
    }

    /// Remove the first item that `is_same` as `item`; true if one was removed
    pub fn remove_child(&self, item: &Content) -> bool {
        let mut content = write(&self.content);
        match content.iter().position(|candidate| candidate.is_same(item)) {
            Some(index) => {
                content.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_children(&self) {
        write(&self.content).clear();
    }

    /// True if some direct content item `is_same` as `item`
    pub fn contains_child(&self, item: &Content) -> bool {
        read(&self.content).iter().any(|candidate| candidate.is_same(item))
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// All descendant elements named `name`, in document order
    ///
    /// Searches the whole subtree, not only direct children. Each node's
    /// content is snapshotted before descending, so no lock is held while
    /// visiting children.
    pub fn elements_by_tag_name(&self, name: &str, case: MatchCase) -> Vec<Arc<Node>> {
        let mut found = Vec::new();
        let mut stack = vec![self.children().into_iter()];

        while let Some(items) = stack.last_mut() {
            let Some(item) = items.next() else {
                stack.pop();
                continue;
            };
            if let Content::Element(element) = item {
                if case.matches(&read(&element.name), name) {
                    found.push(Arc::clone(&element));
                }
                stack.push(element.children().into_iter());
            }
        }
        found
    }

    /// Case-insensitive `elements_by_tag_name`
    pub fn elements_by_name(&self, name: &str) -> Vec<Arc<Node>> {
        self.elements_by_tag_name(name, MatchCase::Insensitive)
    }

    /// Concatenation of every text run in the subtree, depth first
    pub fn all_text(&self) -> String {
        let mut text = String::new();
        let mut stack = vec![self.children().into_iter()];

        while let Some(items) = stack.last_mut() {
            let next = items.next();
            match next {
                Some(Content::Text(run)) => text.push_str(&run),
                Some(Content::Element(element)) => stack.push(element.children().into_iter()),
                None => {
                    stack.pop();
                }
            }
        }
        text
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Serialize this subtree with the process-wide line terminator
    pub fn to_xml(&self) -> String {
        self.to_xml_with(0, &config::formatter().line_terminator())
    }

    /// Serialize this subtree at `depth` indent levels with an explicit terminator
    pub fn to_xml_with(&self, depth: usize, line_terminator: &str) -> String {
        writer::node_to_string(self, depth, line_terminator)
    }
}

impl Clone for Node {
    /// Deep copy: every descendant element is duplicated
    fn clone(&self) -> Self {
        let copy = self.shallow_copy();
        let mut pending = Vec::new();
        copy_content(self, &copy, &mut pending);
        while let Some((source, target)) = pending.pop() {
            copy_content(&source, &target, &mut pending);
        }
        copy
    }
}

impl Node {
    /// Name and attributes only
    fn shallow_copy(&self) -> Node {
        Node {
            name: RwLock::new(self.name()),
            attributes: RwLock::new(self.attributes()),
            content: RwLock::new(Vec::new()),
        }
    }

    /// Same name and same attribute set; content is not compared
    fn same_header(&self, other: &Node) -> bool {
        // Never hold two name locks at once
        if self.name() != other.name() {
            return false;
        }

        let mut ours = self.attributes();
        let mut theirs = other.attributes();
        ours.sort_by(|a, b| a.name.cmp(&b.name));
        theirs.sort_by(|a, b| a.name.cmp(&b.name));
        ours == theirs
    }
}

/// Fill `target` with a copy of `source`'s content; child elements are
/// copied shallowly and queued on `pending` to be filled later
fn copy_content(source: &Node, target: &Node, pending: &mut Vec<(Arc<Node>, Arc<Node>)>) {
    let copied = source
        .children()
        .into_iter()
        .map(|item| match item {
            Content::Text(text) => Content::Text(text),
            Content::Element(child) => {
                let twin = Arc::new(child.shallow_copy());
                pending.push((child, Arc::clone(&twin)));
                Content::Element(twin)
            }
        })
        .collect();
    *write(&target.content) = copied;
}

impl PartialEq for Node {
    /// Structural equality; attribute order is not significant
    fn eq(&self, other: &Self) -> bool {
        if ptr::eq(self, other) {
            return true;
        }
        if !self.same_header(other) {
            return false;
        }

        let mut pending = vec![(self.children(), other.children())];
        while let Some((ours, theirs)) = pending.pop() {
            if ours.len() != theirs.len() {
                return false;
            }
            for pair in ours.into_iter().zip(theirs) {
                match pair {
                    (Content::Text(a), Content::Text(b)) => {
                        if a != b {
                            return false;
                        }
                    }
                    (Content::Element(a), Content::Element(b)) => {
                        if Arc::ptr_eq(&a, &b) {
                            continue;
                        }
                        if !a.same_header(&b) {
                            return false;
                        }
                        pending.push((a.children(), b.children()));
                    }
                    _ => return false,
                }
            }
        }
        true
    }
}

impl fmt::Debug for Node {
    // Content is summarized, not walked, so deep trees format in constant stack
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name())
            .field("attributes", &self.attributes())
            .field("child_count", &self.child_count())
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

impl Drop for Node {
    // Unlink descendants iteratively so dropping a very deep tree does not
    // recurse once per level
    fn drop(&mut self) {
        let content = self.content.get_mut().unwrap_or_else(PoisonError::into_inner);
        if content.iter().all(Content::is_text) {
            return;
        }

        let mut pending = std::mem::take(content);
        while let Some(item) = pending.pop() {
            if let Content::Element(child) = item {
                if let Ok(mut child) = Arc::try_unwrap(child) {
                    pending.append(child.content.get_mut().unwrap_or_else(PoisonError::into_inner));
                }
            }
        }
    }
}
