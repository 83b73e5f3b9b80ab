//! Stylesheet node representation

use smallvec::SmallVec;
use std::fmt;

/// Unique identifier for a node in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Selector block or at-rule block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupData {
    /// Header text (selector list or at-rule prelude), empty for the root
    pub name: String,
}

impl GroupData {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Whether the header is an at-rule (`@media`, `@keyframes`, ...)
    pub fn is_at_rule(&self) -> bool {
        self.name.starts_with('@')
    }

    /// At-rule keyword without the `@`, lowercased (`keyframes`, `-webkit-keyframes`)
    pub fn at_keyword(&self) -> Option<String> {
        let rest = self.name.strip_prefix('@')?;
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '(' || c == '"' || c == '\'')
            .unwrap_or(rest.len());
        Some(rest[..end].to_ascii_lowercase())
    }

    /// Whether this is a `@keyframes` block, prefixed or not
    pub fn is_keyframes(&self) -> bool {
        self.at_keyword()
            .map(|k| k == "keyframes" || (k.starts_with('-') && k.ends_with("-keyframes")))
            .unwrap_or(false)
    }
}

/// One `name: value` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyData {
    pub name: String,
    pub value: String,
}

impl PropertyData {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Check for a trailing `!important`
    pub fn is_important(&self) -> bool {
        split_important(&self.value).1
    }
}

/// Split a value into its body and whether it carried `!important`
pub fn split_important(value: &str) -> (&str, bool) {
    let trimmed = value.trim_end();
    if let Some(pos) = trimmed.rfind('!') {
        let flag = trimmed[pos + 1..].trim();
        if flag.eq_ignore_ascii_case("important") {
            return (trimmed[..pos].trim_end(), true);
        }
    }
    (trimmed, false)
}

/// Kind of passthrough element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `/* ... */`
    Comment,
    /// Raw `@import` statement
    Import,
    /// Any other bare statement kept verbatim (`@charset`, `@namespace`)
    Statement,
}

/// Passthrough leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub kind: ElementKind,
    /// Comment body without delimiters, or the statement without its `;`
    pub text: String,
}

impl ElementData {
    pub fn new(kind: ElementKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// `/*! ... */` comments are kept by minifiers
    pub fn is_important_comment(&self) -> bool {
        self.kind == ElementKind::Comment && self.text.starts_with('!')
    }
}

/// Type of node and its payload
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group(GroupData),
    Property(PropertyData),
    Element(ElementData),
}

/// A node in the document
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,
    /// Node type and associated data
    pub kind: NodeKind,
    /// Owning group (None for the root and for detached nodes)
    pub parent: Option<NodeId>,
    /// Owned children, only ever non-empty for groups
    pub children: SmallVec<[NodeId; 8]>,
}

impl Node {
    /// Create a new node
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            parent: None,
            children: SmallVec::new(),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    pub fn is_property(&self) -> bool {
        matches!(self.kind, NodeKind::Property(_))
    }

    pub fn as_group(&self) -> Option<&GroupData> {
        match &self.kind {
            NodeKind::Group(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyData> {
        match &self.kind {
            NodeKind::Property(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_property_mut(&mut self) -> Option<&mut PropertyData> {
        match &mut self.kind {
            NodeKind::Property(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Name of a group or property
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Group(g) => Some(&g.name),
            NodeKind::Property(p) => Some(&p.name),
            NodeKind::Element(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_important() {
        assert_eq!(split_important("red !important"), ("red", true));
        assert_eq!(split_important("red ! IMPORTANT "), ("red", true));
        assert_eq!(split_important("red"), ("red", false));
        assert_eq!(split_important("url(a!b)"), ("url(a!b)", false));
    }

    #[test]
    fn test_at_keyword() {
        assert_eq!(GroupData::new("@media screen").at_keyword().as_deref(), Some("media"));
        assert_eq!(GroupData::new("@Keyframes spin").at_keyword().as_deref(), Some("keyframes"));
        assert_eq!(GroupData::new("a:hover").at_keyword(), None);
        assert!(GroupData::new("@-webkit-keyframes spin").is_keyframes());
        assert!(!GroupData::new("@font-face").is_keyframes());
    }

    #[test]
    fn test_important_comment() {
        assert!(ElementData::new(ElementKind::Comment, "! license").is_important_comment());
        assert!(!ElementData::new(ElementKind::Comment, " note ").is_important_comment());
    }
}
