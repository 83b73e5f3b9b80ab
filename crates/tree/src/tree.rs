//! Document tree structure

use rustc_hash::FxHashMap;
use std::fmt;

use crate::error::{TreeError, TreeResult};
use crate::node::{ElementData, ElementKind, GroupData, Node, NodeId, NodeKind, PropertyData};

/// Stylesheet document that owns all nodes
///
/// Ownership always runs parent -> children; the `parent` field of a node is
/// an index back into the arena, never a second owner.
pub struct Document {
    /// All live nodes
    nodes: FxHashMap<NodeId, Node>,
    /// Next available node ID
    next_id: u32,
    /// Root group (empty name)
    root_id: NodeId,
}

impl Document {
    /// Create a new document holding only the root group
    pub fn new() -> Self {
        let root_id = NodeId::new(0);
        let root = Node::new(root_id, NodeKind::Group(GroupData::new("")));

        let mut nodes = FxHashMap::default();
        nodes.insert(root_id, root);

        Self {
            nodes,
            next_id: 1,
            root_id,
        }
    }

    /// Get the root group ID
    pub fn root(&self) -> NodeId {
        self.root_id
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    fn node(&self, id: NodeId) -> TreeResult<&Node> {
        self.get(id).ok_or(TreeError::NodeNotFound(id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut Node> {
        self.get_mut(id).ok_or(TreeError::NodeNotFound(id.0))
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(id, kind));
        id
    }

    /// Create a detached group
    pub fn create_group(&mut self, name: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Group(GroupData::new(name)))
    }

    /// Create a detached property
    pub fn create_property(&mut self, name: impl Into<String>, value: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Property(PropertyData::new(name, value)))
    }

    /// Create a detached passthrough element
    pub fn create_element(&mut self, kind: ElementKind, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(kind, text)))
    }

    /// Check that `child` may be attached under `parent`
    fn check_attach(&self, parent_id: NodeId, child_id: NodeId) -> TreeResult<()> {
        if !self.node(parent_id)?.is_group() {
            return Err(TreeError::InvalidNodeType);
        }
        let child = self.node(child_id)?;
        if child.parent.is_some() || child_id == self.root_id {
            return Err(TreeError::AlreadyAttached(child_id.0));
        }
        // Attaching a node under its own subtree would create a cycle
        if self.ancestors(parent_id).contains(&child_id) || parent_id == child_id {
            return Err(TreeError::InvalidOperation(format!(
                "{} cannot be attached below itself",
                child_id
            )));
        }
        Ok(())
    }

    /// Insert a detached child at `index` in the parent's children
    pub fn insert_child(&mut self, parent_id: NodeId, index: usize, child_id: NodeId) -> TreeResult<()> {
        self.check_attach(parent_id, child_id)?;

        let parent = self.node_mut(parent_id)?;
        let index = index.min(parent.children.len());
        parent.children.insert(index, child_id);

        self.node_mut(child_id)?.parent = Some(parent_id);
        Ok(())
    }

    /// Append a detached child to a group
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> TreeResult<()> {
        let len = self.node(parent_id)?.children.len();
        self.insert_child(parent_id, len, child_id)
    }

    /// Insert a detached node right before `anchor`
    pub fn insert_before(&mut self, anchor: NodeId, child_id: NodeId) -> TreeResult<()> {
        let (parent_id, index) = self.position(anchor)?;
        self.insert_child(parent_id, index, child_id)
    }

    /// Insert a detached node right after `anchor`
    pub fn insert_after(&mut self, anchor: NodeId, child_id: NodeId) -> TreeResult<()> {
        let (parent_id, index) = self.position(anchor)?;
        self.insert_child(parent_id, index + 1, child_id)
    }

    /// Parent and index of an attached node
    pub fn position(&self, id: NodeId) -> TreeResult<(NodeId, usize)> {
        let parent_id = self
            .node(id)?
            .parent
            .ok_or_else(|| TreeError::InvalidOperation(format!("{} has no parent", id)))?;
        let index = self
            .node(parent_id)?
            .children
            .iter()
            .position(|c| *c == id)
            .ok_or(TreeError::NodeNotFound(id.0))?;
        Ok((parent_id, index))
    }

    /// Detach a node from its parent, clearing its back-reference.
    /// The subtree stays in the arena and may be re-attached.
    pub fn detach(&mut self, id: NodeId) -> TreeResult<()> {
        let parent_id = match self.node(id)?.parent {
            Some(parent_id) => parent_id,
            None => return Ok(()),
        };

        self.node_mut(parent_id)?.children.retain(|c| *c != id);
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    /// Detach a node and discard its whole subtree
    pub fn remove(&mut self, id: NodeId) -> TreeResult<()> {
        if id == self.root_id {
            return Err(TreeError::InvalidOperation("cannot remove the root".to_string()));
        }
        self.detach(id)?;

        let mut stack = vec![id];
        let mut removed: usize = 0;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        log::trace!("removed {} and {} descendants", id, removed.saturating_sub(1));
        Ok(())
    }

    /// Deep-clone a subtree into fresh nodes. The clone is detached; the
    /// caller decides where it goes (usually `insert_after` the source).
    pub fn clone_subtree(&mut self, id: NodeId) -> TreeResult<NodeId> {
        let kind = self.node(id)?.kind.clone();
        let children = self.node(id)?.children.to_vec();

        let copy = self.alloc(kind);
        for child in children {
            let child_copy = self.clone_subtree(child)?;
            self.append_child(copy, child_copy)?;
        }
        log::trace!("cloned {} as {}", id, copy);
        Ok(copy)
    }

    /// Get all children of a node
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|n| n.children.to_vec())
            .unwrap_or_default()
    }

    /// Get the owning group of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Walk up from a node to the root (nearest first, node itself excluded)
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent_id) = current {
            result.push(parent_id);
            current = self.parent(parent_id);
        }
        result
    }

    /// Iterate over all descendants of a node (depth-first, pre-order)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        self.collect_descendants(id, &mut result);
        result
    }

    fn collect_descendants(&self, id: NodeId, result: &mut Vec<NodeId>) {
        if let Some(node) = self.get(id) {
            for &child_id in &node.children {
                result.push(child_id);
                self.collect_descendants(child_id, result);
            }
        }
    }

    /// Replace the name of a group or property
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> TreeResult<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Group(g) => g.name = name.into(),
            NodeKind::Property(p) => p.name = name.into(),
            NodeKind::Element(_) => return Err(TreeError::InvalidNodeType),
        }
        Ok(())
    }

    /// Replace the value of a property
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> TreeResult<()> {
        let property = self
            .node_mut(id)?
            .as_property_mut()
            .ok_or(TreeError::InvalidNodeType)?;
        property.value = value.into();
        Ok(())
    }

    /// Get the number of live nodes, including detached ones
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the document holds nothing but the root
    pub fn is_empty(&self) -> bool {
        self.node(self.root_id)
            .map(|root| root.children.is_empty())
            .unwrap_or(true)
    }

    /// Pretty print the tree for debugging
    pub fn pretty_print(&self) -> String {
        let mut output = String::new();
        self.print_node(self.root_id, 0, &mut output);
        output
    }

    fn print_node(&self, id: NodeId, depth: usize, output: &mut String) {
        let indent = "  ".repeat(depth);

        if let Some(node) = self.get(id) {
            match &node.kind {
                NodeKind::Group(_) if id == self.root_id => {
                    output.push_str("#document\n");
                }
                NodeKind::Group(group) => {
                    output.push_str(&format!("{}[{}]\n", indent, group.name));
                }
                NodeKind::Property(prop) => {
                    output.push_str(&format!("{}{} = {:?}\n", indent, prop.name, prop.value));
                }
                NodeKind::Element(elem) => {
                    output.push_str(&format!("{}#{:?}: {:?}\n", indent, elem.kind, elem.text));
                }
            }

            for &child_id in &node.children {
                self.print_node(child_id, depth + 1, output);
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty_print())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let rule = doc.create_group("a");
        let color = doc.create_property("color", "red");
        let margin = doc.create_property("margin", "0");
        doc.append_child(doc.root(), rule).unwrap();
        doc.append_child(rule, color).unwrap();
        doc.append_child(rule, margin).unwrap();
        (doc, rule, color, margin)
    }

    #[test]
    fn test_build_tree() {
        let (doc, rule, color, margin) = sample();
        assert_eq!(doc.len(), 4);
        assert_eq!(doc.children(rule), vec![color, margin]);
        assert_eq!(doc.parent(color), Some(rule));
        assert_eq!(doc.ancestors(color), vec![rule, doc.root()]);
    }

    #[test]
    fn test_second_parent_rejected() {
        let (mut doc, rule, color, _) = sample();
        let other = doc.create_group("b");
        doc.append_child(doc.root(), other).unwrap();
        assert!(matches!(doc.append_child(other, color), Err(TreeError::AlreadyAttached(_))));
        assert_eq!(doc.parent(color), Some(rule));
    }

    #[test]
    fn test_cycle_rejected() {
        let (mut doc, rule, _, _) = sample();
        doc.detach(rule).unwrap();
        let inner = doc.create_group("@media print");
        doc.append_child(rule, inner).unwrap();
        assert!(doc.append_child(inner, rule).is_err());
    }

    #[test]
    fn test_insert_before_after() {
        let (mut doc, rule, color, margin) = sample();
        let first = doc.create_property("-webkit-x", "1");
        let last = doc.create_property("z", "1");
        doc.insert_before(color, first).unwrap();
        doc.insert_after(margin, last).unwrap();
        assert_eq!(doc.children(rule), vec![first, color, margin, last]);
    }

    #[test]
    fn test_detach_clears_parent() {
        let (mut doc, rule, color, margin) = sample();
        doc.detach(color).unwrap();
        assert_eq!(doc.parent(color), None);
        assert_eq!(doc.children(rule), vec![margin]);
        // still alive, can be re-attached
        doc.append_child(rule, color).unwrap();
        assert_eq!(doc.children(rule), vec![margin, color]);
    }

    #[test]
    fn test_remove_discards_subtree() {
        let (mut doc, rule, color, _) = sample();
        doc.remove(rule).unwrap();
        assert!(doc.get(rule).is_none());
        assert!(doc.get(color).is_none());
        assert_eq!(doc.len(), 1);
        assert!(doc.is_empty());
        assert!(doc.remove(doc.root()).is_err());
    }

    #[test]
    fn test_clone_subtree_is_independent() {
        let (mut doc, rule, color, _) = sample();
        let copy = doc.clone_subtree(rule).unwrap();
        assert_eq!(doc.parent(copy), None);

        let copied = doc.children(copy);
        assert_eq!(copied.len(), 2);
        assert_ne!(copied[0], color);
        assert_eq!(doc.parent(copied[0]), Some(copy));

        doc.set_value(copied[0], "blue").unwrap();
        assert_eq!(doc.get(color).unwrap().as_property().unwrap().value, "red");

        doc.insert_after(rule, copy).unwrap();
        assert_eq!(doc.children(doc.root()), vec![rule, copy]);
    }

    #[test]
    fn test_rename_and_set_value() {
        let (mut doc, rule, color, _) = sample();
        doc.rename(rule, "a, b").unwrap();
        doc.set_value(color, "blue").unwrap();
        assert_eq!(doc.get(rule).unwrap().name(), Some("a, b"));
        assert!(matches!(doc.set_value(rule, "x"), Err(TreeError::InvalidNodeType)));
    }
}
