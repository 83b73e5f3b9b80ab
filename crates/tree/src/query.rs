//! Tree queries (sibling lookup by name, typed descendant search)

use crate::node::{Node, NodeId};
use crate::tree::Document;

/// Trait for querying a stylesheet document
pub trait Queryable {
    /// Other children of the same group, in order
    fn siblings(&self, id: NodeId) -> Vec<NodeId>;

    /// First sibling group or property with exactly this name
    fn find_sibling(&self, id: NodeId, name: &str) -> Option<NodeId>;

    /// Whether a sibling property has this exact name and value
    fn has_sibling_declaration(&self, id: NodeId, name: &str, value: &str) -> bool;

    /// Properties that are direct children of a group
    fn properties_of(&self, group: NodeId) -> Vec<NodeId>;

    /// All descendants matching a node predicate, pre-order
    fn descendants_where(&self, id: NodeId, predicate: fn(&Node) -> bool) -> Vec<NodeId>;
}

impl Queryable for Document {
    fn siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.parent(id) {
            Some(parent) => self
                .children(parent)
                .into_iter()
                .filter(|&child| child != id)
                .collect(),
            None => Vec::new(),
        }
    }

    fn find_sibling(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.siblings(id)
            .into_iter()
            .find(|&sibling| self.get(sibling).and_then(|n| n.name()) == Some(name))
    }

    fn has_sibling_declaration(&self, id: NodeId, name: &str, value: &str) -> bool {
        self.siblings(id).into_iter().any(|sibling| {
            self.get(sibling)
                .and_then(|n| n.as_property())
                .map(|p| p.name == name && p.value == value)
                .unwrap_or(false)
        })
    }

    fn properties_of(&self, group: NodeId) -> Vec<NodeId> {
        self.children(group)
            .into_iter()
            .filter(|&child| self.get(child).map(|n| n.is_property()).unwrap_or(false))
            .collect()
    }

    fn descendants_where(&self, id: NodeId, predicate: fn(&Node) -> bool) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&node_id| self.get(node_id).map(predicate).unwrap_or(false))
            .collect()
    }
}
