//! cssforge tree - stylesheet document model
//!
//! Arena-backed tree of groups, properties and passthrough elements, plus the
//! renderer that turns a tree back into CSS text.

mod node;
mod tree;
mod error;
mod query;
mod render;

pub use node::{Node, NodeId, NodeKind, GroupData, PropertyData, ElementData, ElementKind, split_important};
pub use tree::Document;
pub use error::{TreeError, TreeResult};
pub use query::Queryable;
