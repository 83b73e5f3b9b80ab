//! Tree error types

use thiserror::Error;

/// Tree operation result type
pub type TreeResult<T> = Result<T, TreeError>;

/// Tree errors
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Node {0} is already attached to a parent")]
    AlreadyAttached(u32),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid node type for operation")]
    InvalidNodeType,
}
