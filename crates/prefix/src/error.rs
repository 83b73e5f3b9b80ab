//! Prefixer error types

use cssforge_tree::TreeError;
use thiserror::Error;

/// Prefixer errors
#[derive(Error, Debug)]
pub enum PrefixError {
    /// The static prefix table is inconsistent
    #[error("prefix table misconfigured: {0}")]
    Configuration(String),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

pub type PrefixResult<T> = Result<T, PrefixError>;
