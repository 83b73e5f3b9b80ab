//! cssforge optimizer
//!
//! Semantics-preserving rewrites over a parsed stylesheet: dead code
//! removal, value compression and shorthand merging.

mod optimizer;
mod options;
pub mod shorthand;
pub mod values;

pub use optimizer::{compress_value, optimize, OptimizeStats};
pub use options::OptimizeOptions;
