//! cssforge vendor prefixer
//!
//! Table-driven pass that adds vendor-prefixed copies of declarations,
//! legacy gradient syntax and prefixed `@keyframes` blocks for engines
//! without native support.

mod error;
mod gradient;
mod options;
mod prefixer;
mod special;
mod table;

pub use error::{PrefixError, PrefixResult};
pub use options::{PrefixOptions, Vendor};
pub use prefixer::{add_vendor_prefixes, PrefixStats};
pub use table::{lookup, validate_table, SpecialFn, Transform};
