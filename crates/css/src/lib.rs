//! cssforge CSS front end
//!
//! Stylesheet parser producing a `cssforge_tree::Document`, and the color
//! value model shared by the optimizer and the prefixer.

mod color;
mod error;
mod parser;
pub mod syntax;

pub use color::Color;
pub use error::{CssError, CssResult, SourceLocation};
pub use parser::{parse, CssParser};
pub use syntax::{collapse_whitespace, find_top_level};
