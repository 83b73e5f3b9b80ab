//! cssforge - stylesheet compiler
//!
//! Parses CSS into a document tree, optimizes it, adds vendor prefixes and
//! renders it back to text. Each stage is toggled by [`Config`].

use serde::Deserialize;
use thiserror::Error;

pub use cssforge_css::{parse, CssError};
pub use cssforge_optimize::{optimize, OptimizeOptions, OptimizeStats};
pub use cssforge_prefix::{add_vendor_prefixes, PrefixError, PrefixOptions, PrefixStats, Vendor};
pub use cssforge_tree::{Document, TreeError};

/// Compilation errors
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("parse error: {0}")]
    Parse(#[from] CssError),

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("prefix error: {0}")]
    Prefix(#[from] PrefixError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run the optimizer pass
    pub optimize: bool,
    /// Run the vendor prefixer pass
    pub prefix: bool,
    /// Compressed rather than pretty output
    pub compressed: bool,
    pub optimizer: OptimizeOptions,
    pub prefixer: PrefixOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            optimize: true,
            prefix: true,
            compressed: true,
            optimizer: OptimizeOptions::default(),
            prefixer: PrefixOptions::default(),
        }
    }
}

impl Config {
    /// Load a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> CompileResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Compile a stylesheet: parse, optimize, prefix, render
pub fn compile(text: &str, config: &Config) -> CompileResult<String> {
    let mut doc = parse(text)?;

    if config.optimize {
        optimize(&mut doc, &config.optimizer)?;
    }
    if config.prefix {
        add_vendor_prefixes(&mut doc, &config.prefixer)?;
    }

    Ok(doc.render(config.compressed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Config {
        Config {
            optimize: false,
            prefix: false,
            ..Config::default()
        }
    }

    #[test]
    fn test_compile_defaults() {
        let out = compile("a { border-radius: 4px; color: #FFFFFF }", &Config::default()).unwrap();
        assert_eq!(
            out,
            "a{-moz-border-radius:4px;-webkit-border-radius:4px;border-radius:4px;color:#fff}"
        );
    }

    #[test]
    fn test_compile_webkit_only_from_json() {
        let config = Config::from_json(r#"{ "prefixer": { "mozilla": false, "opera": false, "microsoft": false } }"#)
            .unwrap();
        assert!(config.optimize && config.prefix && config.compressed);

        let out = compile("a { border-radius: 4px; }", &config).unwrap();
        assert_eq!(out, "a{-webkit-border-radius:4px;border-radius:4px}");
        assert_eq!(compile(&out, &config).unwrap(), out);
    }

    #[test]
    fn test_ie_only_rule_disappears() {
        let config = Config {
            optimizer: OptimizeOptions {
                remove_ie_hacks: true,
                ..OptimizeOptions::default()
            },
            ..Config::default()
        };
        let out = compile(
            "a { filter: progid:DXImageTransform.Microsoft.Alpha(Opacity=80); }\nb { color: red }",
            &config,
        )
        .unwrap();
        assert_eq!(out, "b{color:red}");
    }

    #[test]
    fn test_structural_round_trip() {
        let css = "@charset \"utf-8\";\n@import url(a.css);\n/* note */\n\
                   a > b, c { color : red ; background: url('x y.png') no-repeat }\n\
                   @media screen and (max-width: 100px) { d { margin: 0 auto; font-family: Arial, \"A  B\" } }";
        let once = parse(css).unwrap().render(true);
        let twice = parse(&once).unwrap().render(true);
        assert_eq!(once, twice);

        let pretty = parse(css).unwrap().render(false);
        assert_eq!(parse(&pretty).unwrap().render(true), once);
    }

    #[test]
    fn test_pretty_output() {
        let config = Config {
            compressed: false,
            ..plain()
        };
        assert_eq!(compile("a{color:red}", &config).unwrap(), "a {\n  color: red;\n}\n");
    }

    #[test]
    fn test_stages_disabled() {
        let out = compile("a { COLOR: #FFFFFF; opacity: 0.5 }", &plain()).unwrap();
        assert_eq!(out, "a{COLOR:#FFFFFF;opacity:0.5}");
    }

    #[test]
    fn test_optimize_then_prefix() {
        let out = compile("a { opacity: 0.50 }", &Config::default()).unwrap();
        assert_eq!(out, "a{-ms-filter:\"alpha(opacity=50)\";filter:alpha(opacity=50);zoom:1;opacity:.5}");
    }

    #[test]
    fn test_errors() {
        assert!(matches!(compile("a {", &Config::default()), Err(CompileError::Parse(_))));
        assert!(matches!(compile("a } b", &Config::default()), Err(CompileError::Parse(_))));
        assert!(matches!(Config::from_json("{ \"optimize\": 3 }"), Err(CompileError::Config(_))));
    }
}
