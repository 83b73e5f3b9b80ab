//! Optimizer configuration

use serde::Deserialize;

/// Toggles for each optimizer rewrite
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OptimizeOptions {
    /// Lowercase property names (custom properties are case-sensitive and kept)
    pub lowercase_properties: bool,
    /// Drop comments other than `/*! ... */`
    pub remove_comments: bool,
    /// Drop declarations only legacy Internet Explorer understands
    pub remove_ie_hacks: bool,
    /// Shorten colors, numbers and keywords
    pub compress_values: bool,
    /// Fold complete longhand sets into their shorthand
    pub merge_shorthands: bool,
    /// Remove groups left without children
    pub remove_empty: bool,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            lowercase_properties: true,
            remove_comments: true,
            remove_ie_hacks: false,
            compress_values: true,
            merge_shorthands: true,
            remove_empty: true,
        }
    }
}

impl OptimizeOptions {
    /// Every rewrite disabled
    pub fn none() -> Self {
        Self {
            lowercase_properties: false,
            remove_comments: false,
            remove_ie_hacks: false,
            compress_values: false,
            merge_shorthands: false,
            remove_empty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options: OptimizeOptions = serde_json::from_str(r#"{ "remove_ie_hacks": true }"#).unwrap();
        assert!(options.remove_ie_hacks);
        assert!(options.compress_values);
        assert!(options.remove_empty);
    }
}
