//! Property name -> vendor transform table

use std::sync::LazyLock;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{PrefixError, PrefixResult};
use crate::options::{PrefixOptions, Vendor};
use crate::special;

/// Declarations a special transform wants inserted, as `(name, value)`
pub type SpecialFn = fn(&str, &PrefixOptions) -> Vec<(String, String)>;

/// How one property is prefixed
#[derive(Debug, Clone, Copy)]
pub enum Transform {
    /// Same value under a vendor name; slots in [`Vendor::ALL`] order
    Rename([Option<&'static str>; 4]),
    /// The value changes per vendor
    Special(SpecialFn),
}

const fn rename(
    moz: Option<&'static str>,
    webkit: Option<&'static str>,
    opera: Option<&'static str>,
    ms: Option<&'static str>,
) -> Transform {
    Transform::Rename([moz, webkit, opera, ms])
}

static PREFIX_TABLE: &[(&str, Transform)] = &[
    ("animation", rename(Some("-moz-animation"), Some("-webkit-animation"), Some("-o-animation"), None)),
    ("animation-delay", rename(Some("-moz-animation-delay"), Some("-webkit-animation-delay"), Some("-o-animation-delay"), None)),
    ("animation-direction", rename(Some("-moz-animation-direction"), Some("-webkit-animation-direction"), Some("-o-animation-direction"), None)),
    ("animation-duration", rename(Some("-moz-animation-duration"), Some("-webkit-animation-duration"), Some("-o-animation-duration"), None)),
    ("animation-fill-mode", rename(Some("-moz-animation-fill-mode"), Some("-webkit-animation-fill-mode"), Some("-o-animation-fill-mode"), None)),
    ("animation-iteration-count", rename(Some("-moz-animation-iteration-count"), Some("-webkit-animation-iteration-count"), Some("-o-animation-iteration-count"), None)),
    ("animation-name", rename(Some("-moz-animation-name"), Some("-webkit-animation-name"), Some("-o-animation-name"), None)),
    ("animation-play-state", rename(Some("-moz-animation-play-state"), Some("-webkit-animation-play-state"), Some("-o-animation-play-state"), None)),
    ("animation-timing-function", rename(Some("-moz-animation-timing-function"), Some("-webkit-animation-timing-function"), Some("-o-animation-timing-function"), None)),
    ("appearance", rename(Some("-moz-appearance"), Some("-webkit-appearance"), None, None)),
    ("backface-visibility", rename(Some("-moz-backface-visibility"), Some("-webkit-backface-visibility"), None, Some("-ms-backface-visibility"))),
    ("background-clip", rename(None, Some("-webkit-background-clip"), None, None)),
    ("background-origin", rename(None, Some("-webkit-background-origin"), None, None)),
    ("background-size", rename(Some("-moz-background-size"), Some("-webkit-background-size"), Some("-o-background-size"), None)),
    ("border-image", rename(Some("-moz-border-image"), Some("-webkit-border-image"), Some("-o-border-image"), None)),
    ("border-radius", rename(Some("-moz-border-radius"), Some("-webkit-border-radius"), None, None)),
    ("border-top-left-radius", rename(Some("-moz-border-radius-topleft"), Some("-webkit-border-top-left-radius"), None, None)),
    ("border-top-right-radius", rename(Some("-moz-border-radius-topright"), Some("-webkit-border-top-right-radius"), None, None)),
    ("border-bottom-right-radius", rename(Some("-moz-border-radius-bottomright"), Some("-webkit-border-bottom-right-radius"), None, None)),
    ("border-bottom-left-radius", rename(Some("-moz-border-radius-bottomleft"), Some("-webkit-border-bottom-left-radius"), None, None)),
    ("box-decoration-break", rename(None, Some("-webkit-box-decoration-break"), None, None)),
    ("box-shadow", rename(Some("-moz-box-shadow"), Some("-webkit-box-shadow"), None, None)),
    ("box-sizing", rename(Some("-moz-box-sizing"), Some("-webkit-box-sizing"), None, None)),
    ("column-count", rename(Some("-moz-column-count"), Some("-webkit-column-count"), None, None)),
    ("column-gap", rename(Some("-moz-column-gap"), Some("-webkit-column-gap"), None, None)),
    ("column-rule", rename(Some("-moz-column-rule"), Some("-webkit-column-rule"), None, None)),
    ("column-rule-color", rename(Some("-moz-column-rule-color"), Some("-webkit-column-rule-color"), None, None)),
    ("column-rule-style", rename(Some("-moz-column-rule-style"), Some("-webkit-column-rule-style"), None, None)),
    ("column-rule-width", rename(Some("-moz-column-rule-width"), Some("-webkit-column-rule-width"), None, None)),
    ("column-span", rename(None, Some("-webkit-column-span"), None, None)),
    ("column-width", rename(Some("-moz-column-width"), Some("-webkit-column-width"), None, None)),
    ("columns", rename(Some("-moz-columns"), Some("-webkit-columns"), None, None)),
    ("filter", Transform::Special(special::filter)),
    ("font-feature-settings", rename(Some("-moz-font-feature-settings"), Some("-webkit-font-feature-settings"), None, Some("-ms-font-feature-settings"))),
    ("hyphens", rename(Some("-moz-hyphens"), Some("-webkit-hyphens"), None, Some("-ms-hyphens"))),
    ("opacity", Transform::Special(special::opacity)),
    ("perspective", rename(Some("-moz-perspective"), Some("-webkit-perspective"), None, Some("-ms-perspective"))),
    ("perspective-origin", rename(Some("-moz-perspective-origin"), Some("-webkit-perspective-origin"), None, Some("-ms-perspective-origin"))),
    ("tab-size", rename(Some("-moz-tab-size"), None, Some("-o-tab-size"), None)),
    ("text-overflow", rename(None, None, Some("-o-text-overflow"), Some("-ms-text-overflow"))),
    ("text-size-adjust", rename(Some("-moz-text-size-adjust"), Some("-webkit-text-size-adjust"), None, Some("-ms-text-size-adjust"))),
    ("touch-action", rename(None, None, None, Some("-ms-touch-action"))),
    ("transform", rename(Some("-moz-transform"), Some("-webkit-transform"), Some("-o-transform"), Some("-ms-transform"))),
    ("transform-origin", rename(Some("-moz-transform-origin"), Some("-webkit-transform-origin"), Some("-o-transform-origin"), Some("-ms-transform-origin"))),
    ("transform-style", rename(Some("-moz-transform-style"), Some("-webkit-transform-style"), None, Some("-ms-transform-style"))),
    ("transition", rename(Some("-moz-transition"), Some("-webkit-transition"), Some("-o-transition"), None)),
    ("transition-delay", rename(Some("-moz-transition-delay"), Some("-webkit-transition-delay"), Some("-o-transition-delay"), None)),
    ("transition-duration", rename(Some("-moz-transition-duration"), Some("-webkit-transition-duration"), Some("-o-transition-duration"), None)),
    ("transition-property", rename(Some("-moz-transition-property"), Some("-webkit-transition-property"), Some("-o-transition-property"), None)),
    ("transition-timing-function", rename(Some("-moz-transition-timing-function"), Some("-webkit-transition-timing-function"), Some("-o-transition-timing-function"), None)),
    ("user-select", rename(Some("-moz-user-select"), Some("-webkit-user-select"), None, Some("-ms-user-select"))),
    ("white-space", Transform::Special(special::white_space)),
];

static TABLE: LazyLock<FxHashMap<&'static str, Transform>> =
    LazyLock::new(|| PREFIX_TABLE.iter().copied().collect());

/// Transform for a lowercased, unprefixed property name
pub fn lookup(name: &str) -> Option<Transform> {
    TABLE.get(name).copied()
}

/// Vendor spelling of `name`, if the table renames it for `vendor`
pub fn vendor_name(name: &str, vendor: Vendor) -> Option<&'static str> {
    match lookup(name)? {
        Transform::Rename(slots) => slots[vendor.index()],
        Transform::Special(_) => None,
    }
}

/// Check the static table for entries that could never be applied
/// correctly: duplicates, prefixed keys, empty renames and slot names
/// carrying another vendor's prefix.
pub fn validate_table() -> PrefixResult<()> {
    let mut seen = FxHashSet::default();
    for (name, transform) in PREFIX_TABLE {
        if !seen.insert(*name) {
            return Err(PrefixError::Configuration(format!("duplicate entry for {}", name)));
        }
        if name.starts_with('-') || name.to_ascii_lowercase() != *name {
            return Err(PrefixError::Configuration(format!(
                "{} must be an unprefixed lowercase name",
                name
            )));
        }
        let Transform::Rename(slots) = transform else { continue };
        if slots.iter().all(Option::is_none) {
            return Err(PrefixError::Configuration(format!("{} has no vendor names", name)));
        }
        for (vendor, slot) in Vendor::ALL.iter().zip(slots) {
            if let Some(vendor_name) = slot {
                if !vendor_name.starts_with(vendor.prefix()) {
                    return Err(PrefixError::Configuration(format!(
                        "{} is in the {:?} slot of {}",
                        vendor_name, vendor, name
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_consistent() {
        assert!(validate_table().is_ok());
    }

    #[test]
    fn test_lookup() {
        assert!(matches!(lookup("opacity"), Some(Transform::Special(_))));
        assert!(lookup("color").is_none());
        assert_eq!(vendor_name("border-radius", Vendor::Webkit), Some("-webkit-border-radius"));
        assert_eq!(vendor_name("border-top-left-radius", Vendor::Mozilla), Some("-moz-border-radius-topleft"));
        assert_eq!(vendor_name("border-radius", Vendor::Opera), None);
        assert_eq!(vendor_name("opacity", Vendor::Microsoft), None);
    }
}
