//! Special transforms for properties whose value changes per vendor

use cssforge_tree::split_important;

use crate::options::{PrefixOptions, Vendor};

fn with_important(value: String, important: bool) -> String {
    if important {
        format!("{} !important", value)
    } else {
        value
    }
}

/// Whether a `filter` value is a legacy Internet Explorer filter
fn is_legacy_ie_filter(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.starts_with("progid:") || lower.starts_with("alpha(")
}

/// `opacity: .5` -> `-ms-filter:"alpha(opacity=50)"; filter:alpha(opacity=50); zoom:1`
pub fn opacity(value: &str, vendors: &PrefixOptions) -> Vec<(String, String)> {
    if !vendors.enabled(Vendor::Microsoft) {
        return Vec::new();
    }
    let (body, important) = split_important(value);
    let Ok(opacity) = body.trim().parse::<f64>() else {
        return Vec::new();
    };
    if !opacity.is_finite() {
        return Vec::new();
    }

    let percent = (opacity * 100.0).round().clamp(0.0, 100.0) as u32;
    let alpha = format!("alpha(opacity={})", percent);
    vec![
        ("-ms-filter".to_string(), with_important(format!("\"{}\"", alpha), important)),
        ("filter".to_string(), with_important(alpha, important)),
        ("zoom".to_string(), "1".to_string()),
    ]
}

/// Legacy `filter` values get a quoted `-ms-filter` twin for IE8
pub fn filter(value: &str, vendors: &PrefixOptions) -> Vec<(String, String)> {
    if !vendors.enabled(Vendor::Microsoft) {
        return Vec::new();
    }
    let (body, important) = split_important(value);
    if !is_legacy_ie_filter(body) {
        return Vec::new();
    }
    vec![("-ms-filter".to_string(), with_important(format!("\"{}\"", body.trim()), important))]
}

/// `white-space: pre-wrap` for engines that predate the keyword
pub fn white_space(value: &str, vendors: &PrefixOptions) -> Vec<(String, String)> {
    let (body, important) = split_important(value);
    if !body.trim().eq_ignore_ascii_case("pre-wrap") {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut push = |name: &str, value: &str| {
        out.push((name.to_string(), with_important(value.to_string(), important)));
    };
    if vendors.mozilla {
        push("white-space", "-moz-pre-wrap");
    }
    if vendors.webkit {
        push("white-space", "-webkit-pre-wrap");
    }
    if vendors.opera {
        push("white-space", "-pre-wrap");
        push("white-space", "-o-pre-wrap");
    }
    if vendors.microsoft {
        push("word-wrap", "break-word");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(out: &[(String, String)]) -> Vec<(&str, &str)> {
        out.iter().map(|(n, v)| (n.as_str(), v.as_str())).collect()
    }

    #[test]
    fn test_opacity() {
        let out = opacity(".5", &PrefixOptions::default());
        assert_eq!(
            pairs(&out),
            vec![
                ("-ms-filter", "\"alpha(opacity=50)\""),
                ("filter", "alpha(opacity=50)"),
                ("zoom", "1")
            ]
        );
        assert_eq!(opacity("1.7", &PrefixOptions::default())[1].1, "alpha(opacity=100)");
        assert!(opacity(".5", &PrefixOptions::only(Vendor::Webkit)).is_empty());
        assert!(opacity("var(--o)", &PrefixOptions::default()).is_empty());
    }

    #[test]
    fn test_filter() {
        let out = filter("progid:DXImageTransform.Microsoft.Alpha(Opacity=80)", &PrefixOptions::default());
        assert_eq!(
            pairs(&out),
            vec![("-ms-filter", "\"progid:DXImageTransform.Microsoft.Alpha(Opacity=80)\"")]
        );
        assert!(filter("blur(2px)", &PrefixOptions::default()).is_empty());
    }

    #[test]
    fn test_white_space() {
        let out = white_space("pre-wrap", &PrefixOptions::default());
        assert_eq!(
            pairs(&out),
            vec![
                ("white-space", "-moz-pre-wrap"),
                ("white-space", "-webkit-pre-wrap"),
                ("white-space", "-pre-wrap"),
                ("white-space", "-o-pre-wrap"),
                ("word-wrap", "break-word")
            ]
        );
        assert!(white_space("nowrap", &PrefixOptions::default()).is_empty());
    }
}
