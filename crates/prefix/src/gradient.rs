//! Legacy gradient syntax
//!
//! Vendor-prefixed gradient functions predate the `to <side>` keywords and
//! measure angles counter-clockwise from east, so the first argument has to
//! be translated along with the function name.

use cssforge_css::syntax::{
    find_top_level, matching_paren, split_top_level_commas, split_top_level_whitespace, string_end,
};
use cssforge_css::Color;

use crate::options::Vendor;

const GRADIENTS: &[&str] = &[
    "linear-gradient",
    "repeating-linear-gradient",
    "radial-gradient",
    "repeating-radial-gradient",
];

/// One unprefixed gradient call inside a value
#[derive(Debug)]
struct GradientCall<'a> {
    /// Byte range of the whole call, `)` included
    start: usize,
    end: usize,
    name: &'static str,
    args: &'a str,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn find_gradients(value: &str) -> Vec<GradientCall<'_>> {
    let mut calls = Vec::new();
    let mut i = 0;

    while i < value.len() {
        let Some(c) = value[i..].chars().next() else { break };
        if c == '"' || c == '\'' {
            i = string_end(value, i);
            continue;
        }
        if !is_ident_char(c) {
            i += c.len_utf8();
            continue;
        }

        let end = value[i..]
            .find(|c: char| !is_ident_char(c))
            .map(|offset| i + offset)
            .unwrap_or(value.len());
        if !value[end..].starts_with('(') {
            i = end;
            continue;
        }
        let Some(close) = matching_paren(value, end) else { break };

        let word = value[i..end].to_ascii_lowercase();
        if let Some(name) = GRADIENTS.iter().copied().find(|g| *g == word) {
            calls.push(GradientCall {
                start: i,
                end: close + 1,
                name,
                args: &value[end + 1..close],
            });
            i = close + 1;
        } else if word == "url" {
            i = close + 1;
        } else {
            i = end + 1;
        }
    }
    calls
}

/// Whether the value calls an unprefixed gradient function
pub fn has_gradient(value: &str) -> bool {
    !find_gradients(value).is_empty()
}

/// The value with every gradient rewritten to `vendor`'s legacy syntax
pub fn vendor_gradient(value: &str, vendor: Vendor) -> Option<String> {
    let calls = find_gradients(value);
    if calls.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(value.len() + 16);
    let mut last = 0;
    for call in calls {
        out.push_str(&value[last..call.start]);
        out.push_str(vendor.prefix());
        out.push_str(call.name);
        out.push('(');
        out.push_str(&legacy_arguments(call.name, call.args));
        out.push(')');
        last = call.end;
    }
    out.push_str(&value[last..]);
    Some(out)
}

fn legacy_arguments(name: &str, args: &str) -> String {
    let (first, rest) = match find_top_level(args, ',') {
        Some(comma) => (args[..comma].trim(), &args[comma..]),
        None => (args.trim(), ""),
    };
    let converted = if name.contains("linear") {
        legacy_linear_direction(first)
    } else {
        legacy_radial_shape(first)
    };
    match converted {
        Some(first) => format!("{}{}", first, rest),
        None => args.to_string(),
    }
}

fn opposite_side(side: &str) -> Option<&'static str> {
    match side {
        "top" => Some("bottom"),
        "bottom" => Some("top"),
        "left" => Some("right"),
        "right" => Some("left"),
        _ => None,
    }
}

fn parse_degrees(text: &str) -> Option<f64> {
    let degrees: f64 = text.strip_suffix("deg")?.parse().ok()?;
    degrees.is_finite().then_some(degrees)
}

fn format_degrees(degrees: f64) -> String {
    if degrees.fract() == 0.0 {
        format!("{}deg", degrees as i64)
    } else {
        format!("{}deg", degrees)
    }
}

/// `to bottom` -> `top`, `45deg` -> `45deg`, `0deg` -> `90deg`
fn legacy_linear_direction(first: &str) -> Option<String> {
    let lower = first.to_ascii_lowercase();
    if let Some(sides) = lower.strip_prefix("to ") {
        let legacy: Option<Vec<&str>> = sides.split_whitespace().map(opposite_side).collect();
        return legacy.map(|sides| sides.join(" "));
    }
    let degrees = parse_degrees(&lower)?;
    Some(format_degrees((90.0 - degrees).rem_euclid(360.0)))
}

/// `circle at center` -> `center, circle`
fn legacy_radial_shape(first: &str) -> Option<String> {
    let words: Vec<&str> = first.split_whitespace().collect();
    let at = words.iter().position(|w| w.eq_ignore_ascii_case("at"))?;
    let shape = words[..at].join(" ");
    let position = words[at + 1..].join(" ");
    if position.is_empty() {
        return None;
    }
    if shape.is_empty() {
        Some(position)
    } else {
        Some(format!("{}, {}", position, shape))
    }
}

/// Orientation of a linear gradient as `(horizontal, reversed)`
fn ie_orientation(direction: Option<&str>) -> Option<(bool, bool)> {
    let Some(direction) = direction else {
        return Some((false, false));
    };
    let lower = direction.to_ascii_lowercase();
    let orientation = match lower.as_str() {
        "to bottom" | "top" => (false, false),
        "to top" | "bottom" => (false, true),
        "to right" | "left" => (true, false),
        "to left" | "right" => (true, true),
        _ => match parse_degrees(&lower)?.rem_euclid(360.0) {
            d if d == 180.0 => (false, false),
            d if d == 0.0 => (false, true),
            d if d == 90.0 => (true, false),
            d if d == 270.0 => (true, true),
            _ => return None,
        },
    };
    Some(orientation)
}

fn is_direction(arg: &str) -> bool {
    let lower = arg.to_ascii_lowercase();
    let first_word = lower.split_whitespace().next().unwrap_or("");
    matches!(first_word, "to" | "top" | "bottom" | "left" | "right")
        || ["deg", "rad", "grad", "turn"]
            .iter()
            .any(|unit| lower.strip_suffix(unit).map(|n| n.parse::<f64>().is_ok()).unwrap_or(false))
}

fn stop_color(stop: &str) -> Option<Color> {
    let color = *split_top_level_whitespace(stop).first()?;
    Color::from_hex(color.strip_prefix('#')?)
}

fn ie_color(color: &Color) -> String {
    let alpha = (color.a * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02X}{:02X}{:02X}{:02X}", alpha, color.r, color.g, color.b)
}

/// Internet Explorer gradient filter for the first `linear-gradient` in the
/// value. Needs hex first and last stops and an axis-aligned direction.
pub fn ie_gradient_filter(value: &str) -> Option<String> {
    let call = find_gradients(value)
        .into_iter()
        .find(|call| call.name == "linear-gradient")?;
    let args = split_top_level_commas(call.args);

    let (direction, stops) = match args.split_first() {
        Some((first, rest)) if is_direction(first) => (Some(*first), rest),
        _ => (None, args.as_slice()),
    };
    let (horizontal, reversed) = ie_orientation(direction)?;
    let [first, .., last] = stops else {
        return None;
    };

    let (mut start, mut end) = (stop_color(first)?, stop_color(last)?);
    if reversed {
        std::mem::swap(&mut start, &mut end);
    }
    Some(format!(
        "progid:DXImageTransform.Microsoft.gradient(startColorstr='{}', endColorstr='{}', GradientType={})",
        ie_color(&start),
        ie_color(&end),
        if horizontal { 1 } else { 0 }
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_gradient_directions() {
        assert_eq!(
            vendor_gradient("linear-gradient(to bottom, #fff, #000)", Vendor::Webkit).unwrap(),
            "-webkit-linear-gradient(top, #fff, #000)"
        );
        assert_eq!(
            vendor_gradient("linear-gradient(to top right,#fff,#000)", Vendor::Mozilla).unwrap(),
            "-moz-linear-gradient(bottom left,#fff,#000)"
        );
        assert_eq!(
            vendor_gradient("linear-gradient(45deg, red, blue)", Vendor::Opera).unwrap(),
            "-o-linear-gradient(45deg, red, blue)"
        );
        assert_eq!(
            vendor_gradient("linear-gradient(180deg, red, blue)", Vendor::Opera).unwrap(),
            "-o-linear-gradient(270deg, red, blue)"
        );
        assert_eq!(
            vendor_gradient("linear-gradient(red, blue)", Vendor::Webkit).unwrap(),
            "-webkit-linear-gradient(red, blue)"
        );
    }

    #[test]
    fn test_vendor_gradient_in_layers() {
        assert_eq!(
            vendor_gradient(
                "url(linear-gradient(x).png), repeating-radial-gradient(circle at center, red, blue)",
                Vendor::Webkit
            )
            .unwrap(),
            "url(linear-gradient(x).png), -webkit-repeating-radial-gradient(center, circle, red, blue)"
        );
        assert!(vendor_gradient("-webkit-linear-gradient(top, red, blue)", Vendor::Webkit).is_none());
        assert!(!has_gradient("'linear-gradient(a, b)'"));
    }

    #[test]
    fn test_ie_gradient_filter() {
        assert_eq!(
            ie_gradient_filter("linear-gradient(to bottom, #ff0000, #00f)").unwrap(),
            "progid:DXImageTransform.Microsoft.gradient(startColorstr='#FFFF0000', endColorstr='#FF0000FF', GradientType=0)"
        );
        assert_eq!(
            ie_gradient_filter("linear-gradient(to left, #fff 10%, #ccc 50%, #000)").unwrap(),
            "progid:DXImageTransform.Microsoft.gradient(startColorstr='#FF000000', endColorstr='#FFFFFFFF', GradientType=1)"
        );
        assert!(ie_gradient_filter("linear-gradient(to bottom, red, #000)").is_none());
        assert!(ie_gradient_filter("linear-gradient(30deg, #fff, #000)").is_none());
        assert!(ie_gradient_filter("radial-gradient(#fff, #000)").is_none());
    }
}
