//! Value-level rewrites
//!
//! Every function here takes a declaration value and returns the rewritten
//! text. A value that cannot be understood is returned unchanged.

use cssforge_css::syntax::{
    matching_paren, split_top_level_commas, split_top_level_whitespace, string_end,
};
use cssforge_css::Color;
use cssforge_tree::split_important;

/// Callbacks for [`rewrite_value`]
pub trait Rewriter {
    /// Rewrite one bare word (`10px`, `#fff`, `solid`). `enclosing` holds the
    /// lowercased names of the functions the word sits in, outermost first.
    fn word(&mut self, word: &str, enclosing: &[String]) -> Option<String>;

    /// Rewrite a whole function call (`rgb(0, 0, 0)`)
    fn function(&mut self, _name: &str, _call: &str, _enclosing: &[String]) -> Option<String> {
        None
    }
}

fn is_word_end(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '/' | '(' | ')' | '"' | '\'')
}

/// Walk a value, handing words and function calls to `rewriter`. Strings and
/// `url()` contents are copied verbatim.
pub fn rewrite_value(value: &str, rewriter: &mut dyn Rewriter) -> String {
    let mut out = String::with_capacity(value.len());
    let mut stack: Vec<String> = Vec::new();
    let mut i = 0;

    while i < value.len() {
        let Some(c) = value[i..].chars().next() else { break };
        match c {
            '"' | '\'' => {
                let end = string_end(value, i);
                out.push_str(&value[i..end]);
                i = end;
            }
            ')' => {
                stack.pop();
                out.push(c);
                i += 1;
            }
            '(' => {
                stack.push(String::new());
                out.push(c);
                i += 1;
            }
            c if c.is_whitespace() || c == ',' || c == '/' => {
                out.push(c);
                i += c.len_utf8();
            }
            _ => {
                let end = value[i..]
                    .find(is_word_end)
                    .map(|offset| i + offset)
                    .unwrap_or(value.len());
                let word = &value[i..end];

                if value[end..].starts_with('(') {
                    let name = word.to_ascii_lowercase();
                    match matching_paren(value, end) {
                        Some(close) if name == "url" => {
                            out.push_str(&value[i..=close]);
                            i = close + 1;
                        }
                        None if name == "url" => {
                            out.push_str(&value[i..]);
                            i = value.len();
                        }
                        close => {
                            let rewritten = close.and_then(|close| {
                                rewriter
                                    .function(&name, &value[i..=close], &stack)
                                    .map(|text| (text, close))
                            });
                            if let Some((text, close)) = rewritten {
                                out.push_str(&text);
                                i = close + 1;
                            } else {
                                out.push_str(word);
                                out.push('(');
                                stack.push(name);
                                i = end + 1;
                            }
                        }
                    }
                } else {
                    match rewriter.word(word, &stack) {
                        Some(text) => out.push_str(&text),
                        None => out.push_str(word),
                    }
                    i = end;
                }
            }
        }
    }

    out
}

fn with_important(body: String, important: bool) -> String {
    if important {
        format!("{} !important", body)
    } else {
        body
    }
}

/// `normal` -> `400`, `bold` -> `700` for `font-weight`, and inside the
/// `font` shorthand where the replacement cannot be mistaken for a style.
pub fn compress_font_weight(name: &str, value: &str) -> String {
    let (body, important) = split_important(value);
    match name {
        "font-weight" => {
            let replaced = if body.eq_ignore_ascii_case("normal") {
                "400"
            } else if body.eq_ignore_ascii_case("bold") {
                "700"
            } else {
                return value.to_string();
            };
            with_important(replaced.to_string(), important)
        }
        "font" => {
            let words = split_top_level_whitespace(body);
            let normals = words.iter().filter(|w| w.eq_ignore_ascii_case("normal")).count();
            let has_weight = words.iter().any(|w| {
                w.eq_ignore_ascii_case("bold")
                    || w.eq_ignore_ascii_case("bolder")
                    || w.eq_ignore_ascii_case("lighter")
                    || (w.len() == 3 && w.ends_with("00") && w.chars().all(|c| c.is_ascii_digit()))
            });
            let bolds = words.iter().filter(|w| w.eq_ignore_ascii_case("bold")).count();

            let rewritten: Vec<String> = words
                .iter()
                .map(|w| {
                    if w.eq_ignore_ascii_case("bold") && bolds == 1 {
                        "700".to_string()
                    } else if w.eq_ignore_ascii_case("normal") && normals == 1 && !has_weight {
                        "400".to_string()
                    } else {
                        w.to_string()
                    }
                })
                .collect();
            with_important(rewritten.join(" "), important)
        }
        _ => value.to_string(),
    }
}

/// Keyword `background-position` values to numeric form
pub fn compress_background_position(value: &str) -> String {
    let (body, important) = split_important(value);
    let layers: Option<Vec<String>> = split_top_level_commas(body)
        .into_iter()
        .map(position_layer)
        .collect();

    match layers {
        Some(layers) => with_important(layers.join(","), important),
        None => value.to_string(),
    }
}

fn horizontal(word: &str) -> Option<&'static str> {
    match word.to_ascii_lowercase().as_str() {
        "left" => Some("0"),
        "center" => Some("50%"),
        "right" => Some("100%"),
        _ => None,
    }
}

fn vertical(word: &str) -> Option<&'static str> {
    match word.to_ascii_lowercase().as_str() {
        "top" => Some("0"),
        "center" => Some("50%"),
        "bottom" => Some("100%"),
        _ => None,
    }
}

fn position_layer(layer: &str) -> Option<String> {
    let words: Vec<&str> = layer.split_whitespace().collect();
    let (h, v) = match words.as_slice() {
        [single] => match horizontal(single) {
            Some(h) => (h, "50%"),
            None => ("50%", vertical(single)?),
        },
        [first, second] => {
            let swapped = vertical(first).is_some() && horizontal(first).is_none()
                || horizontal(second).is_some() && vertical(second).is_none();
            if swapped {
                (horizontal(second)?, vertical(first)?)
            } else {
                (horizontal(first)?, vertical(second)?)
            }
        }
        _ => return None,
    };

    // A single value implies a centered second one
    if v == "50%" {
        Some(h.to_string())
    } else {
        Some(format!("{} {}", h, v))
    }
}

/// Properties whose words are identifiers, never colors
const IDENTIFIER_VALUED: &[&str] = &[
    "font",
    "font-family",
    "animation",
    "animation-name",
    "transition",
    "transition-property",
    "will-change",
    "grid-area",
    "grid-row",
    "grid-column",
    "grid-template-areas",
    "counter-reset",
    "counter-increment",
    "content",
    "list-style",
    "list-style-type",
    "quotes",
];

struct ColorRewriter {
    names_allowed: bool,
}

impl Rewriter for ColorRewriter {
    fn word(&mut self, word: &str, _enclosing: &[String]) -> Option<String> {
        if let Some(hex) = word.strip_prefix('#') {
            Color::from_hex(hex)?;
            return Some(Color::shortest(word));
        }
        if self.names_allowed && Color::is_named(word) {
            return Some(Color::shortest(word));
        }
        None
    }

    fn function(&mut self, name: &str, call: &str, _enclosing: &[String]) -> Option<String> {
        match name {
            "rgb" | "rgba" | "hsl" | "hsla" => {
                Color::parse(call)?;
                Some(Color::shortest(call))
            }
            _ => None,
        }
    }
}

/// Replace every color literal with its shortest spelling
pub fn compress_colors(name: &str, value: &str) -> String {
    let mut rewriter = ColorRewriter {
        names_allowed: !IDENTIFIER_VALUED.contains(&name),
    };
    rewrite_value(value, &mut rewriter)
}

/// Units that denote a length; `0` needs no unit for these
const LENGTH_UNITS: &[&str] = &[
    "px", "em", "rem", "ex", "ch", "vw", "vh", "vmin", "vmax", "cm", "mm", "q", "in", "pt", "pc",
];

/// Functions where a unitless zero is not a valid length
const MATH_FUNCTIONS: &[&str] = &["calc", "min", "max", "clamp"];

struct NumberRewriter {
    drop_zero_units: bool,
}

impl Rewriter for NumberRewriter {
    fn word(&mut self, word: &str, enclosing: &[String]) -> Option<String> {
        let (number, unit) = split_number(word)?;
        let number = normalize_number(number);

        if number == "0" && !unit.is_empty() {
            let is_length = LENGTH_UNITS.contains(&unit.to_ascii_lowercase().as_str());
            let in_math = enclosing.iter().any(|f| MATH_FUNCTIONS.contains(&f.as_str()));
            if is_length && self.drop_zero_units && !in_math {
                return Some(number);
            }
        }
        Some(format!("{}{}", number, unit))
    }
}

/// Split `-0.50px` into (`-0.50`, `px`). The unit must be letters or `%`.
fn split_number(word: &str) -> Option<(&str, &str)> {
    let bytes = word.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
        i += 1;
    }
    let digits_start = i;
    let mut seen_dot = false;
    let mut seen_digit = false;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        i += 1;
    }
    if !seen_digit || i == digits_start {
        return None;
    }
    let unit = &word[i..];
    if unit == "%" || unit.chars().all(|c| c.is_ascii_alphabetic()) {
        Some((&word[..i], unit))
    } else {
        None
    }
}

/// `0.50` -> `.5`, `10.0` -> `10`, `-0` -> `0`, `007` -> `7`
fn normalize_number(number: &str) -> String {
    let (sign, digits) = match number.as_bytes().first() {
        Some(b'-') => ("-", &number[1..]),
        Some(b'+') => ("", &number[1..]),
        _ => ("", number),
    };

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (digits, ""),
    };
    let int_part = int_part.trim_start_matches('0');
    let frac_part = frac_part.trim_end_matches('0');

    let body = match (int_part.is_empty(), frac_part.is_empty()) {
        (true, true) => return "0".to_string(),
        (false, true) => int_part.to_string(),
        (true, false) => format!(".{}", frac_part),
        (false, false) => format!("{}.{}", int_part, frac_part),
    };
    format!("{}{}", sign, body)
}

/// Normalize numbers and drop units from zero lengths
pub fn compress_numbers(name: &str, value: &str) -> String {
    let mut rewriter = NumberRewriter {
        drop_zero_units: !matches!(name, "flex" | "flex-basis"),
    };
    rewrite_value(value, &mut rewriter)
}

/// Properties following the top/right/bottom/left expansion rule
const BOX_SHORTHANDS: &[&str] = &[
    "margin",
    "padding",
    "border-width",
    "border-style",
    "border-color",
    "border-radius",
    "inset",
    "scroll-margin",
    "scroll-padding",
];

/// Drop trailing values implied by the 4-value expansion rule
/// (`a a a a` -> `a`, `a b a b` -> `a b`, `a b a` -> `a b`)
pub fn collapse_box_values(name: &str, value: &str) -> String {
    if !BOX_SHORTHANDS.contains(&name) {
        return value.to_string();
    }
    let (body, important) = split_important(value);
    if body.contains(',') || body.contains('/') {
        return value.to_string();
    }

    let mut parts = split_top_level_whitespace(body);
    if parts.len() < 2 || parts.len() > 4 {
        return value.to_string();
    }
    if parts.len() == 4 && parts[1] == parts[3] {
        parts.pop();
    }
    if parts.len() == 3 && parts[0] == parts[2] {
        parts.pop();
    }
    if parts.len() == 2 && parts[0] == parts[1] {
        parts.pop();
    }
    with_important(parts.join(" "), important)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_weight() {
        assert_eq!(compress_font_weight("font-weight", "bold"), "700");
        assert_eq!(compress_font_weight("font-weight", "Normal !important"), "400 !important");
        assert_eq!(compress_font_weight("font-weight", "bolder"), "bolder");
        assert_eq!(compress_font_weight("font", "bold 12px Arial"), "700 12px Arial");
        assert_eq!(compress_font_weight("font", "normal 12px Arial"), "400 12px Arial");
        assert_eq!(compress_font_weight("font", "normal normal 12px Arial"), "normal normal 12px Arial");
        assert_eq!(compress_font_weight("font", "normal 600 12px Arial"), "normal 600 12px Arial");
        assert_eq!(compress_font_weight("color", "bold"), "bold");
    }

    #[test]
    fn test_background_position() {
        assert_eq!(compress_background_position("top left"), "0 0");
        assert_eq!(compress_background_position("left top"), "0 0");
        assert_eq!(compress_background_position("center"), "50%");
        assert_eq!(compress_background_position("center center"), "50%");
        assert_eq!(compress_background_position("right bottom"), "100% 100%");
        assert_eq!(compress_background_position("top"), "50% 0");
        assert_eq!(compress_background_position("left"), "0");
        assert_eq!(compress_background_position("top center, right"), "50% 0,100%");
        assert_eq!(compress_background_position("left 10px"), "left 10px");
        assert_eq!(compress_background_position("left right"), "left right");
        assert_eq!(compress_background_position("0 0"), "0 0");
    }

    #[test]
    fn test_colors_in_values() {
        assert_eq!(compress_colors("color", "#FFFFFF"), "#fff");
        assert_eq!(compress_colors("border", "1px solid rgb(0, 0, 0)"), "1px solid #000");
        assert_eq!(compress_colors("color", "hsl(0,100%,50%)"), "#f00");
        assert_eq!(compress_colors("color", "#112233"), "#112233");
        assert_eq!(compress_colors("background", "white url(\"#ffffff.png\")"), "#fff url(\"#ffffff.png\")");
        assert_eq!(compress_colors("background", "url(#ffffff) black"), "url(#ffffff) #000");
        assert_eq!(
            compress_colors("background-image", "linear-gradient(to right, #ff0000, rgba(0,0,0,0.5))"),
            "linear-gradient(to right, #f00, rgba(0,0,0,.5))"
        );
        assert_eq!(compress_colors("font-family", "white, sans-serif"), "white, sans-serif");
        assert_eq!(compress_colors("color", "var(--white)"), "var(--white)");
        assert_eq!(compress_colors("color", "#abcdefg"), "#abcdefg");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(compress_numbers("width", "0.50px"), ".5px");
        assert_eq!(compress_numbers("margin", "0px"), "0");
        assert_eq!(compress_numbers("margin", "-0.5em 10.0px 0em 007px"), "-.5em 10px 0 7px");
        assert_eq!(compress_numbers("transition", "opacity 0s"), "opacity 0s");
        assert_eq!(compress_numbers("width", "0%"), "0%");
        assert_eq!(compress_numbers("width", "calc(0px + 1.50em)"), "calc(0px + 1.5em)");
        assert_eq!(compress_numbers("flex", "1 1 0px"), "1 1 0px");
        assert_eq!(compress_numbers("width", "10px\\9"), "10px\\9");
        assert_eq!(compress_numbers("content", "\"0.50px\""), "\"0.50px\"");
        assert_eq!(compress_numbers("line-height", "1.0"), "1");
        assert_eq!(compress_numbers("font", "12px/1.50 a"), "12px/1.5 a");
    }

    #[test]
    fn test_collapse_box_values() {
        assert_eq!(collapse_box_values("margin", "10px 10px 10px 10px"), "10px");
        assert_eq!(collapse_box_values("margin", "1px 2px 1px 2px"), "1px 2px");
        assert_eq!(collapse_box_values("padding", "1px 2px 1px"), "1px 2px");
        assert_eq!(collapse_box_values("padding", "1px 2px 3px 2px"), "1px 2px 3px");
        assert_eq!(collapse_box_values("margin", "0 0 !important"), "0 !important");
        assert_eq!(collapse_box_values("border-radius", "1px 1px / 2px 2px"), "1px 1px / 2px 2px");
        assert_eq!(collapse_box_values("transform", "1px 1px"), "1px 1px");
        assert_eq!(collapse_box_values("margin", "calc(1px + 2px) calc(1px + 2px)"), "calc(1px + 2px)");
    }
}
