//! Lexical helpers shared by the parser and the rewrite passes
//!
//! All of these skip over string literals, and the `top_level` ones also
//! ignore anything nested in parentheses.

/// Byte index of the first `needle` outside strings and parentheses
pub fn find_top_level(text: &str, needle: char) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth = 0usize;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == needle && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Collapse whitespace runs outside strings into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut pending_space = false;

    for c in text.chars() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        if c == '"' || c == '\'' {
            quote = Some(c);
        }
        out.push(c);
    }
    out
}

/// End (exclusive) of the string literal opening at `start`
pub fn string_end(value: &str, start: usize) -> usize {
    let quote = value[start..].chars().next().unwrap_or('"');
    let mut escaped = false;
    for (i, c) in value[start + 1..].char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return start + 1 + i + 1;
        }
    }
    value.len()
}

/// Index of the `)` matching the `(` at `open`
pub fn matching_paren(value: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < value.len() {
        let c = value[i..].chars().next()?;
        match c {
            '"' | '\'' => {
                i = string_end(value, i);
                continue;
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += c.len_utf8();
    }
    None
}

/// Split on whitespace outside parentheses and strings
pub fn split_top_level_whitespace(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    let mut i = 0;

    while i < value.len() {
        let Some(c) = value[i..].chars().next() else { break };
        if c.is_whitespace() && depth == 0 {
            if let Some(s) = start.take() {
                parts.push(&value[s..i]);
            }
            i += c.len_utf8();
            continue;
        }
        if start.is_none() {
            start = Some(i);
        }
        match c {
            '"' | '\'' => {
                i = string_end(value, i);
                continue;
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += c.len_utf8();
    }
    if let Some(s) = start {
        parts.push(&value[s..]);
    }
    parts
}

/// Split on commas outside parentheses and strings
pub fn split_top_level_commas(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < value.len() {
        let Some(c) = value[i..].chars().next() else { break };
        match c {
            '"' | '\'' => {
                i = string_end(value, i);
                continue;
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
        i += c.len_utf8();
    }
    parts.push(value[start..].trim());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_top_level() {
        assert_eq!(find_top_level("a:b", ':'), Some(1));
        assert_eq!(find_top_level("url(a:b)", ':'), None);
        assert_eq!(find_top_level("'a:b' c:d", ':'), Some(7));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  'c   d' "), "a b 'c   d'");
    }

    #[test]
    fn test_split_helpers() {
        assert_eq!(split_top_level_whitespace(" a  f(b c)  'd e' "), vec!["a", "f(b c)", "'d e'"]);
        assert_eq!(split_top_level_commas("a, f(b, c), d"), vec!["a", "f(b, c)", "d"]);
        assert_eq!(matching_paren("f(a(b)\")\")", 1), Some(9));
        assert_eq!(matching_paren("f(a", 1), None);
    }
}
