//! Renderer
//!
//! Turns a document back into CSS text, either compressed or pretty printed.

use crate::node::{ElementKind, NodeId, NodeKind};
use crate::tree::Document;

impl Document {
    /// Render the document.
    ///
    /// Compressed output drops insignificant whitespace and the semicolon
    /// after the last declaration of each block. Pretty output indents two
    /// spaces per level and always terminates declarations with `;`.
    pub fn render(&self, compressed: bool) -> String {
        let mut output = String::new();
        for child in self.children(self.root()) {
            if compressed {
                self.render_compressed(child, &mut output);
            } else {
                self.render_pretty(child, 0, &mut output);
            }
        }
        output
    }

    fn render_compressed(&self, id: NodeId, output: &mut String) {
        let Some(node) = self.get(id) else { return };

        match &node.kind {
            NodeKind::Group(group) => {
                output.push_str(&compress_header(&group.name));
                output.push('{');
                let last_property = node
                    .children
                    .iter()
                    .rposition(|c| self.get(*c).map(|n| n.is_property()).unwrap_or(false));
                for (index, &child) in node.children.iter().enumerate() {
                    match self.get(child).map(|n| &n.kind) {
                        Some(NodeKind::Property(prop)) => {
                            output.push_str(&prop.name);
                            output.push(':');
                            output.push_str(&compress_value(&prop.value));
                            // The last declaration of a body needs no terminator
                            if Some(index) != last_property || index + 1 != node.children.len() {
                                output.push(';');
                            }
                        }
                        _ => self.render_compressed(child, output),
                    }
                }
                output.push('}');
            }
            NodeKind::Property(prop) => {
                output.push_str(&prop.name);
                output.push(':');
                output.push_str(&compress_value(&prop.value));
                output.push(';');
            }
            NodeKind::Element(elem) => match elem.kind {
                ElementKind::Comment => {
                    output.push_str("/*");
                    output.push_str(&elem.text);
                    output.push_str("*/");
                }
                ElementKind::Import | ElementKind::Statement => {
                    output.push_str(&elem.text);
                    output.push(';');
                }
            },
        }
    }

    fn render_pretty(&self, id: NodeId, depth: usize, output: &mut String) {
        let Some(node) = self.get(id) else { return };
        let indent = "  ".repeat(depth);

        match &node.kind {
            NodeKind::Group(group) => {
                output.push_str(&format!("{}{} {{\n", indent, group.name));
                for &child in &node.children {
                    self.render_pretty(child, depth + 1, output);
                }
                output.push_str(&format!("{}}}\n", indent));
            }
            NodeKind::Property(prop) => {
                output.push_str(&format!("{}{}: {};\n", indent, prop.name, prop.value));
            }
            NodeKind::Element(elem) => match elem.kind {
                ElementKind::Comment => {
                    output.push_str(&format!("{}/*{}*/\n", indent, elem.text));
                }
                ElementKind::Import | ElementKind::Statement => {
                    output.push_str(&format!("{}{};\n", indent, elem.text));
                }
            },
        }
    }
}

/// Drop whitespace around `,` and `>` in a selector header. Parenthesised
/// parts (media features, `:not(...)`) and strings are left alone.
fn compress_header(header: &str) -> String {
    if header.starts_with('@') {
        return compress_around(header, &[','], false);
    }
    compress_around(header, &[',', '>'], false)
}

/// Drop whitespace after commas in a declaration value, outside strings
fn compress_value(value: &str) -> String {
    compress_around(value, &[','], true)
}

fn compress_around(text: &str, separators: &[char], inside_parens: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut chars = text.chars().peekable();
    let mut escaped = false;

    while let Some(c) = chars.next() {
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

        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '(' => {
                depth += 1;
                out.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                out.push(c);
            }
            c if separators.contains(&c) && (depth == 0 || inside_parens) => {
                while out.ends_with(' ') {
                    out.pop();
                }
                out.push(c);
                while chars.peek().map(|n| n.is_whitespace()).unwrap_or(false) {
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }

    out
}
