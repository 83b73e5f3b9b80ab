//! CSS Parser
//!
//! Single forward pass over the input that builds a [`Document`] tree. Only
//! block structure and declarations are understood; selectors and at-rule
//! preludes are kept as header text.

use cssforge_tree::{Document, ElementKind, NodeId};

use crate::error::{CssError, CssResult, SourceLocation};
use crate::syntax::{collapse_whitespace, find_top_level};

/// Parse a stylesheet into a document tree
pub fn parse(input: &str) -> CssResult<Document> {
    CssParser::new(input).parse()
}

/// An open block on the parser stack
struct OpenGroup {
    id: NodeId,
    header: String,
    at_rule: bool,
    location: SourceLocation,
}

/// CSS Parser
pub struct CssParser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    position: usize,
    line: usize,
    column: usize,
    doc: Document,
    /// Open blocks, innermost last; empty means the root is current
    stack: Vec<OpenGroup>,
    /// Text accumulated since the last `{`, `;` or `}`
    buffer: String,
    /// Where the buffered statement started
    buffer_start: SourceLocation,
}

impl<'a> CssParser<'a> {
    /// Create a new parser
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            position: 0,
            line: 1,
            column: 1,
            doc: Document::new(),
            stack: Vec::new(),
            buffer: String::new(),
            buffer_start: SourceLocation::new(1, 1, 0),
        }
    }

    /// Get the current source location
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.position)
    }

    /// Peek at the next character without consuming
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peek at the second character without consuming
    fn peek_second(&self) -> Option<char> {
        let mut iter = self.input[self.position..].chars();
        iter.next();
        iter.next()
    }

    /// Consume the next character
    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.position = pos + c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    fn current(&self) -> NodeId {
        self.stack.last().map(|g| g.id).unwrap_or_else(|| self.doc.root())
    }

    fn push_buffer(&mut self, c: char) {
        if self.buffer.trim().is_empty() && !c.is_whitespace() {
            self.buffer_start = self.location();
        }
        self.buffer.push(c);
    }

    /// Parse the whole input
    pub fn parse(mut self) -> CssResult<Document> {
        while let Some(c) = self.peek() {
            match c {
                '"' | '\'' => self.consume_string(c)?,
                '/' if self.peek_second() == Some('*') => self.consume_comment()?,
                '{' => {
                    let location = self.location();
                    self.advance();
                    self.open_group(location)?;
                }
                '}' => {
                    let location = self.location();
                    self.advance();
                    self.close_group(location)?;
                }
                ';' => {
                    self.advance();
                    // `data:...;base64,` must not end the statement
                    if self.input[self.position..].starts_with("base64") {
                        self.push_buffer(';');
                    } else {
                        self.finish_statement()?;
                    }
                }
                _ => {
                    self.advance();
                    self.push_buffer(c);
                }
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(CssError::UnclosedBlock {
                header: open.header.clone(),
                location: open.location,
            });
        }
        self.finish_statement()?;

        log::debug!("parsed stylesheet into {} nodes", self.doc.len());
        Ok(self.doc)
    }

    /// Copy a quoted string into the buffer verbatim, honoring escapes
    fn consume_string(&mut self, quote: char) -> CssResult<()> {
        let location = self.location();
        self.advance();
        self.push_buffer(quote);

        loop {
            match self.advance() {
                Some('\\') => {
                    self.buffer.push('\\');
                    match self.advance() {
                        Some(escaped) => self.buffer.push(escaped),
                        None => return Err(CssError::UnterminatedString { location }),
                    }
                }
                Some(c) if c == quote => {
                    self.buffer.push(c);
                    return Ok(());
                }
                Some(c) => self.buffer.push(c),
                None => return Err(CssError::UnterminatedString { location }),
            }
        }
    }

    /// Consume `/* ... */` into a comment element of the current group
    fn consume_comment(&mut self) -> CssResult<()> {
        let location = self.location();
        self.advance(); // consume '/'
        self.advance(); // consume '*'

        let mut text = String::new();
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    break;
                }
                Some(c) => text.push(c),
                None => return Err(CssError::UnterminatedComment { location }),
            }
        }

        let comment = self.doc.create_element(ElementKind::Comment, text);
        self.attach(comment);
        Ok(())
    }

    fn attach(&mut self, child: NodeId) {
        let parent = self.current();
        // Freshly created nodes are always detached, so this cannot fail
        if let Err(err) = self.doc.append_child(parent, child) {
            log::error!("failed to attach parsed node: {}", err);
        }
    }

    /// `{`: the buffer becomes the header of a new child group
    fn open_group(&mut self, location: SourceLocation) -> CssResult<()> {
        let header = collapse_whitespace(self.buffer.trim());
        self.buffer.clear();

        if header.is_empty() {
            return Err(CssError::malformed_header(header, location));
        }
        // Only at-rule blocks may contain nested blocks
        if let Some(open) = self.stack.last() {
            if !open.at_rule {
                return Err(CssError::malformed_header(
                    format!("{} {{ {}", open.header, header),
                    location,
                ));
            }
        }

        let group = self.doc.create_group(header.clone());
        self.attach(group);
        self.stack.push(OpenGroup {
            id: group,
            at_rule: header.starts_with('@'),
            header,
            location,
        });
        Ok(())
    }

    /// `}`: flush a trailing declaration and return to the parent group
    fn close_group(&mut self, location: SourceLocation) -> CssResult<()> {
        if self.stack.is_empty() {
            return Err(CssError::UnbalancedBrace { location });
        }
        self.finish_statement()?;
        self.stack.pop();
        Ok(())
    }

    /// Turn the buffered text into a property or a passthrough statement
    fn finish_statement(&mut self) -> CssResult<()> {
        let text = self.buffer.trim().to_string();
        self.buffer.clear();
        if text.is_empty() {
            return Ok(());
        }

        let at_root = self.stack.is_empty();
        let location = self.buffer_start;

        let node = if text.starts_with('@') {
            let kind = if starts_with_ignore_case(&text, "@import") {
                ElementKind::Import
            } else {
                ElementKind::Statement
            };
            self.doc.create_element(kind, collapse_whitespace(&text))
        } else if let Some(colon) = find_top_level(&text, ':').filter(|&i| i > 0) {
            if at_root {
                return Err(CssError::stray_declaration(text, location));
            }
            let name = text[..colon].trim();
            let value = collapse_whitespace(text[colon + 1..].trim());
            self.doc.create_property(name, value)
        } else {
            if at_root {
                return Err(CssError::stray_declaration(text, location));
            }
            self.doc.create_element(ElementKind::Statement, text)
        };

        self.attach(node);
        Ok(())
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}
