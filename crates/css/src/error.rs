//! CSS parsing error types

use std::fmt;
use thiserror::Error;

/// CSS parsing result type
pub type CssResult<T> = Result<T, CssError>;

/// Source location in CSS
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Byte offset from start
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// CSS parsing errors. Each one is fatal for the stylesheet being parsed.
#[derive(Debug, Error)]
pub enum CssError {
    #[error("Unbalanced '}}' at {location}")]
    UnbalancedBrace {
        location: SourceLocation,
    },

    #[error("Unclosed block '{header}' at end of input ({location})")]
    UnclosedBlock {
        header: String,
        location: SourceLocation,
    },

    #[error("Malformed block header '{header}' at {location}")]
    MalformedHeader {
        header: String,
        location: SourceLocation,
    },

    #[error("Stray declaration '{text}' at {location}")]
    StrayDeclaration {
        text: String,
        location: SourceLocation,
    },

    #[error("Unterminated string at {location}")]
    UnterminatedString {
        location: SourceLocation,
    },

    #[error("Unterminated comment at {location}")]
    UnterminatedComment {
        location: SourceLocation,
    },
}

impl CssError {
    /// Get the source location of this error
    pub fn location(&self) -> SourceLocation {
        match self {
            Self::UnbalancedBrace { location } => *location,
            Self::UnclosedBlock { location, .. } => *location,
            Self::MalformedHeader { location, .. } => *location,
            Self::StrayDeclaration { location, .. } => *location,
            Self::UnterminatedString { location } => *location,
            Self::UnterminatedComment { location } => *location,
        }
    }

    pub fn malformed_header(header: impl Into<String>, location: SourceLocation) -> Self {
        Self::MalformedHeader { header: header.into(), location }
    }

    pub fn stray_declaration(text: impl Into<String>, location: SourceLocation) -> Self {
        Self::StrayDeclaration { text: text.into(), location }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation::new(10, 5, 100);
        assert_eq!(format!("{}", loc), "10:5");
    }

    #[test]
    fn test_error_display() {
        let loc = SourceLocation::new(1, 10, 9);
        let err = CssError::UnbalancedBrace { location: loc };
        assert_eq!(format!("{}", err), "Unbalanced '}' at 1:10");
        assert_eq!(err.location(), loc);
    }
}
