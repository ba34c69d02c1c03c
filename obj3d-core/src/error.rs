//! Error types for OBJ/MTL decoding
//!
//! Two tiers: [`Error`] aborts a pass and reaches the caller with no result,
//! [`LineIssue`] is recovered in place and only recorded.
use std::fmt;
use std::io;
use thiserror::Error;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Preallocated buffer that a write ran past
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Positions,
    Normals,
    Triangles,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BufferKind::Positions => "position",
            BufferKind::Normals => "normal",
            BufferKind::Triangles => "triangle",
        };
        f.write_str(name)
    }
}

/// Fatal errors. Any of these ends the current pass.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the geometry or material stream failed
    #[error("I/O error while reading stream: {0}")]
    Io(#[from] io::Error),

    /// Opening a named resource failed for a reason other than "not found"
    #[error("failed to open resource `{name}`: {source}")]
    Resource {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The decoder produced more entries than the analyzer sized for.
    /// Both passes must see byte-identical input.
    #[error("{buffer} buffer overflow: analyzed capacity is {capacity} entries")]
    CapacityExceeded { buffer: BufferKind, capacity: usize },

    /// Strict load requested and at least one line needed recovery
    #[error("model did not load cleanly: {failures} line(s) failed to parse")]
    UncleanLoad { failures: usize },
}

/// A recoverable problem on a single line. The decoder substitutes defaults
/// and keeps going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineIssue {
    #[error("invalid number `{token}`")]
    InvalidNumber { token: String },

    #[error("expected {expected} components, found {found}")]
    MissingComponents { expected: usize, found: usize },

    #[error("invalid face reference `{token}`")]
    InvalidFaceRef { token: String },

    #[error("face has {found} vertices, at least 3 are required")]
    TooFewFaceVertices { found: usize },

    /// Bytes that weren't UTF-8 were replaced before parsing
    #[error("line is not valid UTF-8")]
    InvalidText,
}

/// A recovered line, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFailure {
    /// 1-based line number in the geometry stream
    pub line: usize,
    pub keyword: &'static str,
    pub issue: LineIssue,
}

impl fmt::Display for LineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} ({}): {}", self.line, self.keyword, self.issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message_names_buffer() {
        let err = Error::CapacityExceeded {
            buffer: BufferKind::Triangles,
            capacity: 4,
        };
        assert_eq!(
            err.to_string(),
            "triangle buffer overflow: analyzed capacity is 4 entries"
        );
    }

    #[test]
    fn test_line_failure_display() {
        let failure = LineFailure {
            line: 7,
            keyword: "v",
            issue: LineIssue::InvalidNumber {
                token: "a".to_string(),
            },
        };
        assert_eq!(failure.to_string(), "line 7 (v): invalid number `a`");
    }
}
