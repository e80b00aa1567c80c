//! Diagnostic and failure types.

use std::fmt;
use std::io;

use thiserror::Error;

/// 1-based line/column position within a parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}, Column {}", self.line, self.column)
    }
}

/// One entry in the reader's error journal.
///
/// Entries are kept in insertion order. The `Display` form is the block this
/// entry contributes to the formatted diagnostics:
///
/// ```text
/// * Line 1, Column 15
///   Syntax error: value, object or array expected.
/// ```
///
/// with an additional `See Line L, Column C for detail.` line when a
/// secondary location pinpoints the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub location: Location,
    pub message: String,
    pub extra: Option<Location>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "* {}", self.location)?;
        writeln!(f, "  {}", self.message)?;
        if let Some(extra) = self.extra {
            writeln!(f, "See {extra} for detail.")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Unrecoverable parse abort. Everything else lands in the error journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FatalError {
    /// Logical recursion depth exceeded `Features::stack_limit`.
    #[error("Exceeded stackLimit in readValue().")]
    StackLimitExceeded,
    /// An object member name reached the hard length cap.
    #[error("keylength >= 2^30")]
    KeyTooLong,
}

/// Failure of the stream entry point.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Fatal(#[from] FatalError),
}

/// Failure of the convenience entry points.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The document was rejected; `formatted` is the rendered journal.
    #[error("{formatted}")]
    Invalid {
        formatted: String,
        errors: Vec<ParseError>,
    },
    #[error(transparent)]
    Fatal(#[from] FatalError),
}
