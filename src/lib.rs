//! Permissive JSON reader with diagnostics.
//!
//! `jsonlax` parses a UTF-8 byte range into a [`Value`] tree in a single
//! pass, accepting (and optionally retaining) comments plus a configurable
//! set of syntax extensions, and reporting failures as human-readable
//! diagnostics keyed to 1-based line/column positions.
//!
//! The default feature set is permissive; [`Features::strict`] or
//! [`ReaderBuilder::strict`] turn every leniency off.
//!
//! ```
//! let root = jsonlax::parse(r#"{ "answer": 42 } // annotated"#).unwrap();
//! assert_eq!(root.get("answer").and_then(jsonlax::Value::as_i64), Some(42));
//! ```
//!
//! For control over features and access to the raw error journal, drive a
//! [`Reader`] directly:
//!
//! ```
//! use jsonlax::{Features, Reader, Value};
//!
//! let mut features = Features::default();
//! features.allow_dropped_null_placeholders = true;
//! let mut reader = Reader::new(features);
//! let mut root = Value::default();
//! assert!(reader.parse(b"[1, , 3]", &mut root).unwrap());
//! assert!(root.element(1).unwrap().is_null());
//! ```

mod reader;
mod value;

pub use reader::{
    parse_from_reader, FatalError, Features, InvalidSettings, Location, ParseError, ReadError,
    Reader, ReaderBuilder, StreamError,
};
pub use value::{CommentPlacement, Map, Payload, Value};

/// Parses `document` with the default (permissive) feature set.
///
/// # Errors
///
/// Returns [`ReadError::Invalid`] with the formatted journal when the
/// document is rejected, or [`ReadError::Fatal`] for the depth and
/// key-length guards.
pub fn parse(document: &str) -> Result<Value, ReadError> {
    parse_bytes(document.as_bytes())
}

/// Byte-range variant of [`parse`].
pub fn parse_bytes(document: &[u8]) -> Result<Value, ReadError> {
    parse_with(document, Features::default())
}

/// Parses `document` under `features`.
pub fn parse_with(document: &[u8], features: Features) -> Result<Value, ReadError> {
    let mut reader = Reader::new(features);
    let mut root = Value::default();
    let successful = reader.parse(document, &mut root)?;
    if successful {
        Ok(root)
    } else {
        Err(ReadError::Invalid {
            formatted: reader.format_error_messages(),
            errors: reader.errors().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests;
