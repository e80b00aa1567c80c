//! JSON value tree produced by the reader.
//!
//! [`Value`] couples a [`Payload`] (the actual JSON data) with the byte range
//! it was parsed from and up to three attached comments, one per
//! [`CommentPlacement`]. Equality compares payloads only; offsets and
//! comments are artifacts of a particular parse.

use std::collections::BTreeMap;
use std::fmt;

pub type Map = BTreeMap<String, Value>;

/// Where a comment sits relative to the value it annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPlacement {
    /// On the line(s) preceding the value.
    Before,
    /// Trailing the value on the same line.
    AfterOnSameLine,
    /// After the value, on a later line. Only ever attached to the root.
    After,
}

impl CommentPlacement {
    const COUNT: usize = 3;

    fn slot(self) -> usize {
        match self {
            CommentPlacement::Before => 0,
            CommentPlacement::AfterOnSameLine => 1,
            CommentPlacement::After => 2,
        }
    }
}

/// The data held by a [`Value`].
///
/// Integers that fit `i64` decode as `Int`; positive integers above
/// `i64::MAX` decode as `UInt`; everything else numeric decodes as `Double`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

/// A parsed JSON value.
///
/// # Examples
///
/// ```
/// use jsonlax::Value;
///
/// let value = Value::from(true);
/// assert!(value.is_bool());
/// assert_eq!(value.as_bool(), Some(true));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Value {
    payload: Payload,
    offset_start: usize,
    offset_limit: usize,
    comments: [Option<String>; CommentPlacement::COUNT],
}

/// Offsets and comments are parse artifacts; only payloads take part in
/// equality.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl Value {
    /// Returns the payload for inspection or pattern matching.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Consumes the value and returns its payload.
    #[must_use]
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Exchanges the payloads of two values, leaving offsets and comments of
    /// both in place.
    pub fn swap_payload(&mut self, other: &mut Value) {
        std::mem::swap(&mut self.payload, &mut other.payload);
    }

    pub(crate) fn set_payload(&mut self, payload: Payload) {
        self.payload = payload;
    }

    /// Returns `true` if the value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.payload, Payload::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self.payload, Payload::Bool(..))
    }

    /// Returns `true` if the value is a signed integer.
    #[must_use]
    pub fn is_int(&self) -> bool {
        matches!(self.payload, Payload::Int(..))
    }

    /// Returns `true` if the value is an unsigned integer beyond `i64` range.
    #[must_use]
    pub fn is_uint(&self) -> bool {
        matches!(self.payload, Payload::UInt(..))
    }

    /// Returns `true` if the value is a double.
    #[must_use]
    pub fn is_double(&self) -> bool {
        matches!(self.payload, Payload::Double(..))
    }

    /// Returns `true` for any numeric payload.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self.payload,
            Payload::Int(..) | Payload::UInt(..) | Payload::Double(..)
        )
    }

    /// Returns `true` if the value is a string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self.payload, Payload::String(..))
    }

    /// Returns `true` if the value is an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.payload, Payload::Array(..))
    }

    /// Returns `true` if the value is an object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self.payload, Payload::Object(..))
    }

    /// Returns the boolean payload, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.payload {
            Payload::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the payload as an `i64` when it fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self.payload {
            Payload::Int(value) => Some(value),
            Payload::UInt(value) if value <= i64::MAX as u64 => Some(value as i64),
            _ => None,
        }
    }

    /// Returns the payload as a `u64` when it fits.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self.payload {
            Payload::UInt(value) => Some(value),
            Payload::Int(value) if value >= 0 => Some(value as u64),
            _ => None,
        }
    }

    /// Returns any numeric payload widened to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self.payload {
            Payload::Int(value) => Some(value as f64),
            Payload::UInt(value) => Some(value as f64),
            Payload::Double(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::String(value) => Some(value),
            _ => None,
        }
    }

    /// Looks up an object member by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match &self.payload {
            Payload::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the array element at `index`.
    #[must_use]
    pub fn element(&self, index: usize) -> Option<&Value> {
        match &self.payload {
            Payload::Array(elements) => elements.get(index),
            _ => None,
        }
    }

    /// Number of elements or members; `0` for scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.payload {
            Payload::Array(elements) => elements.len(),
            Payload::Object(map) => map.len(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the object already contains `key`.
    #[must_use]
    pub fn is_member(&self, key: &str) -> bool {
        match &self.payload {
            Payload::Object(map) => map.contains_key(key),
            _ => false,
        }
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match &mut self.payload {
            Payload::Object(map) => map.get_mut(key),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, index: usize) -> Option<&mut Value> {
        match &mut self.payload {
            Payload::Array(elements) => elements.get_mut(index),
            _ => None,
        }
    }

    /// Returns the member slot for `key`, inserting a null member if absent.
    /// A repeated key reuses the existing slot, so the later write wins.
    pub(crate) fn member_mut(&mut self, key: &str) -> &mut Value {
        match &mut self.payload {
            Payload::Object(map) => map.entry(key.to_owned()).or_default(),
            _ => unreachable!("member_mut on non-object"),
        }
    }

    /// Appends a null element slot and returns it.
    pub(crate) fn push_element(&mut self) -> &mut Value {
        match &mut self.payload {
            Payload::Array(elements) => {
                elements.push(Value::default());
                elements.last_mut().expect("just pushed")
            }
            _ => unreachable!("push_element on non-array"),
        }
    }

    /// Byte offset of the first byte of the value's source span.
    #[must_use]
    pub fn offset_start(&self) -> usize {
        self.offset_start
    }

    /// Byte offset one past the value's source span.
    #[must_use]
    pub fn offset_limit(&self) -> usize {
        self.offset_limit
    }

    pub(crate) fn set_offset_start(&mut self, offset: usize) {
        self.offset_start = offset;
    }

    pub(crate) fn set_offset_limit(&mut self, offset: usize) {
        self.offset_limit = offset;
    }

    /// Attaches `comment` at `placement`, replacing any previous comment in
    /// that slot.
    pub fn set_comment(&mut self, comment: String, placement: CommentPlacement) {
        self.comments[placement.slot()] = Some(comment);
    }

    /// Returns the comment attached at `placement`, if any.
    #[must_use]
    pub fn comment(&self, placement: CommentPlacement) -> Option<&str> {
        self.comments[placement.slot()].as_deref()
    }

    #[must_use]
    pub fn has_comment(&self, placement: CommentPlacement) -> bool {
        self.comments[placement.slot()].is_some()
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        Value {
            payload,
            ..Value::default()
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Payload::Bool(value).into()
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Payload::Int(value).into()
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Payload::UInt(value).into()
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Payload::Double(value).into()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Payload::String(value.to_owned()).into()
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Payload::String(value).into()
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Payload::Array(elements).into()
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Payload::Object(map).into()
    }
}

/// Escapes a string for inclusion in a JSON string literal.
///
/// Quotes, backslashes, control characters, and the Unicode line separators
/// U+2028/U+2029 (which pre-2019 JSON parsers may mishandle) are written as
/// escape sequences; everything else passes through unchanged.
pub(crate) fn write_escaped_string<W: fmt::Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\u{2028}' | '\u{2029}' => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            // JSON escapes carry exactly 4 hex digits, so only characters in
            // the basic multilingual plane can be written this way.
            c if c.is_ascii_control() || c.is_control() && c as u32 <= 0xFFFF => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Writes a double so that it re-parses to the same value: shortest
/// round-trip form with a `.0` kept for integral doubles, and the special
/// spellings accepted under `allow_special_floats` for non-finite values.
pub(crate) fn write_double<W: fmt::Write>(f: &mut W, value: f64) -> fmt::Result {
    if value.is_nan() {
        f.write_str("NaN")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{value:?}")
    }
}

/// Canonical string form of a numeric payload, used for numeric object keys.
pub(crate) fn number_to_string(payload: &Payload) -> Option<String> {
    match payload {
        Payload::Int(value) => Some(value.to_string()),
        Payload::UInt(value) => Some(value.to_string()),
        Payload::Double(value) => {
            let mut out = String::new();
            write_double(&mut out, *value).ok()?;
            Some(out)
        }
        _ => None,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.payload.fmt(f)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Null => f.write_str("null"),
            Payload::Bool(value) => f.write_str(if *value { "true" } else { "false" }),
            Payload::Int(value) => write!(f, "{value}"),
            Payload::UInt(value) => write!(f, "{value}"),
            Payload::Double(value) => write_double(f, *value),
            Payload::String(value) => {
                f.write_str("\"")?;
                write_escaped_string(value, f)?;
                f.write_str("\"")
            }
            Payload::Array(elements) => {
                f.write_str("[")?;
                let mut first = true;
                for element in elements {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            Payload::Object(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (key, member) in map {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_str("\"")?;
                    write_escaped_string(key, f)?;
                    write!(f, "\":{member}")?;
                }
                f.write_str("}")
            }
        }
    }
}
