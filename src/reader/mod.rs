//! The permissive JSON reader.
//!
//! A single-pass recursive-descent parser over a borrowed byte range. The
//! [`Lexer`] classifies lexical units, the decoders interpret string and
//! number spans, and the parser drives the [`Value`] tree while appending
//! human-readable diagnostics to an error journal. Non-fatal errors trigger
//! local recovery (skipping to the end of the enclosing container); only the
//! depth and key-length guards abort the parse outright.

mod comments;
mod cursor;
mod error;
mod escape;
mod features;
mod lexer;
mod number;
mod token;

use std::io::Read;

pub use self::error::{FatalError, Location, ParseError, ReadError, StreamError};
pub use self::features::{Features, InvalidSettings, ReaderBuilder};

use self::lexer::Lexer;
use self::token::{Token, TokenKind};
use crate::value::{CommentPlacement, Map, Payload, Value};

/// A reusable reader configured with a fixed [`Features`] set.
///
/// Each call to [`parse`](Reader::parse) runs to completion on the caller's
/// thread and borrows the document only for the duration of the call; the
/// produced [`Value`] tree outlives the reader. The journal of the most
/// recent parse is available from [`errors`](Reader::errors) and
/// [`format_error_messages`](Reader::format_error_messages).
#[derive(Debug, Default)]
pub struct Reader {
    features: Features,
    errors: Vec<ParseError>,
}

impl Reader {
    #[must_use]
    pub fn new(features: Features) -> Self {
        Self {
            features,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn features(&self) -> &Features {
        &self.features
    }

    /// Parses `document` into `root`.
    ///
    /// Returns `Ok(true)` on success, `Ok(false)` when diagnostics were
    /// recorded, and `Err` only for the fatal depth and key-length guards.
    pub fn parse(&mut self, document: &[u8], root: &mut Value) -> Result<bool, FatalError> {
        let mut parser = Parser::new(document, self.features);
        let result = parser.run(root);
        self.errors = parser.errors;
        result
    }

    /// Journal of the most recent parse, in insertion order.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Renders the journal in the diagnostic format:
    ///
    /// ```text
    /// * Line <L>, Column <C>
    ///   <message>
    /// See Line <L'>, Column <C'> for detail.
    /// ```
    #[must_use]
    pub fn format_error_messages(&self) -> String {
        use std::fmt::Write;
        let mut formatted = String::new();
        for error in &self.errors {
            let _ = write!(formatted, "{error}");
        }
        formatted
    }
}

/// Slurps `input` into a contiguous buffer and delegates to the in-memory
/// entry point of a reader built from `builder`. When `errs` is provided it
/// receives the formatted diagnostics of the parse.
pub fn parse_from_reader<R: Read>(
    builder: &ReaderBuilder,
    mut input: R,
    root: &mut Value,
    errs: Option<&mut String>,
) -> Result<bool, StreamError> {
    let mut document = Vec::new();
    input.read_to_end(&mut document)?;
    let mut reader = builder.build();
    let successful = reader.parse(&document, root)?;
    if let Some(errs) = errs {
        *errs = reader.format_error_messages();
    }
    Ok(successful)
}

/// Per-parse state. The recursion depth of `read_value` is the node stack;
/// it never exceeds `features.stack_limit`.
struct Parser<'doc> {
    lexer: Lexer<'doc>,
    features: Features,
    errors: Vec<ParseError>,
}

impl<'doc> Parser<'doc> {
    fn new(document: &'doc [u8], mut features: Features) -> Self {
        if !features.allow_comments {
            features.collect_comments = false;
        }
        Self {
            lexer: Lexer::new(document, features),
            features,
            errors: Vec::new(),
        }
    }

    fn run(&mut self, root: &mut Value) -> Result<bool, FatalError> {
        let successful = self.read_value(root, 1)?;
        let token = self.skip_comment_tokens();
        let root_ticket = self.lexer.comments.ticket();
        self.attach_trailing(root_ticket, root);
        if self.features.fail_if_extra
            && (self.features.strict_root || successful || token.kind != TokenKind::Error)
            && token.kind != TokenKind::EndOfStream
        {
            self.add_error("Extra non-whitespace after JSON value.", &token, None);
            return Ok(false);
        }
        if self.lexer.comments.has_before() {
            let text = self.lexer.comments.take_before();
            root.set_comment(text, CommentPlacement::After);
        }
        if self.features.strict_root && !root.is_array() && !root.is_object() {
            // The error range spans the whole document; ideally it would be
            // the first token found in it.
            let whole = Token {
                kind: TokenKind::Error,
                offset_start: 0,
                offset_end: self.lexer.document().len(),
            };
            self.add_error(
                "A valid JSON document must be either an array or an object value.",
                &whole,
                None,
            );
            return Ok(false);
        }
        Ok(successful)
    }

    /// Parses one value into `slot`. `depth` counts the slot itself, so the
    /// root enters at 1; the guard runs before any token is read.
    fn read_value(&mut self, slot: &mut Value, depth: usize) -> Result<bool, FatalError> {
        if depth > self.features.stack_limit {
            return Err(FatalError::StackLimitExceeded);
        }
        let token = self.skip_comment_tokens();
        let mut successful = true;

        if self.lexer.comments.has_before() {
            let text = self.lexer.comments.take_before();
            slot.set_comment(text, CommentPlacement::Before);
        }

        match token.kind {
            TokenKind::ObjectBegin => {
                successful = self.read_object(&token, slot, depth)?;
                slot.set_offset_limit(self.lexer.offset());
            }
            TokenKind::ArrayBegin => {
                successful = self.read_array(&token, slot, depth)?;
                slot.set_offset_limit(self.lexer.offset());
            }
            TokenKind::Number => successful = self.decode_number_into(&token, slot),
            TokenKind::String => successful = self.decode_string_into(&token, slot),
            TokenKind::True => install_scalar(slot, &token, Payload::Bool(true)),
            TokenKind::False => install_scalar(slot, &token, Payload::Bool(false)),
            TokenKind::Null => install_scalar(slot, &token, Payload::Null),
            TokenKind::NaN => install_scalar(slot, &token, Payload::Double(f64::NAN)),
            TokenKind::PosInf => install_scalar(slot, &token, Payload::Double(f64::INFINITY)),
            TokenKind::NegInf => {
                install_scalar(slot, &token, Payload::Double(f64::NEG_INFINITY));
            }
            TokenKind::ArraySeparator | TokenKind::ObjectEnd | TokenKind::ArrayEnd
                if self.features.allow_dropped_null_placeholders =>
            {
                // Un-read the delimiter so the enclosing container sees it
                // again, and mark this slot as a null.
                self.lexer.rewind();
                let offset = self.lexer.offset();
                slot.set_payload(Payload::Null);
                slot.set_offset_start(offset.saturating_sub(1));
                slot.set_offset_limit(offset);
            }
            _ => {
                slot.set_offset_start(token.offset_start);
                slot.set_offset_limit(token.offset_end);
                return Ok(self.add_error(
                    "Syntax error: value, object or array expected.",
                    &token,
                    None,
                ));
            }
        }

        let offset = self.lexer.offset();
        self.lexer.comments.note_value_end(offset);

        Ok(successful)
    }

    /// Parses the members of an object; the `{` token is already consumed.
    fn read_object(
        &mut self,
        start: &Token,
        slot: &mut Value,
        depth: usize,
    ) -> Result<bool, FatalError> {
        slot.set_payload(Payload::Object(Map::new()));
        slot.set_offset_start(start.offset_start);
        let mut name = String::new();
        let mut prev: Option<(u64, String)> = None;
        loop {
            let mut token = self.lexer.read_token();
            while token.kind == TokenKind::Comment {
                token = self.lexer.read_token();
            }
            if token.kind == TokenKind::ObjectEnd && name.is_empty() {
                // Empty object, or `}` directly after an empty member name.
                self.flush_member_trailing(slot, &prev);
                return Ok(true);
            }
            name.clear();
            match token.kind {
                TokenKind::String => {
                    match escape::decode_string(self.lexer.document(), &token) {
                        Ok(decoded) => name = decoded,
                        Err(err) => {
                            self.add_error(err.kind.to_string(), &token, err.extra);
                            self.flush_member_trailing(slot, &prev);
                            return Ok(self.recover_from_error(TokenKind::ObjectEnd));
                        }
                    }
                }
                TokenKind::Number if self.features.allow_numeric_keys => {
                    match number::decode_number(self.lexer.document(), &token) {
                        Ok(payload) => {
                            name = crate::value::number_to_string(&payload).unwrap_or_default();
                        }
                        Err(err) => {
                            self.add_error(err.to_string(), &token, None);
                            self.flush_member_trailing(slot, &prev);
                            return Ok(self.recover_from_error(TokenKind::ObjectEnd));
                        }
                    }
                }
                _ => {
                    self.flush_member_trailing(slot, &prev);
                    return Ok(self.add_error_and_recover(
                        "Missing '}' or object member name",
                        &token,
                        TokenKind::ObjectEnd,
                    ));
                }
            }

            let colon = self.lexer.read_token();
            if colon.kind != TokenKind::MemberSeparator {
                self.flush_member_trailing(slot, &prev);
                return Ok(self.add_error_and_recover(
                    "Missing ':' after object member name",
                    &colon,
                    TokenKind::ObjectEnd,
                ));
            }

            if name.len() >= (1 << 30) {
                return Err(FatalError::KeyTooLong);
            }
            if self.features.reject_dup_keys && slot.is_member(&name) {
                let message = format!("Duplicate key: '{name}'");
                self.flush_member_trailing(slot, &prev);
                return Ok(self.add_error_and_recover(message, &token, TokenKind::ObjectEnd));
            }

            let ok = {
                let member = slot.member_mut(&name);
                self.read_value(member, depth + 1)?
            };
            let ticket = self.lexer.comments.ticket();
            self.flush_member_trailing(slot, &prev);
            prev = Some((ticket, name.clone()));
            if !ok {
                // Error already journaled by the member parse.
                self.flush_member_trailing(slot, &prev);
                return Ok(self.recover_from_error(TokenKind::ObjectEnd));
            }

            let mut comma = self.lexer.read_token();
            if comma.kind != TokenKind::ObjectEnd
                && comma.kind != TokenKind::ArraySeparator
                && comma.kind != TokenKind::Comment
            {
                self.flush_member_trailing(slot, &prev);
                return Ok(self.add_error_and_recover(
                    "Missing ',' or '}' in object declaration",
                    &comma,
                    TokenKind::ObjectEnd,
                ));
            }
            while comma.kind == TokenKind::Comment {
                comma = self.lexer.read_token();
            }
            if comma.kind == TokenKind::ObjectEnd {
                self.flush_member_trailing(slot, &prev);
                return Ok(true);
            }
        }
    }

    /// Parses the elements of an array; the `[` token is already consumed.
    fn read_array(
        &mut self,
        start: &Token,
        slot: &mut Value,
        depth: usize,
    ) -> Result<bool, FatalError> {
        slot.set_payload(Payload::Array(Vec::new()));
        slot.set_offset_start(start.offset_start);
        self.lexer.skip_spaces();
        if self.lexer.peek() == Some(b']') {
            // Empty array.
            let _end_array = self.lexer.read_token();
            return Ok(true);
        }
        let mut prev: Option<(u64, usize)> = None;
        let mut index = 0usize;
        loop {
            let ok = {
                let element = slot.push_element();
                self.read_value(element, depth + 1)?
            };
            let ticket = self.lexer.comments.ticket();
            self.flush_element_trailing(slot, &prev);
            prev = Some((ticket, index));
            index += 1;
            if !ok {
                // Error already journaled by the element parse.
                self.flush_element_trailing(slot, &prev);
                return Ok(self.recover_from_error(TokenKind::ArrayEnd));
            }

            let mut token = self.lexer.read_token();
            while token.kind == TokenKind::Comment {
                token = self.lexer.read_token();
            }
            if token.kind != TokenKind::ArraySeparator && token.kind != TokenKind::ArrayEnd {
                self.flush_element_trailing(slot, &prev);
                return Ok(self.add_error_and_recover(
                    "Missing ',' or ']' in array declaration",
                    &token,
                    TokenKind::ArrayEnd,
                ));
            }
            if token.kind == TokenKind::ArrayEnd {
                self.flush_element_trailing(slot, &prev);
                return Ok(true);
            }
        }
    }

    /// Reads the next non-comment token. With comments disabled a comment
    /// still lexes as a single (rejected) token.
    fn skip_comment_tokens(&mut self) -> Token {
        if self.features.allow_comments {
            loop {
                let token = self.lexer.read_token();
                if token.kind != TokenKind::Comment {
                    return token;
                }
            }
        } else {
            self.lexer.read_token()
        }
    }

    fn decode_number_into(&mut self, token: &Token, slot: &mut Value) -> bool {
        match number::decode_number(self.lexer.document(), token) {
            Ok(payload) => {
                install_scalar(slot, token, payload);
                true
            }
            Err(err) => self.add_error(err.to_string(), token, None),
        }
    }

    fn decode_string_into(&mut self, token: &Token, slot: &mut Value) -> bool {
        match escape::decode_string(self.lexer.document(), token) {
            Ok(decoded) => {
                install_scalar(slot, token, Payload::String(decoded));
                true
            }
            Err(err) => self.add_error(err.kind.to_string(), token, err.extra),
        }
    }

    /// Appends a journal entry. Always returns `false` so error paths can
    /// return the call directly.
    fn add_error(&mut self, message: impl Into<String>, token: &Token, extra: Option<usize>) -> bool {
        self.errors.push(ParseError {
            location: self.lexer.location(token.offset_start),
            message: message.into(),
            extra: extra.map(|offset| self.lexer.location(offset)),
        });
        false
    }

    /// Skips tokens until `skip_until` or end of stream, consuming the
    /// terminator. Errors reported before recovery began are preserved;
    /// anything accumulated by recovery itself is discarded.
    fn recover_from_error(&mut self, skip_until: TokenKind) -> bool {
        let error_count = self.errors.len();
        loop {
            let skip = self.lexer.read_token();
            if skip.kind == skip_until || skip.kind == TokenKind::EndOfStream {
                break;
            }
        }
        self.errors.truncate(error_count);
        false
    }

    fn add_error_and_recover(
        &mut self,
        message: impl Into<String>,
        token: &Token,
        skip_until: TokenKind,
    ) -> bool {
        self.add_error(message, token, None);
        self.recover_from_error(skip_until)
    }

    /// Attaches any same-line trailing comment queued for `ticket` to
    /// `value`, replacing an earlier attachment.
    fn attach_trailing(&mut self, ticket: u64, value: &mut Value) {
        if let Some(text) = self.lexer.comments.take_trailing(ticket) {
            value.set_comment(text, CommentPlacement::AfterOnSameLine);
        }
    }

    fn flush_member_trailing(&mut self, object: &mut Value, prev: &Option<(u64, String)>) {
        if let Some((ticket, key)) = prev {
            if let Some(text) = self.lexer.comments.take_trailing(*ticket) {
                if let Some(member) = object.get_mut(key) {
                    member.set_comment(text, CommentPlacement::AfterOnSameLine);
                }
            }
        }
    }

    fn flush_element_trailing(&mut self, array: &mut Value, prev: &Option<(u64, usize)>) {
        if let Some((ticket, idx)) = prev {
            if let Some(text) = self.lexer.comments.take_trailing(*ticket) {
                if let Some(element) = array.element_mut(*idx) {
                    element.set_comment(text, CommentPlacement::AfterOnSameLine);
                }
            }
        }
    }
}

fn install_scalar(slot: &mut Value, token: &Token, payload: Payload) {
    slot.set_payload(payload);
    slot.set_offset_start(token.offset_start);
    slot.set_offset_limit(token.offset_end);
}
