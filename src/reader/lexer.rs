//! Tokenizer over the raw byte cursor.
//!
//! `read_token` classifies the next lexical unit without allocating; string
//! and number interpretation is deferred to the decoders. Comments are
//! consumed here and handed to the [`CommentChannel`] so they never enter
//! the value grammar.

use super::comments::CommentChannel;
use super::cursor::Cursor;
use super::error::Location;
use super::features::Features;
use super::token::{Token, TokenKind};

#[derive(Debug)]
pub(crate) struct Lexer<'doc> {
    cursor: Cursor<'doc>,
    features: Features,
    pub(crate) comments: CommentChannel,
}

impl<'doc> Lexer<'doc> {
    pub fn new(doc: &'doc [u8], features: Features) -> Self {
        Self {
            cursor: Cursor::new(doc),
            features,
            comments: CommentChannel::new(features.collect_comments),
        }
    }

    pub fn document(&self) -> &'doc [u8] {
        self.cursor.document()
    }

    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    pub fn peek(&self) -> Option<u8> {
        self.cursor.peek()
    }

    pub fn skip_spaces(&mut self) {
        self.cursor.skip_spaces();
    }

    /// Pushes the byte just consumed back onto the input.
    pub fn rewind(&mut self) {
        self.cursor.rewind();
    }

    pub fn location(&self, offset: usize) -> Location {
        self.cursor.location(offset)
    }

    /// Classifies the next lexical unit. Failures surface as `Error` tokens;
    /// there is no other failure channel at this layer.
    pub fn read_token(&mut self) -> Token {
        self.cursor.skip_spaces();
        let offset_start = self.cursor.offset();
        let c = self.cursor.next_byte();
        let mut ok = true;
        let kind = match c {
            b'{' => TokenKind::ObjectBegin,
            b'}' => TokenKind::ObjectEnd,
            b'[' => TokenKind::ArrayBegin,
            b']' => TokenKind::ArrayEnd,
            b'"' => {
                ok = self.read_string(b'"');
                TokenKind::String
            }
            b'\'' if self.features.allow_single_quotes => {
                ok = self.read_string(b'\'');
                TokenKind::String
            }
            // A single quote without allow_single_quotes takes the comment
            // path and fails there, yielding an error token.
            b'/' | b'\'' => {
                ok = self.read_comment(offset_start);
                TokenKind::Comment
            }
            b'0'..=b'9' => {
                self.read_number(false);
                TokenKind::Number
            }
            b'-' => {
                if self.read_number(true) {
                    TokenKind::Number
                } else {
                    ok = self.features.allow_special_floats
                        && self.cursor.match_literal(b"nfinity");
                    TokenKind::NegInf
                }
            }
            b't' => {
                ok = self.cursor.match_literal(b"rue");
                TokenKind::True
            }
            b'f' => {
                ok = self.cursor.match_literal(b"alse");
                TokenKind::False
            }
            b'n' => {
                ok = self.cursor.match_literal(b"ull");
                TokenKind::Null
            }
            b'N' => {
                ok = self.features.allow_special_floats && self.cursor.match_literal(b"aN");
                TokenKind::NaN
            }
            b'I' => {
                ok = self.features.allow_special_floats && self.cursor.match_literal(b"nfinity");
                TokenKind::PosInf
            }
            b',' => TokenKind::ArraySeparator,
            b':' => TokenKind::MemberSeparator,
            0 => TokenKind::EndOfStream,
            _ => {
                ok = false;
                TokenKind::Error
            }
        };
        Token {
            kind: if ok { kind } else { TokenKind::Error },
            offset_start,
            offset_end: self.cursor.offset(),
        }
    }

    /// Consumes a comment whose leading `/` sits at `comment_begin`, then
    /// hands the span to the comment channel.
    fn read_comment(&mut self, comment_begin: usize) -> bool {
        let style = self.cursor.next_byte();
        let successful = match style {
            b'*' => self.read_c_style_comment(),
            b'/' => self.read_cpp_style_comment(),
            _ => false,
        };
        if !successful {
            return false;
        }
        let comment_end = self.cursor.offset();
        self.comments
            .observe(self.cursor.document(), comment_begin, comment_end, style);
        true
    }

    /// Consumes through the closing `*/`.
    fn read_c_style_comment(&mut self) -> bool {
        while self.cursor.offset() + 1 < self.cursor.document().len() {
            let c = self.cursor.next_byte();
            if c == b'*' && self.cursor.peek() == Some(b'/') {
                break;
            }
        }
        self.cursor.next_byte() == b'/'
    }

    /// Consumes to the end of the line, treating CRLF as one terminator.
    fn read_cpp_style_comment(&mut self) -> bool {
        while !self.cursor.at_end() {
            let c = self.cursor.next_byte();
            if c == b'\n' {
                break;
            }
            if c == b'\r' {
                if self.cursor.peek() == Some(b'\n') {
                    self.cursor.next_byte();
                }
                break;
            }
        }
        true
    }

    /// Consumes to the closing quote, honoring backslash escapes. An escape
    /// always covers exactly one extra byte here; full decoding happens
    /// later.
    fn read_string(&mut self, quote: u8) -> bool {
        let mut c = 0;
        while !self.cursor.at_end() {
            c = self.cursor.next_byte();
            if c == b'\\' {
                self.cursor.next_byte();
            } else if c == quote {
                break;
            }
        }
        c == quote
    }

    /// Consumes the remainder of a numeric literal (the first byte is
    /// already consumed). With `check_inf`, an immediate `I` aborts the
    /// numeric attempt so `-Infinity` can be matched instead.
    fn read_number(&mut self, check_inf: bool) -> bool {
        if check_inf && self.cursor.peek() == Some(b'I') {
            self.cursor.next_byte();
            return false;
        }
        while matches!(self.cursor.peek(), Some(b'0'..=b'9')) {
            self.cursor.next_byte();
        }
        if self.cursor.peek() == Some(b'.') {
            self.cursor.next_byte();
            while matches!(self.cursor.peek(), Some(b'0'..=b'9')) {
                self.cursor.next_byte();
            }
        }
        if matches!(self.cursor.peek(), Some(b'e' | b'E')) {
            self.cursor.next_byte();
            if matches!(self.cursor.peek(), Some(b'+' | b'-')) {
                self.cursor.next_byte();
            }
            while matches!(self.cursor.peek(), Some(b'0'..=b'9')) {
                self.cursor.next_byte();
            }
        }
        true
    }
}
