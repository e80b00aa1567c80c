//! Comment capture, kept on a channel separate from the value grammar.
//!
//! Comments are not tokens in the value grammar. Text destined for the
//! *next* value accumulates in a pending buffer and is attached with
//! placement `Before`; text trailing the *last completed* value on the same
//! line is queued against that value's completion ticket and attached by the
//! stack frame that owns it. Line endings are normalized (CR and CRLF become
//! LF) before buffering so downstream serialization is stable.

use crate::value::CommentPlacement;

#[derive(Debug)]
pub(crate) struct CommentChannel {
    collect: bool,
    before: String,
    trailing: Vec<(u64, String)>,
    last_value_end: Option<usize>,
    ticket: u64,
}

impl CommentChannel {
    pub fn new(collect: bool) -> Self {
        Self {
            collect,
            before: String::new(),
            trailing: Vec::new(),
            last_value_end: None,
            ticket: 0,
        }
    }

    /// Completion ticket of the most recently finished value.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Records that a value just finished at `offset`; trailing comments seen
    /// from here on belong to it until the next value completes.
    pub fn note_value_end(&mut self, offset: usize) {
        if self.collect {
            self.last_value_end = Some(offset);
            self.ticket += 1;
        }
    }

    /// Classifies and buffers the comment span `[begin, end)`. `style` is the
    /// byte following the leading `/` (`*` or `/`).
    ///
    /// The comment trails the last value on the same line when no newline
    /// separates them and the comment itself is single-line (always true for
    /// `//` comments); otherwise it is pending for the next value.
    pub fn observe(&mut self, doc: &[u8], begin: usize, end: usize, style: u8) {
        if !self.collect {
            return;
        }
        let mut placement = CommentPlacement::Before;
        if let Some(last_end) = self.last_value_end {
            if !contains_newline(&doc[last_end..begin])
                && (style != b'*' || !contains_newline(&doc[begin..end]))
            {
                placement = CommentPlacement::AfterOnSameLine;
            }
        }
        let normalized = normalize_eol(&doc[begin..end]);
        if placement == CommentPlacement::AfterOnSameLine {
            self.trailing.push((self.ticket, normalized));
        } else {
            self.before.push_str(&normalized);
        }
    }

    pub fn has_before(&self) -> bool {
        !self.before.is_empty()
    }

    /// Drains the pending-before buffer.
    pub fn take_before(&mut self) -> String {
        std::mem::take(&mut self.before)
    }

    /// Removes every trailing comment queued for `ticket`, returning the
    /// last one (later attachments replace earlier ones).
    pub fn take_trailing(&mut self, ticket: u64) -> Option<String> {
        let mut taken = None;
        let mut i = 0;
        while i < self.trailing.len() {
            if self.trailing[i].0 == ticket {
                taken = Some(self.trailing.remove(i).1);
            } else {
                i += 1;
            }
        }
        taken
    }
}

pub(crate) fn contains_newline(span: &[u8]) -> bool {
    span.iter().any(|&c| c == b'\n' || c == b'\r')
}

/// CR and CRLF each become a single LF; LF is unchanged.
pub(crate) fn normalize_eol(span: &[u8]) -> String {
    let mut normalized = Vec::with_capacity(span.len());
    let mut i = 0;
    while i < span.len() {
        let c = span[i];
        i += 1;
        if c == b'\r' {
            if i < span.len() && span[i] == b'\n' {
                i += 1;
            }
            normalized.push(b'\n');
        } else {
            normalized.push(c);
        }
    }
    match String::from_utf8(normalized) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{contains_newline, normalize_eol, CommentChannel};

    #[test]
    fn normalizes_line_endings() {
        assert_eq!(normalize_eol(b"// a\r\n"), "// a\n");
        assert_eq!(normalize_eol(b"/* a\rb */"), "/* a\nb */");
        assert_eq!(normalize_eol(b"// a\n"), "// a\n");
    }

    #[test]
    fn newline_detection() {
        assert!(contains_newline(b"a\rb"));
        assert!(contains_newline(b"a\nb"));
        assert!(!contains_newline(b"a b"));
    }

    #[test]
    fn comment_before_any_value_is_pending() {
        let doc = b"/* c */ 1";
        let mut channel = CommentChannel::new(true);
        channel.observe(doc, 0, 7, b'*');
        assert!(channel.has_before());
        assert_eq!(channel.take_before(), "/* c */");
    }

    #[test]
    fn same_line_comment_trails_last_value() {
        let doc = b"1 // one";
        let mut channel = CommentChannel::new(true);
        channel.note_value_end(1);
        channel.observe(doc, 2, 8, b'/');
        let ticket = channel.ticket();
        assert_eq!(channel.take_trailing(ticket).as_deref(), Some("// one"));
        assert!(!channel.has_before());
    }

    #[test]
    fn multiline_block_comment_is_pending_even_on_same_line() {
        let doc = b"1 /* a\nb */ 2";
        let mut channel = CommentChannel::new(true);
        channel.note_value_end(1);
        channel.observe(doc, 2, 11, b'*');
        assert!(channel.has_before());
    }

    #[test]
    fn later_trailing_comment_replaces_earlier() {
        let doc = b"1 /*a*/ /*b*/";
        let mut channel = CommentChannel::new(true);
        channel.note_value_end(1);
        channel.observe(doc, 2, 7, b'*');
        channel.observe(doc, 8, 13, b'*');
        assert_eq!(channel.take_trailing(channel.ticket()).as_deref(), Some("/*b*/"));
    }

    #[test]
    fn disabled_channel_buffers_nothing() {
        let mut channel = CommentChannel::new(false);
        channel.observe(b"// x", 0, 4, b'/');
        channel.note_value_end(4);
        assert!(!channel.has_before());
        assert_eq!(channel.ticket(), 0);
    }
}
