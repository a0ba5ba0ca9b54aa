//! Character-level scanning over JavaScript-expression-like source text.
//!
//! Everything in this module runs a single left-to-right scan with explicit
//! depth counters and literal/comment state instead of a real parser. The
//! same scanner backs top-level comma splitting, matching-delimiter search,
//! and top-level token search, so nesting rules cannot drift between them.

/// Tracks nesting depth and literal/comment state during a scan.
///
/// All structural delimiters are ASCII, so the scan walks bytes; multi-byte
/// UTF-8 sequences never match a delimiter and pass through untouched.
#[derive(Debug, Default, Clone)]
pub(crate) struct ScanState {
    paren: usize,
    brace: usize,
    bracket: usize,
    angle: usize,
    /// Quote byte of the open string/template literal, if any.
    literal: Option<u8>,
    line_comment: bool,
    block_comment: bool,
    /// Last significant byte of code seen, used to decide whether `<`
    /// opens a generic argument list.
    last_code: u8,
}

/// What the scanner did with the bytes it consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Consumed {
    /// Bytes are part of the surrounding code or a literal.
    Code,
    /// Bytes belong to a comment and are stripped from consideration.
    Comment,
}

impl ScanState {
    /// Total nesting depth across all delimiter kinds.
    pub(crate) fn depth(&self) -> usize {
        self.paren + self.brace + self.bracket + self.angle
    }

    pub(crate) fn paren_depth(&self) -> usize {
        self.paren
    }

    pub(crate) fn in_literal(&self) -> bool {
        self.literal.is_some()
    }

    pub(crate) fn in_comment(&self) -> bool {
        self.line_comment || self.block_comment
    }

    /// True when the byte at the current position is plain code: not inside
    /// a string/template literal, not inside a comment, and not opening one.
    pub(crate) fn at_code(&self, bytes: &[u8], i: usize) -> bool {
        if self.in_literal() || self.in_comment() {
            return false;
        }
        let b = bytes[i];
        !(b == b'/' && matches!(bytes.get(i + 1), Some(b'/') | Some(b'*')))
    }

    /// Advance over the byte(s) at `i`, updating state. Returns how many
    /// bytes were consumed and whether they were code or comment.
    pub(crate) fn advance(&mut self, bytes: &[u8], i: usize) -> (usize, Consumed) {
        let b = bytes[i];

        if self.line_comment {
            if b == b'\n' {
                self.line_comment = false;
            }
            return (1, Consumed::Comment);
        }

        if self.block_comment {
            if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                self.block_comment = false;
                return (2, Consumed::Comment);
            }
            return (1, Consumed::Comment);
        }

        if let Some(quote) = self.literal {
            if b == b'\\' && i + 1 < bytes.len() {
                // Escaped character never closes the literal
                return (2, Consumed::Code);
            }
            if b == quote {
                self.literal = None;
            }
            return (1, Consumed::Code);
        }

        match b {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                self.line_comment = true;
                (2, Consumed::Comment)
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                self.block_comment = true;
                (2, Consumed::Comment)
            }
            b'\'' | b'"' | b'`' => {
                self.literal = Some(b);
                self.last_code = b;
                (1, Consumed::Code)
            }
            b'(' => {
                self.paren += 1;
                self.last_code = b;
                (1, Consumed::Code)
            }
            b')' => {
                self.paren = self.paren.saturating_sub(1);
                self.last_code = b;
                (1, Consumed::Code)
            }
            b'{' => {
                self.brace += 1;
                self.last_code = b;
                (1, Consumed::Code)
            }
            b'}' => {
                self.brace = self.brace.saturating_sub(1);
                self.last_code = b;
                (1, Consumed::Code)
            }
            b'[' => {
                self.bracket += 1;
                self.last_code = b;
                (1, Consumed::Code)
            }
            b']' => {
                self.bracket = self.bracket.saturating_sub(1);
                self.last_code = b;
                (1, Consumed::Code)
            }
            b'=' if bytes.get(i + 1) == Some(&b'>') => {
                // Arrow, not a generic close
                self.last_code = b'>';
                (2, Consumed::Code)
            }
            b'<' => {
                // `<` only opens a type argument list directly after an
                // identifier (or a preceding `>`), as in `Foo<Bar<T>>`
                if is_ident_byte(self.last_code) || self.last_code == b'>' {
                    self.angle += 1;
                }
                self.last_code = b;
                (1, Consumed::Code)
            }
            b'>' => {
                if self.angle > 0 {
                    self.angle -= 1;
                }
                self.last_code = b;
                (1, Consumed::Code)
            }
            _ => {
                if !b.is_ascii_whitespace() {
                    self.last_code = b;
                }
                (1, Consumed::Code)
            }
        }
    }
}

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

/// Split a raw parameter-list string into its top-level comma-separated
/// arguments.
///
/// Commas nested inside `()`, `{}`, `[]`, `<>`, string/template literals, or
/// comments are not split points. Comment contents are stripped from the
/// emitted arguments entirely; each argument is trimmed. Empty input (or
/// input that reduces to whitespace) yields an empty vector.
pub fn split_parameters(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut state = ScanState::default();
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut segment_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if state.at_code(bytes, i)
            && bytes[i] == b','
            && state.depth() == 0
        {
            current.push_str(&text[segment_start..i]);
            push_part(&mut parts, &mut current);
            i += 1;
            segment_start = i;
            continue;
        }

        let was_in_comment = state.in_comment();
        let (consumed, kind) = state.advance(bytes, i);
        if kind == Consumed::Comment {
            if !was_in_comment {
                // Comment starts here: flush the code scanned so far and
                // keep a single space so tokens do not glue together
                current.push_str(&text[segment_start..i]);
                current.push(' ');
            }
            segment_start = i + consumed;
        }
        i += consumed;
    }

    current.push_str(&text[segment_start..]);
    push_part(&mut parts, &mut current);
    parts
}

fn push_part(parts: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
    current.clear();
}

/// Find the `)` that balances the `(` at byte offset `open`.
///
/// Parens inside string literals and comments do not count. Returns `None`
/// if the paren never balances.
pub fn find_matching_paren(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(open), Some(&b'('));
    let mut state = ScanState::default();
    let mut i = open;
    while i < bytes.len() {
        if state.at_code(bytes, i) && bytes[i] == b')' && state.paren_depth() == 1 {
            return Some(i);
        }
        let (consumed, _) = state.advance(bytes, i);
        i += consumed;
    }
    None
}

/// Find the `}` that balances the `{` at byte offset `open`.
pub(crate) fn find_matching_brace(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(open), Some(&b'{'));
    let mut state = ScanState::default();
    let mut i = open;
    while i < bytes.len() {
        if state.at_code(bytes, i) && bytes[i] == b'}' && state.brace == 1 {
            return Some(i);
        }
        let (consumed, _) = state.advance(bytes, i);
        i += consumed;
    }
    None
}

/// Find the `]` that balances the `[` at byte offset `open`.
pub(crate) fn find_matching_bracket(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(open), Some(&b'['));
    let mut state = ScanState::default();
    let mut i = open;
    while i < bytes.len() {
        if state.at_code(bytes, i) && bytes[i] == b']' && state.bracket == 1 {
            return Some(i);
        }
        let (consumed, _) = state.advance(bytes, i);
        i += consumed;
    }
    None
}

/// Find the `>` that balances the `<` at byte offset `open`.
pub(crate) fn find_matching_angle(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(open), Some(&b'<'));
    let mut state = ScanState::default();
    // Seed the generic heuristic so the leading `<` opens a list
    state.last_code = b'a';
    let mut i = open;
    while i < bytes.len() {
        if state.at_code(bytes, i) && bytes[i] == b'>' && state.angle == 1 {
            return Some(i);
        }
        let (consumed, _) = state.advance(bytes, i);
        i += consumed;
    }
    None
}

/// Find the first occurrence of `needle` at nesting depth zero, outside
/// string literals and comments. The needle itself must start with a
/// non-delimiter byte.
pub(crate) fn find_top_level(text: &str, needle: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut state = ScanState::default();
    let mut i = 0;
    while i < bytes.len() {
        if state.at_code(bytes, i) && state.depth() == 0 && bytes[i..].starts_with(needle.as_bytes())
        {
            return Some(i);
        }
        let (consumed, _) = state.advance(bytes, i);
        i += consumed;
    }
    None
}
