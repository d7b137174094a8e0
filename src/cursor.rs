use crate::token::{Position, Span};

/// Character reader over the source buffer.
///
/// Owns the scanning position: byte offset, zero-based line, and
/// zero-based column. Everything that moves through the source goes
/// through [`Cursor::advance`], so line/column bookkeeping lives in one
/// place.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    pos: Position,
}

impl<'src> Cursor<'src> {
    pub const fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: Position {
                line: 0,
                column: 0,
                offset: 0,
            },
        }
    }

    pub const fn position(&self) -> Position {
        self.pos
    }

    fn rest(&self) -> &'src str {
        self.source.get(self.pos.offset..).unwrap_or("")
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    /// True if the unread input starts with `pattern`.
    pub fn starts_with(&self, pattern: &str) -> bool {
        self.rest().starts_with(pattern)
    }

    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos.offset += ch.len_utf8();
        if ch == '\n' {
            self.pos.line += 1;
            self.pos.column = 0;
        } else {
            self.pos.column += 1;
        }
        Some(ch)
    }

    /// Advance `n` characters, stopping early at end of input.
    pub fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            if self.advance().is_none() {
                break;
            }
        }
    }

    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            self.advance();
        }
    }

    /// Skip a byte-order mark without moving line or column.
    pub fn skip_bom(&mut self) {
        if self.pos.offset == 0 && self.source.starts_with('\u{FEFF}') {
            self.pos.offset = '\u{FEFF}'.len_utf8();
        }
    }

    pub fn slice(&self, start: usize, end: usize) -> &'src str {
        self.source.get(start..end).unwrap_or("")
    }

    pub fn slice_from(&self, start: usize) -> &'src str {
        self.slice(start, self.pos.offset)
    }

    pub const fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.pos)
    }
}
