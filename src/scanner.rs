use std::iter::FusedIterator;

use crate::config::ScannerConfig;
use crate::cursor::Cursor;
use crate::error::{LexError, LexErrorKind};
use crate::token::{Position, Token, TokenKind};

/// Tokenize a whole source string.
///
/// The trailing [`TokenKind::Eof`] token is not included.
///
/// # Errors
///
/// Returns the first `LexError` encountered; no partial token list is
/// returned.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut scanner = Scanner::new(input);
    scanner.tokens().collect()
}

/// Scanned-but-unconsumed result. An `Err` is sticky: once hit, it is
/// reported forever.
type Lookahead = Result<Token, LexError>;

/// Pull-based scanner over a single source unit.
///
/// The cursor always sits right after the cached lookahead token (or at
/// the start of the next unread token when nothing is cached).
#[derive(Debug)]
pub struct Scanner<'src> {
    cursor: Cursor<'src>,
    config: ScannerConfig,
    /// `None` while nothing is cached.
    lookahead: Option<Lookahead>,
}

impl<'src> Scanner<'src> {
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::with_config(source, ScannerConfig::default())
    }

    #[must_use]
    pub fn with_config(source: &'src str, config: ScannerConfig) -> Self {
        let mut cursor = Cursor::new(source);
        if config.strips_bom() {
            cursor.skip_bom();
        }
        Self {
            cursor,
            config,
            lookahead: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> ScannerConfig {
        self.config
    }

    /// Cursor position. When a token is cached by [`Scanner::peek`] this is
    /// the end of that token.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Look at the next token without consuming it.
    ///
    /// Repeated calls return the same token and scan the source only once.
    pub fn peek(&mut self) -> Result<&Token, LexError> {
        let slot = match self.lookahead.take() {
            Some(cached) => cached,
            None => self.read_token(),
        };
        self.lookahead.insert(slot).as_ref().map_err(LexError::clone)
    }

    /// Consume the next token.
    ///
    /// After end of input every call returns another `Eof` token.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Token, LexError> {
        match self.lookahead.take() {
            Some(Ok(token)) => Ok(token),
            Some(Err(err)) => {
                self.lookahead = Some(Err(err.clone()));
                Err(err)
            }
            None => self.read_token().inspect_err(|err| {
                self.lookahead = Some(Err(err.clone()));
            }),
        }
    }

    /// Iterate over the remaining tokens, stopping before `Eof`.
    pub const fn tokens<'s>(&'s mut self) -> Tokens<'s, 'src> {
        Tokens {
            scanner: self,
            done: false,
        }
    }

    fn read_token(&mut self) -> Result<Token, LexError> {
        loop {
            self.skip_whitespace();
            let token = self.scan_token()?;
            if token.kind == TokenKind::Comment && self.config.skips_comments() {
                continue;
            }
            tracing::trace!(
                kind = %token.kind,
                line = token.span.start.line,
                column = token.span.start.column,
                "scanned token"
            );
            return Ok(token);
        }
    }

    // `;` only separates statements; the parser never sees it.
    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(|c| c.is_whitespace() || c == ';');
    }

    fn scan_token(&mut self) -> Result<Token, LexError> {
        let start = self.cursor.position();
        let Some(ch) = self.cursor.peek() else {
            return Ok(Token::eof(start));
        };

        match ch {
            '=' => Ok(self.double_char_operator(start, '=', TokenKind::Assign, TokenKind::Equal)),
            '<' => Ok(self.double_char_operator(
                start,
                '=',
                TokenKind::LessThan,
                TokenKind::LessEqual,
            )),
            '>' => Ok(self.double_char_operator(
                start,
                '=',
                TokenKind::GreaterThan,
                TokenKind::GreaterEqual,
            )),
            '~' | '!' => self.not_equal(start, ch),
            '.' => Ok(self.dot(start)),
            '-' => Ok(self.minus(start)),
            '+' => Ok(self.single_char(start, TokenKind::Add)),
            '*' => Ok(self.single_char(start, TokenKind::Mul)),
            '/' => Ok(self.single_char(start, TokenKind::Div)),
            '%' => Ok(self.single_char(start, TokenKind::Mod)),
            '^' => Ok(self.single_char(start, TokenKind::Pow)),
            '#' => Ok(self.single_char(start, TokenKind::Len)),
            '[' => self.open_square(start),
            ']' => Ok(self.single_char(start, TokenKind::CloseSquare)),
            '(' => Ok(self.single_char(start, TokenKind::OpenRound)),
            ')' => Ok(self.single_char(start, TokenKind::CloseRound)),
            '{' => Ok(self.single_char(start, TokenKind::OpenCurly)),
            '}' => Ok(self.single_char(start, TokenKind::CloseCurly)),
            ',' => Ok(self.single_char(start, TokenKind::Comma)),
            ':' => Ok(self.double_char_operator(
                start,
                ':',
                TokenKind::Colon,
                TokenKind::DoubleColon,
            )),
            '"' | '\'' => self.quoted_string(start, ch),
            c if c.is_alphabetic() || c == '_' => Ok(self.name(start)),
            c if c.is_ascii_digit() => Ok(self.number(start)),
            c => Err(Self::error(LexErrorKind::UnrecognizedCharacter(c), start, c)),
        }
    }

    fn error(kind: LexErrorKind, start: Position, ch: char) -> LexError {
        let err = LexError::new(kind, start, ch);
        tracing::debug!(
            kind = %err.kind,
            char = ?err.character,
            line = start.line,
            column = start.column,
            "lexical error"
        );
        err
    }

    /// Token whose text is exactly the source consumed since `start`.
    fn lexeme(&self, kind: TokenKind, start: Position) -> Token {
        Token::new(
            kind,
            self.cursor.slice_from(start.offset).to_owned(),
            self.cursor.span_from(start),
        )
    }

    fn single_char(&mut self, start: Position, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.lexeme(kind, start)
    }

    /// Decide between a one- and two-character operator by looking at the
    /// character after the current one, then consume exactly that many.
    fn double_char_operator(
        &mut self,
        start: Position,
        second: char,
        single: TokenKind,
        double: TokenKind,
    ) -> Token {
        let (kind, len) = if self.cursor.peek_second() == Some(second) {
            (double, 2)
        } else {
            (single, 1)
        };
        self.cursor.advance_by(len);
        self.lexeme(kind, start)
    }

    fn not_equal(&mut self, start: Position, first: char) -> Result<Token, LexError> {
        match self.cursor.peek_second() {
            Some('=') => {
                self.cursor.advance_by(2);
                Ok(Token::new(
                    TokenKind::NotEqual,
                    "~=".to_owned(),
                    self.cursor.span_from(start),
                ))
            }
            found => Err(Self::error(
                LexErrorKind::MalformedOperator { first, found },
                start,
                found.unwrap_or(first),
            )),
        }
    }

    fn dot(&mut self, start: Position) -> Token {
        if self.cursor.peek_second() != Some('.') {
            return self.single_char(start, TokenKind::Dot);
        }
        // Past the first dot the `..` / `...` choice is the same
        // one-or-two decision as any other double operator.
        self.cursor.advance();
        self.double_char_operator(start, '.', TokenKind::Concat, TokenKind::VarArgs)
    }

    fn minus(&mut self, start: Position) -> Token {
        if self.cursor.peek_second() != Some('-') {
            return self.single_char(start, TokenKind::MinusOrSub);
        }

        // Single-line only: `--[[` is an ordinary line comment here.
        self.cursor.advance_by(2);
        let body_start = self.cursor.position().offset;
        self.cursor.eat_while(|c| c != '\n');
        let body: String = self
            .cursor
            .slice_from(body_start)
            .chars()
            .filter(|&c| c != '\r')
            .collect();

        Token::new(
            TokenKind::Comment,
            body,
            self.cursor.span_from(start),
        )
    }

    fn open_square(&mut self, start: Position) -> Result<Token, LexError> {
        match self.cursor.peek_second() {
            Some('=' | '[') => self.long_string(start),
            _ => Ok(self.single_char(start, TokenKind::OpenSquare)),
        }
    }

    fn long_string(&mut self, start: Position) -> Result<Token, LexError> {
        self.cursor.advance(); // skip opening [

        let mut level = 0;
        loop {
            match self.cursor.advance() {
                Some('=') => level += 1,
                Some('[') => break,
                Some(c) => {
                    return Err(Self::error(
                        LexErrorKind::InvalidLongBracketPrefix(c),
                        start,
                        c,
                    ));
                }
                None => {
                    return Err(Self::error(
                        LexErrorKind::UnterminatedLongBracket,
                        start,
                        '[',
                    ));
                }
            }
        }

        let close = format!("]{}]", "=".repeat(level));
        let body_start = self.cursor.position().offset;

        loop {
            if self.cursor.starts_with(&close) {
                let body = self.cursor.slice_from(body_start).to_owned();
                self.cursor.advance_by(close.len());
                return Ok(Token::new(
                    TokenKind::LongString,
                    body,
                    self.cursor.span_from(start),
                ));
            }
            if self.cursor.advance().is_none() {
                return Err(Self::error(
                    LexErrorKind::UnterminatedLongBracket,
                    start,
                    '[',
                ));
            }
        }
    }

    fn quoted_string(&mut self, start: Position, quote: char) -> Result<Token, LexError> {
        self.cursor.advance(); // skip opening quote
        let body_start = self.cursor.position().offset;

        loop {
            match self.cursor.peek() {
                None => {
                    return Err(Self::error(
                        LexErrorKind::UnterminatedString { quote },
                        start,
                        quote,
                    ));
                }
                Some('\\') => {
                    // Escapes stay raw; the escaped char can never close
                    // the string.
                    self.cursor.advance_by(2);
                }
                Some(c) if c == quote => {
                    let body = self.cursor.slice_from(body_start).to_owned();
                    self.cursor.advance();
                    return Ok(Token::new(
                        TokenKind::QuotedString,
                        body,
                        self.cursor.span_from(start),
                    ));
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn name(&mut self, start: Position) -> Token {
        self.cursor.eat_while(|c| c.is_alphanumeric() || c == '_');
        let text = self.cursor.slice_from(start.offset);
        let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Name);
        self.lexeme(kind, start)
    }

    /// Scan a numeric literal starting at a decimal digit. Only the extent
    /// is decided here; the value is not parsed.
    fn number(&mut self, start: Position) -> Token {
        let is_hex = self.cursor.peek() == Some('0')
            && matches!(self.cursor.peek_second(), Some('x' | 'X'));
        if is_hex {
            self.cursor.advance_by(2);
        }

        let mut seen_dot = false;
        let mut seen_exponent = false;

        while let Some(c) = self.cursor.peek() {
            let is_exponent_marker = if is_hex {
                matches!(c, 'p' | 'P')
            } else {
                matches!(c, 'e' | 'E')
            };

            if c.is_ascii_digit() {
                self.cursor.advance();
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                self.cursor.advance();
            } else if is_hex && !seen_exponent && c.is_ascii_hexdigit() {
                self.cursor.advance();
            } else if is_exponent_marker && !seen_exponent {
                // Exponent digits are decimal and no `.` may follow.
                seen_exponent = true;
                seen_dot = true;
                self.cursor.advance();
                if matches!(self.cursor.peek(), Some('+' | '-')) {
                    self.cursor.advance();
                }
            } else {
                break;
            }
        }

        self.lexeme(TokenKind::Number, start)
    }
}

/// Iterator returned by [`Scanner::tokens`].
///
/// Yields tokens up to, but not including, `Eof`. After an error it yields
/// that error once and then stops.
#[derive(Debug)]
pub struct Tokens<'s, 'src> {
    scanner: &'s mut Scanner<'src>,
    done: bool,
}

impl Iterator for Tokens<'_, '_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.scanner.next() {
            Ok(token) if token.is_eof() => {
                self.done = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Tokens<'_, '_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .expect("should tokenize")
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn simple_assignment() {
        let tokens = tokenize("local x = 10").expect("should tokenize");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, TokenKind::Local);
        assert_eq!(tokens[1].kind, TokenKind::Name);
        assert_eq!(tokens[1].text(), "x");
        assert_eq!(tokens[2].kind, TokenKind::Assign);
        assert_eq!(tokens[3].kind, TokenKind::Number);
        assert_eq!(tokens[3].text(), "10");
    }

    #[test]
    fn double_char_operators() {
        assert_eq!(
            kinds("== = <= < >= > :: :"),
            vec![
                TokenKind::Equal,
                TokenKind::Assign,
                TokenKind::LessEqual,
                TokenKind::LessThan,
                TokenKind::GreaterEqual,
                TokenKind::GreaterThan,
                TokenKind::DoubleColon,
                TokenKind::Colon,
            ]
        );
    }

    #[test]
    fn single_char_operator_consumes_one_char() {
        let tokens = tokenize("=x").expect("should tokenize");
        assert_eq!(tokens[0].kind, TokenKind::Assign);
        assert_eq!(tokens[0].text(), "=");
        assert_eq!(tokens[0].span.end.column, 1);
        assert_eq!(tokens[1].kind, TokenKind::Name);
        assert_eq!(tokens[1].span.start.column, 1);
    }

    #[test]
    fn dots() {
        assert_eq!(
            kinds("a.b .. ..."),
            vec![
                TokenKind::Name,
                TokenKind::Dot,
                TokenKind::Name,
                TokenKind::Concat,
                TokenKind::VarArgs,
            ]
        );
    }

    #[test]
    fn four_dots_is_varargs_then_dot() {
        let tokens = tokenize("....").expect("should tokenize");
        assert_eq!(tokens[0].kind, TokenKind::VarArgs);
        assert_eq!(tokens[1].kind, TokenKind::Dot);
    }

    #[test]
    fn bang_equal_normalised() {
        let tokens = tokenize("a != b").expect("should tokenize");
        assert_eq!(tokens[1].kind, TokenKind::NotEqual);
        assert_eq!(tokens[1].text(), "~=");
        assert_eq!(tokens[1].span.end.column, 4);
    }

    #[test]
    fn semicolons_are_whitespace() {
        assert_eq!(
            kinds("a;;b ;"),
            vec![TokenKind::Name, TokenKind::Name]
        );
    }

    #[test]
    fn comment_token() {
        let tokens = tokenize("x -- note\ny").expect("should tokenize");
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].text(), " note");
        assert_eq!(tokens[2].text(), "y");
        assert_eq!(tokens[2].span.start.line, 1);
    }

    #[test]
    fn comment_drops_carriage_return() {
        let tokens = tokenize("--hi\r\nx").expect("should tokenize");
        assert_eq!(tokens[0].text(), "hi");
        assert_eq!(tokens[1].text(), "x");
    }

    #[test]
    fn comment_drops_every_carriage_return() {
        let tokens = tokenize("a\r-- c\r\rd\nb").expect("should tokenize");
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].text(), " cd");
        assert_eq!(tokens[2].text(), "b");
    }

    #[test]
    fn peek_error_repeats() {
        let mut scanner = Scanner::new("'open");
        let first = scanner.peek().unwrap_err();
        assert_eq!(scanner.peek().unwrap_err(), first);
        assert_eq!(scanner.next().unwrap_err(), first);
        assert_eq!(scanner.peek().unwrap_err(), first);
    }

    #[test]
    fn skip_comments_config() {
        let mut scanner =
            Scanner::with_config("a -- gone\nb", ScannerConfig::new().skip_comments(true));
        let texts: Vec<String> = scanner
            .tokens()
            .map(|t| t.expect("should tokenize").text().to_owned())
            .collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn minus_alone() {
        assert_eq!(
            kinds("-x - -1"),
            vec![
                TokenKind::MinusOrSub,
                TokenKind::Name,
                TokenKind::MinusOrSub,
                TokenKind::MinusOrSub,
                TokenKind::Number,
            ]
        );
    }

    #[test]
    fn keywords_vs_names() {
        let tokens = tokenize("while whilex _end end").expect("should tokenize");
        assert_eq!(tokens[0].kind, TokenKind::While);
        assert_eq!(tokens[1].kind, TokenKind::Name);
        assert_eq!(tokens[2].kind, TokenKind::Name);
        assert_eq!(tokens[3].kind, TokenKind::End);
        assert_eq!(tokens[3].text(), "end");
    }

    #[test]
    fn unicode_identifier() {
        let tokens = tokenize("café = 1").expect("should tokenize");
        assert_eq!(tokens[0].kind, TokenKind::Name);
        assert_eq!(tokens[0].text(), "café");
        assert_eq!(tokens[1].span.start.column, 5);
    }

    #[test]
    fn hex_exponent_disables_hex_digits() {
        let tokens = tokenize("0x1p4f").expect("should tokenize");
        assert_eq!(tokens[0].text(), "0x1p4");
        assert_eq!(tokens[1].kind, TokenKind::Name);
        assert_eq!(tokens[1].text(), "f");
    }

    #[test]
    fn hex_e_is_a_digit() {
        let tokens = tokenize("0x1e5").expect("should tokenize");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text(), "0x1e5");
    }

    #[test]
    fn exponent_sign() {
        let tokens = tokenize("1e-3 2E+10").expect("should tokenize");
        assert_eq!(tokens[0].text(), "1e-3");
        assert_eq!(tokens[1].text(), "2E+10");
    }

    #[test]
    fn no_dot_after_exponent() {
        let tokens = tokenize("1e5.5").expect("should tokenize");
        assert_eq!(tokens[0].text(), "1e5");
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].text(), "5");
    }

    #[test]
    fn escaped_quote_stays_raw() {
        let tokens = tokenize(r#""a\"b" 'c\'d'"#).expect("should tokenize");
        assert_eq!(tokens[0].text(), r#"a\"b"#);
        assert_eq!(tokens[1].text(), r"c\'d");
    }

    #[test]
    fn other_quote_inside_string() {
        let tokens = tokenize(r#"'say "hi"'"#).expect("should tokenize");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text(), r#"say "hi""#);
    }

    #[test]
    fn long_string_levels() {
        let tokens = tokenize("[[a]] [=[b]]c]=]").expect("should tokenize");
        assert_eq!(tokens[0].kind, TokenKind::LongString);
        assert_eq!(tokens[0].text(), "a");
        assert_eq!(tokens[1].text(), "b]]c");
    }

    #[test]
    fn open_square_without_long_bracket() {
        assert_eq!(
            kinds("t[1]"),
            vec![
                TokenKind::Name,
                TokenKind::OpenSquare,
                TokenKind::Number,
                TokenKind::CloseSquare,
            ]
        );
    }

    #[test]
    fn peek_then_next_same_token() {
        let mut scanner = Scanner::new("foo bar");
        let peeked = scanner.peek().expect("peek").clone();
        let after_peek = scanner.position();
        let taken = scanner.next().expect("next");
        assert_eq!(peeked, taken);
        assert_eq!(after_peek, taken.span.end);
        assert_eq!(scanner.position(), taken.span.end);
    }

    #[test]
    fn eof_repeats() {
        let mut scanner = Scanner::new("  ");
        assert!(scanner.next().expect("next").is_eof());
        assert!(scanner.next().expect("next").is_eof());
        assert!(scanner.peek().expect("peek").is_eof());
    }

    #[test]
    fn error_is_sticky() {
        let mut scanner = Scanner::new("a $ b");
        assert_eq!(scanner.next().expect("next").text(), "a");
        let first = scanner.peek().unwrap_err();
        let second = scanner.next().unwrap_err();
        let third = scanner.next().unwrap_err();
        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(first.kind, LexErrorKind::UnrecognizedCharacter('$'));
    }

    #[test]
    fn tokens_iterator_stops_after_error() {
        let mut scanner = Scanner::new("a ~ b");
        let items: Vec<_> = scanner.tokens().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }

    #[test]
    fn bom_stripping() {
        let tokens = tokenize("\u{FEFF}x").expect("should tokenize");
        assert_eq!(tokens[0].text(), "x");
        assert_eq!(tokens[0].span.start.column, 0);
    }

    #[test]
    fn bom_kept_when_disabled() {
        let mut scanner = Scanner::with_config("\u{FEFF}x", ScannerConfig::new().strip_bom(false));
        let err = scanner.next().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnrecognizedCharacter('\u{FEFF}'));
    }

    #[test]
    fn span_tracking() {
        let tokens = tokenize("a\n  bb c").expect("should tokenize");
        assert_eq!(tokens[0].span.start, Position::new(0, 0, 0));
        assert_eq!(tokens[1].span.start, Position::new(1, 2, 4));
        assert_eq!(tokens[1].span.end, Position::new(1, 4, 6));
        assert_eq!(tokens[2].span.start, Position::new(1, 5, 7));
    }
}
