use std::fmt;

/// A point in the source text.
///
/// `line` and `column` are zero-based; `column` counts characters and
/// resets to 0 after every `\n`. `offset` is the byte offset into the
/// source buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Source range covered by a token. `end` is exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// The lexeme this span covers in `source`, delimiters included.
    ///
    /// Returns an empty string if the span does not belong to `source`.
    #[must_use]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start.offset..self.end.offset).unwrap_or("")
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }
}

/// Token categories produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input. Carries no text.
    Eof,
    /// Identifier that is not a reserved word.
    Name,

    // Reserved words.
    And,
    Break,
    Do,
    Else,
    ElseIf,
    End,
    False,
    For,
    Function,
    Goto,
    If,
    In,
    Local,
    Nil,
    Not,
    Or,
    Repeat,
    Return,
    Then,
    True,
    Until,
    While,

    /// `==`
    Equal,
    /// `=`
    Assign,
    /// `<`
    LessThan,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `>`
    GreaterThan,
    /// `~=` (also written `!=`)
    NotEqual,
    /// `..`
    Concat,
    /// `...`
    VarArgs,
    /// `.`
    Dot,
    /// `:`
    Colon,
    /// `::`
    DoubleColon,
    /// `,`
    Comma,
    /// `}`
    CloseCurly,
    /// `{`
    OpenCurly,
    /// `)`
    CloseRound,
    /// `(`
    OpenRound,
    /// `]`
    CloseSquare,
    /// `[`
    OpenSquare,
    /// `#`
    Len,
    /// `^`
    Pow,
    /// `%`
    Mod,
    /// `/`
    Div,
    /// `*`
    Mul,
    /// `-`, unary or binary; the parser decides.
    MinusOrSub,
    /// `+`
    Add,

    /// `"..."` or `'...'`; text is the raw body with escapes undecoded.
    QuotedString,
    /// `-- ...` up to end of line; text excludes the `--`.
    Comment,
    /// Numeric literal; text is the literal exactly as written.
    Number,
    /// `[[...]]` or `[==[...]==]`; text is the body without delimiters.
    LongString,
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("and", TokenKind::And),
    ("break", TokenKind::Break),
    ("do", TokenKind::Do),
    ("else", TokenKind::Else),
    ("elseif", TokenKind::ElseIf),
    ("end", TokenKind::End),
    ("false", TokenKind::False),
    ("for", TokenKind::For),
    ("function", TokenKind::Function),
    ("goto", TokenKind::Goto),
    ("if", TokenKind::If),
    ("in", TokenKind::In),
    ("local", TokenKind::Local),
    ("nil", TokenKind::Nil),
    ("not", TokenKind::Not),
    ("or", TokenKind::Or),
    ("repeat", TokenKind::Repeat),
    ("return", TokenKind::Return),
    ("then", TokenKind::Then),
    ("true", TokenKind::True),
    ("until", TokenKind::Until),
    ("while", TokenKind::While),
];

impl TokenKind {
    /// Look up a reserved word. Matching is case-sensitive.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == word)
            .map(|(_, kind)| *kind)
    }

    #[must_use]
    pub fn is_keyword(self) -> bool {
        KEYWORDS.iter().any(|(_, kind)| *kind == self)
    }

    /// Source spelling for fixed tokens, or a placeholder for the
    /// categories whose text varies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eof => "<eof>",
            Self::Name => "<name>",
            Self::And => "and",
            Self::Break => "break",
            Self::Do => "do",
            Self::Else => "else",
            Self::ElseIf => "elseif",
            Self::End => "end",
            Self::False => "false",
            Self::For => "for",
            Self::Function => "function",
            Self::Goto => "goto",
            Self::If => "if",
            Self::In => "in",
            Self::Local => "local",
            Self::Nil => "nil",
            Self::Not => "not",
            Self::Or => "or",
            Self::Repeat => "repeat",
            Self::Return => "return",
            Self::Then => "then",
            Self::True => "true",
            Self::Until => "until",
            Self::While => "while",
            Self::Equal => "==",
            Self::Assign => "=",
            Self::LessThan => "<",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::GreaterThan => ">",
            Self::NotEqual => "~=",
            Self::Concat => "..",
            Self::VarArgs => "...",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::DoubleColon => "::",
            Self::Comma => ",",
            Self::CloseCurly => "}",
            Self::OpenCurly => "{",
            Self::CloseRound => ")",
            Self::OpenRound => "(",
            Self::CloseSquare => "]",
            Self::OpenSquare => "[",
            Self::Len => "#",
            Self::Pow => "^",
            Self::Mod => "%",
            Self::Div => "/",
            Self::Mul => "*",
            Self::MinusOrSub => "-",
            Self::Add => "+",
            Self::QuotedString => "<string>",
            Self::Comment => "<comment>",
            Self::Number => "<number>",
            Self::LongString => "<long string>",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single token with its kind, text, and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Absent only for [`TokenKind::Eof`].
    pub text: Option<String>,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, text: String, span: Span) -> Self {
        Self {
            kind,
            text: Some(text),
            span,
        }
    }

    #[must_use]
    pub const fn eof(at: Position) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: None,
            span: Span::new(at, at),
        }
    }

    /// Token text, or `""` when absent.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
