use std::fmt;

use crate::token::Position;

/// Classifies a lexical error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// `~` or `!` not followed by `=`. `found` is `None` at end of input.
    MalformedOperator { first: char, found: Option<char> },
    /// Something other than `=` or `[` between the brackets of a long
    /// bracket opener.
    InvalidLongBracketPrefix(char),
    /// End of input before the matching `]=*]`.
    UnterminatedLongBracket,
    /// End of input before the closing quote.
    UnterminatedString { quote: char },
    /// Character that cannot start any token.
    UnrecognizedCharacter(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedOperator { first, found } => match found {
                Some(ch) => write!(f, "expected '=' after '{first}', found '{ch}'"),
                None => write!(f, "expected '=' after '{first}', found end of input"),
            },
            Self::InvalidLongBracketPrefix(ch) => {
                write!(f, "unexpected '{ch}' in long bracket prefix")
            }
            Self::UnterminatedLongBracket => write!(f, "unterminated long string"),
            Self::UnterminatedString { quote } => {
                write!(f, "unterminated string, expected closing {quote}")
            }
            Self::UnrecognizedCharacter(ch) => {
                write!(f, "unrecognized character: {ch:?}")
            }
        }
    }
}

/// Error produced while scanning. Always fatal for the source unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", position.line + 1, position.column + 1)]
pub struct LexError {
    pub kind: LexErrorKind,
    /// Where scanning of the offending token began.
    pub position: Position,
    /// Character the error is about. For unterminated forms this is the
    /// opening quote or `[`.
    pub character: char,
}

impl LexError {
    #[must_use]
    pub const fn new(kind: LexErrorKind, position: Position, character: char) -> Self {
        Self {
            kind,
            position,
            character,
        }
    }

    #[must_use]
    pub const fn character(&self) -> char {
        self.character
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_one_based() {
        let err = LexError::new(
            LexErrorKind::UnrecognizedCharacter('$'),
            Position::new(2, 4, 20),
            '$',
        );
        assert_eq!(
            err.to_string(),
            "unrecognized character: '$' at line 3, column 5"
        );
    }

    #[test]
    fn malformed_operator_at_eof() {
        let kind = LexErrorKind::MalformedOperator {
            first: '~',
            found: None,
        };
        assert_eq!(kind.to_string(), "expected '=' after '~', found end of input");
    }
}
