//! Lexical scanner for a Lua-family scripting language.
//!
//! Turns source text into classified tokens with precise source spans.
//! A [`Scanner`] is pulled by a parser one token at a time and keeps
//! exactly one token of lookahead.
//!
//! # Quick start
//!
//! ## Pull tokens one at a time
//!
//! ```
//! use lua_scanner::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new("local x = 10");
//! assert_eq!(scanner.peek().unwrap().kind, TokenKind::Local);
//! assert_eq!(scanner.next().unwrap().kind, TokenKind::Local);
//!
//! let name = scanner.next().unwrap();
//! assert_eq!(name.kind, TokenKind::Name);
//! assert_eq!(name.text(), "x");
//! ```
//!
//! ## Tokenize a whole chunk
//!
//! ```
//! use lua_scanner::{tokenize, TokenKind};
//!
//! let tokens = tokenize("return [==[a]]b]==]").unwrap();
//! assert_eq!(tokens[1].kind, TokenKind::LongString);
//! assert_eq!(tokens[1].text(), "a]]b");
//! ```
//!
//! Lexical errors are fatal for the whole source unit:
//!
//! ```
//! use lua_scanner::{tokenize, LexErrorKind};
//!
//! let err = tokenize("x = 'oops").unwrap_err();
//! assert_eq!(err.kind, LexErrorKind::UnterminatedString { quote: '\'' });
//! assert_eq!(err.position.column, 4);
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod config;
mod cursor;
pub mod error;
pub mod scanner;
pub mod token;

pub use config::ScannerConfig;
pub use error::{LexError, LexErrorKind};
pub use scanner::{Scanner, Tokens, tokenize};
pub use token::{Position, Span, Token, TokenKind};
