#![allow(dead_code)]

use lua_scanner::{Scanner, Token, TokenKind, tokenize};

pub fn scan(input: &str) -> Vec<Token> {
    tokenize(input).unwrap_or_else(|e| panic!("tokenize failed: {e}\n--- input ---\n{input}"))
}

pub fn kinds(input: &str) -> Vec<TokenKind> {
    scan(input).iter().map(|t| t.kind).collect()
}

pub fn texts(input: &str) -> Vec<String> {
    scan(input).iter().map(|t| t.text().to_owned()).collect()
}

/// Scan `input`, which must hold exactly one token, and return it.
pub fn single(input: &str) -> Token {
    let tokens = scan(input);
    assert_eq!(
        tokens.len(),
        1,
        "expected one token for {input:?}, got {tokens:?}"
    );
    tokens.into_iter().next().expect("one token")
}

/// Rebuild the source from token spans, copying the skipped gaps
/// between them verbatim.
pub fn reconstruct(input: &str) -> String {
    let mut scanner = Scanner::new(input);
    let mut out = String::new();
    let mut last = 0;
    for token in scanner.tokens() {
        let token = token.expect("tokenize");
        out.push_str(&input[last..token.span.start.offset]);
        out.push_str(token.span.slice(input));
        last = token.span.end.offset;
    }
    out.push_str(&input[last..]);
    out
}
