//! Lexer for the form description language.
//!
//! Whitespace and newlines are real tokens: the grammar is indentation
//! sensitive, and values are concatenations of adjacent runs, so the parser
//! needs both token spans and the gaps between them.

use logos::Logos;

use crate::error::Error;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    #[regex(r"[ \t]+")]
    Space,
    #[regex(r"\r?\n")]
    Newline,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token(":")]
    Colon,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[regex(r"'[^'\n]*'")]
    SingleQuoted,
    #[regex(r#""[^"\n]*""#)]
    DoubleQuoted,
    #[regex(r"<[^>\n]+>")]
    Include,
    #[regex(r#"[^ \t\r\n{}:\[\]'"<]+"#)]
    Word,
}

/// A token with its source slice and position.
#[derive(Debug, Clone, Copy)]
pub struct Lexed<'a> {
    pub tok: Token,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

/// Lex the whole input up front. The only lex-level failure is a character
/// no token accepts, which in practice means an unterminated quote.
pub fn tokenize(src: &str) -> Result<Vec<Lexed<'_>>, Error> {
    let mut out = Vec::new();
    let mut line = 1;
    let mut lexer = Token::lexer(src);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        match result {
            Ok(tok) => {
                out.push(Lexed { tok, text, start: span.start, end: span.end, line });
                if tok == Token::Newline {
                    line += 1;
                }
            }
            Err(()) => {
                return Err(Error::parse(line, "unterminated quote or stray character", text));
            }
        }
    }
    Ok(out)
}

// ===========================================================================
// Tests
// ===========================================================================
