//! The form description language: lexer and parser.

pub mod grammar;
pub mod tokenizer;

pub use grammar::parse_into;
