//! Lexical analysis module for the frontend.
//!
//! This module contains the lexer (tokenizer) that converts source text
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, identifiers and numeric literals
//! - Single-character tokens, which the parser treats as operators or punctuation
//! - Token position tracking for error reporting
//! - `#` comments and whitespace handling

pub mod lexer;
pub mod tokens;
