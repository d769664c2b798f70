use std::rc::Rc;

use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &str) -> Result<(), Error>;

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

#[derive(Clone)]
pub struct Lexer {
    patterns: Vec<RegexPattern>,
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        // Every pattern is anchored; the first one matching at the cursor wins.
        Lexer {
            pos: 0,
            tokens: vec![],
            patterns: vec![
                RegexPattern { regex: Regex::new("^[a-zA-Z][a-zA-Z0-9]*").unwrap(), handler: symbol_handler },
                RegexPattern { regex: Regex::new("^[0-9.]+").unwrap(), handler: number_handler },
                RegexPattern { regex: Regex::new("^\\s+").unwrap(), handler: skip_handler },
                RegexPattern { regex: Regex::new("^#[^\\r\\n]*").unwrap(), handler: skip_handler },
                RegexPattern { regex: Regex::new("(?s)^.").unwrap(), handler: char_handler },
            ],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }

    /// Span covering `len` bytes from the cursor.
    fn span(&self, len: usize) -> Span {
        Span {
            start: self.position(),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }

    fn push_matched(&mut self, kind: TokenKind, matched: &str) {
        let span = self.span(matched.len());
        self.push(MK_TOKEN!(kind, String::from(matched), span));
        self.advance_n(matched.len());
    }
}

fn number_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    if matched.parse::<f64>().is_err() {
        return Err(Error::new(
            ErrorImpl::NumberParseError { token: String::from(matched) },
            lexer.position(),
        ));
    }

    lexer.push_matched(TokenKind::Number, matched);
    Ok(())
}

fn skip_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    lexer.advance_n(matched.len());
    Ok(())
}

fn char_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    lexer.push_matched(TokenKind::Char, matched);
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, matched: &str) -> Result<(), Error> {
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push_matched(kind, matched);
    Ok(())
}

/// Splits `source` into tokens, always terminated by a single `EOF` token.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);
    let patterns = lex.patterns.clone();

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in patterns.iter() {
            let found = pattern
                .regex
                .find(lex.remainder())
                .map(|m| m.as_str().to_string());

            if let Some(text) = found {
                (pattern.handler)(&mut lex, &text)?;
                matched = true;
                break;
            }
        }

        if !matched {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: lex.remainder().chars().take(1).collect(),
                    message: String::from("unrecognised character"),
                },
                lex.position(),
            ));
        }
    }

    let span = lex.span(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    Ok(lex.tokens)
}
