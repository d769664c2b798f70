//! Parser implementation for building top-level forms.
//!
//! This module contains the main Parser struct and the form-level entry
//! point. Expressions are parsed by precedence climbing over an
//! [`OperatorTable`] that the parser borrows for the duration of one form,
//! and primary expressions are dispatched through a NUD lookup table.

use std::collections::HashMap;

use crate::{
    ast::{ast::Form, declarations::Function},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, MK_UNEXPECTED,
};

use super::{
    decl::{parse_definition, parse_extern},
    expr::parse_expression,
    lookups::{create_token_lookups, NUDHandler, NUDLookup, OperatorTable},
};

/// The main parser structure that maintains parsing state.
///
/// The parser reads from a token slice produced by `tokenize`, which always
/// ends with an `EOF` token. The token at the cursor is the single token of
/// lookahead; every parse function starts on the first token of its
/// construct and leaves the cursor on the first token after it.
pub struct Parser<'a> {
    /// The list of tokens to parse
    tokens: &'a [Token],
    /// Current position in the token stream
    pos: usize,
    /// Binary operator precedences, as of the start of this form
    operators: &'a OperatorTable,
    /// Lookup table for null denotation (primary) expression handlers
    nud_lookup: NUDLookup,
}

impl<'a> Parser<'a> {
    /// Creates a new Parser positioned at `pos`.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Token slice ending with `EOF`
    /// * `pos` - Index of the first token to parse
    /// * `operators` - The binary operator precedence table
    pub fn new(tokens: &'a [Token], pos: usize, operators: &'a OperatorTable) -> Self {
        let mut parser = Parser {
            tokens,
            pos: pos.min(tokens.len().saturating_sub(1)),
            operators,
            nud_lookup: HashMap::new(),
        };
        create_token_lookups(&mut parser);
        parser
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The cursor never moves past the trailing `EOF`.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Expects a token of the specified kind, consuming it on success.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `message` - What to report when the expectation fails
    pub fn expect(&mut self, expected_kind: TokenKind, message: &str) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return Err(MK_UNEXPECTED!(self, message));
        }

        Ok(self.advance())
    }

    /// Expects the punctuation character `c`, consuming it on success.
    pub fn expect_char(&mut self, c: char, message: &str) -> Result<Token, Error> {
        if !self.current_token().is_char(c) {
            return Err(MK_UNEXPECTED!(self, message));
        }

        Ok(self.advance())
    }

    /// Value of the current `Number` token, without advancing.
    pub fn current_number(&self) -> Result<f64, Error> {
        let token = self.current_token();
        token.value.parse().map_err(|_| {
            Error::new(
                ErrorImpl::NumberParseError {
                    token: token.value.clone(),
                },
                self.get_position(),
            )
        })
    }

    /// Precedence of the current token if it is a known binary operator.
    pub fn current_precedence(&self) -> Option<u32> {
        self.operators.token_precedence(self.current_token())
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Registers a null denotation (primary) handler for a token kind.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Index of the current token in the token slice.
    pub fn cursor(&self) -> usize {
        self.pos
    }

    /// Returns the source position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }
}

/// Parses one top-level form: a definition, an extern, or a bare expression.
///
/// The caller is responsible for skipping `;` separators and for stopping
/// at `EOF`.
pub fn parse_form(parser: &mut Parser<'_>) -> Result<Form, Error> {
    match parser.current_token_kind() {
        TokenKind::Def => Ok(Form::Definition(parse_definition(parser)?)),
        TokenKind::Extern => Ok(Form::Extern(parse_extern(parser)?)),
        _ => Ok(Form::Expression(Function::anonymous(parse_expression(parser)?))),
    }
}

/// Parses every form in `tokens` against a fixed operator table.
///
/// Operators defined by the parsed forms are not installed, so later forms
/// see the precedences in `operators` only. The interactive session parses
/// form by form instead.
pub fn parse(tokens: &[Token], operators: &OperatorTable) -> Result<Vec<Form>, Error> {
    let mut parser = Parser::new(tokens, 0, operators);
    let mut forms = vec![];

    while parser.has_tokens() {
        if parser.current_token().is_char(';') {
            parser.advance();
            continue;
        }

        forms.push(parse_form(&mut parser)?);
    }

    Ok(forms)
}
