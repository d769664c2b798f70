use std::collections::HashMap;

use crate::{ast::expressions::Expr, errors::errors::Error, lexer::tokens::{Token, TokenKind}};

use super::{expr::*, parser::Parser};

pub type NUDHandler = fn(&mut Parser<'_>) -> Result<Expr, Error>;

// Lookup tables inside parser struct, so it's easier
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;

/// Binary operator precedence table.
///
/// Shared between the parser, which only reads it, and the code generator,
/// which installs a user-defined binary operator once its function has been
/// compiled. Entries are only ever added or overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorTable {
    precedences: HashMap<char, u32>,
}

impl Default for OperatorTable {
    fn default() -> Self {
        let mut table = OperatorTable {
            precedences: HashMap::new(),
        };

        table.install('<', 10);
        table.install('+', 20);
        table.install('-', 20);
        table.install('*', 40);

        table
    }
}

impl OperatorTable {
    pub fn install(&mut self, operator: char, precedence: u32) {
        self.precedences.insert(operator, precedence);
    }

    pub fn precedence(&self, operator: char) -> Option<u32> {
        self.precedences
            .get(&operator)
            .copied()
            .filter(|precedence| *precedence > 0)
    }

    /// Precedence of `token` when it is a known binary operator.
    pub fn token_precedence(&self, token: &Token) -> Option<u32> {
        token.as_char().and_then(|operator| self.precedence(operator))
    }
}

pub fn create_token_lookups(parser: &mut Parser<'_>) {
    // Literals and symbols
    parser.nud(TokenKind::Number, parse_number_expr);
    parser.nud(TokenKind::Identifier, parse_identifier_expr);

    // Control flow
    parser.nud(TokenKind::If, parse_if_expr);
    parser.nud(TokenKind::For, parse_for_expr);
}
