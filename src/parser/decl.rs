use std::collections::HashSet;

use crate::{
    ast::declarations::{Function, OperatorKind, Prototype, DEFAULT_BINARY_PRECEDENCE},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    MK_UNEXPECTED,
};

use super::{expr::parse_expression, parser::Parser};

/// prototype
///   ::= identifier '(' identifier* ')'
///   ::= 'unary' char '(' identifier ')'
///   ::= 'binary' char number? '(' identifier identifier ')'
pub fn parse_prototype(parser: &mut Parser<'_>) -> Result<Prototype, Error> {
    let start = parser.get_position();

    let (name, kind) = match parser.current_token_kind() {
        TokenKind::Identifier => (parser.advance().value, OperatorKind::Plain),
        TokenKind::Unary => {
            parser.advance();
            let operator = parse_operator_char(parser, "expected unary operator")?;

            (Prototype::unary_name(operator), OperatorKind::UnaryOperator)
        }
        TokenKind::Binary => {
            parser.advance();
            let operator = parse_operator_char(parser, "expected binary operator")?;

            let mut precedence = DEFAULT_BINARY_PRECEDENCE;
            if parser.current_token_kind() == TokenKind::Number {
                let value = parser.current_number()?;
                if !(1.0..=100.0).contains(&value) {
                    return Err(Error::new(
                        ErrorImpl::InvalidPrecedence { precedence: value },
                        parser.get_position(),
                    ));
                }

                precedence = value as u32;
                parser.advance();
            }

            (
                Prototype::binary_name(operator),
                OperatorKind::BinaryOperator { precedence },
            )
        }
        _ => return Err(MK_UNEXPECTED!(parser, "expected function name in prototype")),
    };

    parser.expect_char('(', "expected '(' in prototype")?;

    let mut params = vec![];
    let mut seen = HashSet::new();

    while parser.current_token_kind() == TokenKind::Identifier {
        let position = parser.get_position();
        let param = parser.advance().value;

        if !seen.insert(param.clone()) {
            return Err(Error::new(
                ErrorImpl::DuplicateParameter { parameter: param },
                position,
            ));
        }

        params.push(param);
    }

    parser.expect_char(')', "expected ')' in prototype")?;

    if let Some(expected) = kind.operand_count() {
        if params.len() != expected {
            return Err(Error::new(
                ErrorImpl::InvalidOperandCount {
                    operator: name.chars().last().unwrap_or('?'),
                    expected,
                    received: params.len(),
                },
                start,
            ));
        }
    }

    Ok(Prototype { name, params, kind })
}

fn parse_operator_char(parser: &mut Parser<'_>, message: &str) -> Result<char, Error> {
    match parser.current_token().as_char() {
        Some(operator) if operator.is_ascii() => {
            parser.advance();
            Ok(operator)
        }
        _ => Err(MK_UNEXPECTED!(parser, message)),
    }
}

/// definition ::= 'def' prototype expression
pub fn parse_definition(parser: &mut Parser<'_>) -> Result<Function, Error> {
    parser.expect(TokenKind::Def, "expected def")?;

    let prototype = parse_prototype(parser)?;
    let body = parse_expression(parser)?;

    Ok(Function { prototype, body })
}

/// external ::= 'extern' prototype
pub fn parse_extern(parser: &mut Parser<'_>) -> Result<Prototype, Error> {
    parser.expect(TokenKind::Extern, "expected extern")?;

    parse_prototype(parser)
}
