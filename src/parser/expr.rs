use crate::{
    ast::expressions::Expr,
    errors::errors::Error,
    lexer::tokens::TokenKind,
    MK_UNEXPECTED,
};

use super::parser::Parser;

/// expression ::= unary binoprhs
pub fn parse_expression(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let left = parse_unary_expr(parser)?;
    parse_binary_rhs(parser, 0, left)
}

/// Precedence climbing over the operator table.
///
/// Consumes binary operators whose precedence is at least `min_precedence`.
/// When the operator after the right operand binds tighter than the current
/// one, the right operand absorbs it first.
pub fn parse_binary_rhs(parser: &mut Parser<'_>, min_precedence: u32, mut left: Expr) -> Result<Expr, Error> {
    loop {
        let precedence = match parser.current_precedence() {
            Some(precedence) if precedence >= min_precedence => precedence,
            _ => return Ok(left),
        };

        let operator_token = parser.advance();
        let operator = match operator_token.as_char() {
            Some(operator) => operator,
            None => return Ok(left),
        };

        let mut right = parse_unary_expr(parser)?;

        if let Some(next_precedence) = parser.current_precedence() {
            if precedence < next_precedence {
                right = parse_binary_rhs(parser, precedence + 1, right)?;
            }
        }

        left = Expr::binary(operator, left, right);
    }
}

/// unary ::= primary | char unary
///
/// Any ASCII punctuation character other than `(` and `,` in operand position
/// is taken as a unary operator; whether one is defined is decided at code
/// generation.
pub fn parse_unary_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    match parser.current_token().as_char() {
        Some(operator) if operator.is_ascii() && operator != '(' && operator != ',' => {
            parser.advance();
            let operand = parse_unary_expr(parser)?;
            Ok(Expr::unary(operator, operand))
        }
        _ => parse_primary_expr(parser),
    }
}

pub fn parse_primary_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    if parser.current_token().is_char('(') {
        return parse_grouping_expr(parser);
    }

    let token_kind = parser.current_token_kind();
    match parser.get_nud_lookup().get(&token_kind).copied() {
        Some(handler) => handler(parser),
        None => Err(MK_UNEXPECTED!(parser, "unknown token when expecting an expression")),
    }
}

pub fn parse_number_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let value = parser.current_number()?;
    parser.advance();

    Ok(Expr::Number(value))
}

pub fn parse_grouping_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expression(parser)?;
    parser.expect_char(')', "expected ')'")?;

    Ok(expr)
}

/// identifierexpr ::= identifier | identifier '(' (expression (',' expression)*)? ')'
pub fn parse_identifier_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let name = parser.advance().value;

    if !parser.current_token().is_char('(') {
        return Ok(Expr::Variable(name));
    }

    parser.advance();
    let mut arguments = vec![];

    if !parser.current_token().is_char(')') {
        loop {
            arguments.push(parse_expression(parser)?);

            if parser.current_token().is_char(')') {
                break;
            }

            parser.expect_char(',', "expected ')' or ',' in argument list")?;
        }
    }

    parser.advance();

    Ok(Expr::Call {
        callee: name,
        arguments,
    })
}

/// ifexpr ::= 'if' expression 'then' expression 'else' expression
pub fn parse_if_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    parser.advance();
    let condition = parse_expression(parser)?;

    parser.expect(TokenKind::Then, "expected then")?;
    let then_branch = parse_expression(parser)?;

    parser.expect(TokenKind::Else, "expected else")?;
    let else_branch = parse_expression(parser)?;

    Ok(Expr::If {
        condition: Box::new(condition),
        then_branch: Box::new(then_branch),
        else_branch: Box::new(else_branch),
    })
}

/// forexpr ::= 'for' identifier '=' expression ',' expression (',' expression)? 'in' expression
pub fn parse_for_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    parser.advance();

    let variable = parser
        .expect(TokenKind::Identifier, "expected identifier after for")?
        .value;

    parser.expect_char('=', "expected '=' after for")?;
    let start = parse_expression(parser)?;

    parser.expect_char(',', "expected ',' after for start value")?;
    let end = parse_expression(parser)?;

    let step = if parser.current_token().is_char(',') {
        parser.advance();
        Some(Box::new(parse_expression(parser)?))
    } else {
        None
    };

    parser.expect(TokenKind::In, "expected 'in' after for")?;
    let body = parse_expression(parser)?;

    Ok(Expr::For {
        variable,
        start: Box::new(start),
        end: Box::new(end),
        step,
        body: Box::new(body),
    })
}
