use crate::{
    ast::{
        expressions::{Case, ExprKind, Expression},
        statements::FieldDefinition,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    lookups::{Associativity, Priority},
    parser::Parser,
    stmt::{parse_procedure_definition, parse_stmt},
};

pub fn parse_expr(parser: &mut Parser, priority: Priority) -> Result<Expression, Error> {
    let depth = parser.depth();
    let result = parse_nested_expr(parser, priority);
    parser.set_depth(depth);
    result
}

fn parse_nested_expr(parser: &mut Parser, priority: Priority) -> Result<Expression, Error> {
    parser.descend()?;

    // First parse NUD
    let token = parser.current_token();
    let nud = if token.kind == TokenKind::Keyword {
        parser.get_keyword_nud_lookup().get(token.data.as_str()).copied()
    } else {
        parser.get_nud_lookup().get(&token.kind).copied()
    };

    let Some(nud) = nud else {
        return Err(parser.unexpected("expression"));
    };

    let mut left = nud(parser)?;

    // Continue while the lookahead binds tighter than `priority`. A lookahead
    // that can only start an expression is an implicit application.
    loop {
        let kind = parser.current_token_kind();

        if let Some(&(operator_priority, associativity)) = parser.get_priority_lookup().get(&kind) {
            if operator_priority <= priority {
                break;
            }

            let Some(led) = parser.get_led_lookup().get(&kind).copied() else {
                break;
            };

            parser.descend()?;

            let right_priority = match associativity {
                Associativity::Left => operator_priority,
                Associativity::Right => operator_priority.lower(),
            };

            left = led(parser, left, right_priority)?;
        } else if priority < Priority::Application && parser.get_nud_lookup().contains_key(&kind) {
            parser.descend()?;
            left = parse_application_expr(parser, left)?;
        } else {
            break;
        }
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.current_token().clone();

    let kind = match token.kind {
        TokenKind::Number => {
            let value = token.data.parse::<i64>().map_err(|_| {
                Error::new(ErrorImpl::NumberParseError { token: token.data.clone() }, token.clone())
            })?;
            ExprKind::Number(value)
        }
        TokenKind::Char => {
            let unescaped = unescape(&token.data);
            let mut chars = unescaped.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => ExprKind::Number(c as i64),
                _ => {
                    return Err(Error::new(
                        ErrorImpl::CharParseError { token: token.data.clone() },
                        token,
                    ))
                }
            }
        }
        TokenKind::Identifier => ExprKind::Identifier(token.data.clone()),
        TokenKind::String => ExprKind::String(unescape(&token.data)),
        _ => return Err(parser.unexpected("literal")),
    };

    parser.advance();
    Ok(parser.make_expr(token, kind))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expression, priority: Priority) -> Result<Expression, Error> {
    let operator_token = parser.advance().clone();
    let right = parse_expr(parser, priority)?;

    Ok(parser.make_expr(
        operator_token.clone(),
        ExprKind::BinaryOperator {
            operator: operator_token.kind,
            left: Box::new(left),
            right: Box::new(right),
        },
    ))
}

pub fn parse_application_expr(parser: &mut Parser, function: Expression) -> Result<Expression, Error> {
    let argument = parse_expr(parser, Priority::Application)?;
    let token = function.token.clone();

    Ok(parser.make_expr(
        token,
        ExprKind::Application {
            function: Box::new(function),
            argument: Box::new(argument),
        },
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let operator_token = parser.advance().clone();
    let operand = parse_expr(parser, Priority::Prefix)?;

    Ok(parser.make_expr(
        operator_token.clone(),
        ExprKind::Prefix {
            operator: operator_token.kind,
            operand: Box::new(operand),
        },
    ))
}

/// `()`, `(e)` or `(e1, e2, ...)`.
pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.advance().clone();

    if parser.current_token_kind() == TokenKind::RParen {
        parser.advance();
        return Ok(parser.make_expr(token, ExprKind::Unit));
    }

    let first = parse_expr(parser, Priority::No)?;

    if parser.current_token_kind() == TokenKind::RParen {
        parser.advance();
        return Ok(first);
    }

    let mut values = vec![first];
    while parser.current_token_kind() != TokenKind::RParen {
        parser.expect(TokenKind::Comma)?;
        values.push(parse_expr(parser, Priority::No)?);
    }

    parser.expect(TokenKind::RParen)?;

    Ok(parser.make_expr(token, ExprKind::Tuple(values)))
}

/// `[ locals ] { statements }`
pub fn parse_procedure_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.advance().clone();

    let mut definitions = vec![];
    while parser.current_token_kind() != TokenKind::RBrack {
        definitions.push(parse_procedure_definition(parser)?);
    }
    parser.expect(TokenKind::RBrack)?;

    parser.expect(TokenKind::LBrace)?;
    let mut statements = vec![];
    while parser.current_token_kind() != TokenKind::RBrace {
        statements.push(parse_stmt(parser)?);
    }
    parser.expect(TokenKind::RBrace)?;

    Ok(parser.make_expr(token, ExprKind::Procedure { definitions, statements }))
}

/// `{ value ; if pattern , ... value ; otherwise . }`
pub fn parse_cases_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.advance().clone();

    let mut cases = vec![];
    while parser.current_token_kind() != TokenKind::RBrace {
        cases.push(parse_case(parser)?);
    }
    parser.expect(TokenKind::RBrace)?;

    Ok(parser.make_expr(token, ExprKind::Case(cases)))
}

pub fn parse_case(parser: &mut Parser) -> Result<Case, Error> {
    let value = parse_expr(parser, Priority::No)?;
    parser.expect(TokenKind::Semicolon)?;

    let handler = if parser.current_token_kind() == TokenKind::Keyword {
        parser
            .get_case_lookup()
            .get(parser.current_token().data.as_str())
            .copied()
    } else {
        None
    };

    let Some(handler) = handler else {
        return Err(parser.unexpected("case keyword"));
    };

    parser.advance();
    handler(parser, value)
}

pub fn parse_bool_case(parser: &mut Parser, value: Expression) -> Result<Case, Error> {
    let pattern = parse_expr(parser, Priority::No)?;
    parser.expect(TokenKind::Comma)?;

    Ok(Case::Bool { value, pattern })
}

pub fn parse_otherwise_case(parser: &mut Parser, value: Expression) -> Result<Case, Error> {
    parser.expect(TokenKind::Period)?;

    Ok(Case::Otherwise { value })
}

pub fn parse_record_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.advance().clone();
    let fields = parse_field_definitions(parser)?;

    Ok(parser.make_expr(token, ExprKind::Record(fields)))
}

pub fn parse_variant_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.advance().clone();
    let fields = parse_field_definitions(parser)?;

    Ok(parser.make_expr(token, ExprKind::Variant(fields)))
}

/// `{ name : Type; ... }`
fn parse_field_definitions(parser: &mut Parser) -> Result<Vec<FieldDefinition>, Error> {
    parser.expect(TokenKind::LBrace)?;

    let mut fields = vec![];
    while parser.current_token_kind() != TokenKind::RBrace {
        let id = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::TypeDef)?;
        let ty = parse_expr(parser, Priority::No)?;
        parser.expect(TokenKind::Semicolon)?;

        fields.push(FieldDefinition { id, ty });
    }

    parser.expect(TokenKind::RBrace)?;
    Ok(fields)
}

pub fn parse_hole_expr(parser: &mut Parser) -> Result<Expression, Error> {
    let token = parser.advance().clone();

    Ok(parser.make_expr(token, ExprKind::Hole))
}

/// Resolves backslash escapes in string and char literals. Unknown escapes
/// keep their backslash.
pub fn unescape(literal: &str) -> String {
    let mut result = String::new();
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('\'') => {
                result.push('\'');
                chars.next();
            }
            Some('0') => {
                result.push('\0');
                chars.next();
            }
            Some('x') => {
                chars.next();
                let mut hex = String::new();

                for _ in 0..2 {
                    match chars.peek() {
                        Some(digit) if digit.is_ascii_hexdigit() => {
                            hex.push(*digit);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => {
                        result.push_str("\\x");
                        result.push_str(&hex);
                    }
                }
            }
            _ => result.push(ch), // Keep the backslash
        }
    }

    result
}
