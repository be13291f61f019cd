use crate::{
    ast::statements::{Definition, ProcedureDefinition, Statement},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::parse_expr, lookups::Priority, parser::Parser};

/// `let id : Type := Value ;`
pub fn parse_definition(parser: &mut Parser) -> Result<Definition, Error> {
    parser.expect_keyword("let")?;
    let id = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::TypeDef)?;
    let ty = parse_expr(parser, Priority::No)?;
    parser.expect(TokenKind::Def)?;
    let val = parse_expr(parser, Priority::No)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Definition { id, ty, val })
}

/// `id : Type ;` or `id : Type := Value ;` inside a procedure header.
pub fn parse_procedure_definition(parser: &mut Parser) -> Result<ProcedureDefinition, Error> {
    let id = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::TypeDef)?;
    let ty = parse_expr(parser, Priority::No)?;

    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        return Ok(ProcedureDefinition { id, ty, val: None });
    }

    parser.expect(TokenKind::Def)?;
    let val = parse_expr(parser, Priority::No)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(ProcedureDefinition { id, ty, val: Some(val) })
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let token = parser.current_token();

    if token.kind == TokenKind::Keyword {
        if let Some(handler) = parser.get_stmt_lookup().get(token.data.as_str()).copied() {
            return handler(parser);
        }
    }

    if token.kind == TokenKind::Identifier && matches!(parser.peek(1).kind, TokenKind::Def | TokenKind::Gets) {
        return parse_assignment_stmt(parser);
    }

    parse_call_stmt(parser)
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    parser.advance();
    let argument = parse_expr(parser, Priority::No)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Statement::Return { argument })
}

pub fn parse_assignment_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let variable = parser.expect(TokenKind::Identifier)?;
    parser.advance();
    let value = parse_expr(parser, Priority::No)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Statement::Assignment { variable, value })
}

pub fn parse_call_stmt(parser: &mut Parser) -> Result<Statement, Error> {
    let routine = parser.expect(TokenKind::Identifier)?;
    let argument = parse_expr(parser, Priority::No)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Statement::Callable { routine, argument })
}
