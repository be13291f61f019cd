use std::collections::HashMap;

use crate::{
    ast::{
        expressions::{Case, Expression},
        statements::Statement,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Binding strength of an operator, weakest first.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub enum Priority {
    No,
    Assignment,
    PolymorphismFormation,
    FunctionFormation,
    Conditional,
    Sum,
    Product,
    Exponent,
    Prefix,
    Application,
    Postfix,
    Const,
}

impl Priority {
    /// The next weaker priority. Parsing a right operand at `lower()` lets an
    /// operator of the same strength nest to the right.
    pub fn lower(self) -> Priority {
        match self {
            Priority::No | Priority::Assignment => Priority::No,
            Priority::PolymorphismFormation => Priority::Assignment,
            Priority::FunctionFormation => Priority::PolymorphismFormation,
            Priority::Conditional => Priority::FunctionFormation,
            Priority::Sum => Priority::Conditional,
            Priority::Product => Priority::Sum,
            Priority::Exponent => Priority::Product,
            Priority::Prefix => Priority::Exponent,
            Priority::Application => Priority::Prefix,
            Priority::Postfix => Priority::Application,
            Priority::Const => Priority::Postfix,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Associativity {
    Left,
    Right,
}

pub type NUDHandler = fn(&mut Parser) -> Result<Expression, Error>;
pub type LEDHandler = fn(&mut Parser, Expression, Priority) -> Result<Expression, Error>;
pub type StmtHandler = fn(&mut Parser) -> Result<Statement, Error>;
pub type CaseHandler = fn(&mut Parser, Expression) -> Result<Case, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Type and function formation
    parser.led(TokenKind::FuncType, Priority::FunctionFormation, Associativity::Right, parse_binary_expr);
    parser.led(TokenKind::MapsTo, Priority::FunctionFormation, Associativity::Right, parse_binary_expr);
    parser.led(TokenKind::DoubleTo, Priority::PolymorphismFormation, Associativity::Right, parse_binary_expr);
    parser.led(TokenKind::DoubleMapsTo, Priority::PolymorphismFormation, Associativity::Right, parse_binary_expr);

    // Conditional
    parser.led(TokenKind::Equals, Priority::Conditional, Associativity::Left, parse_binary_expr);
    parser.led(TokenKind::Less, Priority::Conditional, Associativity::Left, parse_binary_expr);

    // Sum and product
    parser.led(TokenKind::Plus, Priority::Sum, Associativity::Left, parse_binary_expr);
    parser.led(TokenKind::Minus, Priority::Sum, Associativity::Left, parse_binary_expr);
    parser.led(TokenKind::Times, Priority::Product, Associativity::Left, parse_binary_expr);
    parser.led(TokenKind::Slash, Priority::Product, Associativity::Left, parse_binary_expr);

    // Literals and groupings
    parser.nud(TokenKind::Identifier, parse_primary_expr);
    parser.nud(TokenKind::Number, parse_primary_expr);
    parser.nud(TokenKind::Char, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::Minus, parse_prefix_expr);
    parser.nud(TokenKind::LParen, parse_grouping_expr);
    parser.nud(TokenKind::LBrack, parse_procedure_expr);
    parser.nud(TokenKind::LBrace, parse_cases_expr);

    // Keyword prefixes
    parser.keyword_nud("record", parse_record_expr);
    parser.keyword_nud("variant", parse_variant_expr);
    parser.keyword_nud("auto", parse_hole_expr);

    // Case arms
    parser.case("if", parse_bool_case);
    parser.case("otherwise", parse_otherwise_case);

    // Statements
    parser.stmt("return", parse_return_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type KeywordNUDLookup = HashMap<&'static str, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type PriorityLookup = HashMap<TokenKind, (Priority, Associativity)>;
pub type StmtLookup = HashMap<&'static str, StmtHandler>;
pub type CaseLookup = HashMap<&'static str, CaseHandler>;
