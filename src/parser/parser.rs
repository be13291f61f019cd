//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the top-level `parse`
//! loop. Expressions are parsed with a Pratt parser driven by NUD/LED
//! handlers; statements, case arms and keyword-initiated expressions are
//! dispatched through their own lookup tables.
//!
//! It maintains lookup tables for:
//! - NUD (null denotation) handlers keyed by token kind
//! - NUD handlers keyed by keyword text (`record`, `variant`, `auto`)
//! - LED (left denotation) handlers for infix operators
//! - Operator priorities and associativity
//! - Statement and case-arm handlers keyed by keyword text

use std::collections::HashMap;

use crate::{
    ast::{
        expressions::{ExprId, ExprKind, Expression},
        statements::Definition,
    },
    errors::{
        diagnostics::Diagnostic,
        errors::{Error, ErrorImpl},
    },
    lexer::tokens::{Token, TokenKind},
    unit::CompilationUnit,
    MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, Associativity, CaseHandler, CaseLookup, KeywordNUDLookup, LEDHandler, LEDLookup,
        NUDHandler, NUDLookup, Priority, PriorityLookup, StmtHandler, StmtLookup,
    },
    stmt::parse_definition,
};

/// Deepest expression nesting the parser accepts. Every operator in a chain
/// counts as a level, as it nests one level deeper in the tree.
pub const MAX_NESTING: usize = 256;

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and the lookup tables used to parse
/// definitions, statements and expressions. The token stream always ends
/// with an `EndOfFile` token and the cursor never moves past it.
pub struct Parser {
    /// The list of tokens to parse
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Prefix handlers keyed by token kind
    nud_lookup: NUDLookup,
    /// Prefix handlers keyed by keyword text
    keyword_nud_lookup: KeywordNUDLookup,
    /// Infix handlers keyed by token kind
    led_lookup: LEDLookup,
    /// Priority and associativity of every infix operator
    priority_lookup: PriorityLookup,
    /// Statement handlers keyed by keyword text
    stmt_lookup: StmtLookup,
    /// Case arm handlers keyed by keyword text
    case_lookup: CaseLookup,
    /// Counter for generating expression ids
    current_id: usize,
    /// Nesting level of the expression being parsed
    depth: usize,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse. An `EndOfFile` token is
    ///   appended if the stream does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EndOfFile) {
            let (line, col) = tokens.last().map(|token| (token.line, token.col)).unwrap_or((1, 1));
            tokens.push(MK_TOKEN!(TokenKind::EndOfFile, String::new(), line, col));
        }

        Parser {
            tokens,
            pos: 0,
            nud_lookup: HashMap::new(),
            keyword_nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            priority_lookup: HashMap::new(),
            stmt_lookup: HashMap::new(),
            case_lookup: HashMap::new(),
            current_id: 0,
            depth: 0,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.peek(0)
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the token `offset` positions ahead, clamped to `EndOfFile`.
    pub fn peek(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if index < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Builds an "unexpected token" error at the current token.
    pub fn unexpected(&self, expected: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                expected: expected.to_string(),
                actual: token.to_string(),
            },
            token.clone(),
        )
    }

    /// Expects a token of the specified kind and consumes it.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return Err(self.unexpected(&expected_kind.to_string()));
        }
        Ok(self.advance().clone())
    }

    /// Expects the given keyword and consumes it.
    pub fn expect_keyword(&mut self, keyword: &str) -> Result<Token, Error> {
        if !self.current_token().is_keyword(keyword) {
            return Err(self.unexpected(&format!("Keyword[{}]", keyword)));
        }
        Ok(self.advance().clone())
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EndOfFile
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_keyword_nud_lookup(&self) -> &KeywordNUDLookup {
        &self.keyword_nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_priority_lookup(&self) -> &PriorityLookup {
        &self.priority_lookup
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_case_lookup(&self) -> &CaseLookup {
        &self.case_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `priority` - How tightly this operator binds
    /// * `associativity` - Which side operators of equal priority nest on
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, priority: Priority, associativity: Associativity, led_fn: LEDHandler) {
        self.priority_lookup.insert(kind, (priority, associativity));
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token kind.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a null denotation handler for a keyword.
    pub fn keyword_nud(&mut self, keyword: &'static str, nud_fn: NUDHandler) {
        self.keyword_nud_lookup.insert(keyword, nud_fn);
    }

    /// Registers a statement handler for a keyword.
    pub fn stmt(&mut self, keyword: &'static str, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(keyword, stmt_fn);
    }

    /// Registers a case arm handler for a keyword.
    pub fn case(&mut self, keyword: &'static str, case_fn: CaseHandler) {
        self.case_lookup.insert(keyword, case_fn);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    /// Enters one more level of nesting, failing past `MAX_NESTING`.
    pub fn descend(&mut self) -> Result<(), Error> {
        if self.depth >= MAX_NESTING {
            return Err(Error::new(
                ErrorImpl::NestingTooDeep { limit: MAX_NESTING },
                self.current_token().clone(),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Advances the internal ID counter and returns the previous value.
    pub fn advance_id(&mut self) -> ExprId {
        let id = self.current_id;
        self.current_id += 1;
        ExprId(id)
    }

    /// Creates an expression node with a fresh id.
    pub fn make_expr(&mut self, token: Token, kind: ExprKind) -> Expression {
        Expression::new(self.advance_id(), token, kind)
    }
}

/// Parses a stream of tokens into top-level definitions.
///
/// This is the main entry point for parsing. A definition that fails to
/// parse is reported on the unit as a single diagnostic and dropped; the
/// parser then skips ahead to the next `let` keyword and carries on.
///
/// # Arguments
///
/// * `unit` - The compilation unit that receives diagnostics
/// * `tokens` - Vector of tokens to parse
pub fn parse(unit: &mut CompilationUnit, tokens: Vec<Token>) -> Vec<Definition> {
    let mut parser = Parser::new(tokens);
    create_token_lookups(&mut parser);

    let mut definitions = vec![];

    while parser.has_tokens() {
        let start = parser.position();

        match parse_definition(&mut parser) {
            Ok(definition) => {
                log::trace!(target: "parser", "parsed definition {}", definition.id.data);
                definitions.push(definition);
            }
            Err(error) => {
                log::trace!(target: "parser", "recovering from {}", error.get_error_name());
                let diagnostic = Diagnostic::from_error(unit, &error);
                unit.add_diagnostic(diagnostic);

                if parser.position() == start || !parser.current_token().is_keyword("let") {
                    parser.advance();
                }
                while parser.has_tokens() && !parser.current_token().is_keyword("let") {
                    parser.advance();
                }
            }
        }
    }

    definitions
}
