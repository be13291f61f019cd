use std::fmt::Display;

use crate::lexer::tokens::{Token, TokenKind};

use super::statements::{FieldDefinition, ProcedureDefinition, Statement};

/// Identity of an expression node, unique within one parse. The type
/// checker's expression table is keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub usize);

impl Display for ExprId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An expression node. `token` is the token the node was built from and
/// anchors any diagnostic raised against it.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub id: ExprId,
    pub token: Token,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Identifier(String),
    Number(i64),
    String(String),
    Unit,
    Tuple(Vec<Expression>),
    Prefix {
        operator: TokenKind,
        operand: Box<Expression>,
    },
    BinaryOperator {
        operator: TokenKind,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Procedure {
        definitions: Vec<ProcedureDefinition>,
        statements: Vec<Statement>,
    },
    Case(Vec<Case>),
    Application {
        function: Box<Expression>,
        argument: Box<Expression>,
    },
    Record(Vec<FieldDefinition>),
    Variant(Vec<FieldDefinition>),
    Hole,
}

/// One arm of a case block.
#[derive(Debug, Clone, PartialEq)]
pub enum Case {
    Bool { value: Expression, pattern: Expression },
    Otherwise { value: Expression },
}

impl Case {
    pub fn value(&self) -> &Expression {
        match self {
            Case::Bool { value, .. } | Case::Otherwise { value } => value,
        }
    }
}

impl Expression {
    pub fn new(id: ExprId, token: Token, kind: ExprKind) -> Self {
        Expression { id, token, kind }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Calls `visit` on this node and every node below it, parents first.
    pub fn walk<F: FnMut(&Expression)>(&self, visit: &mut F) {
        visit(self);

        match &self.kind {
            ExprKind::Identifier(_)
            | ExprKind::Number(_)
            | ExprKind::String(_)
            | ExprKind::Unit
            | ExprKind::Hole => {}
            ExprKind::Tuple(values) => values.iter().for_each(|value| value.walk(visit)),
            ExprKind::Prefix { operand, .. } => operand.walk(visit),
            ExprKind::BinaryOperator { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            ExprKind::Procedure { definitions, statements } => {
                for definition in definitions {
                    definition.ty.walk(visit);
                    if let Some(val) = &definition.val {
                        val.walk(visit);
                    }
                }
                for statement in statements {
                    statement.argument().walk(visit);
                }
            }
            ExprKind::Case(cases) => {
                for case in cases {
                    if let Case::Bool { pattern, .. } = case {
                        pattern.walk(visit);
                    }
                    case.value().walk(visit);
                }
            }
            ExprKind::Application { function, argument } => {
                function.walk(visit);
                argument.walk(visit);
            }
            ExprKind::Record(fields) | ExprKind::Variant(fields) => {
                fields.iter().for_each(|field| field.ty.walk(visit))
            }
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::Identifier(name) => write!(f, "{}", name),
            ExprKind::Number(value) => write!(f, "{}", value),
            ExprKind::String(value) => write!(f, "{:?}", value),
            ExprKind::Unit => write!(f, "()"),
            ExprKind::Tuple(values) => {
                let parts: Vec<String> = values.iter().map(|value| value.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
            ExprKind::Prefix { operand, .. } => write!(f, "-{}", operand),
            ExprKind::BinaryOperator { operator, left, right } => {
                write!(f, "({} {} {})", left, operator_text(*operator), right)
            }
            ExprKind::Procedure { definitions, statements } => {
                write!(f, "[{} locals] {{{} statements}}", definitions.len(), statements.len())
            }
            ExprKind::Case(cases) => write!(f, "{{{} cases}}", cases.len()),
            ExprKind::Application { function, argument } => write!(f, "({} {})", function, argument),
            ExprKind::Record(fields) => write!(f, "record {{{} fields}}", fields.len()),
            ExprKind::Variant(fields) => write!(f, "variant {{{} fields}}", fields.len()),
            ExprKind::Hole => write!(f, "auto"),
        }
    }
}

fn operator_text(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::FuncType => "->",
        TokenKind::MapsTo => "|->",
        TokenKind::DoubleTo => "=>",
        TokenKind::DoubleMapsTo => "|=>",
        TokenKind::Equals => "=",
        TokenKind::Less => "<",
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Times => "*",
        TokenKind::Slash => "/",
        _ => "?",
    }
}
