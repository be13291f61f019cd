use crate::lexer::tokens::Token;

use super::expressions::Expression;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `routine argument;`, e.g. `print x;`
    Callable { routine: Token, argument: Expression },
    /// `variable := value;` or `variable <- value;`
    Assignment { variable: Token, value: Expression },
    Return { argument: Expression },
}

impl Statement {
    pub fn argument(&self) -> &Expression {
        match self {
            Statement::Callable { argument, .. } => argument,
            Statement::Assignment { value, .. } => value,
            Statement::Return { argument } => argument,
        }
    }
}

/// Top-level `let id : ty := val;`.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub id: Token,
    pub ty: Expression,
    pub val: Expression,
}

/// Procedure-local `id : ty;` or `id : ty := val;`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureDefinition {
    pub id: Token,
    pub ty: Expression,
    pub val: Option<Expression>,
}

/// `id : ty;` inside a record or variant body.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub id: Token,
    pub ty: Expression,
}
