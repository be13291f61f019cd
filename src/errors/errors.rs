use thiserror::Error;

use crate::lexer::tokens::Token;

use super::diagnostics::DiagPhase;

/// A parser or type checker failure, anchored at the token that caused it.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    token: Token,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, token: Token) -> Self {
        Error {
            internal_error: error_impl,
            token,
        }
    }

    pub fn get_token(&self) -> &Token {
        &self.token
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_code(&self) -> u32 {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::CharParseError { .. }
            | ErrorImpl::NestingTooDeep { .. } => 101,
            ErrorImpl::UnknownIdentifier { .. } => 200,
            ErrorImpl::TypeMismatch { .. }
            | ErrorImpl::ExpectedFunction { .. }
            | ErrorImpl::FunctionReturn { .. }
            | ErrorImpl::ExpectedPolymorphic { .. }
            | ErrorImpl::PolymorphicBody { .. }
            | ErrorImpl::IncompatibleOperands { .. }
            | ErrorImpl::NonNumericOperands { .. }
            | ErrorImpl::NotNegatable { .. }
            | ErrorImpl::ArgumentMismatch { .. }
            | ErrorImpl::NotAFunction { .. }
            | ErrorImpl::MissingCaseType => 201,
            ErrorImpl::MissingBinding
            | ErrorImpl::NotUnifiable { .. }
            | ErrorImpl::NoConcreteType { .. } => 202,
            ErrorImpl::ExpectedProductParameter { .. } | ErrorImpl::ParameterNotIdentifier { .. } => 203,
            ErrorImpl::NotATypeIdentifier { .. } | ErrorImpl::NotAType { .. } => 204,
            ErrorImpl::ConstraintNotSatisfied { .. } => 210,
            ErrorImpl::PolymorphicBinding => 211,
            ErrorImpl::InconsistentReturn { .. } => 220,
            ErrorImpl::ReturnMismatch { .. } => 221,
            ErrorImpl::CasePattern => 230,
            ErrorImpl::CaseValue { .. } => 231,
        }
    }

    pub fn get_phase(&self) -> DiagPhase {
        if self.get_code() < 200 {
            DiagPhase::Parser
        } else {
            DiagPhase::TypeChecker
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::CharParseError { .. } => "CharParseError",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
            ErrorImpl::UnknownIdentifier { .. } => "UnknownIdentifier",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::ExpectedFunction { .. } => "ExpectedFunction",
            ErrorImpl::FunctionReturn { .. } => "FunctionReturn",
            ErrorImpl::ExpectedPolymorphic { .. } => "ExpectedPolymorphic",
            ErrorImpl::PolymorphicBody { .. } => "PolymorphicBody",
            ErrorImpl::IncompatibleOperands { .. } => "IncompatibleOperands",
            ErrorImpl::NonNumericOperands { .. } => "NonNumericOperands",
            ErrorImpl::NotNegatable { .. } => "NotNegatable",
            ErrorImpl::ArgumentMismatch { .. } => "ArgumentMismatch",
            ErrorImpl::NotAFunction { .. } => "NotAFunction",
            ErrorImpl::MissingCaseType => "MissingCaseType",
            ErrorImpl::MissingBinding => "MissingBinding",
            ErrorImpl::NotUnifiable { .. } => "NotUnifiable",
            ErrorImpl::NoConcreteType { .. } => "NoConcreteType",
            ErrorImpl::ExpectedProductParameter { .. } => "ExpectedProductParameter",
            ErrorImpl::ParameterNotIdentifier { .. } => "ParameterNotIdentifier",
            ErrorImpl::NotATypeIdentifier { .. } => "NotATypeIdentifier",
            ErrorImpl::NotAType { .. } => "NotAType",
            ErrorImpl::ConstraintNotSatisfied { .. } => "ConstraintNotSatisfied",
            ErrorImpl::PolymorphicBinding => "PolymorphicBinding",
            ErrorImpl::InconsistentReturn { .. } => "InconsistentReturn",
            ErrorImpl::ReturnMismatch { .. } => "ReturnMismatch",
            ErrorImpl::CasePattern => "CasePattern",
            ErrorImpl::CaseValue { .. } => "CaseValue",
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Parser
    #[error("Expected {expected}; but got {actual}")]
    UnexpectedToken { expected: String, actual: String },
    #[error("Invalid number `{token}`, is it above the integer limit?")]
    NumberParseError { token: String },
    #[error("Invalid character literal '{token}', expected exactly one character")]
    CharParseError { token: String },
    #[error("Expression nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    // Type checker
    #[error("No identifier found called '{name}'")]
    UnknownIdentifier { name: String },
    #[error("Expected type `{expected}` but got `{received}`")]
    TypeMismatch { expected: String, received: String },
    #[error("Expected a function type but got `{found}` instead")]
    ExpectedFunction { found: String },
    #[error("Expected function to return `{expected}`, but got `{received}` instead")]
    FunctionReturn { expected: String, received: String },
    #[error("Expected a polymorphic type but got `{found}` instead")]
    ExpectedPolymorphic { found: String },
    #[error("Expected polymorphic type into `{expected}`, but got `{received}` instead")]
    PolymorphicBody { expected: String, received: String },
    #[error("Cannot {operation} values of different types `{left}`, `{right}`")]
    IncompatibleOperands { operation: &'static str, left: String, right: String },
    #[error("Cannot {operation} values of non-numeric types `{left}`, `{right}`")]
    NonNumericOperands { operation: &'static str, left: String, right: String },
    #[error("Cannot negate non-numeric type `{found}`")]
    NotNegatable { found: String },
    #[error("Type `{function}` takes a `{expected}`, but got a `{received}`")]
    ArgumentMismatch { function: String, expected: String, received: String },
    #[error("Type `{found}` is not a function")]
    NotAFunction { found: String },
    #[error("Case expressions need an expected type to be checked against")]
    MissingCaseType,
    #[error("Functions require bindings")]
    MissingBinding,
    #[error("Could not unify {hole}: types `{left}` and `{right}` are not unifiable")]
    NotUnifiable { hole: String, left: String, right: String },
    #[error("Could not unify {hole}: got no concrete types to realize it with")]
    NoConcreteType { hole: String },
    #[error("Expected product type, got `{found}`")]
    ExpectedProductParameter { found: String },
    #[error("Expected identifier for function parameter, got `{found}`")]
    ParameterNotIdentifier { found: String },
    #[error("Type `{type_}` for definition `{definition}` ought to be a type identifier")]
    NotATypeIdentifier { type_: String, definition: String },
    #[error("`{type_}` does not denote a type")]
    NotAType { type_: String },
    #[error("Type `{argument}` does not satisfy constraint `{type_class}` for polymorphic `{polymorphic}`")]
    ConstraintNotSatisfied { argument: String, type_class: String, polymorphic: String },
    #[error("Polymorphism requires bindings")]
    PolymorphicBinding,
    #[error("Type `{received}` does not match `{expected}`")]
    InconsistentReturn { expected: String, received: String },
    #[error("Expected return of type `{expected}`, but got `{received}`")]
    ReturnMismatch { expected: String, received: String },
    #[error("Case pattern is not a boolean")]
    CasePattern,
    #[error("Expected case to be `{expected}`")]
    CaseValue { expected: String },
}
