//! Unit tests for error handling.
//!
//! This module contains tests for error codes, phases and diagnostics.

use crate::errors::diagnostics::{diagnostic_name, DiagLevel, DiagPhase, Diagnostic};
use crate::errors::errors::{Error, ErrorImpl};
use crate::lexer::tokens::{Token, TokenKind};
use crate::unit::CompilationUnit;
use crate::MK_TOKEN;

fn token(data: &str, line: usize, col: usize) -> Token {
    MK_TOKEN!(TokenKind::Identifier, data.to_string(), line, col)
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnknownIdentifier {
            name: "undefinedVar".to_string(),
        },
        token("undefinedVar", 1, 27),
    );

    assert_eq!(error.get_error_name(), "UnknownIdentifier");
    assert_eq!(error.get_code(), 200);
    assert_eq!(error.get_phase(), DiagPhase::TypeChecker);
    assert!(error.to_string().contains("undefinedVar"));
}

#[test]
fn test_error_token() {
    let error = Error::new(ErrorImpl::MissingBinding, token("x", 3, 9));

    assert_eq!(error.get_token().line, 3);
    assert_eq!(error.get_token().col, 9);
    assert_eq!(error.get_impl(), &ErrorImpl::MissingBinding);
}

#[test]
fn test_unexpected_token_error() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            expected: "Semicolon".to_string(),
            actual: "EndOfFile".to_string(),
        },
        token("", 1, 1),
    );

    assert_eq!(error.get_code(), 101);
    assert_eq!(error.get_phase(), DiagPhase::Parser);
    assert_eq!(error.to_string(), "Expected Semicolon; but got EndOfFile");
}

#[test]
fn test_nesting_error() {
    let error = Error::new(ErrorImpl::NestingTooDeep { limit: 256 }, token("(", 1, 300));

    assert_eq!(error.get_code(), 101);
    assert_eq!(error.get_phase(), DiagPhase::Parser);
    assert_eq!(error.get_error_name(), "NestingTooDeep");
    assert_eq!(error.to_string(), "Expression nests deeper than 256 levels");
}

#[test]
fn test_type_mismatch_error() {
    let error = Error::new(
        ErrorImpl::TypeMismatch {
            expected: "i32".to_string(),
            received: "ConstString".to_string(),
        },
        token("\"hello\"", 1, 22),
    );

    assert_eq!(error.get_code(), 201);
    assert!(error.to_string().starts_with("Expected type"));
}

#[test]
fn test_type_checker_codes() {
    let cases = [
        (ErrorImpl::MissingCaseType, 201),
        (
            ErrorImpl::NoConcreteType {
                hole: "Hole[?0]".to_string(),
            },
            202,
        ),
        (
            ErrorImpl::ParameterNotIdentifier {
                found: "42".to_string(),
            },
            203,
        ),
        (
            ErrorImpl::NotAType {
                type_: "ConstInt[-5]".to_string(),
            },
            204,
        ),
        (
            ErrorImpl::ConstraintNotSatisfied {
                argument: "ConstString".to_string(),
                type_class: "Type 1".to_string(),
                polymorphic: "'T : Type 1 => 'T : Type 1 -> 'T : Type 1".to_string(),
            },
            210,
        ),
        (ErrorImpl::PolymorphicBinding, 211),
        (
            ErrorImpl::InconsistentReturn {
                expected: "ConstInt[42]".to_string(),
                received: "ConstString".to_string(),
            },
            220,
        ),
        (
            ErrorImpl::ReturnMismatch {
                expected: "i32".to_string(),
                received: "ConstString".to_string(),
            },
            221,
        ),
        (ErrorImpl::CasePattern, 230),
        (
            ErrorImpl::CaseValue {
                expected: "i32".to_string(),
            },
            231,
        ),
    ];

    for (kind, code) in cases {
        let error = Error::new(kind, token("x", 1, 2));
        assert_eq!(error.get_code(), code, "{}", error.get_error_name());
        assert_eq!(error.get_phase(), DiagPhase::TypeChecker);
    }
}

#[test]
fn test_operand_messages() {
    let error = Error::new(
        ErrorImpl::IncompatibleOperands {
            operation: "add",
            left: "i32".to_string(),
            right: "ConstString".to_string(),
        },
        token("+", 1, 5),
    );

    assert_eq!(error.to_string(), "Cannot add values of different types `i32`, `ConstString`");
}

#[test]
fn test_diagnostic_from_error() {
    let unit = CompilationUnit::from_code("let x : i32 := undefinedVar;", "main.meow");
    let error = Error::new(
        ErrorImpl::UnknownIdentifier {
            name: "undefinedVar".to_string(),
        },
        token("undefinedVar", 1, 28),
    );

    let diagnostic = Diagnostic::from_error(&unit, &error);

    assert_eq!(diagnostic.level, DiagLevel::Error);
    assert_eq!(diagnostic.phase, DiagPhase::TypeChecker);
    assert_eq!(diagnostic.code, 200);
    assert_eq!(diagnostic.file, "main.meow");
    assert_eq!(diagnostic.line, 1);
    assert_eq!(diagnostic.column, 28);
    assert_eq!(diagnostic.span, 12);
    assert_eq!(diagnostic.start_column(), 16);
    assert_eq!(diagnostic.name(), "Unknown identifier");
}

#[test]
fn test_symbol_error() {
    let unit = CompilationUnit::from_code("@", "main.meow");
    let diagnostic = Diagnostic::symbol_error(&unit, 3, 1, 2, "Unknown character `@`".to_string());

    assert_eq!(diagnostic.phase, DiagPhase::Lexer);
    assert_eq!(diagnostic.token, None);
    assert_eq!(diagnostic.span, 1);
    assert_eq!(diagnostic.start_column(), 1);
}

#[test]
fn test_unit_marks_errored() {
    let mut unit = CompilationUnit::from_code("", "main.meow");
    assert!(!unit.errored());

    let diagnostic = Diagnostic::symbol_error(&unit, 4, 1, 1, "Unexpected end of file".to_string());
    unit.add_diagnostic(diagnostic);

    assert!(unit.errored());
    assert_eq!(unit.diagnostics().len(), 1);
}

#[test]
fn test_diagnostic_names() {
    assert_eq!(diagnostic_name(DiagPhase::Lexer, 1), "Unmatched single quote");
    assert_eq!(diagnostic_name(DiagPhase::Parser, 101), "Unexpected token");
    assert_eq!(diagnostic_name(DiagPhase::TypeChecker, 211), "Polymorphic binding error");
    assert_eq!(diagnostic_name(DiagPhase::Lexer, 200), "unknown");
}
