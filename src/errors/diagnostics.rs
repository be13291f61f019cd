use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::{lexer::tokens::Token, unit::CompilationUnit};

use super::errors::Error;

lazy_static! {
    static ref DIAGNOSTIC_NAMES: HashMap<(DiagPhase, u32), &'static str> = {
        let mut map = HashMap::new();
        map.insert((DiagPhase::Lexer, 1), "Unmatched single quote");
        map.insert((DiagPhase::Lexer, 2), "Unmatched quote");
        map.insert((DiagPhase::Lexer, 3), "Unknown character");
        map.insert((DiagPhase::Lexer, 4), "Unexpected end of file");
        map.insert((DiagPhase::Parser, 101), "Unexpected token");
        map.insert((DiagPhase::TypeChecker, 200), "Unknown identifier");
        map.insert((DiagPhase::TypeChecker, 201), "Type mismatch");
        map.insert((DiagPhase::TypeChecker, 202), "Could not unify types");
        map.insert((DiagPhase::TypeChecker, 203), "Invalid function parameter");
        map.insert((DiagPhase::TypeChecker, 204), "Not a type");
        map.insert((DiagPhase::TypeChecker, 205), "Not an identifier");
        map.insert((DiagPhase::TypeChecker, 206), "No property");
        map.insert((DiagPhase::TypeChecker, 210), "Polymorphic constraint not satisfied");
        map.insert((DiagPhase::TypeChecker, 211), "Polymorphic binding error");
        map.insert((DiagPhase::TypeChecker, 220), "Inconsistent return types");
        map.insert((DiagPhase::TypeChecker, 221), "Return type does not match declared type");
        map.insert((DiagPhase::TypeChecker, 230), "Case pattern is not a boolean");
        map.insert((DiagPhase::TypeChecker, 231), "Case value does not match");
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum DiagLevel {
    Error,
    Warning,
    WeakWarning,
    Info,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum DiagPhase {
    Lexer,
    Parser,
    TypeChecker,
}

impl Display for DiagLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A structured compiler message. `column` is the end column of the
/// offending text; the underline starts at `column - span`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagLevel,
    pub phase: DiagPhase,
    pub code: u32,
    pub token: Option<Token>,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub span: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn symbol_error(unit: &CompilationUnit, code: u32, line: usize, column: usize, message: String) -> Self {
        Diagnostic {
            level: DiagLevel::Error,
            phase: DiagPhase::Lexer,
            code,
            token: None,
            file: unit.file_name.clone(),
            line,
            column,
            span: 1,
            message,
        }
    }

    /// Converts a parser or type checker error into a diagnostic anchored at
    /// the error's token.
    pub fn from_error(unit: &CompilationUnit, error: &Error) -> Self {
        let token = error.get_token();
        Diagnostic {
            level: DiagLevel::Error,
            phase: error.get_phase(),
            code: error.get_code(),
            token: Some(token.clone()),
            file: unit.file_name.clone(),
            line: token.line,
            column: token.col,
            span: token.data.chars().count(),
            message: error.to_string(),
        }
    }

    /// First column of the underlined region.
    pub fn start_column(&self) -> usize {
        self.column.saturating_sub(self.span)
    }

    pub fn name(&self) -> &'static str {
        diagnostic_name(self.phase, self.code)
    }
}

pub fn diagnostic_name(phase: DiagPhase, code: u32) -> &'static str {
    DIAGNOSTIC_NAMES.get(&(phase, code)).copied().unwrap_or("unknown")
}
