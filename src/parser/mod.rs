//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a list of top-level definitions. It uses a Pratt parser for
//! expressions with priority-based precedence and handles:
//!
//! - Definitions (`let id : Type := Value;`)
//! - Expressions shared by type and value syntax (operators, tuples,
//!   procedures, case blocks, records, implicit application)
//! - Procedure statements (calls, assignments, returns)
//! - Error recovery and reporting
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with priorities for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
