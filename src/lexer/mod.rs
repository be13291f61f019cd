//! Lexical analysis.
//!
//! Converts a `CompilationUnit`'s source into a flat token list. Symbols
//! and keywords come from a `TokenConfig` (see `res/`), so the operator
//! table can be swapped without touching the lexer. Malformed input never
//! aborts lexing; it is reported on the unit as a lexer diagnostic.

pub mod lexer;
pub mod tokens;
