//! Error types and diagnostics for the front end.
//!
//! - `errors` holds the `Error` raised by the parser and the type evaluator,
//!   each variant mapping onto a stable diagnostic code.
//! - `diagnostics` holds the `Diagnostic` records collected on a
//!   `CompilationUnit`, which is what editors and the console consume.

pub mod diagnostics;
pub mod errors;

#[cfg(test)]
mod tests;
