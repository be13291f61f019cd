//! Type checking and semantic analysis module.
//!
//! This module checks parsed definitions against their declared types.
//! Types and values share one grammar, so a single evaluator computes the
//! type of any expression, whether it is written as a type or as a value:
//!
//! - `types` defines the type representation with its compatibility and
//!   constraint satisfaction relations
//! - `evaluator` computes the type of an expression under a scope
//! - `constraints` collects what is known about `auto` holes
//! - `type_checker` runs the declaration and value passes and resolves holes
//!
//! Errors are reported per definition, so one bad definition does not stop
//! the rest from being checked.

pub mod constraints;
pub mod evaluator;
pub mod type_checker;
pub mod types;

#[cfg(test)]
mod tests;
