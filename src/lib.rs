#![allow(clippy::module_inception)]

use crate::{errors::diagnostics::Diagnostic, unit::CompilationUnit};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;
pub mod unit;

/// Renders a diagnostic with the offending source line underlined.
///
/// ```text
/// Error[3]: Unknown character `@` (Unknown character)
/// -> main.meow:1
///   |
/// 1 | let x = @
///   | --------^
/// ```
pub fn format_diagnostic(unit: &CompilationUnit, diagnostic: &Diagnostic) -> String {
    let line_string = diagnostic.line.to_string();
    let padding = line_string.len() + 2;

    let mut lines = vec![
        format!(
            "{}[{}]: {} ({})",
            diagnostic.level,
            diagnostic.code,
            diagnostic.message,
            diagnostic.name()
        ),
        format!("-> {}:{}", diagnostic.file, diagnostic.line),
        format!("{:>padding$}", "|"),
    ];

    if let Some(text) = unit.line(diagnostic.line) {
        let (text_removed, removed_whitespace) = remove_starting_whitespace(text);
        lines.push(format!("{} | {}", line_string, text_removed.trim_end()));

        let dashes = diagnostic
            .start_column()
            .saturating_sub(1)
            .saturating_sub(removed_whitespace);
        let carets = "^".repeat(diagnostic.span.max(1));
        lines.push(format!("{:>padding$} {}{}", "|", "-".repeat(dashes), carets));
    }

    lines.join("\n")
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let start = string.chars().take_while(|c| *c == ' ' || *c == '\t').count();
    (&string[start..], start)
}
