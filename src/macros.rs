//! Utility macros for the front end.
//!
//! - `MK_TOKEN!` - Creates a Token instance at the lexer's current position

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$data` - The token's text
/// * `$line` - The line the token ends on
/// * `$col` - The column just after the token
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), 1, 3);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $data:expr, $line:expr, $col:expr) => {
        $crate::lexer::tokens::Token {
            kind: $kind,
            data: $data,
            line: $line,
            col: $col,
        }
    };
}
