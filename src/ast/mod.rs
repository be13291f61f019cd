/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - expressions: the expression tree shared by type and value syntax
/// - statements: procedure statements and top-level/local definitions
pub mod expressions;
pub mod statements;
