/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Top-level forms
/// - expressions: The expression tree
/// - declarations: Prototypes and function definitions
pub mod ast;
pub mod declarations;
pub mod expressions;
