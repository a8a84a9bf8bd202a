/*
 * Semantic analysis of the files of a program.  This includes:
 * 1. Symbol resolution: every identifier is bound to a declaration, either in
 *    its own file or in the exported symbols of a file that it imports.
 * 2. Type checking: the type of every expression is computed and checked
 *    against the operator, assignment, argument or return it is used in.
 * 3. Storage: every global is placed in the data segment and every local is
 *    placed on the stack of the memory tracker.
 */
mod error;
mod resolver;
mod symbol;
mod symbol_table;
mod symbol_type;
mod tests;
mod verifier;

pub mod type_rules;

use super::CompilerError;

pub use error::{InternalError, SemanticError};
pub use resolver::SymbolResolver;
pub use symbol::{Symbol, SymbolKind, TypedName};
pub use symbol_table::SymbolTable;
pub use symbol_type::{SymbolType, TypeHandle, TypeTable};
pub use type_rules::ExprType;
pub use verifier::{VerifiedFile, Verifier};

/// Captures the Failure state of any Semantic Analysis operation.
/// Which will, if it fails, result in a [`SemanticError`] wrapped
/// in a [`CompilerError`]
pub type SemanticResult<T> = Result<T, CompilerError<SemanticError>>;
