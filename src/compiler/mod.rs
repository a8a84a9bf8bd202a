//! The front half of the Sprig compiler.
//!
//! Source text is tokenized by the [`lexer`], parsed into an AST by the
//! [`parser`] and then verified by [`semantics`], which resolves every symbol
//! across files and assigns every variable a location in the [`memory`]
//! layout.  The [`project`] ties these stages together for a set of files
//! connected by imports.

/// Creates an `Err` holding a [`CompilerError`] at the given position.
macro_rules! err {
    ($pos: expr, $inner: expr) => {
        Err($crate::compiler::CompilerError::new($pos, $inner))
    };
}

mod error;

pub mod ast;
pub mod lexer;
pub mod memory;
pub mod parser;
pub mod project;
pub mod semantics;
pub mod source;

pub use error::CompilerError;
pub use lexer::Lexer;
pub use project::{Project, ProjectError, SourceLoader, StringLoader};
pub use source::{Position, Source};
