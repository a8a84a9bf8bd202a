use super::CompilerError;

mod error;
mod lexer;
mod tests;

pub mod tokens;

pub use error::LexerError;
pub use lexer::Lexer;

pub type LexerResult<T> = Result<T, CompilerError<LexerError>>;
