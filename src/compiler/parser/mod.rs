//! Recursive descent parser which converts the token stream of a single file
//! into a [`Module`](crate::compiler::ast::Module).

use super::CompilerError;

/// Logs the name of the parsing function being entered along with the token
/// under the cursor.
macro_rules! trace {
    ($ts:expr) => {
        log::trace!(
            "{} <- {}",
            stdext::function_name!(),
            $ts.peek()
                .map_or_else(|| "EOF".to_string(), |token| token.to_string())
        )
    };
}

mod error;
mod expression;
mod parser;
mod statement;
mod tests;
mod tokenstream;

pub use error::ParserError;
pub use parser::parse;
pub use tokenstream::TokenStream;

/// `Ok(None)` means the parsing function did not match the tokens under the
/// cursor and consumed nothing.
pub type ParserResult<T> = Result<Option<T>, CompilerError<ParserError>>;
