use std::fmt::Display;

use super::source::Position;

/// Represents all errors that are generated from within the Compiler
/// module and its submodules.
///
/// This type captures common metadata which is necessarily present for
/// all errors which are caused by input source code.  E.g. the line and
/// column that the error occurs on. This also handles formatting all error
/// messages with the universal metadata along with the inner metadata.
///
/// The inner error allows metadata which is specific to a submodule within
/// the compiler. E.g., the errors themselves are submodule specific and
/// are stored in the `inner` field.
#[derive(Clone, Debug, PartialEq)]
pub struct CompilerError<IE> {
    position: Position,
    inner: IE,
}

impl<IE> CompilerError<IE> {
    pub fn new(position: Position, inner: IE) -> Self {
        CompilerError { position, inner }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.position.line()
    }

    pub fn column(&self) -> u32 {
        self.position.column()
    }

    pub fn inner(&self) -> &IE {
        &self.inner
    }

    pub fn into_inner(self) -> IE {
        self.inner
    }

    /// Converts the inner error into another error type while keeping the
    /// position of the original error.
    pub fn map<F, IE2>(self, f: F) -> CompilerError<IE2>
    where
        F: FnOnce(IE) -> IE2,
    {
        CompilerError::new(self.position, f(self.inner))
    }
}

impl<IE: Display> Display for CompilerError<IE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "L{}:{}: {}",
            self.position.line(),
            self.position.column(),
            self.inner
        ))
    }
}

impl<IE: Display + std::fmt::Debug> std::error::Error for CompilerError<IE> {}
