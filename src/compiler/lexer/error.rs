use crate::compiler::source::SourceChar;

/// Errors which can be encountered while tokenizing a compilation unit
#[derive(Clone, PartialEq, Debug)]
pub enum LexerError {
    Locked(Option<SourceChar>),
    InvalidEscapeSequence(char),
    ExpectedEscapeCharacter,
    UnterminatedString,
    UnterminatedComment,
    InvalidInteger,
    IntegerOutOfRange(String),
}

impl std::fmt::Display for LexerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use LexerError::*;
        let msg = match self {
            Locked(None) => "Lexer locked on EOF".into(),
            Locked(Some(c)) => format!("Lexer locked on {}", c),
            InvalidEscapeSequence(c) => format!("Invalid escape sequence \\{}", c),
            ExpectedEscapeCharacter => "Expected an escape character after \\".into(),
            UnterminatedString => "String literal is missing its closing \"".into(),
            UnterminatedComment => "Block comment is missing its closing */".into(),
            InvalidInteger => "Invalid integer".into(),
            IntegerOutOfRange(text) => {
                format!("Integer literal {} does not fit in 32 bits", text)
            }
        };

        f.write_str(&msg)
    }
}
