use crate::compiler::lexer::tokens::Lex;

/// Compiler errors that happen within the Parser stage of compilation.
#[derive(Clone, Debug, PartialEq)]
pub enum ParserError {
    ExpectedButFound(Vec<Lex>, Option<Lex>),
    ExpectedIdentifierAfter(Lex),
    ExpectedTypeAfter(Lex),
    ExpectedExpressionAfter(Lex),
    ExpectedArrayDimension,
    ExpectedImportPath,
    ExpectedDeclaration(Option<Lex>),
    ExportNotAllowed(Option<Lex>),
    InvalidAssignmentTarget,
}

impl std::fmt::Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ParserError::ExpectedButFound(expected, actual) => format!(
                "Expected {}, but found {}",
                lex_set_to_string(expected),
                lex_to_string(actual)
            ),
            ParserError::ExpectedIdentifierAfter(lex) => {
                format!("Expected identifier after {}", lex)
            }
            ParserError::ExpectedTypeAfter(lex) => format!("Expected type after {}", lex),
            ParserError::ExpectedExpressionAfter(lex) => {
                format!("Expected expression after {}", lex)
            }
            ParserError::ExpectedArrayDimension => {
                "Expected integer literal for array dimension".into()
            }
            ParserError::ExpectedImportPath => {
                "Expected file path string literal after import".into()
            }
            ParserError::ExpectedDeclaration(actual) => format!(
                "Expected import, type, fn, var or const declaration, but found {}",
                lex_to_string(actual)
            ),
            ParserError::ExportNotAllowed(actual) => format!(
                "export must be followed by a type, fn, var or const declaration, but found {}",
                lex_to_string(actual)
            ),
            ParserError::InvalidAssignmentTarget => {
                "Left side of an assignment must be a variable, field, or array element".into()
            }
        };

        f.write_str(&msg)
    }
}

fn lex_to_string(lex: &Option<Lex>) -> String {
    match lex {
        Some(lex) => lex.to_string(),
        None => "EOF".into(),
    }
}

fn lex_set_to_string(set: &[Lex]) -> String {
    let strs: Vec<String> = set.iter().map(|l| l.to_string()).collect();
    if strs.len() > 1 {
        format!("one of {}", strs.join(", "))
    } else {
        strs.join(", ")
    }
}
