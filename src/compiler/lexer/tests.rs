#[cfg(test)]
mod tests {
    use crate::compiler::lexer::tokens::{Lex, Primitive, Token};
    use crate::compiler::lexer::LexerError;
    use crate::compiler::source::Position;
    use Lex::*;

    use super::super::lexer::*;

    fn lex(text: &str) -> Vec<Token> {
        Lexer::new(text)
            .tokenize()
            .into_iter()
            .collect::<Result<_, _>>()
            .expect("Expected valid tokens")
    }

    fn syms(text: &str) -> Vec<Lex> {
        lex(text).into_iter().map(|t| t.sym).collect()
    }

    #[test]
    fn test_integer() {
        let tokens = lex("5");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0], Token::new(Integer(5), Position::new(1, 1)));
    }

    #[test]
    fn test_hex_and_binary_integers() {
        assert_eq!(syms("0xff 0b101 0"), vec![Integer(255), Integer(5), Integer(0)]);
    }

    #[test]
    fn test_integer_limits() {
        assert_eq!(syms("4294967295"), vec![Integer(4294967295)]);

        let tokens = Lexer::new("4294967296").tokenize();
        assert_eq!(
            tokens[0].clone().unwrap_err().inner(),
            &LexerError::IntegerOutOfRange("4294967296".into())
        );
    }

    #[test]
    fn test_invalid_integer() {
        for text in &["12ab", "0x", "0b12"] {
            let tokens = Lexer::new(text).tokenize();
            assert_eq!(tokens.len(), 1, "{}", text);
            assert_eq!(
                tokens[0].clone().unwrap_err().inner(),
                &LexerError::InvalidInteger,
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_identifier() {
        for text in &["x", "_x", "x_5", "counter"] {
            let tokens = lex(text);
            assert_eq!(tokens.len(), 1);
            assert_eq!(tokens[0].sym, Identifier(text.to_string()));
        }
    }

    #[test]
    fn test_keywords_and_primitives() {
        assert_eq!(
            syms("import export fn var const type if else while return"),
            vec![Import, Export, FunctionDef, Var, Const, Type, If, Else, While, Return]
        );
        assert_eq!(
            syms("u8 u16 u32 s8 s16 s32 string"),
            vec![
                Lex::Primitive(Primitive::U8),
                Lex::Primitive(Primitive::U16),
                Lex::Primitive(Primitive::U32),
                Lex::Primitive(Primitive::S8),
                Lex::Primitive(Primitive::S16),
                Lex::Primitive(Primitive::S32),
                Lex::Primitive(Primitive::String),
            ]
        );

        // a keyword prefix does not split an identifier
        assert_eq!(syms("iffy u8x"), vec![Identifier("iffy".into()), Identifier("u8x".into())]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            syms("+ - * / % & | ^ ~ ! << >> == != < <= > >= && || = ."),
            vec![
                Add, Minus, Mul, Div, Mod, BitAnd, BitOr, BitXor, BitNot, Not, ShiftLeft,
                ShiftRight, Eq, NEq, Ls, LsEq, Gr, GrEq, BAnd, BOr, Assign, MemberAccess
            ]
        );
        assert_eq!(
            syms("( ) { } [ ] , : ; ->"),
            vec![LParen, RParen, LBrace, RBrace, LBracket, RBracket, Comma, Colon, Semicolon, LArrow]
        );
    }

    #[test]
    fn test_operators_without_whitespace() {
        assert_eq!(
            syms("a<<=b->c"),
            vec![
                Identifier("a".into()),
                ShiftLeft,
                Assign,
                Identifier("b".into()),
                LArrow,
                Identifier("c".into())
            ]
        );
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(syms("\"hello\""), vec![StringLiteral("hello".into())]);
        assert_eq!(
            syms(r#""a\n\t\"\\\0""#),
            vec![StringLiteral("a\n\t\"\\\0".into())]
        );
    }

    #[test]
    fn test_string_errors() {
        let tokens = Lexer::new("\"abc").tokenize();
        assert_eq!(
            tokens[0].clone().unwrap_err().inner(),
            &LexerError::UnterminatedString
        );

        let tokens = Lexer::new(r#""a\qb""#).tokenize();
        let err = tokens[0].clone().unwrap_err();
        assert_eq!(err.inner(), &LexerError::InvalidEscapeSequence('q'));
        assert_eq!(err.position(), Position::new(1, 4));
    }

    #[test]
    fn test_comments() {
        let text = "x // comment\n/* block\n comment */ y";
        let tokens = lex(text);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], Token::new(Identifier("x".into()), Position::new(1, 1)));
        assert_eq!(tokens[1], Token::new(Identifier("y".into()), Position::new(3, 13)));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let tokens = Lexer::new("x /* never closed").tokenize();
        assert_eq!(tokens.len(), 2);
        let err = tokens[1].clone().unwrap_err();
        assert_eq!(err.inner(), &LexerError::UnterminatedComment);
        assert_eq!(err.position(), Position::new(1, 3));
    }

    #[test]
    fn test_locked() {
        let tokens = Lexer::new("x @").tokenize();
        assert_eq!(tokens.len(), 2);
        let err = tokens[1].clone().unwrap_err();
        assert!(matches!(err.inner(), LexerError::Locked(Some(c)) if c.char() == '@'));
        assert_eq!(err.position(), Position::new(1, 3));
    }

    #[test]
    fn test_positions() {
        let tokens = lex("var x: u8 = 5;\n  x = 6;");
        let positions: Vec<_> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(
            positions,
            vec![
                Position::new(1, 1),
                Position::new(1, 5),
                Position::new(1, 6),
                Position::new(1, 8),
                Position::new(1, 11),
                Position::new(1, 13),
                Position::new(1, 14),
                Position::new(2, 3),
                Position::new(2, 5),
                Position::new(2, 7),
                Position::new(2, 8),
            ]
        );
    }
}
