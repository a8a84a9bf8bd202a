use super::ParserError;
use crate::compiler::ast::NodeId;
use crate::compiler::lexer::tokens::{Lex, Token};
use crate::compiler::{source::Position, CompilerError};

/// A cursor over the tokens of one file.  The parser only moves through the
/// tokens with the methods of this type.  The stream also hands out the ids
/// of the expression nodes built from its tokens.
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    index: usize,
    end: Position,
    next_id: NodeId,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Token]) -> TokenStream<'a> {
        let end = tokens
            .last()
            .map_or_else(Position::default, |t| t.position);
        TokenStream {
            tokens,
            index: 0,
            end,
            next_id: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, i: usize) {
        self.index = i;
    }

    /// Returns a new id for an expression node.
    pub fn next_node_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The position of the token under the cursor, or the last token if
    /// the stream is exhausted.
    pub fn position(&self) -> Position {
        self.peek().map_or(self.end, |t| t.position)
    }

    pub fn next(&mut self) -> Option<Token> {
        if self.index >= self.tokens.len() {
            None
        } else {
            self.index += 1;
            Some(self.tokens[self.index - 1].clone())
        }
    }

    pub fn next_if(&mut self, test: &Lex) -> Option<Token> {
        if self.test_if(test) {
            self.next()
        } else {
            None
        }
    }

    /// Advances past the next token if it is an identifier.
    pub fn next_if_id(&mut self) -> Option<Token> {
        self.next_if(&Lex::Identifier(String::new()))
    }

    /// Advances past the next token if it is of the same kind as `test`,
    /// otherwise returns an error describing what was found instead.
    pub fn next_must_be(&mut self, test: &Lex) -> Result<Token, CompilerError<ParserError>> {
        match self.next_if(test) {
            Some(t) => Ok(t),
            None => Err(self.expected(&[test.clone()])),
        }
    }

    pub fn next_if_one_of(&mut self, set: &[Lex]) -> Option<Token> {
        if self.test_if_one_of(set) {
            self.next()
        } else {
            None
        }
    }

    /// Builds the error for when the next token is not any of `expected`.
    pub fn expected(&self, expected: &[Lex]) -> CompilerError<ParserError> {
        CompilerError::new(
            self.position(),
            ParserError::ExpectedButFound(expected.to_vec(), self.peek().map(|t| t.sym.clone())),
        )
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub fn peek_at(&self, i: usize) -> Option<&Token> {
        self.tokens.get(self.index + i)
    }

    pub fn test_if(&self, test: &Lex) -> bool {
        match self.peek() {
            None => false,
            Some(t) => t.token_eq(test),
        }
    }

    pub fn test_ifn(&self, test: &[Lex]) -> bool {
        test.iter()
            .enumerate()
            .all(|(i, lex)| self.peek_at(i).map_or(false, |t| t.token_eq(lex)))
    }

    pub fn test_if_one_of(&self, set: &[Lex]) -> bool {
        match self.peek() {
            None => false,
            Some(t) => set.iter().any(|l| t.token_eq(l)),
        }
    }
}

#[cfg(test)]
mod test_tokenstream {
    use super::TokenStream;
    use crate::compiler::lexer::tokens::{Lex, Token};
    use crate::compiler::parser::ParserError;
    use crate::compiler::source::Position;
    use crate::compiler::Lexer;

    fn tokenize(text: &str) -> Vec<Token> {
        Lexer::new(text)
            .tokenize()
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_peek() {
        let tokens = tokenize("(2 + 4) * 3");
        let ts = TokenStream::new(&tokens);
        let p = ts.peek().unwrap();
        assert_eq!(*p, Token::new(Lex::LParen, Position::new(1, 1)));
        assert_eq!(ts.peek_at(1).unwrap().sym, Lex::Integer(2));
    }

    #[test]
    fn test_next() {
        let tokens = tokenize("(2 + 4) * 3");
        let mut ts = TokenStream::new(&tokens);
        assert_eq!(ts.next().unwrap().sym, Lex::LParen);
        assert_eq!(ts.next().unwrap().sym, Lex::Integer(2));
        assert_eq!(ts.index(), 2);
        ts.set_index(7);
        assert_eq!(ts.next(), None);
    }

    #[test]
    fn test_next_if() {
        let tokens = tokenize("x + 4");
        let mut ts = TokenStream::new(&tokens);
        assert_eq!(ts.next_if(&Lex::Add), None);
        assert!(ts.next_if_id().is_some());
        assert_eq!(ts.next_if(&Lex::Add).unwrap().sym, Lex::Add);
        assert!(ts.test_if_one_of(&[Lex::Add, Lex::Integer(0)]));
    }

    #[test]
    fn test_ifn() {
        let tokens = tokenize("foo(1)");
        let ts = TokenStream::new(&tokens);
        assert!(ts.test_ifn(&[Lex::Identifier(String::new()), Lex::LParen]));
        assert!(!ts.test_ifn(&[Lex::Identifier(String::new()), Lex::LBracket]));
        assert!(!ts.test_ifn(&[
            Lex::Identifier(String::new()),
            Lex::LParen,
            Lex::Integer(0),
            Lex::RParen,
            Lex::Semicolon
        ]));
    }

    #[test]
    fn test_next_must_be_rejects_other_tokens() {
        let tokens = tokenize("x ;");
        let mut ts = TokenStream::new(&tokens);
        let err = ts.next_must_be(&Lex::Semicolon).unwrap_err();
        assert_eq!(
            err.inner(),
            &ParserError::ExpectedButFound(
                vec![Lex::Semicolon],
                Some(Lex::Identifier("x".into()))
            )
        );
        assert_eq!(err.position(), Position::new(1, 1));

        // the cursor did not move
        assert!(ts.next_if_id().is_some());
        assert!(ts.next_must_be(&Lex::Semicolon).is_ok());

        let err = ts.next_must_be(&Lex::RBrace).unwrap_err();
        assert_eq!(
            err.inner(),
            &ParserError::ExpectedButFound(vec![Lex::RBrace], None)
        );
    }

    #[test]
    fn test_node_ids_increase() {
        let tokens: Vec<Token> = vec![];
        let mut ts = TokenStream::new(&tokens);
        assert_eq!(ts.next_node_id(), 0);
        assert_eq!(ts.next_node_id(), 1);
    }
}
