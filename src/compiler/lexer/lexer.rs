// Token - a type which captures the different types of tokens and which is output
// by tokenize
use log::trace;

use crate::compiler::source::{Position, Source, SourceChar};

use super::LexerResult;
use super::{
    tokens::{Lex, Primitive, Token},
    LexerError,
};
use Lex::*;

/// The largest value an integer literal may hold on the target.
const MAX_INTEGER: u64 = u32::MAX as u64;

struct LexerBranch<'a> {
    lexer: &'a mut Lexer,
    index: usize,
}

impl<'a> LexerBranch<'a> {
    fn from(l: &'a mut Lexer) -> LexerBranch<'a> {
        LexerBranch {
            index: l.index,
            lexer: l,
        }
    }

    /// Merges this branch back into it's source Lexer.  Merging as the affect
    /// of accepting the current branch as correct and updating the source lexer
    /// to the match the cursor state of the branch.
    fn merge(mut self) -> Option<(String, Position)> {
        self.cut().map(|cut| {
            self.lexer.index = self.index;
            cut
        })
    }

    /// Cuts a string from the current branch from the last
    /// branch or cut point up to where the cursor currently is.
    /// This will NOT update the source.  That must be done with `merge`.
    fn cut(&mut self) -> Option<(String, Position)> {
        let start = self.lexer.index;
        let stop = self.index;

        if start >= stop {
            None
        } else {
            let s: String = (start..stop).map(|i| self.lexer.chars[i].char()).collect();
            Some((s, self.lexer.chars[start].position()))
        }
    }

    /// Advances the cursor one character and returns the character that was
    /// pointed to by the cursor before the advance.  Returns None if the cursor
    /// was already at the end of the stream.
    fn next(&mut self) -> Option<SourceChar> {
        if self.index < self.lexer.chars.len() {
            let c = self.lexer.chars[self.index];
            self.index += 1;
            Some(c)
        } else {
            None
        }
    }

    /// Advances the cursor one character, if the next character matches the given
    /// test character.
    fn next_if(&mut self, t: char) -> bool {
        if self.peek_if(t) {
            self.next().is_some()
        } else {
            false
        }
    }

    /// Will advance the cursor if the stream after the cursor starts with the
    /// given test string.  If the remaining stream does not start with the
    /// test string then the cursor is not advanced.
    fn next_if_word(&mut self, t: &str) -> bool {
        if self.peek_ifn(t) {
            self.index += t.chars().count();
            true
        } else {
            false
        }
    }

    /// Returns the character pointed at by the cursor which is the next
    /// character in the stream.
    fn peek(&self) -> Option<SourceChar> {
        if self.index < self.lexer.chars.len() {
            Some(self.lexer.chars[self.index])
        } else {
            None
        }
    }

    fn peek_if(&self, t: char) -> bool {
        self.peek().map_or(false, |c| c == t)
    }

    /// Checks if the character stream from the current cursor starts with
    /// the given test string, without advancing the cursor.
    fn peek_ifn(&self, t: &str) -> bool {
        let len = t.chars().count();
        if self.index + len > self.lexer.chars.len() {
            return false;
        }

        t.chars()
            .enumerate()
            .all(|(i, tc)| self.lexer.chars[self.index + i] == tc)
    }
}

pub struct Lexer {
    chars: Source,
    index: usize,
}

impl Lexer {
    pub fn new(text: &str) -> Lexer {
        Lexer {
            chars: Source::new(text),
            index: 0,
        }
    }

    /// Converts the source text into a vector of tokens.  Tokenizing stops at
    /// the first error, which is the final element of the returned vector.
    pub fn tokenize(&mut self) -> Vec<LexerResult<Token>> {
        let mut tokens = vec![];

        while self.index < self.chars.len() {
            // Consume any whitespace before attempting to parse the next token
            self.consume_whitespace();
            if self.index >= self.chars.len() {
                break;
            }

            // Record the current index position, so that we can see if the lexer
            // has advanced
            let prev_index = self.index;

            match self.consume_comment() {
                Ok(true) => continue,
                Ok(false) => (),
                Err(e) => {
                    tokens.push(Err(e));
                    break;
                }
            }

            match self.next_token() {
                Ok(Some(t)) => {
                    trace!("lexer: {}", t);
                    tokens.push(Ok(t))
                }
                Ok(None) => (),
                Err(e) => {
                    tokens.push(Err(e));
                    break;
                }
            }

            // Can no longer consume the input text
            if prev_index == self.index {
                tokens.push(err!(
                    self.current_position(),
                    LexerError::Locked(self.current_char())
                ));
                break;
            }
        }

        tokens
    }

    /// Attempt to parse the token which immediately follows from where the lexer
    /// cursor is currently pointing.
    fn next_token(&mut self) -> LexerResult<Option<Token>> {
        if let Some(t) = self.consume_integer()? {
            return Ok(Some(t));
        }
        if let Some(t) = self.consume_string_literal()? {
            return Ok(Some(t));
        }
        if let Some(t) = self.consume_word() {
            return Ok(Some(t));
        }
        Ok(self.consume_operator())
    }

    fn consume_whitespace(&mut self) {
        while self.index < self.chars.len() && self.chars[self.index].is_whitespace() {
            self.index += 1;
        }
    }

    /// Skips a line or block comment.  Returns true if a comment was consumed.
    fn consume_comment(&mut self) -> LexerResult<bool> {
        let start = self.current_position();
        let mut branch = LexerBranch::from(self);
        if branch.next_if_word("//") {
            while let Some(c) = branch.next() {
                if c == '\n' {
                    break;
                }
            }
            branch.merge();
            Ok(true)
        } else if branch.next_if_word("/*") {
            loop {
                if branch.next_if_word("*/") {
                    break;
                }
                if branch.next().is_none() {
                    return err!(start, LexerError::UnterminatedComment);
                }
            }
            branch.merge();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn consume_string_literal(&mut self) -> LexerResult<Option<Token>> {
        let start = self.current_position();
        let mut branch = LexerBranch::from(self);
        if !branch.next_if('"') {
            return Ok(None);
        }

        let mut value = String::new();
        loop {
            match branch.next() {
                None => return err!(start, LexerError::UnterminatedString),
                Some(c) if c == '"' => break,
                Some(c) if c == '\\' => match branch.next() {
                    Some(code) => match Self::escape_code(code.char()) {
                        Some(escaped) => value.push(escaped),
                        None => {
                            return err!(
                                code.position(),
                                LexerError::InvalidEscapeSequence(code.char())
                            )
                        }
                    },
                    None => return err!(c.position(), LexerError::ExpectedEscapeCharacter),
                },
                Some(c) => value.push(c.char()),
            }
        }

        branch.merge();
        Ok(Some(Token::new(Lex::StringLiteral(value), start)))
    }

    fn consume_integer(&mut self) -> LexerResult<Option<Token>> {
        let start = self.current_position();
        let mut branch = LexerBranch::from(self);

        if !branch.peek().map_or(false, |c| c.char().is_ascii_digit()) {
            return Ok(None);
        }

        let radix = if branch.next_if_word("0x") {
            16
        } else if branch.next_if_word("0b") {
            2
        } else {
            10
        };

        // read until a delimiter is hit so that `12ab` is reported as a bad integer
        // rather than an integer followed by an identifier
        while branch
            .peek()
            .map_or(false, |c| c.is_alphanumeric() || c == '_')
        {
            branch.next();
        }

        let (text, _) = match branch.merge() {
            Some(cut) => cut,
            None => return Ok(None),
        };

        let digits = match radix {
            16 | 2 => &text[2..],
            _ => &text[..],
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return err!(start, LexerError::InvalidInteger);
        }

        match u64::from_str_radix(digits, radix) {
            Ok(value) if value <= MAX_INTEGER => {
                Ok(Some(Token::new(Integer(value as i64), start)))
            }
            _ => err!(start, LexerError::IntegerOutOfRange(text)),
        }
    }

    /// Consumes an identifier, keyword, or primitive type name.
    fn consume_word(&mut self) -> Option<Token> {
        let mut branch = LexerBranch::from(self);
        if !branch.peek().map_or(false, |c| c.is_alphabetic() || c == '_') {
            return None;
        }

        while branch
            .peek()
            .map_or(false, |c| c.is_alphanumeric() || c == '_')
        {
            branch.next();
        }

        branch.merge().map(|(word, position)| {
            let sym = match Primitive::from_keyword(&word) {
                Some(p) => Lex::Primitive(p),
                None => match Lex::from_keyword(&word) {
                    Some(keyword) => keyword,
                    None => Identifier(word),
                },
            };
            Token::new(sym, position)
        })
    }

    fn consume_operator(&mut self) -> Option<Token> {
        let mut branch = LexerBranch::from(self);

        // Longer operators must be tested first so that `<<` is not read as two `<`
        let operators = [
            ("->", LArrow),
            ("&&", BAnd),
            ("||", BOr),
            ("<<", ShiftLeft),
            (">>", ShiftRight),
            ("!=", NEq),
            ("==", Eq),
            (">=", GrEq),
            ("<=", LsEq),
            ("(", LParen),
            (")", RParen),
            ("{", LBrace),
            ("}", RBrace),
            ("[", LBracket),
            ("]", RBracket),
            ("*", Mul),
            ("/", Div),
            ("%", Mod),
            ("+", Add),
            ("-", Minus),
            ("&", BitAnd),
            ("|", BitOr),
            ("^", BitXor),
            ("~", BitNot),
            ("!", Not),
            ("=", Assign),
            (";", Semicolon),
            (":", Colon),
            (",", Comma),
            (".", MemberAccess),
            (">", Gr),
            ("<", Ls),
        ];

        let sym = operators
            .iter()
            .find(|(op, _)| branch.next_if_word(op))
            .map(|(_, sym)| sym.clone())?;

        branch
            .merge()
            .map(|(_, position)| Token::new(sym, position))
    }

    fn escape_code(c: char) -> Option<char> {
        match c {
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            '0' => Some('\0'),
            '"' => Some('"'),
            '\\' => Some('\\'),
            _ => None,
        }
    }

    /// Returns the character that the lexer cursor is currently pointing to.
    fn current_char(&self) -> Option<SourceChar> {
        if self.index < self.chars.len() {
            Some(self.chars[self.index])
        } else {
            None
        }
    }

    /// Position of the character under the cursor, or the end of the source
    /// if the cursor is past the last character.
    fn current_position(&self) -> Position {
        self.current_char()
            .map(|c| c.position())
            .unwrap_or_else(|| self.chars.end())
    }
}
