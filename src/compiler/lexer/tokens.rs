use crate::compiler::source::Position;

/// The primitive value types of the language.  Each primitive has a byte
/// size on the target and a size rank which is used when two primitives are
/// combined by an operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Primitive {
    U8,
    U16,
    U32,
    S8,
    S16,
    S32,
    String,
}

impl Primitive {
    /// Looks up the primitive named by a type keyword.
    pub fn from_keyword(word: &str) -> Option<Primitive> {
        match word {
            "u8" => Some(Primitive::U8),
            "u16" => Some(Primitive::U16),
            "u32" => Some(Primitive::U32),
            "s8" => Some(Primitive::S8),
            "s16" => Some(Primitive::S16),
            "s32" => Some(Primitive::S32),
            "string" => Some(Primitive::String),
            _ => None,
        }
    }

    /// The number of bytes a value of this type occupies in memory.  A
    /// `string` is stored as a 32-bit pointer to its characters.
    pub fn size(&self) -> usize {
        match self {
            Primitive::U8 | Primitive::S8 => 1,
            Primitive::U16 | Primitive::S16 => 2,
            Primitive::U32 | Primitive::S32 | Primitive::String => 4,
        }
    }

    /// Ordering used to find the larger of two primitives:
    /// `u8/s8 < u16/s16 < u32/s32/string`
    pub fn rank(&self) -> u8 {
        match self {
            Primitive::U8 | Primitive::S8 => 0,
            Primitive::U16 | Primitive::S16 => 1,
            Primitive::U32 | Primitive::S32 | Primitive::String => 2,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Primitive::S8 | Primitive::S16 | Primitive::S32)
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(self, Primitive::U8 | Primitive::U16 | Primitive::U32)
    }

    pub fn is_integer(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    /// Returns the unsigned primitive with the same width as this one.
    pub fn to_unsigned(&self) -> Primitive {
        match self {
            Primitive::S8 => Primitive::U8,
            Primitive::S16 => Primitive::U16,
            Primitive::S32 => Primitive::U32,
            p => *p,
        }
    }
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Primitive::U8 => f.write_str("u8"),
            Primitive::U16 => f.write_str("u16"),
            Primitive::U32 => f.write_str("u32"),
            Primitive::S8 => f.write_str("s8"),
            Primitive::S16 => f.write_str("s16"),
            Primitive::S32 => f.write_str("s32"),
            Primitive::String => f.write_str("string"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lex {
    Integer(i64),
    StringLiteral(String),
    Identifier(String),
    Primitive(Primitive),

    // Keywords
    Import,
    Export,
    FunctionDef,
    Var,
    Const,
    Type,
    If,
    Else,
    While,
    Return,

    // Operators
    Add,
    Minus,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    Not,
    ShiftLeft,
    ShiftRight,
    Eq,
    NEq,
    Ls,
    LsEq,
    Gr,
    GrEq,
    BAnd,
    BOr,
    Assign,
    MemberAccess,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semicolon,
    LArrow,
}

impl Lex {
    pub fn get_str(&self) -> Option<&str> {
        match self {
            Lex::StringLiteral(s) | Lex::Identifier(s) => Some(s),
            _ => None,
        }
    }

    /// Keywords recognized by the lexer.  Primitive type names are handled
    /// separately by [`Primitive::from_keyword`].
    pub fn from_keyword(word: &str) -> Option<Lex> {
        use Lex::*;
        Some(match word {
            "import" => Import,
            "export" => Export,
            "fn" => FunctionDef,
            "var" => Var,
            "const" => Const,
            "type" => Type,
            "if" => If,
            "else" => Else,
            "while" => While,
            "return" => Return,
            _ => return None,
        })
    }
}

impl std::fmt::Display for Lex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Lex::*;
        match self {
            Integer(i) => f.write_fmt(format_args!("integer literal {}", i)),
            StringLiteral(s) => f.write_fmt(format_args!("literal \"{}\"", s)),
            Identifier(id) => f.write_fmt(format_args!("identifier {}", id)),
            Primitive(p) => f.write_fmt(format_args!("{}", p)),
            Import => f.write_str("import"),
            Export => f.write_str("export"),
            FunctionDef => f.write_str("fn"),
            Var => f.write_str("var"),
            Const => f.write_str("const"),
            Type => f.write_str("type"),
            If => f.write_str("if"),
            Else => f.write_str("else"),
            While => f.write_str("while"),
            Return => f.write_str("return"),
            Add => f.write_str("+"),
            Minus => f.write_str("-"),
            Mul => f.write_str("*"),
            Div => f.write_str("/"),
            Mod => f.write_str("%"),
            BitAnd => f.write_str("&"),
            BitOr => f.write_str("|"),
            BitXor => f.write_str("^"),
            BitNot => f.write_str("~"),
            Not => f.write_str("!"),
            ShiftLeft => f.write_str("<<"),
            ShiftRight => f.write_str(">>"),
            Eq => f.write_str("=="),
            NEq => f.write_str("!="),
            Ls => f.write_str("<"),
            LsEq => f.write_str("<="),
            Gr => f.write_str(">"),
            GrEq => f.write_str(">="),
            BAnd => f.write_str("&&"),
            BOr => f.write_str("||"),
            Assign => f.write_str("="),
            MemberAccess => f.write_str("."),
            LParen => f.write_str("("),
            RParen => f.write_str(")"),
            LBrace => f.write_str("{"),
            RBrace => f.write_str("}"),
            LBracket => f.write_str("["),
            RBracket => f.write_str("]"),
            Comma => f.write_str(","),
            Colon => f.write_str(":"),
            Semicolon => f.write_str(";"),
            LArrow => f.write_str("->"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The value of the token
    pub sym: Lex,

    pub position: Position,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("L{}: {}", self.position, self.sym))
    }
}

impl Token {
    pub fn new(s: Lex, position: Position) -> Token {
        Token { sym: s, position }
    }

    /// Tests whether this token is of the same kind as `a`, ignoring any
    /// payload the two may carry.
    pub fn token_eq(&self, a: &Lex) -> bool {
        std::mem::discriminant(&self.sym) == std::mem::discriminant(a)
    }

    /// Returns the name carried by an identifier token.
    pub fn identifier(&self) -> Option<&str> {
        match &self.sym {
            Lex::Identifier(id) => Some(id),
            _ => None,
        }
    }
}
