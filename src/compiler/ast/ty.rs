use crate::compiler::{
    lexer::tokens::{Lex, Primitive, Token},
    source::Position,
};

/**
A type annotation as written in the source code: the name of a primitive or
of a user defined type followed by zero or more array dimensions.  `u8[4][2]`
has the base name `u8` and the dimensions `[4, 2]`.

Dimensions are kept exactly as written, so an invalid dimension such as `0`
is reported by semantic analysis rather than the parser.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct TypeRef {
    pub name: Token,
    pub dimensions: Vec<(i64, Position)>,
}

impl TypeRef {
    pub fn new(name: Token, dimensions: Vec<(i64, Position)>) -> TypeRef {
        TypeRef { name, dimensions }
    }

    pub fn position(&self) -> Position {
        self.name.position
    }

    /// The primitive named by this annotation, if it names one.
    pub fn primitive(&self) -> Option<Primitive> {
        match self.name.sym {
            Lex::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// The name of the base type without any array dimensions.
    pub fn base_name(&self) -> String {
        match &self.name.sym {
            Lex::Primitive(p) => p.to_string(),
            Lex::Identifier(id) => id.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_array(&self) -> bool {
        !self.dimensions.is_empty()
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base_name())?;
        for (d, _) in &self.dimensions {
            f.write_fmt(format_args!("[{}]", d))?;
        }
        Ok(())
    }
}
