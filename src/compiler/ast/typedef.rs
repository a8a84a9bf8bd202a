use crate::compiler::lexer::tokens::Token;

use super::TypeRef;

/// A user defined type: `type Point { x: u8, y: u8 }`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDef {
    pub external: bool,
    pub name: Token,
    pub fields: Vec<TypeField>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeField {
    pub name: Token,
    pub ty: TypeRef,
}

impl TypeDef {
    pub fn id(&self) -> &str {
        self.name.identifier().unwrap_or_default()
    }
}
