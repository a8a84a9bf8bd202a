use crate::compiler::lexer::tokens::Token;

use super::{Block, TypeRef};

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: Token,
    pub ty: TypeRef,
}

/// `fn <name>(<parameters>) [-> <type>] { ... }`.  A function without a
/// return type does not produce a value.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub external: bool,
    pub name: Token,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeRef>,
    pub body: Block,
}

impl FunctionDef {
    pub fn id(&self) -> &str {
        self.name.identifier().unwrap_or_default()
    }
}
