use crate::compiler::lexer::tokens::Token;

use super::{ConstantDecl, FunctionDef, TypeDef, VariableDecl};

/// `import "<file id>";`
#[derive(Clone, Debug, PartialEq)]
pub struct Import {
    pub token: Token,
    pub file: String,
}

/// A declaration at the top level of a file.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    Import(Import),
    Type(TypeDef),
    Function(FunctionDef),
    Variable(VariableDecl),
    Constant(ConstantDecl),
}

/// The parsed contents of a single source file.
#[derive(Clone, Debug, PartialEq)]
pub struct Module {
    file_id: String,
    items: Vec<Item>,
}

impl Module {
    pub fn new(file_id: &str, items: Vec<Item>) -> Module {
        Module {
            file_id: file_id.into(),
            items,
        }
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn imports(&self) -> impl Iterator<Item = &Import> {
        self.items.iter().filter_map(|i| match i {
            Item::Import(import) => Some(import),
            _ => None,
        })
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.items.iter().filter_map(|i| match i {
            Item::Type(t) => Some(t),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.items.iter().filter_map(|i| match i {
            Item::Function(f) => Some(f),
            _ => None,
        })
    }
}
