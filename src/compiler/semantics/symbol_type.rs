use serde::Serialize;

use crate::compiler::lexer::tokens::Primitive;

use super::type_rules::UNDEFINED_TYPE_ID;

/// A reference to a type stored in a [`TypeTable`].  Two handles from the
/// same table are equal exactly when they refer to the same type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeHandle(usize);

impl TypeHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The type of a symbol.  Arrays refer to their element type through a
/// handle so that types never have to be nested.
#[derive(Clone, Debug, PartialEq)]
pub enum SymbolType {
    Native(Primitive),
    Function { id: String },
    Udt { id: String },
    Array {
        base: TypeHandle,
        dimensions: Vec<usize>,
    },
}

/**
Interns every [`SymbolType`] used during a compilation.  Adding a type which is
equal to one that was added before returns the handle of the earlier type.

Types are compared by their tag and their type id: `u8`, the name of a
function or user defined type, or the element type id followed by the
dimensions for an array, e.g. `u8[4][2]`.
 */
#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    types: Vec<SymbolType>,
}

impl TypeTable {
    pub fn new() -> TypeTable {
        TypeTable::default()
    }

    pub fn add(&mut self, ty: SymbolType) -> TypeHandle {
        let id = self.id_of(&ty);
        let tag = std::mem::discriminant(&ty);

        let existing = self
            .types
            .iter()
            .position(|t| std::mem::discriminant(t) == tag && self.id_of(t) == id);

        match existing {
            Some(idx) => TypeHandle(idx),
            None => {
                self.types.push(ty);
                TypeHandle(self.types.len() - 1)
            }
        }
    }

    pub fn get(&self, handle: TypeHandle) -> Option<&SymbolType> {
        self.types.get(handle.0)
    }

    /// The type id of the type referred to by `handle`.
    pub fn type_id(&self, handle: TypeHandle) -> Option<String> {
        self.get(handle).map(|ty| self.id_of(ty))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn id_of(&self, ty: &SymbolType) -> String {
        match ty {
            SymbolType::Native(p) => p.to_string(),
            SymbolType::Function { id } | SymbolType::Udt { id } => id.clone(),
            SymbolType::Array { base, dimensions } => {
                let mut id = self
                    .type_id(*base)
                    .unwrap_or_else(|| UNDEFINED_TYPE_ID.into());
                for d in dimensions {
                    id.push_str(&format!("[{}]", d));
                }
                id
            }
        }
    }
}
