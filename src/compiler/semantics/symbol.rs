use crate::compiler::source::Position;

use super::symbol_type::TypeHandle;

/// A name along with its type: the argument of a function or the field of a
/// user defined type.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedName {
    pub id: String,
    pub ty: TypeHandle,
}

impl TypedName {
    pub fn new(id: &str, ty: TypeHandle) -> TypedName {
        TypedName { id: id.into(), ty }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SymbolKind {
    Variable {
        ty: TypeHandle,
    },
    Constant {
        ty: TypeHandle,
    },
    Function {
        arguments: Vec<TypedName>,
        return_type: Option<TypeHandle>,
    },
    Udt {
        fields: Vec<TypedName>,
    },
}

/// A declared name.  Symbols marked `external` at the top level of a file
/// are visible to the files which import that file.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub id: String,
    pub kind: SymbolKind,
    pub external: bool,
    pub position: Position,
}

impl Symbol {
    pub fn variable(id: &str, ty: TypeHandle, position: Position) -> Symbol {
        Symbol::new(id, SymbolKind::Variable { ty }, position)
    }

    pub fn constant(id: &str, ty: TypeHandle, position: Position) -> Symbol {
        Symbol::new(id, SymbolKind::Constant { ty }, position)
    }

    pub fn function(
        id: &str,
        arguments: Vec<TypedName>,
        return_type: Option<TypeHandle>,
        position: Position,
    ) -> Symbol {
        Symbol::new(
            id,
            SymbolKind::Function {
                arguments,
                return_type,
            },
            position,
        )
    }

    /// A user defined type with no fields.  Fields are added afterwards with
    /// [`SymbolResolver::add_field_to_symbol`](super::SymbolResolver::add_field_to_symbol).
    pub fn udt(id: &str, position: Position) -> Symbol {
        Symbol::new(id, SymbolKind::Udt { fields: vec![] }, position)
    }

    fn new(id: &str, kind: SymbolKind, position: Position) -> Symbol {
        Symbol {
            id: id.into(),
            kind,
            external: false,
            position,
        }
    }

    pub fn export(mut self, external: bool) -> Symbol {
        self.external = external;
        self
    }

    pub fn is_udt(&self) -> bool {
        matches!(self.kind, SymbolKind::Udt { .. })
    }

    pub fn is_value(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Variable { .. } | SymbolKind::Constant { .. }
        )
    }

    /// The type of a variable or constant.
    pub fn value_type(&self) -> Option<TypeHandle> {
        match self.kind {
            SymbolKind::Variable { ty } | SymbolKind::Constant { ty } => Some(ty),
            _ => None,
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            SymbolKind::Variable { .. } => "var",
            SymbolKind::Constant { .. } => "const",
            SymbolKind::Function { .. } => "fn",
            SymbolKind::Udt { .. } => "type",
        };
        if self.external {
            f.write_str("export ")?;
        }
        f.write_fmt(format_args!("{} {} (L{})", kind, self.id, self.position))
    }
}
