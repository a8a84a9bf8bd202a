use std::collections::HashMap;

use log::{debug, warn};

use super::{
    symbol::{Symbol, SymbolKind, TypedName},
    symbol_table::SymbolTable,
    symbol_type::{SymbolType, TypeHandle, TypeTable},
};

/**
 Gives every identifier of every file a symbol definition.  There is one
 [`SymbolTable`] per file, and the resolver owns the [`TypeTable`] in which
 every symbol type of the compilation is interned.

 A name is looked up in three tiers, and the first match wins:
 1. the open scopes of the file, innermost first,
 2. the file level symbols of the file,
 3. the exported symbols of each file that the file imports.

 Using a file which has not been added with [`SymbolResolver::add_file`] is a
 misuse of the resolver: lookups find nothing and mutations are ignored.
*/
#[derive(Clone, Debug, Default)]
pub struct SymbolResolver {
    tables: HashMap<String, SymbolTable>,
    types: TypeTable,
}

impl SymbolResolver {
    pub fn new() -> SymbolResolver {
        SymbolResolver::default()
    }

    /// Registers a new symbol table for `file_id`.  Adding a file which is
    /// already registered does nothing.
    pub fn add_file(&mut self, file_id: &str) {
        if !self.tables.contains_key(file_id) {
            debug!("Resolver: add file {}", file_id);
            self.tables
                .insert(file_id.into(), SymbolTable::new(file_id));
        }
    }

    pub fn has_file(&self, file_id: &str) -> bool {
        self.tables.contains_key(file_id)
    }

    pub fn table(&self, file_id: &str) -> Option<&SymbolTable> {
        self.tables.get(file_id)
    }

    /// Records that `file_id` imports `imported_id` and may see its exported
    /// symbols.
    pub fn add_outer_scope(&mut self, file_id: &str, imported_id: &str) {
        match self.tables.get_mut(file_id) {
            Some(table) => {
                debug!("Resolver: {} imports {}", file_id, imported_id);
                table.add_outer_scope(imported_id)
            }
            None => warn!("Resolver: add outer scope to unknown file {}", file_id),
        }
    }

    /// Finds the symbol `id` as it is seen from `file_id` and returns a copy.
    pub fn find_symbol(&self, file_id: &str, id: &str) -> Option<Symbol> {
        self.lookup(file_id, id).cloned()
    }

    pub fn lookup(&self, file_id: &str, id: &str) -> Option<&Symbol> {
        let table = self.tables.get(file_id)?;
        table.get_local(id).or_else(|| {
            table
                .outer_scopes()
                .iter()
                .filter_map(|outer| self.tables.get(outer))
                .find_map(|outer| outer.get_external(id))
        })
    }

    /// Finds the symbol `id` as it is seen from `file_id` and returns a mutable
    /// reference into the table that owns it.
    pub fn get_symbol(&mut self, file_id: &str, id: &str) -> Option<&mut Symbol> {
        let table = self.tables.get(file_id)?;
        let owner = if table.get_local(id).is_some() {
            file_id.to_string()
        } else {
            table
                .outer_scopes()
                .iter()
                .find(|outer| {
                    self.tables
                        .get(outer.as_str())
                        .map_or(false, |t| t.get_external(id).is_some())
                })?
                .clone()
        };

        let table = self.tables.get_mut(&owner)?;
        if owner == file_id {
            table.get_local_mut(id)
        } else {
            table.get_external_mut(id)
        }
    }

    /// Adds a symbol to the innermost open scope of `file_id`, or to its file
    /// level symbols if no scope is open.
    pub fn add_symbol(&mut self, file_id: &str, symbol: Symbol) {
        match self.tables.get_mut(file_id) {
            Some(table) => table.add(symbol),
            None => warn!(
                "Resolver: add symbol {} to unknown file {}",
                symbol.id, file_id
            ),
        }
    }

    /// Appends a field to the user defined type `id`.  If `id` does not name a
    /// user defined type the field is dropped.
    pub fn add_field_to_symbol(&mut self, file_id: &str, id: &str, field: TypedName) {
        match self.get_symbol(file_id, id) {
            Some(Symbol {
                kind: SymbolKind::Udt { fields },
                ..
            }) => fields.push(field),
            Some(_) => debug!("Resolver: {} is not a type, field {} dropped", id, field.id),
            None => warn!("Resolver: add field {} to unknown symbol {}", field.id, id),
        }
    }

    pub fn open_scope(&mut self, file_id: &str) {
        match self.tables.get_mut(file_id) {
            Some(table) => table.open_scope(),
            None => warn!("Resolver: open scope in unknown file {}", file_id),
        }
    }

    pub fn close_scope(&mut self, file_id: &str) -> Vec<Symbol> {
        match self.tables.get_mut(file_id) {
            Some(table) => table.close_scope(),
            None => {
                warn!("Resolver: close scope in unknown file {}", file_id);
                vec![]
            }
        }
    }

    /// Finds a symbol declared directly in the innermost scope of `file_id`.
    pub fn find_in_current_scope(&self, file_id: &str, id: &str) -> Option<&Symbol> {
        self.tables.get(file_id)?.get_in_current_scope(id)
    }

    pub fn add_symbol_type(&mut self, ty: SymbolType) -> TypeHandle {
        self.types.add(ty)
    }

    pub fn to_symbol_type(&self, handle: TypeHandle) -> Option<&SymbolType> {
        self.types.get(handle)
    }

    pub fn type_id(&self, handle: TypeHandle) -> Option<String> {
        self.types.type_id(handle)
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }
}
