use log::debug;

use super::symbol::Symbol;

/**
 The symbols declared by one file.  Symbols declared at the top level of the
 file are kept for the entire compilation, because files which are compiled
 later may import them.  Symbols declared within a lexical scope of the file
 are kept only while that scope is open:

``` ignore
 export fn area(w: u8, h: u8) -> u16 {
     var a: u16 = w * h;
     return a;
 }
```

 `area` is a file level symbol of this table, while `w`, `h` and `a` belong to
 the scope opened for the body of `area` and are discarded when it closes.

 `outer_scopes` lists the files which this file imports.  Only symbols
 which those files export are visible through them.
*/
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    file_id: String,
    outer_scopes: Vec<String>,
    scopes: Vec<Vec<Symbol>>,
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new(file_id: &str) -> SymbolTable {
        SymbolTable {
            file_id: file_id.into(),
            ..Default::default()
        }
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn outer_scopes(&self) -> &[String] {
        &self.outer_scopes
    }

    pub fn add_outer_scope(&mut self, file_id: &str) {
        if !self.outer_scopes.iter().any(|f| f == file_id) {
            self.outer_scopes.push(file_id.into());
        }
    }

    /// Adds a symbol to the innermost open scope, or to the file level symbols
    /// if no scope is open.
    pub fn add(&mut self, symbol: Symbol) {
        debug!("{}: add symbol {}", self.file_id, symbol);
        match self.scopes.last_mut() {
            Some(scope) => scope.push(symbol),
            None => self.symbols.push(symbol),
        }
    }

    pub fn open_scope(&mut self) {
        self.scopes.push(vec![]);
    }

    /// Closes the innermost scope and returns the symbols that were declared
    /// within it.
    pub fn close_scope(&mut self) -> Vec<Symbol> {
        self.scopes.pop().unwrap_or_default()
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Finds a symbol declared by this file, searching the open scopes from
    /// the innermost outwards and then the file level symbols.
    pub fn get_local(&self, id: &str) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .chain(self.symbols.iter())
            .find(|s| s.id == id)
    }

    pub fn get_local_mut(&mut self, id: &str) -> Option<&mut Symbol> {
        self.scopes
            .iter_mut()
            .rev()
            .flat_map(|scope| scope.iter_mut().rev())
            .chain(self.symbols.iter_mut())
            .find(|s| s.id == id)
    }

    /// Finds a file level symbol which this file exports.
    pub fn get_external(&self, id: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.external && s.id == id)
    }

    pub fn get_external_mut(&mut self, id: &str) -> Option<&mut Symbol> {
        self.symbols.iter_mut().find(|s| s.external && s.id == id)
    }

    /// Finds a symbol declared directly in the innermost open scope, or in the
    /// file level symbols if no scope is open.
    pub fn get_in_current_scope(&self, id: &str) -> Option<&Symbol> {
        self.scopes
            .last()
            .unwrap_or(&self.symbols)
            .iter()
            .find(|s| s.id == id)
    }

    /// The file level symbols of this file.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}

impl std::fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}:\n", self.file_id))?;
        for s in &self.symbols {
            f.write_fmt(format_args!("\t{}\n", s))?;
        }
        for (depth, scope) in self.scopes.iter().enumerate() {
            for s in scope {
                f.write_fmt(format_args!("\t{}{}\n", "\t".repeat(depth + 1), s))?;
            }
        }
        Ok(())
    }
}
