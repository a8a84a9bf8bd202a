use log::{debug, warn};

use super::{
    GlobalMemoryElement, MemoryElement, MemoryQuery, Scope, StackMemoryElement, UdtField,
    UserDefinedType,
};

/**
 Models where every value of the program lives.  Globals are inserted into
 the data segment, which only grows.  Locals are pushed onto the stack within
 scopes and are removed when the scope that they were declared in is closed.

 Offsets into the data segment are measured from its start.  Offsets into the
 stack are measured from the top of the stack: the most recently pushed element
 has offset 0.

 User defined types that are declared within a scope are active until that
 scope is closed.
*/
#[derive(Clone, Debug, Default)]
pub struct MemoryTracker {
    data_segment: Vec<MemoryElement>,
    stack: Vec<MemoryElement>,
    scopes: Vec<Scope>,
    udts: Vec<UserDefinedType>,
}

impl MemoryTracker {
    pub fn new() -> MemoryTracker {
        MemoryTracker::default()
    }

    /// Appends a global to the data segment and returns its offset.  Globals
    /// live for the entire program and are never removed.
    pub fn insert(&mut self, element: MemoryElement) -> usize {
        let offset = self.data_segment_size();
        debug!(
            "Data segment: insert {} at {}",
            element.id.as_deref().unwrap_or("<anonymous>"),
            offset
        );
        self.data_segment.push(element);
        offset
    }

    pub fn push(&mut self, element: MemoryElement) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.stack_items += 1;
        }
        self.stack.push(element);
    }

    /// Removes the element on the top of the stack.  Popping an empty stack
    /// returns `None`.  The element is taken from the innermost scope which
    /// still owns elements, so closing any scope afterwards only releases what
    /// that scope pushed.
    pub fn pop(&mut self) -> Option<MemoryElement> {
        let element = self.stack.pop()?;
        let depth = self.scopes.len();
        match self.scopes.iter().rev().position(|s| s.stack_items > 0) {
            Some(0) => self.scopes[depth - 1].stack_items -= 1,
            Some(n) => {
                warn!(
                    "Popped {} which belongs to an enclosing scope",
                    element.id.as_deref().unwrap_or("<anonymous>")
                );
                self.scopes[depth - 1 - n].stack_items -= 1;
            }
            None => (),
        }
        Some(element)
    }

    pub fn open_scope(&mut self) {
        self.scopes.push(Scope::new());
        debug!("Memory: open scope {}", self.scopes.len());
    }

    /// Closes the innermost scope.  Every element pushed within the scope is
    /// popped and returned, most recent first, along with its offset from the
    /// top of the stack at the moment it was popped.  User defined types
    /// declared within the scope are removed.
    pub fn close_scope(&mut self) -> Vec<StackMemoryElement> {
        let scope = match self.scopes.pop() {
            Some(scope) => scope,
            None => return vec![],
        };

        let mut closed = Vec::with_capacity(scope.stack_items);
        let mut offset: usize = 0;
        for _ in 0..scope.stack_items {
            match self.stack.pop() {
                Some(element) => {
                    let size = element.size;
                    closed.push(StackMemoryElement { element, offset });
                    offset = offset.saturating_add(size);
                }
                None => break,
            }
        }

        let remaining = self.udts.len().saturating_sub(scope.udt_items);
        self.udts.truncate(remaining);

        debug!(
            "Memory: close scope {} ({} elements, {} bytes)",
            self.scopes.len() + 1,
            closed.len(),
            offset
        );
        closed
    }

    /// Searches the stack from the top down and then the data segment from the
    /// front for an element named `id`.  If `current_scope` is set, only the
    /// elements of the innermost open scope are searched and the data segment
    /// is skipped.
    pub fn find(&self, id: &str, current_scope: bool) -> Option<MemoryQuery> {
        let limit = if current_scope {
            self.scopes
                .last()
                .map_or(self.stack.len(), |s| s.stack_items)
        } else {
            self.stack.len()
        };

        let mut offset: usize = 0;
        for element in self.stack.iter().rev().take(limit) {
            if element.has_id(id) {
                return Some(MemoryQuery::Stack(StackMemoryElement {
                    element: element.clone(),
                    offset,
                }));
            }
            offset = offset.saturating_add(element.size);
        }

        if current_scope {
            return None;
        }

        let mut offset: usize = 0;
        for element in &self.data_segment {
            if element.has_id(id) {
                return Some(MemoryQuery::Global(GlobalMemoryElement {
                    element: element.clone(),
                    offset,
                }));
            }
            offset = offset.saturating_add(element.size);
        }

        None
    }

    pub fn add_udt(&mut self, udt: UserDefinedType) {
        debug!("Memory: add type {}", udt.id);
        if let Some(scope) = self.scopes.last_mut() {
            scope.udt_items += 1;
        }
        self.udts.push(udt);
    }

    /// Finds the most recently declared active type named `id`.  With
    /// `current_scope` set only the types of the innermost scope are searched.
    pub fn find_udt(&self, id: &str, current_scope: bool) -> Option<&UserDefinedType> {
        let limit = if current_scope {
            self.scopes
                .last()
                .map_or(self.udts.len(), |s| s.udt_items)
        } else {
            self.udts.len()
        };

        self.udts.iter().rev().take(limit).find(|udt| udt.id == id)
    }

    pub fn find_udt_field(&self, id: &str, field: &str, current_scope: bool) -> Option<&UdtField> {
        self.find_udt(id, current_scope)?.field(field)
    }

    /// Resets the tracker so that it can be reused for an unrelated compilation.
    pub fn clear_memory(&mut self) {
        self.data_segment.clear();
        self.stack.clear();
        self.scopes.clear();
        self.udts.clear();
    }

    /// The elements of the data segment with their offsets.
    pub fn data_segment(&self) -> Vec<GlobalMemoryElement> {
        let mut offset: usize = 0;
        self.data_segment
            .iter()
            .map(|element| {
                let global = GlobalMemoryElement {
                    element: element.clone(),
                    offset,
                };
                offset = offset.saturating_add(element.size);
                global
            })
            .collect()
    }

    /// The size of the data segment in bytes.
    pub fn data_segment_size(&self) -> usize {
        self.data_segment
            .iter()
            .fold(0, |total: usize, e| total.saturating_add(e.size))
    }

    /// The size of everything on the stack in bytes.
    pub fn stack_size(&self) -> usize {
        self.stack
            .iter()
            .fold(0, |total: usize, e| total.saturating_add(e.size))
    }

    /// The number of elements on the stack.
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// The active user defined types, oldest first.
    pub fn udts(&self) -> &[UserDefinedType] {
        &self.udts
    }
}

impl std::fmt::Display for MemoryTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Data segment:\n")?;
        for global in self.data_segment() {
            f.write_fmt(format_args!(
                "  {:>5}: {} ({}, {} bytes)\n",
                global.offset,
                global.element.id.as_deref().unwrap_or("<anonymous>"),
                global.element.ty.type_id(),
                global.element.size
            ))?;
        }

        f.write_str("Stack:\n")?;
        let mut offset: usize = 0;
        for element in self.stack.iter().rev() {
            f.write_fmt(format_args!(
                "  {:>5}: {} ({}, {} bytes)\n",
                offset,
                element.id.as_deref().unwrap_or("<anonymous>"),
                element.ty.type_id(),
                element.size
            ))?;
            offset = offset.saturating_add(element.size);
        }

        for (i, scope) in self.scopes.iter().enumerate().rev() {
            f.write_fmt(format_args!("{}: {}\n", i, scope))?;
        }
        Ok(())
    }
}
