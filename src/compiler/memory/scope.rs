/// The accounting for one lexical block: how many stack elements and how
/// many user defined types were added since the block was opened.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Scope {
    pub(super) stack_items: usize,
    pub(super) udt_items: usize,
}

impl Scope {
    pub fn new() -> Scope {
        Scope::default()
    }

    pub fn stack_items(&self) -> usize {
        self.stack_items
    }

    pub fn udt_items(&self) -> usize {
        self.udt_items
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Scope {{ stack items: {}, udt items: {} }}",
            self.stack_items, self.udt_items
        ))
    }
}
