use serde::Serialize;

/// A parameter of a function as it is recorded in memory.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FunctionParameter {
    pub id: String,
    pub type_id: String,
}

/// The signature of a function stored in the data segment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FunctionType {
    pub id: String,
    pub parameters: Vec<FunctionParameter>,
    pub return_type_id: Option<String>,
}

/// The type of a stored value: the name of a primitive, a user defined type,
/// or an array type such as `u8[4]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValueType {
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum MemoryDataType {
    Function(FunctionType),
    Value(ValueType),
}

impl MemoryDataType {
    /// The id of the type of this data: the name of the function for a
    /// function, otherwise the type id of the value.
    pub fn type_id(&self) -> &str {
        match self {
            MemoryDataType::Function(f) => &f.id,
            MemoryDataType::Value(v) => &v.id,
        }
    }
}

/// One named or anonymous slot of storage.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MemoryElement {
    pub id: Option<String>,
    pub ty: MemoryDataType,
    pub size: usize,
    pub value: i64,
}

impl MemoryElement {
    /// A named value of the given type.
    pub fn value(id: &str, type_id: &str, size: usize, value: i64) -> MemoryElement {
        MemoryElement {
            id: Some(id.into()),
            ty: MemoryDataType::Value(ValueType { id: type_id.into() }),
            size,
            value,
        }
    }

    /// An unnamed value, e.g. a temporary produced while evaluating an expression.
    pub fn anonymous(type_id: &str, size: usize, value: i64) -> MemoryElement {
        MemoryElement {
            id: None,
            ty: MemoryDataType::Value(ValueType { id: type_id.into() }),
            size,
            value,
        }
    }

    /// A function label.  Functions occupy no storage of their own.
    pub fn function(function: FunctionType) -> MemoryElement {
        MemoryElement {
            id: Some(function.id.clone()),
            ty: MemoryDataType::Function(function),
            size: 0,
            value: 0,
        }
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

/// An element of the data segment along with its offset from the start of
/// the data segment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GlobalMemoryElement {
    pub element: MemoryElement,
    pub offset: usize,
}

/// An element of the stack along with its offset from the top of the stack.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StackMemoryElement {
    pub element: MemoryElement,
    pub offset: usize,
}

/// The result of looking up a name in memory.  The offset of a global is
/// measured from the start of the data segment while the offset of a stack
/// element is measured from the top of the stack, so the two must not be
/// mixed up.  Use [`MemoryQuery::offset`] and [`MemoryQuery::value`] rather
/// than matching on the variants.
#[derive(Clone, Debug, PartialEq)]
pub enum MemoryQuery {
    Global(GlobalMemoryElement),
    Stack(StackMemoryElement),
}

impl MemoryQuery {
    pub fn value(&self) -> i64 {
        self.element().value
    }

    pub fn offset(&self) -> usize {
        match self {
            MemoryQuery::Global(g) => g.offset,
            MemoryQuery::Stack(s) => s.offset,
        }
    }

    pub fn element(&self) -> &MemoryElement {
        match self {
            MemoryQuery::Global(g) => &g.element,
            MemoryQuery::Stack(s) => &s.element,
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, MemoryQuery::Global(_))
    }
}
