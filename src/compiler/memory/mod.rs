//! The storage model of a program.  The [`MemoryTracker`] records where
//! every global and local lives while a program is verified, and the
//! [`ProgramLayout`] is the final result handed to the code generator.

mod element;
mod layout;
mod scope;
mod tracker;
mod udt;

pub use element::{
    FunctionParameter, FunctionType, GlobalMemoryElement, MemoryDataType, MemoryElement,
    MemoryQuery, StackMemoryElement, ValueType,
};
pub use layout::{FileLayout, FunctionFrame, ProgramLayout};
pub use scope::Scope;
pub use tracker::MemoryTracker;
pub use udt::{UdtField, UserDefinedType};
