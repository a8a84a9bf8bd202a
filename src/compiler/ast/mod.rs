//! The abstract syntax tree produced by the parser for one source file.
//!
//! Every node keeps the token it was parsed from so that later stages can
//! report diagnostics at the nearest source position.

mod expression;
mod module;
mod routinedef;
mod statement;
mod ty;
mod typedef;

pub use expression::{Expression, ExpressionKind, NodeId};
pub use module::{Import, Item, Module};
pub use routinedef::{FunctionDef, Parameter};
pub use statement::{Assignment, Block, ConstantDecl, If, Return, Statement, VariableDecl, While};
pub use ty::TypeRef;
pub use typedef::{TypeDef, TypeField};
