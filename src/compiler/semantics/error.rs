use crate::compiler::{lexer::tokens::Lex, source::Position};

use super::type_rules::ExprType;

/// Errors generated during semantic analysis of a compilation unit.
#[derive(Clone, Debug, PartialEq)]
pub enum SemanticError {
    Undeclared(String),
    AlreadyDeclared(String, Position),
    NameInUse(String),
    NotAValue(String),
    NotAFunction(String),
    NotAType(String),
    UnknownType(String),
    DuplicateField(String, String),
    UnknownField(String, String),
    MemberAccessOnNonUdt(ExprType),
    InvalidArrayDimension(i64),
    RecursiveType(String),
    TypeTooLarge(String),
    OutOfMemory(String),
    BinaryOperandMismatch(Lex, ExprType, ExprType),
    InvalidUnaryOperand(Lex, ExprType),
    InvalidIndexTarget(ExprType),
    InvalidIndexType(ExprType),
    AssignmentMismatch(ExprType, ExprType),
    AssignToConstant(String),
    WrongArgumentCount(String, usize, usize),
    ArgumentMismatch(String, usize, ExprType, ExprType),
    ReturnMismatch(String, ExprType, ExprType),
    ReturnValueInVoidFunction(String),
    MissingReturnValue(String, ExprType),
    MissingReturn(String),
    InitializerNotLiteral(String),
    InvalidCondition(ExprType),
    NoValue(String),
    Internal(InternalError),
}

/// An invariant which an earlier stage of the compiler should have
/// guaranteed does not hold.  These indicate a bug in the compiler rather
/// than in the program being compiled.
#[derive(Clone, Debug, PartialEq)]
pub enum InternalError {
    ExpectedIdentifier(Lex),
    ExpectedLiteral(Lex),
    MissingStorage(String),
    MissingType(String),
    OutsideFunction,
}

impl SemanticError {
    pub fn is_internal(&self) -> bool {
        matches!(self, SemanticError::Internal(_))
    }
}

impl From<InternalError> for SemanticError {
    fn from(ie: InternalError) -> Self {
        SemanticError::Internal(ie)
    }
}

impl std::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use SemanticError::*;
        let msg = match self {
            Undeclared(id) => format!("{} is not declared", id),
            AlreadyDeclared(id, previous) => {
                format!("{} is already declared in this scope at L{}", id, previous)
            }
            NameInUse(id) => format!("{} is already defined by another file", id),
            NotAValue(id) => format!("{} is not a variable or constant", id),
            NotAFunction(id) => format!("{} is not a function", id),
            NotAType(id) => format!("{} is not a type", id),
            UnknownType(id) => format!("Type {} is not declared", id),
            DuplicateField(udt, field) => format!("{} already has a field named {}", udt, field),
            UnknownField(udt, field) => format!("{} does not have a field named {}", udt, field),
            MemberAccessOnNonUdt(ty) => {
                format!("Member access is only valid on user defined types, found {}", ty)
            }
            InvalidArrayDimension(d) => {
                format!("Invalid array dimension {}: dimensions must be at least 1", d)
            }
            RecursiveType(id) => format!("Type {} contains itself and has no finite size", id),
            TypeTooLarge(id) => format!("Type {} does not fit in a 32-bit address space", id),
            OutOfMemory(id) => format!(
                "{} does not fit in memory: the 32-bit address space is exhausted",
                id
            ),
            BinaryOperandMismatch(op, l, r) => {
                format!("{} cannot be applied to {} and {}", op, l, r)
            }
            InvalidUnaryOperand(op, ty) => format!("{} cannot be applied to {}", op, ty),
            InvalidIndexTarget(ty) => format!("Only arrays can be indexed, found {}", ty),
            InvalidIndexType(ty) => format!("Array index must be an integer, found {}", ty),
            AssignmentMismatch(target, value) => {
                format!("Cannot assign {} to {}", value, target)
            }
            AssignToConstant(id) => format!("Cannot assign to constant {}", id),
            WrongArgumentCount(id, expected, found) => format!(
                "{} expects {} arguments, but {} were given",
                id, expected, found
            ),
            ArgumentMismatch(id, position, expected, found) => format!(
                "Argument {} of {} expects {}, but found {}",
                position, id, expected, found
            ),
            ReturnMismatch(id, expected, found) => {
                format!("{} returns {}, but found {}", id, expected, found)
            }
            ReturnValueInVoidFunction(id) => {
                format!("{} does not have a return type and cannot return a value", id)
            }
            MissingReturnValue(id, ty) => format!("{} must return a value of type {}", id, ty),
            MissingReturn(id) => format!("{} must end with a return statement", id),
            InitializerNotLiteral(id) => {
                format!("{} must be initialized with a literal value", id)
            }
            InvalidCondition(ty) => format!("Condition must be an integer, found {}", ty),
            NoValue(expr) => format!("{} does not produce a value", expr),
            Internal(ie) => format!("internal compiler error: {}", ie),
        };

        f.write_str(&msg)
    }
}

impl std::fmt::Display for InternalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use InternalError::*;
        match self {
            ExpectedIdentifier(found) => {
                f.write_fmt(format_args!("expected an identifier, but found {}", found))
            }
            ExpectedLiteral(found) => {
                f.write_fmt(format_args!("expected a literal, but found {}", found))
            }
            MissingStorage(id) => f.write_fmt(format_args!("{} has no storage location", id)),
            MissingType(id) => f.write_fmt(format_args!("type {} is not active in memory", id)),
            OutsideFunction => f.write_str("return statement outside of a function"),
        }
    }
}
