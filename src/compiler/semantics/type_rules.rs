use crate::compiler::{
    ast::{Expression, ExpressionKind},
    lexer::tokens::{Lex, Primitive, Token},
    memory::{MemoryDataType, MemoryTracker},
};

use super::{
    error::{InternalError, SemanticError},
    resolver::SymbolResolver,
    symbol_type::{SymbolType, TypeHandle},
    SemanticResult,
};

/// The type id given to anything whose type could not be determined.
pub const UNDEFINED_TYPE_ID: &str = "<undefined>";

/// The type of an expression.  `Undefined` is a valid result: it is produced
/// when a name or a field cannot be found and propagates through the
/// expressions that use it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExprType {
    Primitive(Primitive),
    Udt(String),
    Array {
        element: Box<ExprType>,
        dimensions: Vec<usize>,
    },
    Undefined,
}

impl ExprType {
    /// Converts a type id as it is stored in memory, e.g. `u8`, `Point` or
    /// `u8[4][2]`, into a type.
    pub fn from_type_id(id: &str) -> ExprType {
        if id == UNDEFINED_TYPE_ID || id.is_empty() {
            return ExprType::Undefined;
        }

        match id.find('[') {
            Some(idx) => {
                let element = ExprType::from_type_id(&id[..idx]);
                let dimensions: Option<Vec<usize>> = id[idx..]
                    .split(|c: char| c == '[' || c == ']')
                    .filter(|d| !d.is_empty())
                    .map(|d| d.parse().ok())
                    .collect();
                match dimensions {
                    Some(dimensions) if !dimensions.is_empty() => ExprType::Array {
                        element: Box::new(element),
                        dimensions,
                    },
                    _ => ExprType::Undefined,
                }
            }
            None => match Primitive::from_keyword(id) {
                Some(p) => ExprType::Primitive(p),
                None => ExprType::Udt(id.into()),
            },
        }
    }

    pub fn type_id(&self) -> String {
        self.to_string()
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, ExprType::Primitive(p) if p.is_integer())
    }

    pub fn is_undefined(&self) -> bool {
        *self == ExprType::Undefined
    }

    /// The type of one element of an array with its first dimension removed.
    pub fn element_type(&self) -> Option<ExprType> {
        match self {
            ExprType::Array {
                element,
                dimensions,
            } => {
                if dimensions.len() > 1 {
                    Some(ExprType::Array {
                        element: element.clone(),
                        dimensions: dimensions[1..].to_vec(),
                    })
                } else {
                    Some(element.as_ref().clone())
                }
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ExprType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprType::Primitive(p) => f.write_fmt(format_args!("{}", p)),
            ExprType::Udt(id) => f.write_str(id),
            ExprType::Array {
                element,
                dimensions,
            } => {
                f.write_fmt(format_args!("{}", element))?;
                for d in dimensions {
                    f.write_fmt(format_args!("[{}]", d))?;
                }
                Ok(())
            }
            ExprType::Undefined => f.write_str(UNDEFINED_TYPE_ID),
        }
    }
}

/// The smallest primitive which can hold an integer literal.  Non-negative
/// values are always unsigned.
pub fn literal_type(value: i64) -> Primitive {
    match value {
        0..=255 => Primitive::U8,
        256..=65535 => Primitive::U16,
        v if v >= 0 => Primitive::U32,
        -128..=-1 => Primitive::S8,
        -32768..=-129 => Primitive::S16,
        _ => Primitive::S32,
    }
}

pub fn literal_expr_type(token: &Token) -> SemanticResult<ExprType> {
    match &token.sym {
        Lex::Integer(i) => Ok(ExprType::Primitive(literal_type(*i))),
        Lex::StringLiteral(_) => Ok(ExprType::Primitive(Primitive::String)),
        other => err!(
            token.position,
            InternalError::ExpectedLiteral(other.clone()).into()
        ),
    }
}

/// The type of the value stored under `id`.  Names which are not stored, or
/// which label a function, are `Undefined`.
pub fn identifier_type(id: &str, memory: &MemoryTracker) -> ExprType {
    match memory.find(id, false) {
        Some(query) => match &query.element().ty {
            MemoryDataType::Value(v) => ExprType::from_type_id(&v.id),
            MemoryDataType::Function(_) => ExprType::Undefined,
        },
        None => ExprType::Undefined,
    }
}

/// The type of `lhs.field`.  If `lhs` is not an active user defined type or
/// has no such field the result is `Undefined`.
pub fn member_type(lhs: &ExprType, field: &str, memory: &MemoryTracker) -> ExprType {
    match lhs {
        ExprType::Udt(id) => memory
            .find_udt_field(id, field, false)
            .map_or(ExprType::Undefined, |f| ExprType::from_type_id(&f.type_id)),
        _ => ExprType::Undefined,
    }
}

/// The return type of the function `id`.  A function without a return type,
/// or a name which is not a function, gives `Undefined`.
pub fn call_type(id: &str, memory: &MemoryTracker) -> ExprType {
    match memory.find(id, false) {
        Some(query) => match &query.element().ty {
            MemoryDataType::Function(f) => f
                .return_type_id
                .as_deref()
                .map_or(ExprType::Undefined, ExprType::from_type_id),
            MemoryDataType::Value(_) => ExprType::Undefined,
        },
        None => ExprType::Undefined,
    }
}

/**
 Combines the operand types of a binary operator other than member access.

 Returns `None` if the operands cannot be combined: a user defined type on
 either side requires the identical type on the other side, and arrays can
 not be operands.  If either side is `Undefined` so is the result.  Otherwise
 the larger primitive wins, with ties going to the right operand, and mixing
 a signed and an unsigned operand gives the unsigned type of the winning
 width.
 */
pub fn binary_result(left: &ExprType, right: &ExprType) -> Option<ExprType> {
    match (left, right) {
        (ExprType::Udt(l), ExprType::Udt(r)) if l == r => Some(left.clone()),
        (ExprType::Udt(_), _) => None,
        (ExprType::Undefined, _) | (_, ExprType::Undefined) => Some(ExprType::Undefined),
        (ExprType::Primitive(l), ExprType::Primitive(r)) => {
            let larger = if l.rank() > r.rank() { l } else { r };
            if l.is_signed() != r.is_signed() {
                Some(ExprType::Primitive(larger.to_unsigned()))
            } else {
                Some(ExprType::Primitive(*larger))
            }
        }
        _ => None,
    }
}

pub fn binary_type(op: &Token, left: &ExprType, right: &ExprType) -> SemanticResult<ExprType> {
    match binary_result(left, right) {
        Some(ty) => Ok(ty),
        None => err!(
            op.position,
            SemanticError::BinaryOperandMismatch(op.sym.clone(), left.clone(), right.clone())
        ),
    }
}

/// Tests whether a value of type `value` can be stored in a location of type
/// `target` without narrowing.
pub fn is_assignable(target: &ExprType, value: &ExprType) -> bool {
    match (target, value) {
        (ExprType::Undefined, _) | (_, ExprType::Undefined) => false,
        (ExprType::Udt(t), ExprType::Udt(v)) => t == v,
        (ExprType::Array { .. }, ExprType::Array { .. }) => target == value,
        (ExprType::Primitive(Primitive::String), ExprType::Primitive(v)) => {
            *v == Primitive::String
        }
        (ExprType::Primitive(t), ExprType::Primitive(v)) => {
            t.is_integer() && v.is_integer() && v.rank() <= t.rank()
        }
        _ => false,
    }
}

/// Unary operators keep the type of their integer operand.
pub fn unary_type(op: &Token, operand: &ExprType) -> SemanticResult<ExprType> {
    match operand {
        ExprType::Undefined => Ok(ExprType::Undefined),
        ty if ty.is_integer() => Ok(ty.clone()),
        ty => err!(
            op.position,
            SemanticError::InvalidUnaryOperand(op.sym.clone(), ty.clone())
        ),
    }
}

pub fn index_type(bracket: &Token, target: &ExprType, index: &ExprType) -> SemanticResult<ExprType> {
    if target.is_undefined() {
        return Ok(ExprType::Undefined);
    }

    let element = match target.element_type() {
        Some(element) => element,
        None => {
            return err!(
                bracket.position,
                SemanticError::InvalidIndexTarget(target.clone())
            )
        }
    };

    if !index.is_integer() {
        return err!(
            bracket.position,
            SemanticError::InvalidIndexType(index.clone())
        );
    }

    Ok(element)
}

/**
 Computes the type of an expression from the values and types currently
 active in `memory`.

 Names are resolved through the memory tracker, so this must be called while
 the scopes in which the expression appears are open.  Names and fields which
 cannot be found give `Undefined`; only operator mismatches are errors.
 */
pub fn expression_type(expr: &Expression, memory: &MemoryTracker) -> SemanticResult<ExprType> {
    match &expr.kind {
        ExpressionKind::Literal(token) => literal_expr_type(token),
        ExpressionKind::Identifier(token) => match token.identifier() {
            Some(id) => Ok(identifier_type(id, memory)),
            None => err!(
                token.position,
                InternalError::ExpectedIdentifier(token.sym.clone()).into()
            ),
        },
        ExpressionKind::Binary { left, op, right } if op.sym == Lex::MemberAccess => {
            let lhs = expression_type(left, memory)?;
            match &right.kind {
                ExpressionKind::Identifier(field) => match field.identifier() {
                    Some(field) => Ok(member_type(&lhs, field, memory)),
                    None => err!(
                        field.position,
                        InternalError::ExpectedIdentifier(field.sym.clone()).into()
                    ),
                },
                _ => err!(
                    right.position(),
                    InternalError::ExpectedIdentifier(op.sym.clone()).into()
                ),
            }
        }
        ExpressionKind::Binary { left, op, right } => {
            let l = expression_type(left, memory)?;
            let r = expression_type(right, memory)?;
            binary_type(op, &l, &r)
        }
        ExpressionKind::Unary { op, operand } => {
            let ty = expression_type(operand, memory)?;
            unary_type(op, &ty)
        }
        ExpressionKind::Call { callee, .. } => match callee.identifier() {
            Some(id) => Ok(call_type(id, memory)),
            None => err!(
                callee.position,
                InternalError::ExpectedIdentifier(callee.sym.clone()).into()
            ),
        },
        ExpressionKind::Index {
            target,
            bracket,
            index,
        } => {
            let t = expression_type(target, memory)?;
            let i = expression_type(index, memory)?;
            index_type(bracket, &t, &i)
        }
    }
}

/// The largest value the 32-bit target can address.
pub const MAX_STORAGE_SIZE: usize = u32::MAX as usize;

#[derive(Clone, Debug, PartialEq)]
pub enum SizeError {
    UnknownType(String),
    Recursive(String),
    TooLarge(String),
    Undefined,
}

/// The number of bytes a value of type `ty` occupies.  User defined types are
/// packed, so their size is the sum of the sizes of their fields.
pub fn storage_size(ty: &ExprType, memory: &MemoryTracker) -> Result<usize, SizeError> {
    let mut visiting = vec![];
    size_of(ty, memory, &mut visiting)
}

fn size_of(
    ty: &ExprType,
    memory: &MemoryTracker,
    visiting: &mut Vec<String>,
) -> Result<usize, SizeError> {
    match ty {
        ExprType::Primitive(p) => Ok(p.size()),
        ExprType::Array {
            element,
            dimensions,
        } => {
            let element = size_of(element, memory, visiting)?;
            dimensions
                .iter()
                .try_fold(element, |sz, d| sz.checked_mul(*d))
                .filter(|sz| *sz <= MAX_STORAGE_SIZE)
                .ok_or_else(|| SizeError::TooLarge(ty.type_id()))
        }
        ExprType::Udt(id) => {
            if visiting.contains(id) {
                return Err(SizeError::Recursive(id.clone()));
            }

            let udt = memory
                .find_udt(id, false)
                .ok_or_else(|| SizeError::UnknownType(id.clone()))?;

            visiting.push(id.clone());
            let mut size: usize = 0;
            for field in &udt.fields {
                let field_size =
                    size_of(&ExprType::from_type_id(&field.type_id), memory, visiting)?;
                size = size
                    .checked_add(field_size)
                    .filter(|sz| *sz <= MAX_STORAGE_SIZE)
                    .ok_or_else(|| SizeError::TooLarge(id.clone()))?;
            }
            visiting.pop();

            Ok(size)
        }
        ExprType::Undefined => Err(SizeError::Undefined),
    }
}

/// Interns `ty` in the resolver's type table.  `Undefined` has no symbol type.
pub fn to_symbol_type(ty: &ExprType, resolver: &mut SymbolResolver) -> Option<TypeHandle> {
    match ty {
        ExprType::Primitive(p) => Some(resolver.add_symbol_type(SymbolType::Native(*p))),
        ExprType::Udt(id) => Some(resolver.add_symbol_type(SymbolType::Udt { id: id.clone() })),
        ExprType::Array {
            element,
            dimensions,
        } => {
            let base = to_symbol_type(element, resolver)?;
            Some(resolver.add_symbol_type(SymbolType::Array {
                base,
                dimensions: dimensions.clone(),
            }))
        }
        ExprType::Undefined => None,
    }
}

pub fn from_symbol_type(handle: TypeHandle, resolver: &SymbolResolver) -> ExprType {
    match resolver.to_symbol_type(handle) {
        Some(SymbolType::Native(p)) => ExprType::Primitive(*p),
        Some(SymbolType::Udt { id }) => ExprType::Udt(id.clone()),
        Some(SymbolType::Array { base, dimensions }) => ExprType::Array {
            element: Box::new(from_symbol_type(*base, resolver)),
            dimensions: dimensions.clone(),
        },
        Some(SymbolType::Function { .. }) | None => ExprType::Undefined,
    }
}
