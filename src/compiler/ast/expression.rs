use crate::compiler::{
    lexer::tokens::{Lex, Token},
    source::Position,
};

/// Identifies an expression node within a single file.  The parser hands
/// out ids in increasing order and semantic analysis keys the resolved type
/// of each expression by its id.
pub type NodeId = u32;

#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    pub id: NodeId,
    pub kind: ExpressionKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExpressionKind {
    /// An integer or string literal token.
    Literal(Token),
    Identifier(Token),
    Unary {
        op: Token,
        operand: Box<Expression>,
    },
    /// Any binary operator.  Member access is a binary expression using the
    /// `.` operator whose right operand is an identifier.
    Binary {
        left: Box<Expression>,
        op: Token,
        right: Box<Expression>,
    },
    Call {
        callee: Token,
        arguments: Vec<Expression>,
    },
    Index {
        target: Box<Expression>,
        bracket: Token,
        index: Box<Expression>,
    },
}

impl Expression {
    pub fn new(id: NodeId, kind: ExpressionKind) -> Expression {
        Expression { id, kind }
    }

    /// The position of the token which best identifies this expression in
    /// diagnostics.  For operators this is the operator itself.
    pub fn position(&self) -> Position {
        match &self.kind {
            ExpressionKind::Literal(t) | ExpressionKind::Identifier(t) => t.position,
            ExpressionKind::Unary { op, .. } | ExpressionKind::Binary { op, .. } => op.position,
            ExpressionKind::Call { callee, .. } => callee.position,
            ExpressionKind::Index { bracket, .. } => bracket.position,
        }
    }

    /// The variable an assignable expression ultimately refers to: `p` for
    /// `p`, `p.x`, and `p.xs[2].y`.  Returns `None` if the expression cannot
    /// be assigned to.
    pub fn root_identifier(&self) -> Option<&Token> {
        match &self.kind {
            ExpressionKind::Identifier(t) => Some(t),
            ExpressionKind::Binary { left, op, .. } if op.sym == Lex::MemberAccess => {
                left.root_identifier()
            }
            ExpressionKind::Index { target, .. } => target.root_identifier(),
            _ => None,
        }
    }

    pub fn is_assignable(&self) -> bool {
        self.root_identifier().is_some()
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExpressionKind::Literal(t) | ExpressionKind::Identifier(t) => match &t.sym {
                Lex::Integer(i) => f.write_fmt(format_args!("{}", i)),
                Lex::StringLiteral(s) => f.write_fmt(format_args!("\"{}\"", s)),
                Lex::Identifier(id) => f.write_str(id),
                other => f.write_fmt(format_args!("{}", other)),
            },
            ExpressionKind::Unary { op, operand } => {
                f.write_fmt(format_args!("({}{})", op.sym, operand))
            }
            ExpressionKind::Binary { left, op, right } if op.sym == Lex::MemberAccess => {
                f.write_fmt(format_args!("{}.{}", left, right))
            }
            ExpressionKind::Binary { left, op, right } => {
                f.write_fmt(format_args!("({} {} {})", left, op.sym, right))
            }
            ExpressionKind::Call { callee, arguments } => {
                f.write_fmt(format_args!("{}(", callee.identifier().unwrap_or("?")))?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_fmt(format_args!("{}", arg))?;
                }
                f.write_str(")")
            }
            ExpressionKind::Index { target, index, .. } => {
                f.write_fmt(format_args!("{}[{}]", target, index))
            }
        }
    }
}
