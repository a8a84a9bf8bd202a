use crate::compiler::{lexer::tokens::Token, source::Position};

use super::{Expression, TypeDef, TypeRef};

/// A sequence of statements between `{` and `}`.  Every block is its own
/// lexical scope.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub open: Position,
    pub close: Position,
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(open: Position, close: Position, statements: Vec<Statement>) -> Block {
        Block {
            open,
            close,
            statements,
        }
    }
}

/// `var <name>: <type> [= <value>];`
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDecl {
    pub external: bool,
    pub name: Token,
    pub ty: TypeRef,
    pub value: Option<Expression>,
}

/// `const <name>: <type> = <value>;`
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantDecl {
    pub external: bool,
    pub name: Token,
    pub ty: TypeRef,
    pub value: Expression,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub target: Expression,
    pub op: Token,
    pub value: Expression,
}

#[derive(Clone, Debug, PartialEq)]
pub struct If {
    pub token: Token,
    pub condition: Expression,
    pub then_block: Block,
    /// `else if` chains are represented as an else block holding a single
    /// `if` statement.
    pub else_block: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct While {
    pub token: Token,
    pub condition: Expression,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Return {
    pub token: Token,
    pub value: Option<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Variable(VariableDecl),
    Constant(ConstantDecl),
    Type(TypeDef),
    Assignment(Assignment),
    Expression(Expression),
    If(If),
    While(While),
    Return(Return),
    Block(Block),
}

impl Statement {
    pub fn position(&self) -> Position {
        match self {
            Statement::Variable(v) => v.name.position,
            Statement::Constant(c) => c.name.position,
            Statement::Type(t) => t.name.position,
            Statement::Assignment(a) => a.op.position,
            Statement::Expression(e) => e.position(),
            Statement::If(i) => i.token.position,
            Statement::While(w) => w.token.position,
            Statement::Return(r) => r.token.position,
            Statement::Block(b) => b.open,
        }
    }
}
