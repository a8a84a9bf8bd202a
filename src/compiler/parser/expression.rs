// EXPRESSION := binary operators, lowest precedence first:
//   ||, &&, |, ^, &, == !=, < <= > >=, << >>, + -, * / %
// UNARY := (- | ! | ~) UNARY | POSTFIX
// POSTFIX := PRIMARY (. IDENTIFIER | [ EXPRESSION ])*
// PRIMARY := INTEGER | STRING_LITERAL | IDENTIFIER | CALL | ( EXPRESSION )
// CALL := IDENTIFIER ( [EXPRESSION (, EXPRESSION)*] )

use super::parser::required_expression;
use super::tokenstream::TokenStream;
use super::{ParserError, ParserResult};
use crate::compiler::{
    ast::{Expression, ExpressionKind},
    lexer::tokens::{Lex, Token},
};

/// Binding strength of each binary operator.  Operators which are not binary
/// return `None`.
fn binary_precedence(lex: &Lex) -> Option<u8> {
    use Lex::*;
    Some(match lex {
        BOr => 1,
        BAnd => 2,
        BitOr => 3,
        BitXor => 4,
        BitAnd => 5,
        Eq | NEq => 6,
        Ls | LsEq | Gr | GrEq => 7,
        ShiftLeft | ShiftRight => 8,
        Add | Minus => 9,
        Mul | Div | Mod => 10,
        _ => return None,
    })
}

pub(super) fn expression(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    binary(stream, 1)
}

fn binary(stream: &mut TokenStream, min_precedence: u8) -> ParserResult<Expression> {
    let mut left = match unary(stream)? {
        Some(left) => left,
        None => return Ok(None),
    };

    loop {
        let precedence = match stream.peek().and_then(|t| binary_precedence(&t.sym)) {
            Some(p) if p >= min_precedence => p,
            _ => break,
        };
        let op = match stream.next() {
            Some(op) => op,
            None => break,
        };

        let right = match binary(stream, precedence + 1)? {
            Some(right) => right,
            None => {
                return err!(
                    op.position,
                    ParserError::ExpectedExpressionAfter(op.sym.clone())
                )
            }
        };

        left = Expression::new(
            stream.next_node_id(),
            ExpressionKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
        );
    }

    Ok(Some(left))
}

fn unary(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    let op = match stream.next_if_one_of(&[Lex::Minus, Lex::Not, Lex::BitNot]) {
        Some(op) => op,
        None => return postfix(stream),
    };

    let operand = match unary(stream)? {
        Some(operand) => operand,
        None => {
            return err!(
                op.position,
                ParserError::ExpectedExpressionAfter(op.sym.clone())
            )
        }
    };

    // Negating an integer literal produces a negative literal
    if op.sym == Lex::Minus {
        if let ExpressionKind::Literal(Token {
            sym: Lex::Integer(v),
            ..
        }) = &operand.kind
        {
            let literal = Token::new(Lex::Integer(-*v), op.position);
            return Ok(Some(Expression::new(
                operand.id,
                ExpressionKind::Literal(literal),
            )));
        }
    }

    Ok(Some(Expression::new(
        stream.next_node_id(),
        ExpressionKind::Unary {
            op,
            operand: Box::new(operand),
        },
    )))
}

fn postfix(stream: &mut TokenStream) -> ParserResult<Expression> {
    let mut expr = match primary(stream)? {
        Some(expr) => expr,
        None => return Ok(None),
    };

    loop {
        if let Some(op) = stream.next_if(&Lex::MemberAccess) {
            let field = match stream.next_if_id() {
                Some(field) => field,
                None => {
                    return err!(
                        op.position,
                        ParserError::ExpectedIdentifierAfter(Lex::MemberAccess)
                    )
                }
            };
            let right = Expression::new(stream.next_node_id(), ExpressionKind::Identifier(field));
            expr = Expression::new(
                stream.next_node_id(),
                ExpressionKind::Binary {
                    left: Box::new(expr),
                    op,
                    right: Box::new(right),
                },
            );
        } else if let Some(bracket) = stream.next_if(&Lex::LBracket) {
            let index = required_expression(stream, &bracket)?;
            stream.next_must_be(&Lex::RBracket)?;
            expr = Expression::new(
                stream.next_node_id(),
                ExpressionKind::Index {
                    target: Box::new(expr),
                    bracket,
                    index: Box::new(index),
                },
            );
        } else {
            break;
        }
    }

    Ok(Some(expr))
}

fn primary(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    if let Some(lparen) = stream.next_if(&Lex::LParen) {
        let inner = required_expression(stream, &lparen)?;
        stream.next_must_be(&Lex::RParen)?;
        return Ok(Some(inner));
    }

    if stream.test_ifn(&[Lex::Identifier(String::new()), Lex::LParen]) {
        return function_call(stream);
    }

    let kind = if let Some(literal) =
        stream.next_if_one_of(&[Lex::Integer(0), Lex::StringLiteral(String::new())])
    {
        ExpressionKind::Literal(literal)
    } else if let Some(id) = stream.next_if_id() {
        ExpressionKind::Identifier(id)
    } else {
        return Ok(None);
    };

    Ok(Some(Expression::new(stream.next_node_id(), kind)))
}

fn function_call(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    let callee = match stream.next_if_id() {
        Some(callee) => callee,
        None => return Ok(None),
    };
    stream.next_must_be(&Lex::LParen)?;

    let mut arguments = vec![];
    while let Some(arg) = expression(stream)? {
        arguments.push(arg);
        if stream.next_if(&Lex::Comma).is_none() {
            break;
        }
    }
    stream.next_must_be(&Lex::RParen)?;

    Ok(Some(Expression::new(
        stream.next_node_id(),
        ExpressionKind::Call { callee, arguments },
    )))
}
