// STATEMENT := VAR_DECL | CONST_DECL | TYPE_DEF | IF | WHILE | RETURN | BLOCK
//            | EXPRESSION [= EXPRESSION] ;
// IF := if EXPRESSION BLOCK [else (IF | BLOCK)]
// WHILE := while EXPRESSION BLOCK
// RETURN := return [EXPRESSION] ;

use super::expression::expression;
use super::parser::{
    block, constant_decl, expect_block, required_expression, type_def, variable_decl,
};
use super::tokenstream::TokenStream;
use super::{ParserError, ParserResult};
use crate::compiler::{ast::*, lexer::tokens::Lex};

pub(super) fn statement(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    if stream.peek().is_none() || stream.test_if(&Lex::RBrace) {
        return Ok(None);
    }

    let stm = if let Some(v) = variable_decl(stream, false)? {
        Statement::Variable(v)
    } else if let Some(c) = constant_decl(stream, false)? {
        Statement::Constant(c)
    } else if let Some(t) = type_def(stream, false)? {
        Statement::Type(t)
    } else if let Some(i) = if_statement(stream)? {
        Statement::If(i)
    } else if let Some(w) = while_statement(stream)? {
        Statement::While(w)
    } else if let Some(r) = return_statement(stream)? {
        Statement::Return(r)
    } else if let Some(b) = block(stream)? {
        Statement::Block(b)
    } else if let Some(s) = expression_statement(stream)? {
        s
    } else {
        return Ok(None);
    };

    Ok(Some(stm))
}

fn if_statement(stream: &mut TokenStream) -> ParserResult<If> {
    trace!(stream);
    let token = match stream.next_if(&Lex::If) {
        Some(token) => token,
        None => return Ok(None),
    };

    let condition = required_expression(stream, &token)?;
    let then_block = expect_block(stream)?;

    let else_block = match stream.next_if(&Lex::Else) {
        Some(else_token) => match if_statement(stream)? {
            Some(nested) => {
                let close = nested
                    .else_block
                    .as_ref()
                    .map_or(nested.then_block.close, |b| b.close);
                Some(Block::new(
                    else_token.position,
                    close,
                    vec![Statement::If(nested)],
                ))
            }
            None => Some(expect_block(stream)?),
        },
        None => None,
    };

    Ok(Some(If {
        token,
        condition,
        then_block,
        else_block,
    }))
}

fn while_statement(stream: &mut TokenStream) -> ParserResult<While> {
    trace!(stream);
    let token = match stream.next_if(&Lex::While) {
        Some(token) => token,
        None => return Ok(None),
    };

    let condition = required_expression(stream, &token)?;
    let body = expect_block(stream)?;

    Ok(Some(While {
        token,
        condition,
        body,
    }))
}

fn return_statement(stream: &mut TokenStream) -> ParserResult<Return> {
    trace!(stream);
    let token = match stream.next_if(&Lex::Return) {
        Some(token) => token,
        None => return Ok(None),
    };

    let value = expression(stream)?;
    stream.next_must_be(&Lex::Semicolon)?;

    Ok(Some(Return { token, value }))
}

fn expression_statement(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let expr = match expression(stream)? {
        Some(expr) => expr,
        None => return Ok(None),
    };

    let stm = match stream.next_if(&Lex::Assign) {
        Some(op) => {
            if !expr.is_assignable() {
                return err!(op.position, ParserError::InvalidAssignmentTarget);
            }
            let value = required_expression(stream, &op)?;
            Statement::Assignment(Assignment {
                target: expr,
                op,
                value,
            })
        }
        None => Statement::Expression(expr),
    };

    stream.next_must_be(&Lex::Semicolon)?;
    Ok(Some(stm))
}
