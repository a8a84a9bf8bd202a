// Grammar
// MODULE := ITEM*
// ITEM := IMPORT | [export] (TYPE_DEF | FN_DEF | VAR_DECL | CONST_DECL)
// IMPORT := import STRING_LITERAL ;
// TYPE_DEF := type IDENTIFIER { [FIELD (, FIELD)* [,]] }
// FIELD := IDENTIFIER : TYPE
// FN_DEF := fn IDENTIFIER ( [FIELD (, FIELD)*] ) [-> TYPE] BLOCK
// VAR_DECL := var IDENTIFIER : TYPE [= EXPRESSION] ;
// CONST_DECL := const IDENTIFIER : TYPE = EXPRESSION ;
// TYPE := (PRIMITIVE | IDENTIFIER) ([ INTEGER ])*
// BLOCK := { STATEMENT* }

use log::debug;

use super::{expression::expression, statement::statement, tokenstream::TokenStream};
use super::{ParserError, ParserResult};
use crate::compiler::{
    ast::*,
    lexer::tokens::{Lex, Primitive, Token},
    CompilerError,
};

type Result<T> = std::result::Result<T, CompilerError<ParserError>>;

/// Parses the tokens of the file `file_id` into a [`Module`].  Parsing stops at
/// the first error.
pub fn parse(file_id: &str, tokens: &[Token]) -> Result<Module> {
    debug!("Parsing {}", file_id);
    let mut stream = TokenStream::new(tokens);

    let mut items = vec![];
    while stream.peek().is_some() {
        match item(&mut stream)? {
            Some(i) => items.push(i),
            None => {
                return err!(
                    stream.position(),
                    ParserError::ExpectedDeclaration(stream.peek().map(|t| t.sym.clone()))
                )
            }
        }
    }

    Ok(Module::new(file_id, items))
}

fn item(stream: &mut TokenStream) -> ParserResult<Item> {
    trace!(stream);
    if let Some(i) = import(stream)? {
        return Ok(Some(Item::Import(i)));
    }

    let export = stream.next_if(&Lex::Export);
    let external = export.is_some();

    let item = if let Some(t) = type_def(stream, external)? {
        Some(Item::Type(t))
    } else if let Some(f) = function_def(stream, external)? {
        Some(Item::Function(f))
    } else if let Some(v) = variable_decl(stream, external)? {
        Some(Item::Variable(v))
    } else if let Some(c) = constant_decl(stream, external)? {
        Some(Item::Constant(c))
    } else {
        None
    };

    match (item, export) {
        (None, Some(_)) => err!(
            stream.position(),
            ParserError::ExportNotAllowed(stream.peek().map(|t| t.sym.clone()))
        ),
        (item, _) => Ok(item),
    }
}

fn import(stream: &mut TokenStream) -> ParserResult<Import> {
    trace!(stream);
    let token = match stream.next_if(&Lex::Import) {
        Some(token) => token,
        None => return Ok(None),
    };

    let file = match stream.next_if(&Lex::StringLiteral(String::new())) {
        Some(Token {
            sym: Lex::StringLiteral(file),
            ..
        }) => file,
        _ => return err!(token.position, ParserError::ExpectedImportPath),
    };
    stream.next_must_be(&Lex::Semicolon)?;

    Ok(Some(Import { token, file }))
}

pub(super) fn type_def(stream: &mut TokenStream, external: bool) -> ParserResult<TypeDef> {
    trace!(stream);
    let token = match stream.next_if(&Lex::Type) {
        Some(token) => token,
        None => return Ok(None),
    };

    let name = identifier_after(stream, &token)?;
    stream.next_must_be(&Lex::LBrace)?;

    let mut fields = vec![];
    while let Some(field) = stream.next_if_id() {
        let ty = type_after_colon(stream)?;
        fields.push(TypeField { name: field, ty });
        if stream.next_if(&Lex::Comma).is_none() {
            break;
        }
    }

    stream.next_must_be(&Lex::RBrace)?;

    Ok(Some(TypeDef {
        external,
        name,
        fields,
    }))
}

fn function_def(stream: &mut TokenStream, external: bool) -> ParserResult<FunctionDef> {
    trace!(stream);
    let token = match stream.next_if(&Lex::FunctionDef) {
        Some(token) => token,
        None => return Ok(None),
    };

    let name = identifier_after(stream, &token)?;
    let parameters = parameter_list(stream)?;

    let return_type = match stream.next_if(&Lex::LArrow) {
        Some(arrow) => Some(required_type(stream, &arrow)?),
        None => None,
    };

    let body = expect_block(stream)?;

    Ok(Some(FunctionDef {
        external,
        name,
        parameters,
        return_type,
        body,
    }))
}

fn parameter_list(stream: &mut TokenStream) -> Result<Vec<Parameter>> {
    trace!(stream);
    stream.next_must_be(&Lex::LParen)?;

    let mut params = vec![];
    while let Some(name) = stream.next_if_id() {
        let ty = type_after_colon(stream)?;
        params.push(Parameter { name, ty });
        if stream.next_if(&Lex::Comma).is_none() {
            break;
        }
    }

    stream.next_must_be(&Lex::RParen)?;
    Ok(params)
}

pub(super) fn variable_decl(stream: &mut TokenStream, external: bool) -> ParserResult<VariableDecl> {
    trace!(stream);
    let token = match stream.next_if(&Lex::Var) {
        Some(token) => token,
        None => return Ok(None),
    };

    let name = identifier_after(stream, &token)?;
    let ty = type_after_colon(stream)?;
    let value = match stream.next_if(&Lex::Assign) {
        Some(assign) => Some(required_expression(stream, &assign)?),
        None => None,
    };
    stream.next_must_be(&Lex::Semicolon)?;

    Ok(Some(VariableDecl {
        external,
        name,
        ty,
        value,
    }))
}

pub(super) fn constant_decl(stream: &mut TokenStream, external: bool) -> ParserResult<ConstantDecl> {
    trace!(stream);
    let token = match stream.next_if(&Lex::Const) {
        Some(token) => token,
        None => return Ok(None),
    };

    let name = identifier_after(stream, &token)?;
    let ty = type_after_colon(stream)?;
    let assign = stream.next_must_be(&Lex::Assign)?;
    let value = required_expression(stream, &assign)?;
    stream.next_must_be(&Lex::Semicolon)?;

    Ok(Some(ConstantDecl {
        external,
        name,
        ty,
        value,
    }))
}

pub(super) fn type_ref(stream: &mut TokenStream) -> ParserResult<TypeRef> {
    trace!(stream);
    let name = match stream.next_if_one_of(&[
        Lex::Primitive(Primitive::U8),
        Lex::Identifier(String::new()),
    ]) {
        Some(name) => name,
        None => return Ok(None),
    };

    let mut dimensions = vec![];
    while let Some(bracket) = stream.next_if(&Lex::LBracket) {
        match stream.next_if(&Lex::Integer(0)) {
            Some(Token {
                sym: Lex::Integer(n),
                position,
            }) => dimensions.push((n, position)),
            _ => return err!(bracket.position, ParserError::ExpectedArrayDimension),
        }
        stream.next_must_be(&Lex::RBracket)?;
    }

    Ok(Some(TypeRef::new(name, dimensions)))
}

pub(super) fn block(stream: &mut TokenStream) -> ParserResult<Block> {
    trace!(stream);
    let open = match stream.next_if(&Lex::LBrace) {
        Some(open) => open,
        None => return Ok(None),
    };

    let mut statements = vec![];
    while let Some(s) = statement(stream)? {
        statements.push(s);
    }

    let close = stream.next_must_be(&Lex::RBrace)?;
    Ok(Some(Block::new(open.position, close.position, statements)))
}

pub(super) fn expect_block(stream: &mut TokenStream) -> Result<Block> {
    match block(stream)? {
        Some(b) => Ok(b),
        None => Err(stream.expected(&[Lex::LBrace])),
    }
}

/// `: TYPE`
fn type_after_colon(stream: &mut TokenStream) -> Result<TypeRef> {
    let colon = stream.next_must_be(&Lex::Colon)?;
    required_type(stream, &colon)
}

fn required_type(stream: &mut TokenStream, after: &Token) -> Result<TypeRef> {
    match type_ref(stream)? {
        Some(ty) => Ok(ty),
        None => err!(
            stream.position(),
            ParserError::ExpectedTypeAfter(after.sym.clone())
        ),
    }
}

fn identifier_after(stream: &mut TokenStream, after: &Token) -> Result<Token> {
    match stream.next_if_id() {
        Some(id) => Ok(id),
        None => err!(
            stream.position(),
            ParserError::ExpectedIdentifierAfter(after.sym.clone())
        ),
    }
}

pub(super) fn required_expression(stream: &mut TokenStream, after: &Token) -> Result<Expression> {
    match expression(stream)? {
        Some(e) => Ok(e),
        None => err!(
            stream.position(),
            ParserError::ExpectedExpressionAfter(after.sym.clone())
        ),
    }
}
