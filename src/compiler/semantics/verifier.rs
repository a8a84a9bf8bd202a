use std::collections::HashMap;

use log::{debug, trace};

use crate::compiler::{
    ast::{
        Assignment, Block, ConstantDecl, Expression, ExpressionKind, FunctionDef, If, Item,
        Module, NodeId, Return, Statement, TypeDef, TypeRef, VariableDecl,
    },
    lexer::tokens::{Lex, Token},
    memory::{
        FunctionFrame, FunctionParameter, FunctionType, MemoryElement, MemoryTracker, UdtField,
        UserDefinedType,
    },
    source::Position,
};

use super::{
    error::{InternalError, SemanticError},
    resolver::SymbolResolver,
    symbol::{Symbol, SymbolKind, TypedName},
    symbol_type::TypeHandle,
    type_rules::{self, ExprType, SizeError, UNDEFINED_TYPE_ID},
    SemanticResult,
};

/// The result of verifying one file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VerifiedFile {
    pub file_id: String,

    /// The stack elements of every function of the file, in declaration order.
    pub frames: Vec<FunctionFrame>,

    /// The resolved type of every expression which produces a value.
    pub expression_types: HashMap<NodeId, TypeHandle>,

    /// The user defined types declared at the top level of the file.  They
    /// are activated again when a file which imports this file is verified.
    pub udts: Vec<UserDefinedType>,
}

struct FunctionContext {
    id: String,
    return_type: Option<ExprType>,
    frame: FunctionFrame,
}

/**
 Verifies a single file against the memory tracker and the symbol resolver
 shared by the whole compilation.

 Declarations are registered first, so functions may be called before the
 point at which they are defined:
 1. type names, then type fields, then a check that every type has a finite size,
 2. functions, global variables and constants in the order in which they appear,
 3. the body of every function.

 Every lexical scope opens a scope in both the memory tracker and the
 resolver.  The stack elements released when a scope of a function closes are
 collected into that function's [`FunctionFrame`].

 Verification stops at the first error.  The scopes which were opened by the
 verifier are closed again before the error is returned.
*/
pub struct Verifier<'a> {
    file_id: String,
    memory: &'a mut MemoryTracker,
    resolver: &'a mut SymbolResolver,
    function: Option<FunctionContext>,
    frames: Vec<FunctionFrame>,
    expression_types: HashMap<NodeId, TypeHandle>,
    declared_udts: Vec<UserDefinedType>,
}

impl<'a> Verifier<'a> {
    pub fn new(
        file_id: &str,
        memory: &'a mut MemoryTracker,
        resolver: &'a mut SymbolResolver,
    ) -> Verifier<'a> {
        Verifier {
            file_id: file_id.into(),
            memory,
            resolver,
            function: None,
            frames: vec![],
            expression_types: HashMap::new(),
            declared_udts: vec![],
        }
    }

    pub fn verify(mut self, module: &Module) -> SemanticResult<VerifiedFile> {
        debug!("Verifying {}", self.file_id);
        self.resolver.add_file(&self.file_id);

        let memory_depth = self.memory.scope_depth();
        let resolver_depth = self.resolver_depth();

        match self.verify_module(module) {
            Ok(()) => Ok(VerifiedFile {
                file_id: self.file_id,
                frames: self.frames,
                expression_types: self.expression_types,
                udts: self.declared_udts,
            }),
            Err(e) => {
                debug!("Verification of {} failed: {}", self.file_id, e);
                while self.memory.scope_depth() > memory_depth {
                    self.memory.close_scope();
                }
                while self.resolver_depth() > resolver_depth {
                    self.resolver.close_scope(&self.file_id);
                }
                Err(e)
            }
        }
    }

    fn verify_module(&mut self, module: &Module) -> SemanticResult<()> {
        let types: Vec<&TypeDef> = module.types().collect();
        self.declare_types(&types)?;

        for item in module.items() {
            match item {
                Item::Function(f) => self.declare_function(f)?,
                Item::Variable(v) => self.declare_global_variable(v)?,
                Item::Constant(c) => self.declare_constant(c)?,
                Item::Import(_) | Item::Type(_) => (),
            }
        }

        for f in module.functions() {
            self.verify_function(f)?;
        }

        Ok(())
    }

    fn resolver_depth(&self) -> usize {
        self.resolver
            .table(&self.file_id)
            .map_or(0, |t| t.scope_depth())
    }

    fn open_scope(&mut self) {
        self.memory.open_scope();
        self.resolver.open_scope(&self.file_id);
    }

    fn close_scope(&mut self) {
        let closed = self.memory.close_scope();
        self.resolver.close_scope(&self.file_id);
        if let Some(ctx) = self.function.as_mut() {
            ctx.frame.elements.extend(closed);
        }
    }

    fn identifier(token: &Token) -> SemanticResult<String> {
        match token.identifier() {
            Some(id) => Ok(id.into()),
            None => err!(
                token.position,
                InternalError::ExpectedIdentifier(token.sym.clone()).into()
            ),
        }
    }

    /// Rejects a name which is already declared in the current scope.  Names
    /// declared outside of functions must also be unique across every file of
    /// the program, because they all share the data segment.
    fn check_redeclaration(&self, id: &str, pos: Position) -> SemanticResult<()> {
        if let Some(existing) = self.resolver.find_in_current_scope(&self.file_id, id) {
            return err!(
                pos,
                SemanticError::AlreadyDeclared(id.into(), existing.position)
            );
        }

        if self.function.is_none() && self.memory.find(id, false).is_some() {
            return err!(pos, SemanticError::NameInUse(id.into()));
        }

        Ok(())
    }

    fn resolve_type(&self, ty: &TypeRef) -> SemanticResult<ExprType> {
        let base = match ty.primitive() {
            Some(p) => ExprType::Primitive(p),
            None => {
                let id = ty.base_name();
                match self.resolver.lookup(&self.file_id, &id) {
                    Some(s) if s.is_udt() => ExprType::Udt(id),
                    Some(_) => return err!(ty.position(), SemanticError::NotAType(id)),
                    None => return err!(ty.position(), SemanticError::UnknownType(id)),
                }
            }
        };

        if !ty.is_array() {
            return Ok(base);
        }

        let mut dimensions = vec![];
        for (d, pos) in &ty.dimensions {
            if *d < 1 {
                return err!(*pos, SemanticError::InvalidArrayDimension(*d));
            }
            dimensions.push(*d as usize);
        }

        Ok(ExprType::Array {
            element: Box::new(base),
            dimensions,
        })
    }

    fn intern(&mut self, ty: &ExprType, pos: Position) -> SemanticResult<TypeHandle> {
        match type_rules::to_symbol_type(ty, self.resolver) {
            Some(h) => Ok(h),
            None => err!(pos, InternalError::MissingType(ty.type_id()).into()),
        }
    }

    fn size(&self, ty: &ExprType, pos: Position) -> SemanticResult<usize> {
        type_rules::storage_size(ty, self.memory).or_else(|e| match e {
            SizeError::Recursive(id) => err!(pos, SemanticError::RecursiveType(id)),
            SizeError::TooLarge(id) => err!(pos, SemanticError::TypeTooLarge(id)),
            SizeError::UnknownType(id) => err!(pos, InternalError::MissingType(id).into()),
            SizeError::Undefined => {
                err!(pos, InternalError::MissingType(UNDEFINED_TYPE_ID.into()).into())
            }
        })
    }

    /// Rejects an element which would grow the data segment, or the stack when
    /// inside a function, past the 32-bit address space.
    fn check_capacity(&self, id: &str, size: usize, pos: Position) -> SemanticResult<()> {
        let used = if self.function.is_some() {
            self.memory.stack_size()
        } else {
            self.memory.data_segment_size()
        };

        match used.checked_add(size) {
            Some(total) if total <= type_rules::MAX_STORAGE_SIZE => Ok(()),
            _ => err!(pos, SemanticError::OutOfMemory(id.into())),
        }
    }

    fn declare_types(&mut self, defs: &[&TypeDef]) -> SemanticResult<()> {
        for def in defs {
            let id = Self::identifier(&def.name)?;
            let pos = def.name.position;
            self.check_redeclaration(&id, pos)?;

            // type ids are not scope qualified, so a local type may not reuse
            // the name of any active type
            if self.memory.find_udt(&id, false).is_some() {
                return err!(pos, SemanticError::NameInUse(id));
            }

            self.resolver
                .add_symbol(&self.file_id, Symbol::udt(&id, pos).export(def.external));
        }

        for def in defs {
            let id = Self::identifier(&def.name)?;
            let mut fields: Vec<UdtField> = vec![];
            for field in &def.fields {
                let field_id = Self::identifier(&field.name)?;
                if fields.iter().any(|f| f.id == field_id) {
                    return err!(
                        field.name.position,
                        SemanticError::DuplicateField(id, field_id)
                    );
                }

                let ty = self.resolve_type(&field.ty)?;
                let handle = self.intern(&ty, field.ty.position())?;
                self.resolver
                    .add_field_to_symbol(&self.file_id, &id, TypedName::new(&field_id, handle));
                fields.push(UdtField {
                    id: field_id,
                    type_id: ty.type_id(),
                });
            }

            let udt = UserDefinedType::new(&id, fields);
            if self.function.is_none() {
                self.declared_udts.push(udt.clone());
            }
            self.memory.add_udt(udt);
        }

        for def in defs {
            let id = Self::identifier(&def.name)?;
            self.size(&ExprType::Udt(id), def.name.position)?;
        }

        Ok(())
    }

    fn declare_function(&mut self, f: &FunctionDef) -> SemanticResult<()> {
        let id = Self::identifier(&f.name)?;
        let pos = f.name.position;
        self.check_redeclaration(&id, pos)?;

        let mut arguments = vec![];
        let mut parameters = vec![];
        for p in &f.parameters {
            let param_id = Self::identifier(&p.name)?;
            let ty = self.resolve_type(&p.ty)?;
            let handle = self.intern(&ty, p.ty.position())?;
            arguments.push(TypedName::new(&param_id, handle));
            parameters.push(FunctionParameter {
                id: param_id,
                type_id: ty.type_id(),
            });
        }

        let (return_type, return_handle) = match &f.return_type {
            Some(rt) => {
                let ty = self.resolve_type(rt)?;
                let handle = self.intern(&ty, rt.position())?;
                (Some(ty), Some(handle))
            }
            None => (None, None),
        };

        self.resolver.add_symbol(
            &self.file_id,
            Symbol::function(&id, arguments, return_handle, pos).export(f.external),
        );
        self.memory.insert(MemoryElement::function(FunctionType {
            id,
            parameters,
            return_type_id: return_type.map(|ty| ty.type_id()),
        }));

        Ok(())
    }

    fn declare_global_variable(&mut self, v: &VariableDecl) -> SemanticResult<()> {
        let id = Self::identifier(&v.name)?;
        let pos = v.name.position;
        self.check_redeclaration(&id, pos)?;

        let ty = self.resolve_type(&v.ty)?;
        let size = self.size(&ty, v.ty.position())?;
        let value = match &v.value {
            Some(init) => self.literal_initializer(&id, &ty, init)?,
            None => 0,
        };

        self.check_capacity(&id, size, pos)?;
        let handle = self.intern(&ty, pos)?;
        self.resolver.add_symbol(
            &self.file_id,
            Symbol::variable(&id, handle, pos).export(v.external),
        );
        self.memory
            .insert(MemoryElement::value(&id, &ty.type_id(), size, value));
        Ok(())
    }

    /// Declares a constant in the current scope: the data segment outside of
    /// a function, otherwise the stack.
    fn declare_constant(&mut self, c: &ConstantDecl) -> SemanticResult<()> {
        let id = Self::identifier(&c.name)?;
        let pos = c.name.position;
        self.check_redeclaration(&id, pos)?;

        let ty = self.resolve_type(&c.ty)?;
        let size = self.size(&ty, c.ty.position())?;
        let value = self.literal_initializer(&id, &ty, &c.value)?;
        self.check_capacity(&id, size, pos)?;

        let handle = self.intern(&ty, pos)?;
        self.resolver.add_symbol(
            &self.file_id,
            Symbol::constant(&id, handle, pos).export(c.external),
        );

        let element = MemoryElement::value(&id, &ty.type_id(), size, value);
        if self.function.is_some() {
            self.memory.push(element);
        } else {
            self.memory.insert(element);
        }
        Ok(())
    }

    /// Checks an initializer which must be a literal and returns the value
    /// that is stored for it.
    fn literal_initializer(
        &mut self,
        id: &str,
        target: &ExprType,
        init: &Expression,
    ) -> SemanticResult<i64> {
        let token = match &init.kind {
            ExpressionKind::Literal(token) => token,
            _ => {
                return err!(
                    init.position(),
                    SemanticError::InitializerNotLiteral(id.into())
                )
            }
        };

        let ty = self.verify_expression(init)?;
        if !type_rules::is_assignable(target, &ty) {
            return err!(
                init.position(),
                SemanticError::AssignmentMismatch(target.clone(), ty)
            );
        }

        match token.sym {
            Lex::Integer(i) => Ok(i),
            _ => Ok(0),
        }
    }

    fn declare_local_variable(&mut self, v: &VariableDecl) -> SemanticResult<()> {
        let id = Self::identifier(&v.name)?;
        let pos = v.name.position;
        self.check_redeclaration(&id, pos)?;

        let ty = self.resolve_type(&v.ty)?;
        let size = self.size(&ty, v.ty.position())?;

        // the initializer is checked before the variable is visible
        let mut value = 0;
        if let Some(init) = &v.value {
            let init_ty = self.verify_value(init)?;
            if !type_rules::is_assignable(&ty, &init_ty) {
                return err!(
                    init.position(),
                    SemanticError::AssignmentMismatch(ty, init_ty)
                );
            }
            if let ExpressionKind::Literal(Token {
                sym: Lex::Integer(i),
                ..
            }) = &init.kind
            {
                value = *i;
            }
        }

        self.check_capacity(&id, size, pos)?;
        let handle = self.intern(&ty, pos)?;
        self.resolver
            .add_symbol(&self.file_id, Symbol::variable(&id, handle, pos));
        self.memory
            .push(MemoryElement::value(&id, &ty.type_id(), size, value));
        Ok(())
    }

    fn verify_function(&mut self, f: &FunctionDef) -> SemanticResult<()> {
        let id = Self::identifier(&f.name)?;
        debug!("{}: verify function {}", self.file_id, id);

        let return_type = match &f.return_type {
            Some(rt) => Some(self.resolve_type(rt)?),
            None => None,
        };
        let must_return = return_type.is_some();

        self.function = Some(FunctionContext {
            id: id.clone(),
            return_type,
            frame: FunctionFrame::new(&id),
        });

        // parameters and the body of the function share one scope
        self.open_scope();
        for p in &f.parameters {
            let param_id = Self::identifier(&p.name)?;
            let pos = p.name.position;
            self.check_redeclaration(&param_id, pos)?;

            let ty = self.resolve_type(&p.ty)?;
            let size = self.size(&ty, p.ty.position())?;
            self.check_capacity(&param_id, size, pos)?;
            let handle = self.intern(&ty, pos)?;
            self.resolver
                .add_symbol(&self.file_id, Symbol::variable(&param_id, handle, pos));
            self.memory
                .push(MemoryElement::value(&param_id, &ty.type_id(), size, 0));
        }

        for s in &f.body.statements {
            self.verify_statement(s)?;
        }

        if must_return && !always_returns(&f.body) {
            return err!(f.body.close, SemanticError::MissingReturn(id));
        }
        self.close_scope();

        if let Some(ctx) = self.function.take() {
            self.frames.push(ctx.frame);
        }
        Ok(())
    }

    fn verify_block(&mut self, block: &Block) -> SemanticResult<()> {
        self.open_scope();
        for s in &block.statements {
            self.verify_statement(s)?;
        }
        self.close_scope();
        Ok(())
    }

    fn verify_statement(&mut self, statement: &Statement) -> SemanticResult<()> {
        trace!("{}: verify statement at {}", self.file_id, statement.position());
        match statement {
            Statement::Variable(v) => self.declare_local_variable(v),
            Statement::Constant(c) => self.declare_constant(c),
            Statement::Type(t) => self.declare_types(&[t]),
            Statement::Assignment(a) => self.verify_assignment(a),
            Statement::Expression(e) => self.verify_expression(e).map(|_| ()),
            Statement::If(If {
                condition,
                then_block,
                else_block,
                ..
            }) => {
                self.verify_condition(condition)?;
                self.verify_block(then_block)?;
                match else_block {
                    Some(block) => self.verify_block(block),
                    None => Ok(()),
                }
            }
            Statement::While(w) => {
                self.verify_condition(&w.condition)?;
                self.verify_block(&w.body)
            }
            Statement::Return(r) => self.verify_return(r),
            Statement::Block(b) => self.verify_block(b),
        }
    }

    fn verify_condition(&mut self, condition: &Expression) -> SemanticResult<()> {
        let ty = self.verify_value(condition)?;
        if ty.is_integer() {
            Ok(())
        } else {
            err!(condition.position(), SemanticError::InvalidCondition(ty))
        }
    }

    fn verify_assignment(&mut self, a: &Assignment) -> SemanticResult<()> {
        let target = self.verify_value(&a.target)?;

        let root = match a.target.root_identifier() {
            Some(root) => root,
            None => {
                return err!(
                    a.target.position(),
                    InternalError::ExpectedIdentifier(a.op.sym.clone()).into()
                )
            }
        };
        let root_id = Self::identifier(root)?;
        if let Some(Symbol {
            kind: SymbolKind::Constant { .. },
            ..
        }) = self.resolver.lookup(&self.file_id, &root_id)
        {
            return err!(root.position, SemanticError::AssignToConstant(root_id));
        }

        let value = self.verify_value(&a.value)?;
        if !type_rules::is_assignable(&target, &value) {
            return err!(
                a.op.position,
                SemanticError::AssignmentMismatch(target, value)
            );
        }

        Ok(())
    }

    fn verify_return(&mut self, r: &Return) -> SemanticResult<()> {
        let (id, return_type) = match &self.function {
            Some(ctx) => (ctx.id.clone(), ctx.return_type.clone()),
            None => return err!(r.token.position, InternalError::OutsideFunction.into()),
        };

        match (return_type, &r.value) {
            (None, None) => Ok(()),
            (None, Some(_)) => err!(
                r.token.position,
                SemanticError::ReturnValueInVoidFunction(id)
            ),
            (Some(expected), None) => err!(
                r.token.position,
                SemanticError::MissingReturnValue(id, expected)
            ),
            (Some(expected), Some(value)) => {
                let found = self.verify_value(value)?;
                if type_rules::is_assignable(&expected, &found) {
                    Ok(())
                } else {
                    err!(
                        value.position(),
                        SemanticError::ReturnMismatch(id, expected, found)
                    )
                }
            }
        }
    }

    /// Verifies an expression whose result is used as a value.
    fn verify_value(&mut self, expr: &Expression) -> SemanticResult<ExprType> {
        let ty = self.verify_expression(expr)?;
        if ty.is_undefined() {
            err!(expr.position(), SemanticError::NoValue(expr.to_string()))
        } else {
            Ok(ty)
        }
    }

    /// Verifies an expression and records its type.  The only expression
    /// which produces `Undefined` without an error is a call to a function
    /// that has no return type.
    fn verify_expression(&mut self, expr: &Expression) -> SemanticResult<ExprType> {
        let ty = match &expr.kind {
            ExpressionKind::Literal(token) => type_rules::literal_expr_type(token)?,
            ExpressionKind::Identifier(token) => {
                let id = Self::identifier(token)?;
                match self.resolver.lookup(&self.file_id, &id) {
                    None => return err!(token.position, SemanticError::Undeclared(id)),
                    Some(s) if !s.is_value() => {
                        return err!(token.position, SemanticError::NotAValue(id))
                    }
                    Some(_) => (),
                }

                if self.memory.find(&id, false).is_none() {
                    return err!(token.position, InternalError::MissingStorage(id).into());
                }
                type_rules::identifier_type(&id, self.memory)
            }
            ExpressionKind::Binary { left, op, right } if op.sym == Lex::MemberAccess => {
                let lhs = self.verify_value(left)?;
                let field = match &right.kind {
                    ExpressionKind::Identifier(field) => Self::identifier(field)?,
                    _ => {
                        return err!(
                            right.position(),
                            InternalError::ExpectedIdentifier(op.sym.clone()).into()
                        )
                    }
                };

                match &lhs {
                    ExprType::Udt(udt) => {
                        if self.memory.find_udt_field(udt, &field, false).is_none() {
                            return err!(
                                right.position(),
                                SemanticError::UnknownField(udt.clone(), field)
                            );
                        }
                    }
                    _ => return err!(op.position, SemanticError::MemberAccessOnNonUdt(lhs)),
                }
                type_rules::member_type(&lhs, &field, self.memory)
            }
            ExpressionKind::Binary { left, op, right } => {
                let l = self.verify_value(left)?;
                let r = self.verify_value(right)?;
                type_rules::binary_type(op, &l, &r)?
            }
            ExpressionKind::Unary { op, operand } => {
                let ty = self.verify_value(operand)?;
                type_rules::unary_type(op, &ty)?
            }
            ExpressionKind::Call { callee, arguments } => {
                self.verify_call(callee, arguments)?
            }
            ExpressionKind::Index {
                target,
                bracket,
                index,
            } => {
                let t = self.verify_value(target)?;
                let i = self.verify_value(index)?;
                type_rules::index_type(bracket, &t, &i)?
            }
        };

        if let Some(handle) = type_rules::to_symbol_type(&ty, self.resolver) {
            self.expression_types.insert(expr.id, handle);
        }
        Ok(ty)
    }

    fn verify_call(&mut self, callee: &Token, arguments: &[Expression]) -> SemanticResult<ExprType> {
        let id = Self::identifier(callee)?;
        let params = match self.resolver.lookup(&self.file_id, &id) {
            None => return err!(callee.position, SemanticError::Undeclared(id)),
            Some(Symbol {
                kind: SymbolKind::Function {
                    arguments: params, ..
                },
                ..
            }) => params.clone(),
            Some(_) => return err!(callee.position, SemanticError::NotAFunction(id)),
        };

        if params.len() != arguments.len() {
            return err!(
                callee.position,
                SemanticError::WrongArgumentCount(id, params.len(), arguments.len())
            );
        }

        for (idx, (arg, param)) in arguments.iter().zip(params.iter()).enumerate() {
            let found = self.verify_value(arg)?;
            let expected = type_rules::from_symbol_type(param.ty, self.resolver);
            if !type_rules::is_assignable(&expected, &found) {
                return err!(
                    arg.position(),
                    SemanticError::ArgumentMismatch(id, idx + 1, expected, found)
                );
            }
        }

        if self.memory.find(&id, false).is_none() {
            return err!(callee.position, InternalError::MissingStorage(id).into());
        }
        Ok(type_rules::call_type(&id, self.memory))
    }
}

/// Tests whether every path through `block` ends with a return statement.
fn always_returns(block: &Block) -> bool {
    match block.statements.last() {
        Some(Statement::Return(_)) => true,
        Some(Statement::Block(b)) => always_returns(b),
        Some(Statement::If(If {
            then_block,
            else_block: Some(else_block),
            ..
        })) => always_returns(then_block) && always_returns(else_block),
        _ => false,
    }
}
