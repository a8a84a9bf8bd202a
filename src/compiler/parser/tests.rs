#[cfg(test)]
pub mod tests {
    use crate::compiler::ast::*;
    use crate::compiler::lexer::tokens::{Lex, Primitive, Token};
    use crate::compiler::parser::{parse, ParserError};
    use crate::compiler::source::Position;
    use crate::compiler::{CompilerError, Lexer};

    fn parse_text(text: &str) -> Result<Module, CompilerError<ParserError>> {
        let tokens: Vec<Token> = Lexer::new(text)
            .tokenize()
            .into_iter()
            .collect::<Result<_, _>>()
            .expect("Expected valid tokens");
        parse("test.sprig", &tokens)
    }

    fn function_body(text: &str) -> Vec<Statement> {
        let module = parse_text(text).unwrap();
        let statements = module.functions().next().unwrap().body.statements.clone();
        statements
    }

    /// Parses `text` as the initializer of a global variable.
    fn parse_expression(text: &str) -> Expression {
        let module = parse_text(&format!("var x: u32 = {};", text)).unwrap();
        match &module.items()[0] {
            Item::Variable(VariableDecl { value: Some(e), .. }) => e.clone(),
            other => panic!("Expected variable, found {:?}", other),
        }
    }

    #[test]
    fn parse_empty_file() {
        let module = parse_text("").unwrap();
        assert_eq!(module.file_id(), "test.sprig");
        assert!(module.items().is_empty());
    }

    #[test]
    fn parse_import() {
        let module = parse_text("import \"lib/math.sprig\";").unwrap();
        let imports: Vec<_> = module.imports().collect();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].file, "lib/math.sprig");
        assert_eq!(imports[0].token.position, Position::new(1, 1));
    }

    #[test]
    fn parse_import_requires_path() {
        let err = parse_text("import math;").unwrap_err();
        assert_eq!(err.inner(), &ParserError::ExpectedImportPath);
    }

    #[test]
    fn parse_type_def() {
        let module = parse_text("export type Point { x: u8, y: s16[2], }").unwrap();
        let udt = module.types().next().unwrap();
        assert!(udt.external);
        assert_eq!(udt.id(), "Point");
        assert_eq!(udt.fields.len(), 2);
        assert_eq!(udt.fields[0].name.identifier(), Some("x"));
        assert_eq!(udt.fields[0].ty.primitive(), Some(Primitive::U8));
        assert_eq!(udt.fields[1].ty.to_string(), "s16[2]");
    }

    #[test]
    fn parse_function_def() {
        let module = parse_text("fn add(a: u8, b: Point) -> u16 { return a; }").unwrap();
        let f = module.functions().next().unwrap();
        assert!(!f.external);
        assert_eq!(f.id(), "add");
        assert_eq!(f.parameters.len(), 2);
        assert_eq!(f.parameters[1].ty.base_name(), "Point");
        assert_eq!(f.return_type.as_ref().unwrap().primitive(), Some(Primitive::U16));
        assert_eq!(f.body.statements.len(), 1);
        assert!(matches!(f.body.statements[0], Statement::Return(_)));
    }

    #[test]
    fn parse_globals() {
        let module = parse_text("export var count: u16 = 3; const LIMIT: u8 = 10; var buf: u8[4][2];").unwrap();
        assert_eq!(module.items().len(), 3);
        match &module.items()[0] {
            Item::Variable(v) => {
                assert!(v.external);
                assert_eq!(v.name.identifier(), Some("count"));
            }
            other => panic!("Expected variable, found {:?}", other),
        }
        assert!(matches!(&module.items()[1], Item::Constant(c) if !c.external));
        match &module.items()[2] {
            Item::Variable(v) => {
                assert!(v.value.is_none());
                let dims: Vec<i64> = v.ty.dimensions.iter().map(|(d, _)| *d).collect();
                assert_eq!(dims, vec![4, 2]);
            }
            other => panic!("Expected variable, found {:?}", other),
        }
    }

    #[test]
    fn parse_export_requires_declaration() {
        let err = parse_text("export import \"a\";").unwrap_err();
        assert_eq!(err.inner(), &ParserError::ExportNotAllowed(Some(Lex::Import)));
    }

    #[test]
    fn parse_unexpected_top_level_token() {
        let err = parse_text("x = 5;").unwrap_err();
        assert_eq!(
            err.inner(),
            &ParserError::ExpectedDeclaration(Some(Lex::Identifier("x".into())))
        );
    }

    #[test]
    fn parse_missing_semicolon() {
        let err = parse_text("var x: u8 = 5").unwrap_err();
        assert_eq!(
            err.inner(),
            &ParserError::ExpectedButFound(vec![Lex::Semicolon], None)
        );
    }

    #[test]
    fn parse_array_dimension_must_be_integer() {
        let err = parse_text("var x: u8[n];").unwrap_err();
        assert_eq!(err.inner(), &ParserError::ExpectedArrayDimension);
        assert_eq!(err.position(), Position::new(1, 10));
    }

    #[test]
    fn parse_precedence() {
        let e = parse_expression("1 + 2 * 3 - 4");
        assert_eq!(e.to_string(), "((1 + (2 * 3)) - 4)");

        let e = parse_expression("a << 1 == b & c || d && e");
        assert_eq!(e.to_string(), "((((a << 1) == b) & c) || (d && e))");

        let e = parse_expression("(1 + 2) * 3");
        assert_eq!(e.to_string(), "((1 + 2) * 3)");
    }

    #[test]
    fn parse_negative_literal_folds() {
        let e = parse_expression("-5");
        match e.kind {
            ExpressionKind::Literal(t) => {
                assert_eq!(t.sym, Lex::Integer(-5));
                assert_eq!(t.position, Position::new(1, 14));
            }
            other => panic!("Expected literal, found {:?}", other),
        }

        let e = parse_expression("-x");
        assert!(matches!(e.kind, ExpressionKind::Unary { .. }));
    }

    #[test]
    fn parse_member_access_and_index() {
        let e = parse_expression("p.xs[i + 1].y");
        assert_eq!(e.to_string(), "p.xs[(i + 1)].y");
        assert_eq!(e.root_identifier().and_then(|t| t.identifier()), Some("p"));
        match e.kind {
            ExpressionKind::Binary { op, right, .. } => {
                assert_eq!(op.sym, Lex::MemberAccess);
                assert!(matches!(right.kind, ExpressionKind::Identifier(_)));
            }
            other => panic!("Expected member access, found {:?}", other),
        }
    }

    #[test]
    fn parse_call() {
        let e = parse_expression("add(1, f(), x.y)");
        assert_eq!(e.to_string(), "add(1, f(), x.y)");
        match e.kind {
            ExpressionKind::Call { callee, arguments } => {
                assert_eq!(callee.identifier(), Some("add"));
                assert_eq!(arguments.len(), 3);
            }
            other => panic!("Expected call, found {:?}", other),
        }
    }

    #[test]
    fn parse_node_ids_are_unique() {
        fn collect(e: &Expression, ids: &mut Vec<NodeId>) {
            ids.push(e.id);
            match &e.kind {
                ExpressionKind::Literal(_) | ExpressionKind::Identifier(_) => (),
                ExpressionKind::Unary { operand, .. } => collect(operand, ids),
                ExpressionKind::Binary { left, right, .. } => {
                    collect(left, ids);
                    collect(right, ids);
                }
                ExpressionKind::Call { arguments, .. } => {
                    arguments.iter().for_each(|a| collect(a, ids))
                }
                ExpressionKind::Index { target, index, .. } => {
                    collect(target, ids);
                    collect(index, ids);
                }
            }
        }

        let e = parse_expression("f(a.b, c[1] + -d, 7)");
        let mut ids = vec![];
        collect(&e, &mut ids);
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn parse_statements() {
        let stms = function_body(
            "fn main() {
                var x: u8 = 1;
                const y: u8 = 2;
                type Pair { a: u8, b: u8 }
                x = x + y;
                tick();
                { var z: u8; }
                while x < 10 { x = x + 1; }
                return;
            }",
        );
        assert_eq!(stms.len(), 8);
        assert!(matches!(stms[0], Statement::Variable(_)));
        assert!(matches!(stms[1], Statement::Constant(_)));
        assert!(matches!(stms[2], Statement::Type(_)));
        assert!(matches!(stms[3], Statement::Assignment(_)));
        assert!(matches!(stms[4], Statement::Expression(_)));
        assert!(matches!(stms[5], Statement::Block(_)));
        assert!(matches!(stms[6], Statement::While(_)));
        assert!(matches!(stms[7], Statement::Return(Return { value: None, .. })));
    }

    #[test]
    fn parse_if_else_chain() {
        let stms = function_body("fn f() { if a { } else if b { x = 1; } else { x = 2; } }");
        assert_eq!(stms.len(), 1);
        match &stms[0] {
            Statement::If(i) => {
                let else_block = i.else_block.as_ref().unwrap();
                assert_eq!(else_block.statements.len(), 1);
                match &else_block.statements[0] {
                    Statement::If(nested) => assert!(nested.else_block.is_some()),
                    other => panic!("Expected nested if, found {:?}", other),
                }
            }
            other => panic!("Expected if, found {:?}", other),
        }
    }

    #[test]
    fn parse_invalid_assignment_target() {
        let err = parse_text("fn f() { 1 + 2 = 3; }").unwrap_err();
        assert_eq!(err.inner(), &ParserError::InvalidAssignmentTarget);
    }

    #[test]
    fn parse_unclosed_block() {
        let err = parse_text("fn f() { var x: u8;").unwrap_err();
        assert_eq!(
            err.inner(),
            &ParserError::ExpectedButFound(vec![Lex::RBrace], None)
        );
    }

    #[test]
    fn parse_missing_operand() {
        let err = parse_text("var x: u8 = 1 +;").unwrap_err();
        assert_eq!(err.inner(), &ParserError::ExpectedExpressionAfter(Lex::Add));
    }

    #[test]
    fn parse_missing_type() {
        let err = parse_text("var x: = 1;").unwrap_err();
        assert_eq!(err.inner(), &ParserError::ExpectedTypeAfter(Lex::Colon));
    }
}
