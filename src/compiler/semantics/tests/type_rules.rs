#[cfg(test)]
mod type_rules_tests {
    use crate::compiler::{
        ast::{Expression, ExpressionKind},
        lexer::tokens::{Lex, Primitive, Token},
        memory::{MemoryElement, MemoryTracker, UdtField, UserDefinedType},
        semantics::{
            type_rules::*, ExprType, SemanticError, SymbolResolver,
        },
        source::Position,
    };

    fn token(sym: Lex) -> Token {
        Token::new(sym, Position::new(1, 1))
    }

    fn lit(i: i64) -> Expression {
        Expression::new(0, ExpressionKind::Literal(token(Lex::Integer(i))))
    }

    fn ident(id: &str) -> Expression {
        Expression::new(0, ExpressionKind::Identifier(token(Lex::Identifier(id.into()))))
    }

    fn binary(left: Expression, op: Lex, right: Expression) -> Expression {
        Expression::new(
            0,
            ExpressionKind::Binary {
                left: Box::new(left),
                op: token(op),
                right: Box::new(right),
            },
        )
    }

    fn prim(p: Primitive) -> ExprType {
        ExprType::Primitive(p)
    }

    fn point_memory() -> MemoryTracker {
        let mut memory = MemoryTracker::new();
        memory.add_udt(UserDefinedType::new(
            "Point",
            vec![
                UdtField {
                    id: "x".into(),
                    type_id: "u8".into(),
                },
                UdtField {
                    id: "y".into(),
                    type_id: "u8".into(),
                },
            ],
        ));
        memory.open_scope();
        memory.push(MemoryElement::value("p", "Point", 2, 0));
        memory
    }

    #[test]
    fn test_literal_types() {
        for (value, expected) in vec![
            (0, Primitive::U8),
            (255, Primitive::U8),
            (256, Primitive::U16),
            (65535, Primitive::U16),
            (65536, Primitive::U32),
            (4294967295, Primitive::U32),
            (-1, Primitive::S8),
            (-127, Primitive::S8),
            (-128, Primitive::S8),
            (-129, Primitive::S16),
            (-32768, Primitive::S16),
            (-32769, Primitive::S32),
        ] {
            assert_eq!(literal_type(value), expected, "{}", value);
        }
    }

    #[test]
    fn test_string_literal() {
        let t = token(Lex::StringLiteral("hello".into()));
        assert_eq!(literal_expr_type(&t), Ok(prim(Primitive::String)));

        let err = literal_expr_type(&token(Lex::Comma)).unwrap_err();
        assert!(err.inner().is_internal());
    }

    #[test]
    fn test_widening() {
        let memory = MemoryTracker::new();

        let expr = binary(lit(5), Lex::Add, lit(1000));
        assert_eq!(expression_type(&expr, &memory), Ok(prim(Primitive::U16)));

        let expr = binary(lit(1000), Lex::Add, lit(5));
        assert_eq!(expression_type(&expr, &memory), Ok(prim(Primitive::U16)));
    }

    #[test]
    fn test_mixed_sign_is_unsigned() {
        let memory = MemoryTracker::new();

        let expr = binary(lit(-1), Lex::Add, lit(5));
        assert_eq!(expression_type(&expr, &memory), Ok(prim(Primitive::U8)));

        let expr = binary(lit(-1000), Lex::Mul, lit(5));
        assert_eq!(expression_type(&expr, &memory), Ok(prim(Primitive::U16)));

        let expr = binary(lit(-1), Lex::Minus, lit(-1));
        assert_eq!(expression_type(&expr, &memory), Ok(prim(Primitive::S8)));
    }

    #[test]
    fn test_ties_go_to_the_right() {
        assert_eq!(
            binary_result(&prim(Primitive::U32), &prim(Primitive::String)),
            Some(prim(Primitive::String))
        );
        assert_eq!(
            binary_result(&prim(Primitive::S16), &prim(Primitive::S16)),
            Some(prim(Primitive::S16))
        );
    }

    #[test]
    fn test_undefined_propagates() {
        let memory = MemoryTracker::new();
        let expr = binary(ident("nothing"), Lex::Add, lit(5));
        assert_eq!(expression_type(&expr, &memory), Ok(ExprType::Undefined));
    }

    #[test]
    fn test_identifiers_resolve_through_memory() {
        let mut memory = point_memory();
        memory.insert(MemoryElement::value("g", "u32", 4, 0));
        memory.push(MemoryElement::value("grid", "u8[3][2]", 6, 0));

        assert_eq!(identifier_type("g", &memory), prim(Primitive::U32));
        assert_eq!(identifier_type("p", &memory), ExprType::Udt("Point".into()));
        assert_eq!(
            identifier_type("grid", &memory),
            ExprType::Array {
                element: Box::new(prim(Primitive::U8)),
                dimensions: vec![3, 2]
            }
        );
        assert_eq!(identifier_type("q", &memory), ExprType::Undefined);
    }

    #[test]
    fn test_member_access() {
        let memory = point_memory();

        let expr = binary(ident("p"), Lex::MemberAccess, ident("y"));
        assert_eq!(expression_type(&expr, &memory), Ok(prim(Primitive::U8)));

        let expr = binary(ident("p"), Lex::MemberAccess, ident("z"));
        assert_eq!(expression_type(&expr, &memory), Ok(ExprType::Undefined));

        let expr = binary(lit(2), Lex::MemberAccess, ident("x"));
        assert_eq!(expression_type(&expr, &memory), Ok(ExprType::Undefined));
    }

    #[test]
    fn test_member_access_requires_identifier() {
        let memory = point_memory();
        let expr = binary(ident("p"), Lex::MemberAccess, lit(1));
        let err = expression_type(&expr, &memory).unwrap_err();
        assert!(err.inner().is_internal());
    }

    #[test]
    fn test_udt_operands_must_match() {
        let memory = point_memory();

        let expr = binary(ident("p"), Lex::Add, ident("p"));
        assert_eq!(
            expression_type(&expr, &memory),
            Ok(ExprType::Udt("Point".into()))
        );

        let expr = binary(ident("p"), Lex::Add, lit(1));
        let err = expression_type(&expr, &memory).unwrap_err();
        assert_eq!(
            err.inner(),
            &SemanticError::BinaryOperandMismatch(
                Lex::Add,
                ExprType::Udt("Point".into()),
                prim(Primitive::U8)
            )
        );

        // a udt on the right of a primitive is also a mismatch
        assert_eq!(
            binary_result(&prim(Primitive::U8), &ExprType::Udt("Point".into())),
            None
        );
    }

    #[test]
    fn test_assignability() {
        let u8_ty = prim(Primitive::U8);
        let u16_ty = prim(Primitive::U16);
        let s8_ty = prim(Primitive::S8);
        let string_ty = prim(Primitive::String);
        let point = ExprType::Udt("Point".into());

        assert!(is_assignable(&u16_ty, &u8_ty));
        assert!(!is_assignable(&u8_ty, &u16_ty));
        assert!(is_assignable(&u8_ty, &s8_ty));
        assert!(is_assignable(&string_ty, &string_ty));
        assert!(!is_assignable(&string_ty, &u8_ty));
        assert!(!is_assignable(&prim(Primitive::U32), &string_ty));
        assert!(is_assignable(&point, &point));
        assert!(!is_assignable(&point, &ExprType::Udt("Size".into())));
        assert!(!is_assignable(&u8_ty, &ExprType::Undefined));
    }

    #[test]
    fn test_unary_and_index() {
        let neg = token(Lex::Minus);
        assert_eq!(unary_type(&neg, &prim(Primitive::S16)), Ok(prim(Primitive::S16)));
        assert!(unary_type(&neg, &prim(Primitive::String)).is_err());
        assert!(unary_type(&neg, &ExprType::Udt("Point".into())).is_err());

        let bracket = token(Lex::LBracket);
        let grid = ExprType::from_type_id("u8[3][2]");
        let row = index_type(&bracket, &grid, &prim(Primitive::U8)).unwrap();
        assert_eq!(row, ExprType::from_type_id("u8[2]"));
        assert_eq!(
            index_type(&bracket, &row, &prim(Primitive::U16)),
            Ok(prim(Primitive::U8))
        );
        assert_eq!(
            index_type(&bracket, &grid, &prim(Primitive::String))
                .unwrap_err()
                .inner(),
            &SemanticError::InvalidIndexType(prim(Primitive::String))
        );
        assert_eq!(
            index_type(&bracket, &prim(Primitive::U8), &prim(Primitive::U8))
                .unwrap_err()
                .inner(),
            &SemanticError::InvalidIndexTarget(prim(Primitive::U8))
        );
    }

    #[test]
    fn test_type_ids() {
        for id in vec!["u8", "string", "Point", "u16[4]", "Point[2][3]", "<undefined>"] {
            assert_eq!(ExprType::from_type_id(id).type_id(), id);
        }
        assert_eq!(ExprType::from_type_id("u8[x]"), ExprType::Undefined);
    }

    #[test]
    fn test_storage_size() {
        let mut memory = point_memory();
        memory.add_udt(UserDefinedType::new(
            "Line",
            vec![
                UdtField {
                    id: "from".into(),
                    type_id: "Point".into(),
                },
                UdtField {
                    id: "to".into(),
                    type_id: "Point".into(),
                },
                UdtField {
                    id: "width".into(),
                    type_id: "u16".into(),
                },
            ],
        ));

        assert_eq!(storage_size(&prim(Primitive::String), &memory), Ok(4));
        assert_eq!(storage_size(&ExprType::Udt("Line".into()), &memory), Ok(6));
        assert_eq!(
            storage_size(&ExprType::from_type_id("Line[2][2]"), &memory),
            Ok(24)
        );
        assert_eq!(
            storage_size(&ExprType::Udt("Missing".into()), &memory),
            Err(SizeError::UnknownType("Missing".into()))
        );
        assert_eq!(
            storage_size(&ExprType::Undefined, &memory),
            Err(SizeError::Undefined)
        );
    }

    #[test]
    fn test_recursive_size() {
        let mut memory = MemoryTracker::new();
        memory.add_udt(UserDefinedType::new(
            "Node",
            vec![UdtField {
                id: "next".into(),
                type_id: "Node".into(),
            }],
        ));
        assert_eq!(
            storage_size(&ExprType::Udt("Node".into()), &memory),
            Err(SizeError::Recursive("Node".into()))
        );
    }

    #[test]
    fn test_size_limit() {
        let mut memory = MemoryTracker::new();
        memory.add_udt(UserDefinedType::new(
            "Big",
            vec![
                UdtField {
                    id: "bytes".into(),
                    type_id: "u8[4294967295]".into(),
                },
                UdtField {
                    id: "tail".into(),
                    type_id: "u8".into(),
                },
            ],
        ));

        assert_eq!(
            storage_size(&ExprType::from_type_id("u8[4294967295]"), &memory),
            Ok(MAX_STORAGE_SIZE)
        );
        assert_eq!(
            storage_size(&ExprType::from_type_id("u16[2147483648]"), &memory),
            Err(SizeError::TooLarge("u16[2147483648]".into()))
        );
        assert_eq!(
            storage_size(
                &ExprType::from_type_id("u32[4294967295][4294967295][4294967295]"),
                &memory
            ),
            Err(SizeError::TooLarge(
                "u32[4294967295][4294967295][4294967295]".into()
            ))
        );
        assert_eq!(
            storage_size(&ExprType::Udt("Big".into()), &memory),
            Err(SizeError::TooLarge("Big".into()))
        );
    }

    #[test]
    fn test_symbol_type_conversion() {
        let mut resolver = SymbolResolver::new();
        let grid = ExprType::from_type_id("Point[3][2]");

        let a = to_symbol_type(&grid, &mut resolver).unwrap();
        let b = to_symbol_type(&ExprType::from_type_id("Point[3][2]"), &mut resolver).unwrap();
        assert_eq!(a, b);
        assert_eq!(from_symbol_type(a, &resolver), grid);
        assert_eq!(resolver.type_id(a).as_deref(), Some("Point[3][2]"));

        assert_eq!(to_symbol_type(&ExprType::Undefined, &mut resolver), None);
    }
}
