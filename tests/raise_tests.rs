// tests/raise_tests.rs

use tql_lang::ast::{Expression, LiteralKind, Operand};
use tql_lang::el::{ElLiteral, ElNode, parse_el};
use tql_lang::error::TqlError;
use tql_lang::field_types::FieldTypes;
use tql_lang::lower::{LoweringPolicy, lower_for_runtime, lower_for_storage, lower_generic};
use tql_lang::parser::parse;
use tql_lang::raise::{literal_value, raise, raise_str, raise_str_with_policy, raise_with_policy};
use tql_lang::TqlElement;

fn raised(el: &str) -> String {
    raise_str(el).unwrap().to_query_string()
}

fn raised_runtime(el: &str) -> String {
    raise_str_with_policy(el, &LoweringPolicy::runtime())
        .unwrap()
        .to_query_string()
}

fn assert_unsupported(el: &str) {
    match raise_str(el) {
        Err(TqlError::Unsupported(_)) => {}
        other => panic!("Expected unsupported construct for {}, got {:?}", el, other),
    }
}

fn types() -> FieldTypes {
    FieldTypes::new().with("name", "STRING").with("age", "INTEGER")
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_comparisons() {
    let cases = vec![
        ("age == 18", "(age = 18)"),
        ("age != 18", "(age != 18)"),
        ("age < 18", "(age < 18)"),
        ("age > 18", "(age > 18)"),
        ("age <= 18", "(age <= 18)"),
        ("age >= 18", "(age >= 18)"),
        ("start < end", "(start < end)"),
        ("name == 'x'", "(name = 'x')"),
        ("flag == false", "(flag = false)"),
    ];

    for (el, expected) in cases {
        assert_eq!(raised(el), expected, "Failed for {}", el);
    }
}

#[test]
fn test_literal_on_the_left_is_flipped() {
    assert_eq!(raised("10 < age"), "(age > 10)");
    assert_eq!(raised("10 >= age"), "(age <= 10)");
    assert_eq!(raised("'x' == name"), "(name = 'x')");
}

#[test]
fn test_assignment_reads_as_equality() {
    assert_eq!(raised("age = 18"), "(age = 18)");
}

#[test]
fn test_logical_operators() {
    assert_eq!(raised("a == 1 && b == 2"), "((a = 1) and (b = 2))");
    assert_eq!(raised("a == 1 || b == 2"), "(a = 1) or (b = 2)");
    assert_eq!(
        raised("a == 1 && (b == 2 || c == 3)"),
        "((a = 1) and ((b = 2) or (c = 3)))"
    );
    assert_eq!(raised("!(a == 1)"), "(not ((a = 1)))");
    assert_eq!(raised("not(a == 1)"), "(not ((a = 1)))");
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_functions() {
    let cases = vec![
        ("isNull(name)", "(name is null)"),
        ("isEmpty(name)", "(name is empty)"),
        ("isValid(name, 'STRING')", "(name is valid)"),
        ("isInvalid(name)", "(name is invalid)"),
        ("hasEmpty(*)", "(* is empty)"),
        ("hasInvalid(*)", "(* is invalid)"),
        ("matches(name, '^[A-Z]')", "(name ~ '^[A-Z]')"),
        ("contains(name, 'oh')", "(name contains 'oh')"),
        ("contains(name, 'oh', true)", "(name contains 'oh')"),
        ("contains(name, 'oh', false)", "(name containsIgnoreCase 'oh')"),
        ("between(age, 18, 65)", "(age between [18, 65])"),
        ("between(age, 18, 65, true, false)", "(age between ]18, 65])"),
        ("between(age, 18, 65, false, true)", "(age between [18, 65[)"),
        ("between(price, 1, 2.5)", "(price between [1, 2.5])"),
        ("in(code, 11, 22.22, true)", "(code in [11, 22.22, true])"),
        ("isPresentIn(code, 'a', 'b')", "(code in ['a', 'b'])"),
        ("complies(code, 'AA-99')", "(code complies 'AA-99')"),
        ("wordComplies(name, '[Word]')", "(name wordComplies '[Word]')"),
    ];

    for (el, expected) in cases {
        assert_eq!(raised(el), expected, "Failed for {}", el);
    }
}

#[test]
fn test_invalid_arguments() {
    let cases = vec![
        "isNull()",
        "isNull(name, 1)",
        "isNull('name')",
        "matches(name, 1)",
        "contains(name, 'x', 'yes')",
        "between(age, 18)",
        "between(age, low, 65)",
        "between(age, 1, 'z')",
        "between(age, true, false)",
        "in(code)",
        "in(code, other)",
        "hasEmpty(name)",
    ];

    for el in cases {
        match raise_str(el) {
            Err(TqlError::Semantic(_)) => {}
            other => panic!("Expected semantic error for {}, got {:?}", el, other),
        }
    }
}

// ============================================================================
// Rejected Constructs
// ============================================================================

#[test]
fn test_unsupported_constructs() {
    let cases = vec![
        "a + 1 > 2",
        "a * 2",
        "if (a == 1) { b == 2 } else { c == 3 }",
        "switch (a) { case 1: b == 1 default: c == 1 }",
        "[1, 2, 3]",
        "{ a == 1; b == 2 }",
        "1 == 2",
        "name",
        "42",
        "!(name)",
        "unknownFn(a)",
        "a == 1 && a * 2 > 3",
    ];

    for el in cases {
        assert_unsupported(el);
    }
}

#[test]
fn test_syntax_errors_are_not_unsupported() {
    let err = raise_str("a == ").unwrap_err();
    assert!(err.is_syntax());
}

// ============================================================================
// Literal Kinds
// ============================================================================

#[test]
fn test_literal_kinds() {
    let cases = vec![
        ("x == 123", LiteralKind::Int, "123"),
        ("x == 3000000000L", LiteralKind::Int, "3000000000"),
        ("x == 99999999999999999999", LiteralKind::Int, "99999999999999999999"),
        ("x == 99.20", LiteralKind::Decimal, "99.20"),
        ("x == 999d", LiteralKind::Decimal, "999.0"),
        ("x == 12.5d", LiteralKind::Decimal, "12.5"),
        ("x == -7", LiteralKind::Int, "-7"),
        ("x == -9223372036854775808L", LiteralKind::Int, "-9223372036854775808"),
        ("x == 9223372036854775807L", LiteralKind::Int, "9223372036854775807"),
        ("x == true", LiteralKind::Boolean, "true"),
        ("x == 'abc'", LiteralKind::QuotedValue, "abc"),
    ];

    for (el, kind, value) in cases {
        match raise_str(el).unwrap() {
            Expression::Or(branches) => match &branches[0] {
                Expression::And(children) => match &children[0] {
                    Expression::Comparison {
                        value: Operand::Literal(literal),
                        ..
                    } => {
                        assert_eq!(literal.kind, kind, "Failed for {}", el);
                        assert_eq!(literal.value, value, "Failed for {}", el);
                    }
                    other => panic!("Expected comparison, got {:?}", other),
                },
                other => panic!("Expected And, got {:?}", other),
            },
            other => panic!("Expected Or, got {:?}", other),
        }
    }
}

#[test]
fn test_min_long_literal() {
    match parse_el("x == -9223372036854775808L").unwrap() {
        ElNode::Compare { right, .. } => {
            assert_eq!(*right, ElNode::Literal(ElLiteral::Long(i64::MIN)))
        }
        other => panic!("Expected comparison, got {:?}", other),
    }
    assert_eq!(
        ElNode::Literal(ElLiteral::Long(i64::MIN)).to_string(),
        "-9223372036854775808L"
    );

    assert!(parse_el("x == 9223372036854775808L").unwrap_err().is_syntax());
    assert!(parse_el("x == -9223372036854775809L").unwrap_err().is_syntax());
}

#[test]
fn test_literal_value_mapping() {
    assert_eq!(literal_value(&ElLiteral::Int(5)).kind, LiteralKind::Int);
    assert_eq!(literal_value(&ElLiteral::Long(5)).kind, LiteralKind::Int);
    assert_eq!(literal_value(&ElLiteral::Double(0.25)).value, "0.25");
    assert_eq!(
        literal_value(&ElLiteral::String("it's".to_string())).kind,
        LiteralKind::QuotedValue
    );
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_generic_round_trip() {
    let queries = vec![
        "(field1 = 123)",
        "(field1 = 3000000000)",
        "(field1 = -9223372036854775808)",
        "(field1 != 'abc')",
        "(price >= 99.20)",
        "(start < end)",
        "(flag = true)",
        "(field1 between [123, 456])",
        "(field1 between ]1.5, 2[)",
        "(field1 in [11, 22.22, true])",
        "(name ~ '^[A-Z][a-z]*$')",
        "(name ~ '\\d+\\.\\d+')",
        "(name contains 'oh')",
        "(name containsIgnoreCase 'OH')",
        "(name = 'O\\'Brien')",
        "(name is null)",
        "(name is empty)",
        "(name is valid)",
        "(age is invalid)",
        "((a = 1) and (b = 2)) or (c = -3)",
        "((a = 1) and ((b = 2) or (c = 3)))",
        "(not ((a = 1) or (b = 2)))",
        "((not ((a = 1))) and (not ((b = 2))))",
    ];

    for query in queries {
        let expr = parse(query).unwrap();
        let el = lower_generic(&expr, Some(&types())).unwrap().to_string();
        let back = raise_str(&el).unwrap();
        assert_eq!(back, expr, "Round trip through '{}' failed", el);
        assert_eq!(back.to_query_string(), query);
    }
}

#[test]
fn test_storage_round_trip() {
    for query in ["(* is empty)", "(* is invalid) or (name is null)"] {
        let expr = parse(query).unwrap();
        let el = lower_for_storage(&expr, None).unwrap();
        assert_eq!(raise(&el).unwrap().to_query_string(), query);
    }
}

#[test]
fn test_user_regex_survives_generic_round_trip() {
    let query = r"((a ~ '^-?\d+(\.\d+)?$') and (a > 1))";
    let expr = parse(query).unwrap();
    let el = lower_generic(&expr, None).unwrap();
    assert_eq!(el.to_string(), r"matches(a, '^-?\d+(\.\d+)?$') && a > 1");

    assert_eq!(raise(&el).unwrap(), expr);
    assert_eq!(raise_str(&el.to_string()).unwrap().to_query_string(), query);
}

#[test]
fn test_runtime_round_trip_drops_numeric_guards() {
    let queries = vec![
        "(age > 18)",
        "(age <= -2.5)",
        "(start <= end)",
        "((age < 10) and (name contains 'x')) or (age > 60)",
    ];

    for query in queries {
        let expr = parse(query).unwrap();
        let lowered = lower_for_runtime(&expr, Some(&types())).unwrap();
        let el = lowered.to_string();
        assert_eq!(raised_runtime(&el), query, "Round trip through '{}' failed", el);
        assert_eq!(
            raise_with_policy(&lowered, &LoweringPolicy::runtime()).unwrap(),
            expr
        );
    }
}

#[test]
fn test_runtime_round_trip_keeps_user_guards() {
    let queries = vec![
        r"((a ~ '^-?\d+(\.\d+)?$') and (a > 1))",
        r"((a ~ '^-?\d+(\.\d+)?$') and (a > 1) and (b = 2))",
        r"((a ~ '^-?\d+(\.\d+)?$') and (b ~ '^-?\d+(\.\d+)?$') and (a = b))",
    ];

    for query in queries {
        let expr = parse(query).unwrap();
        let el = lower_for_runtime(&expr, None).unwrap().to_string();
        assert_eq!(raised_runtime(&el), query, "Round trip through '{}' failed", el);
    }
}

#[test]
fn test_guards_kept_without_runtime_policy() {
    let el = r"matches(age, '^-?\d+(\.\d+)?$') && age > 18";
    assert_eq!(raised(el), r"((age ~ '^-?\d+(\.\d+)?$') and (age > 18))");
    assert_eq!(raised_runtime(el), "(age > 18)");
}

#[test]
fn test_lone_guard_is_kept() {
    let el = r"matches(age, '^-?\d+(\.\d+)?$') && name == 'x'";
    let expected = r"((age ~ '^-?\d+(\.\d+)?$') and (name = 'x'))";
    assert_eq!(raised(el), expected);
    assert_eq!(raised_runtime(el), expected);
}

#[test]
fn test_guard_on_another_path_is_kept() {
    let el = r"matches(b, '^-?\d+(\.\d+)?$') && a > 1";
    assert_eq!(
        raised_runtime(el),
        r"((b ~ '^-?\d+(\.\d+)?$') and (a > 1))"
    );
}

#[test]
fn test_patterns_come_back_as_regex() {
    let expr = parse("code complies 'A9'").unwrap();
    let el = lower_generic(&expr, None).unwrap();
    let back = raise(&el).unwrap();

    match &back {
        Expression::Or(branches) => match &branches[0] {
            Expression::And(children) => {
                assert!(matches!(children[0], Expression::Matches { .. }))
            }
            other => panic!("Expected And, got {:?}", other),
        },
        other => panic!("Expected Or, got {:?}", other),
    }
}

#[test]
fn test_raise_tree_directly() {
    let node = ElNode::And(vec![
        ElNode::call("isNull", vec![ElNode::path("a")]),
        parse_el("b > 2").unwrap(),
    ]);
    assert_eq!(
        raise(&node).unwrap().to_query_string(),
        "((a is null) and (b > 2))"
    );
}
