//! Property-based tests for the canonical form and the EL bridge.
//!
//! Random canonical queries must survive printing and re-parsing unchanged,
//! and generic lowering followed by raising must give the same tree back.
//!
//! Run with: `cargo test --test roundtrip_proptest`

use proptest::prelude::*;

use tql_lang::ast::builder::{
    and, between_bounds, compare_fields, complies, contains, contains_ignore_case, eq, gt, gte,
    in_values, is_empty, is_invalid, is_null, is_valid, lt, lte, matches, neq, not, or,
    word_complies,
};
use tql_lang::ast::{ComparisonOperator, Expression, LiteralValue};
use tql_lang::field_types::FieldTypes;
use tql_lang::lower::lower_generic;
use tql_lang::parser::parse;
use tql_lang::raise::raise_str;
use tql_lang::{Lexer, TqlElement};

const FIELDS: [&str; 5] = ["age", "name", "code", "address.city", "price"];

fn types() -> FieldTypes {
    FIELDS.iter().map(|field| (*field, "STRING")).collect()
}

// =============================================================================
// Strategies
// =============================================================================

fn field() -> impl Strategy<Value = &'static str> {
    prop::sample::select(FIELDS.to_vec())
}

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ']{0,8}"
}

fn int_literal() -> impl Strategy<Value = LiteralValue> {
    prop_oneof![
        8 => -1_000_000_000_000i64..1_000_000_000_000,
        1 => Just(i64::MIN),
        1 => Just(i64::MAX),
    ]
    .prop_map(LiteralValue::int)
}

fn decimal_literal() -> impl Strategy<Value = LiteralValue> {
    (any::<bool>(), 0u32..10_000, 1u32..100).prop_map(|(negative, whole, fraction)| {
        let sign = if negative { "-" } else { "" };
        LiteralValue::decimal(format!("{}{}.{:02}", sign, whole, fraction))
    })
}

fn numeric_literal() -> impl Strategy<Value = LiteralValue> {
    prop_oneof![int_literal(), decimal_literal()]
}

fn literal() -> impl Strategy<Value = LiteralValue> {
    prop_oneof![
        int_literal(),
        decimal_literal(),
        any::<bool>().prop_map(LiteralValue::boolean),
        text().prop_map(LiteralValue::quoted),
    ]
}

/// Single predicates wrapped in their canonical `Or[And[...]]`.
fn predicate(with_patterns: bool) -> BoxedStrategy<Expression> {
    let common = prop_oneof![
        (field(), literal()).prop_map(|(f, v)| eq(f, v)),
        (field(), literal()).prop_map(|(f, v)| neq(f, v)),
        (field(), literal()).prop_map(|(f, v)| lt(f, v)),
        (field(), literal()).prop_map(|(f, v)| gt(f, v)),
        (field(), literal()).prop_map(|(f, v)| lte(f, v)),
        (field(), literal()).prop_map(|(f, v)| gte(f, v)),
        (field(), field()).prop_map(|(a, b)| compare_fields(a, ComparisonOperator::Lt, b)),
        (
            field(),
            numeric_literal(),
            numeric_literal(),
            any::<bool>(),
            any::<bool>()
        )
            .prop_map(|(f, l, r, lo, uo)| between_bounds(f, l, r, lo, uo)),
        (field(), prop::collection::vec(literal(), 1..4)).prop_map(|(f, v)| in_values(f, v)),
        (field(), text()).prop_map(|(f, v)| contains(f, v)),
        (field(), text()).prop_map(|(f, v)| contains_ignore_case(f, v)),
        (field(), "[a-z.*^$]{0,6}").prop_map(|(f, r)| matches(f, r)),
        field().prop_map(|f| is_null(f)),
        field().prop_map(|f| is_empty(f)),
        field().prop_map(|f| is_valid(f)),
        field().prop_map(|f| is_invalid(f)),
    ];

    if with_patterns {
        prop_oneof![
            8 => common,
            1 => (field(), "[Aa9 -]{0,6}").prop_map(|(f, p)| complies(f, p)),
            1 => (field(), "(\\[Word\\] ?){0,3}").prop_map(|(f, p)| word_complies(f, p)),
        ]
        .boxed()
    } else {
        common.boxed()
    }
}

fn expression(with_patterns: bool) -> impl Strategy<Value = Expression> {
    predicate(with_patterns).prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(|v| and(v)),
            prop::collection::vec(inner.clone(), 1..4).prop_map(|v| or(v)),
            inner.prop_map(|e| not(e)),
        ]
    })
}

// =============================================================================
// Canonical Form
// =============================================================================

proptest! {
    /// Printing then parsing gives back the same tree.
    #[test]
    fn prop_canonical_text_round_trips(expr in expression(true)) {
        let text = expr.to_query_string();
        let parsed = parse(&text);
        prop_assert!(parsed.is_ok(), "'{}' failed to parse: {:?}", text, parsed);
        prop_assert_eq!(parsed.unwrap(), expr);
    }

    /// Canonical text is a fixed point.
    #[test]
    fn prop_canonical_text_is_stable(expr in expression(true)) {
        let text = expr.to_query_string();
        let again = parse(&text).unwrap().to_query_string();
        prop_assert_eq!(again, text);
    }

    /// The AST survives serde.
    #[test]
    fn prop_ast_json_round_trips(expr in expression(true)) {
        let json = serde_json::to_string(&expr).unwrap();
        let back: Expression = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, expr);
    }
}

// =============================================================================
// EL Bridge
// =============================================================================

proptest! {
    /// Generic lowering is undone by raising.
    #[test]
    fn prop_lower_then_raise(expr in expression(false)) {
        let el = lower_generic(&expr, Some(&types())).unwrap().to_string();
        let raised = raise_str(&el);
        prop_assert!(raised.is_ok(), "'{}' failed to raise: {:?}", el, raised);
        prop_assert_eq!(raised.unwrap(), expr);
    }
}

// =============================================================================
// Robustness
// =============================================================================

proptest! {
    /// Arbitrary input never panics the lexer.
    #[test]
    fn fuzz_lexer(input in ".{0,64}") {
        let mut lexer = Lexer::new(&input);
        for _ in 0..128 {
            match lexer.next_token() {
                Ok(tql_lang::Token::Eof) | Err(_) => break,
                Ok(_) => {}
            }
        }
    }

    /// Arbitrary input never panics the parsers.
    #[test]
    fn fuzz_parsers(input in ".{0,64}") {
        let _ = parse(&input);
        let _ = raise_str(&input);
    }

    /// Query-shaped noise either parses to a canonical tree or fails cleanly.
    #[test]
    fn fuzz_query_shaped(input in "[a-z*()\\[\\]',=<>!~ 0-9.-]{0,40}") {
        if let Ok(expr) = parse(&input) {
            prop_assert!(matches!(expr, Expression::Or(_)));
        }
    }
}
