// tests/lower_tests.rs

use tql_lang::ast::Expression;
use tql_lang::el::{ElLiteral, ElNode};
use tql_lang::error::TqlError;
use tql_lang::field_types::FieldTypes;
use tql_lang::lower::{
    CaseFlag, LoweringPolicy, WildcardStrategy, lower, lower_for_runtime, lower_for_storage,
    lower_generic,
};
use tql_lang::parser::parse;
use tql_lang::pattern::{PatternKind, to_regex};

fn types() -> FieldTypes {
    FieldTypes::new()
        .with("name", "STRING")
        .with("age", "INTEGER")
        .with("birth", "DATE")
}

fn generic(query: &str) -> String {
    lower_generic(&parse(query).unwrap(), Some(&types()))
        .unwrap()
        .to_string()
}

fn storage(query: &str) -> String {
    lower_for_storage(&parse(query).unwrap(), Some(&types()))
        .unwrap()
        .to_string()
}

fn runtime(query: &str) -> String {
    lower_for_runtime(&parse(query).unwrap(), Some(&types()))
        .unwrap()
        .to_string()
}

// ============================================================================
// Generic Policy
// ============================================================================

#[test]
fn test_comparisons() {
    let cases = vec![
        ("a = 1", "a == 1"),
        ("a != 'x'", "a != 'x'"),
        ("a < 1.5", "a < 1.5"),
        ("a > -2", "a > -2"),
        ("a <= true", "a <= true"),
        ("a >= 99.20", "a >= 99.20"),
        ("start < end", "start < end"),
    ];

    for (query, expected) in cases {
        assert_eq!(generic(query), expected, "Failed for {}", query);
    }
}

#[test]
fn test_integer_widths() {
    assert_eq!(generic("n = 2147483647"), "n == 2147483647");
    assert_eq!(generic("n = 2147483648"), "n == 2147483648L");
    assert_eq!(generic("n = -3000000000"), "n == -3000000000L");
    assert_eq!(generic("n = 99999999999999999999"), "n == 99999999999999999999");

    let expr = parse("n = 99999999999999999999").unwrap();
    match lower_generic(&expr, None).unwrap() {
        ElNode::Compare { right, .. } => {
            assert!(matches!(*right, ElNode::Literal(ElLiteral::Decimal(_))))
        }
        other => panic!("Expected comparison, got {:?}", other),
    }
}

#[test]
fn test_functions() {
    let cases = vec![
        ("age between [18, 65]", "between(age, 18, 65)"),
        ("age between ]18, 65]", "between(age, 18, 65, true, false)"),
        ("age between [18, 65[", "between(age, 18, 65, false, true)"),
        ("code in [11, 22.22, true]", "in(code, 11, 22.22, true)"),
        ("name contains 'oh'", "contains(name, 'oh')"),
        ("name containsIgnoreCase 'OH'", "contains(name, 'OH', false)"),
        ("name ~ '^[A-Z]'", "matches(name, '^[A-Z]')"),
        ("name is null", "isNull(name)"),
        ("name is empty", "isEmpty(name)"),
        ("name is valid", "isValid(name, 'STRING')"),
        ("birth is invalid", "isInvalid(birth, 'DATE')"),
    ];

    for (query, expected) in cases {
        assert_eq!(generic(query), expected, "Failed for {}", query);
    }
}

#[test]
fn test_patterns_become_matches() {
    let expected = format!(
        "matches(code, '{}')",
        to_regex(PatternKind::Character, "AA-99").unwrap()
    );
    assert_eq!(generic("code complies 'AA-99'"), expected);

    let expected = format!(
        "matches(name, '{}')",
        to_regex(PatternKind::Word, "[Word]").unwrap()
    );
    assert_eq!(generic("name wordComplies '[Word]'"), expected);
}

#[test]
fn test_quoted_values_are_escaped() {
    assert_eq!(generic(r"name = 'O\'Brien'"), r"name == 'O\'Brien'");
}

#[test]
fn test_composition() {
    assert_eq!(
        generic("age > 18 and name containsIgnoreCase 'jo'"),
        "age > 18 && contains(name, 'jo', false)"
    );
    assert_eq!(generic("a = 1 or b = 2 and c = 3"), "a == 1 || b == 2 && c == 3");
    assert_eq!(generic("a = 1 and (b = 2 or c = 3)"), "a == 1 && (b == 2 || c == 3)");
    assert_eq!(generic("not (a = 1)"), "!(a == 1)");
    assert_eq!(generic("not (a = 1 or b = 2)"), "!(a == 1 || b == 2)");
}

#[test]
fn test_single_child_collapses() {
    let lowered = lower_generic(&parse("a = 1").unwrap(), None).unwrap();
    assert!(matches!(lowered, ElNode::Compare { .. }));
}

#[test]
fn test_empty_composites() {
    let err = lower_generic(&Expression::Or(vec![]), None).unwrap_err();
    assert_eq!(err, TqlError::EmptyComposite("OR"));

    let err = lower_generic(&Expression::Or(vec![Expression::And(vec![])]), None).unwrap_err();
    assert_eq!(err, TqlError::EmptyComposite("AND"));
}

#[test]
fn test_wildcards_rejected() {
    for query in ["* is null", "* is empty", "* is valid", "* is invalid", "* = 1"] {
        let err = lower_generic(&parse(query).unwrap(), Some(&types())).unwrap_err();
        assert!(matches!(err, TqlError::Wildcard(_)), "Failed for {}", query);
    }
}

#[test]
fn test_missing_type() {
    let err = lower_generic(&parse("unknown is valid").unwrap(), Some(&types())).unwrap_err();
    assert_eq!(
        err,
        TqlError::TypeNotFound {
            field: "unknown".to_string()
        }
    );

    let err = lower_generic(&parse("name is invalid").unwrap(), None).unwrap_err();
    assert!(matches!(err, TqlError::TypeNotFound { .. }));
}

#[test]
fn test_types_not_needed_elsewhere() {
    assert!(lower_generic(&parse("name is empty and age > 1").unwrap(), None).is_ok());
}

// ============================================================================
// Storage Policy
// ============================================================================

#[test]
fn test_storage_sentinels() {
    assert_eq!(storage("* is empty"), "hasEmpty(*)");
    assert_eq!(storage("* is invalid"), "hasInvalid(*)");
    assert_eq!(
        storage("* is empty or name = 'x'"),
        "hasEmpty(*) || name == 'x'"
    );
}

#[test]
fn test_storage_rejects_other_wildcards() {
    for query in ["* is null", "* is valid"] {
        let err = lower_for_storage(&parse(query).unwrap(), Some(&types())).unwrap_err();
        assert!(matches!(err, TqlError::Wildcard(_)), "Failed for {}", query);
    }
}

#[test]
fn test_storage_matches_generic_otherwise() {
    let query = "age > 18 and name containsIgnoreCase 'jo' and name contains 'x'";
    assert_eq!(storage(query), generic(query));
}

// ============================================================================
// Runtime Policy
// ============================================================================

#[test]
fn test_runtime_expansion() {
    assert_eq!(
        runtime("* is empty"),
        "isEmpty(name) || isEmpty(age) || isEmpty(birth)"
    );
    assert_eq!(
        runtime("* is null"),
        "isNull(name) || isNull(age) || isNull(birth)"
    );
    assert_eq!(
        runtime("* is invalid"),
        "isInvalid(name, 'STRING') || isInvalid(age, 'INTEGER') || isInvalid(birth, 'DATE')"
    );
    assert_eq!(
        runtime("* is valid"),
        "isValid(name, 'STRING') && isValid(age, 'INTEGER') && isValid(birth, 'DATE')"
    );
}

#[test]
fn test_runtime_expansion_follows_dictionary_order() {
    let types = FieldTypes::from_json_str(r#"{"zeta": "STRING", "alpha": "INTEGER"}"#).unwrap();
    let lowered = lower_for_runtime(&parse("* is empty").unwrap(), Some(&types)).unwrap();
    assert_eq!(lowered.to_string(), "isEmpty(zeta) || isEmpty(alpha)");
}

#[test]
fn test_runtime_expansion_needs_fields() {
    let expr = parse("* is empty").unwrap();
    assert!(matches!(
        lower_for_runtime(&expr, None),
        Err(TqlError::Wildcard(_))
    ));
    assert!(matches!(
        lower_for_runtime(&expr, Some(&FieldTypes::new())),
        Err(TqlError::Wildcard(_))
    ));
}

#[test]
fn test_runtime_contains_flag() {
    assert_eq!(runtime("name contains 'oh'"), "contains(name, 'oh', true)");
    assert_eq!(
        runtime("name containsIgnoreCase 'oh'"),
        "contains(name, 'oh', false)"
    );
}

#[test]
fn test_runtime_numeric_guard() {
    assert_eq!(
        runtime("age > 18"),
        r"matches(age, '^-?\d+(\.\d+)?$') && age > 18"
    );
    assert_eq!(
        runtime("start <= end"),
        r"matches(start, '^-?\d+(\.\d+)?$') && matches(end, '^-?\d+(\.\d+)?$') && start <= end"
    );
    match lower_for_runtime(&parse("field3 >= 153").unwrap(), None).unwrap() {
        ElNode::And(children) => {
            assert_eq!(children.len(), 2);
            assert_eq!(children[0].to_string(), r"matches(field3, '^-?\d+(\.\d+)?$')");
            assert_eq!(children[1].to_string(), "field3 >= 153");
        }
        other => panic!("Expected guarded comparison, got {:?}", other),
    }
    assert_eq!(runtime("age = 18"), "age == 18");
    assert_eq!(runtime("name > 'm'"), "name > 'm'");
}

#[test]
fn test_runtime_guard_inside_or() {
    assert_eq!(
        runtime("age < 10 or age > 60"),
        r"matches(age, '^-?\d+(\.\d+)?$') && age < 10 || matches(age, '^-?\d+(\.\d+)?$') && age > 60"
    );
}

// ============================================================================
// Custom Policies
// ============================================================================

#[test]
fn test_policy_presets() {
    assert_eq!(LoweringPolicy::default(), LoweringPolicy::generic());
    assert_eq!(LoweringPolicy::by_name("storage"), Some(LoweringPolicy::storage()));
    assert_eq!(LoweringPolicy::by_name("runtime"), Some(LoweringPolicy::runtime()));
    assert_eq!(LoweringPolicy::by_name("other"), None);
}

#[test]
fn test_mixed_policy() {
    let policy = LoweringPolicy {
        wildcard: WildcardStrategy::Sentinel,
        case_flag: CaseFlag::Always,
        numeric_guard: false,
    };
    let expr = parse("* is empty and name contains 'a' and age > 1").unwrap();
    assert_eq!(
        lower(&expr, &policy, None).unwrap().to_string(),
        "hasEmpty(*) && contains(name, 'a', true) && age > 1"
    );
}
