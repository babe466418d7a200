// tests/predicate_tests.rs

use serde_json::{Value, json};
use tql_lang::error::TqlError;
use tql_lang::parser::parse;
use tql_lang::predicate::RecordPredicate;

fn predicate(query: &str) -> RecordPredicate {
    RecordPredicate::compile(&parse(query).unwrap()).unwrap()
}

fn person() -> Value {
    json!({
        "name": "John Smith",
        "age": 42,
        "score": "17.5",
        "country": "FR",
        "email": "",
        "nickname": null,
        "address": {"city": "Paris", "zip": "75001"},
        "tags": ["admin", "Editor"],
        "orders": [{"total": 10}, {"total": 250}]
    })
}

fn check(query: &str) -> bool {
    predicate(query).matches(&person())
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_equality() {
    assert!(check("age = 42"));
    assert!(check("age = 42.0"));
    assert!(check("age = '42'"));
    assert!(check("country = 'fr'"));
    assert!(!check("country = 'BE'"));
    assert!(check("country != 'BE'"));
    assert!(!check("age != 42"));
}

#[test]
fn test_ordering() {
    assert!(check("age > 18"));
    assert!(check("age >= 42"));
    assert!(!check("age < 42"));
    assert!(check("age <= 42.5"));
    assert!(check("score > 17"), "numeric strings compare as numbers");
    assert!(!check("country > 1"), "non-numeric values never order");
}

#[test]
fn test_field_to_field() {
    let record = json!({"start": 1, "end": 5});
    assert!(predicate("start < end").matches(&record));
    assert!(!predicate("start > end").matches(&record));
    assert!(predicate("start != end").matches(&record));
}

// ============================================================================
// Ranges and Sets
// ============================================================================

#[test]
fn test_between() {
    assert!(check("age between [18, 65]"));
    assert!(check("age between [42, 65]"));
    assert!(!check("age between ]42, 65]"));
    assert!(!check("age between [18, 42["));
    assert!(check("score between [17, 17.5]"));
    assert!(!check("name between ['a', 'z']"));
}

#[test]
fn test_in() {
    assert!(check("country in ['BE', 'FR']"));
    assert!(check("age in [1, 42]"));
    assert!(!check("age in [1, 2]"));
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn test_contains() {
    assert!(check("name contains 'Smith'"));
    assert!(!check("name contains 'smith'"));
    assert!(check("name containsIgnoreCase 'smith'"));
    assert!(check("name contains ''"));
    assert!(check("missing containsIgnoreCase ''"));
}

#[test]
fn test_regex_is_a_full_match() {
    assert!(check("name ~ 'John.*'"));
    assert!(!check("name ~ 'John'"));
    assert!(!check("nickname ~ '.*'"));
}

#[test]
fn test_patterns() {
    assert!(check("name wordComplies '[Word] [Word]'"));
    assert!(check("country complies 'AA'"));
    assert!(!check("country complies 'aa'"));
    assert!(check("address.zip complies '99999'"));
}

#[test]
fn test_invalid_regex() {
    let err = RecordPredicate::compile(&parse("name ~ '('").unwrap()).unwrap_err();
    assert!(matches!(err, TqlError::Pattern(_)));
}

// ============================================================================
// Paths
// ============================================================================

#[test]
fn test_nested_paths() {
    assert!(check("address.city = 'Paris'"));
    assert!(!check("address.city = 'Lyon'"));
}

#[test]
fn test_arrays_fan_out() {
    assert!(check("tags = 'editor'"));
    assert!(check("orders.total > 100"));
    assert!(!check("orders.total > 1000"));
}

#[test]
fn test_missing_fields_are_null() {
    assert!(check("missing is null"));
    assert!(check("address.missing is null"));
    assert!(check("missing is empty"));
    assert!(!check("missing = 'x'"));
}

// ============================================================================
// State Checks
// ============================================================================

#[test]
fn test_null_and_empty() {
    assert!(check("nickname is null"));
    assert!(!check("email is null"));
    assert!(check("email is empty"));
    assert!(check("nickname is empty"));
    assert!(!check("name is empty"));
}

#[test]
fn test_wildcard() {
    assert!(check("* is empty"));
    assert!(check("* is null"));
    assert!(check("* = 'Paris'"));

    let clean = json!({"a": 1, "b": {"c": "x"}});
    assert!(!predicate("* is empty").matches(&clean));
    assert!(predicate("* = 'x'").matches(&clean));
}

#[test]
fn test_validity_unsupported() {
    for query in ["name is valid", "* is invalid"] {
        let err = RecordPredicate::compile(&parse(query).unwrap()).unwrap_err();
        assert!(matches!(err, TqlError::Unsupported(_)), "Failed for {}", query);
    }
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_composition() {
    assert!(check("age > 18 and country = 'FR'"));
    assert!(!check("age > 18 and country = 'BE'"));
    assert!(check("age < 18 or country = 'FR'"));
    assert!(check("not (country = 'BE')"));
    assert!(!check("not (age > 18 and country = 'FR')"));
    assert!(check("age > 18 and (country = 'BE' or address.city = 'Paris')"));
}

#[test]
fn test_filter() {
    let records = vec![
        json!({"age": 12}),
        json!({"age": 20}),
        json!({"age": "30"}),
        json!({"name": "nobody"}),
    ];
    let adults: Vec<&Value> = predicate("age >= 18").filter(&records).collect();
    assert_eq!(adults, vec![&records[1], &records[2]]);
}
