// tests/builder_tests.rs

use rust_decimal::Decimal;
use tql_lang::ast::builder::*;
use tql_lang::ast::{ComparisonOperator, Operand};
use tql_lang::parser::parse;
use tql_lang::TqlElement;

fn assert_same(built: tql_lang::Expression, query: &str) {
    assert_eq!(built, parse(query).unwrap(), "Builder differs from {}", query);
}

// ============================================================================
// Predicates
// ============================================================================

#[test]
fn test_comparisons() {
    assert_same(eq("country", "FR"), "country = 'FR'");
    assert_same(neq("age", 18), "age != 18");
    assert_same(lt("age", 18), "age < 18");
    assert_same(gt("age", 18), "age > 18");
    assert_same(lte("price", Decimal::new(1050, 2)), "price <= 10.50");
    assert_same(gte("active", true), "active >= true");
}

#[test]
fn test_field_comparison() {
    assert_same(compare_fields("start", ComparisonOperator::Lt, "end"), "start < end");
    assert_same(
        compare("start", ComparisonOperator::Eq, Operand::Field("end".to_string())),
        "start = end",
    );
    assert_same(field_eq("a", "b"), "a = b");
    assert_same(field_neq("a", "b"), "a != b");
    assert_same(field_lt("a", "b"), "a < b");
    assert_same(field_gt("a", "b"), "a > b");
    assert_same(field_lte("a", "b"), "a <= b");
    assert_same(field_gte("a", "b"), "a >= b");
}

#[test]
fn test_ranges() {
    assert_same(between("age", 18, 65), "age between [18, 65]");
    assert_same(between_bounds("age", 18, 65, true, false), "age between ]18, 65]");
    assert_same(between_bounds("age", 18, 65, false, true), "age between [18, 65[");
}

#[test]
fn test_membership() {
    assert_same(in_values("code", [11, 22, 33]), "code in [11, 22, 33]");
    assert_same(in_values("country", ["FR", "BE"]), "country in ['FR', 'BE']");
}

#[test]
fn test_text_predicates() {
    assert_same(contains("name", "oh"), "name contains 'oh'");
    assert_same(contains_ignore_case("name", "OH"), "name containsIgnoreCase 'OH'");
    assert_same(matches("name", "^J"), "name ~ '^J'");
    assert_same(complies("code", "AA-999"), "code complies 'AA-999'");
    assert_same(word_complies("name", "[Word] [Word]"), "name wordComplies '[Word] [Word]'");
}

#[test]
fn test_state_checks() {
    assert_same(is_null("name"), "name is null");
    assert_same(is_empty("*"), "* is empty");
    assert_same(is_valid("age"), "age is valid");
    assert_same(is_invalid("*"), "* is invalid");
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_and_or() {
    assert_same(
        and([eq("country", "FR"), gt("age", 18)]),
        "country = 'FR' and age > 18",
    );
    assert_same(
        or([eq("country", "FR"), eq("country", "BE")]),
        "country = 'FR' or country = 'BE'",
    );
}

#[test]
fn test_nested_composition() {
    assert_same(
        and([gt("age", 18), or([eq("country", "FR"), eq("country", "BE")])]),
        "age > 18 and (country = 'FR' or country = 'BE')",
    );
    assert_same(
        or([and([eq("a", 1), eq("b", 2)]), eq("c", 3)]),
        "a = 1 and b = 2 or c = 3",
    );
}

#[test]
fn test_not() {
    assert_same(not(eq("a", 1)), "not (a = 1)");
    assert_same(
        and([not(or([eq("a", 1), eq("b", 2)])), is_null("c")]),
        "not (a = 1 or b = 2) and c is null",
    );
}

#[test]
fn test_builder_text() {
    let query = and([between("age", 18, 65), not(is_empty("name"))]);
    assert_eq!(
        query.to_query_string(),
        "((age between [18, 65]) and (not ((name is empty))))"
    );
}
