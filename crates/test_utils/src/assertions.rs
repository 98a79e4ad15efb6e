//! Custom Test Assertions
//!
//! Provides assertion helpers for violations and money that print the full
//! violation list on failure instead of a bare `false`.

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_underwriting::{FieldPath, Rule, Violation};

fn describe(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return "(none)".to_string();
    }
    violations
        .iter()
        .map(|v| format!("  - {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Asserts that no violations were raised
pub fn assert_no_violations(violations: &[Violation]) {
    assert!(
        violations.is_empty(),
        "Expected no violations, got:\n{}",
        describe(violations)
    );
}

/// Asserts that a violation of `rule` was raised at `path`
///
/// # Panics
///
/// Panics listing every raised violation if none matches.
pub fn assert_has_violation(violations: &[Violation], path: impl Into<FieldPath>, rule: Rule) {
    let path = path.into();
    assert!(
        violations.iter().any(|v| v.field == path && v.rule == rule),
        "Expected {} at {}, got:\n{}",
        rule,
        path,
        describe(violations)
    );
}

/// Asserts that no violation of `rule` was raised anywhere
pub fn assert_lacks_rule(violations: &[Violation], rule: Rule) {
    assert!(
        violations.iter().all(|v| v.rule != rule),
        "Expected no {} violation, got:\n{}",
        rule,
        describe(violations)
    );
}

/// Asserts the number of violations of `rule`
pub fn assert_rule_count(violations: &[Violation], rule: Rule, expected: usize) {
    let actual = violations.iter().filter(|v| v.rule == rule).count();
    assert_eq!(
        actual,
        expected,
        "Expected {} {} violation(s), got {}:\n{}",
        expected,
        rule,
        actual,
        describe(violations)
    );
}

/// Asserts that a Money value has exactly the given amount
pub fn assert_money_eq(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Expected {} {}, got {}",
        actual.currency().symbol(),
        expected,
        actual
    );
}
