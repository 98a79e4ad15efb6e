//! Recoverable rule violations
//!
//! The pipeline never stops at the first problem. Each failed rule becomes a
//! [`Violation`] naming the field, the rule, and a human-readable message,
//! so the intake form can show everything at once.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::draft::Field;

/// The rule a violation was raised by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    MissingReference,
    ReferenceMismatch,
    Required,
    InvalidDateRange,
    EndDateMismatch,
    StartDateInPast,
    OutOfRange,
    BelowPremiumFloor,
    PremiumMismatch,
    FixedValueMismatch,
    OptionNotOffered,
    CountOutOfRange,
    IncompleteEntry,
    PercentageSumInvalid,
    RelationshipCardinality,
    AgeOutOfRange,
    /// Non-numeric or out-of-domain numeric input
    ArithmeticInconsistency,
    /// Unreadable id, date, flag or choice
    Malformed,
}

impl Rule {
    pub fn code(&self) -> &'static str {
        match self {
            Rule::MissingReference => "missing_reference",
            Rule::ReferenceMismatch => "reference_mismatch",
            Rule::Required => "required",
            Rule::InvalidDateRange => "invalid_date_range",
            Rule::EndDateMismatch => "end_date_mismatch",
            Rule::StartDateInPast => "start_date_in_past",
            Rule::OutOfRange => "out_of_range",
            Rule::BelowPremiumFloor => "below_premium_floor",
            Rule::PremiumMismatch => "premium_mismatch",
            Rule::FixedValueMismatch => "fixed_value_mismatch",
            Rule::OptionNotOffered => "option_not_offered",
            Rule::CountOutOfRange => "count_out_of_range",
            Rule::IncompleteEntry => "incomplete_entry",
            Rule::PercentageSumInvalid => "percentage_sum_invalid",
            Rule::RelationshipCardinality => "relationship_cardinality",
            Rule::AgeOutOfRange => "age_out_of_range",
            Rule::ArithmeticInconsistency => "arithmetic_inconsistency",
            Rule::Malformed => "malformed",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Location of a violation: a field, optionally one list entry, optionally
/// one attribute of that entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldPath {
    pub field: Field,
    pub index: Option<usize>,
    pub attribute: Option<&'static str>,
}

impl FieldPath {
    pub fn field(field: Field) -> Self {
        Self {
            field,
            index: None,
            attribute: None,
        }
    }

    pub fn entry(field: Field, index: usize) -> Self {
        Self {
            field,
            index: Some(index),
            attribute: None,
        }
    }

    pub fn attribute(field: Field, index: usize, attribute: &'static str) -> Self {
        Self {
            field,
            index: Some(index),
            attribute: Some(attribute),
        }
    }
}

impl From<Field> for FieldPath {
    fn from(field: Field) -> Self {
        FieldPath::field(field)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field)?;
        if let Some(index) = self.index {
            write!(f, "[{}]", index)?;
        }
        if let Some(attribute) = self.attribute {
            write!(f, ".{}", attribute)?;
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A single failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: FieldPath,
    pub rule: Rule,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<FieldPath>, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
        }
    }

    /// Shortcut for a missing mandatory field
    pub fn required(field: Field) -> Self {
        Self::new(field, Rule::Required, format!("{} is required", field))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.rule)
    }
}

/// Accumulator for violations raised during one pipeline run
///
/// When scoped to a field, violations on other fields are dropped as they
/// are pushed. Fatal violations are tracked separately so the pipeline can
/// halt after the reference step even when they fall outside the scope.
#[derive(Debug, Clone, Default)]
pub struct Violations {
    items: Vec<Violation>,
    scope: Option<Field>,
    fatal: bool,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects only violations on `field`
    pub fn scoped(field: Field) -> Self {
        Self {
            scope: Some(field),
            ..Self::default()
        }
    }

    pub fn push(&mut self, violation: Violation) {
        if self.scope.map_or(true, |f| f == violation.field.field) {
            self.items.push(violation);
        }
    }

    /// Records a violation that makes the rest of the run meaningless
    pub fn push_fatal(&mut self, violation: Violation) {
        self.fatal = true;
        self.push(violation);
    }

    pub fn has_fatal(&self) -> bool {
        self.fatal
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.items.iter()
    }

    /// Returns true if any collected violation matches the rule
    pub fn contains_rule(&self, rule: Rule) -> bool {
        self.items.iter().any(|v| v.rule == rule)
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.items
    }
}

impl Extend<Violation> for Violations {
    fn extend<T: IntoIterator<Item = Violation>>(&mut self, iter: T) {
        for violation in iter {
            self.push(violation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_display() {
        assert_eq!(FieldPath::field(Field::PremiumAmount).to_string(), "premium_amount");
        assert_eq!(FieldPath::entry(Field::Dependents, 2).to_string(), "dependents[2]");
        assert_eq!(
            FieldPath::attribute(Field::Beneficiaries, 0, "percentage").to_string(),
            "beneficiaries[0].percentage"
        );
    }

    #[test]
    fn test_scoped_collection_drops_other_fields() {
        let mut violations = Violations::scoped(Field::Deductible);
        violations.push(Violation::required(Field::StartDate));
        violations.push(Violation::required(Field::Deductible));
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_fatal_tracked_outside_scope() {
        let mut violations = Violations::scoped(Field::Deductible);
        violations.push_fatal(Violation::new(Field::ClientId, Rule::MissingReference, "missing"));
        assert!(violations.is_empty());
        assert!(violations.has_fatal());
    }

    #[test]
    fn test_violation_serializes_path_as_string() {
        let v = Violation::new(
            FieldPath::attribute(Field::Beneficiaries, 1, "name"),
            Rule::IncompleteEntry,
            "name is blank",
        );
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["field"], "beneficiaries[1].name");
        assert_eq!(json["rule"], "incomplete_entry");
    }
}
