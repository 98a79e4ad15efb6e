//! Validation of beneficiary and dependent lists
//!
//! Lists are ordered and addressed by index, so every violation raised here
//! points at `field[index]` or `field[index].attribute`. The checks are
//! generic over [`ListEntry`] and know nothing about product families; the
//! family rules decide which limits apply.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::age_on;

use crate::draft::{Beneficiary, Dependent, Field, Relationship};
use crate::settings::UnderwritingSettings;
use crate::violation::{FieldPath, Rule, Violation, Violations};

/// Numeric attribute of an entry with an optional inclusive upper bound
#[derive(Debug, Clone, Copy)]
pub struct NumericAttribute {
    pub name: &'static str,
    pub value: Decimal,
    pub max: Option<Decimal>,
}

/// An entry of a validated list
pub trait ListEntry {
    /// Required text attributes as `(name, value)`
    fn text_attributes(&self) -> Vec<(&'static str, &str)>;

    /// Required numeric attributes; each must be strictly positive
    fn numeric_attributes(&self) -> Vec<NumericAttribute> {
        Vec::new()
    }

    /// Required date attributes
    fn date_attributes(&self) -> Vec<(&'static str, Option<NaiveDate>)> {
        Vec::new()
    }

    fn relationship(&self) -> Option<Relationship>;
}

impl ListEntry for Beneficiary {
    fn text_attributes(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str()), ("relationship", self.relationship.as_str())]
    }

    fn numeric_attributes(&self) -> Vec<NumericAttribute> {
        vec![NumericAttribute {
            name: "percentage",
            value: self.percentage,
            max: Some(dec!(100)),
        }]
    }

    fn relationship(&self) -> Option<Relationship> {
        Relationship::classify(&self.relationship)
    }
}

impl ListEntry for Dependent {
    fn text_attributes(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str()), ("relationship", self.relationship.as_str())]
    }

    fn date_attributes(&self) -> Vec<(&'static str, Option<NaiveDate>)> {
        vec![("birth_date", self.birth_date)]
    }

    fn relationship(&self) -> Option<Relationship> {
        Relationship::classify(&self.relationship)
    }
}

/// Checks the list length against `[min, max]`
///
/// `max == None` means unlimited and `Some(0)` forbids any entry.
pub fn validate_count(
    len: usize,
    field: Field,
    min: usize,
    max: Option<usize>,
    out: &mut Violations,
) {
    match max {
        Some(0) if len > 0 => out.push(Violation::new(
            field,
            Rule::CountOutOfRange,
            format!("{} are not allowed for this product", field),
        )),
        Some(max) if len > max => out.push(Violation::new(
            field,
            Rule::CountOutOfRange,
            format!("at most {} {} allowed, got {}", max, field, len),
        )),
        _ if len < min => out.push(Violation::new(
            field,
            Rule::CountOutOfRange,
            format!("at least {} {} required, got {}", min, field, len),
        )),
        _ => {}
    }
}

/// Flags blank text, non-positive numbers, and missing dates on one entry
///
/// A number above its attribute's upper bound is reported as
/// `ArithmeticInconsistency` rather than an incomplete entry.
pub fn validate_entry_completeness<E: ListEntry>(
    entry: &E,
    field: Field,
    index: usize,
    out: &mut Violations,
) {
    for (name, value) in entry.text_attributes() {
        if value.trim().is_empty() {
            out.push(Violation::new(
                FieldPath::attribute(field, index, name),
                Rule::IncompleteEntry,
                format!("{} is required", name),
            ));
        }
    }

    for attr in entry.numeric_attributes() {
        if attr.value <= Decimal::ZERO {
            out.push(Violation::new(
                FieldPath::attribute(field, index, attr.name),
                Rule::IncompleteEntry,
                format!("{} must be greater than zero", attr.name),
            ));
        } else if let Some(max) = attr.max.filter(|max| attr.value > *max) {
            out.push(Violation::new(
                FieldPath::attribute(field, index, attr.name),
                Rule::ArithmeticInconsistency,
                format!("{} of {} exceeds {}", attr.name, attr.value, max),
            ));
        }
    }

    for (name, value) in entry.date_attributes() {
        if value.is_none() {
            out.push(Violation::new(
                FieldPath::attribute(field, index, name),
                Rule::IncompleteEntry,
                format!("{} is required", name),
            ));
        }
    }
}

/// Checks that beneficiary shares add up to 100
///
/// Emits at most one violation for the whole list and nothing for an empty
/// list. Shares too large to add up are an `ArithmeticInconsistency`.
pub fn validate_percentage_sum(beneficiaries: &[Beneficiary], tolerance: Decimal, out: &mut Violations) {
    if beneficiaries.is_empty() {
        return;
    }

    let total = beneficiaries
        .iter()
        .try_fold(Decimal::ZERO, |acc, b| acc.checked_add(b.percentage));
    let Some((total, deviation)) = total.and_then(|t| t.checked_sub(dec!(100)).map(|d| (t, d))) else {
        out.push(Violation::new(
            Field::Beneficiaries,
            Rule::ArithmeticInconsistency,
            "beneficiary percentages are too large to add up",
        ));
        return;
    };

    if deviation.abs() > tolerance {
        out.push(Violation::new(
            Field::Beneficiaries,
            Rule::PercentageSumInvalid,
            format!("beneficiary percentages add up to {}, expected 100", total.normalize()),
        ));
    }
}

/// Limits on how many entries of each relationship a list may hold
#[derive(Debug, Clone, Copy, Default)]
pub struct CardinalityRules {
    pub max_spouses: Option<usize>,
    pub max_children: Option<usize>,
    /// Relationships accepted at all; `None` accepts any
    pub allowed: Option<&'static [Relationship]>,
}

impl CardinalityRules {
    /// No limits
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// One spouse at most, any number of other dependents
    pub fn household() -> Self {
        Self {
            max_spouses: Some(1),
            ..Self::default()
        }
    }

    /// One spouse and up to three children, nobody else
    pub fn spouse_and_children() -> Self {
        Self {
            max_spouses: Some(1),
            max_children: Some(3),
            allowed: Some(&[Relationship::Spouse, Relationship::Child]),
        }
    }
}

/// Checks relationship counts and accepted relationships
///
/// Entries with a blank relationship are skipped; completeness reports them.
/// A limit that is exceeded is reported once, at the first entry past it.
pub fn validate_relationship_cardinality<E: ListEntry>(
    entries: &[E],
    field: Field,
    rules: &CardinalityRules,
    out: &mut Violations,
) {
    let mut spouses = 0;
    let mut children = 0;

    for (index, entry) in entries.iter().enumerate() {
        let Some(relationship) = entry.relationship() else {
            continue;
        };

        if let Some(allowed) = rules.allowed {
            if !allowed.contains(&relationship) {
                out.push(Violation::new(
                    FieldPath::attribute(field, index, "relationship"),
                    Rule::RelationshipCardinality,
                    format!("{} is not an accepted relationship", relationship),
                ));
                continue;
            }
        }

        match relationship {
            Relationship::Spouse => {
                spouses += 1;
                if rules.max_spouses.map_or(false, |max| spouses == max + 1) {
                    out.push(Violation::new(
                        FieldPath::entry(field, index),
                        Rule::RelationshipCardinality,
                        format!("at most {} spouse allowed", rules.max_spouses.unwrap_or_default()),
                    ));
                }
            }
            Relationship::Child => {
                children += 1;
                if rules.max_children.map_or(false, |max| children == max + 1) {
                    out.push(Violation::new(
                        FieldPath::entry(field, index),
                        Rule::RelationshipCardinality,
                        format!("at most {} children allowed", rules.max_children.unwrap_or_default()),
                    ));
                }
            }
            _ => {}
        }
    }
}

/// Checks a child dependent's age against the ceiling
///
/// Ages use calendar subtraction, so a child whose birthday is tomorrow is
/// still a year younger. Non-children and entries without a birth date are
/// skipped.
pub fn validate_dependent_age(
    dependent: &Dependent,
    index: usize,
    as_of: NaiveDate,
    settings: &UnderwritingSettings,
    out: &mut Violations,
) {
    if dependent.relationship() != Some(Relationship::Child) {
        return;
    }
    let Some(birth) = dependent.birth_date else {
        return;
    };

    let path = FieldPath::attribute(Field::Dependents, index, "birth_date");
    match age_on(birth, as_of) {
        Ok(age) if settings.child_age_exceeded(age) => out.push(Violation::new(
            path,
            Rule::AgeOutOfRange,
            format!(
                "child is {} years old, the limit is {}",
                age, settings.child_age_ceiling
            ),
        )),
        Ok(_) => {}
        Err(err) => out.push(Violation::new(path, Rule::ArithmeticInconsistency, err.to_string())),
    }
}
