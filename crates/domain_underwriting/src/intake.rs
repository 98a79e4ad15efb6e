//! Intake form parsing
//!
//! Form values arrive as JSON with numbers sometimes typed as strings. This
//! module turns such an object into a [`PolicyDraft`], keeping every value it
//! can and reporting the rest as violations instead of failing the whole
//! form. Blank strings and `null` leave a field unset.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::draft::{Beneficiary, Dependent, Field, PolicyDraft};
use crate::premium::PaymentFrequency;
use crate::violation::{FieldPath, Rule, Violation};

/// A parsed draft with the problems found while reading it
#[derive(Debug, Clone, Default)]
pub struct ParsedDraft {
    pub draft: PolicyDraft,
    pub violations: Vec<Violation>,
}

impl ParsedDraft {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Parses raw form values into a draft
///
/// Non-numeric input in numeric fields yields `ArithmeticInconsistency`;
/// unreadable ids, dates and choices yield `Malformed`. Unknown keys are
/// ignored.
pub fn parse_draft(form: &Value) -> ParsedDraft {
    let mut parser = Parser::default();
    let Some(form) = form.as_object() else {
        parser.violations.push(Violation::new(
            Field::ProductId,
            Rule::Malformed,
            "form values must be a JSON object",
        ));
        return parser.finish(PolicyDraft::default());
    };

    let draft = PolicyDraft {
        product_id: parser.parsed(form, Field::ProductId, "a product id"),
        client_id: parser.parsed(form, Field::ClientId, "a client id"),
        agent_id: parser.parsed(form, Field::AgentId, "an agent id"),
        start_date: parser.date(form, Field::StartDate),
        end_date: parser.date(form, Field::EndDate),
        premium_amount: parser.decimal(form, Field::PremiumAmount),
        payment_frequency: parser.frequency(form),
        coverage_amount: parser.decimal(form, Field::CoverageAmount),
        includes_add: parser.flag(form, Field::IncludesAdd),
        add_coverage: parser.decimal(form, Field::AddCoverage),
        age_at_inscription: parser.whole_number(form, Field::AgeAtInscription),
        deductible: parser.decimal(form, Field::Deductible),
        coinsurance: parser.decimal(form, Field::Coinsurance),
        max_annual_out_of_pocket: parser.decimal(form, Field::MaxAnnualOutOfPocket),
        wants_dental_premium: parser.flag(form, Field::WantsDentalPremium),
        wants_vision: parser.flag(form, Field::WantsVision),
        beneficiaries: parser.beneficiaries(form),
        dependents: parser.dependents(form),
    };
    parser.finish(draft)
}

#[derive(Default)]
struct Parser {
    violations: Vec<Violation>,
}

impl Parser {
    fn finish(self, draft: PolicyDraft) -> ParsedDraft {
        ParsedDraft {
            draft,
            violations: self.violations,
        }
    }

    fn malformed(&mut self, path: FieldPath, expected: &str) {
        self.violations.push(Violation::new(
            path,
            Rule::Malformed,
            format!("{} is not {}", path, expected),
        ));
    }

    fn not_numeric(&mut self, path: FieldPath, value: &Value) {
        self.violations.push(Violation::new(
            path,
            Rule::ArithmeticInconsistency,
            format!("{} must be a number, got {}", path, value),
        ));
    }

    fn parsed<T: FromStr>(&mut self, form: &Map<String, Value>, field: Field, expected: &str) -> Option<T> {
        let raw = text(form.get(field.name()))?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.malformed(field.into(), expected);
                None
            }
        }
    }

    fn date(&mut self, form: &Map<String, Value>, field: Field) -> Option<NaiveDate> {
        self.date_at(form.get(field.name()), field.into())
    }

    fn date_at(&mut self, value: Option<&Value>, path: FieldPath) -> Option<NaiveDate> {
        let raw = text(value)?;
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.malformed(path, "a date in YYYY-MM-DD form");
                None
            }
        }
    }

    fn decimal(&mut self, form: &Map<String, Value>, field: Field) -> Option<Decimal> {
        self.decimal_at(form.get(field.name()), field.into())
    }

    fn decimal_at(&mut self, value: Option<&Value>, path: FieldPath) -> Option<Decimal> {
        let value = present(value)?;
        let parsed = match value {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s.trim()),
            _ => None,
        };
        if parsed.is_none() {
            self.not_numeric(path, value);
        }
        parsed
    }

    fn whole_number(&mut self, form: &Map<String, Value>, field: Field) -> Option<u32> {
        let decimal = self.decimal(form, field)?;
        let whole = if decimal.fract().is_zero() { decimal.to_u32() } else { None };
        if whole.is_none() {
            self.violations.push(Violation::new(
                field,
                Rule::ArithmeticInconsistency,
                format!("{} must be a whole number of at least zero, got {}", field, decimal),
            ));
        }
        whole
    }

    fn flag(&mut self, form: &Map<String, Value>, field: Field) -> Option<bool> {
        let value = present(form.get(field.name()))?;
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        if parsed.is_none() {
            self.malformed(field.into(), "true or false");
        }
        parsed
    }

    fn frequency(&mut self, form: &Map<String, Value>) -> Option<PaymentFrequency> {
        let raw = text(form.get(Field::PaymentFrequency.name()))?;
        let parsed = PaymentFrequency::from_code(raw);
        if parsed.is_none() {
            self.malformed(Field::PaymentFrequency.into(), "a payment frequency");
        }
        parsed
    }

    fn entries<'f>(&mut self, form: &'f Map<String, Value>, field: Field) -> &'f [Value] {
        match present(form.get(field.name())) {
            None => &[],
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.malformed(field.into(), "a list");
                &[]
            }
        }
    }

    fn beneficiaries(&mut self, form: &Map<String, Value>) -> Vec<Beneficiary> {
        let field = Field::Beneficiaries;
        self.entries(form, field)
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let percentage = self
                    .decimal_at(entry.get("percentage"), FieldPath::attribute(field, index, "percentage"))
                    .unwrap_or(Decimal::ZERO);
                Beneficiary::new(
                    text(entry.get("name")).unwrap_or_default(),
                    text(entry.get("relationship")).unwrap_or_default(),
                    percentage,
                )
            })
            .collect()
    }

    fn dependents(&mut self, form: &Map<String, Value>) -> Vec<Dependent> {
        let field = Field::Dependents;
        self.entries(form, field)
            .iter()
            .enumerate()
            .map(|(index, entry)| Dependent {
                name: text(entry.get("name")).unwrap_or_default().to_string(),
                relationship: text(entry.get("relationship")).unwrap_or_default().to_string(),
                birth_date: self.date_at(entry.get("birth_date"), FieldPath::attribute(field, index, "birth_date")),
            })
            .collect()
    }
}

/// The value unless it is `null` or a blank string
fn present(value: Option<&Value>) -> Option<&Value> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        other => Some(other),
    }
}

fn text(value: Option<&Value>) -> Option<&str> {
    present(value)?.as_str().map(str::trim)
}

/// Plain or exponent notation; JSON floats print as `1e-7` at the extremes
fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
