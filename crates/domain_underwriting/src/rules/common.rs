//! Checks shared by every family
//!
//! Each check reads the family's metadata to decide whether it applies, so
//! the same functions serve all eight families.

use rust_decimal::Decimal;

use core_kernel::policy_end_date;

use crate::draft::Field;
use crate::family::PremiumBasis;
use crate::list_validator::{
    validate_count, validate_dependent_age, validate_entry_completeness, validate_percentage_sum,
};
use crate::premium::PremiumQuote;
use crate::settings::FloorTarget;
use crate::violation::{Rule, Violation, Violations};

use super::{RuleContext, Step};

/// Runs the shared checks of one step
pub fn check(ctx: &RuleContext<'_>, step: Step, out: &mut Violations) {
    match step {
        Step::References => check_references(ctx, out),
        Step::Dates => check_dates(ctx, out),
        Step::Ranges => {
            check_age(ctx, out);
            check_coverage(ctx, out);
            check_deductible(ctx, out);
            check_premium(ctx, out);
        }
        Step::FixedValues => {
            check_fixed_values(ctx, out);
            check_optional_benefits(ctx, out);
        }
        Step::Lists => {
            check_beneficiaries(ctx, out);
            check_dependents(ctx, out);
        }
    }
}

/// Missing parties make the rest of the run meaningless
fn check_references(ctx: &RuleContext<'_>, out: &mut Violations) {
    let draft = ctx.draft;
    if draft.client_id.is_none() {
        out.push_fatal(Violation::new(
            Field::ClientId,
            Rule::MissingReference,
            "a client must be selected",
        ));
    }
    if draft.agent_id.is_none() {
        out.push_fatal(Violation::new(
            Field::AgentId,
            Rule::MissingReference,
            "an agent must be selected",
        ));
    }
    if let Some(product_id) = draft.product_id.filter(|id| *id != ctx.config.id) {
        out.push_fatal(Violation::new(
            Field::ProductId,
            Rule::ReferenceMismatch,
            format!("draft refers to {} but was evaluated against {}", product_id, ctx.config.id),
        ));
    }
}

fn check_dates(ctx: &RuleContext<'_>, out: &mut Violations) {
    let Some(start) = ctx.draft.start_date else {
        out.push(Violation::required(Field::StartDate));
        return;
    };

    if ctx.family().requires_future_start() && start < ctx.as_of {
        out.push(Violation::new(
            Field::StartDate,
            Rule::StartDateInPast,
            format!("coverage cannot start before {}", ctx.as_of),
        ));
    }

    let Some(end) = ctx.draft.end_date else {
        return;
    };
    if end <= start {
        out.push(Violation::new(
            Field::EndDate,
            Rule::InvalidDateRange,
            "end date must be after the start date",
        ));
        return;
    }

    let Some(months) = ctx.config.duration_months else {
        return;
    };
    match policy_end_date(start, months) {
        Ok(expected) if expected != end => out.push(Violation::new(
            Field::EndDate,
            Rule::EndDateMismatch,
            format!("a {} month term starting {} ends on {}", months, start, expected),
        )),
        Ok(_) => {}
        Err(err) => out.push(Violation::new(Field::StartDate, Rule::ArithmeticInconsistency, err.to_string())),
    }
}

fn check_age(ctx: &RuleContext<'_>, out: &mut Violations) {
    let Some(age) = ctx.draft.age_at_inscription else {
        if ctx.family().requires_age() {
            out.push(Violation::required(Field::AgeAtInscription));
        }
        return;
    };

    let config = ctx.config;
    let below = config.min_age.filter(|min| age < *min);
    let above = config.max_age.filter(|max| age > *max);
    if below.is_some() || above.is_some() {
        out.push(Violation::new(
            Field::AgeAtInscription,
            Rule::AgeOutOfRange,
            format!(
                "age {} is outside the accepted range {}",
                age,
                describe_range(config.min_age.map(Decimal::from), config.max_age.map(Decimal::from))
            ),
        ));
    }
}

fn check_coverage(ctx: &RuleContext<'_>, out: &mut Violations) {
    if !ctx.family().applies(Field::CoverageAmount) {
        return;
    }
    let Some(coverage) = ctx.draft.coverage_amount else {
        if ctx.family().requires_coverage() {
            out.push(Violation::required(Field::CoverageAmount));
        }
        return;
    };

    if coverage <= Decimal::ZERO {
        out.push(Violation::new(
            Field::CoverageAmount,
            Rule::ArithmeticInconsistency,
            "coverage must be greater than zero",
        ));
        return;
    }
    check_range(Field::CoverageAmount, coverage, ctx.config.min_coverage, ctx.config.max_coverage, out);
}

fn check_deductible(ctx: &RuleContext<'_>, out: &mut Violations) {
    if !ctx.family().applies(Field::Deductible) {
        return;
    }
    let Some(deductible) = ctx.draft.deductible else {
        return;
    };

    if deductible < Decimal::ZERO {
        out.push(Violation::new(
            Field::Deductible,
            Rule::ArithmeticInconsistency,
            "deductible cannot be negative",
        ));
        return;
    }

    let options = &ctx.config.deductible_options;
    if !options.is_empty() && !options.contains(&deductible) {
        out.push(Violation::new(
            Field::Deductible,
            Rule::OptionNotOffered,
            format!("deductible {} is not one of the offered tiers", deductible.normalize()),
        ));
        return;
    }
    check_range(Field::Deductible, deductible, ctx.config.min_deductible, ctx.config.max_deductible, out);
}

fn check_premium(ctx: &RuleContext<'_>, out: &mut Violations) {
    let declared = ctx.draft.premium_amount;
    if let Some(premium) = declared.filter(|p| !rounds_positive(ctx, *p)) {
        out.push(Violation::new(
            Field::PremiumAmount,
            Rule::ArithmeticInconsistency,
            format!("premium must be greater than zero, got {}", premium.normalize()),
        ));
        return;
    }

    match ctx.family().premium_basis() {
        PremiumBasis::Declared => match declared {
            None => out.push(Violation::required(Field::PremiumAmount)),
            Some(premium) => check_range(
                Field::PremiumAmount,
                premium,
                ctx.config.min_premium,
                ctx.config.max_premium,
                out,
            ),
        },
        PremiumBasis::Derived => {
            if let (Some(premium), Some(quote)) = (declared, ctx.quote) {
                check_premium_matches(premium, quote, ctx.settings.premium_tolerance, out);
            }
        }
    }
}

fn check_premium_matches(declared: Decimal, quote: &PremiumQuote, tolerance: Decimal, out: &mut Violations) {
    if (declared - quote.amount.amount()).abs() > tolerance {
        out.push(Violation::new(
            Field::PremiumAmount,
            Rule::PremiumMismatch,
            format!("premium should be {}, got {}", quote.amount, declared),
        ));
    }
}

/// Checks a derived premium against the product's minimum
///
/// The premium compared is the computed one unless the settings point the
/// floor at the declared amount.
pub fn check_premium_floor(ctx: &RuleContext<'_>, out: &mut Violations) {
    let Some(floor) = ctx.config.min_premium else {
        return;
    };
    let target = match ctx.settings.floor_target {
        FloorTarget::Computed => ctx.quote.map(|q| q.amount.amount()),
        FloorTarget::Declared => ctx.draft.premium_amount,
    };
    if let Some(premium) = target.filter(|p| *p < floor) {
        out.push(Violation::new(
            Field::PremiumAmount,
            Rule::BelowPremiumFloor,
            format!(
                "premium {} is below the product minimum of {}",
                ctx.money(premium),
                ctx.money(floor)
            ),
        ));
    }
}

fn check_fixed_values(ctx: &RuleContext<'_>, out: &mut Violations) {
    let config = ctx.config;
    let draft = ctx.draft;
    let family = ctx.family();

    if family.applies(Field::Coinsurance) {
        check_fixed(Field::Coinsurance, draft.coinsurance, config.coinsurance_percent, out);
    }
    if family.applies(Field::MaxAnnualOutOfPocket) {
        check_fixed(
            Field::MaxAnnualOutOfPocket,
            draft.max_annual_out_of_pocket,
            config.max_annual_out_of_pocket,
            out,
        );
    }
    if let (Some(chosen), Some(fixed)) = (draft.payment_frequency, config.payment_frequency) {
        if chosen != fixed {
            out.push(Violation::new(
                Field::PaymentFrequency,
                Rule::FixedValueMismatch,
                format!("this product is paid {}", fixed),
            ));
        }
    }
}

fn check_fixed(field: Field, value: Option<Decimal>, fixed: Option<Decimal>, out: &mut Violations) {
    if let (Some(value), Some(fixed)) = (value, fixed) {
        if value != fixed {
            out.push(Violation::new(
                field,
                Rule::FixedValueMismatch,
                format!("{} is fixed at {} for this product", field, fixed.normalize()),
            ));
        }
    }
}

fn check_optional_benefits(ctx: &RuleContext<'_>, out: &mut Violations) {
    let family = ctx.family();
    let draft = ctx.draft;

    if family.applies(Field::WantsDentalPremium)
        && draft.wants_dental_premium == Some(true)
        && !ctx.config.offers_dental_premium
    {
        out.push(Violation::new(
            Field::WantsDentalPremium,
            Rule::OptionNotOffered,
            "premium dental cover is not offered by this product",
        ));
    }
    if family.applies(Field::WantsVision) && draft.wants_vision == Some(true) && !ctx.config.offers_vision {
        out.push(Violation::new(
            Field::WantsVision,
            Rule::OptionNotOffered,
            "vision cover is not offered by this product",
        ));
    }
}

fn check_beneficiaries(ctx: &RuleContext<'_>, out: &mut Violations) {
    let family = ctx.family();
    if !family.carries_beneficiaries() {
        return;
    }
    let beneficiaries = &ctx.draft.beneficiaries;

    validate_count(
        beneficiaries.len(),
        Field::Beneficiaries,
        family.min_beneficiaries(),
        ctx.config.beneficiary_limit(),
        out,
    );
    for (index, beneficiary) in beneficiaries.iter().enumerate() {
        validate_entry_completeness(beneficiary, Field::Beneficiaries, index, out);
    }
    validate_percentage_sum(beneficiaries, ctx.settings.percentage_tolerance, out);
}

fn check_dependents(ctx: &RuleContext<'_>, out: &mut Violations) {
    if !ctx.family().carries_dependents() {
        return;
    }
    let dependents = &ctx.draft.dependents;

    validate_count(
        dependents.len(),
        Field::Dependents,
        0,
        Some(ctx.config.max_dependents as usize),
        out,
    );
    for (index, dependent) in dependents.iter().enumerate() {
        validate_entry_completeness(dependent, Field::Dependents, index, out);
        validate_dependent_age(dependent, index, ctx.as_of, ctx.settings, out);
    }
}

/// Flags `value` outside `[min, max]`; a missing bound is open
pub fn check_range(
    field: Field,
    value: Decimal,
    min: Option<Decimal>,
    max: Option<Decimal>,
    out: &mut Violations,
) {
    let below = min.map_or(false, |min| value < min);
    let above = max.map_or(false, |max| value > max);
    if below || above {
        out.push(Violation::new(
            field,
            Rule::OutOfRange,
            format!("{} {} is outside {}", field, value.normalize(), describe_range(min, max)),
        ));
    }
}

fn describe_range(min: Option<Decimal>, max: Option<Decimal>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("[{}, {}]", min.normalize(), max.normalize()),
        (Some(min), None) => format!("at least {}", min.normalize()),
        (None, Some(max)) => format!("at most {}", max.normalize()),
        (None, None) => "any value".to_string(),
    }
}

/// Wraps the draft's premium as a quote for declared families
pub fn declared_quote(ctx: &RuleContext<'_>) -> Option<PremiumQuote> {
    ctx.draft
        .premium_amount
        .filter(|p| rounds_positive(ctx, *p))
        .map(|p| PremiumQuote::declared(ctx.money(p)))
}

/// The stored premium is rounded to the currency, so that is what must stay
/// above zero
fn rounds_positive(ctx: &RuleContext<'_>, premium: Decimal) -> bool {
    ctx.money(premium).round_to_currency().is_positive()
}

/// Raises `Required` on the payment frequency when neither the draft nor the
/// product provides one
pub fn require_payment_frequency(ctx: &RuleContext<'_>, out: &mut Violations) {
    if ctx.payment_frequency().is_none() {
        out.push(Violation::required(Field::PaymentFrequency));
    }
}

