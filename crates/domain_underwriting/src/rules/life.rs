//! Life families

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::draft::Field;
use crate::family::ProductFamily;
use crate::list_validator::{validate_relationship_cardinality, CardinalityRules};
use crate::premium::life_basic_premium;
use crate::violation::{Rule, Violation, Violations};

use super::common::{check_premium_floor, declared_quote, require_payment_frequency};
use super::{FamilyRules, Pricing, PricingOverflow, RuleContext, Step};

/// Term life priced from coverage; AD&D is always included at the same
/// amount
pub struct LifeBasicRules;

impl FamilyRules for LifeBasicRules {
    fn family(&self) -> ProductFamily {
        ProductFamily::LifeBasic
    }

    fn compute_premium(&self, ctx: &RuleContext<'_>) -> Pricing {
        let (Some(coverage), Some(frequency)) = (ctx.coverage(), ctx.payment_frequency()) else {
            return Ok(None);
        };
        life_basic_premium(ctx.money(coverage), frequency)
            .map(Some)
            .map_err(PricingOverflow::on(Field::CoverageAmount))
    }

    fn validate(&self, ctx: &RuleContext<'_>, step: Step, out: &mut Violations) {
        match step {
            Step::Ranges => check_premium_floor(ctx, out),
            Step::FixedValues => {
                require_payment_frequency(ctx, out);
                check_forced_add(ctx, out);
            }
            _ => {}
        }
    }
}

fn check_forced_add(ctx: &RuleContext<'_>, out: &mut Violations) {
    let draft = ctx.draft;
    if draft.includes_add == Some(false) {
        out.push(Violation::new(
            Field::IncludesAdd,
            Rule::FixedValueMismatch,
            "AD&D is always included with this product",
        ));
    }
    if let (Some(add), Some(coverage)) = (draft.add_coverage, draft.coverage_amount) {
        if add != coverage {
            out.push(Violation::new(
                Field::AddCoverage,
                Rule::FixedValueMismatch,
                format!("AD&D coverage must equal the coverage amount of {}", coverage.normalize()),
            ));
        }
    }
}

/// Supplementary life with a declared premium and an optional AD&D rider
pub struct LifeSupplementaryRules;

impl FamilyRules for LifeSupplementaryRules {
    fn family(&self) -> ProductFamily {
        ProductFamily::LifeSupplementary
    }

    fn compute_premium(&self, ctx: &RuleContext<'_>) -> Pricing {
        Ok(declared_quote(ctx))
    }

    fn validate(&self, ctx: &RuleContext<'_>, step: Step, out: &mut Violations) {
        if step == Step::Ranges {
            check_add_rider(ctx, out);
        }
    }
}

/// The rider must lie in `[1, 2 * coverage]` when it is selected
fn check_add_rider(ctx: &RuleContext<'_>, out: &mut Violations) {
    let draft = ctx.draft;
    if draft.includes_add != Some(true) {
        return;
    }
    let Some(add) = draft.add_coverage else {
        out.push(Violation::required(Field::AddCoverage));
        return;
    };

    let ceiling = match ctx.coverage().map(|c| c.checked_mul(dec!(2))) {
        Some(None) => {
            out.push(Violation::new(
                Field::CoverageAmount,
                Rule::ArithmeticInconsistency,
                "coverage is too large to bound the AD&D rider",
            ));
            return;
        }
        ceiling => ceiling.flatten(),
    };
    let too_high = ceiling.map_or(false, |max| add > max);
    if add < Decimal::ONE || too_high {
        let message = match ceiling {
            Some(max) => format!("AD&D coverage must be between 1 and {}", max.normalize()),
            None => "AD&D coverage must be at least 1".to_string(),
        };
        out.push(Violation::new(Field::AddCoverage, Rule::OutOfRange, message));
    }
}

/// Life cover extended to a spouse and children
///
/// The premium is computed outside this core; only the household
/// composition is checked here.
pub struct LifeDependentsRules;

impl FamilyRules for LifeDependentsRules {
    fn family(&self) -> ProductFamily {
        ProductFamily::LifeDependents
    }

    fn compute_premium(&self, ctx: &RuleContext<'_>) -> Pricing {
        Ok(declared_quote(ctx))
    }

    fn validate(&self, ctx: &RuleContext<'_>, step: Step, out: &mut Violations) {
        if step == Step::Lists {
            validate_relationship_cardinality(
                &ctx.draft.dependents,
                Field::Dependents,
                &CardinalityRules::spouse_and_children(),
                out,
            );
        }
    }
}
