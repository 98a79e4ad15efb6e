//! Standalone accidental death and dismemberment

use crate::draft::Field;
use crate::family::ProductFamily;
use crate::premium::add_standalone_premium;
use crate::violation::Violations;

use super::common::{check_premium_floor, require_payment_frequency};
use super::{FamilyRules, Pricing, PricingOverflow, RuleContext, Step};

/// AD&D priced by an age-banded rate; the product minimum is a floor the
/// computed premium must reach, never a value it is raised to
pub struct AddStandaloneRules;

impl FamilyRules for AddStandaloneRules {
    fn family(&self) -> ProductFamily {
        ProductFamily::AddStandalone
    }

    fn compute_premium(&self, ctx: &RuleContext<'_>) -> Pricing {
        let (Some(coverage), Some(age), Some(frequency)) =
            (ctx.coverage(), ctx.draft.age_at_inscription, ctx.payment_frequency())
        else {
            return Ok(None);
        };
        add_standalone_premium(ctx.money(coverage), age, frequency)
            .map(Some)
            .map_err(PricingOverflow::on(Field::CoverageAmount))
    }

    fn validate(&self, ctx: &RuleContext<'_>, step: Step, out: &mut Violations) {
        match step {
            Step::Ranges => check_premium_floor(ctx, out),
            Step::FixedValues => require_payment_frequency(ctx, out),
            _ => {}
        }
    }
}
