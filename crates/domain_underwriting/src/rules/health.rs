//! Health plan tiers
//!
//! Basic and Familiar take a declared premium inside the product's range.
//! Intermediate and Premier derive theirs, clamped between the product's
//! minimum (the base) and maximum (the cap).

use crate::draft::{Field, Relationship};
use crate::family::ProductFamily;
use crate::list_validator::{validate_relationship_cardinality, CardinalityRules};
use crate::premium::{
    health_intermediate_premium, health_premier_premium, DeductibleTier, HealthIntermediateInputs,
};
use crate::violation::{Violation, Violations};

use super::common::declared_quote;
use super::{FamilyRules, Pricing, PricingOverflow, RuleContext, Step};

fn check_household(ctx: &RuleContext<'_>, out: &mut Violations) {
    validate_relationship_cardinality(
        &ctx.draft.dependents,
        Field::Dependents,
        &CardinalityRules::household(),
        out,
    );
}

pub struct HealthBasicRules;

impl FamilyRules for HealthBasicRules {
    fn family(&self) -> ProductFamily {
        ProductFamily::HealthBasic
    }

    fn compute_premium(&self, ctx: &RuleContext<'_>) -> Pricing {
        Ok(declared_quote(ctx))
    }
}

pub struct HealthIntermediateRules;

impl FamilyRules for HealthIntermediateRules {
    fn family(&self) -> ProductFamily {
        ProductFamily::HealthIntermediate
    }

    fn compute_premium(&self, ctx: &RuleContext<'_>) -> Pricing {
        let config = ctx.config;
        let (Some(deductible), Some(base), Some(cap)) =
            (ctx.draft.deductible, config.min_premium, config.max_premium)
        else {
            return Ok(None);
        };
        let inputs = HealthIntermediateInputs {
            base,
            cap,
            tier: DeductibleTier::classify(deductible, config),
            dental_premium: ctx.draft.wants_dental_premium == Some(true),
            vision: ctx.draft.wants_vision == Some(true),
            spouses: ctx.draft.count_dependents(Relationship::Spouse),
            children: ctx.draft.count_dependents(Relationship::Child),
        };
        health_intermediate_premium(inputs, ctx.currency())
            .map(Some)
            .map_err(PricingOverflow::on(Field::PremiumAmount))
    }

    fn validate(&self, ctx: &RuleContext<'_>, step: Step, out: &mut Violations) {
        match step {
            Step::Ranges if ctx.draft.deductible.is_none() => {
                out.push(Violation::required(Field::Deductible));
            }
            Step::Lists => check_household(ctx, out),
            _ => {}
        }
    }
}

pub struct HealthFamiliarRules;

impl FamilyRules for HealthFamiliarRules {
    fn family(&self) -> ProductFamily {
        ProductFamily::HealthFamiliar
    }

    fn compute_premium(&self, ctx: &RuleContext<'_>) -> Pricing {
        Ok(declared_quote(ctx))
    }

    fn validate(&self, ctx: &RuleContext<'_>, step: Step, out: &mut Violations) {
        if step == Step::Lists {
            check_household(ctx, out);
        }
    }
}

pub struct HealthPremierRules;

impl FamilyRules for HealthPremierRules {
    fn family(&self) -> ProductFamily {
        ProductFamily::HealthPremier
    }

    fn compute_premium(&self, ctx: &RuleContext<'_>) -> Pricing {
        let (Some(base), Some(cap)) = (ctx.config.min_premium, ctx.config.max_premium) else {
            return Ok(None);
        };
        health_premier_premium(ctx.draft.dependents.len(), ctx.money(base), cap)
            .map(Some)
            .map_err(PricingOverflow::on(Field::PremiumAmount))
    }

    fn validate(&self, ctx: &RuleContext<'_>, step: Step, out: &mut Violations) {
        if step == Step::Lists {
            check_household(ctx, out);
        }
    }
}
