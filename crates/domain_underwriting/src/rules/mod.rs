//! Family rules
//!
//! Each product family implements [`FamilyRules`]: how to price a draft and
//! which checks it adds on top of the shared ones in [`common`]. The
//! pipeline looks the implementation up with [`rules_for`] and drives it one
//! [`Step`] at a time.

pub mod common;
mod accidental;
mod health;
mod life;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::{Currency, Money, MoneyError};

use crate::catalog::ProductConfig;
use crate::draft::{Field, PolicyDraft};
use crate::family::ProductFamily;
use crate::premium::{PaymentFrequency, PremiumQuote};
use crate::settings::UnderwritingSettings;
use crate::violation::{Rule, Violation, Violations};

pub use accidental::AddStandaloneRules;
pub use health::{HealthBasicRules, HealthFamiliarRules, HealthIntermediateRules, HealthPremierRules};
pub use life::{LifeBasicRules, LifeDependentsRules, LifeSupplementaryRules};

/// Validation steps in the order the pipeline runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Agent, client and product references
    References,
    Dates,
    /// Numeric bounds on age, coverage, deductible and premium
    Ranges,
    /// Values the product fixes or the family derives
    FixedValues,
    /// Beneficiary and dependent lists
    Lists,
}

impl Step {
    pub const ORDER: [Step; 5] = [
        Step::References,
        Step::Dates,
        Step::Ranges,
        Step::FixedValues,
        Step::Lists,
    ];
}

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub config: &'a ProductConfig,
    pub draft: &'a PolicyDraft,
    pub settings: &'a UnderwritingSettings,
    /// The date start dates and ages are judged against
    pub as_of: NaiveDate,
    /// Premium computed for this draft, if it could be priced
    pub quote: Option<&'a PremiumQuote>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        config: &'a ProductConfig,
        draft: &'a PolicyDraft,
        settings: &'a UnderwritingSettings,
        as_of: NaiveDate,
    ) -> Self {
        Self {
            config,
            draft,
            settings,
            as_of,
            quote: None,
        }
    }

    pub fn with_quote(self, quote: Option<&'a PremiumQuote>) -> Self {
        Self { quote, ..self }
    }

    pub fn family(&self) -> ProductFamily {
        self.config.family
    }

    pub fn currency(&self) -> Currency {
        self.config.currency
    }

    pub fn money(&self, amount: Decimal) -> Money {
        Money::new(amount, self.config.currency)
    }

    /// Frequency from the draft, falling back to the product's fixed one
    pub fn payment_frequency(&self) -> Option<PaymentFrequency> {
        self.draft.payment_frequency.or(self.config.payment_frequency)
    }

    /// Coverage amount when present and positive
    pub fn coverage(&self) -> Option<Decimal> {
        self.draft.coverage_amount.filter(|c| *c > Decimal::ZERO)
    }
}

/// A draft value too large for the premium arithmetic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingOverflow {
    pub field: Field,
    pub error: MoneyError,
}

impl PricingOverflow {
    pub fn on(field: Field) -> impl FnOnce(MoneyError) -> Self {
        move |error| Self { field, error }
    }

    pub fn violation(&self) -> Violation {
        Violation::new(
            self.field,
            Rule::ArithmeticInconsistency,
            format!("{} is too large to price: {}", self.field, self.error),
        )
    }
}

/// `Ok(None)` while a pricing input is missing
pub type Pricing = Result<Option<PremiumQuote>, PricingOverflow>;

/// Pricing and family-specific checks of one product family
pub trait FamilyRules: Sync {
    fn family(&self) -> ProductFamily;

    /// Prices the draft
    fn compute_premium(&self, ctx: &RuleContext<'_>) -> Pricing;

    /// Checks this family adds to `step`; the shared ones run separately
    fn validate(&self, _ctx: &RuleContext<'_>, _step: Step, _out: &mut Violations) {}
}

/// The rules implementation for a family
pub fn rules_for(family: ProductFamily) -> &'static dyn FamilyRules {
    match family {
        ProductFamily::LifeBasic => &LifeBasicRules,
        ProductFamily::LifeSupplementary => &LifeSupplementaryRules,
        ProductFamily::LifeDependents => &LifeDependentsRules,
        ProductFamily::AddStandalone => &AddStandaloneRules,
        ProductFamily::HealthBasic => &HealthBasicRules,
        ProductFamily::HealthIntermediate => &HealthIntermediateRules,
        ProductFamily::HealthFamiliar => &HealthFamiliarRules,
        ProductFamily::HealthPremier => &HealthPremierRules,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_matches_family() {
        for family in ProductFamily::ALL {
            assert_eq!(rules_for(family).family(), family);
        }
    }
}
