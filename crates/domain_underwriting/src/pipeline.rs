//! Validation pipeline
//!
//! Runs the shared and family checks over a draft in a fixed order:
//!
//! 1. References. Missing agent or client stops a full run here.
//! 2. Dates.
//! 3. Numeric ranges, including premium checks against the computed quote.
//! 4. Fixed values and optional benefits.
//! 5. Beneficiary and dependent lists.
//!
//! Everything after the first step accumulates. Interactive single-field
//! feedback goes through the same rule functions with the collection scoped
//! to one field.

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::ProductConfig;
use crate::draft::{Field, PolicyDraft};
use crate::premium::PremiumQuote;
use crate::rules::{common, rules_for, Pricing, RuleContext, Step};
use crate::settings::UnderwritingSettings;
use crate::violation::{Violation, Violations};

/// Outcome of evaluating a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    /// `None` while pricing inputs are missing or the run stopped early
    pub premium: Option<PremiumQuote>,
    pub violations: Vec<Violation>,
}

impl Evaluation {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Orchestrates validation of a draft against one product
#[derive(Debug, Clone, Copy)]
pub struct ValidationPipeline<'a> {
    settings: &'a UnderwritingSettings,
}

impl<'a> ValidationPipeline<'a> {
    pub fn new(settings: &'a UnderwritingSettings) -> Self {
        Self { settings }
    }

    /// Prices the draft without validating it
    ///
    /// `None` while an input is missing or too large to price.
    pub fn price(&self, config: &ProductConfig, draft: &PolicyDraft, as_of: NaiveDate) -> Option<PremiumQuote> {
        self.pricing(config, draft, as_of).ok().flatten()
    }

    fn pricing(&self, config: &ProductConfig, draft: &PolicyDraft, as_of: NaiveDate) -> Pricing {
        let ctx = RuleContext::new(config, draft, self.settings, as_of);
        rules_for(config.family).compute_premium(&ctx)
    }

    /// Full run over every step
    ///
    /// `config` must already have passed
    /// [`ProductConfig::ensure_complete`].
    pub fn evaluate(&self, config: &ProductConfig, draft: &PolicyDraft, as_of: NaiveDate) -> Evaluation {
        let pricing = self.pricing(config, draft, as_of);
        let quote = pricing.as_ref().ok().cloned().flatten();
        let ctx = RuleContext::new(config, draft, self.settings, as_of).with_quote(quote.as_ref());

        let mut out = Violations::new();
        let completed = self.run_steps(&ctx, &mut out, true);
        if let (true, Err(overflow)) = (completed, &pricing) {
            out.push(overflow.violation());
        }

        Evaluation {
            premium: quote.filter(|_| completed),
            violations: out.into_vec(),
        }
    }

    /// Checks one field, ignoring failures elsewhere
    ///
    /// Unlike a full run this never stops at the reference step, so a form
    /// can give feedback on any field before the parties are chosen.
    pub fn validate_field(
        &self,
        config: &ProductConfig,
        draft: &PolicyDraft,
        field: Field,
        as_of: NaiveDate,
    ) -> Vec<Violation> {
        let pricing = self.pricing(config, draft, as_of);
        let quote = pricing.as_ref().ok().cloned().flatten();
        let ctx = RuleContext::new(config, draft, self.settings, as_of).with_quote(quote.as_ref());

        let mut out = Violations::scoped(field);
        self.run_steps(&ctx, &mut out, false);
        if let Err(overflow) = &pricing {
            out.push(overflow.violation());
        }
        out.into_vec()
    }

    /// Returns false when the run stopped at a fatal reference violation
    fn run_steps(&self, ctx: &RuleContext<'_>, out: &mut Violations, halt_on_fatal: bool) -> bool {
        let rules = rules_for(ctx.family());
        for step in Step::ORDER {
            common::check(ctx, step, out);
            rules.validate(ctx, step, out);

            if halt_on_fatal && step == Step::References && out.has_fatal() {
                return false;
            }
        }
        true
    }
}
