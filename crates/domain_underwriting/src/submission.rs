//! Submission gate
//!
//! Turns a draft that passed validation into the canonical payload handed
//! to the policy repository. The gate derives what the family derives, takes
//! fixed values from the product, and blanks every field the family does not
//! use, so two drafts that differ only in ignored fields produce the same
//! payload.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{AgentId, ClientId, Money, PolicyTerm, ProductId};

use crate::catalog::ProductConfig;
use crate::draft::{Beneficiary, Dependent, Field, PolicyDraft};
use crate::error::UnderwritingError;
use crate::family::ProductFamily;
use crate::premium::{PaymentFrequency, PremiumQuote};
use crate::status::PolicyStatus;

/// Storage-ready policy application
///
/// Fields a family does not use are `None` and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyPayload {
    pub product_id: ProductId,
    pub client_id: ClientId,
    pub agent_id: AgentId,
    pub status: PolicyStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub premium_amount: Money,
    pub payment_frequency: Option<PaymentFrequency>,
    pub coverage_amount: Option<Decimal>,
    pub includes_add: Option<bool>,
    pub add_coverage: Option<Decimal>,
    pub age_at_inscription: Option<u32>,
    pub deductible: Option<Decimal>,
    pub coinsurance: Option<Decimal>,
    pub max_annual_out_of_pocket: Option<Decimal>,
    pub has_dental_basic: Option<bool>,
    pub has_dental_premium: Option<bool>,
    /// Basic or premium dental, whichever applies
    pub has_dental: Option<bool>,
    pub has_vision: Option<bool>,
    pub beneficiaries: Option<Vec<Beneficiary>>,
    pub dependents: Option<Vec<Dependent>>,
}

/// Builds payloads from validated drafts
#[derive(Debug, Clone, Copy)]
pub struct SubmissionGate<'a> {
    config: &'a ProductConfig,
}

impl<'a> SubmissionGate<'a> {
    pub fn new(config: &'a ProductConfig) -> Self {
        Self { config }
    }

    /// Builds the payload for a zero-violation draft
    ///
    /// # Arguments
    ///
    /// * `draft` - A draft the pipeline reported no violations for
    /// * `quote` - The premium priced for that draft
    ///
    /// # Errors
    ///
    /// Returns `UnderwritingError::Unvalidated` when a field the payload
    /// cannot do without is missing, which only happens if validation was
    /// skipped. Returns `UnderwritingError::Temporal` when the product's term
    /// does not end after the start date.
    pub fn build(&self, draft: &PolicyDraft, quote: Option<&PremiumQuote>) -> Result<PolicyPayload, UnderwritingError> {
        let config = self.config;
        let family = config.family;
        let applies = |field: Field| family.applies(field);

        let client_id = draft.client_id.ok_or(UnderwritingError::Unvalidated(Field::ClientId))?;
        let agent_id = draft.agent_id.ok_or(UnderwritingError::Unvalidated(Field::AgentId))?;
        let start_date = draft.start_date.ok_or(UnderwritingError::Unvalidated(Field::StartDate))?;
        let quote = quote.ok_or(UnderwritingError::Unvalidated(Field::PremiumAmount))?;
        let months = config
            .duration_months
            .ok_or(UnderwritingError::Unvalidated(Field::EndDate))?;
        let term = PolicyTerm::from_duration(start_date, months)?;

        let (includes_add, add_coverage) = match family {
            ProductFamily::LifeBasic => (Some(true), draft.coverage_amount),
            ProductFamily::LifeSupplementary => {
                let included = draft.includes_add == Some(true);
                (Some(included), draft.add_coverage.filter(|_| included))
            }
            _ => (None, None),
        };

        let wants_dental_premium = applies(Field::WantsDentalPremium)
            .then(|| draft.wants_dental_premium == Some(true));
        let has_dental_basic = family.is_health().then_some(config.has_dental_basic);
        let has_dental = family
            .is_health()
            .then(|| config.has_dental_basic || wants_dental_premium == Some(true));

        Ok(PolicyPayload {
            product_id: config.id,
            client_id,
            agent_id,
            status: PolicyStatus::Pending,
            start_date: term.start,
            end_date: term.end,
            premium_amount: quote.amount,
            payment_frequency: draft.payment_frequency.or(config.payment_frequency),
            coverage_amount: draft.coverage_amount.filter(|_| applies(Field::CoverageAmount)),
            includes_add,
            add_coverage,
            age_at_inscription: draft.age_at_inscription,
            deductible: draft.deductible.filter(|_| applies(Field::Deductible)),
            coinsurance: config.coinsurance_percent.filter(|_| applies(Field::Coinsurance)),
            max_annual_out_of_pocket: config
                .max_annual_out_of_pocket
                .filter(|_| applies(Field::MaxAnnualOutOfPocket)),
            has_dental_basic,
            has_dental_premium: wants_dental_premium,
            has_dental,
            has_vision: applies(Field::WantsVision).then(|| draft.wants_vision == Some(true)),
            beneficiaries: applies(Field::Beneficiaries).then(|| draft.beneficiaries.clone()),
            dependents: applies(Field::Dependents).then(|| draft.dependents.clone()),
        })
    }
}

impl From<&PolicyPayload> for PolicyDraft {
    fn from(payload: &PolicyPayload) -> Self {
        PolicyDraft {
            product_id: Some(payload.product_id),
            client_id: Some(payload.client_id),
            agent_id: Some(payload.agent_id),
            start_date: Some(payload.start_date),
            end_date: Some(payload.end_date),
            premium_amount: Some(payload.premium_amount.amount()),
            payment_frequency: payload.payment_frequency,
            coverage_amount: payload.coverage_amount,
            includes_add: payload.includes_add,
            add_coverage: payload.add_coverage,
            age_at_inscription: payload.age_at_inscription,
            deductible: payload.deductible,
            coinsurance: payload.coinsurance,
            max_annual_out_of_pocket: payload.max_annual_out_of_pocket,
            wants_dental_premium: payload.has_dental_premium,
            wants_vision: payload.has_vision,
            beneficiaries: payload.beneficiaries.clone().unwrap_or_default(),
            dependents: payload.dependents.clone().unwrap_or_default(),
        }
    }
}
