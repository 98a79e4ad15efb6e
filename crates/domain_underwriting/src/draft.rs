//! Policy drafts as collected by the intake flows
//!
//! A draft is the mutable, partially filled application a client or agent is
//! working on. Every field is optional here; which ones are required, and
//! which ones are ignored, depends on the product family.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{AgentId, ClientId, ProductId};

use crate::premium::PaymentFrequency;

/// Addressable fields of a draft
///
/// Violations point at one of these, optionally narrowed to a list entry and
/// one of its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ProductId,
    ClientId,
    AgentId,
    StartDate,
    EndDate,
    PremiumAmount,
    PaymentFrequency,
    CoverageAmount,
    IncludesAdd,
    AddCoverage,
    AgeAtInscription,
    Deductible,
    Coinsurance,
    MaxAnnualOutOfPocket,
    WantsDentalPremium,
    WantsVision,
    Beneficiaries,
    Dependents,
}

impl Field {
    pub const ALL: [Field; 18] = [
        Field::ProductId,
        Field::ClientId,
        Field::AgentId,
        Field::StartDate,
        Field::EndDate,
        Field::PremiumAmount,
        Field::PaymentFrequency,
        Field::CoverageAmount,
        Field::IncludesAdd,
        Field::AddCoverage,
        Field::AgeAtInscription,
        Field::Deductible,
        Field::Coinsurance,
        Field::MaxAnnualOutOfPocket,
        Field::WantsDentalPremium,
        Field::WantsVision,
        Field::Beneficiaries,
        Field::Dependents,
    ];

    /// Wire name of the field, matching the intake form keys
    pub fn name(&self) -> &'static str {
        match self {
            Field::ProductId => "product_id",
            Field::ClientId => "client_id",
            Field::AgentId => "agent_id",
            Field::StartDate => "start_date",
            Field::EndDate => "end_date",
            Field::PremiumAmount => "premium_amount",
            Field::PaymentFrequency => "payment_frequency",
            Field::CoverageAmount => "coverage_amount",
            Field::IncludesAdd => "includes_add",
            Field::AddCoverage => "add_coverage",
            Field::AgeAtInscription => "age_at_inscription",
            Field::Deductible => "deductible",
            Field::Coinsurance => "coinsurance",
            Field::MaxAnnualOutOfPocket => "max_annual_out_of_pocket",
            Field::WantsDentalPremium => "wants_dental_premium",
            Field::WantsVision => "wants_vision",
            Field::Beneficiaries => "beneficiaries",
            Field::Dependents => "dependents",
        }
    }

    /// Looks a field up by its wire name
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Relationship of a beneficiary or dependent to the insured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Spouse,
    Child,
    Parent,
    Sibling,
    Other,
}

impl Relationship {
    /// Classifies a free-text relationship as typed on the intake form
    ///
    /// Returns `None` for blank input.
    pub fn classify(raw: &str) -> Option<Relationship> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        Some(match normalized.as_str() {
            "spouse" | "wife" | "husband" | "partner" => Relationship::Spouse,
            "child" | "son" | "daughter" => Relationship::Child,
            "parent" | "mother" | "father" => Relationship::Parent,
            "sibling" | "brother" | "sister" => Relationship::Sibling,
            _ => Relationship::Other,
        })
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relationship::Spouse => "spouse",
            Relationship::Child => "child",
            Relationship::Parent => "parent",
            Relationship::Sibling => "sibling",
            Relationship::Other => "other",
        };
        f.write_str(s)
    }
}

/// Person entitled to a share of a life policy's payout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub name: String,
    pub relationship: String,
    /// Share of the payout, 0 < p <= 100
    pub percentage: Decimal,
}

impl Beneficiary {
    pub fn new(name: impl Into<String>, relationship: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            name: name.into(),
            relationship: relationship.into(),
            percentage,
        }
    }
}

/// Person covered in addition to the primary insured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    pub name: String,
    pub relationship: String,
    pub birth_date: Option<NaiveDate>,
}

impl Dependent {
    pub fn new(name: impl Into<String>, relationship: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            relationship: relationship.into(),
            birth_date: Some(birth_date),
        }
    }
}

/// An application under construction
///
/// Constructed by the intake flow and mutated field by field. The engine
/// only ever reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyDraft {
    pub product_id: Option<ProductId>,
    pub client_id: Option<ClientId>,
    pub agent_id: Option<AgentId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub premium_amount: Option<Decimal>,
    pub payment_frequency: Option<PaymentFrequency>,
    pub coverage_amount: Option<Decimal>,
    pub includes_add: Option<bool>,
    pub add_coverage: Option<Decimal>,
    pub age_at_inscription: Option<u32>,
    pub deductible: Option<Decimal>,
    pub coinsurance: Option<Decimal>,
    pub max_annual_out_of_pocket: Option<Decimal>,
    pub wants_dental_premium: Option<bool>,
    pub wants_vision: Option<bool>,
    #[serde(default)]
    pub beneficiaries: Vec<Beneficiary>,
    #[serde(default)]
    pub dependents: Vec<Dependent>,
}

impl PolicyDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the field holds a value
    pub fn is_set(&self, field: Field) -> bool {
        match field {
            Field::ProductId => self.product_id.is_some(),
            Field::ClientId => self.client_id.is_some(),
            Field::AgentId => self.agent_id.is_some(),
            Field::StartDate => self.start_date.is_some(),
            Field::EndDate => self.end_date.is_some(),
            Field::PremiumAmount => self.premium_amount.is_some(),
            Field::PaymentFrequency => self.payment_frequency.is_some(),
            Field::CoverageAmount => self.coverage_amount.is_some(),
            Field::IncludesAdd => self.includes_add.is_some(),
            Field::AddCoverage => self.add_coverage.is_some(),
            Field::AgeAtInscription => self.age_at_inscription.is_some(),
            Field::Deductible => self.deductible.is_some(),
            Field::Coinsurance => self.coinsurance.is_some(),
            Field::MaxAnnualOutOfPocket => self.max_annual_out_of_pocket.is_some(),
            Field::WantsDentalPremium => self.wants_dental_premium.is_some(),
            Field::WantsVision => self.wants_vision.is_some(),
            Field::Beneficiaries => !self.beneficiaries.is_empty(),
            Field::Dependents => !self.dependents.is_empty(),
        }
    }

    /// Number of dependents classified as the given relationship
    pub fn count_dependents(&self, relationship: Relationship) -> usize {
        self.dependents
            .iter()
            .filter(|d| Relationship::classify(&d.relationship) == Some(relationship))
            .count()
    }
}
