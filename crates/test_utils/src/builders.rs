//! Test Data Builders
//!
//! Provides a builder for policy drafts with sensible defaults. Tests set
//! only the fields they care about; [`DraftBuilder::valid_for`] starts from
//! a draft that passes every rule of a fixture product.

use chrono::NaiveDate;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{AgentId, ClientId, ProductId};
use domain_underwriting::{
    Beneficiary, Dependent, PaymentFrequency, PolicyDraft, ProductConfig, ProductFamily,
};

use crate::fixtures::{DateFixtures, PartyFixtures};

/// A random display name
pub fn fake_name() -> String {
    Name().fake()
}

/// Builder for policy drafts
#[derive(Debug, Clone)]
pub struct DraftBuilder {
    draft: PolicyDraft,
}

impl Default for DraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftBuilder {
    /// Creates a builder with client, agent and start date filled in
    pub fn new() -> Self {
        Self {
            draft: PolicyDraft {
                client_id: Some(PartyFixtures::client_id()),
                agent_id: Some(PartyFixtures::agent_id()),
                start_date: Some(DateFixtures::start()),
                ..PolicyDraft::default()
            },
        }
    }

    /// Creates a builder with nothing filled in
    pub fn empty() -> Self {
        Self {
            draft: PolicyDraft::default(),
        }
    }

    /// A draft that passes every rule of the fixture product of its family
    /// when evaluated on [`DateFixtures::as_of`]
    pub fn valid_for(config: &ProductConfig) -> Self {
        let builder = Self::new().product(config.id);
        match config.family {
            ProductFamily::LifeBasic => builder
                .coverage(dec!(10000))
                .frequency(PaymentFrequency::Annually)
                .age(35)
                .beneficiary("Ana Lopez", "spouse", dec!(100)),
            ProductFamily::LifeSupplementary => builder
                .coverage(dec!(20000))
                .premium(dec!(25))
                .includes_add(false)
                .age(40)
                .beneficiary("Luis Lopez", "son", dec!(60))
                .beneficiary("Eva Lopez", "daughter", dec!(40)),
            ProductFamily::LifeDependents => builder
                .premium(dec!(30))
                .age(40)
                .dependent("Ana Lopez", "spouse", DateFixtures::date(1985, 3, 1))
                .dependent("Luis Lopez", "child", DateFixtures::date(2015, 6, 1)),
            ProductFamily::AddStandalone => builder
                .coverage(dec!(20000))
                .frequency(PaymentFrequency::Monthly)
                .age(30)
                .beneficiary("Ana Lopez", "spouse", dec!(100)),
            ProductFamily::HealthBasic => builder.premium(dec!(80)).age(30),
            ProductFamily::HealthIntermediate => builder.deductible(dec!(2500)).age(30),
            ProductFamily::HealthFamiliar => builder
                .premium(dec!(500))
                .age(38)
                .dependent("Ana Lopez", "spouse", DateFixtures::date(1986, 9, 12)),
            ProductFamily::HealthPremier => builder
                .age(45)
                .dependent("Ana Lopez", "spouse", DateFixtures::date(1980, 2, 2)),
        }
    }

    pub fn product(mut self, id: ProductId) -> Self {
        self.draft.product_id = Some(id);
        self
    }

    pub fn client(mut self, id: ClientId) -> Self {
        self.draft.client_id = Some(id);
        self
    }

    pub fn agent(mut self, id: AgentId) -> Self {
        self.draft.agent_id = Some(id);
        self
    }

    pub fn without_client(mut self) -> Self {
        self.draft.client_id = None;
        self
    }

    pub fn without_agent(mut self) -> Self {
        self.draft.agent_id = None;
        self
    }

    pub fn start(mut self, date: NaiveDate) -> Self {
        self.draft.start_date = Some(date);
        self
    }

    pub fn without_start(mut self) -> Self {
        self.draft.start_date = None;
        self
    }

    pub fn end(mut self, date: NaiveDate) -> Self {
        self.draft.end_date = Some(date);
        self
    }

    pub fn premium(mut self, amount: Decimal) -> Self {
        self.draft.premium_amount = Some(amount);
        self
    }

    pub fn without_premium(mut self) -> Self {
        self.draft.premium_amount = None;
        self
    }

    pub fn frequency(mut self, frequency: PaymentFrequency) -> Self {
        self.draft.payment_frequency = Some(frequency);
        self
    }

    pub fn coverage(mut self, amount: Decimal) -> Self {
        self.draft.coverage_amount = Some(amount);
        self
    }

    pub fn includes_add(mut self, included: bool) -> Self {
        self.draft.includes_add = Some(included);
        self
    }

    pub fn add_coverage(mut self, amount: Decimal) -> Self {
        self.draft.add_coverage = Some(amount);
        self
    }

    pub fn age(mut self, age: u32) -> Self {
        self.draft.age_at_inscription = Some(age);
        self
    }

    pub fn without_age(mut self) -> Self {
        self.draft.age_at_inscription = None;
        self
    }

    pub fn deductible(mut self, amount: Decimal) -> Self {
        self.draft.deductible = Some(amount);
        self
    }

    pub fn coinsurance(mut self, percent: Decimal) -> Self {
        self.draft.coinsurance = Some(percent);
        self
    }

    pub fn max_annual(mut self, amount: Decimal) -> Self {
        self.draft.max_annual_out_of_pocket = Some(amount);
        self
    }

    pub fn dental_premium(mut self, wanted: bool) -> Self {
        self.draft.wants_dental_premium = Some(wanted);
        self
    }

    pub fn vision(mut self, wanted: bool) -> Self {
        self.draft.wants_vision = Some(wanted);
        self
    }

    pub fn beneficiary(mut self, name: &str, relationship: &str, percentage: Decimal) -> Self {
        self.draft
            .beneficiaries
            .push(Beneficiary::new(name, relationship, percentage));
        self
    }

    pub fn beneficiaries(mut self, beneficiaries: Vec<Beneficiary>) -> Self {
        self.draft.beneficiaries = beneficiaries;
        self
    }

    pub fn dependent(mut self, name: &str, relationship: &str, birth_date: NaiveDate) -> Self {
        self.draft
            .dependents
            .push(Dependent::new(name, relationship, birth_date));
        self
    }

    pub fn dependents(mut self, dependents: Vec<Dependent>) -> Self {
        self.draft.dependents = dependents;
        self
    }

    /// Adds `count` children with random names, born in 2015
    pub fn children(mut self, count: usize) -> Self {
        for month in 0..count {
            let birth = DateFixtures::date(2015, (month % 12) as u32 + 1, 1);
            self.draft.dependents.push(Dependent::new(fake_name(), "child", birth));
        }
        self
    }

    pub fn build(self) -> PolicyDraft {
        self.draft
    }
}
