//! Property-Based Test Generators
//!
//! Provides proptest strategies for drafts and their parts. Draft strategies
//! only vary values inside the fixture products' bounds, so every generated
//! draft is valid on [`DateFixtures::as_of`](crate::DateFixtures::as_of).

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_underwriting::{Beneficiary, PaymentFrequency, PolicyDraft, ProductFamily};

use crate::builders::DraftBuilder;
use crate::fixtures::{DateFixtures, ProductFixtures};

/// Strategy for payment frequencies
pub fn frequency_strategy() -> impl Strategy<Value = PaymentFrequency> {
    prop_oneof![
        Just(PaymentFrequency::Monthly),
        Just(PaymentFrequency::Quarterly),
        Just(PaymentFrequency::Semiannually),
        Just(PaymentFrequency::Annually),
    ]
}

/// Strategy for whole amounts in `[min, max]`
pub fn whole_amount_strategy(min: u32, max: u32) -> impl Strategy<Value = Decimal> {
    (min..=max).prop_map(Decimal::from)
}

/// Strategy for amounts with two decimal places in `[min, max]`
pub fn cents_amount_strategy(min: u32, max: u32) -> impl Strategy<Value = Decimal> {
    (u64::from(min) * 100..=u64::from(max) * 100).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// Strategy for dates between 1950 and 2023
pub fn birth_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..26_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1950, 1, 1)
            .and_then(|d| d.checked_add_days(Days::new(offset)))
            .unwrap_or_default()
    })
}

/// Strategy for percentage splits of 1 to 6 entries that add up to exactly 100
///
/// Each share has two decimal places and is strictly positive.
pub fn percentage_split_strategy() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(1u32..=1000, 1..=6).prop_map(|weights| {
        let total: u32 = weights.iter().sum();
        let mut shares: Vec<Decimal> = weights
            .iter()
            .map(|w| (Decimal::from(*w) * dec!(100) / Decimal::from(total)).round_dp(2).max(dec!(0.01)))
            .collect();
        let assigned: Decimal = shares[..shares.len() - 1].iter().sum();
        let last = shares.len() - 1;
        shares[last] = dec!(100) - assigned;
        shares
    })
    .prop_filter("every share positive", |shares| shares.iter().all(|s| *s > Decimal::ZERO))
}

/// Strategy for beneficiary lists whose percentages add up to 100
pub fn beneficiaries_strategy() -> impl Strategy<Value = Vec<Beneficiary>> {
    percentage_split_strategy().prop_map(|shares| {
        shares
            .into_iter()
            .enumerate()
            .map(|(i, share)| Beneficiary::new(format!("Beneficiary {}", i + 1), "other", share))
            .collect()
    })
}

/// Strategy for the product families
pub fn family_strategy() -> impl Strategy<Value = ProductFamily> {
    prop::sample::select(ProductFamily::ALL.to_vec())
}

/// Strategy for drafts that are valid for the fixture product of `family`
pub fn valid_draft_strategy(family: ProductFamily) -> BoxedStrategy<PolicyDraft> {
    let config = ProductFixtures::for_family(family);
    let base = DraftBuilder::valid_for(&config);
    let start = (0u64..60).prop_map(|days| {
        DateFixtures::start()
            .checked_add_days(Days::new(days))
            .unwrap_or_else(DateFixtures::start)
    });

    match family {
        ProductFamily::LifeBasic => (
            whole_amount_strategy(5000, 500000),
            frequency_strategy(),
            18u32..=65,
            beneficiaries_strategy(),
            start,
        )
            .prop_map(move |(coverage, frequency, age, beneficiaries, start)| {
                base.clone()
                    .coverage(coverage)
                    .frequency(frequency)
                    .age(age)
                    .beneficiaries(beneficiaries)
                    .start(start)
                    .build()
            })
            .boxed(),
        ProductFamily::LifeSupplementary => (
            whole_amount_strategy(10000, 1_000_000),
            cents_amount_strategy(20, 500),
            18u32..=70,
            start,
        )
            .prop_map(move |(coverage, premium, age, start)| {
                base.clone()
                    .coverage(coverage)
                    .premium(premium)
                    .age(age)
                    .start(start)
                    .build()
            })
            .boxed(),
        ProductFamily::AddStandalone => (
            whole_amount_strategy(10000, 250000),
            frequency_strategy(),
            18u32..=70,
            start,
        )
            .prop_map(move |(coverage, frequency, age, start)| {
                base.clone()
                    .coverage(coverage)
                    .frequency(frequency)
                    .age(age)
                    .start(start)
                    .build()
            })
            .boxed(),
        ProductFamily::HealthBasic => (cents_amount_strategy(50, 150), start)
            .prop_map(move |(premium, start)| base.clone().premium(premium).start(start).build())
            .boxed(),
        ProductFamily::HealthIntermediate => (
            prop::sample::select(vec![dec!(1000), dec!(2500), dec!(5000)]),
            any::<bool>(),
            any::<bool>(),
            0usize..=3,
            start,
        )
            .prop_map(move |(deductible, dental, vision, children, start)| {
                base.clone()
                    .deductible(deductible)
                    .dental_premium(dental)
                    .vision(vision)
                    .children(children)
                    .start(start)
                    .build()
            })
            .boxed(),
        ProductFamily::HealthPremier => (0usize..=10, start)
            .prop_map(move |(children, start)| base.clone().children(children).start(start).build())
            .boxed(),
        ProductFamily::LifeDependents | ProductFamily::HealthFamiliar => {
            start.prop_map(move |start| base.clone().start(start).build()).boxed()
        }
    }
}
