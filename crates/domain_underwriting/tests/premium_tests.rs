//! Premium Derivation Tests
//!
//! Covers the pricing formulas of the derived families and the way quotes
//! surface through the engine:
//! - Life basic: coverage rate times the frequency multiplier
//! - Standalone AD&D: age-banded rate and the premium floor
//! - Health intermediate: deductible tiers, add-ons and the cap
//! - Health premier: per-dependent loading and the cap
//!
//! # Test Organization
//!
//! - `frequency_tests` - Frequency multipliers and codes
//! - `life_basic_tests` - Life basic formula
//! - `add_standalone_tests` - AD&D formula and floor
//! - `health_tests` - Health intermediate and premier formulas
//! - `property_tests` - Invariants over generated inputs

use core_kernel::{Currency, Money};
use domain_underwriting::premium::{
    add_standalone_premium, add_standalone_rate, health_intermediate_premium,
    health_premier_premium, life_basic_premium, HealthIntermediateInputs,
};
use domain_underwriting::{
    DeductibleTier, Field, PaymentFrequency, PremiumBasis, ProductFamily, Rule,
    UnderwritingEngine, UnderwritingSettings,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_utils::*;

fn usd(amount: Decimal) -> Money {
    Money::new(amount, Currency::USD)
}

fn engine() -> UnderwritingEngine {
    UnderwritingEngine::new(shared_catalog().clone(), UnderwritingSettings::default())
}

// ============================================================================
// FREQUENCY TESTS
// ============================================================================

mod frequency_tests {
    use super::*;

    /// Verifies each frequency scales a monthly amount by its months
    #[test]
    fn test_multipliers() {
        assert_eq!(PaymentFrequency::Monthly.multiplier(), dec!(1));
        assert_eq!(PaymentFrequency::Quarterly.multiplier(), dec!(3));
        assert_eq!(PaymentFrequency::Semiannually.multiplier(), dec!(6));
        assert_eq!(PaymentFrequency::Annually.multiplier(), dec!(12));
    }

    /// Verifies codes parse back to the same frequency
    #[test]
    fn test_codes_round_trip() {
        for frequency in [
            PaymentFrequency::Monthly,
            PaymentFrequency::Quarterly,
            PaymentFrequency::Semiannually,
            PaymentFrequency::Annually,
        ] {
            assert_eq!(PaymentFrequency::from_code(frequency.code()), Some(frequency));
        }
    }
}

// ============================================================================
// LIFE BASIC TESTS
// ============================================================================

mod life_basic_tests {
    use super::*;

    /// 10,000 of coverage paid annually costs 120
    #[test]
    fn test_annual_premium() {
        let quote = life_basic_premium(usd(dec!(10000)), PaymentFrequency::Annually).unwrap();
        assert_money_eq(&quote.amount, dec!(120));
        assert_eq!(quote.basis, PremiumBasis::Derived);
    }

    /// Verifies the monthly premium is one per mille of coverage
    #[test]
    fn test_monthly_premium() {
        let quote = life_basic_premium(usd(dec!(250000)), PaymentFrequency::Monthly).unwrap();
        assert_money_eq(&quote.amount, dec!(250));
    }

    /// Verifies the engine reports the derived quote for a valid draft
    #[test]
    fn test_engine_quote() {
        let config = ProductFixtures::life_basic();
        let draft = DraftBuilder::valid_for(&config).build();

        let evaluation = engine()
            .evaluate(&config.id, &draft, DateFixtures::as_of())
            .unwrap();

        assert_no_violations(&evaluation.violations);
        assert_money_eq(&evaluation.premium.unwrap().amount, dec!(120));
    }

    /// Verifies no quote is produced until a frequency is known
    #[test]
    fn test_no_quote_without_frequency() {
        let config = ProductFixtures::life_basic();
        let mut draft = DraftBuilder::valid_for(&config).build();
        draft.payment_frequency = None;

        let evaluation = engine()
            .evaluate(&config.id, &draft, DateFixtures::as_of())
            .unwrap();

        assert!(evaluation.premium.is_none());
        assert_has_violation(&evaluation.violations, Field::PaymentFrequency, Rule::Required);
    }
}

// ============================================================================
// ADD STANDALONE TESTS
// ============================================================================

mod add_standalone_tests {
    use super::*;

    /// Verifies the rate bands at 40 and 50
    #[test]
    fn test_rate_bands() {
        assert_eq!(add_standalone_rate(30), dec!(0.0005));
        assert_eq!(add_standalone_rate(40), dec!(0.0005));
        assert_eq!(add_standalone_rate(50), dec!(0.0006));
        assert_eq!(add_standalone_rate(55), dec!(0.00075));
    }

    /// 5,000 at age 18 monthly is 2.50
    #[test]
    fn test_youngest_minimum_coverage() {
        let quote = add_standalone_premium(usd(dec!(5000)), 18, PaymentFrequency::Monthly).unwrap();
        assert_money_eq(&quote.amount, dec!(2.50));
    }

    /// Verifies quarterly payment triples the monthly amount
    #[test]
    fn test_quarterly() {
        let quote = add_standalone_premium(usd(dec!(20000)), 30, PaymentFrequency::Quarterly).unwrap();
        assert_money_eq(&quote.amount, dec!(30));
    }

    /// A 2.50 premium is below the 5.00 floor of the fixture product
    #[test]
    fn test_floor_violation() {
        let config = ProductFixtures::add_standalone();
        let draft = DraftBuilder::valid_for(&config)
            .coverage(dec!(5000))
            .age(18)
            .frequency(PaymentFrequency::Monthly)
            .build();

        let evaluation = engine()
            .evaluate(&config.id, &draft, DateFixtures::as_of())
            .unwrap();

        assert_has_violation(&evaluation.violations, Field::PremiumAmount, Rule::BelowPremiumFloor);
        assert_rule_count(&evaluation.violations, Rule::BelowPremiumFloor, 1);
        assert_money_eq(&evaluation.premium.unwrap().amount, dec!(2.50));
    }

    /// Verifies the floor is inclusive
    #[test]
    fn test_floor_met_exactly() {
        let config = ProductFixtures::add_standalone();
        let draft = DraftBuilder::valid_for(&config)
            .coverage(dec!(10000))
            .age(18)
            .frequency(PaymentFrequency::Monthly)
            .build();

        let evaluation = engine()
            .evaluate(&config.id, &draft, DateFixtures::as_of())
            .unwrap();

        assert_no_violations(&evaluation.violations);
        assert_money_eq(&evaluation.premium.unwrap().amount, dec!(5));
    }
}

// ============================================================================
// HEALTH TESTS
// ============================================================================

mod health_tests {
    use super::*;

    fn inputs(tier: DeductibleTier) -> HealthIntermediateInputs {
        HealthIntermediateInputs {
            base: dec!(300),
            cap: dec!(400),
            tier,
            dental_premium: false,
            vision: false,
            spouses: 0,
            children: 0,
        }
    }

    /// Verifies the surcharge of each deductible tier
    #[test]
    fn test_tier_surcharges() {
        let lowest = health_intermediate_premium(inputs(DeductibleTier::Lowest), Currency::USD).unwrap();
        let middle = health_intermediate_premium(inputs(DeductibleTier::Middle), Currency::USD).unwrap();
        let highest = health_intermediate_premium(inputs(DeductibleTier::Highest), Currency::USD).unwrap();

        assert_money_eq(&lowest.amount, dec!(320));
        assert_money_eq(&middle.amount, dec!(310));
        assert_money_eq(&highest.amount, dec!(300));
    }

    /// Base 300, lowest deductible, premium dental and a spouse is 405,
    /// capped at 400
    #[test]
    fn test_intermediate_cap() {
        let quote = health_intermediate_premium(
            HealthIntermediateInputs {
                dental_premium: true,
                spouses: 1,
                ..inputs(DeductibleTier::Lowest)
            },
            Currency::USD,
        )
        .unwrap();
        assert_money_eq(&quote.amount, dec!(400));
    }

    /// Verifies every add-on below the cap is itemised
    #[test]
    fn test_intermediate_components() {
        let quote = health_intermediate_premium(
            HealthIntermediateInputs {
                vision: true,
                children: 1,
                ..inputs(DeductibleTier::Highest)
            },
            Currency::USD,
        )
        .unwrap();

        assert_money_eq(&quote.amount, dec!(350));
        let labels: Vec<_> = quote.components.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["base", "vision", "children"]);
    }

    /// Verifies the engine prices the same draft the same way
    #[test]
    fn test_intermediate_through_engine() {
        let config = ProductFixtures::health_intermediate();
        let draft = DraftBuilder::valid_for(&config)
            .deductible(dec!(1000))
            .dental_premium(true)
            .dependent("Ana Lopez", "spouse", DateFixtures::date(1990, 5, 5))
            .build();

        let evaluation = engine()
            .evaluate(&config.id, &draft, DateFixtures::as_of())
            .unwrap();

        assert_no_violations(&evaluation.violations);
        assert_money_eq(&evaluation.premium.unwrap().amount, dec!(400));
    }

    /// Three dependents on a 400 base is 700
    #[test]
    fn test_premier_dependents() {
        let quote = health_premier_premium(3, usd(dec!(400)), dec!(1500)).unwrap();
        assert_money_eq(&quote.amount, dec!(700));
    }

    /// Verifies premier is capped at the product maximum
    #[test]
    fn test_premier_cap() {
        let quote = health_premier_premium(12, usd(dec!(400)), dec!(1500)).unwrap();
        assert_money_eq(&quote.amount, dec!(1500));
    }

    /// Verifies a declared premium that disagrees with the derived one is
    /// flagged
    #[test]
    fn test_premier_declared_mismatch() {
        let config = ProductFixtures::health_premier();
        let draft = DraftBuilder::valid_for(&config).premium(dec!(450)).build();

        let evaluation = engine()
            .evaluate(&config.id, &draft, DateFixtures::as_of())
            .unwrap();

        assert_has_violation(&evaluation.violations, Field::PremiumAmount, Rule::PremiumMismatch);
    }

    /// Verifies a declared premium within a cent of the derived one passes
    #[test]
    fn test_premier_declared_within_tolerance() {
        let config = ProductFixtures::health_premier();
        let draft = DraftBuilder::valid_for(&config).premium(dec!(500.01)).build();

        let evaluation = engine()
            .evaluate(&config.id, &draft, DateFixtures::as_of())
            .unwrap();

        assert_no_violations(&evaluation.violations);
    }
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

mod property_tests {
    use super::*;

    proptest! {
        /// Clamped health premiums never leave the product's range
        #[test]
        fn prop_intermediate_within_range(
            tier in prop_oneof![
                Just(DeductibleTier::Lowest),
                Just(DeductibleTier::Middle),
                Just(DeductibleTier::Highest),
            ],
            dental_premium in any::<bool>(),
            vision in any::<bool>(),
            spouses in 0usize..=1,
            children in 0usize..=6,
        ) {
            let quote = health_intermediate_premium(
                HealthIntermediateInputs {
                    base: dec!(300),
                    cap: dec!(400),
                    tier,
                    dental_premium,
                    vision,
                    spouses,
                    children,
                },
                Currency::USD,
            )
            .unwrap();
            prop_assert!(quote.amount.amount() >= dec!(300));
            prop_assert!(quote.amount.amount() <= dec!(400));

            let itemised: Decimal = quote.components.iter().map(|c| c.amount.amount()).sum();
            prop_assert_eq!(itemised, quote.amount.amount());
        }

        /// Premier premiums never leave the product's range
        #[test]
        fn prop_premier_within_range(dependents in 0usize..=30) {
            let quote = health_premier_premium(dependents, usd(dec!(400)), dec!(1500)).unwrap();
            prop_assert!(quote.amount.amount() >= dec!(400));
            prop_assert!(quote.amount.amount() <= dec!(1500));
        }

        /// Older applicants never pay less for the same AD&D coverage
        #[test]
        fn prop_add_rate_never_decreases_with_age(age in 18u32..=69) {
            prop_assert!(add_standalone_rate(age + 1) >= add_standalone_rate(age));
        }

        /// Derived quotes are always rounded to cents
        #[test]
        fn prop_life_basic_rounded(
            coverage in whole_amount_strategy(5000, 500000),
            frequency in frequency_strategy(),
        ) {
            let quote = life_basic_premium(usd(coverage), frequency).unwrap();
            prop_assert!(quote.amount.amount().scale() <= 2);
        }

        /// Every family's fixture product prices its generated drafts
        #[test]
        fn prop_valid_drafts_are_priced(
            draft in family_strategy().prop_flat_map(valid_draft_strategy)
        ) {
            let product_id = draft.product_id.unwrap();
            let evaluation = engine().evaluate(&product_id, &draft, DateFixtures::as_of()).unwrap();
            prop_assert!(evaluation.premium.is_some());
        }
    }

    /// Verifies which families derive their premium
    #[test]
    fn test_derived_families() {
        let derived: Vec<_> = ProductFamily::ALL
            .iter()
            .filter(|f| f.premium_basis() == PremiumBasis::Derived)
            .copied()
            .collect();
        assert_eq!(
            derived,
            vec![
                ProductFamily::LifeBasic,
                ProductFamily::AddStandalone,
                ProductFamily::HealthIntermediate,
                ProductFamily::HealthPremier,
            ]
        );
    }
}
