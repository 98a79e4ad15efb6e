//! Product families
//!
//! Every product in the catalog belongs to exactly one family. The family
//! decides which draft fields apply, which catalog bounds must be present,
//! and which pricing rule produces the premium.
//!
//! # Field applicability
//!
//! | field                  | LB | LS | LD | AD | HB | HI | HF | HP |
//! |------------------------|----|----|----|----|----|----|----|----|
//! | coverage_amount        | x  | x  | x  | x  |    |    |    |    |
//! | includes_add           | x  | x  |    |    |    |    |    |    |
//! | add_coverage           | x  | x  |    |    |    |    |    |    |
//! | age_at_inscription     | x  | x  | x  | x  | x  | x  | x  | x  |
//! | deductible             |    |    |    |    | x  | x  | x  | x  |
//! | coinsurance            |    |    |    |    | x  | x  | x  | x  |
//! | max_annual_out_of_pocket |  |    |    |    | x  | x  | x  | x  |
//! | wants_dental_premium   |    |    |    |    |    | x  | x  | x  |
//! | wants_vision           |    |    |    |    |    | x  | x  | x  |
//! | beneficiaries          | x  | x  | x  | x  |    |    |    |    |
//! | dependents             |    |    | x  |    |    | x  | x  | x  |
//!
//! References, dates, premium, and payment frequency apply to every family.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::Bound;
use crate::draft::Field;

/// The closed set of product families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductFamily {
    LifeBasic,
    LifeSupplementary,
    LifeDependents,
    AddStandalone,
    HealthBasic,
    HealthIntermediate,
    HealthFamiliar,
    HealthPremier,
}

/// How a family arrives at its premium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PremiumBasis {
    /// Computed from the draft by a pricing formula
    Derived,
    /// Entered by the user and only range-checked
    Declared,
}

impl ProductFamily {
    pub const ALL: [ProductFamily; 8] = [
        ProductFamily::LifeBasic,
        ProductFamily::LifeSupplementary,
        ProductFamily::LifeDependents,
        ProductFamily::AddStandalone,
        ProductFamily::HealthBasic,
        ProductFamily::HealthIntermediate,
        ProductFamily::HealthFamiliar,
        ProductFamily::HealthPremier,
    ];

    pub fn is_health(&self) -> bool {
        matches!(
            self,
            ProductFamily::HealthBasic
                | ProductFamily::HealthIntermediate
                | ProductFamily::HealthFamiliar
                | ProductFamily::HealthPremier
        )
    }

    pub fn is_life(&self) -> bool {
        !self.is_health()
    }

    pub fn premium_basis(&self) -> PremiumBasis {
        match self {
            ProductFamily::LifeBasic
            | ProductFamily::AddStandalone
            | ProductFamily::HealthIntermediate
            | ProductFamily::HealthPremier => PremiumBasis::Derived,
            ProductFamily::LifeSupplementary
            | ProductFamily::LifeDependents
            | ProductFamily::HealthBasic
            | ProductFamily::HealthFamiliar => PremiumBasis::Declared,
        }
    }

    /// Whether the coverage start may not lie in the past
    pub fn requires_future_start(&self) -> bool {
        self.is_health() || *self == ProductFamily::AddStandalone
    }

    pub fn carries_beneficiaries(&self) -> bool {
        self.applies(Field::Beneficiaries)
    }

    pub fn carries_dependents(&self) -> bool {
        self.applies(Field::Dependents)
    }

    /// Minimum number of beneficiaries an application must name
    pub fn min_beneficiaries(&self) -> usize {
        match self {
            ProductFamily::LifeBasic
            | ProductFamily::LifeSupplementary
            | ProductFamily::AddStandalone => 1,
            _ => 0,
        }
    }

    /// Whether the applicant's age is mandatory for this family
    pub fn requires_age(&self) -> bool {
        matches!(
            self,
            ProductFamily::LifeBasic | ProductFamily::LifeDependents | ProductFamily::AddStandalone
        )
    }

    /// Whether the coverage amount is mandatory for this family
    pub fn requires_coverage(&self) -> bool {
        matches!(
            self,
            ProductFamily::LifeBasic | ProductFamily::LifeSupplementary | ProductFamily::AddStandalone
        )
    }

    /// Catalog bounds a product of this family cannot be priced without
    pub fn required_bounds(&self) -> &'static [Bound] {
        match self {
            ProductFamily::LifeBasic => &[
                Bound::MinAge,
                Bound::MaxAge,
                Bound::MinCoverage,
                Bound::MaxCoverage,
                Bound::DurationMonths,
            ],
            ProductFamily::LifeSupplementary => &[
                Bound::MinCoverage,
                Bound::MinPremium,
                Bound::DurationMonths,
            ],
            ProductFamily::LifeDependents => &[Bound::MinAge, Bound::MaxAge, Bound::DurationMonths],
            ProductFamily::AddStandalone => &[
                Bound::MinAge,
                Bound::MaxAge,
                Bound::MinCoverage,
                Bound::MaxCoverage,
                Bound::MinPremium,
                Bound::DurationMonths,
            ],
            ProductFamily::HealthBasic | ProductFamily::HealthFamiliar => &[
                Bound::MinPremium,
                Bound::MaxPremium,
                Bound::DurationMonths,
            ],
            ProductFamily::HealthIntermediate => &[
                Bound::MinPremium,
                Bound::MaxPremium,
                Bound::MinDeductible,
                Bound::MaxDeductible,
                Bound::Coinsurance,
                Bound::MaxAnnualOutOfPocket,
                Bound::DurationMonths,
            ],
            ProductFamily::HealthPremier => &[
                Bound::MinPremium,
                Bound::MaxPremium,
                Bound::DurationMonths,
            ],
        }
    }

    /// Whether a draft field is meaningful for this family
    pub fn applies(&self, field: Field) -> bool {
        use ProductFamily::*;
        match field {
            Field::ProductId
            | Field::ClientId
            | Field::AgentId
            | Field::StartDate
            | Field::EndDate
            | Field::PremiumAmount
            | Field::PaymentFrequency
            | Field::AgeAtInscription => true,
            Field::CoverageAmount => self.is_life(),
            Field::IncludesAdd | Field::AddCoverage => {
                matches!(self, LifeBasic | LifeSupplementary)
            }
            Field::Deductible | Field::Coinsurance | Field::MaxAnnualOutOfPocket => self.is_health(),
            Field::WantsDentalPremium | Field::WantsVision => {
                matches!(self, HealthIntermediate | HealthFamiliar | HealthPremier)
            }
            Field::Beneficiaries => self.is_life(),
            Field::Dependents => {
                matches!(self, LifeDependents | HealthIntermediate | HealthFamiliar | HealthPremier)
            }
        }
    }

    /// Fields that apply to this family, in declaration order
    pub fn applicable_fields(&self) -> Vec<Field> {
        Field::ALL.iter().copied().filter(|f| self.applies(*f)).collect()
    }

    pub fn code(&self) -> &'static str {
        match self {
            ProductFamily::LifeBasic => "life_basic",
            ProductFamily::LifeSupplementary => "life_supplementary",
            ProductFamily::LifeDependents => "life_dependents",
            ProductFamily::AddStandalone => "add_standalone",
            ProductFamily::HealthBasic => "health_basic",
            ProductFamily::HealthIntermediate => "health_intermediate",
            ProductFamily::HealthFamiliar => "health_familiar",
            ProductFamily::HealthPremier => "health_premier",
        }
    }
}

impl fmt::Display for ProductFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_life_and_health_partition() {
        for family in ProductFamily::ALL {
            assert_ne!(family.is_life(), family.is_health());
        }
    }

    #[test]
    fn test_health_fields_never_apply_to_life() {
        for family in ProductFamily::ALL.iter().filter(|f| f.is_life()) {
            assert!(!family.applies(Field::Deductible));
            assert!(!family.applies(Field::WantsVision));
        }
    }

    #[test]
    fn test_dependents_only_where_covered() {
        assert!(ProductFamily::LifeDependents.carries_dependents());
        assert!(!ProductFamily::LifeBasic.carries_dependents());
        assert!(!ProductFamily::HealthBasic.carries_dependents());
        assert!(ProductFamily::HealthPremier.carries_dependents());
    }

    #[test]
    fn test_serde_uses_snake_case_code() {
        let json = serde_json::to_string(&ProductFamily::AddStandalone).unwrap();
        assert_eq!(json, "\"add_standalone\"");
    }
}
